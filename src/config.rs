use serde::{Deserialize, Serialize};
use std::time::Duration;

pub type CustomerId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Safe,
    Buggy,
}

impl Default for Protocol {
    fn default() -> Protocol {
        Protocol::Safe
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ShopConfig {
    pub barbers: u32,
    pub chairs: u32,           // Waiting area capacity, 0 means no waiting room
    pub arrival_rate: f64,     // Mean seconds between arrivals (before scaling by barbers)
    pub protocol: Protocol,
    pub poll_interval_ms: u64, // How long a buggy barber sleeps between checks
    pub seed: Option<u64>,
}

impl ShopConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Mean gap between arrivals, scaled so that arrival pressure follows the
    /// number of barbers.
    pub fn mean_arrival_gap(&self) -> f64 {
        self.arrival_rate / f64::max(1.0, self.barbers as f64 * 0.8)
    }
}

impl Default for ShopConfig {
    fn default() -> ShopConfig {
        ShopConfig {
            barbers: 2,
            chairs: 5,
            arrival_rate: 1.0,
            protocol: Protocol::Safe,
            poll_interval_ms: 500,
            seed: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct WatchdogConfig {
    pub detection_timeout_ms: u64, // No progress for this long counts as a stall
    pub alert_duration_ms: u64,
    pub pause_on_alert: bool,      // Freeze the rendered frame while an alert is active
}

impl WatchdogConfig {
    pub fn detection_timeout(&self) -> Duration {
        Duration::from_millis(self.detection_timeout_ms)
    }

    pub fn alert_duration(&self) -> Duration {
        Duration::from_millis(self.alert_duration_ms)
    }
}

impl Default for WatchdogConfig {
    fn default() -> WatchdogConfig {
        WatchdogConfig {
            detection_timeout_ms: 5_000,
            alert_duration_ms: 3_000,
            pause_on_alert: false,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct RunnerConfig {
    pub refresh_ms: u64,
    pub run_time_secs: u64,
}

impl Default for RunnerConfig {
    fn default() -> RunnerConfig {
        RunnerConfig {
            refresh_ms: 500,
            run_time_secs: 20,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Default, Clone)]
#[serde(default)]
pub struct SystemConfig {
    pub shop: ShopConfig,
    pub watchdog: WatchdogConfig,
    pub runner: RunnerConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: SystemConfig =
            serde_json::from_str(r#"{ "shop": { "barbers": 1, "protocol": "buggy" } }"#).unwrap();

        assert_eq!(config.shop.barbers, 1);
        assert_eq!(config.shop.protocol, Protocol::Buggy);
        assert_eq!(config.shop.chairs, 5);
        assert_eq!(config.watchdog.detection_timeout_ms, 5_000);
        assert_eq!(config.runner.refresh_ms, 500);
    }

    #[test]
    fn arrival_gap_scales_with_barbers() {
        let mut config = ShopConfig {
            arrival_rate: 2.0,
            barbers: 1,
            ..ShopConfig::default()
        };
        assert!((config.mean_arrival_gap() - 2.0).abs() < 1e-9);

        config.barbers = 5;
        assert!((config.mean_arrival_gap() - 0.5).abs() < 1e-9);
    }
}
