use crate::config::ShopConfig;
use crate::shop::SimulationError;
use crate::sync::lock;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Exp};
#[cfg(test)]
use std::collections::vec_deque::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

const MIN_ARRIVAL_GAP: f64 = 0.01;
const MIN_SERVICE_SECS: f64 = 0.5;
const MAX_SERVICE_SECS: f64 = 1.5;

/// Where the simulation gets its timing from. Shared by the generator and
/// every barber thread.
pub trait DelaySource: Send + Sync {
    fn next_arrival_gap(&self) -> Duration;
    fn next_service_time(&self) -> Duration;
}

/// Exponential arrival gaps and uniform service times.
pub struct RandomDelays {
    arrivals: Exp<f64>,
    rng: Mutex<StdRng>,
}

impl RandomDelays {
    pub fn new(config: &ShopConfig) -> Result<RandomDelays, SimulationError> {
        let arrivals = Exp::new(1.0 / config.mean_arrival_gap()).map_err(|_| {
            SimulationError::InvalidConfig {
                reason: format!(
                    "arrival rate {} gives no usable distribution",
                    config.arrival_rate
                ),
            }
        })?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(RandomDelays {
            arrivals,
            rng: Mutex::new(rng),
        })
    }
}

impl DelaySource for RandomDelays {
    fn next_arrival_gap(&self) -> Duration {
        let gap = self.arrivals.sample(&mut *lock(&self.rng));

        Duration::from_secs_f64(f64::max(MIN_ARRIVAL_GAP, gap))
    }

    fn next_service_time(&self) -> Duration {
        let secs = lock(&self.rng).gen_range(MIN_SERVICE_SECS..=MAX_SERVICE_SECS);

        Duration::from_secs_f64(secs)
    }
}

/// Replays a fixed list of arrival gaps, then keeps returning `idle_gap`.
/// Every haircut takes `service`.
#[cfg(test)]
pub struct ScriptedDelays {
    arrivals: Mutex<VecDeque<Duration>>,
    idle_gap: Duration,
    service: Duration,
}

#[cfg(test)]
impl ScriptedDelays {
    pub fn new(arrivals: Vec<Duration>, idle_gap: Duration, service: Duration) -> ScriptedDelays {
        ScriptedDelays {
            arrivals: Mutex::new(arrivals.into()),
            idle_gap,
            service,
        }
    }

    /// Nobody ever arrives on their own.
    pub fn closed(service: Duration) -> ScriptedDelays {
        ScriptedDelays::new(Vec::new(), Duration::from_secs(3600), service)
    }
}

#[cfg(test)]
impl DelaySource for ScriptedDelays {
    fn next_arrival_gap(&self) -> Duration {
        lock(&self.arrivals).pop_front().unwrap_or(self.idle_gap)
    }

    fn next_service_time(&self) -> Duration {
        self.service
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_delays_stay_in_bounds() {
        let delays = RandomDelays::new(&ShopConfig {
            seed: Some(7),
            ..ShopConfig::default()
        })
        .unwrap();

        for _ in 0..1_000 {
            let service = delays.next_service_time();
            assert!(service >= Duration::from_millis(500));
            assert!(service <= Duration::from_millis(1500));

            assert!(delays.next_arrival_gap() >= Duration::from_millis(10));
        }
    }

    #[test]
    fn seeded_delays_are_reproducible() {
        let config = ShopConfig {
            seed: Some(42),
            ..ShopConfig::default()
        };
        let first = RandomDelays::new(&config).unwrap();
        let second = RandomDelays::new(&config).unwrap();

        for _ in 0..20 {
            assert_eq!(first.next_arrival_gap(), second.next_arrival_gap());
            assert_eq!(first.next_service_time(), second.next_service_time());
        }
    }

    #[test]
    fn arrival_gaps_average_to_scaled_mean() {
        let config = ShopConfig {
            barbers: 1,
            arrival_rate: 0.5,
            seed: Some(3),
            ..ShopConfig::default()
        };
        let delays = RandomDelays::new(&config).unwrap();

        let samples = 20_000;
        let total: f64 = (0..samples)
            .map(|_| delays.next_arrival_gap().as_secs_f64())
            .sum();
        let mean = total / samples as f64;

        assert!((mean - 0.5).abs() < 0.05, "mean was {}", mean);
    }

    #[test]
    fn scripted_delays_replay_then_idle() {
        let delays = ScriptedDelays::new(
            vec![Duration::from_millis(1), Duration::from_millis(2)],
            Duration::from_secs(9),
            Duration::from_millis(5),
        );

        assert_eq!(delays.next_arrival_gap(), Duration::from_millis(1));
        assert_eq!(delays.next_arrival_gap(), Duration::from_millis(2));
        assert_eq!(delays.next_arrival_gap(), Duration::from_secs(9));
        assert_eq!(delays.next_service_time(), Duration::from_millis(5));
    }
}
