use crate::config::WatchdogConfig;
use crate::shop::state::Snapshot;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Somebody got a haircut since the last look.
    Progressing,
    /// No progress, but nothing suspicious either.
    Quiet,
    /// Customers are waiting, nobody is serving and nothing moved for too long.
    Stalled { newly_raised: bool },
}

/// Watches snapshots from the outside and raises an advisory alert when the
/// shop stops making progress while customers are waiting. It never touches
/// the simulation itself.
///
/// A stall that outlives its alert gets a fresh alert on the next look.
#[derive(Debug)]
pub struct Watchdog {
    detection_timeout: Duration,
    alert_duration: Duration,
    last_served: u64,
    last_progress: Instant,
    alert_until: Option<Instant>,
    deadlock_count: u32,
}

impl Watchdog {
    pub fn new(config: &WatchdogConfig, now: Instant) -> Watchdog {
        Watchdog {
            detection_timeout: config.detection_timeout(),
            alert_duration: config.alert_duration(),
            last_served: 0,
            last_progress: now,
            alert_until: None,
            deadlock_count: 0,
        }
    }

    /// Forgets everything, for use with a fresh simulation.
    pub fn reset(&mut self, now: Instant) {
        self.last_served = 0;
        self.last_progress = now;
        self.alert_until = None;
        self.deadlock_count = 0;
    }

    pub fn observe(&mut self, snapshot: &Snapshot, now: Instant) -> Verdict {
        if snapshot.served_count > self.last_served {
            self.last_served = snapshot.served_count;
            self.last_progress = now;
            self.alert_until = None;

            return Verdict::Progressing;
        }

        if let Some(until) = self.alert_until {
            if now < until {
                return Verdict::Stalled { newly_raised: false };
            }

            self.alert_until = None;
        }

        let stalled_for = now.saturating_duration_since(self.last_progress);

        if stalled_for > self.detection_timeout && snapshot.looks_stuck() {
            self.deadlock_count += 1;
            self.alert_until = Some(now + self.alert_duration);

            warn!(
                "no haircut for {:?} with {} customers waiting, suspecting a deadlock",
                stalled_for,
                snapshot.waiting.len()
            );

            return Verdict::Stalled { newly_raised: true };
        }

        Verdict::Quiet
    }

    pub fn is_alert_active(&self, now: Instant) -> bool {
        match self.alert_until {
            Some(until) => now < until,
            None => false,
        }
    }

    pub fn deadlock_count(&self) -> u32 {
        self.deadlock_count
    }
}
