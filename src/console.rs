use crate::config::Protocol;
use crate::shop::state::{BarberState, Snapshot};
use colored::Colorize;
use serde::Serialize;
use std::fmt::Write;
use std::time::Duration;

/// One rendered refresh of the runner.
#[derive(Debug, Serialize)]
pub struct Frame<'a> {
    pub elapsed_ms: u64,
    pub alert: bool,
    pub deadlock_count: u32,
    pub snapshot: &'a Snapshot,
}

impl<'a> Frame<'a> {
    pub fn new(
        elapsed: Duration,
        alert: bool,
        deadlock_count: u32,
        snapshot: &'a Snapshot,
    ) -> Frame<'a> {
        Frame {
            elapsed_ms: elapsed.as_millis() as u64,
            alert,
            deadlock_count,
            snapshot,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_text(&self) -> String {
        let snapshot = self.snapshot;
        let mut out = String::new();

        let mode = match snapshot.protocol {
            Protocol::Safe => "SAFE".green().bold(),
            Protocol::Buggy => "BUGGY".red().bold(),
        };

        let _ = writeln!(
            out,
            "[{:>6.1}s] {}  arrived {}  served {}  turned away {}  deadlock alerts {}",
            self.elapsed_ms as f64 / 1000.0,
            mode,
            snapshot.customer_count,
            snapshot.served_count,
            snapshot.turned_away_count,
            self.deadlock_count
        );

        let chairs = (0..snapshot.chairs as usize)
            .map(|chair| match snapshot.waiting.get(chair) {
                Some(customer) => format!("({})", customer).green().to_string(),
                None => "( )".dimmed().to_string(),
            })
            .collect::<Vec<_>>();
        let chairs = if chairs.is_empty() {
            "no waiting room".dimmed().to_string()
        } else {
            chairs.join(" ")
        };
        let _ = writeln!(out, "  chairs:  {}", chairs);

        let barbers = snapshot
            .barber_states
            .iter()
            .enumerate()
            .map(|(index, state)| {
                let label = format!("B{}", index);
                match state {
                    BarberState::Serving(customer) => {
                        format!("{} serving {}", label, customer).green().to_string()
                    }
                    BarberState::Sleeping => format!("{} sleeping", label).blue().to_string(),
                    BarberState::Idle => format!("{} idle", label).yellow().to_string(),
                }
            })
            .collect::<Vec<_>>()
            .join(" | ");
        let _ = writeln!(out, "  barbers: {}", barbers);

        if self.alert {
            let _ = writeln!(
                out,
                "  {}",
                "!! possible deadlock: customers are waiting and nobody is serving"
                    .red()
                    .bold()
            );
        }

        out
    }
}

pub fn summary(snapshot: &Snapshot, deadlock_count: u32) -> String {
    format!(
        "{} customers arrived, {} served, {} turned away, {} still waiting, {} deadlock alerts",
        snapshot.customer_count,
        snapshot.served_count,
        snapshot.turned_away_count,
        snapshot.waiting.len(),
        deadlock_count
    )
}
