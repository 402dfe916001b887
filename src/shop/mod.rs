use crate::config::{Protocol, ShopConfig};
use crate::shop::arrivals::ArrivalGenerator;
use crate::shop::barber::buggy::BuggyRoutine;
use crate::shop::barber::safe::SafeRoutine;
use crate::shop::barber::{Barber, Routine};
use crate::shop::state::{Shop, Snapshot};
use crate::shop::timing::{DelaySource, RandomDelays};
use crate::sync::cancel::CancellationToken;
use crate::sync::signal::SignalChannel;
use std::io;
use std::mem;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

pub mod arrivals;
pub mod barber;
pub mod state;
pub mod timing;
mod waiting_area;

#[derive(Debug, Fail)]
pub enum SimulationError {
    #[fail(display = "invalid configuration: {}", reason)]
    InvalidConfig { reason: String },
    #[fail(display = "simulation was already started")]
    AlreadyStarted,
    #[fail(display = "simulation was stopped and cannot be started again")]
    Stopped,
    #[fail(display = "could not spawn thread \"{}\"", name)]
    Spawn {
        name: String,
        #[cause]
        cause: io::Error,
    },
}

fn invalid(reason: String) -> SimulationError {
    SimulationError::InvalidConfig { reason }
}

pub fn validate(config: &ShopConfig) -> Result<(), SimulationError> {
    if config.barbers < 1 {
        return Err(invalid(format!("there must be at least one barber, got {}", config.barbers)));
    }

    if !config.arrival_rate.is_finite() || config.arrival_rate <= 0.0 {
        return Err(invalid(format!(
            "arrival rate must be a positive number of seconds, got {}",
            config.arrival_rate
        )));
    }

    if config.protocol == Protocol::Buggy && config.poll_interval_ms == 0 {
        return Err(invalid("buggy barbers need a non-zero poll interval".to_string()));
    }

    Ok(())
}

/// Everything the generator and the barbers share for one run.
pub struct ShopContext {
    pub protocol: Protocol,
    pub shop: Shop,
    pub signals: SignalChannel,
    pub token: CancellationToken,
    pub delays: Arc<dyn DelaySource>,
}

impl ShopContext {
    pub fn new(config: &ShopConfig, delays: Arc<dyn DelaySource>) -> ShopContext {
        ShopContext {
            protocol: config.protocol,
            shop: Shop::new(config),
            signals: SignalChannel::new(),
            token: CancellationToken::new(),
            delays,
        }
    }
}

enum Lifecycle {
    Created,
    Running,
    Stopped,
}

/// `Simulation` owns one run of the shop: it is built once, started once and
/// stopped once. A new run needs a new `Simulation`.
pub struct Simulation {
    config: ShopConfig,
    context: Arc<ShopContext>,
    lifecycle: Lifecycle,
    handles: Vec<JoinHandle<()>>,
}

impl Simulation {
    pub fn new(config: ShopConfig) -> Result<Simulation, SimulationError> {
        validate(&config)?;

        let delays = RandomDelays::new(&config)?;

        Simulation::with_delays(config, Arc::new(delays))
    }

    pub fn with_delays(
        config: ShopConfig,
        delays: Arc<dyn DelaySource>,
    ) -> Result<Simulation, SimulationError> {
        validate(&config)?;

        let context = Arc::new(ShopContext::new(&config, delays));

        Ok(Simulation {
            config,
            context,
            lifecycle: Lifecycle::Created,
            handles: Vec::new(),
        })
    }

    pub fn start(&mut self) -> Result<(), SimulationError> {
        match self.lifecycle {
            Lifecycle::Created => {}
            Lifecycle::Running => return Err(SimulationError::AlreadyStarted),
            Lifecycle::Stopped => return Err(SimulationError::Stopped),
        }

        self.lifecycle = Lifecycle::Running;

        info!(
            "opening shop: {} barbers, {} chairs, {:?} protocol",
            self.config.barbers, self.config.chairs, self.config.protocol
        );

        for index in 0..self.config.barbers as usize {
            let spawned = match self.config.protocol {
                Protocol::Safe => self.spawn_barber(index, SafeRoutine),
                Protocol::Buggy => {
                    self.spawn_barber(index, BuggyRoutine::new(self.config.poll_interval()))
                }
            };

            self.keep(spawned)?;
        }

        let generator = ArrivalGenerator::new(self.context.clone());
        let spawned = spawn("arrivals".to_string(), move || generator.run());

        self.keep(spawned)
    }

    /// Asks every thread to stop and returns without waiting for them.
    pub fn stop(&mut self) {
        if let Lifecycle::Running = self.lifecycle {
            info!("closing shop");

            self.context.token.cancel();

            for _ in 0..self.config.barbers {
                self.context.signals.signal();
            }
        }

        self.lifecycle = Lifecycle::Stopped;
    }

    /// Waits for every thread started by this simulation to exit.
    pub fn join(&mut self) {
        for handle in mem::replace(&mut self.handles, Vec::new()) {
            if handle.join().is_err() {
                error!("a simulation thread panicked");
            }
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.context.shop.snapshot()
    }

    pub fn config(&self) -> &ShopConfig {
        &self.config
    }

    fn spawn_barber<R: Routine>(
        &self,
        index: usize,
        routine: R,
    ) -> Result<JoinHandle<()>, SimulationError> {
        let barber = Barber::new(index, self.context.clone(), routine);

        spawn(format!("barber-{}", index), move || barber.run())
    }

    fn keep(
        &mut self,
        spawned: Result<JoinHandle<()>, SimulationError>,
    ) -> Result<(), SimulationError> {
        match spawned {
            Ok(handle) => {
                self.handles.push(handle);
                Ok(())
            }
            Err(error) => {
                self.stop();
                Err(error)
            }
        }
    }
}

impl Drop for Simulation {
    fn drop(&mut self) {
        self.stop();
    }
}

fn spawn<F>(name: String, f: F) -> Result<JoinHandle<()>, SimulationError>
where
    F: FnOnce() + Send + 'static,
{
    thread::Builder::new()
        .name(name.clone())
        .spawn(f)
        .map_err(|cause| SimulationError::Spawn { name, cause })
}
