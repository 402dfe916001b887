#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;

use barbershop::config::{self, Protocol, SystemConfig};
use barbershop::console::{self, Frame};
use barbershop::shop::{self, Simulation};
use barbershop::watchdog::{Verdict, Watchdog};
use failure::Error;
use std::env;
use std::fs::File;
use std::process;
use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug, Fail)]
#[fail(display = "validation failed because of \"{}\"", error)]
struct ValidationError {
    error: String,
}

fn validate_config(config: &config::SystemConfig) -> Result<(), Error> {
    shop::validate(&config.shop)?;

    if config.watchdog.detection_timeout_ms == 0 {
        return Err(ValidationError {
            error: "watchdog detection timeout must be positive".to_string(),
        }
        .into());
    }

    if config.runner.refresh_ms == 0 {
        return Err(ValidationError {
            error: "refresh interval must be positive".to_string(),
        }
        .into());
    }

    Ok(())
}

fn get_config(path: &str) -> Result<config::SystemConfig, Error> {
    let file = File::open(path)?;

    let config = serde_json::from_reader(file)?;

    Ok(config)
}

enum Output {
    Text,
    Json,
}

struct Options {
    config: SystemConfig,
    output: Output,
}

fn parse_args(args: &[String]) -> Result<Options, Error> {
    let mut config_path = None;
    let mut protocol = None;
    let mut output = Output::Text;

    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "-json" => output = Output::Json,
            "-safe" => protocol = Some(Protocol::Safe),
            "-buggy" => protocol = Some(Protocol::Buggy),
            path => config_path = Some(path.to_string()),
        }
    }

    let mut config = match config_path {
        Some(path) => get_config(&path)?,
        None => get_config(&format!("{}/config.json", env!("CARGO_MANIFEST_DIR")))
            .unwrap_or(SystemConfig::default()),
    };

    if let Some(protocol) = protocol {
        config.shop.protocol = protocol;
    }

    Ok(Options { config, output })
}

fn render(frame: &Frame, output: &Output) -> Result<(), Error> {
    match output {
        Output::Text => println!("{}", frame.to_text()),
        Output::Json => println!("{}", frame.to_json()?),
    }

    Ok(())
}

fn run(options: Options) -> Result<(), Error> {
    let config = options.config;

    validate_config(&config)?;

    let mut simulation = Simulation::new(config.shop.clone())?;

    let started = Instant::now();
    let mut watchdog = Watchdog::new(&config.watchdog, started);

    simulation.start()?;

    let refresh = Duration::from_millis(config.runner.refresh_ms);
    let run_time = Duration::from_secs(config.runner.run_time_secs);

    while started.elapsed() < run_time {
        thread::sleep(refresh);

        let now = Instant::now();
        let snapshot = simulation.snapshot();

        let verdict = watchdog.observe(&snapshot, now);
        let alert = watchdog.is_alert_active(now);

        // While paused only the frame that raised the alert is shown.
        if alert && config.watchdog.pause_on_alert {
            if verdict == (Verdict::Stalled { newly_raised: true }) {
                let frame = Frame::new(now - started, alert, watchdog.deadlock_count(), &snapshot);
                render(&frame, &options.output)?;
                info!("rendering paused until the alert clears");
            }

            continue;
        }

        let frame = Frame::new(now - started, alert, watchdog.deadlock_count(), &snapshot);
        render(&frame, &options.output)?;
    }

    simulation.stop();
    simulation.join();

    println!(
        "{}",
        console::summary(&simulation.snapshot(), watchdog.deadlock_count())
    );

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();

    if let Err(error) = parse_args(&args).and_then(run) {
        error!("{}", error);

        for cause in error.iter_causes() {
            error!("caused by: {}", cause);
        }

        process::exit(1);
    }
}
