//! # EVO Try Demo
//!
//! Command-line walkthrough of the `evo_try` propagation and recovery
//! helpers.
//!
//! # Usage
//!
//! ```bash
//! # Parse values in parallel; failures are reported together
//! evo_try_demo parse 12 7 abc 30 x9
//!
//! # Bound check with `require`, recovered by `call`
//! evo_try_demo assert 512 --min 1024
//!
//! # Fire-and-forget a panicking worker; the process keeps running
//! evo_try_demo --log-level debug spawn
//! ```

#![deny(warnings)]

use clap::{Parser, Subcommand, ValueEnum};
use evo_try::prelude::*;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::mpsc;
use std::time::Duration;
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Log level for demo output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

/// EVO Try Demo - panic/recover helpers in action
#[derive(Parser, Debug)]
#[command(name = "evo_try_demo")]
#[command(author = "RTS007")]
#[command(version)]
#[command(about = "Walkthrough of evo_try propagation and recovery helpers")]
#[command(long_about = None)]
struct Args {
    /// Logging verbosity
    #[arg(short, long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Output logs in JSON format
    #[arg(long)]
    json: bool,

    /// Install the panic hook rendering raised errors through the log
    #[arg(long)]
    hook: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse every value as an integer on its own thread and sum them
    Parse {
        /// Values to parse
        #[arg(required = true)]
        values: Vec<String>,
    },
    /// Require a value to be at least `--min`
    Assert {
        /// Value to check
        value: i64,
        /// Lower bound (inclusive)
        #[arg(long, default_value_t = 0)]
        min: i64,
    },
    /// Start a detached worker that panics
    Spawn,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = run() {
        error!("demo failed: {}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    setup_tracing(&args);

    if args.hook {
        evo_try::install_panic_hook();
    }

    match args.command {
        Command::Parse { values } => {
            parse_all(&values)?;
        }
        Command::Assert { value, min } => check_bound(value, min)?,
        Command::Spawn => spawn_detached()?,
    }
    Ok(())
}

/// Running sum shared by the parse workers.
#[derive(Debug, Default)]
struct Total(AtomicI64);

impl Total {
    fn add(&self, value: i64) {
        self.0.fetch_add(value, Ordering::Relaxed);
    }

    fn get(&self) -> i64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Sum all values; every unparsable one is reported in the combined error.
fn parse_all(values: &[String]) -> Result<i64, Error> {
    let total = Total::default();
    let jobs = values.iter().map(|raw| {
        let total = &total;
        move || total.add(val(raw.trim().parse::<i64>()))
    });

    match parallel(jobs) {
        Ok(()) => {
            let sum = total.get();
            info!("sum of {} values = {}", values.len(), sum);
            Ok(sum)
        }
        Err(err) => {
            for part in err.components() {
                warn!("rejected: {}", part);
            }
            Err(err)
        }
    }
}

fn check_bound(value: i64, min: i64) -> Result<(), Error> {
    call(|| require(value >= min, format!("{value} is below minimum {min}")))?;
    info!("{value} >= {min}");
    Ok(())
}

fn spawn_detached() -> Result<(), Error> {
    let (tx, rx) = mpsc::channel();
    go(move || {
        let _ = tx.send(());
        require(false, "detached worker gave up");
    })?;

    if rx.recv_timeout(Duration::from_secs(5)).is_err() {
        warn!("detached worker did not start in time");
    }
    // Let the worker finish unwinding before reporting.
    std::thread::sleep(Duration::from_millis(50));
    info!("main thread still running after detached panic");
    Ok(())
}

fn setup_tracing(args: &Args) {
    let level: Level = args.log_level.into();
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_thread_names(true)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_thread_names(true)
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_all_sums_valid_values() {
        let values = ["1", " 2", "39"].map(String::from);
        assert_eq!(parse_all(&values).expect("all values parse"), 42);
    }

    #[test]
    fn parse_all_reports_every_bad_value() {
        let values = ["1", "abc", "3", "x9"].map(String::from);
        let err = parse_all(&values).expect_err("two bad values");
        assert_eq!(err.components().len(), 2);
    }

    #[test]
    fn check_bound_recovers_require() {
        assert!(check_bound(2048, 1024).is_ok());
        let err = check_bound(512, 1024).expect_err("below minimum");
        assert!(err.to_string().contains("512 is below minimum 1024"));
    }

    #[test]
    fn cli_parses_subcommands() {
        let args = Args::try_parse_from(["evo_try_demo", "-l", "debug", "assert", "5", "--min", "3"])
            .expect("valid args");
        assert_eq!(args.log_level, LogLevel::Debug);
        assert!(matches!(args.command, Command::Assert { value: 5, min: 3 }));
    }
}
