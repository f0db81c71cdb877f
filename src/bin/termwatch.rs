use clap::Parser;
use log::{debug, info, LevelFilter};

use termwatch::cli::{Cli, OutputFormat};
use termwatch::{Monitor, Report};

fn main() {
    let cli = Cli::parse();

    // Initialize logging based on verbosity flags
    let log_level = if cli.quiet {
        LevelFilter::Error
    } else {
        match cli.verbosity {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_target(false)
        .format_timestamp(None)
        .init();

    if let Err(err) = Monitor::install() {
        log::error!("{}", err);
        std::process::exit(1);
    }
    println!("armed pid={}", std::process::id());

    let monitor = Monitor::global();
    let received = match cli.timeout() {
        Some(timeout) => {
            debug!("Waiting up to {:?}", timeout);
            monitor.wait_timeout(cli.poll_interval(), timeout)
        }
        None => Some(monitor.wait(cli.poll_interval())),
    };

    match received {
        Some(signal) => info!("Received {}, shutting down", signal),
        None => info!("Timed out without a termination signal"),
    }

    let report = Report::capture(monitor);
    match cli.format {
        OutputFormat::Text => println!("{}", report),
        OutputFormat::Json => match report.to_json() {
            Ok(json) => println!("{}", json),
            Err(err) => {
                log::error!("Failed to serialize report: {}", err);
                std::process::exit(1);
            }
        },
    }
}
