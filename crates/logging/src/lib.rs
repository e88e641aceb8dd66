// crates/logging/src/lib.rs

use std::fs::OpenOptions;
use std::io;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, fmt as tracing_fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

mod flags;
mod formatter;
mod sink;

pub use flags::{DebugFlag, LogFormat, SubscriberConfig, SubscriberConfigBuilder};
pub use formatter::LineFormatter;

use crate::sink::FileWriter;

/// Level implied by `quiet` and the verbosity count.
pub fn base_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::ERROR
    } else if verbose > 2 {
        LevelFilter::TRACE
    } else if verbose > 1 {
        LevelFilter::DEBUG
    } else if verbose > 0 {
        LevelFilter::INFO
    } else {
        LevelFilter::WARN
    }
}

pub fn subscriber(cfg: SubscriberConfig) -> io::Result<Box<dyn tracing::Subscriber + Send + Sync>> {
    let SubscriberConfig {
        format,
        verbose,
        debug,
        quiet,
        log_file,
        colored,
        timestamps,
    } = cfg;
    let mut level = base_level(verbose, quiet);
    if !quiet && !debug.is_empty() && level < LevelFilter::DEBUG {
        level = LevelFilter::DEBUG;
    }
    let mut filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    if !quiet {
        for flag in &debug {
            let directive: tracing_subscriber::filter::Directive =
                format!("{}=trace", flag.target())
                    .parse()
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
            filter = filter.add_directive(directive);
        }
    }

    let base = tracing_fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(colored);
    let stderr_layer = match format {
        LogFormat::Json if timestamps => base.json().boxed(),
        LogFormat::Json => base.json().without_time().boxed(),
        LogFormat::Text => base.event_format(LineFormatter::new(timestamps)).boxed(),
    };

    let file_layer = if let Some(path) = log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let base = tracing_fmt::layer()
            .with_writer(FileWriter { file })
            .with_ansi(false);
        let layer = match format {
            LogFormat::Json => base.json().boxed(),
            LogFormat::Text => base.event_format(LineFormatter::new(timestamps)).boxed(),
        };
        Some(layer)
    } else {
        None
    };

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer);
    Ok(Box::new(registry))
}

pub fn init(cfg: SubscriberConfig) -> io::Result<()> {
    subscriber(cfg)?
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::AlreadyExists, e))
}
