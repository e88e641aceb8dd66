// src/config.rs

use clap::ValueEnum;
use logging::{DebugFlag, LogFormat, SubscriberConfig};
use std::os::fd::RawFd;
use thiserror::Error;
use transport::ControlChannel;

/// Environment variable naming the inherited control channel descriptor.
pub const CONTROL_FD_ENV: &str = "FORKCHAN_FD";
pub const LOG_FORMAT_ENV: &str = "FORKCHAN_LOG_FORMAT";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no control descriptor configured (set FORKCHAN_FD)")]
    MissingControlFd,
    #[error("invalid control descriptor {0:?}")]
    InvalidControlFd(String),
    #[error("control descriptor must be non-negative, got {0}")]
    NegativeControlFd(RawFd),
    #[error("invalid log format {0:?}: expected text or json")]
    InvalidLogFormat(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Settings for a process that spawns workers over an inherited control
/// channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    control_fd: RawFd,
    pub log_format: LogFormat,
    pub verbose: u8,
    pub quiet: bool,
    pub debug: Vec<DebugFlag>,
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reads [`CONTROL_FD_ENV`] and [`LOG_FORMAT_ENV`] from the process
    /// environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`Config::from_env`] with a caller-supplied variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Config::builder();
        if let Some(raw) = lookup(CONTROL_FD_ENV) {
            let fd = raw
                .trim()
                .parse::<RawFd>()
                .map_err(|_| ConfigError::InvalidControlFd(raw.clone()))?;
            builder = builder.control_fd(fd);
        }
        if let Some(raw) = lookup(LOG_FORMAT_ENV) {
            let format = LogFormat::from_str(raw.trim(), true)
                .map_err(|_| ConfigError::InvalidLogFormat(raw.clone()))?;
            builder = builder.log_format(format);
        }
        builder.build()
    }

    pub fn control_fd(&self) -> RawFd {
        self.control_fd
    }

    /// Borrows the control descriptor without taking ownership of it.
    ///
    /// # Safety
    /// The descriptor must stay open while the returned channel is in use.
    pub unsafe fn control_channel(&self) -> ControlChannel<'_> {
        // SAFETY: forwarded to the caller.
        unsafe { ControlChannel::borrow_raw(self.control_fd) }
    }

    pub fn subscriber_config(&self) -> SubscriberConfig {
        SubscriberConfig::builder()
            .format(self.log_format)
            .verbose(self.verbose)
            .quiet(self.quiet)
            .debug(&self.debug)
            .build()
    }
}

#[derive(Debug, Default)]
#[must_use]
pub struct ConfigBuilder {
    control_fd: Option<RawFd>,
    log_format: LogFormat,
    verbose: u8,
    quiet: bool,
    debug: Vec<DebugFlag>,
}

impl ConfigBuilder {
    pub fn control_fd(mut self, fd: RawFd) -> Self {
        self.control_fd = Some(fd);
        self
    }

    pub fn log_format(mut self, log_format: LogFormat) -> Self {
        self.log_format = log_format;
        self
    }

    pub fn verbose(mut self, verbose: u8) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn debug<I>(mut self, debug: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<DebugFlag>,
    {
        let mut debug = debug.into_iter().map(Into::into).collect::<Vec<_>>();
        debug.sort_by_key(|flag| flag.as_str());
        debug.dedup();
        self.debug = debug;
        self
    }

    pub fn build(self) -> Result<Config> {
        let control_fd = self.control_fd.ok_or(ConfigError::MissingControlFd)?;
        if control_fd < 0 {
            return Err(ConfigError::NegativeControlFd(control_fd));
        }
        Ok(Config {
            control_fd,
            log_format: self.log_format,
            verbose: self.verbose,
            quiet: self.quiet,
            debug: self.debug,
        })
    }
}
