// crates/logging/src/flags.rs
#![allow(missing_docs)]

use clap::ValueEnum;
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Default, ValueEnum)]
#[clap(rename_all = "kebab-case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Per-area switches that raise one tracing target to `TRACE`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, ValueEnum)]
#[clap(rename_all = "kebab-case")]
pub enum DebugFlag {
    Handoff,
    Fdpass,
    Clock,
}

impl DebugFlag {
    pub const fn as_str(self) -> &'static str {
        match self {
            DebugFlag::Handoff => "handoff",
            DebugFlag::Fdpass => "fdpass",
            DebugFlag::Clock => "clock",
        }
    }

    pub const fn target(self) -> &'static str {
        match self {
            DebugFlag::Handoff => "forkchan::handoff",
            DebugFlag::Fdpass => "forkchan::fdpass",
            DebugFlag::Clock => "forkchan::clock",
        }
    }
}

impl From<&DebugFlag> for DebugFlag {
    fn from(flag: &DebugFlag) -> Self {
        *flag
    }
}

/// Everything [`crate::subscriber`] needs to build the global subscriber.
///
/// The default logs warnings and errors as plain text to stderr.
#[derive(Clone, Debug, Default)]
pub struct SubscriberConfig {
    pub format: LogFormat,
    pub verbose: u8,
    /// Targets raised to `TRACE` regardless of `verbose`.
    pub debug: Vec<DebugFlag>,
    pub quiet: bool,
    /// Appended to in addition to stderr.
    pub log_file: Option<PathBuf>,
    pub colored: bool,
    pub timestamps: bool,
}

#[derive(Default)]
#[must_use]
pub struct SubscriberConfigBuilder {
    cfg: SubscriberConfig,
}

impl SubscriberConfig {
    pub fn builder() -> SubscriberConfigBuilder {
        SubscriberConfigBuilder::default()
    }
}

impl SubscriberConfigBuilder {
    pub fn format(mut self, format: LogFormat) -> Self {
        self.cfg.format = format;
        self
    }

    pub fn verbose(mut self, verbose: u8) -> Self {
        self.cfg.verbose = verbose;
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
        self.cfg.debug = debug;
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.cfg.quiet = quiet;
        self
    }

    pub fn log_file(mut self, log_file: Option<PathBuf>) -> Self {
        self.cfg.log_file = log_file;
        self
    }

    pub fn colored(mut self, colored: bool) -> Self {
        self.cfg.colored = colored;
        self
    }

    pub fn timestamps(mut self, timestamps: bool) -> Self {
        self.cfg.timestamps = timestamps;
        self
    }

    pub fn build(self) -> SubscriberConfig {
        self.cfg
    }
}
