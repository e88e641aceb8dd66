// src/lib.rs
//! Spawn worker processes that each get a private socket to a driver.
//!
//! The calling process already holds a control channel to the driver. Every
//! spawn forks, rewires the child's control descriptor to a fresh socket and
//! passes the other end to the driver together with the child's pid. The
//! parent returns only after the driver answers `DONE`.
//!
//! ```no_run
//! use forkchan::{Config, Role, Spawner};
//! use std::os::fd::AsFd;
//!
//! let cfg = Config::from_env()?;
//! forkchan::init_logging(&cfg)?;
//! // SAFETY: FORKCHAN_FD names a descriptor inherited from the driver that
//! // stays open for the life of the process.
//! let control = unsafe { cfg.control_channel() };
//! let mut spawner = Spawner::new(control.as_fd())?;
//! match spawner.spawn() {
//!     Role::Parent { child } => println!("spawned {child}"),
//!     Role::Child => { /* talk to the driver over FORKCHAN_FD */ }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;

pub use config::{CONTROL_FD_ENV, Config, ConfigBuilder, ConfigError, LOG_FORMAT_ENV};
pub use logging::{DebugFlag, LogFormat};
pub use protocol::{Handoff, Tag};
pub use spawner::{
    Pid, ProcessClock, ReceivedHandoff, Role, SpawnError, Spawner, accept_handoff, acknowledge,
    child_reaping_initialized, init_child_reaping, spawn_with_channel,
};
pub use transport::{ControlChannel, Transport};

/// Installs the global `tracing` subscriber described by `cfg`.
pub fn init_logging(cfg: &Config) -> std::io::Result<()> {
    logging::init(cfg.subscriber_config())
}
