// crates/spawner/src/lib.rs
//! Fork a worker and hand it a private channel, announcing the other end of
//! that channel to a driver process.
//!
//! The announcement is a single `sendmsg` carrying the `CHLD` tag, a
//! generation tag, the child's pid and the driver's socket endpoint as
//! `SCM_RIGHTS` ancillary data. The parent then waits for the driver's `DONE`
//! before [`spawn_with_channel`] returns, so by the time the caller acts on
//! the child the driver already knows which channel belongs to it.
//!
//! Descriptor passing makes this Unix-only.

#[cfg(not(unix))]
compile_error!("spawner requires a Unix target for SCM_RIGHTS descriptor passing");

mod clock;
pub mod driver;
mod error;
pub mod fatal;
mod os;
mod spawn;
mod spawner;

pub use clock::ProcessClock;
pub use driver::{ReceivedHandoff, accept_handoff, acknowledge};
pub use error::SpawnError;
pub use nix::unistd::Pid;
pub use spawn::{Role, child_reaping_initialized, init_child_reaping, spawn_with_channel};
pub use spawner::Spawner;
