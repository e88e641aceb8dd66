// crates/spawner/src/spawner.rs
use std::os::fd::{AsFd, BorrowedFd};

use crate::clock::{ProcessClock, millis};
use crate::error::SpawnError;
use crate::fatal;
use crate::spawn::{Role, spawn_with_channel};

/// A control channel paired with the clock that stamps its spawns.
///
/// Each spawn is tagged with the process CPU time in milliseconds, and the
/// child's copy of the clock keeps counting from the fork point.
#[derive(Debug)]
pub struct Spawner<'fd> {
    control: BorrowedFd<'fd>,
    clock: ProcessClock,
}

impl<'fd> Spawner<'fd> {
    pub fn new(control: BorrowedFd<'fd>) -> Result<Self, SpawnError> {
        let clock = ProcessClock::new().map_err(SpawnError::Clock)?;
        Ok(Self { control, clock })
    }

    pub fn with_clock(control: BorrowedFd<'fd>, clock: ProcessClock) -> Self {
        Self { control, clock }
    }

    pub fn clock(&self) -> &ProcessClock {
        &self.clock
    }

    /// Spawns with the current clock reading as generation tag.
    pub fn spawn(&mut self) -> Role {
        let at_fork = self
            .clock
            .elapsed()
            .unwrap_or_else(|e| fatal::abort_with(&SpawnError::Clock(e)));
        let generation = millis(at_fork);
        tracing::trace!(target: "forkchan::clock", generation, "stamping spawn");
        let role = spawn_with_channel(self.control, generation);
        if role.is_child() {
            if let Err(e) = self.clock.rebase_after_fork(at_fork) {
                fatal::abort_with(&SpawnError::Clock(e));
            }
        }
        role
    }
}

impl AsFd for Spawner<'_> {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.control
    }
}
