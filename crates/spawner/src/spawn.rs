// crates/spawner/src/spawn.rs
use nix::unistd::{ForkResult, Pid};
use protocol::{HANDOFF_LEN, Handoff, TAG_LEN, Tag};
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, OwnedFd};
use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};
use transport::{ControlChannel, Transport, close_fd};

use crate::error::SpawnError;
use crate::{fatal, os};

static CHILD_REAPING: Once = Once::new();
static CHILD_REAPING_READY: AtomicBool = AtomicBool::new(false);

/// Which side of the fork a spawn call returned in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The caller's own process; `child` has been announced and acknowledged.
    Parent { child: Pid },
    /// The new process. Its control channel descriptor now refers to the
    /// private socket the driver was handed.
    Child,
}

impl Role {
    pub fn is_child(&self) -> bool {
        matches!(self, Role::Child)
    }

    pub fn child_pid(&self) -> Option<Pid> {
        match self {
            Role::Parent { child } => Some(*child),
            Role::Child => None,
        }
    }
}

/// Sets `SIGCHLD` to `SIG_IGN` so exited children never need `wait`.
///
/// Runs once per process no matter how often it is called. Aborts if the
/// disposition cannot be changed.
pub fn init_child_reaping() {
    CHILD_REAPING.call_once(|| {
        if let Err(e) = os::ignore_child_exit() {
            fatal::abort_with(&SpawnError::Signal(e));
        }
        tracing::debug!(target: "forkchan::handoff", "SIGCHLD ignored, children reaped by the kernel");
        CHILD_REAPING_READY.store(true, Ordering::Release);
    });
}

pub fn child_reaping_initialized() -> bool {
    CHILD_REAPING_READY.load(Ordering::Acquire)
}

/// Forks a child that gets a private channel to the driver.
///
/// A fresh socket pair is created. In the child, one end replaces the
/// descriptor behind `control`. In the parent, the other end is announced to
/// the driver over `control` together with `generation` and the child's pid,
/// and the call returns only once the driver has answered `DONE`.
///
/// Any failure aborts the process after printing the failing step.
pub fn spawn_with_channel(control: BorrowedFd<'_>, generation: u32) -> Role {
    init_child_reaping();
    match handoff(control, generation) {
        Ok(role) => role,
        Err(e) => fatal::abort_with(&e),
    }
}

fn handoff(control: BorrowedFd<'_>, generation: u32) -> Result<Role, SpawnError> {
    let (driver_end, child_end) = os::socket_pair().map_err(SpawnError::SocketPair)?;
    match os::fork_child().map_err(SpawnError::Fork)? {
        ForkResult::Child => {
            if let Err(e) = rewire_child(control, driver_end, child_end) {
                fatal::abort_in_child(&e);
            }
            Ok(Role::Child)
        }
        ForkResult::Parent { child } => {
            let mut channel = ControlChannel::new(control);
            announce(&channel, generation, child, driver_end, child_end)?;
            await_ack(&mut channel)?;
            tracing::debug!(target: "forkchan::handoff", %child, generation, "driver acknowledged");
            Ok(Role::Parent { child })
        }
    }
}

// Runs between fork and return in the child: no logging, no allocation.
// Failures go through `fatal::abort_in_child`.
fn rewire_child(
    control: BorrowedFd<'_>,
    driver_end: OwnedFd,
    child_end: OwnedFd,
) -> Result<(), SpawnError> {
    os::dup_onto(child_end.as_fd(), control.as_raw_fd()).map_err(SpawnError::Dup2)?;
    close_fd(child_end).map_err(|source| SpawnError::Close {
        what: "child endpoint",
        source,
    })?;
    close_fd(driver_end).map_err(|source| SpawnError::Close {
        what: "driver endpoint",
        source,
    })
}

fn announce(
    channel: &ControlChannel<'_>,
    generation: u32,
    child: Pid,
    driver_end: OwnedFd,
    child_end: OwnedFd,
) -> Result<(), SpawnError> {
    let msg = Handoff::new(generation, child.as_raw());
    let sent = channel
        .send_with_fd(&msg.to_bytes(), driver_end.as_fd())
        .map_err(SpawnError::Send)?;
    if sent != HANDOFF_LEN {
        return Err(SpawnError::ShortSend { sent });
    }
    tracing::debug!(target: "forkchan::handoff", %child, generation, "handoff sent");
    close_fd(driver_end).map_err(|source| SpawnError::Close {
        what: "driver endpoint",
        source,
    })?;
    close_fd(child_end).map_err(|source| SpawnError::Close {
        what: "child endpoint",
        source,
    })
}

/// Blocks until the peer sends the four-byte `DONE` tag.
pub(crate) fn await_ack<T: Transport>(channel: &mut T) -> Result<(), SpawnError> {
    let mut ack = [0u8; TAG_LEN];
    channel.receive_exact(&mut ack).map_err(SpawnError::AckRead)?;
    if ack != Tag::Done.bytes() {
        return Err(SpawnError::BadAck(ack));
    }
    Ok(())
}
