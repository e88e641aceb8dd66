// crates/spawner/src/driver.rs
//! The driver's half of the handoff: receive one announcement, answer it.
//!
//! Only what a driver needs to take part in a single exchange lives here;
//! multiplexing the resulting channels is up to the driver.

use protocol::{HANDOFF_LEN, Handoff, Tag};
use std::io;
use std::os::fd::OwnedFd;
use transport::{ControlChannel, Transport};

/// A child announcement together with the channel endpoint it carried.
#[derive(Debug)]
pub struct ReceivedHandoff {
    pub handoff: Handoff,
    pub channel: OwnedFd,
}

/// Reads one handoff message and its descriptor from `control`.
///
/// A message without exactly one descriptor is rejected; any descriptor
/// that did arrive is closed.
pub fn accept_handoff(control: &ControlChannel<'_>) -> io::Result<ReceivedHandoff> {
    let mut buf = [0u8; HANDOFF_LEN];
    let fd = control.recv_exact_with_fd(&mut buf)?;
    let handoff = Handoff::from_bytes(&buf)?;
    let channel = fd.ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidData, "handoff carried no descriptor")
    })?;
    tracing::debug!(
        target: "forkchan::fdpass",
        pid = handoff.pid,
        generation = handoff.generation,
        "handoff received"
    );
    Ok(ReceivedHandoff { handoff, channel })
}

/// Tells the spawning parent its handoff has been registered.
pub fn acknowledge<T: Transport>(control: &mut T) -> io::Result<()> {
    control.send(&Tag::Done.bytes())
}
