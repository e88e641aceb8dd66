// crates/spawner/src/error.rs
use nix::errno::Errno;
use std::io;
use thiserror::Error;

/// A failed step of the handoff. Every variant is fatal to the spawning
/// process; see [`crate::fatal`].
#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("signal(SIGCHLD, SIG_IGN): {0}")]
    Signal(#[source] Errno),
    #[error("reading process clock: {0}")]
    Clock(#[source] Errno),
    #[error("socketpair: {0}")]
    SocketPair(#[source] Errno),
    #[error("fork: {0}")]
    Fork(#[source] Errno),
    #[error("dup2 onto control channel: {0}")]
    Dup2(#[source] Errno),
    #[error("close {what}: {source}")]
    Close { what: &'static str, source: Errno },
    #[error("sending handoff: {0}")]
    Send(#[source] io::Error),
    #[error("short handoff send: {sent} of {} bytes", protocol::HANDOFF_LEN)]
    ShortSend { sent: usize },
    #[error("reading acknowledgement: {0}")]
    AckRead(#[source] io::Error),
    #[error("unexpected acknowledgement {:?}", .0.escape_ascii().to_string())]
    BadAck([u8; 4]),
}

impl SpawnError {
    /// Name of the failing system call or protocol step.
    pub fn step(&self) -> &'static str {
        match self {
            SpawnError::Signal(_) => "signal",
            SpawnError::Clock(_) => "clock_gettime",
            SpawnError::SocketPair(_) => "socketpair",
            SpawnError::Fork(_) => "fork",
            SpawnError::Dup2(_) => "dup2",
            SpawnError::Close { .. } => "close",
            SpawnError::Send(_) | SpawnError::ShortSend { .. } => "sendmsg",
            SpawnError::AckRead(_) | SpawnError::BadAck(_) => "acknowledgement",
        }
    }
}
