// crates/spawner/src/fatal.rs
use std::io::{self, Write};
use std::os::fd::AsFd;
use transport::retry_eintr;

use crate::error::SpawnError;

/// Reports `err` and aborts the process.
///
/// Nothing is unwound: once the socket pair exists or the fork has happened,
/// descriptor and process state cannot be rolled back.
pub fn abort_with(err: &SpawnError) -> ! {
    tracing::error!(target: "forkchan::handoff", step = err.step(), "{err}");
    let _ = writeln!(io::stderr(), "forkchan: {} failed: {err}", err.step());
    std::process::abort()
}

/// Child-side variant of [`abort_with`] for the window between fork and
/// return.
///
/// A lock held by another thread at fork time is never released in the
/// child, so this path takes no locks and allocates nothing: the message is
/// assembled from static strings and written straight to descriptor 2.
pub fn abort_in_child(err: &SpawnError) -> ! {
    let errno = match err {
        SpawnError::Dup2(e)
        | SpawnError::Close { source: e, .. }
        | SpawnError::Signal(e)
        | SpawnError::Clock(e)
        | SpawnError::SocketPair(e)
        | SpawnError::Fork(e) => Some(*e),
        _ => None,
    };
    raw_stderr(b"forkchan: ");
    raw_stderr(err.step().as_bytes());
    raw_stderr(b" failed in child");
    if let Some(e) = errno {
        raw_stderr(b": ");
        raw_stderr(e.desc().as_bytes());
    }
    raw_stderr(b"\n");
    std::process::abort()
}

fn raw_stderr(mut msg: &[u8]) {
    let stderr = io::stderr();
    while !msg.is_empty() {
        match retry_eintr(|| nix::unistd::write(stderr.as_fd(), msg)) {
            Ok(0) | Err(_) => return,
            Ok(n) => msg = &msg[n..],
        }
    }
}
