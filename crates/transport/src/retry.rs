// crates/transport/src/retry.rs
use nix::errno::Errno;
use std::os::fd::{IntoRawFd, OwnedFd};

/// Re-issues `f` for as long as it fails with `EINTR`.
pub fn retry_eintr<T, F>(mut f: F) -> nix::Result<T>
where
    F: FnMut() -> nix::Result<T>,
{
    loop {
        match f() {
            Err(Errno::EINTR) => continue,
            other => return other,
        }
    }
}

/// Closes `fd` and reports the result, which dropping an `OwnedFd` discards.
///
/// `EINTR` counts as success: the descriptor is released either way and
/// retrying could close a number another thread has since reused.
pub fn close_fd(fd: OwnedFd) -> nix::Result<()> {
    let raw = fd.into_raw_fd();
    // SAFETY: `raw` came out of an `OwnedFd`, so nothing else closes it.
    match Errno::result(unsafe { libc::close(raw) }) {
        Ok(_) | Err(Errno::EINTR) => Ok(()),
        Err(e) => Err(e),
    }
}
