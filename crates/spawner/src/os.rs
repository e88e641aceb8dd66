// crates/spawner/src/os.rs
#![allow(unsafe_code)]

use nix::errno::Errno;
use nix::sys::signal::{SigHandler, Signal, signal};
use nix::sys::socket::{AddressFamily, SockFlag, SockType, socketpair};
use nix::unistd::{ForkResult, fork};
use std::os::fd::{AsRawFd, BorrowedFd, OwnedFd, RawFd};
use transport::retry_eintr;

/// Fork the calling process.
///
/// # Safety
/// Safe to call because the child only runs async-signal-safe code (`dup2`,
/// `close`) before it returns from the spawn call; what the caller does after
/// that is its own business, as with any fork.
pub(crate) fn fork_child() -> nix::Result<ForkResult> {
    // SAFETY: see above.
    unsafe { fork() }
}

/// Let the kernel reap terminated children instead of leaving zombies.
pub(crate) fn ignore_child_exit() -> nix::Result<()> {
    // SAFETY: `SigIgn` installs no handler code, so no signal-safety rules
    // apply to it.
    unsafe { signal(Signal::SIGCHLD, SigHandler::SigIgn) }.map(drop)
}

#[cfg(any(target_os = "linux", target_os = "android", target_os = "freebsd"))]
fn pair_flags() -> SockFlag {
    SockFlag::SOCK_CLOEXEC
}

#[cfg(not(any(target_os = "linux", target_os = "android", target_os = "freebsd")))]
fn pair_flags() -> SockFlag {
    SockFlag::empty()
}

/// A connected `AF_UNIX` stream pair, close-on-exec where supported.
pub(crate) fn socket_pair() -> nix::Result<(OwnedFd, OwnedFd)> {
    retry_eintr(|| socketpair(AddressFamily::Unix, SockType::Stream, None, pair_flags()))
}

/// Duplicate `src` onto descriptor number `target`, replacing whatever was
/// open there. The new descriptor does not carry `FD_CLOEXEC`.
pub(crate) fn dup_onto(src: BorrowedFd<'_>, target: RawFd) -> nix::Result<()> {
    retry_eintr(|| {
        // SAFETY: `dup2` only manipulates the descriptor table; `target` is
        // the caller's own control channel slot, which it asked to replace.
        Errno::result(unsafe { libc::dup2(src.as_raw_fd(), target) })
    })
    .map(drop)
}
