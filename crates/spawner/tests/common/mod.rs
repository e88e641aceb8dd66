// crates/spawner/tests/common/mod.rs
#![allow(dead_code)]

use std::io;
use std::os::fd::RawFd;
use std::panic::{AssertUnwindSafe, catch_unwind};

use transport::{ControlChannel, Transport};

/// Runs `f` in a forked test child and leaves without unwinding back into
/// the test harness.
pub fn in_child<F>(f: F) -> !
where
    F: FnOnce() -> io::Result<()>,
{
    let ok = matches!(catch_unwind(AssertUnwindSafe(f)), Ok(Ok(())));
    // SAFETY: `_exit` skips atexit handlers and the harness's buffered output.
    unsafe { libc::_exit(if ok { 0 } else { 1 }) }
}

/// Child side: reads four bytes from the rewired control slot and sends
/// them back.
pub fn echo_once(control: RawFd) -> io::Result<()> {
    // SAFETY: the slot stays open until the child exits.
    let mut ch = unsafe { ControlChannel::borrow_raw(control) };
    let mut buf = [0u8; 4];
    ch.receive_exact(&mut buf)?;
    ch.send(&buf)
}

pub fn send_u32(control: RawFd, value: u32) -> io::Result<()> {
    // SAFETY: as in `echo_once`.
    let mut ch = unsafe { ControlChannel::borrow_raw(control) };
    ch.send(&value.to_ne_bytes())
}

pub fn recv_u32<T: Transport>(t: &mut T) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    t.receive_exact(&mut buf)?;
    Ok(u32::from_ne_bytes(buf))
}

#[cfg(target_os = "linux")]
pub fn open_fds() -> usize {
    std::fs::read_dir("/proc/self/fd").unwrap().count()
}
