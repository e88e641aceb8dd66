// crates/transport/src/channel.rs
use nix::sys::socket::{MsgFlags, recv, send};
use std::io;
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, RawFd};

use crate::Transport;
use crate::retry::retry_eintr;

/// A borrowed, connected stream socket to the peer on the other side of a
/// control channel.
///
/// The wrapper never closes the descriptor; whoever created the socket keeps
/// ownership of it.
#[derive(Debug, Clone, Copy)]
pub struct ControlChannel<'fd> {
    fd: BorrowedFd<'fd>,
}

impl<'fd> ControlChannel<'fd> {
    pub fn new(fd: BorrowedFd<'fd>) -> Self {
        Self { fd }
    }

    /// Wraps a raw descriptor number, such as one inherited from a parent.
    ///
    /// # Safety
    /// `fd` must be open for the whole lifetime `'fd`.
    pub unsafe fn borrow_raw(fd: RawFd) -> Self {
        // SAFETY: forwarded to the caller.
        Self::new(unsafe { BorrowedFd::borrow_raw(fd) })
    }

    pub fn write_all(&self, mut data: &[u8]) -> io::Result<()> {
        while !data.is_empty() {
            let n = retry_eintr(|| send(self.fd.as_raw_fd(), data, send_flags()))?;
            if n == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "control channel accepted no bytes",
                ));
            }
            data = &data[n..];
        }
        Ok(())
    }

    pub fn read(&self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(retry_eintr(|| recv(self.fd.as_raw_fd(), &mut *buf, MsgFlags::empty()))?)
    }
}

impl AsFd for ControlChannel<'_> {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.fd
    }
}

impl AsRawFd for ControlChannel<'_> {
    fn as_raw_fd(&self) -> RawFd {
        self.fd.as_raw_fd()
    }
}

impl Transport for ControlChannel<'_> {
    fn send(&mut self, data: &[u8]) -> io::Result<()> {
        self.write_all(data)
    }

    fn receive(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read(buf)
    }
}

/// Writes to a peer that hung up report `EPIPE` instead of raising `SIGPIPE`.
#[cfg(any(target_os = "linux", target_os = "android", target_os = "freebsd"))]
pub(crate) fn send_flags() -> MsgFlags {
    MsgFlags::MSG_NOSIGNAL
}

#[cfg(not(any(target_os = "linux", target_os = "android", target_os = "freebsd")))]
pub(crate) fn send_flags() -> MsgFlags {
    MsgFlags::empty()
}
