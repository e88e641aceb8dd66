// crates/transport/src/fdpass.rs
use nix::errno::Errno;
use nix::sys::socket::{ControlMessage, ControlMessageOwned, MsgFlags, recvmsg, sendmsg};
use std::io::{self, IoSlice, IoSliceMut};
use std::os::fd::{AsRawFd, BorrowedFd, FromRawFd, OwnedFd, RawFd};

use crate::channel::{ControlChannel, send_flags};
use crate::retry::retry_eintr;

/// Descriptors a single receive makes room for. Anything beyond one is
/// rejected, but the space lets surplus descriptors be seen and closed.
pub const MAX_FDS: usize = 4;

impl ControlChannel<'_> {
    /// Sends `data` and `fd` in one `sendmsg` call.
    ///
    /// Returns the number of payload bytes the kernel accepted; the
    /// descriptor rides along with the first of them.
    pub fn send_with_fd(&self, data: &[u8], fd: BorrowedFd<'_>) -> io::Result<usize> {
        if data.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "cannot send a descriptor without payload",
            ));
        }
        let fds = [fd.as_raw_fd()];
        let iov = [IoSlice::new(data)];
        let cmsgs = [ControlMessage::ScmRights(&fds)];
        let sent = retry_eintr(|| {
            sendmsg::<()>(self.as_raw_fd(), &iov, &cmsgs, send_flags(), None)
        })?;
        tracing::trace!(
            target: "forkchan::fdpass",
            fd = fds[0],
            sent,
            len = data.len(),
            "descriptor sent"
        );
        Ok(sent)
    }

    /// Receives into `buf` with room for passed descriptors.
    ///
    /// Fails if the control data was truncated or carried more than one
    /// descriptor; every descriptor received in that case is closed.
    pub fn recv_with_fd(&self, buf: &mut [u8]) -> io::Result<(usize, Option<OwnedFd>)> {
        let mut cmsg = nix::cmsg_space!([RawFd; MAX_FDS]);
        let (bytes, truncated, raw_fds) = loop {
            let mut iov = [IoSliceMut::new(&mut *buf)];
            let msg =
                match recvmsg::<()>(self.as_raw_fd(), &mut iov, Some(&mut cmsg), recv_flags()) {
                    Err(Errno::EINTR) => continue,
                    Err(e) => return Err(e.into()),
                    Ok(msg) => msg,
                };
            let mut raw_fds = Vec::new();
            for c in msg.cmsgs()? {
                if let ControlMessageOwned::ScmRights(fds) = c {
                    raw_fds.extend(fds);
                }
            }
            break (msg.bytes, msg.flags.contains(MsgFlags::MSG_CTRUNC), raw_fds);
        };
        let mut fds: Vec<OwnedFd> = raw_fds
            .into_iter()
            // SAFETY: SCM_RIGHTS installed these descriptors in this process
            // and nothing else refers to them yet.
            .map(|fd| unsafe { OwnedFd::from_raw_fd(fd) })
            .collect();
        if truncated {
            tracing::debug!(
                target: "forkchan::fdpass",
                received = fds.len(),
                "control data truncated"
            );
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "ancillary data truncated",
            ));
        }
        match fds.len() {
            0 => Ok((bytes, None)),
            1 => {
                tracing::trace!(target: "forkchan::fdpass", bytes, "descriptor received");
                Ok((bytes, fds.pop()))
            }
            n => {
                tracing::debug!(
                    target: "forkchan::fdpass",
                    received = n,
                    "surplus descriptors closed"
                );
                Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("expected one descriptor, received {n}"),
                ))
            }
        }
    }

    /// Fills `buf` completely, collecting at most one descriptor from any of
    /// the segments read.
    pub fn recv_exact_with_fd(&self, buf: &mut [u8]) -> io::Result<Option<OwnedFd>> {
        let mut filled = 0;
        let mut passed: Option<OwnedFd> = None;
        while filled < buf.len() {
            let (n, fd) = self.recv_with_fd(&mut buf[filled..])?;
            if let Some(fd) = fd {
                if passed.is_some() {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        "descriptor attached to more than one segment",
                    ));
                }
                passed = Some(fd);
            }
            if n == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("channel closed after {filled} of {} bytes", buf.len()),
                ));
            }
            filled += n;
        }
        Ok(passed)
    }
}

#[cfg(any(target_os = "linux", target_os = "android"))]
fn recv_flags() -> MsgFlags {
    MsgFlags::MSG_CMSG_CLOEXEC
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
fn recv_flags() -> MsgFlags {
    MsgFlags::empty()
}
