// crates/transport/src/lib.rs
use std::io;

mod channel;
mod fdpass;
mod retry;

pub use channel::ControlChannel;
pub use fdpass::MAX_FDS;
pub use retry::{close_fd, retry_eintr};

pub trait Transport {
    fn send(&mut self, data: &[u8]) -> io::Result<()>;

    fn receive(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    fn receive_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.receive(&mut buf[filled..])? {
                0 => {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        format!("channel closed after {filled} of {} bytes", buf.len()),
                    ));
                }
                n => filled += n,
            }
        }
        Ok(())
    }
}
