// crates/protocol/src/frames.rs
use byteorder::{ByteOrder, NativeEndian, ReadBytesExt};
use std::io::{self, Read, Write};

use crate::types::Tag;

pub const TAG_LEN: usize = 4;

/// Tag, generation and pid. The descriptor travels as ancillary data.
pub const HANDOFF_LEN: usize = TAG_LEN + 4 + 4;

/// Announcement of a new child and its channel endpoint.
///
/// Integers are written in native byte order: both ends of the control
/// channel live on the same host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handoff {
    pub generation: u32,
    pub pid: i32,
}

impl Handoff {
    pub fn new(generation: u32, pid: i32) -> Self {
        Self { generation, pid }
    }

    pub fn encode<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.to_bytes())
    }

    pub fn decode<R: Read>(r: &mut R) -> io::Result<Self> {
        expect_tag(r, Tag::Child)?;
        let generation = r.read_u32::<NativeEndian>()?;
        let pid = r.read_i32::<NativeEndian>()?;
        Ok(Handoff { generation, pid })
    }

    pub fn to_bytes(&self) -> [u8; HANDOFF_LEN] {
        let mut buf = [0u8; HANDOFF_LEN];
        buf[..TAG_LEN].copy_from_slice(&Tag::Child.bytes());
        NativeEndian::write_u32(&mut buf[TAG_LEN..TAG_LEN + 4], self.generation);
        NativeEndian::write_i32(&mut buf[TAG_LEN + 4..], self.pid);
        buf
    }

    /// Decodes a buffer that must hold exactly one handoff.
    pub fn from_bytes(buf: &[u8]) -> io::Result<Self> {
        if buf.len() < HANDOFF_LEN {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("short handoff: {} of {HANDOFF_LEN} bytes", buf.len()),
            ));
        }
        if buf.len() > HANDOFF_LEN {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("oversized handoff: {} bytes", buf.len()),
            ));
        }
        let mut r = buf;
        Self::decode(&mut r)
    }
}

pub fn write_tag<W: Write>(w: &mut W, tag: Tag) -> io::Result<()> {
    w.write_all(&tag.bytes())
}

pub fn read_tag<R: Read>(r: &mut R) -> io::Result<Tag> {
    let mut raw = [0u8; TAG_LEN];
    r.read_exact(&mut raw)?;
    Tag::try_from(raw).map_err(io::Error::from)
}

/// Reads one tag and fails unless it is `want`.
pub fn expect_tag<R: Read>(r: &mut R, want: Tag) -> io::Result<()> {
    let got = read_tag(r)?;
    if got != want {
        tracing::debug!(?want, ?got, "unexpected tag");
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("expected {want:?} tag, got {got:?}"),
        ));
    }
    Ok(())
}
