// crates/protocol/src/types/codes.rs
use std::fmt;
use std::io;

/// Four-byte message tags exchanged on the control channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Announces a freshly forked child and carries its channel endpoint.
    Child,
    /// Driver acknowledgement of a [`Tag::Child`] announcement.
    Done,
}

impl Tag {
    pub const fn bytes(self) -> [u8; 4] {
        match self {
            Tag::Child => *b"CHLD",
            Tag::Done => *b"DONE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownTag(pub [u8; 4]);

impl fmt::Display for UnknownTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown tag {:?}", self.0.escape_ascii().to_string())
    }
}

impl std::error::Error for UnknownTag {}

impl From<UnknownTag> for io::Error {
    fn from(e: UnknownTag) -> Self {
        io::Error::new(io::ErrorKind::InvalidData, e)
    }
}

impl TryFrom<[u8; 4]> for Tag {
    type Error = UnknownTag;

    fn try_from(v: [u8; 4]) -> Result<Self, Self::Error> {
        match &v {
            b"CHLD" => Ok(Tag::Child),
            b"DONE" => Ok(Tag::Done),
            _ => Err(UnknownTag(v)),
        }
    }
}
