// crates/protocol/src/lib.rs

pub mod frames;
pub mod types;

pub use frames::{HANDOFF_LEN, Handoff, TAG_LEN, expect_tag, read_tag, write_tag};
pub use types::{Tag, UnknownTag};
