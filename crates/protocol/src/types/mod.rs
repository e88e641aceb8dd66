// crates/protocol/src/types/mod.rs
mod codes;

pub use codes::{Tag, UnknownTag};
