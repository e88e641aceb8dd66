// fuzz/src/lib.rs
pub mod helpers {
    use std::io::Cursor;

    #[inline]
    pub fn cursor(data: &[u8]) -> Cursor<&[u8]> {
        Cursor::new(data)
    }

    /// First four bytes as a tag candidate, if there are that many.
    #[inline]
    pub fn tag_bytes(data: &[u8]) -> Option<[u8; 4]> {
        data.get(..4)?.try_into().ok()
    }
}
