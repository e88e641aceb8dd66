// fuzz/fuzz_targets/tag_decode_fuzz.rs
#![no_main]
use fuzz::helpers;
use libfuzzer_sys::fuzz_target;
use protocol::{Tag, read_tag};

fuzz_target!(|data: &[u8]| {
    let mut reader = helpers::cursor(data);
    let streamed = read_tag(&mut reader).ok();
    let direct = helpers::tag_bytes(data).and_then(|raw| Tag::try_from(raw).ok());
    assert_eq!(streamed, direct);
});
