// fuzz/fuzz_targets/handoff_decode_fuzz.rs
#![no_main]
use fuzz::helpers;
use libfuzzer_sys::fuzz_target;
use protocol::{HANDOFF_LEN, Handoff};

fuzz_target!(|data: &[u8]| {
    let mut reader = helpers::cursor(data);
    if let Ok(msg) = Handoff::decode(&mut reader) {
        assert_eq!(&msg.to_bytes()[..], &data[..HANDOFF_LEN]);
    }
    match Handoff::from_bytes(data) {
        Ok(msg) => assert_eq!(msg.to_bytes().len(), data.len()),
        Err(_) => {}
    }
});
