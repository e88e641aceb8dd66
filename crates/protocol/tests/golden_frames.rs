// crates/protocol/tests/golden_frames.rs
use protocol::{HANDOFF_LEN, Handoff, Tag, read_tag};

#[cfg(target_endian = "little")]
#[test]
fn decode_handoff_golden() {
    const HANDOFF: [u8; HANDOFF_LEN] = [
        b'C', b'H', b'L', b'D', 42, 0, 0, 0, 0x39, 0x30, 0, 0,
    ];
    let msg = Handoff::from_bytes(&HANDOFF).unwrap();
    assert_eq!(msg, Handoff::new(42, 0x3039));
}

#[cfg(target_endian = "big")]
#[test]
fn decode_handoff_golden() {
    const HANDOFF: [u8; HANDOFF_LEN] = [
        b'C', b'H', b'L', b'D', 0, 0, 0, 42, 0, 0, 0x30, 0x39,
    ];
    let msg = Handoff::from_bytes(&HANDOFF).unwrap();
    assert_eq!(msg, Handoff::new(42, 0x3039));
}

#[test]
fn decode_ack_golden() {
    const ACK: [u8; 4] = *b"DONE";
    assert_eq!(read_tag(&mut &ACK[..]).unwrap(), Tag::Done);
}

#[test]
fn generation_wraps_full_range() {
    let msg = Handoff::new(u32::MAX, i32::MAX);
    let decoded = Handoff::from_bytes(&msg.to_bytes()).unwrap();
    assert_eq!(decoded.generation, u32::MAX);
    assert_eq!(decoded.pid, i32::MAX);
}

#[test]
fn stream_holds_handoff_then_ack() {
    let mut buf = Vec::new();
    Handoff::new(7, 99).encode(&mut buf).unwrap();
    buf.extend_from_slice(&Tag::Done.bytes());
    let mut r = buf.as_slice();
    assert_eq!(Handoff::decode(&mut r).unwrap(), Handoff::new(7, 99));
    assert_eq!(read_tag(&mut r).unwrap(), Tag::Done);
    assert!(r.is_empty());
}
