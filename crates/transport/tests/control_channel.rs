// crates/transport/tests/control_channel.rs
use std::io;
use std::os::fd::AsFd;
use std::os::unix::net::UnixStream;

use transport::{ControlChannel, Transport};

fn exchange<T: Transport>(tx: &mut T, rx: &mut T, data: &[u8]) -> io::Result<Vec<u8>> {
    tx.send(data)?;
    let mut buf = vec![0u8; data.len()];
    rx.receive_exact(&mut buf)?;
    Ok(buf)
}

#[test]
fn transport_trait_moves_bytes_both_ways() {
    let (a, b) = UnixStream::pair().unwrap();
    let mut left = ControlChannel::new(a.as_fd());
    let mut right = ControlChannel::new(b.as_fd());
    assert_eq!(exchange(&mut left, &mut right, b"CHLD").unwrap(), b"CHLD");
    assert_eq!(exchange(&mut right, &mut left, b"DONE").unwrap(), b"DONE");
}

#[test]
fn large_write_is_delivered_whole() {
    let (a, b) = UnixStream::pair().unwrap();
    let payload = vec![0x5au8; 1 << 20];
    let expected = payload.clone();
    let writer = std::thread::spawn(move || {
        let tx = ControlChannel::new(a.as_fd());
        tx.write_all(&payload)
    });
    let mut rx = ControlChannel::new(b.as_fd());
    let mut buf = vec![0u8; expected.len()];
    rx.receive_exact(&mut buf).unwrap();
    writer.join().unwrap().unwrap();
    assert_eq!(buf, expected);
}

#[test]
fn descriptor_survives_split_read() {
    let (a, b) = UnixStream::pair().unwrap();
    let (_keep, far) = UnixStream::pair().unwrap();
    let tx = ControlChannel::new(a.as_fd());
    tx.send_with_fd(b"CH", far.as_fd()).unwrap();
    tx.write_all(b"LD").unwrap();

    let rx = ControlChannel::new(b.as_fd());
    let mut buf = [0u8; 4];
    let fd = rx.recv_exact_with_fd(&mut buf).unwrap();
    assert_eq!(&buf, b"CHLD");
    assert!(fd.is_some());
}

#[test]
fn regular_file_descriptor_can_be_passed() {
    use std::fs::File;
    use std::io::{Read, Seek, SeekFrom, Write};

    let mut file = tempfile::tempfile().unwrap();
    file.write_all(b"carried").unwrap();
    file.seek(SeekFrom::Start(0)).unwrap();

    let (a, b) = UnixStream::pair().unwrap();
    ControlChannel::new(a.as_fd())
        .send_with_fd(b"F", file.as_fd())
        .unwrap();
    drop(file);

    let mut buf = [0u8; 1];
    let (n, fd) = ControlChannel::new(b.as_fd()).recv_with_fd(&mut buf).unwrap();
    assert_eq!(n, 1);
    let mut received = File::from(fd.unwrap());
    let mut contents = String::new();
    received.read_to_string(&mut contents).unwrap();
    assert_eq!(contents, "carried");
}
