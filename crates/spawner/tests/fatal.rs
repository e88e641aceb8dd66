// crates/spawner/tests/fatal.rs
//! Each case runs the spawn inside a forked harness so the abort takes down
//! the harness and not the test binary. This binary never ignores SIGCHLD,
//! which keeps `waitpid` on the harness usable.

use nix::errno::Errno;
use nix::sys::signal::Signal;
use nix::sys::wait::{WaitStatus, waitpid};
use nix::unistd::{ForkResult, fork, pipe};
use serial_test::serial;
use std::fs::File;
use std::io::Read;
use std::os::fd::{AsFd, AsRawFd};
use std::os::unix::net::UnixStream;

use spawner::{Role, accept_handoff, spawn_with_channel};
use transport::ControlChannel;

/// Forks a harness that spawns over a fresh control channel whose driver end
/// is handed to `driver`. Returns the harness's wait status and stderr.
fn run_harness<F>(driver: F) -> (WaitStatus, String)
where
    F: FnOnce(UnixStream),
{
    let (parent_end, driver_end) = UnixStream::pair().unwrap();
    let (err_r, err_w) = pipe().unwrap();
    match unsafe { fork() }.expect("fork failed") {
        ForkResult::Child => {
            drop(driver_end);
            drop(err_r);
            unsafe { libc::dup2(err_w.as_raw_fd(), 2) };
            drop(err_w);
            match spawn_with_channel(parent_end.as_fd(), 7) {
                Role::Child => unsafe { libc::_exit(0) },
                Role::Parent { .. } => unsafe { libc::_exit(3) },
            }
        }
        ForkResult::Parent { child } => {
            drop(parent_end);
            drop(err_w);
            driver(driver_end);
            let status = waitpid(child, None).unwrap();
            let mut stderr = String::new();
            File::from(err_r).read_to_string(&mut stderr).unwrap();
            (status, stderr)
        }
    }
}

fn aborted(status: WaitStatus) -> bool {
    matches!(status, WaitStatus::Signaled(_, Signal::SIGABRT, _))
}

#[test]
#[serial]
fn well_behaved_driver_lets_parent_return() {
    let (status, _) = run_harness(|driver_end| {
        let mut control = ControlChannel::new(driver_end.as_fd());
        let got = accept_handoff(&control).unwrap();
        assert_eq!(got.handoff.generation, 7);
        spawner::acknowledge(&mut control).unwrap();
    });
    assert!(matches!(status, WaitStatus::Exited(_, 3)), "{status:?}");
}

#[test]
#[serial]
fn wrong_ack_tag_aborts() {
    let (status, stderr) = run_harness(|driver_end| {
        let control = ControlChannel::new(driver_end.as_fd());
        accept_handoff(&control).unwrap();
        control.write_all(b"NOPE").unwrap();
    });
    assert!(aborted(status), "{status:?}");
    assert!(stderr.contains("acknowledgement failed"), "{stderr}");
    assert!(stderr.contains("\"NOPE\""), "{stderr}");
}

#[test]
#[serial]
fn short_ack_aborts() {
    let (status, stderr) = run_harness(|driver_end| {
        let control = ControlChannel::new(driver_end.as_fd());
        accept_handoff(&control).unwrap();
        control.write_all(b"DO").unwrap();
    });
    assert!(aborted(status), "{status:?}");
    assert!(stderr.contains("acknowledgement failed"), "{stderr}");
}

#[test]
#[serial]
fn driver_hangup_before_ack_aborts() {
    let (status, stderr) = run_harness(|driver_end| {
        accept_handoff(&ControlChannel::new(driver_end.as_fd())).unwrap();
    });
    assert!(aborted(status), "{status:?}");
    assert!(stderr.contains("reading acknowledgement"), "{stderr}");
}

#[cfg(target_os = "linux")]
#[test]
#[serial]
fn driver_gone_before_handoff_aborts() {
    let (status, stderr) = run_harness(drop);
    assert!(aborted(status), "{status:?}");
    // The hangup may land before the send or between send and ack read.
    assert!(
        stderr.contains("sendmsg failed") || stderr.contains("reading acknowledgement"),
        "{stderr}"
    );
}

#[test]
#[serial]
fn child_side_failure_reports_without_locks() {
    let (err_r, err_w) = pipe().unwrap();
    match unsafe { fork() }.expect("fork failed") {
        ForkResult::Child => {
            drop(err_r);
            unsafe { libc::dup2(err_w.as_raw_fd(), 2) };
            drop(err_w);
            spawner::fatal::abort_in_child(&spawner::SpawnError::Dup2(Errno::EBADF))
        }
        ForkResult::Parent { child } => {
            drop(err_w);
            let status = waitpid(child, None).unwrap();
            let mut stderr = String::new();
            File::from(err_r).read_to_string(&mut stderr).unwrap();
            assert!(aborted(status), "{status:?}");
            assert_eq!(
                stderr,
                format!("forkchan: dup2 failed in child: {}\n", Errno::EBADF.desc())
            );
        }
    }
}
