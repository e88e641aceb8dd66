// crates/spawner/src/clock.rs
use nix::time::{ClockId, clock_gettime};
use std::time::Duration;

fn cpu_time() -> nix::Result<Duration> {
    clock_gettime(ClockId::CLOCK_PROCESS_CPUTIME_ID).map(Duration::from)
}

/// CPU time consumed by this process and the ancestors it was forked from.
///
/// A forked child starts with a fresh CPU clock, so the child rebases onto
/// the reading taken just before the fork and keeps counting from there.
#[derive(Debug, Clone, Copy)]
pub struct ProcessClock {
    start: Duration,
    delta: Duration,
}

impl ProcessClock {
    pub fn new() -> nix::Result<Self> {
        Ok(Self {
            start: cpu_time()?,
            delta: Duration::ZERO,
        })
    }

    pub fn elapsed(&self) -> nix::Result<Duration> {
        Ok(self.delta + cpu_time()?.saturating_sub(self.start))
    }

    /// Clock reading as a generation tag; wraps after about 49 days.
    pub fn now_millis(&self) -> nix::Result<u32> {
        self.elapsed().map(millis)
    }

    /// Continue from `at_fork`, the parent's reading taken before forking.
    pub fn rebase_after_fork(&mut self, at_fork: Duration) -> nix::Result<()> {
        self.start = cpu_time()?;
        self.delta = at_fork;
        Ok(())
    }
}

pub(crate) fn millis(d: Duration) -> u32 {
    d.as_millis() as u32
}
