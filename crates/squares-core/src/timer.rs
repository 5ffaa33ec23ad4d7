//! Cancelable one-second elapsed-time counter.
//!
//! The owner polls it from its event loop with the current instant; every
//! whole second since the last tick counts one tick. Stopping it cancels any
//! pending tick, so a stopped timer never advances.

use std::time::{Duration, Instant};

const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Default)]
pub struct ElapsedTimer {
    elapsed_secs: u64,
    /// Due time of the next tick while running
    next_tick: Option<Instant>,
}

impl ElapsedTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start ticking from `now`. Does nothing if already running.
    pub fn start(&mut self, now: Instant) {
        if self.next_tick.is_none() {
            self.next_tick = Some(now + TICK);
        }
    }

    pub fn stop(&mut self) {
        self.next_tick = None;
    }

    /// Stop and zero the count
    pub fn reset(&mut self) {
        self.stop();
        self.elapsed_secs = 0;
    }

    pub fn is_running(&self) -> bool {
        self.next_tick.is_some()
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    /// Fire every tick due by `now`; returns how many fired
    pub fn poll(&mut self, now: Instant) -> u64 {
        let mut fired = 0;
        while let Some(due) = self.next_tick {
            if due > now {
                break;
            }
            self.elapsed_secs += 1;
            self.next_tick = Some(due + TICK);
            fired += 1;
        }
        fired
    }
}

/// `MM:SS`; minutes keep counting past an hour
pub fn format_time(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
