use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

pub const TIMER_HZ: u32 = 60;

/// The delay and sound countdowns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timers {
    pub delay: u8,
    pub sound: u8,
}

impl Timers {
    pub fn tick(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
    }
}

/// Calls `tick` every `period` on its own thread until it returns false.
///
/// Deadlines are computed from the start time so the rate does not drift.
pub fn spawn_clock<F>(period: Duration, mut tick: F) -> JoinHandle<()>
where
    F: FnMut() -> bool + Send + 'static,
{
    thread::spawn(move || {
        let mut deadline = Instant::now();
        loop {
            deadline += period;
            if let Some(remaining) = deadline.checked_duration_since(Instant::now()) {
                thread::sleep(remaining);
            }
            if !tick() {
                break;
            }
        }
    })
}

pub fn timer_period() -> Duration {
    Duration::from_secs(1) / TIMER_HZ
}
