use std::thread;
use std::time::{Duration, Instant};

/// Millisecond time source the frame loop paces itself against
pub trait Clock {
    fn now_ms(&self) -> u64;
    fn sleep_ms(&mut self, ms: u64);
}

/// Wall clock, counting from its creation
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        SystemClock {
            epoch: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    fn sleep_ms(&mut self, ms: u64) {
        thread::sleep(Duration::from_millis(ms));
    }
}

#[cfg(test)]
pub use manual::ManualClock;


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_moves_forward() {
        let mut clock = SystemClock::new();
        let before = clock.now_ms();
        clock.sleep_ms(5);
        assert!(clock.now_ms() >= before + 5);
    }

    #[test]
    fn manual_clock_shares_time_between_clones() {
        let mut clock = ManualClock::default();
        let handle = clock.clone();
        assert_eq!(clock.now_ms(), 0);
        clock.sleep_ms(20);
        handle.advance(5);
        assert_eq!(clock.now_ms(), 25);
        assert_eq!(handle.sleeps(), vec![20]);
    }
}
