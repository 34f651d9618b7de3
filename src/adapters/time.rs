//! Wall-clock sleeper.
//!
//! Effects call [`Sleeper::sleep_us`] between level changes; on the host
//! that is a plain `std::thread::sleep`.

use std::time::Duration;

use crate::app::ports::Sleeper;

#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl ThreadSleeper {
    pub fn new() -> Self {
        Self
    }
}

impl Sleeper for ThreadSleeper {
    fn sleep_us(&mut self, micros: u32) {
        if micros > 0 {
            std::thread::sleep(Duration::from_micros(u64::from(micros)));
        }
    }
}
