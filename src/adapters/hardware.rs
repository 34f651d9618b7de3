//! Hardware adapter — bundles the pin backend, the entropy source and the
//! sleeper behind the ports the effect service consumes.
//!
//! The service takes one `hw` argument implementing [`PinPort`],
//! [`RandomPort`] and [`Sleeper`]; this adapter satisfies all three by
//! delegation and owns the resources for the daemon's lifetime.

use embedded_hal::digital::PinState;

use crate::app::ports::{PinPort, RandomPort, Sleeper};
use crate::error::{EntropyError, HardwareError};

use super::time::ThreadSleeper;

pub struct HardwareAdapter<P, R, S = ThreadSleeper> {
    pins: P,
    rng: R,
    sleeper: S,
}

impl<P: PinPort, R: RandomPort> HardwareAdapter<P, R> {
    pub fn new(pins: P, rng: R) -> Self {
        Self::with_sleeper(pins, rng, ThreadSleeper::new())
    }
}

impl<P: PinPort, R: RandomPort, S: Sleeper> HardwareAdapter<P, R, S> {
    pub fn with_sleeper(pins: P, rng: R, sleeper: S) -> Self {
        Self { pins, rng, sleeper }
    }

    pub fn pins(&self) -> &P {
        &self.pins
    }

    /// Release the pins, then hand back the parts (the entropy handle
    /// closes when `R` is dropped).
    pub fn shutdown(mut self) -> (P, R) {
        self.pins.release_all();
        (self.pins, self.rng)
    }
}

impl<P: PinPort, R, S> PinPort for HardwareAdapter<P, R, S> {
    fn configure_output(&mut self, pin: i32) -> Result<(), HardwareError> {
        self.pins.configure_output(pin)
    }

    fn set_level(&mut self, pin: i32, level: PinState) -> Result<(), HardwareError> {
        self.pins.set_level(pin, level)
    }

    fn release_all(&mut self) {
        self.pins.release_all();
    }
}

impl<P, R: RandomPort, S> RandomPort for HardwareAdapter<P, R, S> {
    fn next_u32(&mut self) -> Result<u32, EntropyError> {
        self.rng.next_u32()
    }
}

impl<P, R, S: Sleeper> Sleeper for HardwareAdapter<P, R, S> {
    fn sleep_us(&mut self, micros: u32) {
        self.sleeper.sleep_us(micros);
    }
}
