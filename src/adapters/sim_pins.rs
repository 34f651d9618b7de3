//! In-memory pin bank.
//!
//! Used when the daemon is built without the `gpiocdev` feature: tracks
//! configured pins and their levels and logs every change instead of
//! touching hardware. Follows the same rules as the chip backend
//! (negative pins are invalid, writes need a prior `INIT`).

use std::collections::BTreeMap;

use embedded_hal::digital::PinState;
use log::{debug, info};

use crate::app::ports::PinPort;
use crate::error::HardwareError;

#[derive(Debug, Default)]
pub struct SimulatedPins {
    levels: BTreeMap<i32, PinState>,
    writes: u64,
}

impl SimulatedPins {
    pub fn new() -> Self {
        info!("GPIO(sim): in-memory pin bank");
        Self::default()
    }

    /// Current level of a configured pin.
    pub fn level(&self, pin: i32) -> Option<PinState> {
        self.levels.get(&pin).copied()
    }

    /// Level writes performed so far.
    pub fn writes(&self) -> u64 {
        self.writes
    }
}

impl PinPort for SimulatedPins {
    fn configure_output(&mut self, pin: i32) -> Result<(), HardwareError> {
        if pin < 0 {
            return Err(HardwareError::InvalidPin(pin));
        }
        self.levels.entry(pin).or_insert(PinState::Low);
        info!("GPIO(sim): pin {} configured as output", pin);
        Ok(())
    }

    fn set_level(&mut self, pin: i32, level: PinState) -> Result<(), HardwareError> {
        let slot = self
            .levels
            .get_mut(&pin)
            .ok_or(HardwareError::NotConfigured(pin))?;
        if *slot != level {
            debug!("GPIO(sim): pin {} -> {:?}", pin, level);
        }
        *slot = level;
        self.writes += 1;
        Ok(())
    }

    fn release_all(&mut self) {
        self.levels.clear();
    }
}
