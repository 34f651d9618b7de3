//! Random-duration flicker.
//!
//! One call is one flash: high for a random 50–200 ms, then low for a random
//! 25–75 ms (defaults, see [`BlinkConfig`]). Repeated every tick while the
//! state is `Blink`, it reads as an irregular candle-like flicker.

use embedded_hal::digital::PinState;

use crate::app::ports::{PinPort, RandomPort, Sleeper};
use crate::config::BlinkConfig;
use crate::error::{EntropyError, HardwareError};

use super::random::random_in_range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlinkTiming {
    pub high_us: u32,
    pub low_us: u32,
}

impl BlinkTiming {
    /// Draw both durations. Fails if either draw fails.
    pub fn draw(rng: &mut impl RandomPort, cfg: &BlinkConfig) -> Result<Self, EntropyError> {
        let high_us = random_in_range(rng, &cfg.high_range())?;
        let low_us = random_in_range(rng, &cfg.low_range())?;
        Ok(Self { high_us, low_us })
    }

    /// Deterministic timing used when the entropy source fails: the
    /// midpoint of each range.
    pub fn fallback(cfg: &BlinkConfig) -> Self {
        let mid = |lo: u32, hi: u32| lo + hi.saturating_sub(lo) / 2;
        Self {
            high_us: mid(cfg.high_min_us, cfg.high_max_us),
            low_us: mid(cfg.low_min_us, cfg.low_max_us),
        }
    }

    pub fn period_us(&self) -> u64 {
        u64::from(self.high_us) + u64::from(self.low_us)
    }
}

/// Render one flash on `pin`.
///
/// The full high/low timing is always spent, even when a level write fails;
/// the first failure is returned afterwards.
pub fn blink(
    pin: i32,
    timing: BlinkTiming,
    hw: &mut (impl PinPort + Sleeper),
) -> Result<(), HardwareError> {
    let mut fault = None;

    if let Err(e) = hw.set_level(pin, PinState::High) {
        fault.get_or_insert(e);
    }
    hw.sleep_us(timing.high_us);
    if let Err(e) = hw.set_level(pin, PinState::Low) {
        fault.get_or_insert(e);
    }
    hw.sleep_us(timing.low_us);

    fault.map_or(Ok(()), Err)
}
