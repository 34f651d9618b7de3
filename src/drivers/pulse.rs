//! Gamma-corrected breathing pulse rendered with software PWM.
//!
//! One call renders a full breath: a rising half, a falling half and a
//! trailing pause. Each half walks `steps` PWM periods of `steps` µs each.
//! At step `i` the pin is held high for
//!
//! ```text
//! duty(i) = round((i / steps) ^ gamma * steps)   µs
//! ```
//!
//! and low for the rest of the period. Steps whose duty rounds to zero are
//! skipped outright (no level change, no sleep), so the dark ends of the
//! curve are shorter than the bright middle. With the defaults (1000 steps,
//! gamma 2.1) one call blocks for roughly 1.95 s.

use embedded_hal::digital::PinState;

use crate::app::ports::{PinPort, Sleeper};
use crate::config::PulseConfig;
use crate::error::HardwareError;

/// High time in µs for step `i` of a `steps`-step ramp.
pub fn duty_for_step(i: u32, steps: u32, gamma: f64) -> u32 {
    let steps_f = f64::from(steps);
    ((f64::from(i) / steps_f).powf(gamma) * steps_f).round() as u32
}

/// Precomputed duty table for one configuration.
#[derive(Debug, Clone)]
pub struct PulseProfile {
    steps: u32,
    duty: Vec<u32>,
}

impl PulseProfile {
    pub fn new(cfg: &PulseConfig) -> Self {
        let steps = cfg.steps;
        let duty = (0..steps)
            .map(|i| duty_for_step(i, steps, cfg.gamma).min(steps))
            .collect();
        Self { steps, duty }
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Duty of step `i`, or `None` past the end of the ramp.
    pub fn duty_at(&self, i: u32) -> Option<u32> {
        self.duty.get(i as usize).copied()
    }

    /// Duties of the rising half, step 0 first.
    pub fn rising(&self) -> impl Iterator<Item = u32> + '_ {
        self.duty.iter().copied()
    }

    /// Duties of the falling half, last step first.
    pub fn falling(&self) -> impl Iterator<Item = u32> + '_ {
        self.duty.iter().rev().copied()
    }

    /// Steps per half that actually drive the pin.
    pub fn active_steps(&self) -> usize {
        self.duty.iter().filter(|&&d| d > 0).count()
    }

    /// Total sleep time of one [`pulse`] call.
    pub fn cycle_duration_us(&self) -> u64 {
        let period = u64::from(self.steps);
        2 * self.active_steps() as u64 * period + period
    }
}

/// Render one breath on `pin`.
///
/// Not interruptible: the whole cycle runs before returning. A failed level
/// write does not shorten the cycle; the first failure is returned at the end.
pub fn pulse(
    pin: i32,
    profile: &PulseProfile,
    hw: &mut (impl PinPort + Sleeper),
) -> Result<(), HardwareError> {
    let mut fault = None;
    let period = profile.steps();

    for duty in profile.rising().chain(profile.falling()) {
        if duty == 0 {
            continue;
        }
        if let Err(e) = hw.set_level(pin, PinState::High) {
            fault.get_or_insert(e);
        }
        hw.sleep_us(duty);
        if let Err(e) = hw.set_level(pin, PinState::Low) {
            fault.get_or_insert(e);
        }
        hw.sleep_us(period - duty);
    }
    hw.sleep_us(period);

    fault.map_or(Ok(()), Err)
}
