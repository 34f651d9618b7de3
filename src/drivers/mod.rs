//! Effect generators and the random source that feeds them.
//!
//! Each generator renders one tick of its waveform onto a single pin,
//! consuming wall-clock time through the [`Sleeper`](crate::app::ports::Sleeper)
//! port.

pub mod blink;
pub mod pulse;
pub mod random;

use core::fmt;

/// Continuous effects, re-run every tick while their state is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Effect {
    Blink,
    Pulse,
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blink => f.write_str("blink"),
            Self::Pulse => f.write_str("pulse"),
        }
    }
}
