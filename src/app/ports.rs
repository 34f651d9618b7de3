//! Port traits — the boundary between the effect service and the outside world.
//!
//! ```text
//!   CommandSource ──▶ ┌───────────────┐ ──▶ EventSink
//!                     │ EffectService │
//!         PinPort ◀── │ FSM · effects │
//!      RandomPort ──▶ │               │
//!         Sleeper ◀── └───────────────┘
//! ```
//!
//! Adapters (GPIO chip, `/dev/urandom`, the FIFO, the logger) implement
//! these traits. The service consumes them via generics, so it never
//! touches hardware, files or the clock directly.

use embedded_hal::digital::PinState;

use crate::error::{EntropyError, HardwareError};

// ───────────────────────────────────────────────────────────────
// Pin port (driven adapter: domain → GPIO)
// ───────────────────────────────────────────────────────────────

/// Output side of the GPIO driver.
pub trait PinPort {
    /// Configure `pin` as a push-pull output.
    fn configure_output(&mut self, pin: i32) -> Result<(), HardwareError>;

    /// Drive `pin` to `level`.
    fn set_level(&mut self, pin: i32, level: PinState) -> Result<(), HardwareError>;

    /// Release every pin claimed so far. Called once at shutdown.
    fn release_all(&mut self) {}
}

// ───────────────────────────────────────────────────────────────
// Random port (driven adapter: entropy → domain)
// ───────────────────────────────────────────────────────────────

/// Source of uniformly distributed 32-bit values.
///
/// Range mapping lives in [`crate::drivers::random`]; implementors only
/// deliver raw words.
pub trait RandomPort {
    fn next_u32(&mut self) -> Result<u32, EntropyError>;
}

// ───────────────────────────────────────────────────────────────
// Sleeper (driven adapter: domain → wall clock)
// ───────────────────────────────────────────────────────────────

/// Blocking delay. Effects consume their time through this.
pub trait Sleeper {
    fn sleep_us(&mut self, micros: u32);
}

// ───────────────────────────────────────────────────────────────
// Command source (driving adapter: channel → domain)
// ───────────────────────────────────────────────────────────────

/// Non-blocking line reader over the command channel.
pub trait CommandSource {
    /// Return the next complete line if one is available right now.
    /// Never blocks; `None` means "no data now".
    fn poll_line(&mut self) -> Option<String>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The service emits structured [`DaemonEvent`](super::events::DaemonEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::DaemonEvent);
}
