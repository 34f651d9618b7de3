//! Unified error types for the GPIO daemon.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! main loop's error handling uniform. All variants are `Copy` so they can
//! be passed through the service and the event sink without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level daemon error
// ---------------------------------------------------------------------------

/// Every fallible operation in the daemon funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A command line was rejected by the parser.
    Command(CommandError),
    /// A pin operation failed.
    Hardware(HardwareError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command(e) => write!(f, "command: {e}"),
            Self::Hardware(e) => write!(f, "hardware: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Startup failures
// ---------------------------------------------------------------------------

/// Stage at which startup failed. Always fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupError {
    SignalHandler,
    Config,
    GpioInit,
    EntropyOpen,
    ChannelCreate,
    ChannelOpen,
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SignalHandler => write!(f, "error setting INT/TERM signal handler"),
            Self::Config => write!(f, "error loading configuration"),
            Self::GpioInit => write!(f, "error initializing GPIOs"),
            Self::EntropyOpen => write!(f, "error initializing random number generator"),
            Self::ChannelCreate => write!(f, "error creating fifo"),
            Self::ChannelOpen => write!(f, "error opening fifo"),
        }
    }
}

impl std::error::Error for StartupError {}

// ---------------------------------------------------------------------------
// Command errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// The line did not contain exactly two whitespace-separated tokens.
    TokenCount(usize),
    /// The first token is not one of the known actions.
    UnknownAction,
    /// The second token is not a base-10 `i32`.
    InvalidPin,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TokenCount(n) => write!(f, "expected 2 tokens, got {n}"),
            Self::UnknownAction => write!(f, "unknown action"),
            Self::InvalidPin => write!(f, "pin is not an integer"),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<CommandError> for Error {
    fn from(e: CommandError) -> Self {
        Self::Command(e)
    }
}

// ---------------------------------------------------------------------------
// Hardware errors
// ---------------------------------------------------------------------------

/// Pin operation failures. Each variant carries the pin number involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardwareError {
    /// The pin number does not exist on this backend.
    InvalidPin(i32),
    /// The pin was never configured as an output.
    NotConfigured(i32),
    /// Configuring the pin as an output failed.
    ConfigureFailed(i32),
    /// Setting the output level failed.
    WriteFailed(i32),
}

impl fmt::Display for HardwareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPin(p) => write!(f, "invalid pin {p}"),
            Self::NotConfigured(p) => write!(f, "pin {p} not configured as output"),
            Self::ConfigureFailed(p) => write!(f, "configuring pin {p} failed"),
            Self::WriteFailed(p) => write!(f, "setting level on pin {p} failed"),
        }
    }
}

impl std::error::Error for HardwareError {}

impl From<HardwareError> for Error {
    fn from(e: HardwareError) -> Self {
        Self::Hardware(e)
    }
}

// ---------------------------------------------------------------------------
// Entropy errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntropyError {
    /// The read syscall failed.
    ReadFailed,
    /// The source returned fewer bytes than requested.
    ShortRead,
}

impl fmt::Display for EntropyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFailed => write!(f, "error reading entropy source"),
            Self::ShortRead => write!(f, "entropy source returned a short read"),
        }
    }
}

impl std::error::Error for EntropyError {}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Daemon-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
