//! Outbound events emitted by the effect service.
//!
//! Adapters behind [`EventSink`](super::ports::EventSink) decide whether an
//! event is logged, counted or dropped.

use crate::drivers::Effect;
use crate::error::{CommandError, EntropyError, HardwareError};
use crate::fsm::StateId;

use super::commands::Command;

#[derive(Debug, Clone, PartialEq)]
pub enum DaemonEvent {
    /// The main loop is about to run its first tick.
    Started,

    /// A command line parsed and was applied.
    CommandApplied(Command),

    /// A line was rejected; state is untouched.
    CommandRejected { line: String, error: CommandError },

    /// The effect state changed.
    StateChanged { from: StateId, to: StateId, pin: i32 },

    /// A pin operation failed.
    HardwareFault(HardwareError),

    /// An effect hit a pin failure during its run.
    EffectFault { effect: Effect, error: HardwareError },

    /// A random draw failed; the fallback value was used.
    EntropyFault(EntropyError),

    /// The main loop exited.
    Stopped { ticks: u64, commands: u64 },
}
