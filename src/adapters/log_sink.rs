//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing daemon events to the `log` facade
//! (stderr via `env_logger`, captured by the service manager's journal).

use log::{debug, error, info};

use crate::app::events::DaemonEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`DaemonEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &DaemonEvent) {
        match event {
            DaemonEvent::Started => {
                info!("START | state=idle");
            }
            DaemonEvent::CommandApplied(cmd) => {
                debug!("CMD | {}", cmd);
            }
            DaemonEvent::CommandRejected { line, error } => {
                error!("CMD | received unknown command '{}' ({})", line, error);
            }
            DaemonEvent::StateChanged { from, to, pin } => {
                info!("STATE | {} -> {} | pin={}", from.name(), to.name(), pin);
            }
            DaemonEvent::HardwareFault(e) => {
                error!("GPIO | {}", e);
            }
            DaemonEvent::EffectFault { effect, error } => {
                error!("GPIO | {} effect: {}", effect, error);
            }
            DaemonEvent::EntropyFault(e) => {
                error!("RNG | {}, using fallback timing", e);
            }
            DaemonEvent::Stopped { ticks, commands } => {
                info!("STOP | ticks={} commands={}", ticks, commands);
            }
        }
    }
}
