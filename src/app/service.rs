//! Application service — the effect loop.
//!
//! [`EffectService`] owns the FSM and the effect parameters. Each
//! [`tick`](EffectService::tick):
//!
//! ```text
//!  CommandSource ──poll──▶ parse ──▶ Fsm::apply ──▶ one-shot pin action
//!                                         │
//!                                         ▼
//!                          active effect (blink / pulse) for one cycle
//! ```
//!
//! All I/O flows through port traits injected at call sites, making the
//! whole loop testable with mock adapters.

use std::collections::BTreeSet;

use log::{info, warn};

use crate::config::{BlinkConfig, DaemonConfig};
use crate::drivers::blink::{self, BlinkTiming};
use crate::drivers::pulse::{self, PulseProfile};
use crate::drivers::Effect;
use crate::error::Result;
use crate::fsm::{Fsm, PinAction, StateId, Transition};
use crate::shutdown::ShutdownFlag;

use super::commands::{Action, Command};
use super::events::DaemonEvent;
use super::ports::{CommandSource, EventSink, PinPort, RandomPort, Sleeper};

/// What one tick did.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Outcome of the line read this tick, if one was available.
    pub command: Option<Result<Transition>>,
    /// Effect rendered this tick.
    pub effect: Option<Effect>,
}

// ───────────────────────────────────────────────────────────────
// EffectService
// ───────────────────────────────────────────────────────────────

pub struct EffectService {
    fsm: Fsm,
    blink: BlinkConfig,
    pulse: PulseProfile,
    idle_poll_us: u32,
    /// Pins successfully configured as outputs.
    initialized: BTreeSet<i32>,
    tick_count: u64,
}

impl EffectService {
    pub fn new(config: &DaemonConfig) -> Self {
        Self {
            fsm: Fsm::new(),
            blink: config.blink.clone(),
            pulse: PulseProfile::new(&config.pulse),
            idle_poll_us: config.idle_poll_interval_ms.saturating_mul(1000),
            initialized: BTreeSet::new(),
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Loop until `shutdown` is requested. The flag is checked once per
    /// tick, so an in-flight effect always completes first.
    pub fn run(
        &mut self,
        shutdown: &ShutdownFlag,
        source: &mut impl CommandSource,
        hw: &mut (impl PinPort + RandomPort + Sleeper),
        sink: &mut impl EventSink,
    ) {
        sink.emit(&DaemonEvent::Started);
        info!(
            "Effect loop running (pulse cycle {} ms)",
            self.pulse.cycle_duration_us() / 1000
        );

        while !shutdown.is_requested() {
            self.tick(source, hw, sink);
        }

        sink.emit(&DaemonEvent::Stopped {
            ticks: self.tick_count,
            commands: self.fsm.applied_count(),
        });
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// One non-blocking command check followed by one effect cycle.
    pub fn tick(
        &mut self,
        source: &mut impl CommandSource,
        hw: &mut (impl PinPort + RandomPort + Sleeper),
        sink: &mut impl EventSink,
    ) -> TickReport {
        self.tick_count += 1;

        let command = source
            .poll_line()
            .map(|line| self.handle_line(&line, hw, sink));

        let effect = self.run_effect(hw, sink);

        if command.is_none() && effect.is_none() && self.idle_poll_us > 0 {
            hw.sleep_us(self.idle_poll_us);
        }

        TickReport { command, effect }
    }

    // ── Command handling ──────────────────────────────────────

    /// Parse and apply one line. A malformed line changes nothing.
    pub fn handle_line(
        &mut self,
        line: &str,
        pins: &mut impl PinPort,
        sink: &mut impl EventSink,
    ) -> Result<Transition> {
        match Command::parse(line) {
            Ok(cmd) => self.handle_command(cmd, pins, sink),
            Err(error) => {
                sink.emit(&DaemonEvent::CommandRejected {
                    line: line.trim_end().to_owned(),
                    error,
                });
                Err(error.into())
            }
        }
    }

    /// Apply a parsed command and perform its one-shot pin action.
    ///
    /// The state change sticks even when the pin action fails.
    pub fn handle_command(
        &mut self,
        cmd: Command,
        pins: &mut impl PinPort,
        sink: &mut impl EventSink,
    ) -> Result<Transition> {
        if cmd.action != Action::Init && !self.initialized.contains(&cmd.pin) {
            warn!("{} on pin {} which was never INIT", cmd.action, cmd.pin);
        }

        let transition = self.fsm.apply(&cmd);
        sink.emit(&DaemonEvent::CommandApplied(cmd));
        if transition.changed_state() {
            sink.emit(&DaemonEvent::StateChanged {
                from: transition.from,
                to: transition.to,
                pin: transition.pin,
            });
        }

        let outcome = match transition.pin_action {
            Some(PinAction::ConfigureOutput(pin)) => pins
                .configure_output(pin)
                .map(|()| {
                    self.initialized.insert(pin);
                }),
            Some(PinAction::SetLevel(pin, level)) => pins.set_level(pin, level),
            None => Ok(()),
        };

        match outcome {
            Ok(()) => Ok(transition),
            Err(e) => {
                sink.emit(&DaemonEvent::HardwareFault(e));
                Err(e.into())
            }
        }
    }

    // ── Effects ───────────────────────────────────────────────

    fn run_effect(
        &mut self,
        hw: &mut (impl PinPort + RandomPort + Sleeper),
        sink: &mut impl EventSink,
    ) -> Option<Effect> {
        let (effect, pin) = self.fsm.active_effect()?;

        let result = match effect {
            Effect::Blink => {
                let timing = BlinkTiming::draw(hw, &self.blink).unwrap_or_else(|e| {
                    sink.emit(&DaemonEvent::EntropyFault(e));
                    BlinkTiming::fallback(&self.blink)
                });
                blink::blink(pin, timing, hw)
            }
            Effect::Pulse => pulse::pulse(pin, &self.pulse, hw),
        };

        if let Err(error) = result {
            sink.emit(&DaemonEvent::EffectFault { effect, error });
        }
        Some(effect)
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    pub fn current_pin(&self) -> Option<i32> {
        self.fsm.current_pin()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn commands_applied(&self) -> u64 {
        self.fsm.applied_count()
    }
}
