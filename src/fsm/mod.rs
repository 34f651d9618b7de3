//! Effect state machine.
//!
//! ```text
//! ┌────────┬─────────────┬─────────────┬──────────────────────┐
//! │ Action │ CurrentPin  │ State       │ Immediate pin action │
//! ├────────┼─────────────┼─────────────┼──────────────────────┤
//! │ INIT n │ n           │ unchanged   │ configure n output   │
//! │ BLINK n│ n           │ Blink       │ —                    │
//! │ PULSE n│ n           │ Pulse       │ —                    │
//! │ ON n   │ n           │ On          │ n high               │
//! │ OFF n  │ n           │ Off         │ n low                │
//! └────────┴─────────────┴─────────────┴──────────────────────┘
//! ```
//!
//! Every command moves to its target state from any state (`INIT` leaves
//! the state alone). Every command also updates the current pin. `On` and
//! `Off` produce a one-shot level change at the moment they are applied;
//! `Blink` and `Pulse` are continuous and re-run by the service each tick.
//!
//! The machine itself does no I/O. [`Fsm::apply`] returns a [`Transition`]
//! describing the pin action the caller must perform right now.

use embedded_hal::digital::PinState;
use log::{debug, info};

use crate::app::commands::{Action, Command};
use crate::drivers::Effect;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum StateId {
    #[default]
    Idle = 0,
    On = 1,
    Off = 2,
    Blink = 3,
    Pulse = 4,
}

impl StateId {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::On => "on",
            Self::Off => "off",
            Self::Blink => "blink",
            Self::Pulse => "pulse",
        }
    }

    /// The effect re-run every tick while in this state, if any.
    pub const fn effect(self) -> Option<Effect> {
        match self {
            Self::Blink => Some(Effect::Blink),
            Self::Pulse => Some(Effect::Pulse),
            Self::Idle | Self::On | Self::Off => None,
        }
    }

    /// Target state for an action. `None` means "unchanged" (`INIT`).
    const fn for_action(action: Action) -> Option<Self> {
        match action {
            Action::Init => None,
            Action::Blink => Some(Self::Blink),
            Action::Pulse => Some(Self::Pulse),
            Action::Off => Some(Self::Off),
            Action::On => Some(Self::On),
        }
    }
}

// ---------------------------------------------------------------------------
// Transition result
// ---------------------------------------------------------------------------

/// One-shot pin work the caller must perform for a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinAction {
    ConfigureOutput(i32),
    SetLevel(i32, PinState),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: StateId,
    pub to: StateId,
    pub pin: i32,
    pub pin_action: Option<PinAction>,
}

impl Transition {
    pub fn changed_state(&self) -> bool {
        self.from != self.to
    }
}

// ---------------------------------------------------------------------------
// FSM
// ---------------------------------------------------------------------------

/// Current effect state and pin. Only [`Fsm::apply`] mutates it.
#[derive(Debug, Default)]
pub struct Fsm {
    current: StateId,
    pin: Option<i32>,
    applied: u64,
}

impl Fsm {
    /// Start in `Idle` with no pin selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one parsed command.
    pub fn apply(&mut self, cmd: &Command) -> Transition {
        let from = self.current;
        let to = StateId::for_action(cmd.action).unwrap_or(from);

        if self.pin != Some(cmd.pin) {
            debug!("FSM pin: {:?} -> {}", self.pin, cmd.pin);
        }
        self.pin = Some(cmd.pin);
        self.applied += 1;

        if to != from {
            info!("FSM transition: {} -> {} (pin {})", from.name(), to.name(), cmd.pin);
            self.current = to;
        }

        let pin_action = match cmd.action {
            Action::Init => Some(PinAction::ConfigureOutput(cmd.pin)),
            Action::On => Some(PinAction::SetLevel(cmd.pin, PinState::High)),
            Action::Off => Some(PinAction::SetLevel(cmd.pin, PinState::Low)),
            Action::Blink | Action::Pulse => None,
        };

        Transition {
            from,
            to,
            pin: cmd.pin,
            pin_action,
        }
    }

    pub fn current_state(&self) -> StateId {
        self.current
    }

    /// Last pin named by any applied command, `None` before the first one.
    pub fn current_pin(&self) -> Option<i32> {
        self.pin
    }

    /// Effect to run this tick together with its pin.
    pub fn active_effect(&self) -> Option<(Effect, i32)> {
        Some((self.current.effect()?, self.pin?))
    }

    /// Commands applied since start.
    pub fn applied_count(&self) -> u64 {
        self.applied
    }
}
