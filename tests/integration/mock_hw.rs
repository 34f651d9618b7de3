//! Mock adapters for integration tests.
//!
//! Records every pin, entropy and sleep call so tests can assert on the
//! full history without touching a GPIO chip or sleeping for real.

use std::collections::{BTreeSet, VecDeque};

use embedded_hal::digital::PinState;
use gpiod::app::events::DaemonEvent;
use gpiod::app::ports::{CommandSource, EventSink, PinPort, RandomPort, Sleeper};
use gpiod::error::{EntropyError, HardwareError};
use gpiod::shutdown::ShutdownFlag;

// ── Hardware call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwCall {
    Configure(i32),
    Level(i32, PinState),
    Sleep(u32),
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub calls: Vec<HwCall>,
    configured: BTreeSet<i32>,
    /// Raw words handed out by `next_u32`, front first. Empty → `ShortRead`.
    pub entropy: VecDeque<u32>,
    pub released: bool,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            configured: BTreeSet::new(),
            entropy: VecDeque::new(),
            released: false,
        }
    }

    pub fn with_entropy(words: impl IntoIterator<Item = u32>) -> Self {
        let mut hw = Self::new();
        hw.entropy.extend(words);
        hw
    }

    /// Level of the last successful write to `pin`.
    pub fn level(&self, pin: i32) -> Option<PinState> {
        self.calls.iter().rev().find_map(|c| match c {
            HwCall::Level(p, level) if *p == pin => Some(*level),
            _ => None,
        })
    }

    pub fn levels(&self) -> Vec<(i32, PinState)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HwCall::Level(p, level) => Some((*p, *level)),
                _ => None,
            })
            .collect()
    }

    pub fn sleeps(&self) -> Vec<u32> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HwCall::Sleep(us) => Some(*us),
                _ => None,
            })
            .collect()
    }

    pub fn total_sleep_us(&self) -> u64 {
        self.sleeps().into_iter().map(u64::from).sum()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl PinPort for MockHardware {
    fn configure_output(&mut self, pin: i32) -> Result<(), HardwareError> {
        if pin < 0 {
            return Err(HardwareError::InvalidPin(pin));
        }
        self.configured.insert(pin);
        self.calls.push(HwCall::Configure(pin));
        Ok(())
    }

    fn set_level(&mut self, pin: i32, level: PinState) -> Result<(), HardwareError> {
        if !self.configured.contains(&pin) {
            return Err(HardwareError::NotConfigured(pin));
        }
        self.calls.push(HwCall::Level(pin, level));
        Ok(())
    }

    fn release_all(&mut self) {
        self.configured.clear();
        self.released = true;
    }
}

impl RandomPort for MockHardware {
    fn next_u32(&mut self) -> Result<u32, EntropyError> {
        self.entropy.pop_front().ok_or(EntropyError::ShortRead)
    }
}

impl Sleeper for MockHardware {
    fn sleep_us(&mut self, micros: u32) {
        self.calls.push(HwCall::Sleep(micros));
    }
}

// ── ScriptedSource ────────────────────────────────────────────

/// Hands out one scripted line per poll. Optionally requests shutdown
/// after a fixed number of polls.
pub struct ScriptedSource {
    lines: VecDeque<String>,
    polls: u32,
    stop: Option<(u32, ShutdownFlag)>,
}

#[allow(dead_code)]
impl ScriptedSource {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|l| (*l).to_owned()).collect(),
            polls: 0,
            stop: None,
        }
    }

    pub fn stop_after(mut self, polls: u32, flag: &ShutdownFlag) -> Self {
        self.stop = Some((polls, flag.clone()));
        self
    }

    pub fn push(&mut self, line: &str) {
        self.lines.push_back(line.to_owned());
    }

    pub fn polls(&self) -> u32 {
        self.polls
    }
}

impl CommandSource for ScriptedSource {
    fn poll_line(&mut self) -> Option<String> {
        self.polls += 1;
        if let Some((limit, flag)) = &self.stop {
            if self.polls >= *limit {
                flag.request();
            }
        }
        self.lines.pop_front()
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<DaemonEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn count(&self, pred: impl Fn(&DaemonEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &DaemonEvent) {
        self.events.push(event.clone());
    }
}
