//! Inbound commands and the line protocol of the command channel.
//!
//! One command per line, `<ACTION> <PIN>`:
//!
//! ```text
//! INIT 5      configure pin 5 as output
//! BLINK 5     random flicker
//! PULSE 5     gamma-shaped breathing
//! ON 5        steady high
//! OFF 5       steady low
//! ```
//!
//! Actions are case-sensitive and matched exactly. The pin is a base-10
//! `i32`; negative values parse and are left to the pin backend to reject.

use core::fmt;
use core::str::FromStr;
use std::collections::VecDeque;

use log::warn;

use crate::error::CommandError;

/// Longest line the channel will assemble; anything longer is dropped.
pub const MAX_LINE_LEN: usize = 1024;

/// The five actions understood by the daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Init,
    Blink,
    Pulse,
    Off,
    On,
}

impl Action {
    pub const ALL: [Action; 5] = [Self::Init, Self::Blink, Self::Pulse, Self::Off, Self::On];

    /// Wire keyword for this action.
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Init => "INIT",
            Self::Blink => "BLINK",
            Self::Pulse => "PULSE",
            Self::Off => "OFF",
            Self::On => "ON",
        }
    }
}

impl FromStr for Action {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.keyword() == s)
            .ok_or(CommandError::UnknownAction)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A parsed command. Consumed once by the service, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub action: Action,
    pub pin: i32,
}

impl Command {
    pub const fn new(action: Action, pin: i32) -> Self {
        Self { action, pin }
    }

    /// Parse one line. Trailing newline and surrounding whitespace are ignored.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut tokens = line.split_whitespace();
        let (Some(action), Some(pin), None) = (tokens.next(), tokens.next(), tokens.next()) else {
            return Err(CommandError::TokenCount(line.split_whitespace().count()));
        };
        let action = action.parse::<Action>()?;
        let pin = pin.parse::<i32>().map_err(|_| CommandError::InvalidPin)?;
        Ok(Self { action, pin })
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.action, self.pin)
    }
}

// ---------------------------------------------------------------------------
// Line assembly
// ---------------------------------------------------------------------------

/// Turns a byte stream into bounded text lines.
///
/// Bytes accumulate in a fixed [`MAX_LINE_LEN`] buffer. A `\n` completes a
/// line. A line that outgrows the buffer is dropped whole, up to and
/// including its newline, and never reaches the parser. Completed lines
/// queue up and are handed out one at a time.
pub struct LineAssembler {
    partial: heapless::Vec<u8, MAX_LINE_LEN>,
    ready: VecDeque<String>,
    /// Inside an overlong line; skip until the next `\n`.
    discarding: bool,
    discarded: u64,
}

impl Default for LineAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl LineAssembler {
    pub fn new() -> Self {
        Self {
            partial: heapless::Vec::new(),
            ready: VecDeque::new(),
            discarding: false,
            discarded: 0,
        }
    }

    /// Feed raw bytes from the channel.
    pub fn push(&mut self, bytes: &[u8]) {
        for &b in bytes {
            if self.discarding {
                if b == b'\n' {
                    self.discarding = false;
                }
            } else if b == b'\n' {
                self.complete();
            } else if self.partial.push(b).is_err() {
                self.discard();
            }
        }
    }

    /// Deliver any unterminated tail as a final line (writer hung up).
    pub fn flush(&mut self) {
        self.discarding = false;
        if !self.partial.is_empty() {
            self.complete();
        }
    }

    /// Next completed line, oldest first.
    pub fn next_line(&mut self) -> Option<String> {
        self.ready.pop_front()
    }

    /// Number of completed lines waiting.
    pub fn pending(&self) -> usize {
        self.ready.len()
    }

    /// Overlong lines dropped since creation.
    pub fn discarded(&self) -> u64 {
        self.discarded
    }

    fn complete(&mut self) {
        let line = String::from_utf8_lossy(&self.partial).into_owned();
        self.partial.clear();
        self.ready.push_back(line);
    }

    fn discard(&mut self) {
        warn!(
            "CMD | line longer than {} bytes discarded (starts '{}')",
            MAX_LINE_LEN,
            String::from_utf8_lossy(&self.partial[..self.partial.len().min(16)])
        );
        self.partial.clear();
        self.discarding = true;
        self.discarded += 1;
    }
}
