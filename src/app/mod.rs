//! Application core — pure domain logic, zero I/O.
//!
//! Command parsing, the effect service and its event vocabulary. All
//! interaction with GPIO, entropy, time and the command channel happens
//! through **port traits** defined in [`ports`], keeping this layer fully
//! testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
