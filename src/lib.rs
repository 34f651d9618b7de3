//! gpiod library.
//!
//! Exposes the effect service, its ports and the host adapters for the
//! daemon binary and for integration testing. The GPIO character-device
//! backend is behind the `gpiocdev` feature.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod fsm;
pub mod logging;
pub mod shutdown;
