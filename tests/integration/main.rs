//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises the daemon against mock
//! adapters. Everything runs on the host with no GPIO chip required.

mod mock_hw;
mod service_tests;
