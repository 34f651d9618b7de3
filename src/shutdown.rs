//! Shutdown token.
//!
//! Set from the SIGINT/SIGTERM handler (or directly, in tests), polled by
//! the effect loop once per tick.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::info;

/// Cloneable cancellation flag. All clones share one state.
#[derive(Debug, Clone, Default)]
pub struct ShutdownFlag(Arc<AtomicBool>);

impl ShutdownFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Route SIGINT and SIGTERM to [`request`](Self::request).
    ///
    /// Only one handler may be installed per process.
    pub fn install_signal_handler(&self) -> Result<(), ctrlc::Error> {
        let flag = self.clone();
        ctrlc::set_handler(move || {
            info!("Termination signal received, stopping after current tick");
            flag.request();
        })
    }
}
