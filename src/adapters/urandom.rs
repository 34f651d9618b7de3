//! Kernel entropy adapter.
//!
//! Opens the entropy device once at startup and reads one native-endian
//! `u32` per draw. The handle is closed when the adapter is dropped.

use std::fs::File;
use std::io::{self, ErrorKind, Read};
use std::path::Path;

use log::info;

use crate::app::ports::RandomPort;
use crate::error::EntropyError;

pub struct UrandomSource {
    file: File,
}

impl UrandomSource {
    /// Open the entropy device (normally `/dev/urandom`).
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        info!("Entropy source '{}' opened", path.display());
        Ok(Self { file })
    }
}

impl RandomPort for UrandomSource {
    fn next_u32(&mut self) -> Result<u32, EntropyError> {
        let mut word = [0u8; 4];
        match self.file.read_exact(&mut word) {
            Ok(()) => Ok(u32::from_ne_bytes(word)),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(EntropyError::ShortRead),
            Err(_) => Err(EntropyError::ReadFailed),
        }
    }
}
