//! Linux GPIO character-device backend.
//!
//! Pins are line offsets on one chip (`/dev/gpiochip0` by default). `INIT`
//! requests the line as an output, initially inactive, under the configured
//! consumer label; the request is held until shutdown. Writes to lines that
//! were never requested fail with [`HardwareError::NotConfigured`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use embedded_hal::digital::PinState;
use gpiocdev::Request;
use gpiocdev::chip::Chip;
use gpiocdev::line::Value;
use log::{debug, info, warn};

use crate::app::ports::PinPort;
use crate::error::HardwareError;

pub struct GpioChipPins {
    chip: PathBuf,
    consumer: String,
    num_lines: u32,
    lines: BTreeMap<u32, Request>,
}

impl GpioChipPins {
    /// Open the chip to validate it and learn its line count.
    pub fn open(chip: &Path, consumer: &str) -> gpiocdev::Result<Self> {
        let info = Chip::from_path(chip)?.info()?;
        info!(
            "GPIO chip '{}' ({}) opened, {} lines",
            chip.display(),
            info.label,
            info.num_lines
        );
        Ok(Self {
            chip: chip.to_path_buf(),
            consumer: consumer.to_owned(),
            num_lines: info.num_lines,
            lines: BTreeMap::new(),
        })
    }

    fn offset(&self, pin: i32) -> Result<u32, HardwareError> {
        u32::try_from(pin)
            .ok()
            .filter(|&o| o < self.num_lines)
            .ok_or(HardwareError::InvalidPin(pin))
    }
}

fn to_value(level: PinState) -> Value {
    match level {
        PinState::High => Value::Active,
        PinState::Low => Value::Inactive,
    }
}

impl PinPort for GpioChipPins {
    fn configure_output(&mut self, pin: i32) -> Result<(), HardwareError> {
        let offset = self.offset(pin)?;
        if self.lines.contains_key(&offset) {
            debug!("GPIO line {} already configured", offset);
            return Ok(());
        }

        let req = Request::builder()
            .on_chip(&self.chip)
            .with_consumer(self.consumer.as_str())
            .with_line(offset)
            .as_output(Value::Inactive)
            .request()
            .map_err(|e| {
                warn!("GPIO line {} request failed: {}", offset, e);
                HardwareError::ConfigureFailed(pin)
            })?;

        info!("GPIO line {} configured as output", offset);
        self.lines.insert(offset, req);
        Ok(())
    }

    fn set_level(&mut self, pin: i32, level: PinState) -> Result<(), HardwareError> {
        let offset = self.offset(pin)?;
        let req = self
            .lines
            .get_mut(&offset)
            .ok_or(HardwareError::NotConfigured(pin))?;
        req.set_value(offset, to_value(level))
            .map_err(|_| HardwareError::WriteFailed(pin))
    }

    fn release_all(&mut self) {
        if !self.lines.is_empty() {
            info!("Releasing {} GPIO line(s)", self.lines.len());
        }
        self.lines.clear();
    }
}
