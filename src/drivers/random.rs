//! Bounded random integers.
//!
//! A raw 32-bit word `n` is mapped onto `[min, max)` as
//! `min + floor((max - min) * n / 0xFFFF_FFFF)`. Only `n == u32::MAX` lands
//! on `max` itself; it is clamped to `max - 1`.

use core::ops::Range;

use crate::app::ports::RandomPort;
use crate::error::EntropyError;

/// Map a raw word onto `range`. An empty range yields `range.start`.
pub fn scale(raw: u32, range: &Range<u32>) -> u32 {
    if range.end <= range.start {
        return range.start;
    }
    let span = f64::from(range.end - range.start);
    let offset = (span * f64::from(raw) / f64::from(u32::MAX)).floor() as u32;
    (range.start + offset).min(range.end - 1)
}

/// Draw one value from `rng` and map it onto `range`.
pub fn random_in_range(
    rng: &mut impl RandomPort,
    range: &Range<u32>,
) -> Result<u32, EntropyError> {
    rng.next_u32().map(|raw| scale(raw, range))
}
