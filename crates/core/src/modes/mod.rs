use crate::{ChladniError, Result};

/// Default plate stiffness proxy.
pub const BASE_V: f64 = 200.0;

/// Inclusive bounds of the integer mode search.
const MIN_MODE: u32 = 1;
const MAX_MODE: u32 = 15;

/// Maps an excitation frequency onto the nearest integer mode pair using the
/// simplified plate law `f = C * (m² + n²)` with `C = base_v / 10`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeMapper {
    base_v: f64,
}

impl Default for ModeMapper {
    fn default() -> Self {
        Self { base_v: BASE_V }
    }
}

impl ModeMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails unless `base_v` is a positive number; a zero constant would
    /// make every candidate tie.
    pub fn with_base_v(base_v: f64) -> Result<Self> {
        if !(base_v.is_finite() && base_v > 0.0) {
            return Err(ChladniError::invalid(format!(
                "base_v must be a positive number, got {base_v}"
            )));
        }
        Ok(Self { base_v })
    }

    /// Material constant `C`.
    pub fn constant(&self) -> f64 {
        self.base_v / 10.0
    }

    /// Frequency the plate resonates at for the given mode pair.
    pub fn frequency_of(&self, m: u32, n: u32) -> f64 {
        let (m, n) = (f64::from(m), f64::from(n));
        self.constant() * (m * m + n * n)
    }

    /// Returns the pair in `[1, 15]²` whose resonant frequency is closest to
    /// `freq_hz`. Ties resolve to the first pair in ascending `(m, n)` order.
    pub fn modes_from_frequency(&self, freq_hz: f64) -> Result<(u32, u32)> {
        if !freq_hz.is_finite() || freq_hz <= 0.0 {
            return Err(ChladniError::invalid(format!(
                "frequency must be a positive number, got {freq_hz}"
            )));
        }

        let mut best = (MIN_MODE, MIN_MODE);
        let mut min_diff = f64::INFINITY;
        for m in MIN_MODE..=MAX_MODE {
            for n in MIN_MODE..=MAX_MODE {
                let diff = (self.frequency_of(m, n) - freq_hz).abs();
                // strict comparison keeps the earliest pair on ties
                if diff < min_diff {
                    min_diff = diff;
                    best = (m, n);
                }
            }
        }
        Ok(best)
    }
}

/// Convenience wrapper using the default [`BASE_V`].
pub fn modes_from_frequency(freq_hz: f64) -> Result<(u32, u32)> {
    ModeMapper::default().modes_from_frequency(freq_hz)
}
