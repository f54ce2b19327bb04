//! Closed-form wave field of a vibrating square plate.
//!
//! The amplitude at a point is a superposition of `complexity` copies of the
//! classic square-plate mode shape
//!
//! ```text
//! sin(nπx)·sin(mπy) − sin(mπx)·sin(nπy)
//! ```
//!
//! where harmonic `i` is weighted by `1/i` and wobbles in time by
//! `1 + 0.1·sin(0.2·t + i)`. The whole sum is attenuated radially by
//! `exp(−damping·r)`. Nodal lines are the zero set of the mode shape.

use std::f64::consts::PI;

use crate::PlateConfig;

/// Depth of the per-harmonic time wobble.
const WOBBLE_DEPTH: f64 = 0.1;
/// Angular speed of the per-harmonic time wobble.
const WOBBLE_RATE: f64 = 0.2;

/// Evaluates the field at `(x, y)` in normalised plate coordinates.
///
/// The plate centre always evaluates to exactly zero.
pub fn evaluate(x: f64, y: f64, config: &PlateConfig, time: f64) -> f64 {
    WaveField::new(config, time).sample(x, y)
}

/// Combined weight of all harmonic terms at `time`:
/// `Σ (1/i)·(1 + 0.1·sin(0.2·t + i))` for `i = 1..=complexity`.
pub fn harmonic_weight(complexity: u32, time: f64) -> f64 {
    (1..=complexity.max(1))
        .map(|i| {
            let i = f64::from(i);
            (1.0 + WOBBLE_DEPTH * (WOBBLE_RATE * time + i).sin()) / i
        })
        .sum()
}

/// Field frozen at one configuration and instant.
///
/// The mode shape does not depend on the harmonic index, so the harmonic sum
/// collapses into one scalar computed up front. Sampling a point then costs
/// four sines and one exponential regardless of complexity.
#[derive(Debug, Clone, Copy)]
pub struct WaveField {
    m_pi: f64,
    n_pi: f64,
    damping: f64,
    gain: f64,
}

impl WaveField {
    pub fn new(config: &PlateConfig, time: f64) -> Self {
        Self {
            m_pi: config.mode_x * PI,
            n_pi: config.mode_y * PI,
            damping: config.damping,
            gain: config.amplitude * harmonic_weight(config.effective_complexity(), time),
        }
    }

    /// Undamped, unscaled mode shape at `(x, y)`.
    pub fn mode_shape(&self, x: f64, y: f64) -> f64 {
        (self.n_pi * x).sin() * (self.m_pi * y).sin()
            - (self.m_pi * x).sin() * (self.n_pi * y).sin()
    }

    /// Radial attenuation factor at `(x, y)`.
    pub fn attenuation(&self, x: f64, y: f64) -> f64 {
        (-self.damping * x.hypot(y)).exp()
    }

    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let shape = self.mode_shape(x, y);
        if shape == 0.0 {
            return 0.0;
        }
        shape * self.attenuation(x, y) * self.gain
    }
}
