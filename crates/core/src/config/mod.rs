use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{ChladniError, ModeMapper, Palette, Result};

/// Modal parameters of the plate. Replaced wholesale whenever the shell edits
/// a value, never mutated in place by the core.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlateConfig {
    /// X-direction modal number (m).
    pub mode_x: f64,
    /// Y-direction modal number (n).
    pub mode_y: f64,
    pub amplitude: f64,
    /// Radial decay coefficient; zero disables decay.
    pub damping: f64,
    /// Number of superposed harmonic terms.
    pub complexity: u32,
}

impl Default for PlateConfig {
    fn default() -> Self {
        Self {
            mode_x: 2.0,
            mode_y: 3.0,
            amplitude: 1.2,
            damping: 0.2,
            complexity: 1,
        }
    }
}

impl PlateConfig {
    pub const fn new(
        mode_x: f64,
        mode_y: f64,
        amplitude: f64,
        damping: f64,
        complexity: u32,
    ) -> Self {
        Self {
            mode_x,
            mode_y,
            amplitude,
            damping,
            complexity,
        }
    }

    /// Returns a copy of the configuration with its modal numbers replaced.
    pub fn with_modes(self, mode_x: f64, mode_y: f64) -> Self {
        Self {
            mode_x,
            mode_y,
            ..self
        }
    }

    /// Number of harmonic terms actually evaluated. A complexity of zero is
    /// treated as one.
    pub fn effective_complexity(&self) -> u32 {
        self.complexity.max(1)
    }

    /// Modal numbers must be at least one. Odd but well-defined values such
    /// as negative damping or amplitude are accepted as long as they are
    /// finite.
    pub fn validate(&self) -> Result<()> {
        if !(self.mode_x >= 1.0 && self.mode_y >= 1.0) {
            return Err(ChladniError::invalid(format!(
                "modal numbers must be at least 1, got m={} n={}",
                self.mode_x, self.mode_y
            )));
        }
        if !self.mode_x.is_finite() || !self.mode_y.is_finite() {
            return Err(ChladniError::invalid("modal numbers must be finite"));
        }
        if !self.amplitude.is_finite() || !self.damping.is_finite() {
            return Err(ChladniError::invalid(
                "amplitude and damping must be finite",
            ));
        }
        Ok(())
    }
}

/// Tunables for the sampling, particle and clock subsystems.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    pub width: usize,
    pub height: usize,
    pub particle_count: usize,
    /// Scale applied to the local field magnitude when jittering particles.
    pub move_scale: f64,
    /// Simulation time added per animation tick.
    pub time_step: f64,
    /// Minimum wall-clock spacing between throttled recomputations.
    pub throttle_ms: u64,
    /// Plate stiffness proxy used by the frequency to mode mapping.
    pub base_v: f64,
    pub seed: Option<u64>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            width: 500,
            height: 450,
            particle_count: 20_000,
            move_scale: 0.015,
            time_step: 0.05,
            throttle_ms: 50,
            base_v: 200.0,
            seed: None,
        }
    }
}

impl SimulationSettings {
    pub fn throttle_interval(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }
}

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub plate: PlateConfig,
    pub simulation: SimulationSettings,
    pub palette: Palette,
}

impl AppConfig {
    /// Parses a configuration document. Missing sections fall back to their
    /// defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Rejects settings no component can work with.
    pub fn validate(&self) -> Result<()> {
        self.plate.validate()?;
        let sim = &self.simulation;
        if !(sim.move_scale.is_finite() && sim.move_scale >= 0.0) {
            return Err(ChladniError::invalid(
                "move_scale must be a non-negative number",
            ));
        }
        if !(sim.time_step.is_finite() && sim.time_step >= 0.0) {
            return Err(ChladniError::invalid(
                "time_step must be a non-negative number",
            ));
        }
        ModeMapper::with_base_v(sim.base_v)?;
        Ok(())
    }
}
