use serde::Serialize;

use crate::{ChladniError, PlateConfig, Result};

/// Named, immutable plate configuration offered for quick selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Preset {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub config: PlateConfig,
}

impl Preset {
    const fn new(
        id: &'static str,
        label: &'static str,
        description: &'static str,
        config: PlateConfig,
    ) -> Self {
        Self {
            id,
            label,
            description,
            config,
        }
    }
}

/// Classic square-plate resonances.
pub const PRESETS: [Preset; 6] = [
    Preset::new(
        "default",
        "Standard",
        "Classic asymmetric figure (m=2, n=3)",
        PlateConfig::new(2.0, 3.0, 1.0, 0.2, 1),
    ),
    Preset::new(
        "simple_cross",
        "Simple cross",
        "Lowest-order resonance (m=1, n=2)",
        PlateConfig::new(1.0, 2.0, 1.0, 0.1, 1),
    ),
    Preset::new(
        "high_freq",
        "Fine mesh",
        "Dense lattice at high frequency (m=7, n=8)",
        PlateConfig::new(7.0, 8.0, 1.5, 0.3, 1),
    ),
    Preset::new(
        "diagonal_sym",
        "Diagonal symmetry",
        "Fully symmetric figure from m = n (m=4, n=4)",
        PlateConfig::new(4.0, 4.0, 1.0, 0.2, 1),
    ),
    Preset::new(
        "complex_resonance",
        "Compound resonance",
        "Two superposed harmonics (m=5, n=3)",
        PlateConfig::new(5.0, 3.0, 1.2, 0.4, 2),
    ),
    Preset::new(
        "fine_structure",
        "Fine structure",
        "High-order subdivision (m=10, n=2)",
        PlateConfig::new(10.0, 2.0, 1.3, 0.5, 1),
    ),
];

pub fn find(id: &str) -> Result<&'static Preset> {
    PRESETS
        .iter()
        .find(|preset| preset.id == id)
        .ok_or_else(|| ChladniError::invalid(format!("unknown preset `{id}`")))
}
