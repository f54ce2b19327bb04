use serde::Serialize;

use crate::{PlateConfig, WaveField};

/// Row-major raster of field samples together with their extrema.
///
/// An empty grid reports `min = +∞` and `max = −∞`; callers must check
/// [`Grid::is_empty`] before normalising against them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grid {
    width: usize,
    height: usize,
    values: Vec<f64>,
    min: f64,
    max: f64,
}

impl Grid {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.values.get(row * self.width + col).copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks_exact panics on zero, an empty grid has no rows anyway
        self.values.chunks_exact(self.width.max(1))
    }

    /// Symmetric normalisation bound `max(|min|, |max|)`, or `None` for an
    /// empty grid.
    pub fn max_abs(&self) -> Option<f64> {
        if self.is_empty() {
            None
        } else {
            Some(self.min.abs().max(self.max.abs()))
        }
    }

    /// Maps every sample into `[0, 1]` around zero using [`Grid::max_abs`].
    /// A flat field maps to 0.5 everywhere.
    pub fn normalized(&self) -> Vec<f64> {
        match self.max_abs() {
            Some(max_abs) if max_abs > 0.0 => self
                .values
                .iter()
                .map(|v| (v + max_abs) / (2.0 * max_abs))
                .collect(),
            _ => vec![0.5; self.values.len()],
        }
    }
}

/// Rasterises the field over a `width × height` lattice.
///
/// Cell `(i, j)` samples `x = j/width − 0.5`, `y = i/height − 0.5`. Extrema
/// are reduced in the same pass, so an empty lattice keeps the `±∞` seeds.
pub fn sample_grid(width: usize, height: usize, config: &PlateConfig, time: f64) -> Grid {
    let field = WaveField::new(config, time);
    let mut values = Vec::with_capacity(width * height);
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for i in 0..height {
        let y = i as f64 / height as f64 - 0.5;
        for j in 0..width {
            let x = j as f64 / width as f64 - 0.5;
            let value = field.sample(x, y);
            min = min.min(value);
            max = max.max(value);
            values.push(value);
        }
    }

    tracing::debug!(width, height, min, max, "sampled grid");
    Grid {
        width,
        height,
        values,
        min,
        max,
    }
}
