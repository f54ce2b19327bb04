use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{PlateConfig, WaveField};

/// Default ensemble size.
pub const DEFAULT_PARTICLE_COUNT: usize = 20_000;
/// Default jitter per unit of field magnitude.
pub const DEFAULT_MOVE_SCALE: f64 = 0.015;

const HALF: f64 = 0.5;

/// A grain of sand in normalised plate coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
}

impl Particle {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn clamp_to_plate(&mut self) {
        self.x = self.x.clamp(-HALF, HALF);
        self.y = self.y.clamp(-HALF, HALF);
    }
}

/// Moves every particle by a random step whose size is proportional to the
/// field magnitude under it, then pins it back onto the plate.
///
/// Particles on a nodal line feel no kick, so over many calls the ensemble
/// piles up on the nodes. Coordinates that leave the plate stick to the edge
/// rather than reflecting.
pub fn drift<R: Rng>(
    particles: &mut [Particle],
    rng: &mut R,
    config: &PlateConfig,
    time: f64,
    move_scale: f64,
) {
    let field = WaveField::new(config, time);
    for particle in particles.iter_mut() {
        let jitter = field.sample(particle.x, particle.y).abs() * move_scale;
        particle.x += (rng.gen::<f64>() - HALF) * jitter;
        particle.y += (rng.gen::<f64>() - HALF) * jitter;
        particle.clamp_to_plate();
    }
}

/// Owns a fixed-size particle ensemble and the random source that drives it.
///
/// The ensemble is seeded once and survives configuration changes; only the
/// drift pattern of subsequent ticks changes.
#[derive(Debug, Clone)]
pub struct ParticleSimulator {
    particles: Vec<Particle>,
    rng: StdRng,
    move_scale: f64,
}

impl ParticleSimulator {
    /// Scatters `count` particles uniformly over the plate using an
    /// entropy-seeded generator.
    pub fn new(count: usize) -> Self {
        Self::from_rng(count, StdRng::from_entropy())
    }

    /// Same as [`ParticleSimulator::new`] but reproducible.
    pub fn with_seed(count: usize, seed: u64) -> Self {
        Self::from_rng(count, StdRng::seed_from_u64(seed))
    }

    fn from_rng(count: usize, mut rng: StdRng) -> Self {
        let particles = (0..count)
            .map(|_| Particle::new(rng.gen::<f64>() - HALF, rng.gen::<f64>() - HALF))
            .collect();
        Self {
            particles,
            rng,
            move_scale: DEFAULT_MOVE_SCALE,
        }
    }

    pub fn with_move_scale(mut self, move_scale: f64) -> Self {
        self.move_scale = move_scale;
        self
    }

    pub fn move_scale(&self) -> f64 {
        self.move_scale
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Advances the ensemble by one step under `config` at `time`.
    pub fn tick(&mut self, config: &PlateConfig, time: f64) {
        drift(&mut self.particles, &mut self.rng, config, time, self.move_scale);
    }

    /// Counts particles per cell of a `bins × bins` lattice, row-major with
    /// rows running along y.
    pub fn density(&self, bins: usize) -> Vec<usize> {
        let mut counts = vec![0; bins * bins];
        if bins == 0 {
            return counts;
        }
        let cell = |coord: f64| (((coord + HALF) * bins as f64) as usize).min(bins - 1);
        for particle in &self.particles {
            counts[cell(particle.y) * bins + cell(particle.x)] += 1;
        }
        counts
    }

    /// Share of particles whose local field magnitude is at most `threshold`.
    pub fn nodal_fraction(&self, config: &PlateConfig, time: f64, threshold: f64) -> f64 {
        if self.particles.is_empty() {
            return 0.0;
        }
        let field = WaveField::new(config, time);
        let resting = self
            .particles
            .iter()
            .filter(|p| field.sample(p.x, p.y).abs() <= threshold)
            .count();
        resting as f64 / self.particles.len() as f64
    }

    /// Mean field magnitude felt by the ensemble.
    pub fn mean_magnitude(&self, config: &PlateConfig, time: f64) -> f64 {
        if self.particles.is_empty() {
            return 0.0;
        }
        let field = WaveField::new(config, time);
        let total: f64 = self
            .particles
            .iter()
            .map(|p| field.sample(p.x, p.y).abs())
            .sum();
        total / self.particles.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on_plate(p: &Particle) -> bool {
        (-0.5..=0.5).contains(&p.x) && (-0.5..=0.5).contains(&p.y)
    }

    #[test]
    fn initial_scatter_covers_the_plate() {
        let sim = ParticleSimulator::with_seed(4_000, 7);
        assert_eq!(sim.len(), 4_000);
        assert!(sim.particles().iter().all(on_plate));

        let density = sim.density(2);
        assert_eq!(density.iter().sum::<usize>(), 4_000);
        assert!(density.iter().all(|count| *count > 800));
    }

    #[test]
    fn particles_never_leave_the_plate() {
        let config = PlateConfig::new(3.0, 5.0, 40.0, 0.0, 3);
        let mut sim = ParticleSimulator::with_seed(1_000, 1).with_move_scale(0.5);
        for step in 0..200 {
            sim.tick(&config, step as f64 * 0.05);
            assert!(sim.particles().iter().all(on_plate));
        }
    }

    #[test]
    fn edge_particles_stick_instead_of_reflecting() {
        let config = PlateConfig::new(1.0, 2.0, 1_000.0, 0.0, 1);
        let mut particles = vec![Particle::new(0.499, 0.3); 64];
        let mut rng = StdRng::seed_from_u64(3);
        drift(&mut particles, &mut rng, &config, 0.0, 1.0);
        assert!(particles.iter().any(|p| p.x == 0.5 || p.y == 0.5 || p.y == -0.5));
        assert!(particles.iter().all(on_plate));
    }

    #[test]
    fn still_field_leaves_particles_in_place() {
        // m = n makes the mode shape vanish everywhere
        let config = PlateConfig::new(4.0, 4.0, 1.0, 0.2, 1);
        let mut sim = ParticleSimulator::with_seed(500, 11);
        let before = sim.particles().to_vec();
        for step in 0..10 {
            sim.tick(&config, step as f64);
        }
        assert_eq!(sim.particles(), before.as_slice());
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let config = PlateConfig::default();
        let mut a = ParticleSimulator::with_seed(300, 42);
        let mut b = ParticleSimulator::with_seed(300, 42);
        for step in 0..25 {
            a.tick(&config, step as f64 * 0.05);
            b.tick(&config, step as f64 * 0.05);
        }
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn ensemble_survives_configuration_changes() {
        let mut sim = ParticleSimulator::with_seed(250, 5);
        sim.tick(&PlateConfig::default(), 0.0);
        sim.tick(&PlateConfig::new(7.0, 8.0, 1.5, 0.3, 1), 0.05);
        assert_eq!(sim.len(), 250);
    }

    #[test]
    fn sand_settles_towards_nodal_lines() {
        let config = PlateConfig::new(2.0, 3.0, 1.0, 0.2, 1);
        let mut sim = ParticleSimulator::with_seed(2_000, 9).with_move_scale(0.1);
        let before = sim.mean_magnitude(&config, 0.0);
        let resting_before = sim.nodal_fraction(&config, 0.0, 0.1);
        for _ in 0..1_000 {
            sim.tick(&config, 0.0);
        }
        assert!(sim.mean_magnitude(&config, 0.0) < before * 0.8);
        assert!(sim.nodal_fraction(&config, 0.0, 0.1) > resting_before);
    }

    #[test]
    fn empty_histogram_for_zero_bins() {
        let sim = ParticleSimulator::with_seed(10, 0);
        assert!(sim.density(0).is_empty());
    }
}
