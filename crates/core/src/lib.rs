//! Core library for the Chladni plate visualiser.
//!
//! The crate evaluates the standing-wave field of a vibrating square plate
//! and feeds it to two consumers: a grid sampler producing heat-map data and
//! a particle simulator in which sand settles on the nodal lines. Each module
//! owns one component (mode mapping, field evaluation, sampling, particles,
//! colour, timing) and the [`Session`] type wires them together for a host
//! that drives frames. Painting and UI belong to the host.

pub mod clock;
pub mod config;
pub mod error;
pub mod field;
pub mod grid;
pub mod modes;
pub mod palette;
pub mod particles;
pub mod presets;
pub mod session;

pub use clock::{Frame, Refresh, SimulationClock};
pub use config::{AppConfig, PlateConfig, SimulationSettings};
pub use error::{ChladniError, Result};
pub use field::{evaluate, WaveField};
pub use grid::{sample_grid, Grid};
pub use modes::{modes_from_frequency, ModeMapper};
pub use palette::{Palette, Rgb};
pub use particles::{Particle, ParticleSimulator};
pub use presets::{Preset, PRESETS};
pub use session::{Session, ViewMode};
