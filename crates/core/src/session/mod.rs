use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::{
    sample_grid, AppConfig, Frame, Grid, Palette, Particle, ParticleSimulator, PlateConfig,
    SimulationClock, SimulationSettings,
};

/// Which consumer of the field the session drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// Heat-mapped grid of field samples.
    #[default]
    Field,
    /// Settling sand particles.
    Particles,
}

/// Long-lived context owning the clock, the current grid buffer and the
/// particle ensemble. The host pushes configurations in and calls
/// [`Session::frame`] from its frame callback.
#[derive(Debug)]
pub struct Session {
    config: PlateConfig,
    settings: SimulationSettings,
    palette: Palette,
    mode: ViewMode,
    clock: SimulationClock,
    grid: Option<Grid>,
    particles: Option<ParticleSimulator>,
}

impl Session {
    pub fn new(app: &AppConfig, mode: ViewMode) -> Self {
        let settings = app.simulation.clone();
        let clock = SimulationClock::new(settings.time_step, settings.throttle_interval());
        Self {
            config: app.plate,
            settings,
            palette: app.palette,
            mode,
            clock,
            grid: None,
            particles: None,
        }
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    pub fn clock_mut(&mut self) -> &mut SimulationClock {
        &mut self.clock
    }

    /// Replaces the configuration wholesale. The next frame recomputes
    /// without throttling. Particles keep their positions.
    pub fn set_config(&mut self, config: PlateConfig) {
        self.config = config;
        self.clock.mark_dirty();
    }

    pub fn set_mode(&mut self, mode: ViewMode) {
        if self.mode != mode {
            self.mode = mode;
            self.clock.mark_dirty();
        }
    }

    /// Latest grid, present once a field frame has been computed.
    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    /// Particle positions, present once particle mode has started.
    pub fn particles(&self) -> Option<&[Particle]> {
        self.particles.as_ref().map(ParticleSimulator::particles)
    }

    pub fn simulator(&self) -> Option<&ParticleSimulator> {
        self.particles.as_ref()
    }

    /// Runs one host frame. Returns the frame that was computed, or `None`
    /// when the clock throttled or is paused.
    pub fn frame(&mut self, now: Instant) -> Option<Frame> {
        let frame = self.clock.tick(now)?;
        match self.mode {
            ViewMode::Field => {
                self.grid = Some(sample_grid(
                    self.settings.width,
                    self.settings.height,
                    &self.config,
                    frame.time,
                ));
            }
            ViewMode::Particles => {
                let settings = &self.settings;
                self.particles
                    .get_or_insert_with(|| {
                        let sim = match settings.seed {
                            Some(seed) => ParticleSimulator::with_seed(settings.particle_count, seed),
                            None => ParticleSimulator::new(settings.particle_count),
                        };
                        sim.with_move_scale(settings.move_scale)
                    })
                    .tick(&self.config, frame.time);
            }
        }
        Some(frame)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::Refresh;

    fn small_app() -> AppConfig {
        AppConfig {
            simulation: SimulationSettings {
                width: 12,
                height: 10,
                particle_count: 64,
                seed: Some(3),
                ..SimulationSettings::default()
            },
            ..AppConfig::default()
        }
    }

    #[test]
    fn field_mode_produces_a_grid() {
        let mut session = Session::new(&small_app(), ViewMode::Field);
        assert!(session.grid().is_none());

        session.frame(Instant::now()).unwrap();
        let grid = session.grid().unwrap();
        assert_eq!((grid.width(), grid.height()), (12, 10));
        assert!(session.particles().is_none());
    }

    #[test]
    fn config_change_recomputes_immediately() {
        let start = Instant::now();
        let mut session = Session::new(&small_app(), ViewMode::Field);
        session.frame(start);
        assert!(session.frame(start + Duration::from_millis(5)).is_none());

        session.set_config(PlateConfig::new(4.0, 4.0, 1.0, 0.2, 1));
        let frame = session.frame(start + Duration::from_millis(6)).unwrap();
        assert_eq!(frame.refresh, Refresh::Immediate);
        assert_eq!(session.grid().unwrap().max_abs(), Some(0.0));
    }

    #[test]
    fn switching_to_particles_recomputes_immediately() {
        let start = Instant::now();
        let mut session = Session::new(&small_app(), ViewMode::Field);
        session.frame(start);
        let grid = session.grid().unwrap().clone();

        session.set_mode(ViewMode::Particles);
        let frame = session.frame(start + Duration::from_millis(1)).unwrap();
        assert_eq!(frame.refresh, Refresh::Immediate);
        assert_eq!(session.simulator().unwrap().len(), 64);
        assert_eq!(session.grid(), Some(&grid));

        // same mode again is not a change
        session.set_mode(ViewMode::Particles);
        assert!(session.frame(start + Duration::from_millis(2)).is_none());
    }

    #[test]
    fn particles_persist_across_configuration_changes() {
        let start = Instant::now();
        let mut session = Session::new(&small_app(), ViewMode::Particles);
        session.frame(start);
        let first = session.particles().unwrap().to_vec();

        // m = n stills the plate, so nothing moves after the change
        session.set_config(PlateConfig::new(4.0, 4.0, 1.0, 0.2, 1));
        session.frame(start + Duration::from_millis(1));
        assert_eq!(session.particles().unwrap(), first.as_slice());
        assert_eq!(session.simulator().unwrap().len(), 64);
    }
}
