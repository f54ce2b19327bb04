use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use chladni_core::{
    presets, sample_grid, AppConfig, ModeMapper, Palette, ParticleSimulator, PlateConfig,
    Refresh, Session, ViewMode, PRESETS,
};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Host frame spacing used by `animate` (60 Hz).
const FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

fn main() -> chladni_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let app = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    match cli.command {
        Commands::Modes { freq_hz, base_v } => {
            run_modes(freq_hz, base_v.unwrap_or(app.simulation.base_v))
        }
        Commands::Grid {
            plate,
            width,
            height,
            time,
            json,
        } => run_grid(&app, &plate, width, height, time, json),
        Commands::Particles {
            plate,
            ticks,
            count,
            seed,
            bins,
            threshold,
        } => run_particles(&app, &plate, ticks, count, seed, bins, threshold),
        Commands::Animate {
            plate,
            frames,
            palette,
            paused,
        } => run_animate(app, &plate, frames, palette.as_deref(), paused),
        Commands::Presets => run_presets(),
    }
}

fn run_modes(freq_hz: f64, base_v: f64) -> chladni_core::Result<()> {
    let mapper = ModeMapper::with_base_v(base_v)?;
    let (m, n) = mapper.modes_from_frequency(freq_hz)?;
    tracing::info!(freq_hz, base_v, m, n, "mapped frequency to modes");
    println!(
        "{freq_hz} Hz -> m={m}, n={n} (resonates at {} Hz)",
        mapper.frequency_of(m, n)
    );
    Ok(())
}

fn run_grid(
    app: &AppConfig,
    plate: &PlateArgs,
    width: Option<usize>,
    height: Option<usize>,
    time: f64,
    json: bool,
) -> chladni_core::Result<()> {
    let config = plate.resolve(app)?;
    let width = width.unwrap_or(app.simulation.width);
    let height = height.unwrap_or(app.simulation.height);
    tracing::info!(width, height, time, ?config, "sampling grid");

    let grid = sample_grid(width, height, &config, time);
    if json {
        println!("{}", serde_json::to_string(&grid)?);
        return Ok(());
    }

    println!("grid {}x{} at t={time}", grid.width(), grid.height());
    match grid.max_abs() {
        Some(max_abs) => {
            println!("min={:.6} max={:.6} max_abs={max_abs:.6}", grid.min(), grid.max());
            println!(
                "{} palette: min {} / zero {} / max {}",
                app.palette,
                app.palette.color_of(grid.min(), max_abs),
                app.palette.color_of(0.0, max_abs),
                app.palette.color_of(grid.max(), max_abs),
            );
        }
        None => println!("empty grid"),
    }
    Ok(())
}

fn run_particles(
    app: &AppConfig,
    plate: &PlateArgs,
    ticks: usize,
    count: Option<usize>,
    seed: Option<u64>,
    bins: usize,
    threshold: f64,
) -> chladni_core::Result<()> {
    let config = plate.resolve(app)?;
    let count = count.unwrap_or(app.simulation.particle_count);
    let seed = seed.or(app.simulation.seed);
    let time_step = app.simulation.time_step;

    let sim = match seed {
        Some(seed) => ParticleSimulator::with_seed(count, seed),
        None => ParticleSimulator::new(count),
    };
    let mut sim = sim.with_move_scale(app.simulation.move_scale);
    let before = sim.nodal_fraction(&config, 0.0, threshold);

    tracing::info!(count, ticks, ?seed, ?config, "running particle simulation");
    let mut time = 0.0;
    for _ in 0..ticks {
        sim.tick(&config, time);
        time += time_step;
    }

    let after = sim.nodal_fraction(&config, time, threshold);
    tracing::debug!(before, after, "nodal fraction");

    println!(
        "{count} particles after {ticks} ticks: {:.1}% within |field| <= {threshold} (was {:.1}%)",
        after * 100.0,
        before * 100.0
    );
    if bins > 0 {
        for row in sim.density(bins).chunks(bins) {
            let line: Vec<String> = row.iter().map(|c| format!("{c:>6}")).collect();
            println!("{}", line.join(""));
        }
    }
    Ok(())
}

fn run_animate(
    mut app: AppConfig,
    plate: &PlateArgs,
    frames: u32,
    palette: Option<&str>,
    paused: bool,
) -> chladni_core::Result<()> {
    app.plate = plate.resolve(&app)?;
    if let Some(name) = palette {
        app.palette = name.parse::<Palette>()?;
    }

    let mut session = Session::new(&app, ViewMode::Field);
    session.clock_mut().set_animating(!paused);

    let start = Instant::now();
    let mut computed = 0;
    for index in 0..frames {
        let now = start + FRAME_INTERVAL * index;
        let Some(frame) = session.frame(now) else {
            continue;
        };
        computed += 1;

        let Some(grid) = session.grid() else {
            continue;
        };
        let kind = match frame.refresh {
            Refresh::Immediate => "immediate",
            Refresh::Scheduled => "scheduled",
        };
        match grid.max_abs() {
            Some(max_abs) => println!(
                "frame {index:>4} t={:.2} {kind:<9} min {} max {}",
                frame.time,
                session.palette().color_of(grid.min(), max_abs),
                session.palette().color_of(grid.max(), max_abs),
            ),
            None => println!("frame {index:>4} t={:.2} {kind:<9} empty", frame.time),
        }
    }

    tracing::info!(frames, computed, "animation finished");
    println!("{computed} of {frames} host frames recomputed");
    Ok(())
}

fn run_presets() -> chladni_core::Result<()> {
    for preset in &PRESETS {
        let c = preset.config;
        println!(
            "{:<18} M{}N{} amp={:.1} damping={:.1} complexity={}  {} - {}",
            preset.id,
            c.mode_x,
            c.mode_y,
            c.amplitude,
            c.damping,
            c.complexity,
            preset.label,
            preset.description
        );
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Chladni plate figure simulator", long_about = None)]
struct Cli {
    /// Optional JSON configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

/// Plate selection shared by the simulation commands. Precedence: explicit
/// modes or frequency, then preset, then the configuration file.
#[derive(Args, Debug)]
struct PlateArgs {
    /// Preset id to start from (see `presets`).
    #[arg(short, long)]
    preset: Option<String>,
    /// Excitation frequency in Hz, mapped onto the nearest mode pair.
    #[arg(short, long, conflicts_with_all = ["mode_x", "mode_y"])]
    freq: Option<f64>,
    /// X-direction modal number (m).
    #[arg(short = 'm', long)]
    mode_x: Option<f64>,
    /// Y-direction modal number (n).
    #[arg(short = 'n', long)]
    mode_y: Option<f64>,
    #[arg(long)]
    amplitude: Option<f64>,
    #[arg(long)]
    damping: Option<f64>,
    #[arg(long)]
    complexity: Option<u32>,
}

impl PlateArgs {
    fn resolve(&self, app: &AppConfig) -> chladni_core::Result<PlateConfig> {
        let mut config = match &self.preset {
            Some(id) => presets::find(id)?.config,
            None => app.plate,
        };
        if let Some(freq) = self.freq {
            let (m, n) = ModeMapper::with_base_v(app.simulation.base_v)?.modes_from_frequency(freq)?;
            config = config.with_modes(f64::from(m), f64::from(n));
        }
        let config = PlateConfig {
            mode_x: self.mode_x.unwrap_or(config.mode_x),
            mode_y: self.mode_y.unwrap_or(config.mode_y),
            amplitude: self.amplitude.unwrap_or(config.amplitude),
            damping: self.damping.unwrap_or(config.damping),
            complexity: self.complexity.unwrap_or(config.complexity),
        };
        config.validate()?;
        Ok(config)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Map an excitation frequency onto the nearest mode pair.
    Modes {
        /// Excitation frequency in Hz.
        freq_hz: f64,
        /// Plate stiffness proxy; overrides the configuration file.
        #[arg(long)]
        base_v: Option<f64>,
    },
    /// Sample the wave field over a grid and report its extrema.
    Grid {
        #[command(flatten)]
        plate: PlateArgs,
        #[arg(long)]
        width: Option<usize>,
        #[arg(long)]
        height: Option<usize>,
        /// Simulation time to sample at.
        #[arg(short, long, default_value_t = 0.0)]
        time: f64,
        /// Print the whole grid as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Let sand settle on the plate and report where it ends up.
    Particles {
        #[command(flatten)]
        plate: PlateArgs,
        #[arg(long, default_value_t = 500)]
        ticks: usize,
        #[arg(long)]
        count: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
        /// Histogram resolution per axis; 0 disables the histogram.
        #[arg(long, default_value_t = 10)]
        bins: usize,
        /// Field magnitude below which a particle counts as resting.
        #[arg(long, default_value_t = 0.05)]
        threshold: f64,
    },
    /// Drive the throttled animation clock with synthetic 60 Hz frames.
    Animate {
        #[command(flatten)]
        plate: PlateArgs,
        #[arg(long, default_value_t = 30)]
        frames: u32,
        /// Palette used to colour the extrema.
        #[arg(long)]
        palette: Option<String>,
        /// Keep simulation time frozen.
        #[arg(long)]
        paused: bool,
    },
    /// List the built-in presets.
    Presets,
}
