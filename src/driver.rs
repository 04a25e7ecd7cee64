//! Simulation driver: orchestrates the time loop and the output artifacts.
//!
//! A [`Simulation`] owns the field history, the particle set, and the
//! propagator, and walks the state machine
//! `Initialized → Running → Finalizing → Done`. Each step advances the
//! propagator, commits the produced row to the history, then fans the
//! committed state out to the optional renderer and history writer. A step
//! either commits fully or not at all; failures abort the run and leave
//! prior steps' artifacts on disk.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, info};
use thiserror::Error;

use crate::animation::{FrameRenderer, encode_gif};
use crate::compute::{FieldHistory, HistoryError, Particle, Particles, Propagator, SimulationError, StringPropagator};
use crate::output::{FILE_PREFIX, HistoryWriter};
use crate::schema::{ConfigError, SimulationConfig};

/// Errors surfaced by a simulation run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("history buffer rejected a row: {0}")]
    History(#[from] HistoryError),
    #[error("simulation failed: {0}")]
    Simulation(#[from] SimulationError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("this simulation has already run")]
    AlreadyRun,
}

/// Output switches for a run.
///
/// Mirrors the conceptual entry point
/// `run(path, animate, write_files, log, dpi, resolution, frame_duration)`.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Render frames and encode a GIF at finalization.
    pub animate: bool,
    /// Write the field and particle history streams.
    pub write_files: bool,
    /// Log per-step progress.
    pub progress: bool,
    /// Frame resolution in pixels.
    pub resolution: (u32, u32),
    /// Rendering density; scales the particle dot radius.
    pub dpi: u32,
    /// Delay per animation frame, in milliseconds.
    pub frame_duration_ms: u32,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            animate: true,
            write_files: true,
            progress: true,
            resolution: (320, 240),
            dpi: 96,
            frame_duration_ms: 12,
        }
    }
}

/// Paths produced by a completed run.
#[derive(Debug, Clone, Default)]
pub struct RunArtifacts {
    pub field_file: Option<PathBuf>,
    pub particle_file: Option<PathBuf>,
    pub animation: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    Initialized,
    Running,
    Finalizing,
    Done,
}

/// A fully wired simulation, ready to run once.
pub struct Simulation {
    config: SimulationConfig,
    history: FieldHistory,
    particles: Particles,
    propagator: Box<dyn Propagator>,
    state: RunState,
}

impl Simulation {
    /// Build a simulation with the built-in string propagator.
    pub fn new(config: SimulationConfig) -> Result<Self, RunError> {
        let propagator = Box::new(StringPropagator::new(&config)?);
        Self::with_propagator(config, propagator)
    }

    /// Build a simulation around a custom propagator.
    ///
    /// The seam the driver tests use to inject failures; also the hook for
    /// alternative field update schemes.
    pub fn with_propagator(
        config: SimulationConfig,
        propagator: Box<dyn Propagator>,
    ) -> Result<Self, RunError> {
        config.validate()?;
        let cells = config.cells();
        let (row0, row1) = config.seed.generate(cells, config.dt)?;
        let history = FieldHistory::new(vec![row0, row1], config.retention)?;
        let particles = Particles::new(
            cells,
            config
                .particles
                .iter()
                .map(|p| Particle {
                    cell: config.particle_cell(p.position),
                    mass: p.mass,
                    pulsation: p.pulsation,
                })
                .collect(),
        )?;
        Ok(Self {
            config,
            history,
            particles,
            propagator,
            state: RunState::Initialized,
        })
    }

    /// The configuration this simulation was built from.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// The field history (seed rows before a run, full window after).
    pub fn history(&self) -> &FieldHistory {
        &self.history
    }

    /// Run the configured number of steps, writing artifacts into `out_dir`.
    ///
    /// Consumes the driver's single run: subsequent calls fail with
    /// [`RunError::AlreadyRun`], whether the first run completed or aborted.
    pub fn run(&mut self, out_dir: &Path, opts: &RunOptions) -> Result<RunArtifacts, RunError> {
        if self.state != RunState::Initialized {
            return Err(RunError::AlreadyRun);
        }
        self.state = RunState::Running;

        let timestamp = unix_timestamp();
        let total = self.config.time_steps;
        info!("simulation start: {}", self.config);

        let mut writer = if opts.write_files {
            let header = format!("{FILE_PREFIX} {timestamp} | {}", self.config);
            Some(HistoryWriter::create(out_dir, timestamp, &header)?)
        } else {
            None
        };
        let renderer = opts.animate.then(|| {
            FrameRenderer::new(opts.resolution, opts.dpi, self.config.length, total)
        });
        let mut frames = Vec::with_capacity(if opts.animate { total as usize } else { 0 });

        for t in 0..total {
            // The two seed rows already encode steps 0 and 1.
            if t > 1 {
                let row = self.propagator.advance(&self.history, &self.particles)?;
                self.history.append(row)?;
            }
            let row = self.history.row_at(t)?;
            let positions = self.particles.positions_at(t);
            if let Some(renderer) = &renderer {
                frames.push(renderer.draw_frame(row, &positions, t));
            }
            if let Some(writer) = writer.as_mut() {
                writer.write_step(row, &positions)?;
            }
            if opts.progress {
                info!("step {t}/{total}");
            } else {
                debug!("step {t}/{total}");
            }
        }

        self.state = RunState::Finalizing;
        let mut artifacts = RunArtifacts::default();
        if renderer.is_some() {
            let path = out_dir.join(format!("{FILE_PREFIX}-{timestamp}.gif"));
            let stats = encode_gif(frames, &path, opts.frame_duration_ms)?;
            info!("animation encoded: {stats}");
            artifacts.animation = Some(path);
        }
        if let Some(writer) = writer.take() {
            let (field_file, particle_file) = writer.finish()?;
            artifacts.field_file = Some(field_file);
            artifacts.particle_file = Some(particle_file);
        }
        self.state = RunState::Done;
        info!("simulation done: {total} steps");
        Ok(artifacts)
    }
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
