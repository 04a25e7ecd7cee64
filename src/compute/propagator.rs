//! Finite-difference propagator for the string field.
//!
//! [`StringPropagator`] advances the 1D wave equation one step at a time,
//! reading the two newest rows from the [`FieldHistory`] and producing the
//! next row. Point masses enter the stencil as extra per-cell inertia and a
//! harmonic restoring force; the lattice edges are driven or absorbing
//! according to the configuration.
//!
//! The update for an interior cell `i` carrying mass `m` with pulsation `ω`:
//!
//! ```text
//! inertia  = density·dx + m
//! accel[i] = (tension·(u[i+1] − 2u[i] + u[i−1])/dx − m·ω²·u[i]) / inertia
//! next[i]  = 2u[i] − prev[i] + dt²·accel[i]
//! ```
//!
//! which for `m = 0` reduces to the classic leapfrog stencil
//! `next = 2u − prev + r²·(u[i+1] − 2u[i] + u[i−1])` with Courant number
//! `r = c·dt/dx`.

use thiserror::Error;

use crate::schema::{Boundary, ConfigError, Excitation, SimulationConfig};

use super::history::FieldHistory;
use super::particles::Particles;

/// Errors produced while advancing the field.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// The integration produced a non-finite value; the run must abort.
    #[error("non-finite field value at cell {cell} while producing step {step}")]
    NonFinite { step: u64, cell: usize },
    /// The scheme reads two prior rows; the history holds fewer.
    #[error("propagator needs at least two retained rows, history has {0}")]
    InsufficientHistory(usize),
    /// A particle sits outside the lattice.
    #[error("particle cell {cell} outside lattice of {cells} cells")]
    ParticleOutOfRange { cell: usize, cells: usize },
    /// Two particles claim the same cell.
    #[error("two particles occupy cell {cell}")]
    DuplicateParticleCell { cell: usize },
    /// The history row width disagrees with the propagator's lattice.
    #[error("propagator built for {expected} cells, history is {got} wide")]
    WidthMismatch { expected: usize, got: usize },
}

/// One step of the field update.
///
/// Consumes the recent rows of the history and the current particle state,
/// and produces exactly one new row of the fixed spatial width. On failure
/// the driver aborts without appending anything.
pub trait Propagator {
    fn advance(
        &mut self,
        history: &FieldHistory,
        particles: &Particles,
    ) -> Result<Vec<f64>, SimulationError>;
}

/// Second-order wave-equation propagator with point-mass coupling.
#[derive(Debug, Clone)]
pub struct StringPropagator {
    cells: usize,
    dt: f64,
    dx: f64,
    tension: f64,
    density: f64,
    courant: f64,
    left_edge: Excitation,
    right_edge: Boundary,
}

impl StringPropagator {
    /// Build a propagator from a validated configuration.
    pub fn new(config: &SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            cells: config.cells(),
            dt: config.dt,
            dx: config.dx(),
            tension: config.tension,
            density: config.density,
            courant: config.celerity() * config.dt / config.dx(),
            left_edge: config.left_edge.clone(),
            right_edge: config.right_edge,
        })
    }

    /// Courant number `c·dt/dx` of the discretization.
    ///
    /// The lattice is sized so this sits at (or just below) 1.
    pub fn courant(&self) -> f64 {
        self.courant
    }
}

impl Propagator for StringPropagator {
    fn advance(
        &mut self,
        history: &FieldHistory,
        particles: &Particles,
    ) -> Result<Vec<f64>, SimulationError> {
        if history.spatial_extent() != self.cells {
            return Err(SimulationError::WidthMismatch {
                expected: self.cells,
                got: history.spatial_extent(),
            });
        }
        if history.time_extent() < 2 {
            return Err(SimulationError::InsufficientHistory(history.time_extent()));
        }
        let cur = history.current_step();
        let u = history.last();
        let prev = history
            .row_at(cur - 1)
            .map_err(|_| SimulationError::InsufficientHistory(history.time_extent()))?;

        let step = cur + 1;
        let dt2 = self.dt * self.dt;
        let mut next = vec![0.0; self.cells];

        for i in 1..self.cells - 1 {
            let laplacian = u[i + 1] - 2.0 * u[i] + u[i - 1];
            let mass = particles.mass_at(i);
            let pulsation = particles.pulsation_at(i);
            // Cell inertia: a slice of string plus whatever mass rides it.
            let inertia = self.density * self.dx + mass;
            let restoring = mass * pulsation * pulsation * u[i];
            let accel = (self.tension * laplacian / self.dx - restoring) / inertia;
            next[i] = 2.0 * u[i] - prev[i] + dt2 * accel;
        }

        // First-order absorbing coefficient; exactly zero at Courant 1.
        let mur = (self.courant - 1.0) / (self.courant + 1.0);
        next[0] = match &self.left_edge {
            Excitation::Mirror => 0.0,
            Excitation::Sine { amplitude, pulsation } => {
                amplitude * (pulsation * self.dt * step as f64).sin()
            }
            Excitation::Absorber => u[1] + mur * (next[1] - u[0]),
        };
        let last = self.cells - 1;
        next[last] = match self.right_edge {
            Boundary::Mirror => 0.0,
            Boundary::Absorber => u[last - 1] + mur * (next[last - 1] - u[last]),
        };

        if let Some(cell) = next.iter().position(|v| !v.is_finite()) {
            return Err(SimulationError::NonFinite { step, cell });
        }
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::super::particles::Particle;
    use super::*;

    /// Unit-celerity string: 100 cells, dx = c·dt = 0.01, Courant = 1.
    fn unit_config() -> SimulationConfig {
        SimulationConfig {
            dt: 0.01,
            time_steps: 16,
            length: 1.0,
            density: 1.0,
            tension: 1.0,
            left_edge: Excitation::Mirror,
            right_edge: Boundary::Mirror,
            retention: None,
            particles: Vec::new(),
            seed: Default::default(),
        }
    }

    fn pulse_row(cells: usize, at: usize) -> Vec<f64> {
        let mut row = vec![0.0; cells];
        row[at] = 1.0;
        row
    }

    #[test]
    fn rest_string_stays_at_rest() {
        let config = unit_config();
        let cells = config.cells();
        let mut propagator = StringPropagator::new(&config).unwrap();
        let mut history = FieldHistory::new(vec![vec![0.0; cells]; 2], config.retention).unwrap();
        let particles = Particles::empty(cells);
        for _ in 0..10 {
            let row = propagator.advance(&history, &particles).unwrap();
            assert!(row.iter().all(|&v| v == 0.0));
            history.append(row).unwrap();
        }
    }

    #[test]
    fn unit_courant_pulse_translates_one_cell_per_step() {
        let config = unit_config();
        let cells = config.cells();
        assert!((StringPropagator::new(&config).unwrap().courant() - 1.0).abs() < 1e-12);

        let mut propagator = StringPropagator::new(&config).unwrap();
        // A rightward traveling pulse: at step 0 it sits at cell 50, at
        // step 1 at cell 51. The exact scheme keeps it moving undistorted.
        let mut history =
            FieldHistory::new(vec![pulse_row(cells, 50), pulse_row(cells, 51)], None).unwrap();
        let particles = Particles::empty(cells);
        for expected_at in 52..60 {
            let row = propagator.advance(&history, &particles).unwrap();
            assert_eq!(row, pulse_row(cells, expected_at));
            history.append(row).unwrap();
        }
    }

    #[test]
    fn absorbing_right_edge_swallows_the_pulse() {
        let mut config = unit_config();
        config.right_edge = Boundary::Absorber;
        let cells = config.cells();
        let mut propagator = StringPropagator::new(&config).unwrap();
        let mut history = FieldHistory::new(
            vec![pulse_row(cells, cells - 4), pulse_row(cells, cells - 3)],
            None,
        )
        .unwrap();
        let particles = Particles::empty(cells);
        for _ in 0..10 {
            let row = propagator.advance(&history, &particles).unwrap();
            history.append(row).unwrap();
        }
        let residue: f64 = history.last().iter().map(|v| v.abs()).fold(0.0, f64::max);
        assert!(residue < 1e-9, "pulse should leave the lattice, residue {residue}");
    }

    #[test]
    fn sine_excitation_drives_the_left_edge() {
        let mut config = unit_config();
        let amplitude = 0.05;
        let pulsation = 40.0;
        config.left_edge = Excitation::Sine { amplitude, pulsation };
        let cells = config.cells();
        let mut propagator = StringPropagator::new(&config).unwrap();
        let history = FieldHistory::new(vec![vec![0.0; cells]; 2], None).unwrap();
        let particles = Particles::empty(cells);

        // The first produced row is step 2.
        let row = propagator.advance(&history, &particles).unwrap();
        let expected = amplitude * (pulsation * config.dt * 2.0).sin();
        assert!((row[0] - expected).abs() < 1e-12);
        assert!(row[0] != 0.0);
    }

    #[test]
    fn heavy_particle_slows_its_cell() {
        let config = unit_config();
        let cells = config.cells();
        let seed = vec![pulse_row(cells, 50), pulse_row(cells, 50)];
        let history = FieldHistory::new(seed, None).unwrap();

        let mut free = StringPropagator::new(&config).unwrap();
        let without = free.advance(&history, &Particles::empty(cells)).unwrap();

        let mut loaded = StringPropagator::new(&config).unwrap();
        let particles =
            Particles::new(cells, vec![Particle { cell: 50, mass: 1.0, pulsation: 0.0 }]).unwrap();
        let with = loaded.advance(&history, &particles).unwrap();

        // The heavy cell accelerates far less than the free one.
        assert!(with[50] > without[50]);
        // Off-particle cells are untouched by the load.
        assert_eq!(with[40], without[40]);
    }

    #[test]
    fn non_finite_values_abort_the_step() {
        let config = unit_config();
        let cells = config.cells();
        let mut bad = vec![0.0; cells];
        bad[30] = f64::NAN;
        let history = FieldHistory::new(vec![vec![0.0; cells], bad], None).unwrap();
        let mut propagator = StringPropagator::new(&config).unwrap();
        let err = propagator
            .advance(&history, &Particles::empty(cells))
            .unwrap_err();
        assert!(matches!(err, SimulationError::NonFinite { step: 2, .. }));
    }

    #[test]
    fn width_mismatch_is_rejected() {
        let config = unit_config();
        let mut propagator = StringPropagator::new(&config).unwrap();
        let history = FieldHistory::new(vec![vec![0.0; 7]; 2], None).unwrap();
        let err = propagator
            .advance(&history, &Particles::empty(7))
            .unwrap_err();
        assert!(matches!(err, SimulationError::WidthMismatch { .. }));
    }
}
