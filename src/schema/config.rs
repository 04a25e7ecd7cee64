//! Configuration types for string simulations.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::seed::{Pattern, Seed};

/// Top-level simulation configuration.
///
/// The spatial lattice is derived, not configured: the cell count is chosen
/// so that `dx ≈ c·dt` (Courant number at 1), where `c = √(tension/density)`
/// is the transverse wave celerity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Time step in seconds.
    pub dt: f64,
    /// Number of time steps to run.
    pub time_steps: u64,
    /// String length in meters.
    pub length: f64,
    /// Linear density in kg/m.
    pub density: f64,
    /// Tension in newtons.
    pub tension: f64,
    /// Condition imposed on the left end of the string.
    #[serde(default)]
    pub left_edge: Excitation,
    /// Condition imposed on the right end of the string.
    #[serde(default)]
    pub right_edge: Boundary,
    /// Retention bound for the field history (`None` = keep everything).
    #[serde(default)]
    pub retention: Option<u64>,
    /// Point masses riding the string.
    #[serde(default)]
    pub particles: Vec<ParticleConfig>,
    /// Initial field state.
    #[serde(default)]
    pub seed: Seed,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            dt: 1.4e-4,
            time_steps: 1000,
            length: 1.0,
            density: 0.005,
            tension: 1.0,
            left_edge: Excitation::Sine {
                amplitude: 0.05,
                pulsation: 2.0 * std::f64::consts::PI * 50.0,
            },
            right_edge: Boundary::Mirror,
            retention: None,
            particles: Vec::new(),
            seed: Seed::default(),
        }
    }
}

/// Condition driving the left end of the string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Excitation {
    /// Fixed end (zero displacement).
    Mirror,
    /// Sinusoidal drive `amplitude · sin(pulsation · t)`.
    Sine { amplitude: f64, pulsation: f64 },
    /// First-order absorbing end (outgoing waves leave the lattice).
    Absorber,
}

impl Default for Excitation {
    fn default() -> Self {
        Excitation::Mirror
    }
}

/// Passive condition on the right end of the string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Boundary {
    /// Fixed end (zero displacement).
    Mirror,
    /// First-order absorbing end.
    Absorber,
}

impl Default for Boundary {
    fn default() -> Self {
        Boundary::Mirror
    }
}

/// Configuration for a single point mass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleConfig {
    /// Position along the string as a fraction of its length (0.0-1.0).
    pub position: f64,
    /// Mass in kg.
    pub mass: f64,
    /// Angular frequency of the particle's restoring force in rad/s.
    #[serde(default)]
    pub pulsation: f64,
}

impl SimulationConfig {
    /// Transverse wave celerity `√(tension/density)` in m/s.
    pub fn celerity(&self) -> f64 {
        (self.tension / self.density).sqrt()
    }

    /// Number of lattice cells, chosen so that `dx ≈ c·dt`.
    pub fn cells(&self) -> usize {
        (self.length / (self.celerity() * self.dt)) as usize
    }

    /// Lattice spacing `length / cells` in meters.
    pub fn dx(&self) -> f64 {
        self.length / self.cells() as f64
    }

    /// Lattice cell a particle fraction maps to.
    pub fn particle_cell(&self, position: f64) -> usize {
        (position * self.cells() as f64) as usize
    }

    /// A string starting at rest with no particles.
    pub fn free_string(
        dt: f64,
        time_steps: u64,
        length: f64,
        density: f64,
        tension: f64,
        left_edge: Excitation,
    ) -> Self {
        Self {
            dt,
            time_steps,
            length,
            density,
            tension,
            left_edge,
            right_edge: Boundary::Mirror,
            retention: None,
            particles: Vec::new(),
            seed: Seed { pattern: Pattern::Rest },
        }
    }

    /// A string starting at rest with a single particle at its center.
    #[allow(clippy::too_many_arguments)]
    pub fn center_fixed(
        dt: f64,
        time_steps: u64,
        length: f64,
        density: f64,
        tension: f64,
        left_edge: Excitation,
        mass: f64,
        pulsation: f64,
    ) -> Self {
        let mut config = Self::free_string(dt, time_steps, length, density, tension, left_edge);
        config.particles.push(ParticleConfig {
            position: 0.5,
            mass,
            pulsation,
        });
        config
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(ConfigError::InvalidTimeStep);
        }
        if !(self.length.is_finite() && self.length > 0.0) {
            return Err(ConfigError::InvalidLength);
        }
        if !(self.density.is_finite() && self.density > 0.0) {
            return Err(ConfigError::InvalidDensity);
        }
        if !(self.tension.is_finite() && self.tension > 0.0) {
            return Err(ConfigError::InvalidTension);
        }
        if self.time_steps == 0 {
            return Err(ConfigError::NoTimeSteps);
        }
        if let Some(m) = self.retention {
            if m < 3 {
                return Err(ConfigError::RetentionTooSmall(m));
            }
        }
        let cells = self.cells();
        if cells < 3 {
            return Err(ConfigError::DegenerateLattice(cells));
        }
        if let Excitation::Sine { amplitude, pulsation } = self.left_edge {
            if !(amplitude.is_finite() && pulsation.is_finite()) {
                return Err(ConfigError::InvalidExcitation);
            }
        }
        for (index, p) in self.particles.iter().enumerate() {
            if !(p.position.is_finite() && p.position > 0.0 && p.position < 1.0) {
                return Err(ConfigError::ParticleOutsideString {
                    index,
                    position: p.position,
                });
            }
            if !(p.mass.is_finite() && p.mass > 0.0) {
                return Err(ConfigError::NonPositiveMass(index));
            }
            let cell = self.particle_cell(p.position);
            if cell == 0 || cell >= cells - 1 {
                return Err(ConfigError::ParticleOnBoundary { index, cell });
            }
        }
        if let Pattern::Custom { positions, velocities } = &self.seed.pattern {
            if positions.len() != cells {
                return Err(ConfigError::SeedLengthMismatch {
                    expected: cells,
                    got: positions.len(),
                });
            }
            if velocities.len() != cells {
                return Err(ConfigError::SeedLengthMismatch {
                    expected: cells,
                    got: velocities.len(),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for SimulationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dt={}s dx={}m steps={} cells={} tension={}N density={}kg/m particles={}",
            self.dt,
            self.dx(),
            self.time_steps,
            self.cells(),
            self.tension,
            self.density,
            self.particles.len()
        )
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("time step must be positive and finite")]
    InvalidTimeStep,
    #[error("string length must be positive and finite")]
    InvalidLength,
    #[error("linear density must be positive and finite")]
    InvalidDensity,
    #[error("tension must be positive and finite")]
    InvalidTension,
    #[error("sine excitation parameters must be finite")]
    InvalidExcitation,
    #[error("a run needs at least one time step")]
    NoTimeSteps,
    #[error("retention bound must be at least 3, got {0}")]
    RetentionTooSmall(u64),
    #[error("lattice of {0} cells is too coarse; lower dt or lengthen the string")]
    DegenerateLattice(usize),
    #[error("particle {index} sits outside the string (position {position})")]
    ParticleOutsideString { index: usize, position: f64 },
    #[error("particle {index} maps to boundary cell {cell}")]
    ParticleOnBoundary { index: usize, cell: usize },
    #[error("particle {0} must have positive mass")]
    NonPositiveMass(usize),
    #[error("custom seed has {got} cells, lattice has {expected}")]
    SeedLengthMismatch { expected: usize, got: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        // 1 m string at c ≈ 14.14 m/s, dt = 1.4e-4 s: around 500 cells.
        assert!(config.cells() > 100);
    }

    #[test]
    fn cells_follow_the_courant_sizing() {
        let config = SimulationConfig {
            dt: 0.01,
            length: 1.0,
            density: 1.0,
            tension: 1.0,
            ..Default::default()
        };
        assert_eq!(config.celerity(), 1.0);
        assert_eq!(config.cells(), 100);
        assert!((config.dx() - 0.01).abs() < 1e-12);
    }

    #[test]
    fn rejects_bad_physics() {
        let mut config = SimulationConfig::default();
        config.dt = 0.0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidTimeStep));

        let mut config = SimulationConfig::default();
        config.density = -1.0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidDensity));

        let mut config = SimulationConfig::default();
        config.retention = Some(2);
        assert_eq!(config.validate(), Err(ConfigError::RetentionTooSmall(2)));

        let mut config = SimulationConfig::default();
        config.time_steps = 0;
        assert_eq!(config.validate(), Err(ConfigError::NoTimeSteps));
    }

    #[test]
    fn rejects_degenerate_lattice() {
        let config = SimulationConfig {
            dt: 1.0,
            length: 1.0,
            density: 1.0,
            tension: 1.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::DegenerateLattice(1)));
    }

    #[test]
    fn rejects_misplaced_particles() {
        let mut config = SimulationConfig::default();
        config.particles.push(ParticleConfig {
            position: 1.5,
            mass: 0.01,
            pulsation: 0.0,
        });
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ParticleOutsideString { index: 0, .. })
        ));

        let mut config = SimulationConfig::default();
        config.particles.push(ParticleConfig {
            position: 0.5,
            mass: 0.0,
            pulsation: 0.0,
        });
        assert_eq!(config.validate(), Err(ConfigError::NonPositiveMass(0)));
    }

    #[test]
    fn center_fixed_places_one_particle_mid_string() {
        let config = SimulationConfig::center_fixed(
            0.01,
            100,
            1.0,
            1.0,
            1.0,
            Excitation::Mirror,
            0.01,
            40.0,
        );
        assert!(config.validate().is_ok());
        assert_eq!(config.particles.len(), 1);
        assert_eq!(config.particle_cell(config.particles[0].position), 50);
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = SimulationConfig::center_fixed(
            1.4e-4,
            500,
            1.0,
            0.005,
            1.0,
            Excitation::Sine { amplitude: 0.05, pulsation: 314.0 },
            0.01,
            251.0,
        );
        let json = serde_json::to_string(&config).unwrap();
        let back: SimulationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.particles, config.particles);
        assert_eq!(back.left_edge, config.left_edge);
        assert_eq!(back.cells(), config.cells());
    }
}
