//! Seed types for the initial field state.
//!
//! A seed expands into the two rows the second-order scheme needs:
//! `row₀` is the initial displacement and `row₁ = row₀ + dt·v₀` encodes the
//! initial velocity to first order.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::config::ConfigError;

/// Complete seed specification for the initial field state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seed {
    /// Pattern to use for seeding.
    pub pattern: Pattern,
}

impl Default for Seed {
    fn default() -> Self {
        Self { pattern: Pattern::Rest }
    }
}

/// Predefined initial displacement patterns.
///
/// Positions along the string are fractions of its length (0.0-1.0).
/// All patterns pin the end cells to zero; all but `Custom` start with zero
/// velocity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Pattern {
    /// Flat string at rest.
    Rest,
    /// Triangular pluck.
    Pluck {
        /// Peak position as a fraction of the string length.
        center: f64,
        /// Peak displacement.
        amplitude: f64,
        /// Half-width of the triangle as a fraction of the string length.
        width: f64,
    },
    /// Gaussian bump.
    Gaussian {
        /// Center as a fraction of the string length.
        center: f64,
        /// Standard deviation as a fraction of the string length.
        sigma: f64,
        /// Peak displacement.
        amplitude: f64,
    },
    /// Uniform random displacement of the interior cells.
    Noise {
        /// Displacement range [-amplitude, amplitude].
        amplitude: f64,
        /// Random seed.
        seed: u64,
    },
    /// Explicit displacement and velocity profiles.
    Custom {
        positions: Vec<f64>,
        velocities: Vec<f64>,
    },
}

impl Seed {
    /// Expand into the two seed rows for a lattice of `cells` cells.
    pub fn generate(&self, cells: usize, dt: f64) -> Result<(Vec<f64>, Vec<f64>), ConfigError> {
        let row0 = match &self.pattern {
            Pattern::Rest => vec![0.0; cells],
            Pattern::Pluck { center, amplitude, width } => {
                profile(cells, |x| {
                    let d = (x - center).abs();
                    if d < *width {
                        amplitude * (1.0 - d / width)
                    } else {
                        0.0
                    }
                })
            }
            Pattern::Gaussian { center, sigma, amplitude } => profile(cells, |x| {
                let d = x - center;
                amplitude * (-d * d / (2.0 * sigma * sigma)).exp()
            }),
            Pattern::Noise { amplitude, seed } => {
                let mut rng = StdRng::seed_from_u64(*seed);
                profile(cells, |_| amplitude * rng.gen_range(-1.0..1.0))
            }
            Pattern::Custom { positions, velocities } => {
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
                let row0 = positions.clone();
                let row1 = positions
                    .iter()
                    .zip(velocities)
                    .map(|(p, v)| p + dt * v)
                    .collect();
                return Ok((row0, row1));
            }
        };
        let row1 = row0.clone();
        Ok((row0, row1))
    }
}

/// Evaluate `f` at every interior cell's fractional position, ends pinned.
fn profile(cells: usize, mut f: impl FnMut(f64) -> f64) -> Vec<f64> {
    let scale = 1.0 / (cells - 1) as f64;
    (0..cells)
        .map(|i| {
            if i == 0 || i == cells - 1 {
                0.0
            } else {
                f(i as f64 * scale)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rest_is_flat() {
        let (row0, row1) = Seed::default().generate(50, 0.01).unwrap();
        assert_eq!(row0, vec![0.0; 50]);
        assert_eq!(row0, row1);
    }

    #[test]
    fn pluck_peaks_at_its_center() {
        let seed = Seed {
            pattern: Pattern::Pluck { center: 0.5, amplitude: 0.2, width: 0.1 },
        };
        let (row0, row1) = seed.generate(101, 0.01).unwrap();
        assert!((row0[50] - 0.2).abs() < 1e-12);
        assert_eq!(row0[0], 0.0);
        assert_eq!(row0[100], 0.0);
        assert_eq!(row0[20], 0.0);
        assert_eq!(row0, row1);
    }

    #[test]
    fn gaussian_decays_from_its_center() {
        let seed = Seed {
            pattern: Pattern::Gaussian { center: 0.5, sigma: 0.05, amplitude: 1.0 },
        };
        let (row0, _) = seed.generate(101, 0.01).unwrap();
        assert!((row0[50] - 1.0).abs() < 1e-9);
        assert!(row0[50] > row0[45]);
        assert!(row0[45] > row0[40]);
    }

    #[test]
    fn noise_is_deterministic_per_seed() {
        let seed = Seed {
            pattern: Pattern::Noise { amplitude: 0.1, seed: 7 },
        };
        let a = seed.generate(64, 0.01).unwrap();
        let b = seed.generate(64, 0.01).unwrap();
        assert_eq!(a, b);
        assert!(a.0.iter().any(|&v| v != 0.0));
        assert!(a.0.iter().all(|&v| v.abs() <= 0.1));
    }

    #[test]
    fn custom_encodes_velocity_in_the_second_row() {
        let seed = Seed {
            pattern: Pattern::Custom {
                positions: vec![0.0, 1.0, 0.0],
                velocities: vec![0.0, -2.0, 0.0],
            },
        };
        let (row0, row1) = seed.generate(3, 0.1).unwrap();
        assert_eq!(row0, vec![0.0, 1.0, 0.0]);
        assert_eq!(row1, vec![0.0, 0.8, 0.0]);
    }

    #[test]
    fn custom_rejects_wrong_lengths() {
        let seed = Seed {
            pattern: Pattern::Custom {
                positions: vec![0.0; 4],
                velocities: vec![0.0; 3],
            },
        };
        assert!(matches!(
            seed.generate(3, 0.1),
            Err(ConfigError::SeedLengthMismatch { expected: 3, got: 4 })
        ));
    }
}
