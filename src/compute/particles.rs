//! Point masses attached to the string lattice.

use super::propagator::SimulationError;

/// A single point mass pinned to a lattice cell.
///
/// The particle rides the string transversally: it adds inertia and a
/// harmonic restoring force (`mass`, `pulsation`) to the cell it occupies,
/// but does not travel along the string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Lattice cell the particle occupies.
    pub cell: usize,
    /// Particle mass in kg.
    pub mass: f64,
    /// Angular frequency of the particle's own restoring force, in rad/s.
    pub pulsation: f64,
}

/// The set of particles riding a string of `cells` lattice cells.
///
/// Exposes per-cell mass and pulsation profiles for the propagator and the
/// ordered position list for the driver.
#[derive(Debug, Clone)]
pub struct Particles {
    cells: usize,
    particles: Vec<Particle>,
    mass_by_cell: Vec<f64>,
    pulsation_by_cell: Vec<f64>,
}

impl Particles {
    /// Build a particle set, validating every cell against the lattice.
    pub fn new(cells: usize, particles: Vec<Particle>) -> Result<Self, SimulationError> {
        let mut mass_by_cell = vec![0.0; cells];
        let mut pulsation_by_cell = vec![0.0; cells];
        for p in &particles {
            if p.cell >= cells {
                return Err(SimulationError::ParticleOutOfRange {
                    cell: p.cell,
                    cells,
                });
            }
            if mass_by_cell[p.cell] != 0.0 {
                return Err(SimulationError::DuplicateParticleCell { cell: p.cell });
            }
            mass_by_cell[p.cell] = p.mass;
            pulsation_by_cell[p.cell] = p.pulsation;
        }
        Ok(Self {
            cells,
            particles,
            mass_by_cell,
            pulsation_by_cell,
        })
    }

    /// A particle-free set.
    pub fn empty(cells: usize) -> Self {
        Self {
            cells,
            particles: Vec::new(),
            mass_by_cell: vec![0.0; cells],
            pulsation_by_cell: vec![0.0; cells],
        }
    }

    /// Occupied cell indices at step `t`, in particle order.
    ///
    /// Particles are pinned, so the list is the same for every step; the
    /// parameter keeps the per-step read explicit in the driver loop.
    pub fn positions_at(&self, _t: u64) -> Vec<usize> {
        self.particles.iter().map(|p| p.cell).collect()
    }

    /// Mass attached to `cell` (0 when no particle sits there).
    #[inline]
    pub fn mass_at(&self, cell: usize) -> f64 {
        self.mass_by_cell[cell]
    }

    /// Pulsation of the particle at `cell` (0 when no particle sits there).
    #[inline]
    pub fn pulsation_at(&self, cell: usize) -> f64 {
        self.pulsation_by_cell[cell]
    }

    /// Lattice width this set was built against.
    pub fn cells(&self) -> usize {
        self.cells
    }

    /// Number of particles.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether the set is particle-free.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
