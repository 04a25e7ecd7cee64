//! chorda - vibrating string simulation with coupled point masses.
//!
//! This crate integrates the 1D wave equation on a string lattice, couples
//! discrete oscillating point masses into the stencil, and records the
//! resulting time series of field snapshots and particle positions as text
//! history streams, as a GIF animation, or both.
//!
//! # Architecture
//!
//! - `schema`: configuration, presets and initial-state seeding
//! - `compute`: the bounded field history, the propagator, the particles
//! - `driver`: the run loop tying the pieces together
//! - `animation` / `output`: frame rendering + GIF encoding, text streams
//!
//! The field history at the center of the crate is bounded: it maps the
//! ever-growing absolute step index onto a fixed retention window, evicting
//! the oldest snapshot once the window is full and refusing queries for
//! evicted steps.
//!
//! # Example
//!
//! ```rust,no_run
//! use chorda::{Excitation, RunOptions, Simulation, SimulationConfig};
//!
//! // A plucked-free string would do; here we drive the left end instead.
//! let config = SimulationConfig::center_fixed(
//!     1.4e-4,                // dt [s]
//!     2000,                  // steps
//!     1.0,                   // length [m]
//!     0.005,                 // density [kg/m]
//!     1.0,                   // tension [N]
//!     Excitation::Sine { amplitude: 0.05, pulsation: 314.0 },
//!     0.01,                  // particle mass [kg]
//!     251.0,                 // particle pulsation [rad/s]
//! );
//!
//! let mut sim = Simulation::new(config).expect("valid configuration");
//! let artifacts = sim
//!     .run(std::path::Path::new("out"), &RunOptions::default())
//!     .expect("run to completion");
//! println!("animation: {:?}", artifacts.animation);
//! ```

pub mod animation;
pub mod compute;
pub mod driver;
pub mod output;
pub mod schema;

// Re-export commonly used types
pub use compute::{
    FieldHistory, HistoryError, Particle, Particles, Propagator, SimulationError, StringPropagator,
};
pub use driver::{RunArtifacts, RunError, RunOptions, Simulation};
pub use output::{HistoryReader, HistoryWriter};
pub use schema::{
    Boundary, ConfigError, Excitation, ParticleConfig, Pattern, Seed, SimulationConfig,
};
