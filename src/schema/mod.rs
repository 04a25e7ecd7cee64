//! Schema module - configuration and seeding types for string simulations.

mod config;
mod seed;

pub use config::*;
pub use seed::*;
