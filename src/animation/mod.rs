//! Animation rendering and encoding for string simulations.
//!
//! Each simulation step is drawn onto its own RGBA canvas by
//! [`FrameRenderer`]; the driver accumulates the frames in memory and
//! [`encode_gif`] turns the sequence into a single looping GIF once the
//! run finalizes.

mod encoder;
mod renderer;

pub use encoder::{AnimationStats, encode_gif};
pub use renderer::FrameRenderer;
