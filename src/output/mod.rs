//! Text history streams: per-step field rows and particle positions.
//!
//! A run writes two parallel streams, each a header line followed by one
//! whitespace-delimited line per step:
//!
//! ```text
//! # chorda 1700000000 | dt=0.0001s dx=0.002m steps=500 cells=505 ...
//! 0 0.0012 0.0049 ... 0
//! 0 0.0024 0.0098 ... 0
//! ```
//!
//! [`HistoryWriter`] produces the streams during a run; [`HistoryReader`]
//! decodes them back for post-processing.

mod reader;
mod writer;

pub use reader::HistoryReader;
pub use writer::{FILE_PREFIX, HistoryWriter};
