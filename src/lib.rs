#![warn(clippy::all)]

pub mod pattern;
mod quadtree;
pub mod rule;
mod traits;

pub use num_bigint::BigInt;
pub use quadtree::{CacheStatistics, HashLife, HashLifeEngine, NodeIdx};
pub use traits::GoLEngine;

pub const VERSION: &str = "0.1.0";

/// Smallest depth a field is kept at: `advance_center` and `grow_double` are only
/// defined from depth 2 (4x4 cells) on.
pub const MIN_DEPTH: u32 = 2;

/// Fields deeper than this are never expanded into individual cells.
pub const MAX_MATERIALIZE_DEPTH: u32 = 16;
