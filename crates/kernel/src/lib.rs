//! Simulation kernel: a deterministic, fixed-timestep entity simulation on a tile grid.
//!
//! # Invariants
//! - One PRNG per run, drawn in a fixed order: tilemap cells, initial spawns, then per-frame spawns.
//! - The tilemap never changes after it is built.
//! - Entities are updated in index order, and compaction keeps survivor order.
//! - The checksum is the only observable output of a run.

pub mod collision;
pub mod determinism;
pub mod pool;
pub mod rng;
pub mod sim;
pub mod tilemap;

pub use determinism::{DeterminismReport, verify_determinism};
pub use pool::{Entity, EntityPool};
pub use rng::Rng;
pub use sim::{FrameStats, Physics, RunSummary, Simulation, format_checksum};
pub use tilemap::{Tilemap, TilemapError};

pub fn crate_info() -> &'static str {
    "tilesim-kernel v0.1.0"
}
