//! Shared types for the tilesim workspace: run configuration and tile cells.

mod config;
mod types;

pub use config::{ConfigError, SimConfig};
pub use types::Tile;

pub fn crate_info() -> &'static str {
    "tilesim-common v0.1.0"
}
