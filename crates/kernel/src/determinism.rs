//! Repeated-run determinism check.

use serde::Serialize;
use tilesim_common::{ConfigError, SimConfig};

use crate::sim::Simulation;

/// Checksums of several identical runs and whether they agree bit for bit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeterminismReport {
    pub runs: usize,
    pub checksums: Vec<f64>,
    pub is_deterministic: bool,
}

/// Run the full configured simulation `runs` times from scratch.
pub fn verify_determinism(
    config: &SimConfig,
    runs: usize,
) -> Result<DeterminismReport, ConfigError> {
    config.validate()?;
    let mut checksums = Vec::with_capacity(runs);
    for run in 0..runs {
        let summary = Simulation::new(config)?.run();
        tracing::debug!(run, checksum = %summary.checksum_text, "determinism run");
        checksums.push(summary.checksum);
    }
    let is_deterministic = checksums
        .windows(2)
        .all(|pair| pair[0].to_bits() == pair[1].to_bits());
    if !is_deterministic {
        tracing::warn!(?checksums, "checksums diverged across runs");
    }
    Ok(DeterminismReport {
        runs,
        checksums,
        is_deterministic,
    })
}
