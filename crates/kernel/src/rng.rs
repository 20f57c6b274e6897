//! Deterministic xorshift32 source shared by tilemap construction and spawning.

use serde::{Deserialize, Serialize};

const FRACTION_BITS: u32 = 24;
const FRACTION_MASK: u32 = (1 << FRACTION_BITS) - 1;
const FRACTION_SCALE: f64 = (1u32 << FRACTION_BITS) as f64;

/// Single-state xorshift32 generator.
///
/// There is exactly one instance per run. It is passed by `&mut` to every
/// consumer so the draw order stays explicit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rng {
    state: u32,
}

impl Rng {
    /// Seed the generator. Zero is a fixed point: every draw is then 0.0.
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Advance the state and return a value in [0, 1) built from its low 24 bits.
    pub fn next(&mut self) -> f64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        f64::from(x & FRACTION_MASK) / FRACTION_SCALE
    }

    pub fn next_bool(&mut self, p: f64) -> bool {
        self.next() < p
    }

    /// Current internal state.
    pub fn state(&self) -> u32 {
        self.state
    }
}
