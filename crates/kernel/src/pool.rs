//! Columnar entity storage.
//!
//! Every field lives in its own column and all columns share one length, the
//! active count. An entity's identity is its index, which is only stable
//! within a frame: compaction shifts survivors left.

use glam::DVec2;

use crate::rng::Rng;
use crate::tilemap::Tilemap;

/// Width and height of every entity box.
pub const ENTITY_SIZE: f64 = 0.9;
/// Chance that a spawned entity is AI-driven.
pub const AI_PROBABILITY: f64 = 0.25;
/// Minimum spawn life in frames.
pub const BASE_LIFE: f64 = 300.0;
/// Random life added on top of [`BASE_LIFE`].
pub const LIFE_SPREAD: f64 = 600.0;
/// Spawn horizontal speed range, centred on zero.
pub const SPAWN_VX_SPREAD: f64 = 6.0;
/// Spawn vertical speed range, centred on zero.
pub const SPAWN_VY_SPREAD: f64 = 2.0;

/// One entity, copied out of (or into) the columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entity {
    pub pos: DVec2,
    pub vel: DVec2,
    pub grounded: bool,
    pub is_ai: bool,
    /// Remaining frames; fractional.
    pub life: f64,
}

impl Entity {
    /// Draw a new entity. Draw order is x, y, vx, vy, is_ai, life.
    ///
    /// The position stays one cell clear of the map edge.
    pub fn spawn(rng: &mut Rng, map: &Tilemap) -> Self {
        let x = rng.next() * (map.width() as f64 - 2.0) + 1.0;
        let y = rng.next() * (map.height() as f64 - 2.0) + 1.0;
        let vx = (rng.next() - 0.5) * SPAWN_VX_SPREAD;
        let vy = (rng.next() - 0.5) * SPAWN_VY_SPREAD;
        let is_ai = rng.next_bool(AI_PROBABILITY);
        let life = BASE_LIFE + rng.next() * LIFE_SPREAD;
        Self {
            pos: DVec2::new(x, y),
            vel: DVec2::new(vx, vy),
            grounded: false,
            is_ai,
            life,
        }
    }
}

/// Parallel-array storage for all live entities.
#[derive(Debug, Clone, Default)]
pub struct EntityPool {
    pos: Vec<DVec2>,
    vel: Vec<DVec2>,
    grounded: Vec<bool>,
    is_ai: Vec<bool>,
    life: Vec<f64>,
}

impl EntityPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pos: Vec::with_capacity(capacity),
            vel: Vec::with_capacity(capacity),
            grounded: Vec::with_capacity(capacity),
            is_ai: Vec::with_capacity(capacity),
            life: Vec::with_capacity(capacity),
        }
    }

    /// Active entity count.
    pub fn len(&self) -> usize {
        self.pos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pos.is_empty()
    }

    /// Append one entity drawn from `rng`.
    pub fn spawn(&mut self, rng: &mut Rng, map: &Tilemap) {
        self.push(Entity::spawn(rng, map));
    }

    pub fn push(&mut self, e: Entity) {
        self.pos.push(e.pos);
        self.vel.push(e.vel);
        self.grounded.push(e.grounded);
        self.is_ai.push(e.is_ai);
        self.life.push(e.life);
    }

    /// Entity at `index`, if active.
    pub fn get(&self, index: usize) -> Option<Entity> {
        (index < self.len()).then(|| self.load(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        (0..self.len()).map(|i| self.load(i))
    }

    /// Number of active entities with the grounded flag set.
    pub fn grounded_count(&self) -> usize {
        self.grounded.iter().filter(|g| **g).count()
    }

    /// Run `update` on every entity in index order and keep those it returns
    /// `true` for, compacting survivors to the front in their original order.
    ///
    /// This is a single forward pass: survivors are written at a cursor that
    /// never passes the read index, then the columns are cut to the survivor
    /// count. Returns that count.
    pub fn update_retain<F>(&mut self, mut update: F) -> usize
    where
        F: FnMut(&mut Entity) -> bool,
    {
        let len = self.len();
        let mut write = 0;
        for read in 0..len {
            let mut e = self.load(read);
            if update(&mut e) {
                debug_assert!(write <= read, "compaction cursor overtook reader");
                self.store(write, e);
                write += 1;
            }
        }
        self.truncate(write);
        write
    }

    fn truncate(&mut self, len: usize) {
        self.pos.truncate(len);
        self.vel.truncate(len);
        self.grounded.truncate(len);
        self.is_ai.truncate(len);
        self.life.truncate(len);
    }

    fn load(&self, i: usize) -> Entity {
        Entity {
            pos: self.pos[i],
            vel: self.vel[i],
            grounded: self.grounded[i],
            is_ai: self.is_ai[i],
            life: self.life[i],
        }
    }

    fn store(&mut self, i: usize, e: Entity) {
        self.pos[i] = e.pos;
        self.vel[i] = e.vel;
        self.grounded[i] = e.grounded;
        self.is_ai[i] = e.is_ai;
        self.life[i] = e.life;
    }
}
