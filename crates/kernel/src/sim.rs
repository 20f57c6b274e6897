use serde::Serialize;
use std::time::Instant;
use tilesim_common::{ConfigError, SimConfig};

use crate::collision::{overlaps_solid, tile_coord};
use crate::pool::{ENTITY_SIZE, Entity, EntityPool};
use crate::rng::Rng;
use crate::tilemap::Tilemap;

/// Horizontal speed kept (and reversed) after bumping into a wall.
pub const BOUNCE_DAMPING: f64 = 0.3;

/// Per-step constants derived from the config.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Physics {
    pub dt: f64,
    pub gravity: f64,
    pub friction: f64,
}

impl Physics {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            dt: config.dt,
            gravity: config.gravity,
            friction: config.friction,
        }
    }
}

impl Default for Physics {
    fn default() -> Self {
        Self::from_config(&SimConfig::default())
    }
}

/// Advance one entity by one frame: gravity, AI ledge turn, horizontal then
/// vertical move with tile collision, ground friction, and life decrement.
pub fn integrate(e: &mut Entity, map: &Tilemap, phys: &Physics) {
    let dt = phys.dt;
    e.vel.y += phys.gravity * dt;

    // AI walkers turn around when there is no floor one cell ahead. A wall
    // ahead at body height is not looked at.
    if e.is_ai {
        let facing = if e.vel.x >= 0.0 { 1.0 } else { -1.0 };
        let ahead = tile_coord(e.pos.x + facing);
        let foot = tile_coord(e.pos.y + 1.0);
        if !map.is_solid(ahead, foot) {
            e.vel.x = -e.vel.x;
        }
    }

    let new_x = e.pos.x + e.vel.x * dt;
    if !overlaps_solid(map, new_x, e.pos.y, ENTITY_SIZE, ENTITY_SIZE) {
        e.pos.x = new_x;
    } else {
        e.vel.x = -e.vel.x * BOUNCE_DAMPING;
    }

    let new_y = e.pos.y + e.vel.y * dt;
    if !overlaps_solid(map, e.pos.x, new_y, ENTITY_SIZE, ENTITY_SIZE) {
        e.pos.y = new_y;
        e.grounded = false;
    } else {
        if e.vel.y > 0.0 {
            e.grounded = true;
        }
        e.vel.y = 0.0;
    }

    if e.grounded {
        e.vel.x *= 1.0 - phys.friction * dt;
    }

    e.life -= 1.0;
}

/// Checksum text as printed at the end of a run: exactly six decimals.
pub fn format_checksum(checksum: f64) -> String {
    format!("{checksum:.6}")
}

/// Counters for a single frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FrameStats {
    /// 1-based frame number.
    pub frame: u32,
    pub spawned: usize,
    /// Entities updated this frame (previous survivors plus spawns).
    pub processed: usize,
    pub dropped: usize,
    /// Active count after compaction.
    pub active: usize,
    /// Survivors that ended the frame grounded.
    pub grounded: usize,
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub seed: u32,
    pub frames: u32,
    pub initial_entities: u32,
    pub spawn_per_frame: u32,
    pub width: u32,
    pub height: u32,
    pub checksum: f64,
    /// [`format_checksum`] of `checksum`.
    pub checksum_text: String,
    pub active: usize,
    pub peak_active: usize,
    pub total_spawned: u64,
    pub total_dropped: u64,
    pub elapsed_secs: f64,
    pub frames_per_second: f64,
}

/// Owns the tilemap, the entity pool and the single PRNG for one run.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimConfig,
    physics: Physics,
    map: Tilemap,
    pool: EntityPool,
    rng: Rng,
    frame: u32,
    checksum: f64,
    total_spawned: u64,
    total_dropped: u64,
    peak_active: usize,
}

impl Simulation {
    /// Validate `config`, build the tilemap and spawn the initial entities.
    ///
    /// Draw order: every tilemap cell first, then each initial entity.
    pub fn new(config: &SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = Rng::new(config.seed);
        let map = Tilemap::build(
            config.width as usize,
            config.height as usize,
            config.solid_probability,
            &mut rng,
        );
        tracing::debug!(
            width = map.width(),
            height = map.height(),
            solid = map.solid_count(),
            "tilemap built"
        );
        Ok(Self::populate(config, map, rng))
    }

    /// Like [`Simulation::new`] but on a supplied tilemap. The PRNG only feeds
    /// spawning; `width`, `height` and `solid_probability` are ignored.
    pub fn with_tilemap(config: &SimConfig, map: Tilemap) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = Rng::new(config.seed);
        Ok(Self::populate(config, map, rng))
    }

    fn populate(config: &SimConfig, map: Tilemap, mut rng: Rng) -> Self {
        let initial = config.initial_entities as usize;
        let mut pool = EntityPool::with_capacity(initial);
        for _ in 0..initial {
            pool.spawn(&mut rng, &map);
        }
        tracing::debug!(entities = pool.len(), "initial entities spawned");
        Self {
            config: config.clone(),
            physics: Physics::from_config(config),
            map,
            pool,
            rng,
            frame: 0,
            checksum: 0.0,
            total_spawned: initial as u64,
            total_dropped: 0,
            peak_active: initial,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Frames completed so far.
    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn checksum(&self) -> f64 {
        self.checksum
    }

    pub fn active_len(&self) -> usize {
        self.pool.len()
    }

    pub fn pool(&self) -> &EntityPool {
        &self.pool
    }

    pub fn tilemap(&self) -> &Tilemap {
        &self.map
    }

    pub fn rng_state(&self) -> u32 {
        self.rng.state()
    }

    /// Advance one frame: spawn, update every active entity in index order,
    /// fold it into the checksum, and compact away the dead.
    pub fn step(&mut self) -> FrameStats {
        let spawned = self.config.spawn_per_frame as usize;
        for _ in 0..spawned {
            self.pool.spawn(&mut self.rng, &self.map);
        }
        let processed = self.pool.len();

        let map = &self.map;
        let phys = self.physics;
        let checksum = &mut self.checksum;
        let active = self.pool.update_retain(|e| {
            integrate(e, map, &phys);
            *checksum = *checksum + e.pos.x + e.pos.y + e.vel.x + e.vel.y;
            e.life > 0.0
        });
        let grounded = self.pool.grounded_count();

        self.frame += 1;
        let dropped = processed - active;
        self.total_spawned += spawned as u64;
        self.total_dropped += dropped as u64;
        self.peak_active = self.peak_active.max(processed);

        let stats = FrameStats {
            frame: self.frame,
            spawned,
            processed,
            dropped,
            active,
            grounded,
        };
        tracing::trace!(
            frame = stats.frame,
            processed,
            dropped,
            active,
            grounded,
            "frame complete"
        );
        stats
    }

    /// Step `n` frames regardless of the configured frame count.
    pub fn run_frames(&mut self, n: u32) {
        for _ in 0..n {
            self.step();
        }
    }

    /// Run the remaining configured frames and summarize.
    pub fn run(&mut self) -> RunSummary {
        let _span = tracing::info_span!("sim_run", seed = self.config.seed).entered();
        let start = Instant::now();
        while self.frame < self.config.frames {
            self.step();
        }
        let elapsed = start.elapsed().as_secs_f64();
        let summary = self.summary(elapsed);
        tracing::info!(
            frames = summary.frames,
            active = summary.active,
            peak = summary.peak_active,
            elapsed_secs = summary.elapsed_secs,
            checksum = %summary.checksum_text,
            "run complete"
        );
        summary
    }

    fn summary(&self, elapsed_secs: f64) -> RunSummary {
        let frames_per_second = if elapsed_secs > 0.0 {
            f64::from(self.frame) / elapsed_secs
        } else {
            0.0
        };
        RunSummary {
            seed: self.config.seed,
            frames: self.frame,
            initial_entities: self.config.initial_entities,
            spawn_per_frame: self.config.spawn_per_frame,
            width: self.map.width() as u32,
            height: self.map.height() as u32,
            checksum: self.checksum,
            checksum_text: format_checksum(self.checksum),
            active: self.pool.len(),
            peak_active: self.peak_active,
            total_spawned: self.total_spawned,
            total_dropped: self.total_dropped,
            elapsed_secs,
            frames_per_second,
        }
    }
}
