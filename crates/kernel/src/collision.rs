//! Corner-sampling box vs. tile test.
//!
//! Only the four corners of the box are checked at tile granularity. A box
//! moving more than one cell per step can pass through thin walls.

use crate::tilemap::Tilemap;

/// Tile coordinate of a position, truncated toward zero (not floored).
pub fn tile_coord(v: f64) -> i64 {
    v as i64
}

/// True if any corner of the box at `(x, y)` with size `(ew, eh)` lies in a solid tile.
pub fn overlaps_solid(map: &Tilemap, x: f64, y: f64, ew: f64, eh: f64) -> bool {
    let x0 = tile_coord(x);
    let y0 = tile_coord(y);
    let x1 = tile_coord(x + ew);
    let y1 = tile_coord(y + eh);
    map.is_solid(x0, y0) || map.is_solid(x1, y0) || map.is_solid(x0, y1) || map.is_solid(x1, y1)
}
