use tilesim_common::Tile;

use crate::rng::Rng;

/// Errors from building a tilemap out of hand-written rows.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TilemapError {
    #[error("tilemap needs at least one row and one column")]
    Empty,
    #[error("row {row} has width {actual}, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("unexpected tile character {ch:?} at ({x}, {y})")]
    BadChar { ch: char, x: usize, y: usize },
}

/// Immutable grid of solid/empty cells, stored row-major.
///
/// y grows downward, matching the direction of gravity. Any query outside
/// `[0, width) x [0, height)` reports [`Tile::Solid`], so the grid behaves as
/// if walled in without storing border cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tilemap {
    width: usize,
    height: usize,
    cells: Vec<Tile>,
}

impl Tilemap {
    /// Draw every cell in row-major order: solid iff `rng.next() < solid_probability`.
    pub fn build(width: usize, height: usize, solid_probability: f64, rng: &mut Rng) -> Self {
        let cells = (0..width * height)
            .map(|_| Tile::from(rng.next() < solid_probability))
            .collect();
        Self {
            width,
            height,
            cells,
        }
    }

    /// Build a fixture from rows of `#` (solid) and `.` (empty). Row 0 is y = 0.
    pub fn from_rows(rows: &[&str]) -> Result<Self, TilemapError> {
        let width = rows.first().map_or(0, |r| r.chars().count());
        if width == 0 {
            return Err(TilemapError::Empty);
        }
        let mut cells = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            let actual = row.chars().count();
            if actual != width {
                return Err(TilemapError::RaggedRow {
                    row: y,
                    expected: width,
                    actual,
                });
            }
            for (x, ch) in row.chars().enumerate() {
                cells.push(Tile::from_char(ch).ok_or(TilemapError::BadChar { ch, x, y })?);
            }
        }
        Ok(Self {
            width,
            height: rows.len(),
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell at `(x, y)`; solid outside the grid.
    pub fn query(&self, x: i64, y: i64) -> Tile {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return Tile::Solid;
        }
        self.cells[y as usize * self.width + x as usize]
    }

    pub fn is_solid(&self, x: i64, y: i64) -> bool {
        self.query(x, y).is_solid()
    }

    /// Number of stored solid cells (border excluded).
    pub fn solid_count(&self) -> usize {
        self.cells.iter().filter(|t| t.is_solid()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_draws_one_value_per_cell() {
        let mut rng = Rng::new(123_456_789);
        let map = Tilemap::build(128, 72, 0.18, &mut rng);

        let mut replay = Rng::new(123_456_789);
        for _ in 0..128 * 72 {
            replay.next();
        }
        assert_eq!(rng.state(), replay.state());
        assert_eq!(map.width(), 128);
        assert_eq!(map.height(), 72);
    }

    #[test]
    fn build_follows_draw_order() {
        let mut rng = Rng::new(7);
        let map = Tilemap::build(5, 4, 0.5, &mut rng);
        let mut replay = Rng::new(7);
        for y in 0..4 {
            for x in 0..5 {
                let expected = Tile::from(replay.next() < 0.5);
                assert_eq!(map.query(x, y), expected, "cell ({x}, {y})");
            }
        }
    }

    #[test]
    fn solid_fraction_near_probability() {
        let mut rng = Rng::new(123_456_789);
        let map = Tilemap::build(128, 72, 0.18, &mut rng);
        let fraction = map.solid_count() as f64 / (128.0 * 72.0);
        assert!((fraction - 0.18).abs() < 0.02, "fraction {fraction}");
    }

    #[test]
    fn probability_extremes() {
        let mut rng = Rng::new(3);
        assert_eq!(Tilemap::build(10, 10, 0.0, &mut rng).solid_count(), 0);
        assert_eq!(Tilemap::build(10, 10, 1.0, &mut rng).solid_count(), 100);
    }

    #[test]
    fn out_of_bounds_is_solid() {
        let mut rng = Rng::new(11);
        let map = Tilemap::build(8, 6, 0.0, &mut rng);
        assert_eq!(map.solid_count(), 0);
        for (x, y) in [(-1, 0), (0, -1), (8, 0), (0, 6), (-5, -5), (100, 3), (3, 100)] {
            assert!(map.is_solid(x, y), "({x}, {y}) should be solid");
        }
        assert!(!map.is_solid(0, 0));
        assert!(!map.is_solid(7, 5));
    }

    #[test]
    fn from_rows_layout() {
        let map = Tilemap::from_rows(&["#..", "..#"]).unwrap();
        assert_eq!((map.width(), map.height()), (3, 2));
        assert_eq!(map.query(0, 0), Tile::Solid);
        assert_eq!(map.query(1, 0), Tile::Empty);
        assert_eq!(map.query(2, 1), Tile::Solid);
        assert_eq!(map.solid_count(), 2);
    }

    #[test]
    fn from_rows_rejects_bad_input() {
        assert_eq!(Tilemap::from_rows(&[]), Err(TilemapError::Empty));
        assert_eq!(
            Tilemap::from_rows(&["..", "..."]),
            Err(TilemapError::RaggedRow {
                row: 1,
                expected: 2,
                actual: 3
            })
        );
        assert_eq!(
            Tilemap::from_rows(&[".x"]),
            Err(TilemapError::BadChar { ch: 'x', x: 1, y: 0 })
        );
    }
}
