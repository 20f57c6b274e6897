use serde::{Deserialize, Serialize};

/// A single cell of the tile grid.
///
/// The discriminants are the cell values used by the grid: 0 = empty, 1 = solid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Tile {
    #[default]
    Empty = 0,
    Solid = 1,
}

impl Tile {
    pub fn is_solid(self) -> bool {
        self == Tile::Solid
    }

    /// Parse a fixture character: `#` is solid, `.` is empty.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '#' => Some(Tile::Solid),
            '.' => Some(Tile::Empty),
            _ => None,
        }
    }
}

impl From<bool> for Tile {
    fn from(solid: bool) -> Self {
        if solid { Tile::Solid } else { Tile::Empty }
    }
}
