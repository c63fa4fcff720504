//! # World Grid
//!
//! The static wall/floor grid entities move on.

use crate::{CryptError, CryptResult, PixelPosition, Position};
use serde::{Deserialize, Serialize};

/// The kind of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    Wall,
    Floor,
}

impl CellKind {
    /// Whether an entity may stand on this cell.
    pub fn is_walkable(self) -> bool {
        matches!(self, CellKind::Floor)
    }

    /// Single-character representation used by [`Grid::from_ascii`].
    pub fn to_char(self) -> char {
        match self {
            CellKind::Wall => '#',
            CellKind::Floor => '.',
        }
    }
}

/// A rectangular grid of cells, stored row-major.
///
/// The grid does not change during play. Border walls are a property of
/// the level generator, not of this type: an open-edged grid is valid and
/// out-of-bounds tiles simply count as unwalkable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<CellKind>,
}

impl Grid {
    /// Creates a grid from a flat row-major cell vector.
    pub fn new(width: u32, height: u32, cells: Vec<CellKind>) -> CryptResult<Self> {
        if width == 0 || height == 0 {
            return Err(CryptError::InvalidGrid(format!(
                "grid must not be empty ({}x{})",
                width, height
            )));
        }
        let expected = width as usize * height as usize;
        if cells.len() != expected {
            return Err(CryptError::InvalidGrid(format!(
                "expected {} cells for {}x{}, got {}",
                expected,
                width,
                height,
                cells.len()
            )));
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Creates a grid filled with a single cell kind.
    pub fn filled(width: u32, height: u32, kind: CellKind) -> CryptResult<Self> {
        Self::new(width, height, vec![kind; width as usize * height as usize])
    }

    /// Creates a grid from rows, rejecting ragged input.
    pub fn from_rows(rows: Vec<Vec<CellKind>>) -> CryptResult<Self> {
        let height = rows.len();
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if let Some((index, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != width) {
            return Err(CryptError::InvalidGrid(format!(
                "row {} has {} cells, expected {}",
                index,
                row.len(),
                width
            )));
        }
        let cells = rows.into_iter().flatten().collect();
        Self::new(width as u32, height as u32, cells)
    }

    /// Creates a grid from numeric cell codes: `0` is a wall, anything else floor.
    pub fn from_codes(rows: &[Vec<u8>]) -> CryptResult<Self> {
        Self::from_rows(
            rows.iter()
                .map(|row| {
                    row.iter()
                        .map(|&code| if code == 0 { CellKind::Wall } else { CellKind::Floor })
                        .collect()
                })
                .collect(),
        )
    }

    /// Parses a grid drawn with `#` for walls and `.` for floor.
    ///
    /// Blank lines and surrounding whitespace are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use crypt::{CellKind, Grid, Position};
    ///
    /// let grid = Grid::from_ascii("
    ///     ####
    ///     #.#
    ///     ####
    /// ").unwrap();
    /// assert_eq!(grid.cell(Position::new(1, 1)), Some(CellKind::Floor));
    /// assert!(!grid.is_walkable(Position::new(0, 1)));
    /// ```
    pub fn from_ascii(text: &str) -> CryptResult<Self> {
        let mut rows = Vec::new();
        for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
            let mut row = Vec::with_capacity(line.len());
            for ch in line.chars() {
                row.push(match ch {
                    '#' => CellKind::Wall,
                    '.' => CellKind::Floor,
                    other => {
                        return Err(CryptError::InvalidGrid(format!(
                            "unknown cell character {:?}",
                            other
                        )))
                    }
                });
            }
            rows.push(row);
        }
        Self::from_rows(rows)
    }

    /// Width in tiles.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in tiles.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the position lies inside the grid.
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    /// Gets the cell at a position, or None when out of bounds.
    pub fn cell(&self, pos: Position) -> Option<CellKind> {
        if !self.is_in_bounds(pos) {
            return None;
        }
        self.cells
            .get(pos.y as usize * self.width as usize + pos.x as usize)
            .copied()
    }

    /// Whether the tile is in bounds and not a wall.
    pub fn is_walkable(&self, pos: Position) -> bool {
        self.cell(pos).map(CellKind::is_walkable).unwrap_or(false)
    }

    /// All floor positions in row-major order.
    pub fn floor_positions(&self) -> Vec<Position> {
        self.positions()
            .filter(|&pos| self.is_walkable(pos))
            .collect()
    }

    /// Iterates over every position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height as i32)
            .flat_map(move |y| (0..self.width as i32).map(move |x| Position::new(x, y)))
    }

    /// Renders the grid back into the `#`/`.` form.
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity((self.width as usize + 1) * self.height as usize);
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                if let Some(cell) = self.cell(Position::new(x, y)) {
                    out.push(cell.to_char());
                }
            }
            out.push('\n');
        }
        out
    }
}

/// Pixel centre of a tile.
pub fn tile_to_pixel(pos: Position, tile_size: f32) -> PixelPosition {
    PixelPosition::new(
        pos.x as f32 * tile_size + tile_size / 2.0,
        pos.y as f32 * tile_size + tile_size / 2.0,
    )
}
