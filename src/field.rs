use thiserror::Error;

use crate::Coord;

#[derive(Debug, Error)]
pub enum FieldError {
    #[error("Invalid field dimensions {n}x{m}, both must be positive")]
    InvalidDimensions { n: Coord, m: Coord },
}

/// A single cell directive: "set the cell at `(x, y)` to `alive`".
///
/// Coordinates are logical (pre-normalization), so negative values and
/// values past the field extents are fine. Ops are produced by the preset
/// parser and by the engine's scan phase, and applied exactly once, in
/// production order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellOp {
    pub x: Coord,
    pub y: Coord,
    pub alive: bool,
}

/// A fixed-size toroidal grid of cells.
///
/// Cells live in a single flat buffer in row-major order. Every access goes
/// through floored-modulo normalization on both axes independently, so any
/// `Coord` at all is a valid input: `get(-1, 0)` reads the last row,
/// `get(n, 0)` reads the first. This wrap is the only mechanism giving the
/// grid its toroidal topology; neighbor queries that step off an edge come
/// back on the opposite one with no special casing.
pub struct Field {
    /// Row-major cell buffer, indexed `x * m + y`
    cells: Vec<bool>,

    /// Height (number of rows)
    n: usize,

    /// Width (number of columns)
    m: usize,
}

impl Field {
    /// Create an `n` by `m` field with every cell dead.
    pub fn new(n: Coord, m: Coord) -> Result<Self, FieldError> {
        if n <= 0 || m <= 0 {
            return Err(FieldError::InvalidDimensions { n, m });
        }

        let (n, m) = (n as usize, m as usize);

        Ok(Self {
            cells: vec![false; n * m],
            n,
            m,
        })
    }

    pub fn height(&self) -> usize {
        self.n
    }

    pub fn width(&self) -> usize {
        self.m
    }

    /// Map any coordinate into `[0, extent)`.
    ///
    /// This is a floored modulo, not a truncating remainder, so negative
    /// inputs wrap too: `normalize(-1, 10) == 9`.
    fn normalize(c: Coord, extent: usize) -> usize {
        c.rem_euclid(extent as Coord) as usize
    }

    fn index(&self, x: Coord, y: Coord) -> usize {
        let x = Self::normalize(x, self.n);
        let y = Self::normalize(y, self.m);

        x * self.m + y
    }

    pub fn get(&self, x: Coord, y: Coord) -> bool {
        self.cells[self.index(x, y)]
    }

    pub fn set(&mut self, x: Coord, y: Coord, alive: bool) {
        let i = self.index(x, y);
        self.cells[i] = alive;
    }

    pub fn apply(&mut self, op: CellOp) {
        self.set(op.x, op.y, op.alive);
    }

    /// Kill every cell.
    pub fn clear(&mut self) {
        self.cells.fill(false);
    }

    /// Clear the field and plant the built-in five-cell glider.
    ///
    /// The seed deliberately uses negative offsets, relying on the
    /// normalize-on-any-integer contract above.
    pub fn seed_default(&mut self) {
        self.clear();

        self.set(0, -1, true);
        self.set(1, 0, true);
        self.set(-1, 1, true);
        self.set(0, 1, true);
        self.set(1, 1, true);
    }

    /// Stored coordinates of every live cell, in row-major order.
    pub fn live_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &alive)| alive)
            .map(|(i, _)| (i / self.m, i % self.m))
    }
}
