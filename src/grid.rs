use std::fmt;

// ============================================================================
// Grid
// ============================================================================

/// Cell value of an unoccupied cell. Occupied cells hold a tetromino id (1-7).
pub const EMPTY: u8 = 0;

/// Fixed-size rectangular field of small integers, stored row-major.
///
/// `x` grows to the right and `y` grows downwards; `(0, 0)` is the top-left
/// cell. Origins passed to [`fill`](Grid::fill), [`copy_into`](Grid::copy_into)
/// and [`fits`](Grid::fits) are signed because a piece may hang past the
/// left or top edge.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl Grid {
    /// Creates a zero-filled grid.
    ///
    /// # Panics
    ///
    /// Panics if `width` or `height` is zero.
    pub fn new(width: usize, height: usize) -> Self {
        assert!(
            width > 0 && height > 0,
            "grid dimensions must be positive, got {width}x{height}"
        );
        Self {
            width,
            height,
            cells: vec![EMPTY; width * height],
        }
    }

    /// Builds a grid from a literal template, one array per row.
    ///
    /// # Panics
    ///
    /// Panics if the template has no rows or zero-length rows.
    pub fn from_rows<const W: usize, const H: usize>(rows: [[u8; W]; H]) -> Self {
        let mut grid = Self::new(W, H);
        for (row, cells) in grid.cells.chunks_mut(W).zip(&rows) {
            row.copy_from_slice(cells);
        }
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the grid.
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.cells[self.index(x, y)]
    }

    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the grid.
    pub fn set(&mut self, x: usize, y: usize, value: u8) {
        let index = self.index(x, y);
        self.cells[index] = value;
    }

    pub fn is_empty(&self, x: usize, y: usize) -> bool {
        self.get(x, y) == EMPTY
    }

    /// Iterates over the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks(self.width)
    }

    /// Iterates over every cell as `(x, y, value)`.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, u8)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &value)| (i % width, i / width, value))
    }

    /// Number of non-empty cells.
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|&&value| value != EMPTY).count()
    }

    fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "cell ({x}, {y}) out of bounds for {}x{} grid",
            self.width,
            self.height
        );
        y * self.width + x
    }

    /// Maps a signed coordinate to a cell index, or `None` when it falls off the grid.
    fn checked_index(&self, x: i32, y: i32) -> Option<usize> {
        let x = usize::try_from(x).ok().filter(|&x| x < self.width)?;
        let y = usize::try_from(y).ok().filter(|&y| y < self.height)?;
        Some(y * self.width + x)
    }

    // ------------------------------------------------------------------------
    // Bulk operations
    // ------------------------------------------------------------------------

    /// Sets every in-bounds cell of the rectangle to `value`. The part of the
    /// rectangle outside the grid is skipped.
    pub fn fill(&mut self, origin_x: i32, origin_y: i32, width: usize, height: usize, value: u8) {
        for dy in 0..height as i32 {
            for dx in 0..width as i32 {
                if let Some(index) = self.checked_index(origin_x + dx, origin_y + dy) {
                    self.cells[index] = value;
                }
            }
        }
    }

    /// Rotates the contents 90° clockwise, swapping width and height.
    pub fn rotate_cw(&mut self) {
        let (width, height) = (self.height, self.width);
        let mut cells = vec![EMPTY; self.cells.len()];
        for y in 0..height {
            for x in 0..width {
                cells[y * width + x] = self.get(y, self.height - 1 - x);
            }
        }
        self.replace(width, height, cells);
    }

    /// Rotates the contents 90° counter-clockwise, swapping width and height.
    pub fn rotate_ccw(&mut self) {
        let (width, height) = (self.height, self.width);
        let mut cells = vec![EMPTY; self.cells.len()];
        for y in 0..height {
            for x in 0..width {
                cells[y * width + x] = self.get(self.width - 1 - y, x);
            }
        }
        self.replace(width, height, cells);
    }

    fn replace(&mut self, width: usize, height: usize, cells: Vec<u8>) {
        self.width = width;
        self.height = height;
        self.cells = cells;
    }

    /// Stamps the non-empty cells of `self` onto `dest` with the top-left
    /// corner at `(origin_x, origin_y)`.
    ///
    /// Empty source cells leave the destination untouched and cells landing
    /// outside `dest` are dropped. This is a clipped copy, not a collision test.
    pub fn copy_into(&self, dest: &mut Grid, origin_x: i32, origin_y: i32) {
        for (x, y, value) in self.occupied_cells() {
            if let Some(index) = dest.checked_index(origin_x + x, origin_y + y) {
                dest.cells[index] = value;
            }
        }
    }

    /// Returns whether `other` can be placed with its top-left corner at
    /// `(origin_x, origin_y)`: every non-empty cell of `other` must land
    /// inside `self` on an empty cell. Empty cells of `other` never collide.
    pub fn fits(&self, other: &Grid, origin_x: i32, origin_y: i32) -> bool {
        other.occupied_cells().all(|(x, y, _)| {
            self.checked_index(origin_x + x, origin_y + y)
                .is_some_and(|index| self.cells[index] == EMPTY)
        })
    }

    fn occupied_cells(&self) -> impl Iterator<Item = (i32, i32, u8)> + '_ {
        self.cells()
            .filter(|&(_, _, value)| value != EMPTY)
            .map(|(x, y, value)| (x as i32, y as i32, value))
    }

    // ------------------------------------------------------------------------
    // Rows
    // ------------------------------------------------------------------------

    /// Returns whether row `y` has no empty cell.
    pub fn is_row_full(&self, y: usize) -> bool {
        self.row(y).iter().all(|&value| value != EMPTY)
    }

    /// Removes row `y`: every row above it moves down by one and row 0 is
    /// zero-filled.
    pub fn remove_row(&mut self, y: usize) {
        assert!(y < self.height, "row {y} out of bounds for height {}", self.height);
        let width = self.width;
        self.cells.copy_within(0..y * width, width);
        self.cells[..width].fill(EMPTY);
    }

    fn row(&self, y: usize) -> &[u8] {
        let start = self.index(0, y);
        &self.cells[start..start + self.width]
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for &value in row {
                if value == EMPTY {
                    f.write_str(".")?;
                } else {
                    write!(f, "{value}")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
