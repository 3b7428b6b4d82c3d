use super::piece::{BlockKind, GridPos};

/// The static-block grid: `height x width` cells of optional [`BlockKind`].
///
/// A cell holds a value exactly when a locked piece's block landed there and
/// has not since been shifted away by a row clear. The grid knows nothing
/// about the falling piece; the [`Board`](crate::engine::Board) asks
/// it about occupancy and tells it which cells to fill or which rows to
/// collapse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<Option<BlockKind>>,
}

impl Grid {
    /// Creates an empty grid.
    ///
    /// # Panics
    ///
    /// Panics if `width` or `height` is not positive.
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        assert!(width > 0 && height > 0, "grid dimensions must be positive");
        #[expect(clippy::cast_sign_loss)]
        let len = (width * height) as usize;
        Self {
            width,
            height,
            cells: vec![None; len],
        }
    }

    #[must_use]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[must_use]
    pub fn contains(&self, pos: GridPos) -> bool {
        (0..self.width).contains(&pos.x) && (0..self.height).contains(&pos.y)
    }

    /// Returns the occupant of a cell, or `None` when the cell is empty or
    /// out of bounds.
    #[must_use]
    pub fn cell(&self, pos: GridPos) -> Option<BlockKind> {
        if !self.contains(pos) {
            return None;
        }
        self.cells[self.index(pos)]
    }

    #[must_use]
    pub fn is_occupied(&self, pos: GridPos) -> bool {
        self.cell(pos).is_some()
    }

    /// Marks a cell as occupied by the given kind. Caller guarantees the
    /// position is in bounds (it comes from a collision-checked piece).
    pub(crate) fn set(&mut self, pos: GridPos, kind: BlockKind) {
        let index = self.index(pos);
        self.cells[index] = Some(kind);
    }

    /// Indices of completely filled rows, scanned bottom to top.
    ///
    /// Row 0, the topmost border row, is never reported.
    #[must_use]
    pub(crate) fn full_rows(&self) -> Vec<i32> {
        (1..self.height)
            .rev()
            .filter(|&y| (0..self.width).all(|x| self.is_occupied(GridPos::new(x, y))))
            .collect()
    }

    /// Removes `row` by shifting every row above it down one, overwriting it.
    ///
    /// Rows `row - 1` down to 1 are copied into the row below; row 0 never
    /// moves.
    pub(crate) fn collapse_row(&mut self, row: i32) {
        debug_assert!((1..self.height).contains(&row));
        #[expect(clippy::cast_sign_loss)]
        let width = self.width as usize;
        for src in (1..row).rev() {
            #[expect(clippy::cast_sign_loss)]
            let start = (src * self.width) as usize;
            self.cells.copy_within(start..start + width, start + width);
        }
    }

    /// Builds a grid from ASCII art for testing: `#` is an occupied cell
    /// (stored as [`BlockKind::Straight`]), `.` is empty. Rows run top to
    /// bottom and every row must have `width` cells.
    #[must_use]
    pub fn from_ascii(width: i32, height: i32, art: &str) -> Self {
        let mut grid = Self::new(width, height);
        let lines: Vec<&str> = art.lines().filter(|line| !line.trim().is_empty()).collect();

        for (y, line) in lines.iter().enumerate() {
            let cells: Vec<char> = line.chars().filter(|c| *c == '#' || *c == '.').collect();
            assert_eq!(
                i32::try_from(cells.len()).unwrap(),
                width,
                "row {y} must have exactly {width} cells",
            );
            for (x, &ch) in cells.iter().enumerate() {
                if ch == '#' {
                    let pos = GridPos::new(
                        i32::try_from(x).unwrap(),
                        i32::try_from(y).unwrap(),
                    );
                    grid.set(pos, BlockKind::Straight);
                }
            }
        }
        grid
    }

    #[expect(clippy::cast_sign_loss)]
    fn index(&self, pos: GridPos) -> usize {
        debug_assert!(self.contains(pos));
        (pos.y * self.width + pos.x) as usize
    }
}
