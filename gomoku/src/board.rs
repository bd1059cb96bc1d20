/// Static parameters of an n-in-row board.
///
/// Cells are numbered row by row: `move = x * width + y` where `x` is the row in
/// `0..height` and `y` the column in `0..width`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoardParams {
    pub width: usize,
    pub height: usize,
    pub n_in_row: usize,
}

impl BoardParams {
    pub fn new(width: usize, height: usize, n_in_row: usize) -> Self {
        Self {
            width,
            height,
            n_in_row,
        }
    }

    pub fn num_cells(&self) -> usize {
        self.width * self.height
    }

    /// Returns `None` when the coordinate lies off the board, negative values included.
    pub fn location_to_move(&self, x: i64, y: i64) -> Option<usize> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;

        if x >= self.height || y >= self.width {
            return None;
        }

        Some(x * self.width + y)
    }

    pub fn move_to_location(&self, index: usize) -> [usize; 2] {
        [index / self.width, index % self.width]
    }
}

impl Default for BoardParams {
    fn default() -> Self {
        Self::new(8, 8, 5)
    }
}
