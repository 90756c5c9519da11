/// Cell is the smallest unit of automaton state.
/// Its placement is fixed when the grid is built; only `alive` changes afterwards.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Cell {
    row: usize,
    col: usize,
    alive: bool,
}

impl Cell {
    /// Place a cell at a logical grid position
    pub const fn new(row: usize, col: usize, alive: bool) -> Self {
        Self { row, col, alive }
    }

    pub const fn row(&self) -> usize {
        self.row
    }

    pub const fn col(&self) -> usize {
        self.col
    }

    /// Logical position as `(row, col)`
    pub const fn position(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    /// Check if the cell is currently alive
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn set_alive(&mut self, alive: bool) {
        self.alive = alive;
    }

    /// Flip the cell and return its new state
    pub fn toggle(&mut self) -> bool {
        self.alive = !self.alive;
        self.alive
    }

    /// Same placement, different state. Used when building the next generation.
    pub const fn with_alive(self, alive: bool) -> Self {
        Self { alive, ..self }
    }
}
