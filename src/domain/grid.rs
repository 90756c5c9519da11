use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use rand::Rng;
use rayon::prelude::*;

use super::neighbors::{Topology, count_live_neighbors};
use super::rules::{Rule, default_rule};
use super::Cell;
use crate::error::{LifeError, Result};

/// Probability that a freshly rolled cell starts alive
pub const INITIAL_DENSITY: f64 = 0.3;

/// Cell count above which `step` evaluates the next generation with rayon
pub const PARALLEL_THRESHOLD: usize = 100 * 100;
/// Largest grid that may be allocated (4096x4096)
pub const MAX_CELLS: usize = 1 << 24;

/// Grid manages the 2D cellular automaton state.
/// Transitions are double-buffered: the next generation is built from an
/// immutable view of the current one and then swapped in whole.
#[derive(Clone)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
    topology: Topology,
    rule: Arc<dyn Rule>,
    generation: u64,
}

impl Grid {
    /// Create a grid with every cell independently rolled alive with
    /// probability [`INITIAL_DENSITY`]
    pub fn new(rows: usize, cols: usize, topology: Topology) -> Result<Self> {
        let mut grid = Self::empty(rows, cols, topology)?;
        grid.randomize();
        Ok(grid)
    }

    /// Create a grid with all cells initially dead
    pub fn empty(rows: usize, cols: usize, topology: Topology) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(LifeError::InvalidDimension { rows, cols });
        }
        check_cell_budget(rows, cols)?;

        let cells = (0..rows)
            .flat_map(|row| (0..cols).map(move |col| Cell::new(row, col, false)))
            .collect();

        log::debug!("allocated {}x{} grid ({})", rows, cols, topology.name());

        Ok(Self {
            rows,
            cols,
            cells,
            topology,
            rule: default_rule(),
            generation: 0,
        })
    }

    /// Replace the birth/survival rule (builder pattern)
    pub fn with_rule(mut self, rule: Arc<dyn Rule>) -> Self {
        self.rule = rule;
        self
    }

    /// Get grid dimensions as `(rows, cols)`
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub const fn topology(&self) -> Topology {
        self.topology
    }

    pub fn rule(&self) -> &dyn Rule {
        self.rule.as_ref()
    }

    /// Completed steps since construction or the last reset
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Convert 2D coordinates to 1D index
    const fn get_index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    fn index_checked(&self, row: usize, col: usize) -> Result<usize> {
        if row < self.rows && col < self.cols {
            Ok(self.get_index(row, col))
        } else {
            Err(LifeError::out_of_bounds(row as i64, col as i64, self.rows, self.cols))
        }
    }

    /// Get cell at position (with bounds checking)
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        (row < self.rows && col < self.cols).then(|| self.cells[self.get_index(row, col)])
    }

    /// Alive state at position; positions outside the grid read as dead
    pub fn is_alive(&self, row: usize, col: usize) -> bool {
        self.get(row, col).is_some_and(|cell| cell.is_alive())
    }

    /// Set cell state at position
    pub fn set(&mut self, row: usize, col: usize, alive: bool) -> Result<()> {
        let idx = self.index_checked(row, col)?;
        self.cells[idx].set_alive(alive);
        Ok(())
    }

    /// Flip the cell at position and return its new state.
    /// The generation counter is untouched.
    pub fn toggle(&mut self, row: usize, col: usize) -> Result<bool> {
        let idx = self.index_checked(row, col)?;
        Ok(self.cells[idx].toggle())
    }

    fn next_cell(&self, cell: Cell) -> Cell {
        let (row, col) = cell.position();
        let neighbors = count_live_neighbors(self, row, col, self.topology);
        cell.with_alive(self.rule.next(cell.is_alive(), neighbors))
    }

    fn successor(&self, cells: Vec<Cell>) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            cells,
            topology: self.topology,
            rule: Arc::clone(&self.rule),
            generation: self.generation + 1,
        }
    }

    /// Pure functional evolution - returns the next generation (serial)
    pub fn next_generation(&self) -> Self {
        let cells = self.cells.iter().map(|&cell| self.next_cell(cell)).collect();
        self.successor(cells)
    }

    /// Parallel evolution using rayon, identical result to `next_generation`
    pub fn next_generation_parallel(&self) -> Self {
        let cells = self.cells.par_iter().map(|&cell| self.next_cell(cell)).collect();
        self.successor(cells)
    }

    /// Advance one generation, committing the new state in one swap
    pub fn step(&mut self) {
        let next = if self.cells.len() >= PARALLEL_THRESHOLD {
            self.next_generation_parallel()
        } else {
            self.next_generation()
        };
        *self = next;
        log::trace!("stepped to generation {}", self.generation);
    }

    /// Clear all cells to dead state and reset the generation counter
    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|cell| cell.set_alive(false));
        self.generation = 0;
    }

    /// Re-roll every cell from the thread-local generator
    pub fn randomize(&mut self) {
        self.randomize_with(&mut rand::rng());
    }

    /// Re-roll every cell (alive when `random() > 0.7`) and reset the generation counter
    pub fn randomize_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let threshold = 1.0 - INITIAL_DENSITY;
        self.cells
            .iter_mut()
            .for_each(|cell| cell.set_alive(rng.random::<f64>() > threshold));
        self.generation = 0;
    }

    /// Number of live cells
    pub fn live_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_alive()).count()
    }

    /// Positions of all live cells
    pub fn live_cells(&self) -> BTreeSet<(usize, usize)> {
        self.cells
            .iter()
            .filter(|cell| cell.is_alive())
            .map(|cell| cell.position())
            .collect()
    }

    /// Iterate over all cells in row-major order
    pub fn iter_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().copied()
    }
}

/// Reject dimensions whose cell count overflows or exceeds [`MAX_CELLS`]
pub(crate) fn check_cell_budget(rows: usize, cols: usize) -> Result<()> {
    match rows.checked_mul(cols) {
        Some(cells) if cells <= MAX_CELLS => Ok(()),
        _ => Err(LifeError::GridTooLarge { rows, cols, max: MAX_CELLS }),
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("topology", &self.topology)
            .field("rule", &self.rule.notation())
            .field("generation", &self.generation)
            .field("live", &self.live_count())
            .finish()
    }
}
