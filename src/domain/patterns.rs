use super::{Grid, Topology};
use crate::error::{LifeError, Result};

/// Represents a pattern that can be stamped onto the grid
#[derive(Clone, Debug)]
pub struct Pattern {
    pub name: &'static str,
    pub description: &'static str,
    pub height: usize,
    pub width: usize,
    pub cells: Vec<(usize, usize)>, // Relative (row, col) of alive cells
}

impl Pattern {
    /// Create a new pattern from alive cell coordinates
    pub fn new(name: &'static str, description: &'static str, cells: Vec<(usize, usize)>) -> Self {
        let height = cells.iter().map(|(r, _)| *r).max().unwrap_or(0) + 1;
        let width = cells.iter().map(|(_, c)| *c).max().unwrap_or(0) + 1;
        Self { name, description, height, width, cells }
    }

    /// Stamp the pattern with its top-left corner at `(row, col)`.
    ///
    /// Periodic grids wrap the stamp around the edges. Bounded grids reject a
    /// stamp that does not fit; nothing is written in that case.
    pub fn place_on(&self, grid: &mut Grid, row: usize, col: usize) -> Result<()> {
        let (rows, cols) = grid.dimensions();

        let targets: Vec<(usize, usize)> = match grid.topology() {
            Topology::Periodic => self
                .cells
                .iter()
                .map(|&(dr, dc)| ((row + dr) % rows, (col + dc) % cols))
                .collect(),
            Topology::Bounded => {
                let (last_row, last_col) = (row + self.height - 1, col + self.width - 1);
                if last_row >= rows || last_col >= cols {
                    return Err(LifeError::out_of_bounds(
                        last_row as i64,
                        last_col as i64,
                        rows,
                        cols,
                    ));
                }
                self.cells.iter().map(|&(dr, dc)| (row + dr, col + dc)).collect()
            }
        };

        for (r, c) in targets {
            grid.set(r, c, true)?;
        }
        Ok(())
    }
}

/// Classic Game of Life patterns library
pub mod presets {
    use super::*;

    /// Glider - simplest spaceship, moves one cell diagonally every 4 generations
    pub fn glider() -> Pattern {
        Pattern::new(
            "Glider",
            "Spaceship (period 4)",
            vec![
                (0, 1),
                (1, 2),
                (2, 0), (2, 1), (2, 2),
            ],
        )
    }

    pub fn blinker() -> Pattern {
        Pattern::new("Blinker", "Oscillator (period 2)", vec![(0, 0), (0, 1), (0, 2)])
    }

    pub fn toad() -> Pattern {
        Pattern::new(
            "Toad",
            "Oscillator (period 2)",
            vec![
                (0, 1), (0, 2), (0, 3),
                (1, 0), (1, 1), (1, 2),
            ],
        )
    }

    pub fn beacon() -> Pattern {
        Pattern::new(
            "Beacon",
            "Oscillator (period 2)",
            vec![
                (0, 0), (0, 1),
                (1, 0),
                (2, 3),
                (3, 2), (3, 3),
            ],
        )
    }

    pub fn block() -> Pattern {
        Pattern::new("Block", "Still life", vec![(0, 0), (0, 1), (1, 0), (1, 1)])
    }

    /// Lightweight Spaceship (LWSS)
    pub fn lwss() -> Pattern {
        Pattern::new(
            "LWSS",
            "Lightweight spaceship (period 4)",
            vec![
                (0, 1), (0, 4),
                (1, 0),
                (2, 0), (2, 4),
                (3, 0), (3, 1), (3, 2), (3, 3),
            ],
        )
    }

    /// R-pentomino - methuselah, stabilizes after 1103 generations on an open plane
    pub fn r_pentomino() -> Pattern {
        Pattern::new(
            "R-pentomino",
            "Methuselah",
            vec![
                (0, 1), (0, 2),
                (1, 0), (1, 1),
                (2, 1),
            ],
        )
    }

    /// Get all available patterns, in keyboard shortcut order
    pub fn all_patterns() -> Vec<Pattern> {
        vec![glider(), blinker(), toad(), beacon(), block(), lwss(), r_pentomino()]
    }
}
