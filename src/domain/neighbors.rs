//! Moore-neighborhood lookup and live-neighbor counting.
//!
//! How the edges of the grid behave is a user-facing choice: a periodic grid
//! tiles the plane so gliders leave one side and come back on the other, a
//! bounded grid is an isolated universe where edge cells simply have fewer
//! neighbors.

use super::Grid;

/// The eight `(row, col)` offsets around a cell
#[rustfmt::skip]
static OFFSETS: [(isize, isize); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1),           (0, 1),
    (1, -1),  (1, 0),  (1, 1),
];

/// Rule for resolving lookups that fall off the edge of the grid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Topology {
    /// Edges wrap around (torus)
    #[default]
    Periodic,
    /// Edges are walls; off-grid positions contribute nothing
    Bounded,
}

impl Topology {
    pub fn name(self) -> &'static str {
        match self {
            Topology::Periodic => "Periodic",
            Topology::Bounded => "Bounded",
        }
    }

    /// The other topology
    pub fn toggled(self) -> Self {
        match self {
            Topology::Periodic => Topology::Bounded,
            Topology::Bounded => Topology::Periodic,
        }
    }

    /// Parse `periodic`/`bounded` (plus a few common aliases)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "periodic" | "torus" | "wrap" => Some(Topology::Periodic),
            "bounded" | "finite" | "walls" => Some(Topology::Bounded),
            _ => None,
        }
    }

    /// Resolve one coordinate shifted by `delta` against an axis of length `extent`
    fn resolve(self, index: usize, delta: isize, extent: usize) -> Option<usize> {
        let candidate = index as isize + delta;
        match self {
            Topology::Periodic => candidate
                .checked_rem_euclid(extent as isize)
                .map(|wrapped| wrapped as usize),
            Topology::Bounded => (0..extent as isize)
                .contains(&candidate)
                .then_some(candidate as usize),
        }
    }

    /// Grid positions evaluated as neighbors of `(row, col)`.
    ///
    /// Periodic grids always resolve all eight offsets; bounded grids drop the
    /// ones that leave the grid. A position that resolves back onto the cell
    /// itself (possible only when an extent is 1) is dropped in both modes.
    pub fn neighbor_positions(
        self,
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    ) -> impl Iterator<Item = (usize, usize)> {
        OFFSETS.iter().filter_map(move |&(dr, dc)| {
            let r = self.resolve(row, dr, rows)?;
            let c = self.resolve(col, dc, cols)?;
            ((r, c) != (row, col)).then_some((r, c))
        })
    }
}

/// Count live cells among the neighbors of `(row, col)` under `topology`
pub fn count_live_neighbors(grid: &Grid, row: usize, col: usize, topology: Topology) -> u8 {
    let (rows, cols) = grid.dimensions();
    topology
        .neighbor_positions(row, col, rows, cols)
        .filter(|&(r, c)| grid.is_alive(r, c))
        .count() as u8
}
