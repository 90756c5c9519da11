//! Error types shared by the domain and application layers.

/// Everything that can go wrong while building or driving a simulation.
#[derive(Debug, thiserror::Error)]
pub enum LifeError {
    #[error("invalid grid dimensions {rows}x{cols}: at least one row and one column are required")]
    InvalidDimension { rows: usize, cols: usize },

    #[error("grid of {rows}x{cols} cells exceeds the limit of {max} cells")]
    GridTooLarge { rows: usize, cols: usize, max: usize },

    #[error("cell ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfBounds {
        row: i64,
        col: i64,
        rows: usize,
        cols: usize,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("runtime error: {0}")]
    Runtime(#[from] std::io::Error),
}

impl LifeError {
    pub(crate) fn out_of_bounds(row: i64, col: i64, rows: usize, cols: usize) -> Self {
        LifeError::OutOfBounds { row, col, rows, cols }
    }
}

pub type Result<T> = std::result::Result<T, LifeError>;
