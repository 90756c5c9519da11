use super::config::validate_cell_size;
use crate::domain::check_cell_budget;
use crate::error::{LifeError, Result};

/// Layout maps between viewport pixels and logical grid positions.
/// The grid fills as many whole cells as fit; the leftover pixels are split
/// evenly on both sides so the grid sits centered.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    pub rows: usize,
    pub cols: usize,
    pub cell_size: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Layout {
    pub fn new(width: f32, height: f32, cell_size: f32) -> Result<Self> {
        validate_cell_size(cell_size)?;
        if !(width.is_finite() && height.is_finite() && width >= 0.0 && height >= 0.0) {
            return Err(LifeError::InvalidConfig(format!(
                "viewport must have a non-negative size, got {width}x{height}"
            )));
        }

        let cols = (width / cell_size).floor() as usize;
        let rows = (height / cell_size).floor() as usize;
        if rows == 0 || cols == 0 {
            return Err(LifeError::InvalidDimension { rows, cols });
        }
        check_cell_budget(rows, cols)?;

        let offset_x = ((width - cols as f32 * cell_size) / 2.0).floor();
        let offset_y = ((height - rows as f32 * cell_size) / 2.0).floor();

        Ok(Self { rows, cols, cell_size, offset_x, offset_y })
    }

    /// Grid dimensions as `(rows, cols)`
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Top-left pixel of the cell at `(row, col)`
    pub fn cell_origin(&self, row: usize, col: usize) -> (f32, f32) {
        (
            self.offset_x + col as f32 * self.cell_size,
            self.offset_y + row as f32 * self.cell_size,
        )
    }

    /// Cell containing the pixel `(x, y)`; the centering margin is outside the grid
    pub fn cell_at(&self, x: f32, y: f32) -> Result<(usize, usize)> {
        let col = ((x - self.offset_x) / self.cell_size).floor();
        let row = ((y - self.offset_y) / self.cell_size).floor();

        let inside = |index: f32, extent: usize| index >= 0.0 && index < extent as f32;
        if inside(row, self.rows) && inside(col, self.cols) {
            Ok((row as usize, col as usize))
        } else {
            Err(LifeError::out_of_bounds(row as i64, col as i64, self.rows, self.cols))
        }
    }

    /// Pixel size covered by the grid itself
    pub fn grid_extent(&self) -> (f32, f32) {
        (self.cols as f32 * self.cell_size, self.rows as f32 * self.cell_size)
    }
}
