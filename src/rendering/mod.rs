use macroquad::prelude::*;

use crate::application::{Layout, Session};
use crate::domain::Grid;

/// Colors used to paint the board
#[derive(Clone, Copy, Debug)]
pub struct Palette {
    pub background: Color,
    pub alive: Color,
    pub dead: Color,
    pub text: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: BLACK,
            alive: Color::from_rgba(0, 255, 150, 255), // Bright green
            dead: Color::from_rgba(15, 15, 15, 255),   // Very dark gray
            text: WHITE,
        }
    }
}

/// Format large numbers with K/M suffixes
fn format_number(n: usize) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        format!("{}", n)
    }
}

/// Paint every cell as a filled square at its layout position
pub fn draw_grid(grid: &Grid, layout: &Layout, palette: &Palette) {
    let size = layout.cell_size;
    // Leave a 1px gutter between cells once they are large enough to show it
    let fill = if size >= 4.0 { size - 1.0 } else { size };

    for cell in grid.iter_cells() {
        let (x, y) = layout.cell_origin(cell.row(), cell.col());
        let color = if cell.is_alive() { palette.alive } else { palette.dead };
        draw_rectangle(x, y, fill, fill, color);
    }
}

/// One status line at the top, key help at the bottom
pub fn draw_status(session: &Session, grid: &Grid, palette: &Palette) {
    let (rows, cols) = grid.dimensions();
    let status = format!(
        "{}  gen {}  pop {}  {:.0}/s  {}x{} {} {}",
        if session.is_running() { "RUNNING" } else { "STOPPED" },
        grid.generation(),
        format_number(grid.live_count()),
        session.steps_per_second(),
        rows,
        cols,
        grid.topology().name(),
        grid.rule().notation(),
    );
    draw_text(&status, 10.0, 20.0, 20.0, palette.text);

    let help = "Space run/stop  C clear  R random  T topology  H rule  Up/Down speed  1-7 stamp  click toggle";
    draw_text(help, 10.0, screen_height() - 10.0, 16.0, palette.text);
}
