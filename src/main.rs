use macroquad::prelude::*;
use canvas_life::{
    Config, Session,
    input,
    rendering::{self, Palette},
};

fn window_conf() -> Conf {
    Conf {
        window_title: "Conway's Game of Life".to_owned(),
        window_width: 1000,
        window_height: 800,
        window_resizable: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();

    if let Err(err) = run().await {
        log::error!("{err}");
    }
}

async fn run() -> canvas_life::Result<()> {
    // Stepping happens on tokio; macroquad only draws and polls input
    let runtime = tokio::runtime::Runtime::new()?;

    let config = Config::from_env().unwrap_or_else(|err| {
        log::warn!("{err}; falling back to defaults");
        Config::default()
    });

    let mut viewport = (screen_width(), screen_height());
    let mut session = Session::new(viewport.0, viewport.1, config, runtime.handle().clone())?;
    let mut redraws = session.subscribe();
    let mut frame = session.grid_snapshot();
    let palette = Palette::default();

    loop {
        // Window resizes rebuild the grid; a window too small for one cell keeps the old one
        let size = (screen_width(), screen_height());
        if size != viewport {
            viewport = size;
            if let Err(err) = session.resize(size.0, size.1) {
                log::warn!("keeping previous grid: {err}");
            }
        }

        let mouse_pos = mouse_position();
        input::process_keyboard_input(&mut session);
        input::handle_pattern_keys(&session, mouse_pos);
        input::handle_click(&session, mouse_pos);

        // Re-snapshot only when a step, toggle or rebuild happened
        if redraws.has_changed().unwrap_or(false) {
            redraws.borrow_and_update();
            frame = session.grid_snapshot();
        }

        clear_background(palette.background);
        rendering::draw_grid(&frame, session.layout(), &palette);
        rendering::draw_status(&session, &frame, &palette);

        next_frame().await;
    }
}
