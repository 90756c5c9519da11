use std::sync::Arc;

use macroquad::prelude::*;

use crate::application::Session;
use crate::domain::{ConwayRule, HighLifeRule, Rule, presets};
use crate::error::Result;

const PATTERN_KEYS: [KeyCode; 7] = [
    KeyCode::Key1,
    KeyCode::Key2,
    KeyCode::Key3,
    KeyCode::Key4,
    KeyCode::Key5,
    KeyCode::Key6,
    KeyCode::Key7,
];

fn toggle_running(session: &mut Session) -> Result<()> {
    if session.is_running() {
        session.stop();
    } else {
        session.start();
    }
    Ok(())
}

fn clear(session: &mut Session) -> Result<()> {
    session.clear();
    Ok(())
}

fn randomize(session: &mut Session) -> Result<()> {
    session.randomize();
    Ok(())
}

fn switch_topology(session: &mut Session) -> Result<()> {
    let topology = session.config().topology.toggled();
    session.set_topology(topology)
}

fn switch_rule(session: &mut Session) -> Result<()> {
    let rule: Arc<dyn Rule> = if session.config().rule.name() == ConwayRule.name() {
        Arc::new(HighLifeRule)
    } else {
        Arc::new(ConwayRule)
    };
    session.set_rule(rule)
}

/// Process keyboard shortcuts
pub fn process_keyboard_input(session: &mut Session) {
    type KeyAction = (KeyCode, fn(&mut Session) -> Result<()>);

    let actions: [KeyAction; 7] = [
        (KeyCode::Space, toggle_running),
        (KeyCode::C, clear),
        (KeyCode::R, randomize),
        (KeyCode::T, switch_topology),
        (KeyCode::H, switch_rule),
        (KeyCode::Up, |s| s.adjust_speed(1.0).map(|_| ())),
        (KeyCode::Down, |s| s.adjust_speed(-1.0).map(|_| ())),
    ];

    for (key, action) in actions {
        if is_key_pressed(key) {
            if let Err(err) = action(session) {
                log::warn!("{:?} ignored: {}", key, err);
            }
        }
    }
}

/// Toggle the cell under the pointer on left click
pub fn handle_click(session: &Session, mouse_pos: (f32, f32)) {
    if !is_mouse_button_pressed(MouseButton::Left) {
        return;
    }
    match session.click(mouse_pos.0, mouse_pos.1) {
        Ok((row, col)) => log::debug!("toggled ({row}, {col})"),
        Err(err) => log::debug!("click ignored: {err}"),
    }
}

/// Stamp the preset bound to a number key, centered on the pointer
pub fn handle_pattern_keys(session: &Session, mouse_pos: (f32, f32)) {
    let Some(idx) = PATTERN_KEYS.iter().position(|&key| is_key_pressed(key)) else {
        return;
    };
    let patterns = presets::all_patterns();
    let Some(pattern) = patterns.get(idx) else {
        return;
    };

    let placed = session.layout().cell_at(mouse_pos.0, mouse_pos.1).and_then(|(row, col)| {
        let row = row.saturating_sub(pattern.height / 2);
        let col = col.saturating_sub(pattern.width / 2);
        session.place_pattern(pattern, row, col)
    });
    if let Err(err) = placed {
        log::debug!("{} not placed: {err}", pattern.name);
    }
}
