//! Rendering for the grid and the status panel.

use app::app_loop::{AppMode, AppState};
use app::{format_snapshot_hash, outcome_line};
use maze_core::{AgentSide, Cell, Pos, Round};
use macroquad::prelude::*;

const BORDER_COLOR: Color = Color { r: 0.2, g: 0.2, b: 0.2, a: 1.0 };
const PANEL_PAD: f32 = 16.0;
const STATUS_PANEL_HEIGHT: f32 = 150.0;
const STATUS_FONT_SIZE: f32 = 20.0;
const STATUS_LINE_STEP: f32 = 22.0;
const MIN_CELL_SIZE: f32 = 4.0;

pub fn cell_glyph(cell: Cell) -> (&'static str, Color) {
    match cell {
        Cell::Empty => (".", DARKGRAY),
        Cell::Wall => ("#", GRAY),
        Cell::ControlledAgent => ("@", GREEN),
        Cell::AutonomousAgent => ("E", RED),
        Cell::Device => ("o", YELLOW),
        Cell::Fire => ("*", ORANGE),
    }
}

/// Square cell size that fits a `grid_size` board into the area above the status panel.
fn cell_size(grid_size: usize, width: f32, height: f32) -> f32 {
    let board = (width - 2.0 * PANEL_PAD).min(height - STATUS_PANEL_HEIGHT - 2.0 * PANEL_PAD);
    (board / grid_size.max(1) as f32).floor().max(MIN_CELL_SIZE)
}

fn status_lines(round: &Round, app_state: &AppState) -> Vec<String> {
    let player = round.agent(AgentSide::Controlled);
    let enemy = round.agent(AgentSide::Autonomous);
    let mut lines = vec![
        app_state.scoreboard.line(),
        format!("Round {}  tick {}  {} ms", round.round_index() + 1, round.current_tick(), round.now_ms()),
        format!(
            "Devices: player {}  enemy {}  |  enemy {:?}",
            player.devices_available,
            enemy.devices_available,
            round.enemy_mode()
        ),
        format!("Seed {}  hash {}", round.seed(), format_snapshot_hash(round.snapshot_hash())),
    ];
    match (app_state.mode, app_state.last_event) {
        (AppMode::Paused, _) => lines.push("Paused. [P] to resume".to_string()),
        (AppMode::Running, Some(event)) => lines.push(outcome_line(event)),
        (AppMode::Running, None) => lines.push("WASD/arrows move, F/Space arm, P pause".to_string()),
    }
    lines
}

pub fn draw_frame(round: &Round, app_state: &AppState) {
    let grid = round.grid();
    let size = cell_size(grid.size(), screen_width(), screen_height());
    let board = size * grid.size() as f32;
    draw_rectangle_lines(PANEL_PAD, PANEL_PAD, board, board, 1.0, BORDER_COLOR);

    for pos in grid.positions() {
        let (glyph, color) = cell_glyph(grid.cell_at(pos));
        let (x, y) = cell_origin(pos, size);
        draw_text(glyph, x + size * 0.25, y + size * 0.8, size, color);
    }

    let mut text_y = PANEL_PAD * 2.0 + board + STATUS_FONT_SIZE;
    for line in status_lines(round, app_state) {
        draw_text(&line, PANEL_PAD, text_y, STATUS_FONT_SIZE, WHITE);
        text_y += STATUS_LINE_STEP;
    }
}

fn cell_origin(pos: Pos, size: f32) -> (f32, f32) {
    (PANEL_PAD + pos.x as f32 * size, PANEL_PAD + pos.y as f32 * size)
}

#[cfg(test)]
mod tests;
