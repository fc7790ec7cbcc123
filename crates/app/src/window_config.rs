//! Window configuration for the desktop app.

use app::APP_NAME;
use macroquad::window::Conf;
use maze_core::RulesConfig;

const PREFERRED_CELL_PX: i32 = 56;
const BOARD_MARGIN_PX: i32 = 32;
const STATUS_PANEL_PX: i32 = 150;

/// Window sized so the default board fits at the preferred cell size above the status panel.
fn window_size_for(grid_size: usize) -> (i32, i32) {
    let board = PREFERRED_CELL_PX * i32::try_from(grid_size).unwrap_or(i32::MAX / PREFERRED_CELL_PX);
    (board + BOARD_MARGIN_PX, board + BOARD_MARGIN_PX + STATUS_PANEL_PX)
}

pub fn build_window_conf() -> Conf {
    let (window_width, window_height) = window_size_for(RulesConfig::default().grid_size);
    Conf {
        window_title: APP_NAME.to_owned(),
        window_width,
        window_height,
        high_dpi: true,
        window_resizable: true,
        ..Default::default()
    }
}
