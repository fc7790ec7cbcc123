//! Keyboard input collection for one rendered frame.

use macroquad::prelude::{KeyCode, is_key_pressed};

const ACTION_KEYS: [KeyCode; 11] = [
    KeyCode::W,
    KeyCode::A,
    KeyCode::S,
    KeyCode::D,
    KeyCode::Up,
    KeyCode::Down,
    KeyCode::Left,
    KeyCode::Right,
    KeyCode::F,
    KeyCode::Space,
    KeyCode::P,
];

#[derive(Default)]
pub struct FrameInput {
    pub keys_pressed: Vec<KeyCode>,
    pub quit: bool,
}

pub fn capture_frame_input() -> FrameInput {
    let keys_pressed = ACTION_KEYS.into_iter().filter(|key| is_key_pressed(*key)).collect();
    FrameInput { keys_pressed, quit: is_key_pressed(KeyCode::Escape) }
}
