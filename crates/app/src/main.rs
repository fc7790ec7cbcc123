use app::app_loop::AppState;
use app::seed::{SessionSeed, clock_seed, session_seed};
use macroquad::prelude::*;
use maze_core::{Round, RulesConfig};
use std::{env, io};
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

mod frame_input;
mod ui_render;
mod window_config;

use frame_input::capture_frame_input;
use ui_render::draw_frame;
use window_config::build_window_conf;

#[macroquad::main(build_window_conf)]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_writer(io::stderr)
        .init();

    let seed = match session_seed(env::args(), clock_seed()) {
        Ok(seed) => seed,
        Err(message) => {
            error!(%message, "bad command line");
            return;
        }
    };
    if let SessionSeed::Clock(value) = seed {
        info!(seed = value, "no --seed given, using the clock");
    }

    let mut round = match Round::new(seed.value(), RulesConfig::default()) {
        Ok(round) => round,
        Err(error) => {
            error!(%error, "default rules rejected");
            return;
        }
    };
    let mut app_state = AppState::new();

    loop {
        let input = capture_frame_input();
        if input.quit {
            break;
        }
        app_state.tick(&mut round, &input.keys_pressed, get_frame_time());

        clear_background(BLACK);
        draw_frame(&round, &app_state);
        next_frame().await
    }
}
