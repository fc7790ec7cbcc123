use app::app_loop::{AppMode, AppState, MAX_TICKS_PER_FRAME};
use macroquad::prelude::KeyCode;
use maze_core::{AgentSide, Cell, Pos, Round, RulesConfig};

const FRAME: f32 = 1.0 / 30.0;

fn open_round() -> Round {
    let rules = RulesConfig { grid_size: 6, wall_percentage: 0, ..RulesConfig::default() };
    Round::new(11, rules).expect("open rules are valid")
}

#[test]
fn movement_keys_reach_the_round_on_the_next_tick() {
    let mut round = open_round();
    let mut app = AppState::new();

    let ticks = app.tick(&mut round, &[KeyCode::D], FRAME * 1.5);

    assert_eq!(ticks, 1);
    assert_eq!(round.agent(AgentSide::Controlled).pos, Pos::new(1, 0));
    assert_eq!(round.grid().cell_at(Pos::new(1, 0)), Cell::ControlledAgent);
}

#[test]
fn short_frames_accumulate_into_ticks() {
    let mut round = open_round();
    let mut app = AppState::new();

    assert_eq!(app.tick(&mut round, &[], FRAME * 0.5), 0);
    assert_eq!(app.tick(&mut round, &[], FRAME * 0.6), 1);
    assert_eq!(round.current_tick(), 1);
}

#[test]
fn long_stalls_are_capped() {
    let mut round = open_round();
    let mut app = AppState::new();

    assert_eq!(app.tick(&mut round, &[], 5.0), MAX_TICKS_PER_FRAME);
    assert_eq!(app.tick(&mut round, &[], 0.0), 0, "backlog is dropped");
}

#[test]
fn pause_freezes_the_round_and_ignores_moves() {
    let mut round = open_round();
    let mut app = AppState::new();

    app.tick(&mut round, &[KeyCode::P], FRAME);
    assert_eq!(app.mode, AppMode::Paused);
    app.tick(&mut round, &[KeyCode::Right], 1.0);
    assert_eq!(round.current_tick(), 0);
    assert_eq!(round.agent(AgentSide::Controlled).pos, Pos::new(0, 0));

    app.tick(&mut round, &[KeyCode::P], FRAME * 1.5);
    assert_eq!(app.mode, AppMode::Running);
    assert_eq!(round.current_tick(), 1);
}

#[test]
fn own_blast_credits_the_enemy_and_starts_a_new_round() {
    let mut round = open_round();
    let mut app = AppState::new();

    app.tick(&mut round, &[KeyCode::Space], FRAME * 1.5);
    for _ in 0..200 {
        app.tick(&mut round, &[], FRAME);
        if app.last_event.is_some() {
            break;
        }
    }

    assert_eq!(app.scoreboard.enemy, 1);
    assert_eq!(app.scoreboard.player, 0);
    assert_eq!(round.round_index(), 1);
    assert_eq!(round.current_tick(), 0);
    assert_eq!(round.outcome(), None);
    assert_eq!(round.agent(AgentSide::Controlled).devices_available, 4);
}
