use super::{cell_glyph, cell_origin, cell_size, status_lines};
use app::app_loop::{AppMode, AppState};
use maze_core::{AgentSide, Cell, Pos, Round, RoundEvent, RulesConfig};
use macroquad::prelude::{GREEN, RED};

#[test]
fn every_cell_has_a_distinct_glyph() {
    let cells =
        [Cell::Empty, Cell::Wall, Cell::ControlledAgent, Cell::AutonomousAgent, Cell::Device, Cell::Fire];
    let mut glyphs: Vec<_> = cells.iter().map(|cell| cell_glyph(*cell).0).collect();
    glyphs.sort_unstable();
    glyphs.dedup();
    assert_eq!(glyphs.len(), cells.len());
    assert_eq!(cell_glyph(Cell::ControlledAgent), ("@", GREEN));
    assert_eq!(cell_glyph(Cell::AutonomousAgent), ("E", RED));
}

#[test]
fn cell_size_fits_the_tighter_dimension() {
    assert_eq!(cell_size(10, 720.0, 800.0), 61.0);
    assert_eq!(cell_size(10, 400.0, 2_000.0), 36.0);
    assert_eq!(cell_size(500, 100.0, 100.0), 4.0);
}

#[test]
fn cell_origin_is_offset_by_the_panel_padding() {
    assert_eq!(cell_origin(Pos::new(0, 0), 20.0), (16.0, 16.0));
    assert_eq!(cell_origin(Pos::new(3, 1), 20.0), (76.0, 36.0));
}

#[test]
fn status_panel_leads_with_the_scoreboard() {
    let round = Round::new(5, RulesConfig::default()).expect("default rules are valid");
    let mut app_state = AppState::new();
    app_state.scoreboard.credit(AgentSide::Controlled);

    let lines = status_lines(&round, &app_state);

    assert_eq!(lines[0], "Scoreboard: Player 1 - 0 Enemy");
    assert!(lines[1].starts_with("Round 1  tick 0"));
    assert!(lines[3].contains("0x"));
}

#[test]
fn status_panel_reports_pause_before_the_last_outcome() {
    let round = Round::new(5, RulesConfig::default()).expect("default rules are valid");
    let mut app_state = AppState::new();
    app_state.last_event = Some(RoundEvent::HazardContact { victim: AgentSide::Controlled });

    let running = status_lines(&round, &app_state);
    assert_eq!(running.last().map(String::as_str), Some("Player was caught in the fire. Enemy wins."));

    app_state.mode = AppMode::Paused;
    let paused = status_lines(&round, &app_state);
    assert!(paused.last().is_some_and(|line| line.starts_with("Paused")));
}
