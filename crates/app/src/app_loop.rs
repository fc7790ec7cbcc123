use macroquad::prelude::KeyCode;
use maze_core::{AgentSide, ControlRequest, Direction, Round, RoundEvent};
use tracing::info;

/// Upper bound on fixed steps per frame; a longer stall drops the backlog.
pub const MAX_TICKS_PER_FRAME: u32 = 8;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Scoreboard {
    pub player: u32,
    pub enemy: u32,
}

impl Scoreboard {
    pub fn credit(&mut self, winner: AgentSide) {
        match winner {
            AgentSide::Controlled => self.player += 1,
            AgentSide::Autonomous => self.enemy += 1,
        }
    }

    pub fn line(&self) -> String {
        format!("Scoreboard: Player {} - {} Enemy", self.player, self.enemy)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AppMode {
    #[default]
    Running,
    Paused,
}

#[derive(Debug, Default)]
pub struct AppState {
    pub mode: AppMode,
    pub scoreboard: Scoreboard,
    pub last_event: Option<RoundEvent>,
    accumulator_ms: f64,
}

pub fn control_for_key(key: KeyCode) -> Option<ControlRequest> {
    match key {
        KeyCode::W | KeyCode::Up => Some(ControlRequest::Move(Direction::Up)),
        KeyCode::S | KeyCode::Down => Some(ControlRequest::Move(Direction::Down)),
        KeyCode::A | KeyCode::Left => Some(ControlRequest::Move(Direction::Left)),
        KeyCode::D | KeyCode::Right => Some(ControlRequest::Move(Direction::Right)),
        KeyCode::F | KeyCode::Space => Some(ControlRequest::PlaceDevice),
        _ => None,
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles one rendered frame: queue key requests, then run the fixed-step clock.
    /// Returns how many ticks were simulated.
    pub fn tick(&mut self, round: &mut Round, keys_pressed: &[KeyCode], dt_seconds: f32) -> u32 {
        if keys_pressed.contains(&KeyCode::P) {
            self.mode = match self.mode {
                AppMode::Running => AppMode::Paused,
                AppMode::Paused => AppMode::Running,
            };
        }
        if self.mode == AppMode::Paused {
            self.accumulator_ms = 0.0;
            return 0;
        }

        for request in keys_pressed.iter().copied().filter_map(control_for_key) {
            round.queue_control(request);
        }

        let step_ms = 1_000.0 / f64::from(round.rules().ticks_per_second);
        self.accumulator_ms += f64::from(dt_seconds.max(0.0)) * 1_000.0;
        let mut ticks = 0;
        while self.accumulator_ms >= step_ms && ticks < MAX_TICKS_PER_FRAME {
            self.accumulator_ms -= step_ms;
            ticks += 1;
            if let Some(event) = round.tick() {
                self.finish_round(round, event);
                break;
            }
        }
        if ticks == MAX_TICKS_PER_FRAME {
            self.accumulator_ms = 0.0;
        }
        ticks
    }

    fn finish_round(&mut self, round: &mut Round, event: RoundEvent) {
        let winner = event.winner();
        self.scoreboard.credit(winner);
        self.last_event = Some(event);
        self.accumulator_ms = 0.0;
        info!(?winner, score = %self.scoreboard.line(), "round finished");
        round.reset();
    }
}
