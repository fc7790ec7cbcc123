//! Decision loop for the autonomous agent.
//! This module exists to own the agent's mode, pending route and move pacing.
//! It does not own hazard timing or round-ending rules.

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::config::RulesConfig;
use crate::error::PlanError;
use crate::grid::Grid;
use crate::hazard::{HazardState, check_danger_radius};
use crate::movement::{MoveOutcome, relocate};
use crate::pathfinding::{attack_search, defend_search};
use crate::types::{Agent, Cell, EnemyStep, Mode, Pos};

/// True when a device shares `pos` or sits within `radius` along an unwalled ray.
pub fn device_in_scan_range(grid: &Grid, hazards: &HazardState, pos: Pos, radius: u32) -> bool {
    hazards.has_device_at(pos) || check_danger_radius(grid, pos, radius)
}

#[derive(Clone, Debug)]
pub struct EnemyBrain {
    mode: Mode,
    route: VecDeque<Pos>,
    last_move_ms: Option<u64>,
    move_interval_ms: u64,
    danger_radius: u32,
    scan_radius: u32,
}

impl EnemyBrain {
    pub fn new(rules: &RulesConfig) -> Self {
        Self {
            mode: Mode::Attack,
            route: VecDeque::new(),
            last_move_ms: None,
            move_interval_ms: rules.enemy_move_interval_ms,
            danger_radius: rules.danger_radius,
            scan_radius: rules.proximity_scan_radius,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn route(&self) -> &VecDeque<Pos> {
        &self.route
    }

    pub fn last_move_ms(&self) -> Option<u64> {
        self.last_move_ms
    }

    pub fn reset(&mut self) {
        self.mode = Mode::Attack;
        self.route.clear();
        self.last_move_ms = None;
    }

    fn ready(&self, now_ms: u64) -> bool {
        self.last_move_ms
            .is_none_or(|last| now_ms.saturating_sub(last) >= self.move_interval_ms)
    }

    fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            debug!(from = ?self.mode, to = ?mode, "enemy mode changed");
            self.mode = mode;
        }
    }

    /// One paced decision: scan, plan when needed, take one step.
    pub fn tick(
        &mut self,
        grid: &mut Grid,
        hazards: &mut HazardState,
        enemy: &mut Agent,
        opponent_pos: Pos,
        now_ms: u64,
    ) -> EnemyStep {
        if !self.ready(now_ms) {
            return EnemyStep::Idle;
        }

        let threatened = device_in_scan_range(grid, hazards, enemy.pos, self.scan_radius);
        if threatened {
            self.set_mode(Mode::Defend);
        }
        if self.route.is_empty() || threatened {
            self.replan(grid, hazards, enemy, opponent_pos);
        }

        let Some(next) = self.next_open_step(grid, hazards, enemy, opponent_pos) else {
            return EnemyStep::Idle;
        };

        match relocate(grid, hazards, enemy, opponent_pos, next) {
            MoveOutcome::Stayed => EnemyStep::Idle,
            MoveOutcome::Burned { at } => {
                self.last_move_ms = Some(now_ms);
                EnemyStep::Burned { at }
            }
            MoveOutcome::Moved { from, to } => {
                self.last_move_ms = Some(now_ms);
                if self.route.is_empty() {
                    self.finish_route(grid, hazards, enemy, opponent_pos, now_ms);
                }
                EnemyStep::Moved { from, to }
            }
        }
    }

    fn finish_route(
        &mut self,
        grid: &mut Grid,
        hazards: &mut HazardState,
        enemy: &mut Agent,
        opponent_pos: Pos,
        now_ms: u64,
    ) {
        match self.mode {
            Mode::Defend => self.set_mode(Mode::Attack),
            Mode::Attack => {
                hazards.place_device(grid, enemy, now_ms);
                self.set_mode(Mode::Defend);
            }
        }
        self.replan(grid, hazards, enemy, opponent_pos);
    }

    /// Pops the next step, replanning once if it has been walled or armed since planning.
    fn next_open_step(
        &mut self,
        grid: &Grid,
        hazards: &HazardState,
        enemy: &Agent,
        opponent_pos: Pos,
    ) -> Option<Pos> {
        let next = self.route.pop_front()?;
        if !blocks_step(grid.cell_at(next)) {
            return Some(next);
        }
        let stale = PlanError::StaleRouteStep { at: next };
        debug!(error = %stale, "replanning");
        self.replan(grid, hazards, enemy, opponent_pos);

        let retry = self.route.pop_front()?;
        if blocks_step(grid.cell_at(retry)) {
            let stale = PlanError::StaleRouteStep { at: retry };
            debug!(error = %stale, "skipping move");
            self.route.clear();
            return None;
        }
        Some(retry)
    }

    fn replan(&mut self, grid: &Grid, hazards: &HazardState, enemy: &Agent, opponent_pos: Pos) {
        self.route.clear();
        if self.mode == Mode::Defend {
            match defend_search(grid, hazards.devices(), enemy.pos, enemy.side.marker()) {
                Ok(route) if route.len() > 1 => {
                    self.route.extend(route.into_iter().skip(1));
                    return;
                }
                Ok(_) => {
                    debug!(pos = ?enemy.pos, "already outside every blast");
                    self.set_mode(Mode::Attack);
                }
                Err(error) => {
                    warn!(%error, "no safe cell reachable");
                    return;
                }
            }
        }
        let route = attack_search(grid, enemy.pos, opponent_pos, self.danger_radius);
        self.route.extend(route.into_iter().skip(1));
    }
}

fn blocks_step(cell: Cell) -> bool {
    matches!(cell, Cell::Wall | Cell::Device)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use crate::types::AgentSide;

    struct Fixture {
        grid: Grid,
        hazards: HazardState,
        brain: EnemyBrain,
        enemy: Agent,
        player: Pos,
    }

    fn fixture(rows: &[&str], enemy: Pos, player: Pos) -> Fixture {
        let rules = RulesConfig::default();
        Fixture {
            grid: grid_from(rows),
            hazards: HazardState::new(&rules),
            brain: EnemyBrain::new(&rules),
            enemy: Agent::new(AgentSide::Autonomous, enemy, rules.starting_devices),
            player,
        }
    }

    impl Fixture {
        fn tick(&mut self, now_ms: u64) -> EnemyStep {
            self.brain.tick(&mut self.grid, &mut self.hazards, &mut self.enemy, self.player, now_ms)
        }
    }

    #[test]
    fn moves_toward_the_player_at_the_configured_pace() {
        let mut f = fixture(&["C....", ".....", ".....", ".....", "....A"], Pos::new(4, 4), Pos::new(0, 0));

        let step = f.tick(0);
        let EnemyStep::Moved { from, to } = step else {
            panic!("expected a move, got {step:?}");
        };
        assert_eq!(from, Pos::new(4, 4));
        assert_eq!(to.manhattan(Pos::new(0, 0)), 7);
        assert_eq!(f.grid.cell_at(from), Cell::Empty);
        assert_eq!(f.grid.cell_at(to), Cell::AutonomousAgent);

        assert_eq!(f.tick(100), EnemyStep::Idle);
        assert!(matches!(f.tick(250), EnemyStep::Moved { .. }));
    }

    #[test]
    fn scan_stops_at_walls() {
        let rules = RulesConfig::default();
        let hazards = HazardState::new(&rules);
        let mut grid = Grid::new(7);
        grid.set_cell(Pos::new(3, 0), Cell::Device);

        assert!(device_in_scan_range(&grid, &hazards, Pos::new(3, 4), 4));
        assert!(!device_in_scan_range(&grid, &hazards, Pos::new(3, 5), 4));
        grid.set_cell(Pos::new(3, 2), Cell::Wall);
        assert!(!device_in_scan_range(&grid, &hazards, Pos::new(3, 4), 4));
    }

    #[test]
    fn reaching_the_player_arms_a_device_and_retreats() {
        let mut f = fixture(&["CA.", "...", "..."], Pos::new(1, 0), Pos::new(0, 0));

        assert_eq!(
            f.tick(0),
            EnemyStep::Moved { from: Pos::new(1, 0), to: Pos::new(0, 0) }
        );
        assert_eq!(f.brain.mode(), Mode::Defend);
        assert_eq!(f.enemy.devices_available, 3);
        assert!(f.hazards.has_device_at(Pos::new(0, 0)));
        assert_eq!(f.grid.cell_at(Pos::new(0, 0)), Cell::Device);
        assert_eq!(f.brain.route().back(), Some(&Pos::new(1, 1)));

        let step = f.tick(250);
        assert!(matches!(step, EnemyStep::Moved { from, .. } if from == Pos::new(0, 0)));
        assert_eq!(f.grid.cell_at(Pos::new(0, 0)), Cell::Device, "vacated device stays visible");
    }

    #[test]
    fn walled_step_triggers_one_replan() {
        let mut f = fixture(&["A..", "...", "..C"], Pos::new(0, 0), Pos::new(2, 2));
        f.brain.route = VecDeque::from([Pos::new(1, 0), Pos::new(2, 0)]);
        f.grid.set_cell(Pos::new(1, 0), Cell::Wall);

        assert_eq!(
            f.tick(0),
            EnemyStep::Moved { from: Pos::new(0, 0), to: Pos::new(0, 1) }
        );
    }

    #[test]
    fn finished_defend_route_returns_to_attack() {
        let mut f = fixture(&["A..", "...", "..C"], Pos::new(0, 0), Pos::new(2, 2));
        f.brain.mode = Mode::Defend;
        f.brain.route = VecDeque::from([Pos::new(1, 0)]);

        assert!(matches!(f.tick(0), EnemyStep::Moved { .. }));

        assert_eq!(f.brain.mode(), Mode::Attack);
        assert_eq!(f.brain.route().back(), Some(&Pos::new(2, 2)));
    }

    #[test]
    fn safe_defender_resumes_attack_in_the_same_tick() {
        let mut f = fixture(&["....C", ".....", ".....", ".....", "....A"], Pos::new(4, 4), Pos::new(4, 0));
        f.hazards.place_device(&mut f.grid, &mut Agent::new(AgentSide::Controlled, Pos::new(0, 0), 1), 0);
        f.brain.mode = Mode::Defend;

        assert_eq!(
            f.tick(0),
            EnemyStep::Moved { from: Pos::new(4, 4), to: Pos::new(4, 3) }
        );
        assert_eq!(f.brain.mode(), Mode::Attack);
    }

    #[test]
    fn sealed_defender_stays_put() {
        let mut f = fixture(&["A#...", "#....", ".....", ".....", "....C"], Pos::new(0, 0), Pos::new(4, 4));
        f.hazards.place_device(&mut f.grid, &mut f.enemy, 0);

        assert_eq!(f.tick(0), EnemyStep::Idle);
        assert_eq!(f.brain.mode(), Mode::Defend);
        assert!(f.brain.route().is_empty());
        assert_eq!(f.brain.last_move_ms(), None);
    }
}
