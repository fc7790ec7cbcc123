use std::collections::VecDeque;

use tracing::{debug, info};

use crate::config::RulesConfig;
use crate::enemy::EnemyBrain;
use crate::error::RulesError;
use crate::grid::{Grid, autonomous_spawn, build_grid, controlled_spawn};
use crate::hazard::{DetonationReport, HazardState};
use crate::movement::{MoveOutcome, can_controlled_enter, relocate};
use crate::types::*;

mod hash;

const ROUND_SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// One round of play: grid, both agents, the hazard timeline and the enemy's plan.
#[derive(Clone, Debug)]
pub struct Round {
    seed: u64,
    round_index: u64,
    rules: RulesConfig,
    tick: u64,
    grid: Grid,
    controlled: Agent,
    autonomous: Agent,
    brain: EnemyBrain,
    hazards: HazardState,
    pending: VecDeque<ControlRequest>,
    last_controlled_move_ms: Option<u64>,
    outcome: Option<RoundEvent>,
}

impl Round {
    pub fn new(seed: u64, rules: RulesConfig) -> Result<Self, RulesError> {
        rules.validate()?;
        let grid = build_grid(rules.grid_size, rules.wall_percentage, seed);
        Ok(Self {
            seed,
            round_index: 0,
            controlled: Agent::new(AgentSide::Controlled, controlled_spawn(), rules.starting_devices),
            autonomous: Agent::new(
                AgentSide::Autonomous,
                autonomous_spawn(rules.grid_size),
                rules.starting_devices,
            ),
            brain: EnemyBrain::new(&rules),
            hazards: HazardState::new(&rules),
            rules,
            tick: 0,
            grid,
            pending: VecDeque::new(),
            last_controlled_move_ms: None,
            outcome: None,
        })
    }

    /// Starts the next round on a fresh grid; devices, fire and routes are discarded.
    pub fn reset(&mut self) {
        self.round_index += 1;
        let grid_seed = self.seed ^ self.round_index.wrapping_mul(ROUND_SEED_STRIDE);
        self.grid = build_grid(self.rules.grid_size, self.rules.wall_percentage, grid_seed);
        self.controlled =
            Agent::new(AgentSide::Controlled, controlled_spawn(), self.rules.starting_devices);
        self.autonomous = Agent::new(
            AgentSide::Autonomous,
            autonomous_spawn(self.rules.grid_size),
            self.rules.starting_devices,
        );
        self.brain.reset();
        self.hazards.clear();
        self.pending.clear();
        self.last_controlled_move_ms = None;
        self.outcome = None;
        self.tick = 0;
        debug!(round = self.round_index, "round reset");
    }

    /// Buffers a request; it is applied at the start of the next tick.
    pub fn queue_control(&mut self, request: ControlRequest) {
        self.pending.push_back(request);
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn round_index(&self) -> u64 {
        self.round_index
    }

    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn now_ms(&self) -> u64 {
        self.rules.tick_time_ms(self.tick)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn agent(&self, side: AgentSide) -> &Agent {
        match side {
            AgentSide::Controlled => &self.controlled,
            AgentSide::Autonomous => &self.autonomous,
        }
    }

    pub fn enemy_mode(&self) -> Mode {
        self.brain.mode()
    }

    pub fn enemy_route(&self) -> impl Iterator<Item = Pos> + '_ {
        self.brain.route().iter().copied()
    }

    pub fn hazards(&self) -> &HazardState {
        &self.hazards
    }

    pub fn outcome(&self) -> Option<RoundEvent> {
        self.outcome
    }

    /// Runs one fixed step. Returns the round-ending event, if any; a finished round
    /// does not advance until [`Round::reset`].
    pub fn tick(&mut self) -> Option<RoundEvent> {
        if self.outcome.is_some() {
            return self.outcome;
        }
        self.tick += 1;
        let now_ms = self.now_ms();

        while let Some(request) = self.pending.pop_front() {
            if let Some(event) = self.apply_control(request, now_ms) {
                return Some(self.finish(event));
            }
        }

        let report = self.hazards.detonate_due(&mut self.grid, now_ms);
        self.credit_owners(&report);
        if let Some(event) = self.contact_check() {
            return Some(self.finish(event));
        }

        let step = self.brain.tick(
            &mut self.grid,
            &mut self.hazards,
            &mut self.autonomous,
            self.controlled.pos,
            now_ms,
        );
        if let EnemyStep::Burned { .. } = step {
            return Some(self.finish(RoundEvent::HazardContact { victim: AgentSide::Autonomous }));
        }

        self.hazards.advance_fire(&mut self.grid, now_ms);

        let event = self.contact_check()?;
        Some(self.finish(event))
    }

    /// The controlled agent is checked first when both stand in fire.
    fn contact_check(&self) -> Option<RoundEvent> {
        [AgentSide::Controlled, AgentSide::Autonomous]
            .into_iter()
            .find(|side| self.grid.cell_at(self.agent(*side).pos) == Cell::Fire)
            .map(|victim| RoundEvent::HazardContact { victim })
    }

    pub fn advance(&mut self, max_ticks: u32) -> AdvanceResult {
        let mut ticks = 0;
        while ticks < max_ticks {
            if let Some(event) = self.outcome {
                return AdvanceResult {
                    simulated_ticks: ticks,
                    stop_reason: AdvanceStopReason::RoundOver(event),
                };
            }
            self.tick();
            ticks += 1;
        }
        let stop_reason = match self.outcome {
            Some(event) => AdvanceStopReason::RoundOver(event),
            None => AdvanceStopReason::BudgetExhausted,
        };
        AdvanceResult { simulated_ticks: ticks, stop_reason }
    }

    fn apply_control(&mut self, request: ControlRequest, now_ms: u64) -> Option<RoundEvent> {
        match request {
            ControlRequest::PlaceDevice => {
                self.hazards.place_device(&mut self.grid, &mut self.controlled, now_ms);
                None
            }
            ControlRequest::Move(direction) => {
                let interval = self.rules.controlled_move_interval_ms;
                if interval > 0
                    && self
                        .last_controlled_move_ms
                        .is_some_and(|last| now_ms.saturating_sub(last) < interval)
                {
                    return None;
                }
                let to = self.controlled.pos.step(direction, 1);
                if !can_controlled_enter(&self.grid, to) {
                    return None;
                }
                match relocate(
                    &mut self.grid,
                    &self.hazards,
                    &mut self.controlled,
                    self.autonomous.pos,
                    to,
                ) {
                    MoveOutcome::Burned { .. } => {
                        Some(RoundEvent::HazardContact { victim: AgentSide::Controlled })
                    }
                    MoveOutcome::Moved { .. } => {
                        self.last_controlled_move_ms = Some(now_ms);
                        None
                    }
                    MoveOutcome::Stayed => None,
                }
            }
        }
    }

    fn credit_owners(&mut self, report: &DetonationReport) {
        for detonation in &report.detonated {
            let owner = match detonation.owner {
                AgentSide::Controlled => &mut self.controlled,
                AgentSide::Autonomous => &mut self.autonomous,
            };
            owner.devices_available = (owner.devices_available + 1).min(self.rules.starting_devices);
        }
    }

    fn finish(&mut self, event: RoundEvent) -> RoundEvent {
        let RoundEvent::HazardContact { victim } = event;
        info!(?victim, winner = ?event.winner(), tick = self.tick, "round over");
        self.outcome = Some(event);
        self.pending.clear();
        event
    }
}
