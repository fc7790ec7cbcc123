//! Shared plumbing for the headless `replay` and `fuzz` binaries.
//! This module exists to keep file handling and invariant checks testable without a process.
//! It does not own any simulation rules.

use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result, ensure};
use maze_core::{AgentSide, Cell, ControlRequest, Direction, InputJournal, Round, RoundEvent, RulesConfig};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use tracing::{Level, debug, info};
use tracing_subscriber::EnvFilter;

const FUZZ_REQUESTS: [ControlRequest; 5] = [
    ControlRequest::Move(Direction::Up),
    ControlRequest::Move(Direction::Down),
    ControlRequest::Move(Direction::Left),
    ControlRequest::Move(Direction::Right),
    ControlRequest::PlaceDevice,
];

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_writer(io::stderr)
        .init();
}

/// Default rules, overridden field by field from a TOML file when one is given.
pub fn load_rules(path: Option<&Path>) -> Result<RulesConfig> {
    let Some(path) = path else {
        return Ok(RulesConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read rules file {}", path.display()))?;
    let rules: RulesConfig =
        toml::from_str(&text).with_context(|| format!("failed to parse rules file {}", path.display()))?;
    rules.validate().with_context(|| format!("rules file {} is invalid", path.display()))?;
    Ok(rules)
}

pub fn read_journal(path: &Path) -> Result<InputJournal> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read journal file {}", path.display()))?;
    InputJournal::from_json(&text).context("failed to deserialize journal JSON")
}

pub fn write_journal(path: &Path, journal: &InputJournal) -> Result<()> {
    let text = journal.to_json().context("failed to serialize journal")?;
    fs::write(path, text).with_context(|| format!("failed to write journal file {}", path.display()))
}

pub fn describe_outcome(outcome: Option<RoundEvent>) -> String {
    match outcome {
        Some(event @ RoundEvent::HazardContact { victim }) => {
            format!("{victim:?} burned, {:?} wins", event.winner())
        }
        None => "no contact before the tick budget".to_string(),
    }
}

/// Position, inventory and fire bookkeeping checks that must hold after every tick.
pub fn check_invariants(round: &Round) -> Result<()> {
    let grid = round.grid();
    let hazards = round.hazards();
    let starting = round.rules().starting_devices;
    for side in [AgentSide::Controlled, AgentSide::Autonomous] {
        let agent = round.agent(side);
        ensure!(grid.in_bounds(agent.pos), "{side:?} left the grid at {:?}", agent.pos);
        ensure!(grid.cell_at(agent.pos) != Cell::Wall, "{side:?} stands in a wall at {:?}", agent.pos);
        ensure!(
            agent.devices_available <= starting,
            "{side:?} holds {} devices, above the starting {starting}",
            agent.devices_available
        );
        let live = hazards.devices().iter().filter(|(_, device)| device.owner == side).count();
        ensure!(
            agent.devices_available as usize + live == starting as usize,
            "{side:?} holds {} devices with {live} live",
            agent.devices_available
        );
    }
    for pos in grid.positions() {
        let burning = grid.cell_at(pos) == Cell::Fire;
        let claimed = hazards.overlap().get(pos) > 0;
        ensure!(burning == claimed, "fire and overlap disagree at {pos:?}");
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FuzzSummary {
    pub ticks: u64,
    pub rounds_finished: u64,
}

/// Drives the controlled agent with seeded random requests for `ticks` ticks, resetting
/// after every finished round. The returned journal covers the first round only.
pub fn run_fuzz(seed: u64, ticks: u64, rules: RulesConfig) -> Result<(FuzzSummary, InputJournal)> {
    let mut round = Round::new(seed, rules.clone())?;
    let mut journal = InputJournal::new(seed, rules);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut summary = FuzzSummary::default();

    while summary.ticks < ticks {
        if rng.next_u64() % 3 == 0 {
            let request = FUZZ_REQUESTS[rng.next_u64() as usize % FUZZ_REQUESTS.len()];
            if summary.rounds_finished == 0 {
                journal.queue_and_record(&mut round, request);
            } else {
                round.queue_control(request);
            }
        }
        let event = round.tick();
        summary.ticks += 1;
        check_invariants(&round).with_context(|| {
            format!("seed {seed}, round {}, tick {}", round.round_index(), round.current_tick())
        })?;
        if let Some(event) = event {
            debug!(round = round.round_index(), outcome = %describe_outcome(Some(event)), "fuzz round ended");
            summary.rounds_finished += 1;
            round.reset();
        }
    }
    info!(seed, ticks = summary.ticks, rounds = summary.rounds_finished, "fuzz run clean");
    Ok((summary, journal))
}
