use maze_core::{AgentSide, Cell, ControlRequest, Direction, Round, RulesConfig};
use proptest::{
    arbitrary::any,
    test_runner::{Config as ProptestConfig, TestCaseError, TestRunner},
};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

fn choose<T: Copy>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    slice[rng.next_u64() as usize % slice.len()]
}

fn check_invariants(round: &Round) -> Result<(), String> {
    let grid = round.grid();
    let starting = round.rules().starting_devices;
    for side in [AgentSide::Controlled, AgentSide::Autonomous] {
        let agent = round.agent(side);
        if !grid.in_bounds(agent.pos) || grid.cell_at(agent.pos) == Cell::Wall {
            return Err(format!("{side:?} stands on {:?} at {:?}", grid.cell_at(agent.pos), agent.pos));
        }
        if agent.devices_available > starting {
            return Err(format!("{side:?} holds {} devices, above {starting}", agent.devices_available));
        }
        let live = round.hazards().devices().iter().filter(|(_, d)| d.owner == side).count() as u32;
        if agent.devices_available + live != starting {
            return Err(format!("{side:?} holds {} with {live} live devices", agent.devices_available));
        }
    }
    for pos in grid.positions() {
        let burning = grid.cell_at(pos) == Cell::Fire;
        if burning != (round.hazards().overlap().get(pos) > 0) {
            return Err(format!("fire and overlap disagree at {pos:?}"));
        }
    }
    Ok(())
}

fn run_fuzz_simulation(seed: u64, input_seed: u64, max_ticks: u32) -> Result<u32, String> {
    let mut round = Round::new(seed, RulesConfig::default()).map_err(|error| error.to_string())?;
    let mut rng = ChaCha8Rng::seed_from_u64(input_seed);
    let requests = [
        ControlRequest::Move(Direction::Up),
        ControlRequest::Move(Direction::Down),
        ControlRequest::Move(Direction::Left),
        ControlRequest::Move(Direction::Right),
        ControlRequest::PlaceDevice,
    ];
    let mut rounds_finished = 0;

    for _ in 0..max_ticks {
        if rng.next_u64() % 3 == 0 {
            round.queue_control(choose(&mut rng, &requests));
        }
        if round.tick().is_some() {
            rounds_finished += 1;
            round.reset();
        }
        check_invariants(&round)
            .map_err(|reason| format!("seed {seed}, tick {}: {reason}", round.current_tick()))?;
    }
    Ok(rounds_finished)
}

#[test]
fn random_play_keeps_round_invariants() {
    let mut runner = TestRunner::new(ProptestConfig {
        cases: 48,
        failure_persistence: None,
        ..ProptestConfig::default()
    });
    runner
        .run(&(any::<u64>(), any::<u64>()), |(seed, input_seed)| {
            run_fuzz_simulation(seed, input_seed, 1_500).map(|_| ()).map_err(TestCaseError::fail)
        })
        .expect("invariants hold under random play");
}
