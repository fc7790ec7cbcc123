//! Deterministic A* planners for the autonomous agent.
//! This module exists so the attack and defend policies share one search core.
//! It does not own route consumption or mode switching.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::PlanError;
use crate::grid::Grid;
use crate::hazard::{DeviceQueue, check_danger_radius, preview_all_detonations};
use crate::types::{Cell, Direction, Pos};

/// Open-set key. `seq` keeps insertion order among equal `f`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct OpenNode {
    f: u32,
    seq: u64,
    y: i32,
    x: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SearchEnd {
    Goal(Pos),
    Exhausted { closest: Pos },
}

fn search(
    start: Pos,
    heuristic: impl Fn(Pos) -> u32,
    is_goal: impl Fn(Pos) -> bool,
    step_cost: impl Fn(Pos) -> Option<u32>,
) -> (BTreeMap<Pos, Pos>, SearchEnd) {
    let mut open_set = BTreeSet::new();
    let mut closed = BTreeSet::new();
    let mut g_score = BTreeMap::new();
    let mut came_from = BTreeMap::new();
    let mut seq = 0_u64;

    let start_h = heuristic(start);
    open_set.insert(OpenNode { f: start_h, seq, y: start.y, x: start.x });
    g_score.insert(start, 0_u32);
    let mut closest = (start_h, start);

    while let Some(node) = open_set.pop_first() {
        let current = Pos { y: node.y, x: node.x };
        if !closed.insert(current) {
            continue;
        }
        let h = heuristic(current);
        if h < closest.0 {
            closest = (h, current);
        }
        if is_goal(current) {
            return (came_from, SearchEnd::Goal(current));
        }

        let current_g = g_score.get(&current).copied().unwrap_or(0);
        for direction in Direction::ALL {
            let next = current.step(direction, 1);
            if closed.contains(&next) {
                continue;
            }
            let Some(cost) = step_cost(next) else {
                continue;
            };
            let tentative = current_g + cost;
            if tentative < g_score.get(&next).copied().unwrap_or(u32::MAX) {
                came_from.insert(next, current);
                g_score.insert(next, tentative);
                seq += 1;
                open_set.insert(OpenNode { f: tentative + heuristic(next), seq, y: next.y, x: next.x });
            }
        }
    }

    (came_from, SearchEnd::Exhausted { closest: closest.1 })
}

/// Start-inclusive route ending at `end`.
fn reconstruct_route(came_from: &BTreeMap<Pos, Pos>, start: Pos, end: Pos) -> Vec<Pos> {
    let mut route = vec![end];
    let mut current = end;
    while current != start {
        let Some(previous) = came_from.get(&current) else {
            break;
        };
        current = *previous;
        route.push(current);
    }
    route.reverse();
    route
}

/// Route toward `goal` that never enters the danger radius of a device.
///
/// When the goal is unreachable the route ends at the expanded cell nearest to it.
pub fn attack_search(grid: &Grid, start: Pos, goal: Pos, danger_radius: u32) -> Vec<Pos> {
    let viable = |pos: Pos| {
        grid.in_bounds(pos)
            && (pos == start || !matches!(grid.cell_at(pos), Cell::Device | Cell::Wall | Cell::Fire))
            && !check_danger_radius(grid, pos, danger_radius)
    };
    let (came_from, end) = search(
        start,
        |pos| pos.distance_sq(goal),
        |pos| pos == goal,
        |pos| viable(pos).then_some(1),
    );
    let end = match end {
        SearchEnd::Goal(pos) => pos,
        SearchEnd::Exhausted { closest } => closest,
    };
    reconstruct_route(&came_from, start, end)
}

/// Route to the nearest cell that survives every live device going off.
///
/// Plans on the blast preview; walking through fire costs double.
pub fn defend_search(
    grid: &Grid,
    devices: &DeviceQueue,
    start: Pos,
    own_marker: Cell,
) -> Result<Vec<Pos>, PlanError> {
    let preview = preview_all_detonations(grid, devices);
    let is_haven = |pos: Pos| {
        let cell = preview.cell_at(pos);
        cell == Cell::Empty || cell == own_marker
    };
    let step_cost = |pos: Pos| match preview.cell_at(pos) {
        _ if !preview.in_bounds(pos) => None,
        Cell::Wall => None,
        Cell::Fire => Some(2),
        _ => Some(1),
    };
    match search(start, |pos| pos.distance_sq(start), is_haven, step_cost) {
        (came_from, SearchEnd::Goal(haven)) => Ok(reconstruct_route(&came_from, start, haven)),
        (_, SearchEnd::Exhausted { .. }) => Err(PlanError::PlanningExhausted { from: start }),
    }
}
