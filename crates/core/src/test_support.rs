//! Shared fixtures for the core unit test suites.
//! This module exists to avoid repeating grid and device setup across tests.
//! It does not own production simulation logic.

use crate::grid::Grid;
use crate::hazard::{Device, DeviceQueue};
use crate::types::{AgentSide, Cell, DeviceId, Pos};

pub(crate) fn grid_from(rows: &[&str]) -> Grid {
    Grid::parse(rows).expect("fixture rows must be square and use known glyphs")
}

pub(crate) fn device_at(pos: Pos, fuse_deadline_ms: u64) -> Device {
    Device {
        owner: AgentSide::Controlled,
        pos,
        placed_at_ms: 0,
        fuse_deadline_ms,
        radius: 2,
    }
}

/// Queues a far-future device on `pos` and marks the cell.
pub(crate) fn arm(grid: &mut Grid, devices: &mut DeviceQueue, pos: Pos) -> DeviceId {
    grid.set_cell(pos, Cell::Device);
    devices.push(device_at(pos, u64::MAX))
}
