//! Device lifecycle, blast propagation and fire decay.
//! This module exists so every hazard rule the planners depend on lives in one place.
//! It only mutates grid cells; deciding who was caught in the fire is the round's job.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use slotmap::SlotMap;
use tracing::debug;

use crate::config::RulesConfig;
use crate::grid::Grid;
use crate::types::{Agent, AgentSide, Cell, DeviceId, Direction, Pos};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Device {
    pub owner: AgentSide,
    pub pos: Pos,
    pub placed_at_ms: u64,
    pub fuse_deadline_ms: u64,
    pub radius: u32,
}

impl Device {
    pub fn is_due(&self, now_ms: u64) -> bool {
        now_ms >= self.fuse_deadline_ms
    }
}

/// Live devices in placement (FIFO) order.
#[derive(Clone, Debug, Default)]
pub struct DeviceQueue {
    devices: SlotMap<DeviceId, Device>,
    order: VecDeque<DeviceId>,
}

impl DeviceQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, device: Device) -> DeviceId {
        let id = self.devices.insert(device);
        self.order.push_back(id);
        id
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, id: DeviceId) -> Option<&Device> {
        self.devices.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (DeviceId, &Device)> + '_ {
        self.order.iter().filter_map(|id| self.devices.get(*id).map(|device| (*id, device)))
    }

    pub fn device_at(&self, pos: Pos) -> Option<DeviceId> {
        self.iter().find(|(_, device)| device.pos == pos).map(|(id, _)| id)
    }

    /// Chain trigger: the oldest device on `pos` becomes due at `now_ms`.
    pub fn force_detonation_at(&mut self, pos: Pos, now_ms: u64) -> bool {
        let Some(id) = self.device_at(pos) else {
            return false;
        };
        let device = &mut self.devices[id];
        device.fuse_deadline_ms = device.fuse_deadline_ms.min(now_ms);
        true
    }

    /// Removes the oldest due device, wherever it sits in the queue.
    pub fn pop_next_due(&mut self, now_ms: u64) -> Option<(DeviceId, Device)> {
        let index = self
            .order
            .iter()
            .position(|id| self.devices.get(*id).is_some_and(|device| device.is_due(now_ms)))?;
        let id = self.order.remove(index)?;
        self.devices.remove(id).map(|device| (id, device))
    }

    pub fn clear(&mut self) {
        self.devices.clear();
        self.order.clear();
    }
}

/// Per-cell count of active explosions claiming the cell.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OverlapCounts {
    counts: BTreeMap<Pos, u32>,
}

impl OverlapCounts {
    pub fn claim(&mut self, pos: Pos) -> u32 {
        let count = self.counts.entry(pos).or_insert(0);
        *count += 1;
        *count
    }

    /// Returns the remaining count; releasing an unclaimed cell is a no-op returning 0.
    pub fn release(&mut self, pos: Pos) -> u32 {
        let Some(count) = self.counts.get_mut(&pos) else {
            return 0;
        };
        *count = count.saturating_sub(1);
        let remaining = *count;
        if remaining == 0 {
            self.counts.remove(&pos);
        }
        remaining
    }

    pub fn get(&self, pos: Pos) -> u32 {
        self.counts.get(&pos).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Pos, u32)> + '_ {
        self.counts.iter().map(|(pos, count)| (*pos, *count))
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveExplosion {
    pub started_at_ms: u64,
    pub cells: Vec<Pos>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Detonation {
    pub id: DeviceId,
    pub owner: AgentSide,
    pub pos: Pos,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DetonationReport {
    pub detonated: Vec<Detonation>,
    pub fire_cells: BTreeSet<Pos>,
}

/// True when a Device sits on `pos` or within `radius` cells along a cardinal ray.
/// Rays stop at walls, the same way blasts do.
pub fn check_danger_radius(grid: &Grid, pos: Pos, radius: u32) -> bool {
    if grid.cell_at(pos) == Cell::Device {
        return true;
    }
    for direction in Direction::ALL {
        for distance in 1..=radius as i32 {
            let probe = pos.step(direction, distance);
            if !grid.in_bounds(probe) {
                break;
            }
            match grid.cell_at(probe) {
                Cell::Device => return true,
                Cell::Wall => break,
                _ => {}
            }
        }
    }
    false
}

/// Writes one device's blast onto the grid and returns the resulting fire window.
///
/// Each ray stops before a wall and on (after igniting) another device, which is
/// chain-triggered so the running sweep picks it up. The origin always burns.
pub fn propagate_explosion(
    grid: &mut Grid,
    devices: &mut DeviceQueue,
    device: &Device,
    overlap: &mut OverlapCounts,
    now_ms: u64,
) -> ActiveExplosion {
    let mut cells = Vec::new();
    for direction in Direction::ALL {
        for distance in 1..=device.radius as i32 {
            let target = device.pos.step(direction, distance);
            if !grid.in_bounds(target) {
                break;
            }
            let cell = grid.cell_at(target);
            if cell == Cell::Wall {
                break;
            }
            cells.push(target);
            if cell == Cell::Device || devices.device_at(target).is_some() {
                devices.force_detonation_at(target, now_ms);
                break;
            }
        }
    }
    cells.push(device.pos);

    for &cell in &cells {
        grid.set_cell(cell, Cell::Fire);
        overlap.claim(cell);
    }
    ActiveExplosion { started_at_ms: now_ms, cells }
}

/// Detonates every due device, including ones chain-triggered during this sweep.
pub fn run_detonation_sweep(
    devices: &mut DeviceQueue,
    grid: &mut Grid,
    explosions: &mut Vec<ActiveExplosion>,
    overlap: &mut OverlapCounts,
    now_ms: u64,
) -> DetonationReport {
    let mut report = DetonationReport::default();
    while let Some((id, device)) = devices.pop_next_due(now_ms) {
        let explosion = propagate_explosion(grid, devices, &device, overlap, now_ms);
        debug!(
            owner = ?device.owner,
            pos = ?device.pos,
            cells = explosion.cells.len(),
            "device detonated"
        );
        report.fire_cells.extend(explosion.cells.iter().copied());
        report.detonated.push(Detonation { id, owner: device.owner, pos: device.pos });
        explosions.push(explosion);
    }
    report
}

/// Expires fire windows older than `fire_duration_ms`; returns how many expired.
pub fn advance_fire_phase(
    explosions: &mut Vec<ActiveExplosion>,
    overlap: &mut OverlapCounts,
    grid: &mut Grid,
    now_ms: u64,
    fire_duration_ms: u64,
) -> usize {
    let before = explosions.len();
    explosions.retain(|explosion| {
        if now_ms.saturating_sub(explosion.started_at_ms) < fire_duration_ms {
            return true;
        }
        for &cell in &explosion.cells {
            if overlap.release(cell) == 0 {
                grid.set_cell(cell, Cell::Empty);
            }
        }
        false
    });
    before - explosions.len()
}

/// Scratch copy of `grid` with every live device blown up, fuse state ignored.
pub fn preview_all_detonations(grid: &Grid, devices: &DeviceQueue) -> Grid {
    let mut scratch = grid.clone();
    let mut scratch_devices = devices.clone();
    let mut scratch_overlap = OverlapCounts::default();
    for (_, device) in devices.iter() {
        propagate_explosion(&mut scratch, &mut scratch_devices, device, &mut scratch_overlap, 0);
    }
    scratch
}

/// Hazard timeline for one round: live devices, fire windows and overlap counters.
#[derive(Clone, Debug)]
pub struct HazardState {
    devices: DeviceQueue,
    explosions: Vec<ActiveExplosion>,
    overlap: OverlapCounts,
    fuse_ms: u64,
    fire_duration_ms: u64,
    blast_radius: u32,
}

impl HazardState {
    pub fn new(rules: &RulesConfig) -> Self {
        Self {
            devices: DeviceQueue::new(),
            explosions: Vec::new(),
            overlap: OverlapCounts::default(),
            fuse_ms: rules.fuse_ms,
            fire_duration_ms: rules.fire_duration_ms,
            blast_radius: rules.blast_radius,
        }
    }

    pub fn devices(&self) -> &DeviceQueue {
        &self.devices
    }

    pub fn explosions(&self) -> &[ActiveExplosion] {
        &self.explosions
    }

    pub fn overlap(&self) -> &OverlapCounts {
        &self.overlap
    }

    pub fn has_device_at(&self, pos: Pos) -> bool {
        self.devices.device_at(pos).is_some()
    }

    /// Places a device under `agent`. Occupied cells and empty inventories are ignored.
    pub fn place_device(&mut self, grid: &mut Grid, agent: &mut Agent, now_ms: u64) -> Option<DeviceId> {
        if agent.devices_available == 0
            || grid.cell_at(agent.pos) == Cell::Device
            || self.has_device_at(agent.pos)
        {
            return None;
        }
        let id = self.devices.push(Device {
            owner: agent.side,
            pos: agent.pos,
            placed_at_ms: now_ms,
            fuse_deadline_ms: now_ms + self.fuse_ms,
            radius: self.blast_radius,
        });
        grid.set_cell(agent.pos, Cell::Device);
        agent.devices_available -= 1;
        debug!(owner = ?agent.side, pos = ?agent.pos, "device placed");
        Some(id)
    }

    pub fn detonate_due(&mut self, grid: &mut Grid, now_ms: u64) -> DetonationReport {
        run_detonation_sweep(
            &mut self.devices,
            grid,
            &mut self.explosions,
            &mut self.overlap,
            now_ms,
        )
    }

    pub fn advance_fire(&mut self, grid: &mut Grid, now_ms: u64) -> usize {
        advance_fire_phase(
            &mut self.explosions,
            &mut self.overlap,
            grid,
            now_ms,
            self.fire_duration_ms,
        )
    }

    pub fn preview(&self, grid: &Grid) -> Grid {
        preview_all_detonations(grid, &self.devices)
    }

    pub fn clear(&mut self) {
        self.devices.clear();
        self.explosions.clear();
        self.overlap.clear();
    }
}
