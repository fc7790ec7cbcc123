//! Grid mutation for a single agent step.
//! This module exists so both agents leave and enter cells under the same rules.
//! It does not decide where an agent wants to go.

use crate::grid::Grid;
use crate::hazard::HazardState;
use crate::types::{Agent, Cell, Pos};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Stayed,
    Moved { from: Pos, to: Pos },
    Burned { at: Pos },
}

/// Destinations the controlled agent may step onto.
pub fn can_controlled_enter(grid: &Grid, to: Pos) -> bool {
    grid.in_bounds(to) && !matches!(grid.cell_at(to), Cell::Wall | Cell::Device)
}

/// Moves `mover` onto `to`.
///
/// The vacated cell shows a live device if one sits there, else the opponent if it
/// shares the cell, else Empty. Entering Fire reports a burn and leaves the fire intact;
/// otherwise the mover's marker is written unless the opponent already stands there.
pub fn relocate(
    grid: &mut Grid,
    hazards: &HazardState,
    mover: &mut Agent,
    opponent_pos: Pos,
    to: Pos,
) -> MoveOutcome {
    let from = mover.pos;
    if from == to {
        return MoveOutcome::Stayed;
    }

    let vacated = if hazards.has_device_at(from) {
        Cell::Device
    } else if opponent_pos == from {
        mover.side.opponent().marker()
    } else {
        Cell::Empty
    };
    grid.set_cell(from, vacated);
    mover.pos = to;

    if grid.cell_at(to) == Cell::Fire {
        return MoveOutcome::Burned { at: to };
    }
    if opponent_pos != to {
        grid.set_cell(to, mover.side.marker());
    }
    MoveOutcome::Moved { from, to }
}
