use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct DeviceId;
}

/// Grid coordinate: `x` is the column, `y` the row, both zero-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { y, x }
    }

    pub fn step(self, direction: Direction, distance: i32) -> Self {
        let (dx, dy) = direction.delta();
        Self { y: self.y + dy * distance, x: self.x + dx * distance }
    }

    pub fn manhattan(self, other: Pos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Squared Euclidean distance; the search heuristic.
    pub fn distance_sq(self, other: Pos) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        dx * dx + dy * dy
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Wall,
    ControlledAgent,
    AutonomousAgent,
    Device,
    Fire,
}

impl Cell {
    /// Stable byte used for snapshot hashing.
    pub fn code(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Wall => 1,
            Cell::ControlledAgent => 2,
            Cell::AutonomousAgent => 3,
            Cell::Device => 4,
            Cell::Fire => 5,
        }
    }

    pub fn is_agent(self) -> bool {
        matches!(self, Cell::ControlledAgent | Cell::AutonomousAgent)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgentSide {
    Controlled,
    Autonomous,
}

impl AgentSide {
    pub fn marker(self) -> Cell {
        match self {
            AgentSide::Controlled => Cell::ControlledAgent,
            AgentSide::Autonomous => Cell::AutonomousAgent,
        }
    }

    pub fn opponent(self) -> AgentSide {
        match self {
            AgentSide::Controlled => AgentSide::Autonomous,
            AgentSide::Autonomous => AgentSide::Controlled,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Expansion order shared by every ray walk and search in the crate.
    pub const ALL: [Direction; 4] =
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Agent inventory and placement on the grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Agent {
    pub side: AgentSide,
    pub pos: Pos,
    pub devices_available: u32,
}

impl Agent {
    pub fn new(side: AgentSide, pos: Pos, devices_available: u32) -> Self {
        Self { side, pos, devices_available }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    Attack,
    Defend,
}

/// Discrete requests produced by the input collaborator for the controlled agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlRequest {
    Move(Direction),
    PlaceDevice,
}

/// Round-ending signals surfaced to the reset/score collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundEvent {
    HazardContact { victim: AgentSide },
}

impl RoundEvent {
    pub fn winner(self) -> AgentSide {
        match self {
            RoundEvent::HazardContact { victim } => victim.opponent(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyStep {
    Idle,
    Moved { from: Pos, to: Pos },
    Burned { at: Pos },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdvanceStopReason {
    RoundOver(RoundEvent),
    BudgetExhausted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdvanceResult {
    pub simulated_ticks: u32,
    pub stop_reason: AdvanceStopReason,
}
