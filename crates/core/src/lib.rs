pub mod config;
pub mod enemy;
pub mod error;
pub mod grid;
pub mod hazard;
pub mod journal;
pub mod movement;
pub mod pathfinding;
pub mod replay;
pub mod round;
pub mod types;

#[cfg(test)]
mod test_support;

pub use config::RulesConfig;
pub use error::{PlanError, RulesError};
pub use grid::{Grid, build_grid};
pub use hazard::{DetonationReport, HazardState};
pub use journal::{InputJournal, InputRecord};
pub use replay::*;
pub use round::Round;
pub use types::*;
