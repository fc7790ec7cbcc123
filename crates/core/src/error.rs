//! Error taxonomy for planning and round setup.

use thiserror::Error;

use crate::types::Pos;

/// Planning failures. Neither is fatal: the decision engine logs them and idles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("no safe cell reachable from {from:?}")]
    PlanningExhausted { from: Pos },

    #[error("route step {at:?} is no longer passable")]
    StaleRouteStep { at: Pos },
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RulesError {
    #[error("grid size {size} is too small, need at least {min}")]
    GridTooSmall { size: usize, min: usize },

    #[error("grid size {size} is above the maximum {max}")]
    GridTooLarge { size: usize, max: usize },

    #[error("wall percentage {0} exceeds 100")]
    WallPercentage(u8),

    #[error("ticks_per_second must be greater than zero")]
    ZeroTickRate,

    #[error("{field} must be greater than zero")]
    ZeroDuration { field: &'static str },
}
