//! Tuning constants for one round, loadable from TOML/JSON by the binaries.

use serde::{Deserialize, Serialize};

use crate::error::RulesError;

pub const MIN_GRID_SIZE: usize = 3;
pub const MAX_GRID_SIZE: usize = 1024;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub grid_size: usize,
    pub wall_percentage: u8,
    pub ticks_per_second: u32,
    pub fuse_ms: u64,
    pub fire_duration_ms: u64,
    pub blast_radius: u32,
    pub danger_radius: u32,
    pub proximity_scan_radius: u32,
    pub starting_devices: u32,
    pub enemy_move_interval_ms: u64,
    /// Zero applies every queued move request.
    pub controlled_move_interval_ms: u64,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            grid_size: 10,
            wall_percentage: 70,
            ticks_per_second: 30,
            fuse_ms: 3_000,
            fire_duration_ms: 500,
            blast_radius: 2,
            danger_radius: 2,
            proximity_scan_radius: 4,
            starting_devices: 4,
            enemy_move_interval_ms: 250,
            controlled_move_interval_ms: 0,
        }
    }
}

impl RulesConfig {
    pub fn validate(&self) -> Result<(), RulesError> {
        if self.grid_size < MIN_GRID_SIZE {
            return Err(RulesError::GridTooSmall { size: self.grid_size, min: MIN_GRID_SIZE });
        }
        if self.grid_size > MAX_GRID_SIZE {
            return Err(RulesError::GridTooLarge { size: self.grid_size, max: MAX_GRID_SIZE });
        }
        if self.wall_percentage > 100 {
            return Err(RulesError::WallPercentage(self.wall_percentage));
        }
        if self.ticks_per_second == 0 {
            return Err(RulesError::ZeroTickRate);
        }
        if self.fuse_ms == 0 {
            return Err(RulesError::ZeroDuration { field: "fuse_ms" });
        }
        if self.fire_duration_ms == 0 {
            return Err(RulesError::ZeroDuration { field: "fire_duration_ms" });
        }
        Ok(())
    }

    /// Simulated time at the end of `tick`, computed from the tick index to avoid drift.
    pub fn tick_time_ms(&self, tick: u64) -> u64 {
        tick * 1_000 / u64::from(self.ticks_per_second.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert_eq!(RulesConfig::default().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_degenerate_values() {
        let small = RulesConfig { grid_size: 2, ..RulesConfig::default() };
        assert_eq!(small.validate(), Err(RulesError::GridTooSmall { size: 2, min: 3 }));

        let walls = RulesConfig { wall_percentage: 101, ..RulesConfig::default() };
        assert_eq!(walls.validate(), Err(RulesError::WallPercentage(101)));

        let rate = RulesConfig { ticks_per_second: 0, ..RulesConfig::default() };
        assert_eq!(rate.validate(), Err(RulesError::ZeroTickRate));

        let fire = RulesConfig { fire_duration_ms: 0, ..RulesConfig::default() };
        assert_eq!(fire.validate(), Err(RulesError::ZeroDuration { field: "fire_duration_ms" }));
    }

    #[test]
    fn validate_caps_grid_size() {
        let largest = RulesConfig { grid_size: MAX_GRID_SIZE, ..RulesConfig::default() };
        assert_eq!(largest.validate(), Ok(()));

        let huge = RulesConfig { grid_size: 1 << 33, ..RulesConfig::default() };
        assert_eq!(huge.validate(), Err(RulesError::GridTooLarge { size: 1 << 33, max: 1024 }));
    }

    #[test]
    fn tick_time_does_not_drift() {
        let rules = RulesConfig::default();
        assert_eq!(rules.tick_time_ms(0), 0);
        assert_eq!(rules.tick_time_ms(1), 33);
        assert_eq!(rules.tick_time_ms(30), 1_000);
        assert_eq!(rules.tick_time_ms(90), 3_000);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let rules: RulesConfig =
            serde_json::from_str(r#"{ "grid_size": 12, "fuse_ms": 1500 }"#).expect("parse");
        assert_eq!(rules.grid_size, 12);
        assert_eq!(rules.fuse_ms, 1_500);
        assert_eq!(rules.blast_radius, 2);
    }
}
