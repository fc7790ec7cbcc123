use maze_core::{AgentSide, RoundEvent};

pub mod app_loop;
pub mod seed;

pub const APP_NAME: &str = "Maze Duel";

/// Format a snapshot hash as `0x` followed by exactly 16 lowercase hex digits.
pub fn format_snapshot_hash(hash: u64) -> String {
    format!("0x{hash:016x}")
}

pub fn side_label(side: AgentSide) -> &'static str {
    match side {
        AgentSide::Controlled => "Player",
        AgentSide::Autonomous => "Enemy",
    }
}

/// One-line banner for the previous round's ending.
pub fn outcome_line(event: RoundEvent) -> String {
    let RoundEvent::HazardContact { victim } = event;
    format!("{} was caught in the fire. {} wins.", side_label(victim), side_label(event.winner()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_snapshot_hash_is_16_hex_digits() {
        assert_eq!(format_snapshot_hash(0), "0x0000000000000000");
        assert_eq!(format_snapshot_hash(0xDEADBEEF), "0x00000000deadbeef");
        assert_eq!(format_snapshot_hash(u64::MAX), "0xffffffffffffffff");
    }

    #[test]
    fn outcome_line_names_victim_and_winner() {
        let line = outcome_line(RoundEvent::HazardContact { victim: AgentSide::Autonomous });
        assert_eq!(line, "Enemy was caught in the fire. Player wins.");
    }
}
