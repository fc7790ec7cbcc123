//! Stable snapshot hashing for deterministic verification.
//! This module exists to keep hashing concerns separate from the tick loop.
//! It does not own replay execution or journal persistence.

use std::hash::Hasher;

use xxhash_rust::xxh3::Xxh3;

use super::*;

fn write_pos(hasher: &mut Xxh3, pos: Pos) {
    hasher.write_i32(pos.x);
    hasher.write_i32(pos.y);
}

impl Round {
    pub fn snapshot_hash(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write_u64(self.seed);
        hasher.write_u64(self.round_index);
        hasher.write_u64(self.tick);
        for cell in self.grid.cells() {
            hasher.write_u8(cell.code());
        }
        for agent in [&self.controlled, &self.autonomous] {
            write_pos(&mut hasher, agent.pos);
            hasher.write_u32(agent.devices_available);
        }
        hasher.write_u8(match self.brain.mode() {
            Mode::Attack => 0,
            Mode::Defend => 1,
        });
        hasher.write_usize(self.brain.route().len());
        for pos in self.brain.route() {
            write_pos(&mut hasher, *pos);
        }
        for (_, device) in self.hazards.devices().iter() {
            write_pos(&mut hasher, device.pos);
            hasher.write_u64(device.fuse_deadline_ms);
        }
        for (pos, count) in self.hazards.overlap().iter() {
            write_pos(&mut hasher, pos);
            hasher.write_u32(count);
        }
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_tracks_state_changes() {
        let rules = RulesConfig { wall_percentage: 0, ..RulesConfig::default() };
        let mut round = Round::new(5, rules.clone()).expect("valid rules");
        let twin = Round::new(5, rules).expect("valid rules");
        assert_eq!(round.snapshot_hash(), twin.snapshot_hash());

        round.queue_control(ControlRequest::PlaceDevice);
        round.tick();
        assert_ne!(round.snapshot_hash(), twin.snapshot_hash());
    }
}
