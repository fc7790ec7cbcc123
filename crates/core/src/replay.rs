use serde::Serialize;
use thiserror::Error;

use crate::error::RulesError;
use crate::journal::InputJournal;
use crate::round::Round;
use crate::types::RoundEvent;

#[derive(Debug, PartialEq, Error)]
pub enum ReplayError {
    #[error("journal rules are invalid: {0}")]
    InvalidRules(#[from] RulesError),

    #[error("input {seq} targets tick {tick}, which has already run")]
    OutOfOrder { seq: u64, tick: u64 },

    #[error("input {seq} targets tick {tick}, after the round ended")]
    InputAfterRoundEnd { seq: u64, tick: u64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ReplayResult {
    pub outcome: Option<RoundEvent>,
    pub final_tick: u64,
    pub final_snapshot_hash: u64,
}

/// Rebuilds the round from the journal seed and feeds each input at its tick.
/// Stops on a round-ending event or after `max_ticks`.
pub fn replay_to_end(journal: &InputJournal, max_ticks: u64) -> Result<ReplayResult, ReplayError> {
    let mut round = Round::new(journal.seed, journal.rules.clone())?;
    let mut inputs = journal.inputs.iter().peekable();

    while round.outcome().is_none() && round.current_tick() < max_ticks {
        let next_tick = round.current_tick() + 1;
        if let Some(record) = inputs.peek()
            && record.tick < next_tick
        {
            return Err(ReplayError::OutOfOrder { seq: record.seq, tick: record.tick });
        }
        while let Some(record) = inputs.next_if(|record| record.tick == next_tick) {
            round.queue_control(record.request);
        }
        round.tick();
    }

    if round.outcome().is_some()
        && let Some(record) = inputs.next()
    {
        return Err(ReplayError::InputAfterRoundEnd { seq: record.seq, tick: record.tick });
    }

    Ok(ReplayResult {
        outcome: round.outcome(),
        final_tick: round.current_tick(),
        final_snapshot_hash: round.snapshot_hash(),
    })
}
