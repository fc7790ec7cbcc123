//! Recorded controlled-agent input for one round.

use serde::{Deserialize, Serialize};

use crate::config::RulesConfig;
use crate::round::Round;
use crate::types::ControlRequest;

pub const JOURNAL_FORMAT_VERSION: u16 = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputJournal {
    pub format_version: u16,
    pub seed: u64,
    pub rules: RulesConfig,
    pub inputs: Vec<InputRecord>,
}

/// `tick` is the tick that applies the request.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputRecord {
    pub seq: u64,
    pub tick: u64,
    pub request: ControlRequest,
}

impl InputJournal {
    pub fn new(seed: u64, rules: RulesConfig) -> Self {
        Self { format_version: JOURNAL_FORMAT_VERSION, seed, rules, inputs: Vec::new() }
    }

    pub fn append(&mut self, tick: u64, request: ControlRequest) -> u64 {
        let seq = self.inputs.len() as u64;
        self.inputs.push(InputRecord { seq, tick, request });
        seq
    }

    /// Queues `request` on `round` and records it against the tick that will apply it.
    pub fn queue_and_record(&mut self, round: &mut Round, request: ControlRequest) -> u64 {
        round.queue_control(request);
        self.append(round.current_tick() + 1, request)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
