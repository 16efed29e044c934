use std::collections::{HashMap, VecDeque};

use crate::decision::{ActionKind, Decision};
use crate::params::{FAILURE_MEMORY, SUCCESS_MEMORY};

#[derive(Debug, Clone, PartialEq)]
pub struct PlayRecord {
    pub decision: Decision,
    pub timestamp: f32,
    pub success: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub attempts: u32,
    pub successes: u32,
}

impl Tally {
    pub fn success_rate(&self) -> f32 {
        if self.attempts == 0 {
            return 0f32;
        }
        self.successes as f32 / self.attempts as f32
    }
}

/// What happened to our plays during the current battle.
#[derive(Debug, Default)]
pub struct BattleMemory {
    successful_plays: VecDeque<PlayRecord>,
    failed_plays: VecDeque<PlayRecord>,
    tallies: HashMap<ActionKind, Tally>,
}

impl BattleMemory {
    pub fn reset(&mut self) {
        self.successful_plays.clear();
        self.failed_plays.clear();
        self.tallies.clear();
    }

    pub fn record(&mut self, decision: Decision, success: bool, timestamp: f32) {
        let tally = self.tallies.entry(decision.kind()).or_default();
        tally.attempts += 1;
        if success {
            tally.successes += 1;
        }

        let (log, capacity) = if success {
            (&mut self.successful_plays, SUCCESS_MEMORY)
        } else {
            (&mut self.failed_plays, FAILURE_MEMORY)
        };
        while log.len() >= capacity {
            log.pop_front();
        }
        log.push_back(PlayRecord {
            decision,
            timestamp,
            success,
        });
    }

    pub fn successful_plays(&self) -> &VecDeque<PlayRecord> {
        &self.successful_plays
    }

    pub fn failed_plays(&self) -> &VecDeque<PlayRecord> {
        &self.failed_plays
    }

    pub fn tally(&self, kind: ActionKind) -> Tally {
        self.tallies.get(&kind).copied().unwrap_or_default()
    }

    pub fn tallies(&self) -> &HashMap<ActionKind, Tally> {
        &self.tallies
    }
}
