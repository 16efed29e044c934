use rand::prelude::*;

use crate::geometry::Lane;
use crate::tactics::DefensiveNeed;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spell {
    Fireball,
    Lightning,
    Rocket,
    Arrows,
    Zap,
}

impl Spell {
    pub const COMMON: [Spell; 5] = [
        Spell::Fireball,
        Spell::Lightning,
        Spell::Rocket,
        Spell::Arrows,
        Spell::Zap,
    ];

    pub fn guess(rng: &mut impl Rng) -> Spell {
        *Self::COMMON.choose(rng).unwrap_or(&Spell::Fireball)
    }

    /// Blast radius in screen pixels.
    pub fn radius(&self) -> i32 {
        match self {
            Spell::Zap | Spell::Arrows => 70,
            Spell::Fireball | Spell::Lightning => 50,
            Spell::Rocket => 35,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ImmediateDefense { need: DefensiveNeed },
    /// Punishment push into an opponent that is short on elixir.
    Push { lane: Lane },
    SpellPrediction { spell: Spell },
    OvertimePush { lane: Lane },
    CycleBreak,
    ConservativeOpening,
    TempoControl,
    EndgameTactics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    ImmediateDefense,
    Push,
    SpellPrediction,
    OvertimePush,
    CycleBreak,
    ConservativeOpening,
    TempoControl,
    EndgameTactics,
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::ImmediateDefense { .. } => ActionKind::ImmediateDefense,
            Action::Push { .. } => ActionKind::Push,
            Action::SpellPrediction { .. } => ActionKind::SpellPrediction,
            Action::OvertimePush { .. } => ActionKind::OvertimePush,
            Action::CycleBreak => ActionKind::CycleBreak,
            Action::ConservativeOpening => ActionKind::ConservativeOpening,
            Action::TempoControl => ActionKind::TempoControl,
            Action::EndgameTactics => ActionKind::EndgameTactics,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub action: Action,
    pub priority: u8,
    pub confidence: f32,
    pub reasoning: &'static str,
}

impl Decision {
    pub fn new(action: Action, priority: u8, confidence: f32, reasoning: &'static str) -> Self {
        Self {
            action,
            priority,
            confidence,
            reasoning,
        }
    }

    pub fn kind(&self) -> ActionKind {
        self.action.kind()
    }
}
