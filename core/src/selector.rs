use std::collections::VecDeque;

use log::debug;
use rand::prelude::*;

use crate::error::{TacticianError, TacticianResult};
use crate::params::RECENT_CARDS;
use crate::placement::PlayIntent;
use crate::state::CardType;
use crate::tactics::SituationAnalysis;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Situation {
    Defense,
    Push,
    Counter,
    Cycle,
    Neutral,
}

impl Situation {
    pub fn from_analysis(analysis: &SituationAnalysis) -> Situation {
        if !analysis.defensive_needs.is_empty() {
            Situation::Defense
        } else if analysis.push_opportunity.should_push {
            Situation::Push
        } else if analysis.elixir_advantage <= -2 {
            Situation::Cycle
        } else {
            Situation::Counter
        }
    }

    fn priorities(&self) -> &'static [CardType] {
        match self {
            Situation::Defense => &[CardType::Building, CardType::Swarm, CardType::Spell],
            Situation::Push => &[CardType::WinCondition, CardType::Tank, CardType::Support],
            Situation::Counter => &[CardType::Dps, CardType::Spell, CardType::Swarm],
            Situation::Cycle => &[CardType::Support, CardType::Swarm],
            Situation::Neutral => &[],
        }
    }

    pub fn intent(&self) -> PlayIntent {
        match self {
            Situation::Defense => PlayIntent::Defensive,
            Situation::Push => PlayIntent::Push,
            Situation::Counter => PlayIntent::Counter,
            Situation::Cycle => PlayIntent::Cycle,
            Situation::Neutral => PlayIntent::Offensive,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardChoice {
    pub slot: usize,
    pub card_type: CardType,
    pub intent: PlayIntent,
}

/// Scores the cards in hand, avoiding repeats and favouring combos.
#[derive(Debug, Default)]
pub struct CardSelector {
    // Most recent at the back.
    recent_cards: VecDeque<usize>,
}

impl CardSelector {
    const BASE_SCORE: f32 = 50f32;
    const PRIORITY_BONUS: f32 = 30f32;
    const RECENCY_PENALTY: f32 = 10f32;
    const SYNERGY_BONUS: f32 = 15f32;
    const JITTER: f32 = 5f32;

    pub fn reset(&mut self) {
        self.recent_cards.clear();
    }

    pub fn recent_cards(&self) -> &VecDeque<usize> {
        &self.recent_cards
    }

    pub fn card_type(slot: usize) -> CardType {
        match slot {
            0 => CardType::Tank,
            1 => CardType::Dps,
            2 => CardType::Swarm,
            3 => CardType::Spell,
            _ => CardType::Support,
        }
    }

    fn synergies(slot: usize) -> &'static [usize] {
        match slot {
            0 => &[1, 2],
            1 => &[0, 3],
            2 => &[0, 3],
            3 => &[1, 2],
            _ => &[],
        }
    }

    pub fn select_optimal_card(
        &mut self,
        available: &[usize],
        situation: Situation,
        analysis: Option<&SituationAnalysis>,
        rng: &mut impl Rng,
    ) -> TacticianResult<CardChoice> {
        if available.is_empty() {
            return Err(TacticianError::NoSlotsAvailable);
        }
        let situation = analysis.map(Situation::from_analysis).unwrap_or(situation);

        let mut best: Option<(usize, f32)> = None;
        for slot in available.iter().copied() {
            let score = self.score(slot, situation, rng);
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((slot, score));
            }
        }
        let (slot, score) = best.ok_or(TacticianError::NoSlotsAvailable)?;
        debug!("Selected slot {} for {:?} (score {:.1})", slot, situation, score);
        self.remember(slot);
        Ok(CardChoice {
            slot,
            card_type: Self::card_type(slot),
            intent: situation.intent(),
        })
    }

    fn score(&self, slot: usize, situation: Situation, rng: &mut impl Rng) -> f32 {
        let mut score = Self::BASE_SCORE;
        if situation.priorities().contains(&Self::card_type(slot)) {
            score += Self::PRIORITY_BONUS;
        }
        if let Some(recency) = self.recency(slot) {
            score -= (RECENT_CARDS - recency) as f32 * Self::RECENCY_PENALTY;
        }
        score += self.synergy_bonus(slot);
        score + rng.gen_range(-Self::JITTER..=Self::JITTER)
    }

    /// Position in the window counted from the oldest entry.
    fn recency(&self, slot: usize) -> Option<usize> {
        self.recent_cards.iter().position(|s| *s == slot)
    }

    fn synergy_bonus(&self, slot: usize) -> f32 {
        let partners = Self::synergies(slot);
        self.recent_cards
            .iter()
            .rev()
            .take(2)
            .filter(|s| partners.contains(s))
            .count() as f32
            * Self::SYNERGY_BONUS
    }

    fn remember(&mut self, slot: usize) {
        if self.recent_cards.contains(&slot) {
            return;
        }
        while self.recent_cards.len() >= RECENT_CARDS {
            self.recent_cards.pop_front();
        }
        self.recent_cards.push_back(slot);
    }
}
