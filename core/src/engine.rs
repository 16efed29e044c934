use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, error, info};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::clock::Clock;
use crate::decision::{Action, ActionKind, Decision, Spell};
use crate::emulator::{Emulator, StatusSink};
use crate::error::{TacticianError, TacticianResult};
use crate::geometry::Zones;
use crate::memory::{BattleMemory, Tally};
use crate::params::{BASE_REACTION, EMOTE_CHANCE, MIN_REACTION};
use crate::placement::PlayAreaPlanner;
use crate::routines::counter::CycleBreak;
use crate::routines::defense::EmergencyDefense;
use crate::routines::emote::PsychologicalPressure;
use crate::routines::push::{CalculatedPush, OvertimePush};
use crate::routines::spell::SpellBait;
use crate::routines::tempo::{ConservativeOpening, EndgameTactics, TempoControl};
use crate::routines::{PlayContext, Routine};
use crate::selector::CardSelector;
use crate::state::{CardType, GameState};
use crate::tactics::{SituationAnalysis, TacticalAnalyzer};
use crate::tracker::EnemyTracker;

/// How a battle ended and what was tried during it.
#[derive(Debug, Clone)]
pub struct BattleOutcome {
    pub success: bool,
    pub cycles: u32,
    pub tallies: HashMap<ActionKind, Tally>,
    pub error: Option<TacticianError>,
}

/// Runs the scan, analyze, decide and execute cycle for one battle.
pub struct BattleEngine {
    zones: Rc<Zones>,
    tracker: EnemyTracker,
    analyzer: TacticalAnalyzer,
    planner: PlayAreaPlanner,
    selector: CardSelector,
    memory: BattleMemory,
    rng: ChaCha8Rng,
    emote_chance: f64,
    battle_start: f32,
}

impl BattleEngine {
    const URGENT: u32 = 3;
    const PUNISH_OUR_ELIXIR: u32 = 7;
    const PUNISH_ENEMY_ELIXIR: u32 = 3;
    const OVERTIME: f32 = 180f32;
    const OVERTIME_ADVANTAGE: i32 = 3;
    const CYCLE_COST_LIMIT: u32 = 12;
    const OPENING_END: f32 = 30f32;
    const MIDGAME_END: f32 = 120f32;

    pub fn new(zones: Rc<Zones>, seed: u64) -> Self {
        Self {
            tracker: EnemyTracker::new(zones.clone()),
            analyzer: TacticalAnalyzer::new(zones.clone()),
            planner: PlayAreaPlanner::new(zones.clone()),
            selector: CardSelector::default(),
            memory: BattleMemory::default(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            emote_chance: EMOTE_CHANCE,
            battle_start: 0f32,
            zones,
        }
    }

    pub fn memory(&self) -> &BattleMemory {
        &self.memory
    }

    pub fn game_state(&self) -> &GameState {
        &self.tracker.game_state
    }

    fn reset(&mut self, now: f32) {
        self.tracker.reset();
        self.analyzer.reset();
        self.selector.reset();
        self.memory.reset();
        self.battle_start = now;
    }

    /// Plays until the battle is over. Any failure aborts the battle and is
    /// reported once.
    pub fn run_battle(
        &mut self,
        emulator: &mut dyn Emulator,
        clock: &mut dyn Clock,
        status: &mut dyn StatusSink,
    ) -> BattleOutcome {
        status.report("Starting battle");
        self.reset(clock.now());
        let mut cycles = 0;
        let result = self.battle_loop(emulator, clock, status, &mut cycles);
        let outcome = BattleOutcome {
            success: result.is_ok(),
            cycles,
            tallies: self.memory.tallies().clone(),
            error: result.err(),
        };
        match &outcome.error {
            Some(e) => {
                error!("Battle aborted after {} cycles: {}", cycles, e);
                status.report(&format!("Battle failed: {}", e));
            }
            None => {
                info!("Battle finished after {} cycles", cycles);
                status.report("Battle finished");
            }
        }
        outcome
    }

    fn battle_loop(
        &mut self,
        emulator: &mut dyn Emulator,
        clock: &mut dyn Clock,
        status: &mut dyn StatusSink,
        cycles: &mut u32,
    ) -> TacticianResult<()> {
        while emulator.is_in_battle()? {
            self.step(emulator, clock, status)?;
            *cycles += 1;
        }
        Ok(())
    }

    /// One full cycle, pacing sleep included.
    pub fn step(
        &mut self,
        emulator: &mut dyn Emulator,
        clock: &mut dyn Clock,
        status: &mut dyn StatusSink,
    ) -> TacticianResult<Decision> {
        let now = clock.now();
        self.tracker.scan(emulator, now)?;
        let analysis = self
            .analyzer
            .analyze(&self.tracker.game_state, now, &mut self.rng);
        let battle_time = now - self.battle_start;
        let decision = self.decide(&analysis, battle_time);
        let expected = self.tracker.predict_enemy_next_move();
        debug!(
            "Decision at {:.1}s: {:?} (priority {}, confidence {:.2}, {}), enemy expected {:?}",
            battle_time,
            decision.kind(),
            decision.priority,
            decision.confidence,
            decision.reasoning,
            expected.prediction
        );

        let success = self.dispatch(&decision, &analysis, emulator, clock, status)?;
        if success && matches!(decision.kind(), ActionKind::Push | ActionKind::OvertimePush) {
            self.analyzer.mark_push(now);
        }
        self.memory.record(decision.clone(), success, battle_time);

        let mut emote_time = 0f32;
        if self.rng.gen_bool(self.emote_chance) {
            let before = clock.now();
            self.execute(&PsychologicalPressure, &analysis, emulator, clock, status)?;
            emote_time = clock.now() - before;
        }
        let delay = self.reaction_delay(&analysis);
        clock.sleep(delay - emote_time);
        Ok(decision)
    }

    /// First matching trigger wins: urgent defense, punishment push, spell
    /// pattern, advanced opportunity, then the tempo fallback.
    pub fn decide(&mut self, analysis: &SituationAnalysis, battle_time: f32) -> Decision {
        if let Some(need) = analysis
            .defensive_needs
            .iter()
            .find(|n| n.urgency >= Self::URGENT)
        {
            return Decision::new(
                Action::ImmediateDefense { need: need.clone() },
                5,
                0.95f32,
                "critical threat detected",
            );
        }

        let state = &self.tracker.game_state;
        if analysis.push_opportunity.should_push
            && state.our_elixir >= Self::PUNISH_OUR_ELIXIR
            && state.enemy_elixir_estimate <= Self::PUNISH_ENEMY_ELIXIR
        {
            return Decision::new(
                Action::Push {
                    lane: analysis.priority_lane,
                },
                4,
                0.9f32,
                "massive elixir advantage",
            );
        }

        if Self::spell_pattern(state) {
            return Decision::new(
                Action::SpellPrediction {
                    spell: Spell::guess(&mut self.rng),
                },
                3,
                0.8f32,
                "spell pattern detected",
            );
        }

        if let Some(decision) = Self::advanced_opportunity(state, analysis, battle_time) {
            return decision;
        }

        Self::tempo_decision(battle_time)
    }

    /// The last two spells were cast 8 to 12 seconds apart.
    fn spell_pattern(state: &GameState) -> bool {
        if state.last_enemy_plays.len() < 3 {
            return false;
        }
        let spells = state
            .last_enemy_plays
            .iter()
            .filter(|p| p.card_type == CardType::Spell)
            .collect::<Vec<_>>();
        match spells.as_slice() {
            [.., previous, last] => (8f32..=12f32).contains(&(last.time - previous.time)),
            _ => false,
        }
    }

    fn advanced_opportunity(
        state: &GameState,
        analysis: &SituationAnalysis,
        battle_time: f32,
    ) -> Option<Decision> {
        if battle_time > Self::OVERTIME && analysis.elixir_advantage >= Self::OVERTIME_ADVANTAGE {
            return Some(Decision::new(
                Action::OvertimePush {
                    lane: analysis.priority_lane,
                },
                5,
                0.95f32,
                "overtime advantage",
            ));
        }
        if Self::under_cycling(state) {
            return Some(Decision::new(
                Action::CycleBreak,
                4,
                0.85f32,
                "opponent cycle vulnerable",
            ));
        }
        None
    }

    /// The opponent spent little on its last four cards.
    fn under_cycling(state: &GameState) -> bool {
        if state.last_enemy_plays.len() < 4 {
            return false;
        }
        state.recent_enemy_plays(4).map(|p| p.cost).sum::<u32>() <= Self::CYCLE_COST_LIMIT
    }

    fn tempo_decision(battle_time: f32) -> Decision {
        if battle_time < Self::OPENING_END {
            Decision::new(
                Action::ConservativeOpening,
                2,
                0.7f32,
                "early game caution",
            )
        } else if battle_time < Self::MIDGAME_END {
            Decision::new(Action::TempoControl, 3, 0.8f32, "mid game control")
        } else {
            Decision::new(Action::EndgameTactics, 4, 0.9f32, "late game aggression")
        }
    }

    fn dispatch(
        &mut self,
        decision: &Decision,
        analysis: &SituationAnalysis,
        emulator: &mut dyn Emulator,
        clock: &mut dyn Clock,
        status: &mut dyn StatusSink,
    ) -> TacticianResult<bool> {
        let routine: Box<dyn Routine + '_> = match &decision.action {
            Action::ImmediateDefense { need } => Box::new(EmergencyDefense { need }),
            Action::Push { lane } => Box::new(CalculatedPush { lane: *lane }),
            Action::SpellPrediction { spell } => Box::new(SpellBait { spell: *spell }),
            Action::OvertimePush { lane } => Box::new(OvertimePush { lane: *lane }),
            Action::CycleBreak => Box::new(CycleBreak),
            Action::ConservativeOpening => Box::new(ConservativeOpening),
            Action::TempoControl => Box::new(TempoControl),
            Action::EndgameTactics => Box::new(EndgameTactics),
        };
        self.execute(routine.as_ref(), analysis, emulator, clock, status)
    }

    fn execute(
        &mut self,
        routine: &dyn Routine,
        analysis: &SituationAnalysis,
        emulator: &mut dyn Emulator,
        clock: &mut dyn Clock,
        status: &mut dyn StatusSink,
    ) -> TacticianResult<bool> {
        let mut ctx = PlayContext {
            emulator,
            clock,
            status,
            state: &self.tracker.game_state,
            analysis,
            zones: &self.zones,
            planner: &self.planner,
            selector: &mut self.selector,
            rng: &mut self.rng,
        };
        routine.execute(&mut ctx)
    }

    /// Faster under pressure, never below `MIN_REACTION`.
    fn reaction_delay(&mut self, analysis: &SituationAnalysis) -> f32 {
        let base = match analysis.max_urgency() {
            Some(urgency) if urgency >= 4 => 0.1f32,
            Some(urgency) if urgency >= 3 => 0.2f32,
            _ => BASE_REACTION,
        };
        let stress = (analysis.defensive_needs.len() as f32 * 0.2f32).min(1f32);
        let variation = self.rng.gen_range(0.05f32..0.15f32);
        (base * (1f32 - stress) + variation).max(MIN_REACTION)
    }
}
