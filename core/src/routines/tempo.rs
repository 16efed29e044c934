use crate::error::TacticianResult;
use crate::params::CARD_THINK_DELAY;
use crate::placement::PlayIntent;
use crate::routines::{PlayContext, Routine};
use crate::selector::Situation;

/// Opening phase: hold elixir until nearly full, then cycle a cheap card
/// defensively.
pub struct ConservativeOpening;

impl ConservativeOpening {
    pub const ELIXIR_GATE: u32 = 9;
}

impl Routine for ConservativeOpening {
    fn execute(&self, ctx: &mut PlayContext) -> TacticianResult<bool> {
        if ctx.state.our_elixir < Self::ELIXIR_GATE {
            return Ok(false);
        }
        let available = ctx.available_slots()?;
        if available.is_empty() {
            return Ok(false);
        }
        let choice = ctx
            .selector
            .select_optimal_card(&available, Situation::Cycle, None, ctx.rng)?;
        let position = ctx.planner.optimal_play_position(
            choice.card_type,
            ctx.analysis.priority_lane,
            PlayIntent::Defensive,
            ctx.state,
            ctx.rng,
        );
        ctx.report("Conservative opening");
        ctx.play_card(choice.slot, position, CARD_THINK_DELAY)?;
        Ok(true)
    }
}

pub struct TempoControl;

impl Routine for TempoControl {
    fn execute(&self, ctx: &mut PlayContext) -> TacticianResult<bool> {
        let available = ctx.available_slots()?;
        if available.is_empty() {
            return Ok(false);
        }
        let choice = ctx.selector.select_optimal_card(
            &available,
            Situation::Neutral,
            Some(ctx.analysis),
            ctx.rng,
        )?;
        let position = ctx.planner.optimal_play_position(
            choice.card_type,
            ctx.analysis.priority_lane,
            choice.intent,
            ctx.state,
            ctx.rng,
        );
        ctx.play_card(choice.slot, position, CARD_THINK_DELAY)?;
        Ok(true)
    }
}

/// Late game: a push card on the priority lane and a quick follow-up.
pub struct EndgameTactics;

impl EndgameTactics {
    const FOLLOW_UP_DELAY: f32 = 0.8f32;
}

impl Routine for EndgameTactics {
    fn execute(&self, ctx: &mut PlayContext) -> TacticianResult<bool> {
        let available = ctx.available_slots()?;
        if available.is_empty() {
            return Ok(false);
        }
        let lane = ctx.analysis.priority_lane;
        ctx.report(&format!("Endgame push on {:?}", lane));
        let choice = ctx.selector.select_optimal_card(
            &available,
            Situation::Push,
            Some(ctx.analysis),
            ctx.rng,
        )?;
        let position =
            ctx.planner
                .optimal_play_position(choice.card_type, lane, choice.intent, ctx.state, ctx.rng);
        ctx.play_card(choice.slot, position, CARD_THINK_DELAY)?;

        if available.len() >= 2 {
            ctx.pause(Self::FOLLOW_UP_DELAY);
            let rest = ctx
                .available_slots()?
                .into_iter()
                .filter(|s| *s != choice.slot)
                .collect::<Vec<_>>();
            if !rest.is_empty() {
                let support = ctx
                    .selector
                    .select_optimal_card(&rest, Situation::Counter, None, ctx.rng)?;
                let position = ctx.planner.support_position(lane, ctx.rng);
                ctx.play_card(support.slot, position, CARD_THINK_DELAY)?;
            }
        }
        Ok(true)
    }
}
