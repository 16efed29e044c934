use rand::prelude::*;

use crate::decision::Spell;
use crate::error::TacticianResult;
use crate::geometry::Point;
use crate::params::CARD_THINK_DELAY;
use crate::placement::PlayIntent;
use crate::routines::{PlayContext, Routine};
use crate::selector::CardSelector;

/// Baits the spell we expect next away from the threatened lane, then
/// punishes once it has been spent.
pub struct SpellBait {
    pub spell: Spell,
}

impl SpellBait {
    const PUNISH_DELAY: f32 = 1.2f32;

    fn dodge_positions(&self, ctx: &PlayContext) -> Vec<Point> {
        let lane = ctx.state.most_threatened_lane().opposite();
        let spots = ctx.zones.kiting.get(lane);
        let radius = self.spell.radius() as f32;
        let safe = spots
            .iter()
            .copied()
            .filter(|spot| {
                ctx.state
                    .enemy_units
                    .iter()
                    .all(|u| u.position.distance(*spot) > radius)
            })
            .collect::<Vec<_>>();
        if safe.is_empty() {
            spots.to_vec()
        } else {
            safe
        }
    }
}

impl Routine for SpellBait {
    fn execute(&self, ctx: &mut PlayContext) -> TacticianResult<bool> {
        ctx.report(&format!("Spell prediction: dodging {:?}", self.spell));
        let available = ctx.available_slots()?;
        let bait = match available.first() {
            Some(bait) => *bait,
            None => return Ok(false),
        };
        let dodges = self.dodge_positions(ctx);
        let dodge = match dodges.choose(ctx.rng) {
            Some(dodge) => *dodge,
            None => return Ok(false),
        };
        ctx.play_card(bait, dodge, CARD_THINK_DELAY)?;

        ctx.pause(Self::PUNISH_DELAY);
        if let Some(punish) = available.get(1) {
            let position = ctx.planner.optimal_play_position(
                CardSelector::card_type(*punish),
                ctx.analysis.priority_lane,
                PlayIntent::Offensive,
                ctx.state,
                ctx.rng,
            );
            ctx.play_card(*punish, position, CARD_THINK_DELAY)?;
        }
        Ok(true)
    }
}
