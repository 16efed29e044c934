use crate::error::TacticianResult;
use crate::geometry::Lane;
use crate::params::CARD_THINK_DELAY;
use crate::placement::PlayIntent;
use crate::routines::{PlayContext, Routine};
use crate::selector::Situation;

/// Punishment push: a win condition on the lane, then a support card behind
/// it once the first one has crossed.
pub struct CalculatedPush {
    pub lane: Lane,
}

impl CalculatedPush {
    const SUPPORT_DELAY: f32 = 1.2f32;

    fn push_card(&self, ctx: &mut PlayContext) -> TacticianResult<bool> {
        let available = ctx.available_slots()?;
        if available.is_empty() {
            return Ok(false);
        }
        let choice =
            ctx.selector
                .select_optimal_card(&available, Situation::Push, Some(ctx.analysis), ctx.rng)?;
        let position = ctx.planner.optimal_play_position(
            choice.card_type,
            self.lane,
            PlayIntent::Push,
            ctx.state,
            ctx.rng,
        );
        ctx.play_card(choice.slot, position, CARD_THINK_DELAY)?;
        Ok(true)
    }

    fn support_card(&self, ctx: &mut PlayContext) -> TacticianResult<()> {
        ctx.pause(Self::SUPPORT_DELAY);
        let available = ctx.available_slots()?;
        if available.is_empty() {
            return Ok(());
        }
        let choice = ctx
            .selector
            .select_optimal_card(&available, Situation::Push, None, ctx.rng)?;
        let position = ctx.planner.support_position(self.lane, ctx.rng);
        ctx.play_card(choice.slot, position, CARD_THINK_DELAY)
    }
}

impl Routine for CalculatedPush {
    fn execute(&self, ctx: &mut PlayContext) -> TacticianResult<bool> {
        ctx.report(&format!("Punishment push on {:?}", self.lane));
        if !self.push_card(ctx)? {
            return Ok(false);
        }
        self.support_card(ctx)?;
        Ok(true)
    }
}

/// Late game all-in: tank on the lane front with support right behind it.
pub struct OvertimePush {
    pub lane: Lane,
}

impl OvertimePush {
    const SUPPORT_DELAY: f32 = 1.2f32;
}

impl Routine for OvertimePush {
    fn execute(&self, ctx: &mut PlayContext) -> TacticianResult<bool> {
        let available = ctx.available_slots()?;
        if available.is_empty() {
            return Ok(false);
        }
        ctx.report(&format!("Overtime push on {:?}", self.lane));
        let tank = ctx
            .selector
            .select_optimal_card(&available, Situation::Push, None, ctx.rng)?;
        let front = ctx.planner.lane_position(self.lane);
        ctx.play_card(tank.slot, front, CARD_THINK_DELAY)?;

        let rest = available
            .iter()
            .copied()
            .filter(|s| *s != tank.slot)
            .collect::<Vec<_>>();
        if !rest.is_empty() {
            ctx.pause(Self::SUPPORT_DELAY);
            let support = ctx
                .selector
                .select_optimal_card(&rest, Situation::Counter, None, ctx.rng)?;
            ctx.play_card(support.slot, front.offset(40, 30), CARD_THINK_DELAY)?;
        }
        Ok(true)
    }
}
