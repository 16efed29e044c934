use rand::prelude::*;

use crate::error::TacticianResult;
use crate::params::EMOTE_THINK_DELAY;
use crate::routines::{PlayContext, Routine};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emote {
    WellPlayed,
    GoodLuck,
    CryingKing,
}

impl Emote {
    pub const ALL: [Emote; 3] = [Emote::WellPlayed, Emote::GoodLuck, Emote::CryingKing];
}

pub struct PsychologicalPressure;

impl Routine for PsychologicalPressure {
    fn execute(&self, ctx: &mut PlayContext) -> TacticianResult<bool> {
        let emote = *Emote::ALL.choose(ctx.rng).unwrap_or(&Emote::WellPlayed);
        ctx.report(&format!("Emote: {:?}", emote));
        ctx.emulator.tap(ctx.zones.emote_button)?;
        ctx.pause(EMOTE_THINK_DELAY);
        let target = *ctx
            .zones
            .emotes
            .choose(ctx.rng)
            .unwrap_or(&ctx.zones.emotes[0]);
        ctx.emulator.tap(target)?;
        Ok(true)
    }
}
