pub mod counter;
pub mod defense;
pub mod emote;
pub mod push;
pub mod spell;
pub mod tempo;

use log::debug;
use rand_chacha::ChaCha8Rng;

use crate::clock::Clock;
use crate::emulator::{hand_anchor, Emulator, StatusSink};
use crate::error::TacticianResult;
use crate::geometry::{Point, Zones};
use crate::placement::PlayAreaPlanner;
use crate::selector::CardSelector;
use crate::state::GameState;
use crate::tactics::SituationAnalysis;

/// Everything a routine may touch while playing out one decision.
pub struct PlayContext<'a> {
    pub emulator: &'a mut dyn Emulator,
    pub clock: &'a mut dyn Clock,
    pub status: &'a mut dyn StatusSink,
    pub state: &'a GameState,
    pub analysis: &'a SituationAnalysis,
    pub zones: &'a Zones,
    pub planner: &'a PlayAreaPlanner,
    pub selector: &'a mut CardSelector,
    pub rng: &'a mut ChaCha8Rng,
}

impl<'a> PlayContext<'a> {
    pub fn available_slots(&mut self) -> TacticianResult<Vec<usize>> {
        self.emulator.available_slots()
    }

    /// Selects `slot` in the hand, then drops it at `position`.
    pub fn play_card(&mut self, slot: usize, position: Point, think: f32) -> TacticianResult<()> {
        let anchor = hand_anchor(slot)?;
        debug!("Playing slot {} at {:?}", slot, position);
        self.emulator.tap(anchor)?;
        self.clock.sleep(think);
        self.emulator.tap(position)
    }

    pub fn pause(&mut self, seconds: f32) {
        self.clock.sleep(seconds);
    }

    pub fn report(&mut self, message: &str) {
        self.status.report(message);
    }
}

pub trait Routine {
    /// Returns whether the main card of the routine was played.
    fn execute(&self, ctx: &mut PlayContext) -> TacticianResult<bool>;
}
