use crate::error::TacticianResult;
use crate::params::{CARD_THINK_DELAY, EMERGENCY_THINK_DELAY};
use crate::routines::{PlayContext, Routine};
use crate::selector::CardSelector;
use crate::state::{CardType, ThreatLevel};
use crate::tactics::DefensiveNeed;

pub struct EmergencyDefense<'a> {
    pub need: &'a DefensiveNeed,
}

impl<'a> EmergencyDefense<'a> {
    const FOLLOW_UP_DELAY: f32 = 1f32;
    const SPELL_RADIUS: i32 = 60;

    fn counter_priorities(threat: CardType) -> &'static [usize] {
        match threat {
            CardType::Tank => &[2, 1, 3],
            CardType::Swarm => &[3, 0],
            CardType::Dps => &[0, 2],
            CardType::Spell => &[1],
            _ => &[],
        }
    }

    pub fn best_counter_card(available: &[usize], threat: CardType) -> Option<usize> {
        Self::counter_priorities(threat)
            .iter()
            .find(|slot| available.contains(*slot))
            .or_else(|| available.first())
            .copied()
    }

    fn follow_up(&self, ctx: &mut PlayContext) -> TacticianResult<()> {
        ctx.report("Follow-up defense");
        ctx.pause(Self::FOLLOW_UP_DELAY);
        if let Some(support) = ctx.available_slots()?.first() {
            let position = self.need.threat.position.offset(30, 40);
            ctx.play_card(*support, position, CARD_THINK_DELAY)?;
        }
        Ok(())
    }
}

impl<'a> Routine for EmergencyDefense<'a> {
    fn execute(&self, ctx: &mut PlayContext) -> TacticianResult<bool> {
        let threat = &self.need.threat;
        let available = ctx.available_slots()?;
        let card = match Self::best_counter_card(&available, threat.unit_type) {
            Some(card) => card,
            None => return Ok(false),
        };
        ctx.report(&format!(
            "Emergency defense: {:?} at {:?}",
            threat.unit_type, threat.position
        ));
        let position = if CardSelector::card_type(card) == CardType::Spell {
            ctx.planner
                .spell_position(threat.position, Self::SPELL_RADIUS, true, ctx.state, ctx.rng)
        } else {
            self.need.counter_position
        };
        ctx.play_card(card, position, EMERGENCY_THINK_DELAY)?;
        if threat.threat_level == ThreatLevel::Critical {
            self.follow_up(ctx)?;
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_card_follows_priorities() {
        assert_eq!(EmergencyDefense::best_counter_card(&[0, 1, 3], CardType::Tank), Some(1));
        assert_eq!(EmergencyDefense::best_counter_card(&[1, 2], CardType::Swarm), Some(1));
        assert_eq!(EmergencyDefense::best_counter_card(&[3, 1], CardType::Building), Some(3));
        assert_eq!(EmergencyDefense::best_counter_card(&[], CardType::Dps), None);
    }
}
