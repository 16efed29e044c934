use crate::error::TacticianResult;
use crate::geometry::{Lane, Tower};
use crate::params::CARD_THINK_DELAY;
use crate::routines::{PlayContext, Routine};
use crate::selector::Situation;
use crate::state::GameState;

/// Counter-attacks an enemy that has been cycling cheap cards.
pub struct CycleBreak;

impl CycleBreak {
    const COMBO_DELAY: f32 = 1.2f32;
    const COUNTER_SUPPORT_DELAY: f32 = 2f32;
    const COMMITTED: f32 = 0.7f32;

    /// How much of a full elixir bar and a half the enemy spent on its last
    /// three cards, capped at 1.
    pub fn enemy_commitment(state: &GameState) -> f32 {
        let spent = state.recent_enemy_plays(3).map(|p| p.cost).sum::<u32>();
        (spent as f32 / 15f32).min(1f32)
    }

    pub fn counter_lane(state: &GameState) -> Lane {
        if Self::enemy_commitment(state) > Self::COMMITTED {
            match state.most_threatened_lane() {
                Lane::Right => Lane::Left,
                _ => Lane::Right,
            }
        } else if state.enemy_tower_health.weakest() == Tower::Left {
            Lane::Left
        } else {
            Lane::Right
        }
    }
}

impl Routine for CycleBreak {
    fn execute(&self, ctx: &mut PlayContext) -> TacticianResult<bool> {
        let available = ctx.available_slots()?;
        if available.len() < 2 {
            return Ok(false);
        }
        let lane = Self::counter_lane(ctx.state);
        ctx.report(&format!("Breaking the cycle on {:?}", lane));

        let front = ctx.planner.lane_position(lane);
        let tank = ctx
            .selector
            .select_optimal_card(&available, Situation::Push, None, ctx.rng)?;
        ctx.play_card(tank.slot, front, CARD_THINK_DELAY)?;

        ctx.pause(Self::COMBO_DELAY);
        let rest = available
            .iter()
            .copied()
            .filter(|s| *s != tank.slot)
            .collect::<Vec<_>>();
        let support = ctx
            .selector
            .select_optimal_card(&rest, Situation::Counter, None, ctx.rng)?;
        ctx.play_card(support.slot, front.offset(40, 30), CARD_THINK_DELAY)?;

        ctx.pause(Self::COUNTER_SUPPORT_DELAY);
        if let Some(slot) = ctx.available_slots()?.first() {
            ctx.play_card(*slot, front.offset(0, -50), CARD_THINK_DELAY)?;
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CardType, EnemyPlay, ThreatLevel};

    fn state_with_costs(costs: &[u32]) -> GameState {
        let mut state = GameState::default();
        for (i, cost) in costs.iter().enumerate() {
            state.push_enemy_play(EnemyPlay::new(i as f32, Lane::Left, CardType::Dps, *cost));
        }
        state
    }

    #[test]
    fn commitment_uses_last_three_plays() {
        assert_eq!(CycleBreak::enemy_commitment(&GameState::default()), 0f32);
        let state = state_with_costs(&[9, 3, 3, 3]);
        assert!((CycleBreak::enemy_commitment(&state) - 0.6f32).abs() < 1e-6);
        let state = state_with_costs(&[6, 6, 6]);
        assert_eq!(CycleBreak::enemy_commitment(&state), 1f32);
    }

    #[test]
    fn lane_follows_commitment() {
        let mut state = state_with_costs(&[6, 6, 6]);
        state.pressure_lanes.insert(Lane::Right, ThreatLevel::High);
        assert_eq!(CycleBreak::counter_lane(&state), Lane::Left);

        let mut state = state_with_costs(&[6, 6, 6]);
        state.pressure_lanes.insert(Lane::Center, ThreatLevel::Critical);
        assert_eq!(state.most_threatened_lane(), Lane::Center);
        assert_eq!(CycleBreak::counter_lane(&state), Lane::Right);

        let mut state = state_with_costs(&[2, 2, 2]);
        assert_eq!(CycleBreak::counter_lane(&state), Lane::Right);
        state.enemy_tower_health.set(Tower::Left, 0.3f32);
        assert_eq!(CycleBreak::counter_lane(&state), Lane::Left);
    }
}
