use std::rc::Rc;

use rand::prelude::*;

use crate::geometry::{Lane, Point, Zones};
use crate::params::SPELL_PREDICTION_OFFSET;
use crate::state::{CardType, EnemyUnit, GameState, ThreatLevel};
use crate::tactics::counter_position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayIntent {
    Offensive,
    Defensive,
    Counter,
    Push,
    Cycle,
}

/// Turns a card category, a lane and an intent into a screen position.
pub struct PlayAreaPlanner {
    zones: Rc<Zones>,
}

impl PlayAreaPlanner {
    pub fn new(zones: Rc<Zones>) -> Self {
        Self { zones }
    }

    pub fn optimal_play_position(
        &self,
        card_type: CardType,
        lane: Lane,
        intent: PlayIntent,
        state: &GameState,
        rng: &mut impl Rng,
    ) -> Point {
        match intent {
            PlayIntent::Defensive => self.defensive_position(card_type, lane, rng),
            PlayIntent::Counter => self.counter_position(card_type, lane, state, rng),
            PlayIntent::Push => self.push_position(card_type, lane, rng),
            PlayIntent::Offensive | PlayIntent::Cycle => self.standard_position(lane, rng),
        }
    }

    fn defensive_position(&self, card_type: CardType, lane: Lane, rng: &mut impl Rng) -> Point {
        match card_type {
            CardType::Building => jitter(self.zones.building_spot.get(lane), 15, 10, rng),
            CardType::Tank | CardType::Dps => jitter(self.zones.anti_push.get(lane), 25, 15, rng),
            _ => self.kiting_position(lane, rng),
        }
    }

    fn counter_position(
        &self,
        card_type: CardType,
        lane: Lane,
        state: &GameState,
        rng: &mut impl Rng,
    ) -> Point {
        let target = state
            .enemy_units
            .iter()
            .filter(|u| u.lane == lane && u.threat_level >= ThreatLevel::Medium)
            .fold(None, |best: Option<&EnemyUnit>, unit| match best {
                Some(best) if best.threat_level >= unit.threat_level => Some(best),
                _ => Some(unit),
            });
        match target {
            Some(threat) => counter_position(&self.zones, threat, rng),
            None => self.defensive_position(card_type, lane, rng),
        }
    }

    fn push_position(&self, card_type: CardType, lane: Lane, rng: &mut impl Rng) -> Point {
        match card_type {
            CardType::Tank => jitter(self.zones.bridge.get(lane), 20, 10, rng),
            CardType::WinCondition => self.zones.pocket.get(lane),
            _ => self.support_position(lane, rng),
        }
    }

    pub fn support_position(&self, lane: Lane, rng: &mut impl Rng) -> Point {
        jitter(self.zones.support.get(lane), 30, 20, rng)
    }

    pub fn kiting_position(&self, lane: Lane, rng: &mut impl Rng) -> Point {
        let spots = self.zones.kiting.get(lane);
        *spots.choose(rng).unwrap_or(&spots[0])
    }

    fn standard_position(&self, lane: Lane, rng: &mut impl Rng) -> Point {
        jitter(self.zones.standard.get(lane), 40, 30, rng)
    }

    pub fn lane_position(&self, lane: Lane) -> Point {
        self.zones.lane_front.get(lane)
    }

    /// Aims a spell at `target`, or at where the units around it are heading.
    pub fn spell_position(
        &self,
        target: Point,
        radius: i32,
        predict_movement: bool,
        state: &GameState,
        rng: &mut impl Rng,
    ) -> Point {
        if predict_movement {
            let nearby = state
                .enemy_units
                .iter()
                .filter(|u| {
                    (u.position.x - target.x).abs() < radius
                        && (u.position.y - target.y).abs() < radius
                })
                .map(|u| u.position)
                .collect::<Vec<_>>();
            if !nearby.is_empty() {
                let count = nearby.len() as f32;
                let avg_x = nearby.iter().map(|p| p.x as f32).sum::<f32>() / count;
                let avg_y = nearby.iter().map(|p| p.y as f32).sum::<f32>() / count;
                return Point::new(avg_x as i32, avg_y as i32 + SPELL_PREDICTION_OFFSET);
            }
        }
        jitter(target, 20, 15, rng)
    }
}

fn jitter(anchor: Point, dx: i32, dy: i32, rng: &mut impl Rng) -> Point {
    anchor.offset(rng.gen_range(-dx..=dx), rng.gen_range(-dy..=dy))
}

#[cfg(test)]
mod tests {
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::testing::{state_with_units, unit_at};

    fn planner() -> PlayAreaPlanner {
        PlayAreaPlanner::new(Rc::new(Zones::default()))
    }

    fn within(point: Point, anchor: Point, dx: i32, dy: i32) -> bool {
        (point.x - anchor.x).abs() <= dx && (point.y - anchor.y).abs() <= dy
    }

    #[test]
    fn same_seed_same_positions() {
        let planner = planner();
        let state = GameState::default();
        let mut first = ChaCha8Rng::seed_from_u64(42);
        let mut second = ChaCha8Rng::seed_from_u64(42);
        for intent in [
            PlayIntent::Offensive,
            PlayIntent::Defensive,
            PlayIntent::Counter,
            PlayIntent::Push,
        ] {
            for card in [CardType::Tank, CardType::Swarm, CardType::WinCondition] {
                assert_eq!(
                    planner.optimal_play_position(card, Lane::Left, intent, &state, &mut first),
                    planner.optimal_play_position(card, Lane::Left, intent, &state, &mut second)
                );
            }
        }
    }

    #[test]
    fn defensive_positions_by_category() {
        let planner = planner();
        let zones = Zones::default();
        let state = GameState::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..16 {
            let building = planner.optimal_play_position(
                CardType::Building,
                Lane::Right,
                PlayIntent::Defensive,
                &state,
                &mut rng,
            );
            assert!(within(building, zones.building_spot.right, 15, 10));
            let tank = planner.optimal_play_position(
                CardType::Tank,
                Lane::Left,
                PlayIntent::Defensive,
                &state,
                &mut rng,
            );
            assert!(within(tank, zones.anti_push.left, 25, 15));
            let swarm = planner.optimal_play_position(
                CardType::Swarm,
                Lane::Center,
                PlayIntent::Defensive,
                &state,
                &mut rng,
            );
            assert!(zones.kiting.center.contains(&swarm));
        }
    }

    #[test]
    fn push_positions_by_category() {
        let planner = planner();
        let zones = Zones::default();
        let state = GameState::default();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let win_condition = planner.optimal_play_position(
            CardType::WinCondition,
            Lane::Right,
            PlayIntent::Push,
            &state,
            &mut rng,
        );
        assert_eq!(win_condition, zones.pocket.right);
        let tank =
            planner.optimal_play_position(CardType::Tank, Lane::Left, PlayIntent::Push, &state, &mut rng);
        assert!(within(tank, zones.bridge.left, 20, 10));
        let support =
            planner.optimal_play_position(CardType::Dps, Lane::Left, PlayIntent::Push, &state, &mut rng);
        assert!(within(support, zones.support.left, 30, 20));
    }

    #[test]
    fn counter_targets_lane_threat() {
        let planner = planner();
        let zones = Zones::default();
        let state = state_with_units(vec![
            unit_at(Point::new(150, 285), Lane::Left, CardType::Tank),
            unit_at(Point::new(150, 50), Lane::Left, CardType::Dps),
        ]);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let counter =
            planner.optimal_play_position(CardType::Dps, Lane::Left, PlayIntent::Counter, &state, &mut rng);
        assert_eq!(counter, Point::new(150, 325));

        let fallback =
            planner.optimal_play_position(CardType::Dps, Lane::Right, PlayIntent::Counter, &state, &mut rng);
        assert!(within(fallback, zones.anti_push.right, 25, 15));
    }

    #[test]
    fn spell_leads_nearby_units() {
        let planner = planner();
        let state = state_with_units(vec![
            unit_at(Point::new(150, 285), Lane::Left, CardType::Swarm),
            unit_at(Point::new(170, 305), Lane::Left, CardType::Dps),
            unit_at(Point::new(490, 285), Lane::Right, CardType::Tank),
        ]);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let spell = planner.spell_position(Point::new(160, 290), 60, true, &state, &mut rng);
        assert_eq!(spell, Point::new(160, 310));

        let target = Point::new(320, 200);
        let missed = planner.spell_position(target, 60, true, &state, &mut rng);
        assert!(within(missed, target, 20, 15));
        let unpredicted = planner.spell_position(Point::new(160, 290), 60, false, &state, &mut rng);
        assert!(within(unpredicted, Point::new(160, 290), 20, 15));
    }
}
