use std::rc::Rc;

use itertools::Itertools;
use rand::prelude::*;

use crate::geometry::{Lane, Point, Zones};
use crate::params::{PUSH_COOLDOWN, TANK_PULL_DISTANCE};
use crate::state::{CardType, EnemyUnit, GameState, ThreatLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayStyle {
    Aggressive,
    Defensive,
    CounterPush,
    Cycle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    Building,
    Swarm,
    Dps,
    Spell,
    Splash,
    Tank,
    Nothing,
    Generic,
}

impl Counter {
    pub fn options_against(threat: CardType) -> &'static [Counter] {
        match threat {
            CardType::Tank => &[Counter::Building, Counter::Swarm, Counter::Dps],
            CardType::Swarm => &[Counter::Spell, Counter::Splash],
            CardType::Dps => &[Counter::Tank, Counter::Building],
            CardType::Spell => &[Counter::Nothing],
            CardType::Building => &[Counter::Spell, Counter::Tank],
            _ => &[Counter::Generic],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushKind {
    Beatdown,
    Pressure,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressureSummary {
    pub total_pressure: u32,
    pub max_pressure_lane: Lane,
    pub needs_immediate_defense: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DefensiveNeed {
    pub threat: EnemyUnit,
    pub counter_position: Point,
    pub recommended_counter: Counter,
    pub urgency: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PushOpportunity {
    pub should_push: bool,
    pub opportunity_score: u32,
    pub recommended_lane: Lane,
    pub push_type: PushKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SituationAnalysis {
    pub elixir_advantage: i32,
    pub tower_advantage: f32,
    pub pressure: PressureSummary,
    pub recommended_play_style: PlayStyle,
    pub priority_lane: Lane,
    pub defensive_needs: Vec<DefensiveNeed>,
    pub push_opportunity: PushOpportunity,
}

impl SituationAnalysis {
    pub fn max_urgency(&self) -> Option<u32> {
        self.defensive_needs.iter().map(|n| n.urgency).max()
    }
}

/// Where to drop a counter to `threat`. Tanks get pulled toward our side,
/// swarms get a scattered drop, anything else lands just in front of it.
pub fn counter_position(zones: &Zones, threat: &EnemyUnit, rng: &mut impl Rng) -> Point {
    let Point { x, y } = threat.position;
    match threat.unit_type {
        CardType::Tank => {
            let base = Point::new(x, y + 80);
            zones.clamp(threat.position.towards(base, TANK_PULL_DISTANCE))
        }
        CardType::Swarm => {
            let base = Point::new(x + rng.gen_range(-40..=40), y + 60);
            base.offset(rng.gen_range(-20..=20), rng.gen_range(-15..=15))
        }
        _ => Point::new(x + rng.gen_range(-30..=30), y + 50),
    }
}

pub struct TacticalAnalyzer {
    zones: Rc<Zones>,
    last_push_time: Option<f32>,
}

impl TacticalAnalyzer {
    const AGGRESSIVE_ADVANTAGE: i32 = 3;
    const CYCLE_DISADVANTAGE: i32 = -2;

    pub fn new(zones: Rc<Zones>) -> Self {
        Self {
            zones,
            last_push_time: None,
        }
    }

    pub fn reset(&mut self) {
        self.last_push_time = None;
    }

    pub fn mark_push(&mut self, now: f32) {
        self.last_push_time = Some(now);
    }

    pub fn analyze(&self, state: &GameState, now: f32, rng: &mut impl Rng) -> SituationAnalysis {
        let elixir_advantage = state.our_elixir as i32 - state.enemy_elixir_estimate as i32;
        let pressure = Self::analyze_pressure(state);
        let priority_lane = Self::select_priority_lane(state, rng);
        SituationAnalysis {
            elixir_advantage,
            tower_advantage: state.our_tower_health.total() - state.enemy_tower_health.total(),
            pressure,
            recommended_play_style: Self::determine_play_style(&pressure, elixir_advantage),
            priority_lane,
            defensive_needs: self.assess_defensive_needs(state, rng),
            push_opportunity: self.evaluate_push_opportunity(
                state,
                elixir_advantage,
                priority_lane,
                now,
            ),
        }
    }

    fn analyze_pressure(state: &GameState) -> PressureSummary {
        let total_pressure = Lane::ALL.iter().map(|l| state.pressure(*l).value()).sum();
        PressureSummary {
            total_pressure,
            max_pressure_lane: state.most_threatened_lane(),
            needs_immediate_defense: total_pressure >= ThreatLevel::High.value(),
        }
    }

    fn determine_play_style(pressure: &PressureSummary, elixir_advantage: i32) -> PlayStyle {
        if pressure.needs_immediate_defense {
            PlayStyle::Defensive
        } else if elixir_advantage >= Self::AGGRESSIVE_ADVANTAGE {
            PlayStyle::Aggressive
        } else if elixir_advantage <= Self::CYCLE_DISADVANTAGE {
            PlayStyle::Cycle
        } else {
            PlayStyle::CounterPush
        }
    }

    fn select_priority_lane(state: &GameState, rng: &mut impl Rng) -> Lane {
        if state.pressure(Lane::Left) >= ThreatLevel::High {
            return Lane::Left;
        }
        if state.pressure(Lane::Right) >= ThreatLevel::High {
            return Lane::Right;
        }
        let towers = &state.enemy_tower_health;
        if towers.left < towers.right {
            Lane::Left
        } else if towers.right < towers.left {
            Lane::Right
        } else if rng.gen_bool(0.5) {
            Lane::Left
        } else {
            Lane::Right
        }
    }

    fn assess_defensive_needs(&self, state: &GameState, rng: &mut impl Rng) -> Vec<DefensiveNeed> {
        let mut needs = vec![];
        for unit in state
            .enemy_units
            .iter()
            .filter(|u| u.threat_level >= ThreatLevel::High)
        {
            let counter_position = counter_position(&self.zones, unit, rng);
            let recommended_counter = *Counter::options_against(unit.unit_type)
                .choose(rng)
                .unwrap_or(&Counter::Generic);
            needs.push(DefensiveNeed {
                threat: unit.clone(),
                counter_position,
                recommended_counter,
                urgency: unit.threat_level.value(),
            });
        }
        needs
            .into_iter()
            .sorted_by(|a, b| b.urgency.cmp(&a.urgency))
            .collect()
    }

    fn evaluate_push_opportunity(
        &self,
        state: &GameState,
        elixir_advantage: i32,
        priority_lane: Lane,
        now: f32,
    ) -> PushOpportunity {
        let no_immediate_threats = Lane::ALL
            .iter()
            .all(|l| state.pressure(*l) < ThreatLevel::High);
        let rested = self
            .last_push_time
            .map(|last| now - last >= PUSH_COOLDOWN)
            .unwrap_or(true);

        let mut opportunity_score = 0;
        if elixir_advantage >= 2 {
            opportunity_score += 3;
        }
        if no_immediate_threats {
            opportunity_score += 2;
        }
        if rested {
            opportunity_score += 1;
        }
        PushOpportunity {
            should_push: opportunity_score >= 4,
            opportunity_score,
            recommended_lane: priority_lane,
            push_type: if elixir_advantage >= 4 {
                PushKind::Beatdown
            } else {
                PushKind::Pressure
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::testing::{state_with_units, unit_at};

    fn analyzer() -> TacticalAnalyzer {
        TacticalAnalyzer::new(Rc::new(Zones::default()))
    }

    #[test]
    fn beatdown_push_with_big_elixir_lead() {
        let mut state = GameState::default();
        state.our_elixir = 8;
        state.enemy_elixir_estimate = 2;
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let analysis = analyzer().analyze(&state, 5f32, &mut rng);
        assert_eq!(analysis.elixir_advantage, 6);
        assert!(analysis.push_opportunity.opportunity_score >= 4);
        assert!(analysis.push_opportunity.should_push);
        assert_eq!(analysis.push_opportunity.push_type, PushKind::Beatdown);
        assert_eq!(analysis.recommended_play_style, PlayStyle::Aggressive);
    }

    #[test]
    fn critical_unit_creates_urgent_need() {
        let state = state_with_units(vec![unit_at(Point::new(110, 430), Lane::Left, CardType::Tank)]);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let analysis = analyzer().analyze(&state, 5f32, &mut rng);
        assert_eq!(state.pressure(Lane::Left), ThreatLevel::Critical);
        assert_eq!(analysis.defensive_needs.len(), 1);
        assert_eq!(analysis.defensive_needs[0].urgency, 4);
        assert!(analysis.pressure.needs_immediate_defense);
        assert_eq!(analysis.pressure.max_pressure_lane, Lane::Left);
        assert_eq!(analysis.recommended_play_style, PlayStyle::Defensive);
        assert_eq!(analysis.priority_lane, Lane::Left);
        assert!(!analysis.push_opportunity.should_push);
    }

    #[test]
    fn needs_sorted_by_urgency() {
        let state = state_with_units(vec![
            unit_at(Point::new(150, 350), Lane::Left, CardType::Dps),
            unit_at(Point::new(530, 430), Lane::Right, CardType::Swarm),
            unit_at(Point::new(150, 50), Lane::Left, CardType::Dps),
        ]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let analysis = analyzer().analyze(&state, 5f32, &mut rng);
        let urgencies = analysis
            .defensive_needs
            .iter()
            .map(|n| n.urgency)
            .collect::<Vec<_>>();
        assert_eq!(urgencies, vec![4, 3]);
        assert_eq!(analysis.priority_lane, Lane::Left);
    }

    #[test]
    fn play_style_precedence() {
        let calm = PressureSummary {
            total_pressure: 2,
            max_pressure_lane: Lane::Left,
            needs_immediate_defense: false,
        };
        let hot = PressureSummary {
            needs_immediate_defense: true,
            ..calm
        };
        assert_eq!(TacticalAnalyzer::determine_play_style(&hot, 5), PlayStyle::Defensive);
        assert_eq!(TacticalAnalyzer::determine_play_style(&calm, 3), PlayStyle::Aggressive);
        assert_eq!(TacticalAnalyzer::determine_play_style(&calm, -2), PlayStyle::Cycle);
        assert_eq!(TacticalAnalyzer::determine_play_style(&calm, 1), PlayStyle::CounterPush);
    }

    #[test]
    fn priority_lane_prefers_weaker_tower() {
        let mut state = GameState::default();
        state.enemy_tower_health.right = 0.4f32;
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert_eq!(TacticalAnalyzer::select_priority_lane(&state, &mut rng), Lane::Right);
        state.enemy_tower_health.left = 0.2f32;
        assert_eq!(TacticalAnalyzer::select_priority_lane(&state, &mut rng), Lane::Left);
    }

    #[test]
    fn priority_lane_tie_is_random_flank() {
        let state = GameState::default();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let lanes = (0..64)
            .map(|_| TacticalAnalyzer::select_priority_lane(&state, &mut rng))
            .collect::<Vec<_>>();
        assert!(lanes.contains(&Lane::Left));
        assert!(lanes.contains(&Lane::Right));
        assert!(!lanes.contains(&Lane::Center));
    }

    #[test]
    fn push_cooldown_counts_toward_score() {
        let mut analyzer = analyzer();
        let mut state = GameState::default();
        state.our_elixir = 4;
        state.enemy_elixir_estimate = 2;
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert_eq!(analyzer.analyze(&state, 1f32, &mut rng).push_opportunity.opportunity_score, 6);
        analyzer.mark_push(10f32);
        let analysis = analyzer.analyze(&state, 20f32, &mut rng);
        assert_eq!(analysis.push_opportunity.opportunity_score, 5);
        assert_eq!(analysis.push_opportunity.push_type, PushKind::Pressure);
        assert_eq!(analyzer.analyze(&state, 25f32, &mut rng).push_opportunity.opportunity_score, 6);
    }

    #[test]
    fn tank_counter_pulled_toward_our_side() {
        let zones = Zones::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let tank = unit_at(Point::new(150, 285), Lane::Left, CardType::Tank);
        assert_eq!(counter_position(&zones, &tank, &mut rng), Point::new(150, 325));
        let deep = unit_at(Point::new(110, 430), Lane::Left, CardType::Tank);
        assert_eq!(counter_position(&zones, &deep, &mut rng), Point::new(110, 470));
    }

    #[test]
    fn tank_counter_stays_on_the_map() {
        let zones = Zones::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let tank = unit_at(Point::new(320, 620), Lane::Center, CardType::Tank);
        assert_eq!(counter_position(&zones, &tank, &mut rng), Point::new(320, 639));
    }

    #[test]
    fn other_counters_stay_near_threat() {
        let zones = Zones::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..32 {
            let swarm = unit_at(Point::new(150, 285), Lane::Left, CardType::Swarm);
            let p = counter_position(&zones, &swarm, &mut rng);
            assert!((90..=210).contains(&p.x));
            assert!((330..=360).contains(&p.y));
            let dps = unit_at(Point::new(150, 285), Lane::Left, CardType::Dps);
            let p = counter_position(&zones, &dps, &mut rng);
            assert!((120..=180).contains(&p.x));
            assert_eq!(p.y, 335);
        }
    }

    #[test]
    fn tower_advantage_sums_towers() {
        let mut state = GameState::default();
        state.enemy_tower_health.left = 0.5f32;
        state.our_tower_health.king = 0.75f32;
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let analysis = analyzer().analyze(&state, 1f32, &mut rng);
        assert!((analysis.tower_advantage - 0.25f32).abs() < 1e-6);
    }
}
