use std::collections::{HashMap, HashSet, VecDeque};

use crate::geometry::{Lane, Point, Tower};
use crate::params::ENEMY_PLAY_HISTORY;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardType {
    Tank,
    Dps,
    Swarm,
    Spell,
    Building,
    WinCondition,
    Support,
    AntiAir,
}

impl CardType {
    /// Rough elixir cost of a card of this category.
    pub fn estimated_cost(&self) -> u32 {
        match self {
            CardType::Tank => 6,
            CardType::WinCondition => 4,
            CardType::Dps | CardType::Building => 4,
            CardType::Swarm | CardType::Spell | CardType::AntiAir => 3,
            CardType::Support => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ThreatLevel {
    None = 0,
    Low = 1,
    Medium = 2,
    High = 3,
    Critical = 4,
}

impl ThreatLevel {
    pub fn value(&self) -> u32 {
        *self as u32
    }
}

impl Default for ThreatLevel {
    fn default() -> Self {
        ThreatLevel::None
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnemyUnit {
    pub position: Point,
    pub unit_type: CardType,
    pub timestamp: f32,
    pub threat_level: ThreatLevel,
    pub lane: Lane,
    pub health_estimate: f32,
    // Never filled in: units are not tracked between scans.
    pub predicted_path: Option<Vec<Point>>,
}

impl EnemyUnit {
    pub fn new(
        position: Point,
        unit_type: CardType,
        timestamp: f32,
        threat_level: ThreatLevel,
        lane: Lane,
    ) -> Self {
        Self {
            position,
            unit_type,
            timestamp,
            threat_level,
            lane,
            health_estimate: 1f32,
            predicted_path: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnemyPlay {
    pub time: f32,
    pub lane: Lane,
    pub card_type: CardType,
    pub cost: u32,
    pub card: Option<String>,
}

impl EnemyPlay {
    pub fn new(time: f32, lane: Lane, card_type: CardType, cost: u32) -> Self {
        Self {
            time,
            lane,
            card_type,
            cost,
            card: None,
        }
    }

    pub fn with_card(mut self, card: &str) -> Self {
        self.card = Some(card.to_string());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TowerHealth {
    pub king: f32,
    pub left: f32,
    pub right: f32,
}

impl Default for TowerHealth {
    fn default() -> Self {
        Self {
            king: 1f32,
            left: 1f32,
            right: 1f32,
        }
    }
}

impl TowerHealth {
    pub fn get(&self, tower: Tower) -> f32 {
        match tower {
            Tower::King => self.king,
            Tower::Left => self.left,
            Tower::Right => self.right,
        }
    }

    pub fn set(&mut self, tower: Tower, health: f32) {
        let health = health.clamp(0f32, 1f32);
        match tower {
            Tower::King => self.king = health,
            Tower::Left => self.left = health,
            Tower::Right => self.right = health,
        }
    }

    pub fn total(&self) -> f32 {
        self.king + self.left + self.right
    }

    /// Weakest tower, first one wins on ties.
    pub fn weakest(&self) -> Tower {
        let mut weakest = Tower::ALL[0];
        for tower in Tower::ALL {
            if self.get(tower) < self.get(weakest) {
                weakest = tower;
            }
        }
        weakest
    }
}

#[derive(Debug, Clone)]
pub struct GameState {
    pub our_elixir: u32,
    pub enemy_elixir_estimate: u32,
    pub our_tower_health: TowerHealth,
    pub enemy_tower_health: TowerHealth,
    pub enemy_units: Vec<EnemyUnit>,
    pub last_enemy_plays: VecDeque<EnemyPlay>,
    pub enemy_deck_revealed: HashSet<String>,
    pub pressure_lanes: HashMap<Lane, ThreatLevel>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            our_elixir: 0,
            enemy_elixir_estimate: 0,
            our_tower_health: TowerHealth::default(),
            enemy_tower_health: TowerHealth::default(),
            enemy_units: vec![],
            last_enemy_plays: VecDeque::with_capacity(ENEMY_PLAY_HISTORY),
            enemy_deck_revealed: HashSet::new(),
            pressure_lanes: Lane::ALL.iter().map(|l| (*l, ThreatLevel::None)).collect(),
        }
    }
}

impl GameState {
    pub fn pressure(&self, lane: Lane) -> ThreatLevel {
        self.pressure_lanes.get(&lane).copied().unwrap_or_default()
    }

    pub fn push_enemy_play(&mut self, play: EnemyPlay) {
        while self.last_enemy_plays.len() >= ENEMY_PLAY_HISTORY {
            self.last_enemy_plays.pop_front();
        }
        if let Some(card) = &play.card {
            self.enemy_deck_revealed.insert(card.clone());
        }
        self.last_enemy_plays.push_back(play);
    }

    pub fn recent_enemy_plays(&self, count: usize) -> impl Iterator<Item = &EnemyPlay> {
        let skip = self.last_enemy_plays.len().saturating_sub(count);
        self.last_enemy_plays.iter().skip(skip)
    }

    pub fn update_threat_levels(&mut self) {
        for lane in Lane::ALL {
            let threat = self
                .enemy_units
                .iter()
                .filter(|u| u.lane == lane)
                .map(|u| u.threat_level)
                .max()
                .unwrap_or_default();
            self.pressure_lanes.insert(lane, threat);
        }
    }

    /// Lane under the worst threat, earlier lanes win ties.
    pub fn most_threatened_lane(&self) -> Lane {
        let mut best = Lane::ALL[0];
        for lane in Lane::ALL {
            if self.pressure(lane) > self.pressure(best) {
                best = lane;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(lane: Lane, threat: ThreatLevel) -> EnemyUnit {
        EnemyUnit::new(Point::new(0, 0), CardType::Dps, 0f32, threat, lane)
    }

    #[test]
    fn threat_order_is_total() {
        let levels = [
            ThreatLevel::None,
            ThreatLevel::Low,
            ThreatLevel::Medium,
            ThreatLevel::High,
            ThreatLevel::Critical,
        ];
        for window in levels.windows(2) {
            assert!(window[0] < window[1]);
            assert_eq!(window[0].value() + 1, window[1].value());
        }
    }

    #[test]
    fn lane_pressure_is_max_of_lane_units() {
        let mut state = GameState::default();
        state.enemy_units = vec![
            unit(Lane::Left, ThreatLevel::Low),
            unit(Lane::Left, ThreatLevel::High),
            unit(Lane::Right, ThreatLevel::Medium),
        ];
        state.update_threat_levels();
        assert_eq!(state.pressure(Lane::Left), ThreatLevel::High);
        assert_eq!(state.pressure(Lane::Right), ThreatLevel::Medium);
        assert_eq!(state.pressure(Lane::Center), ThreatLevel::None);
    }

    #[test]
    fn most_threatened_lane_ties_follow_enumeration() {
        let mut state = GameState::default();
        assert_eq!(state.most_threatened_lane(), Lane::Left);
        state.enemy_units = vec![
            unit(Lane::Right, ThreatLevel::Medium),
            unit(Lane::Center, ThreatLevel::Medium),
        ];
        state.update_threat_levels();
        assert_eq!(state.most_threatened_lane(), Lane::Right);
    }

    #[test]
    fn enemy_play_history_evicts_oldest() {
        let mut state = GameState::default();
        for i in 0..12 {
            state.push_enemy_play(EnemyPlay::new(i as f32, Lane::Left, CardType::Dps, 4));
        }
        assert_eq!(state.last_enemy_plays.len(), ENEMY_PLAY_HISTORY);
        assert_eq!(state.last_enemy_plays.front().map(|p| p.time), Some(4f32));
        let recent = state.recent_enemy_plays(3).map(|p| p.time).collect::<Vec<_>>();
        assert_eq!(recent, vec![9f32, 10f32, 11f32]);
    }

    #[test]
    fn revealed_cards_collected() {
        let mut state = GameState::default();
        state.push_enemy_play(EnemyPlay::new(1f32, Lane::Left, CardType::Spell, 4).with_card("fireball"));
        assert!(state.enemy_deck_revealed.contains("fireball"));
    }

    #[test]
    fn tower_health_is_clamped() {
        let mut towers = TowerHealth::default();
        towers.set(Tower::Left, 1.7f32);
        towers.set(Tower::Right, -0.2f32);
        assert_eq!(towers.left, 1f32);
        assert_eq!(towers.right, 0f32);
        assert_eq!(towers.weakest(), Tower::Right);
    }
}
