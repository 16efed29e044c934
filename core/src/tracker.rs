use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use itertools::Itertools;
use log::debug;

use crate::emulator::{color_matches, Emulator, Frame, ELIXIR_PIP, ENEMY_PALETTE, HEALTH_FULL};
use crate::error::TacticianResult;
use crate::geometry::{Lane, Point, Side, Tower, Zones};
use crate::params::*;
use crate::state::{CardType, EnemyPlay, EnemyUnit, GameState, ThreatLevel};
use crate::RateLimiter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prediction {
    Unknown,
    Defensive,
    Attack(Lane),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovePrediction {
    pub prediction: Prediction,
    pub confidence: f32,
}

pub struct EnemyTracker {
    zones: Rc<Zones>,
    pub game_state: GameState,
    response_patterns: HashMap<[Lane; 3], Prediction>,
    occupied_spawns: HashSet<Point>,
    limiter: RateLimiter,
}

impl EnemyTracker {
    pub fn new(zones: Rc<Zones>) -> Self {
        Self {
            zones,
            game_state: GameState::default(),
            response_patterns: HashMap::new(),
            occupied_spawns: HashSet::new(),
            limiter: RateLimiter::new(SCAN_INTERVAL),
        }
    }

    pub fn reset(&mut self) {
        self.game_state = GameState::default();
        self.response_patterns.clear();
        self.occupied_spawns.clear();
        self.limiter.reset();
    }

    /// Refreshes the game state from a new screenshot, at most once every
    /// `SCAN_INTERVAL` seconds. Returns whether a scan happened.
    pub fn scan(&mut self, emulator: &mut dyn Emulator, now: f32) -> TacticianResult<bool> {
        if !self.limiter.ready(now) {
            return Ok(false);
        }
        let frame = emulator.capture_frame()?;
        self.scan_frame(&frame, now);
        Ok(true)
    }

    pub fn scan_frame(&mut self, frame: &Frame, now: f32) {
        self.detect_enemy_units(frame, now);
        self.record_spawn_plays(now);
        self.estimate_enemy_elixir(now);
        self.analyze_tower_health(frame);
        self.game_state.our_elixir = self.read_our_elixir(frame);
        self.game_state.update_threat_levels();
        debug!(
            "Scan at {:.1}: units [{}] elixir {} vs {}",
            now,
            self.game_state
                .enemy_units
                .iter()
                .map(|u| format!("{:?}@{:?}", u.unit_type, u.lane))
                .join(", "),
            self.game_state.our_elixir,
            self.game_state.enemy_elixir_estimate
        );
    }

    fn detect_enemy_units(&mut self, frame: &Frame, now: f32) {
        let units = self
            .zones
            .probes()
            .into_iter()
            .filter(|(position, _)| Self::detect_unit_at_position(frame, *position))
            .map(|(position, lane)| {
                EnemyUnit::new(
                    position,
                    Self::classify_unit_type(frame, position),
                    now,
                    Self::assess_threat_level(position),
                    lane,
                )
            })
            .collect();
        self.game_state.enemy_units = units;
    }

    fn detect_unit_at_position(frame: &Frame, position: Point) -> bool {
        for dx in (-UNIT_SEARCH_RADIUS..UNIT_SEARCH_RADIUS).step_by(UNIT_SEARCH_STEP) {
            for dy in (-UNIT_SEARCH_RADIUS..UNIT_SEARCH_RADIUS).step_by(UNIT_SEARCH_STEP) {
                if let Some(pixel) = frame.pixel(position.x + dx, position.y + dy) {
                    if Self::is_enemy_unit_pixel(pixel) {
                        return true;
                    }
                }
            }
        }
        false
    }

    fn is_enemy_unit_pixel(pixel: [u8; 3]) -> bool {
        ENEMY_PALETTE
            .iter()
            .any(|color| color_matches(pixel, *color, ENEMY_COLOR_TOLERANCE))
    }

    // Brightness bands are a coarse guess, not a real classifier.
    fn classify_unit_type(frame: &Frame, position: Point) -> CardType {
        let mut total = 0u32;
        let mut samples = 0u32;
        for dx in (-CLASSIFY_RADIUS..=CLASSIFY_RADIUS).step_by(CLASSIFY_STEP) {
            for dy in (-CLASSIFY_RADIUS..=CLASSIFY_RADIUS).step_by(CLASSIFY_STEP) {
                if let Some(pixel) = frame.pixel(position.x + dx, position.y + dy) {
                    total += pixel.iter().map(|c| *c as u32).sum::<u32>();
                    samples += 1;
                }
            }
        }
        let brightness = if samples == 0 {
            0f32
        } else {
            total as f32 / (samples * 3) as f32
        };
        if brightness > 200f32 {
            CardType::Spell
        } else if brightness > 150f32 {
            CardType::Swarm
        } else if brightness > 100f32 {
            CardType::Dps
        } else {
            CardType::Tank
        }
    }

    pub fn assess_threat_level(position: Point) -> ThreatLevel {
        if position.y > 400 {
            ThreatLevel::Critical
        } else if position.y > 300 {
            ThreatLevel::High
        } else if position.y > 200 {
            ThreatLevel::Medium
        } else {
            ThreatLevel::Low
        }
    }

    fn record_spawn_plays(&mut self, now: f32) {
        let spawned = self
            .game_state
            .enemy_units
            .iter()
            .filter(|u| self.zones.is_enemy_spawn(u.position))
            .map(|u| (u.position, u.lane, u.unit_type))
            .collect::<Vec<_>>();
        let occupied = spawned.iter().map(|(p, _, _)| *p).collect::<HashSet<_>>();
        for (position, lane, unit_type) in spawned {
            if !self.occupied_spawns.contains(&position) {
                debug!("Enemy deployed {:?} on {:?}", unit_type, lane);
                self.record_enemy_play(EnemyPlay::new(
                    now,
                    lane,
                    unit_type,
                    unit_type.estimated_cost(),
                ));
            }
        }
        self.occupied_spawns = occupied;
    }

    /// Stores an observed enemy play and learns which lane followed the
    /// previous three plays.
    pub fn record_enemy_play(&mut self, play: EnemyPlay) {
        if let Some(pattern) = self.lane_pattern() {
            self.response_patterns
                .insert(pattern, Prediction::Attack(play.lane));
        }
        self.game_state.push_enemy_play(play);
    }

    fn lane_pattern(&self) -> Option<[Lane; 3]> {
        if self.game_state.last_enemy_plays.len() < 3 {
            return None;
        }
        let lanes = self
            .game_state
            .recent_enemy_plays(3)
            .map(|p| p.lane)
            .collect::<Vec<_>>();
        Some([lanes[0], lanes[1], lanes[2]])
    }

    fn estimate_enemy_elixir(&mut self, now: f32) {
        let recent_plays = self
            .game_state
            .last_enemy_plays
            .iter()
            .filter(|p| now - p.time < ELIXIR_WINDOW)
            .collect::<Vec<_>>();
        let spent = recent_plays.iter().map(|p| p.cost).sum::<u32>() as f32;
        let time_passed = recent_plays
            .iter()
            .map(|p| p.time)
            .reduce(f32::min)
            .map(|oldest| (now - oldest).max(1f32))
            .unwrap_or(ELIXIR_WINDOW);
        let generated = time_passed * ELIXIR_REGEN_PER_SECOND;
        self.game_state.enemy_elixir_estimate =
            (generated - spent).clamp(0f32, MAX_ELIXIR as f32) as u32;
    }

    fn analyze_tower_health(&mut self, frame: &Frame) {
        for tower in Tower::ALL {
            let enemy = Self::estimate_tower_health(frame, self.zones.tower(Side::Enemy, tower));
            let ours = Self::estimate_tower_health(frame, self.zones.tower(Side::Ours, tower));
            self.game_state.enemy_tower_health.set(tower, enemy);
            self.game_state.our_tower_health.set(tower, ours);
        }
    }

    fn estimate_tower_health(frame: &Frame, anchor: Point) -> f32 {
        let bar_y = anchor.y - HEALTH_BAR_OFFSET;
        let mut full = 0u32;
        let mut total = 0u32;
        for x in anchor.x - HEALTH_BAR_HALF_WIDTH..=anchor.x + HEALTH_BAR_HALF_WIDTH {
            if let Some(pixel) = frame.pixel(x, bar_y) {
                total += 1;
                if color_matches(pixel, HEALTH_FULL, HEALTH_COLOR_TOLERANCE) {
                    full += 1;
                }
            }
        }
        if total == 0 {
            return 1f32;
        }
        full as f32 / total as f32
    }

    fn read_our_elixir(&self, frame: &Frame) -> u32 {
        self.zones
            .elixir_bar
            .iter()
            .take_while(|pip| {
                frame
                    .pixel(pip.x, pip.y)
                    .map(|p| color_matches(p, ELIXIR_PIP, ELIXIR_COLOR_TOLERANCE))
                    .unwrap_or(false)
            })
            .count() as u32
    }

    pub fn most_threatened_lane(&self) -> Lane {
        self.game_state.most_threatened_lane()
    }

    pub fn predict_enemy_next_move(&self) -> MovePrediction {
        match self.lane_pattern() {
            None => MovePrediction {
                prediction: Prediction::Unknown,
                confidence: 0f32,
            },
            Some(pattern) => match self.response_patterns.get(&pattern) {
                Some(prediction) => MovePrediction {
                    prediction: *prediction,
                    confidence: 0.8f32,
                },
                None => MovePrediction {
                    prediction: Prediction::Defensive,
                    confidence: 0.3f32,
                },
            },
        }
    }
}
