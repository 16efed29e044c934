use std::rc::Rc;

use log::{debug, trace};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use tactician_core::clock::Clock;
use tactician_core::emulator::{
    Emulator, Frame, Rgb, ELIXIR_PIP, ENEMY_PALETTE, HAND_SLOTS, HEALTH_FULL,
};
use tactician_core::error::TacticianResult;
use tactician_core::geometry::{Lane, Point, Side, Tower, Zones};
use tactician_core::params::{HEALTH_BAR_HALF_WIDTH, HEALTH_BAR_OFFSET, MAX_ELIXIR};
use tactician_core::selector::CardSelector;
use tactician_core::state::TowerHealth;

const GRASS: Rgb = [60, 140, 60];
const HEALTH_LOST: Rgb = [40, 40, 40];
const ARENA_SIZE: usize = 640;
const UNIT_RADIUS: i32 = 12;
const UNIT_SPEED: f32 = 30f32;
const ELIXIR_PER_SECOND: f32 = 1f32 / 2.8f32;
const CARD_REACH: f32 = 80f32;
const TOWER_HIT: f32 = 0.1f32;
const PUSH_HIT: f32 = 0.05f32;

struct Marcher {
    spawn: Point,
    lane: Lane,
    spawned_at: f32,
    color: Rgb,
}

impl Marcher {
    fn position(&self, now: f32) -> Point {
        let travelled = ((now - self.spawned_at) * UNIT_SPEED) as i32;
        self.spawn.offset(0, travelled)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ArenaSummary {
    pub spawned: u32,
    pub defended: u32,
    pub leaked: u32,
    pub deployed: u32,
    pub our_towers: TowerHealth,
    pub enemy_towers: TowerHealth,
}

/// Headless stand-in for the game client: enemies march down their lanes,
/// our cards remove whatever they land close to.
pub struct SimulatedArena {
    zones: Rc<Zones>,
    clock: Box<dyn Clock>,
    rng: ChaCha8Rng,
    started: f32,
    duration: f32,
    elixir: f32,
    last_regen: f32,
    next_spawn: f32,
    marchers: Vec<Marcher>,
    selected: Option<usize>,
    summary: ArenaSummary,
}

impl SimulatedArena {
    pub fn new(zones: Rc<Zones>, clock: Box<dyn Clock>, seed: u64, duration: f32) -> Self {
        let started = clock.now();
        Self {
            zones,
            clock,
            rng: ChaCha8Rng::seed_from_u64(seed),
            started,
            duration,
            elixir: 5f32,
            last_regen: started,
            next_spawn: started + 5f32,
            marchers: vec![],
            selected: None,
            summary: ArenaSummary::default(),
        }
    }

    pub fn summary(&self) -> ArenaSummary {
        self.summary
    }

    fn cost(slot: usize) -> f32 {
        CardSelector::card_type(slot).estimated_cost() as f32
    }

    fn simulate(&mut self) {
        let now = self.clock.now();
        self.elixir =
            (self.elixir + (now - self.last_regen) * ELIXIR_PER_SECOND).min(MAX_ELIXIR as f32);
        self.last_regen = now;

        if now >= self.next_spawn {
            let lane = *Lane::ALL.choose(&mut self.rng).unwrap_or(&Lane::Center);
            let color = *ENEMY_PALETTE.choose(&mut self.rng).unwrap_or(&ENEMY_PALETTE[0]);
            debug!("Enemy spawns on {:?} at {:.1}", lane, now - self.started);
            self.marchers.push(Marcher {
                spawn: self.zones.enemy_spawn.get(lane),
                lane,
                spawned_at: now,
                color,
            });
            self.summary.spawned += 1;
            self.next_spawn = now + self.rng.gen_range(3f32..8f32);
        }

        let line = self.zones.defense_line;
        let mut leaked = vec![];
        self.marchers.retain(|m| {
            if m.position(now).y >= line {
                leaked.push(m.lane);
                false
            } else {
                true
            }
        });
        for lane in leaked {
            let tower = Tower::of_lane(lane);
            let health = self.summary.our_towers.get(tower);
            self.summary.our_towers.set(tower, health - TOWER_HIT);
            self.summary.leaked += 1;
        }
    }

    fn deploy(&mut self, slot: usize, position: Point) {
        let cost = Self::cost(slot);
        if self.elixir < cost {
            trace!("Slot {} needs {} elixir, have {:.1}", slot, cost, self.elixir);
            return;
        }
        self.elixir -= cost;
        self.summary.deployed += 1;

        let now = self.clock.now();
        let before = self.marchers.len();
        self.marchers
            .retain(|m| m.position(now).distance(position) > CARD_REACH);
        self.summary.defended += (before - self.marchers.len()) as u32;

        if position.y < self.zones.bridge.center.y {
            let tower = if position.x < self.zones.enemy_king.x {
                Tower::Left
            } else {
                Tower::Right
            };
            let health = self.summary.enemy_towers.get(tower);
            self.summary.enemy_towers.set(tower, health - PUSH_HIT);
        }
    }

    fn paint_towers(&self, frame: &mut Frame) {
        for (side, towers) in [
            (Side::Ours, &self.summary.our_towers),
            (Side::Enemy, &self.summary.enemy_towers),
        ] {
            for tower in Tower::ALL {
                let anchor = self.zones.tower(side, tower);
                let width = 2 * HEALTH_BAR_HALF_WIDTH + 1;
                let healthy = (towers.get(tower) * width as f32).round() as i32;
                for (i, x) in (anchor.x - HEALTH_BAR_HALF_WIDTH..=anchor.x + HEALTH_BAR_HALF_WIDTH)
                    .enumerate()
                {
                    let color = if (i as i32) < healthy {
                        HEALTH_FULL
                    } else {
                        HEALTH_LOST
                    };
                    frame.set_pixel(x, anchor.y - HEALTH_BAR_OFFSET, color);
                }
            }
        }
    }
}

impl Emulator for SimulatedArena {
    fn capture_frame(&mut self) -> TacticianResult<Frame> {
        self.simulate();
        let now = self.clock.now();
        let mut frame = Frame::filled(ARENA_SIZE, ARENA_SIZE, GRASS);
        self.paint_towers(&mut frame);
        for pip in self.zones.elixir_bar.iter().take(self.elixir as usize) {
            frame.set_pixel(pip.x, pip.y, ELIXIR_PIP);
        }
        for marcher in &self.marchers {
            frame.fill_square(marcher.position(now), UNIT_RADIUS, marcher.color);
        }
        Ok(frame)
    }

    fn available_slots(&mut self) -> TacticianResult<Vec<usize>> {
        self.simulate();
        Ok((0..HAND_SLOTS.len())
            .filter(|slot| Self::cost(*slot) <= self.elixir)
            .collect())
    }

    fn tap(&mut self, point: Point) -> TacticianResult<()> {
        if let Some(slot) = HAND_SLOTS.iter().position(|anchor| *anchor == point) {
            self.selected = Some(slot);
            return Ok(());
        }
        match self.selected.take() {
            Some(slot) => {
                self.simulate();
                self.deploy(slot, point);
            }
            None => trace!("Tap at {:?}", point),
        }
        Ok(())
    }

    fn is_in_battle(&mut self) -> TacticianResult<bool> {
        let towers = &self.summary.our_towers;
        let overrun = towers.left <= 0f32 && towers.right <= 0f32;
        Ok(!overrun && self.clock.now() - self.started < self.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactician_core::clock::ManualClock;
    use tactician_core::emulator::hand_anchor;

    fn arena(clock: &ManualClock) -> SimulatedArena {
        SimulatedArena::new(Rc::new(Zones::default()), Box::new(clock.clone()), 3, 60f32)
    }

    #[test]
    fn battle_lasts_for_duration() {
        let mut clock = ManualClock::default();
        let mut arena = arena(&clock);
        assert_eq!(arena.is_in_battle(), Ok(true));
        clock.advance(59f32);
        assert_eq!(arena.is_in_battle(), Ok(true));
        clock.advance(1f32);
        assert_eq!(arena.is_in_battle(), Ok(false));
    }

    #[test]
    fn hand_follows_elixir() {
        let clock = ManualClock::default();
        let mut arena = arena(&clock);
        // Starts at 5: everything but the tank.
        assert_eq!(arena.available_slots(), Ok(vec![1, 2, 3]));
        arena.tap(hand_anchor(1).unwrap()).unwrap();
        arena.tap(Point::new(150, 350)).unwrap();
        assert_eq!(arena.available_slots(), Ok(vec![]));
        assert_eq!(arena.summary().deployed, 1);
    }

    #[test]
    fn cards_clear_nearby_enemies() {
        let mut clock = ManualClock::default();
        let mut arena = arena(&clock);
        clock.advance(5f32);
        arena.capture_frame().unwrap();
        assert_eq!(arena.summary().spawned, 1);
        let target = arena.marchers[0].position(clock.now());
        arena.tap(hand_anchor(3).unwrap()).unwrap();
        arena.tap(target).unwrap();
        assert!(arena.marchers.is_empty());
        assert_eq!(arena.summary().defended, 1);
    }
}
