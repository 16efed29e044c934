use std::collections::VecDeque;

use crate::emulator::{Emulator, Frame, StatusSink, ELIXIR_PIP, HEALTH_FULL};
use crate::error::{TacticianError, TacticianResult};
use crate::geometry::{Lane, Point, Side, Tower, Zones};
use crate::state::{CardType, EnemyUnit, GameState};
use crate::tracker::EnemyTracker;

pub const GRASS: [u8; 3] = [60, 140, 60];

/// Empty arena with every tower at full health and no elixir.
pub fn battlefield() -> Frame {
    let zones = Zones::default();
    let mut frame = Frame::filled(640, 640, GRASS);
    for side in [Side::Ours, Side::Enemy] {
        for tower in Tower::ALL {
            let anchor = zones.tower(side, tower);
            for x in anchor.x - 25..=anchor.x + 25 {
                frame.set_pixel(x, anchor.y - 20, HEALTH_FULL);
            }
        }
    }
    frame
}

pub fn paint_elixir(frame: &mut Frame, elixir: usize) {
    let zones = Zones::default();
    for pip in zones.elixir_bar.iter().take(elixir) {
        frame.set_pixel(pip.x, pip.y, ELIXIR_PIP);
    }
}

pub fn unit_at(position: Point, lane: Lane, unit_type: CardType) -> EnemyUnit {
    EnemyUnit::new(
        position,
        unit_type,
        0f32,
        EnemyTracker::assess_threat_level(position),
        lane,
    )
}

pub fn state_with_units(units: Vec<EnemyUnit>) -> GameState {
    let mut state = GameState::default();
    state.enemy_units = units;
    state.update_threat_levels();
    state
}

/// Emulator replaying canned frames and hands, recording every tap.
pub struct ScriptedEmulator {
    pub frames: VecDeque<Frame>,
    pub hands: VecDeque<Vec<usize>>,
    pub default_hand: Vec<usize>,
    pub battle_cycles: usize,
    pub fail_taps: bool,
    pub captures: usize,
    pub taps: Vec<Point>,
}

impl Default for ScriptedEmulator {
    fn default() -> Self {
        Self {
            frames: VecDeque::new(),
            hands: VecDeque::new(),
            default_hand: vec![0, 1, 2, 3],
            battle_cycles: 0,
            fail_taps: false,
            captures: 0,
            taps: vec![],
        }
    }
}

impl ScriptedEmulator {
    pub fn for_cycles(battle_cycles: usize) -> Self {
        Self {
            battle_cycles,
            ..Default::default()
        }
    }
}

impl Emulator for ScriptedEmulator {
    fn capture_frame(&mut self) -> TacticianResult<Frame> {
        self.captures += 1;
        Ok(self.frames.pop_front().unwrap_or_else(battlefield))
    }

    fn available_slots(&mut self) -> TacticianResult<Vec<usize>> {
        Ok(self
            .hands
            .pop_front()
            .unwrap_or_else(|| self.default_hand.clone()))
    }

    fn tap(&mut self, point: Point) -> TacticianResult<()> {
        if self.fail_taps {
            return Err(TacticianError::Emulator("device disconnected".to_string()));
        }
        self.taps.push(point);
        Ok(())
    }

    fn is_in_battle(&mut self) -> TacticianResult<bool> {
        if self.battle_cycles == 0 {
            return Ok(false);
        }
        self.battle_cycles -= 1;
        Ok(true)
    }
}

#[derive(Default)]
pub struct RecordingStatus {
    pub messages: Vec<String>,
}

impl StatusSink for RecordingStatus {
    fn report(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}
