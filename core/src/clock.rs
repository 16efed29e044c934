use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Monotonic seconds plus the pacing sleeps of the battle loop.
pub trait Clock {
    fn now(&self) -> f32;

    fn sleep(&mut self, seconds: f32);
}

pub struct SystemClock {
    start: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }

    fn sleep(&mut self, seconds: f32) {
        if seconds > 0f32 {
            std::thread::sleep(Duration::from_secs_f32(seconds));
        }
    }
}

/// Virtual time, only advanced by sleeping. Clones share the same timeline.
#[derive(Default, Debug, Clone)]
pub struct ManualClock {
    time: Rc<Cell<f32>>,
}

impl ManualClock {
    pub fn starting_at(time: f32) -> Self {
        Self {
            time: Rc::new(Cell::new(time)),
        }
    }

    pub fn advance(&mut self, seconds: f32) {
        self.time.set(self.time.get() + seconds.max(0f32));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f32 {
        self.time.get()
    }

    fn sleep(&mut self, seconds: f32) {
        self.advance(seconds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_only_moves_forward() {
        let mut clock = ManualClock::starting_at(2f32);
        clock.sleep(0.5f32);
        clock.sleep(-1f32);
        assert_eq!(clock.now(), 2.5f32);
    }

    #[test]
    fn clones_share_time() {
        let mut clock = ManualClock::default();
        let observer = clock.clone();
        clock.advance(3f32);
        assert_eq!(observer.now(), 3f32);
    }
}
