pub mod clock;
pub mod decision;
pub mod emulator;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod memory;
pub mod params;
pub mod placement;
pub mod routines;
pub mod selector;
pub mod state;
pub mod tactics;
pub mod tracker;

#[cfg(test)]
pub(crate) mod testing;

/// Lets a component run only when `interval` seconds passed since its last run.
pub struct RateLimiter {
    interval: f32,
    last_run: Option<f32>,
}

impl RateLimiter {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            last_run: None,
        }
    }

    pub fn ready(&mut self, now: f32) -> bool {
        if let Some(last_run) = self.last_run {
            if last_run + self.interval > now {
                return false;
            }
        }
        self.last_run = Some(now);
        true
    }

    pub fn reset(&mut self) {
        self.last_run = None;
    }
}
