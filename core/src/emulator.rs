use log::info;

use crate::error::{TacticianError, TacticianResult};
use crate::geometry::Point;

pub type Rgb = [u8; 3];

pub const ENEMY_PALETTE: [Rgb; 5] = [
    [255, 0, 0],
    [200, 50, 50],
    [180, 30, 30],
    [255, 100, 100],
    [220, 80, 80],
];
pub const HEALTH_FULL: Rgb = [0, 255, 0];
pub const ELIXIR_PIP: Rgb = [208, 32, 200];

/// Card slot anchors along the bottom of the screen.
pub const HAND_SLOTS: [Point; 4] = [
    Point::new(142, 561),
    Point::new(210, 563),
    Point::new(272, 561),
    Point::new(341, 563),
];

pub fn hand_anchor(slot: usize) -> TacticianResult<Point> {
    HAND_SLOTS
        .get(slot)
        .copied()
        .ok_or(TacticianError::InvalidSlot(slot))
}

pub fn color_matches(pixel: Rgb, target: Rgb, tolerance: u8) -> bool {
    pixel
        .iter()
        .zip(target.iter())
        .all(|(p, t)| p.abs_diff(*t) <= tolerance)
}

/// Row-major screenshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl Frame {
    pub fn filled(width: usize, height: usize, color: Rgb) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(self.pixels[y as usize * self.width + x as usize])
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgb) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        self.pixels[y as usize * self.width + x as usize] = color;
    }

    /// Paints the square of side `2 * radius + 1` centered on `center`.
    pub fn fill_square(&mut self, center: Point, radius: i32, color: Rgb) {
        for y in center.y - radius..=center.y + radius {
            for x in center.x - radius..=center.x + radius {
                self.set_pixel(x, y, color);
            }
        }
    }
}

/// Everything the engine needs from the device running the game.
pub trait Emulator {
    fn capture_frame(&mut self) -> TacticianResult<Frame>;

    fn available_slots(&mut self) -> TacticianResult<Vec<usize>>;

    fn tap(&mut self, point: Point) -> TacticianResult<()>;

    fn is_in_battle(&mut self) -> TacticianResult<bool>;
}

pub trait StatusSink {
    fn report(&mut self, message: &str);
}

#[derive(Default)]
pub struct LogStatus {}

impl StatusSink for LogStatus {
    fn report(&mut self, message: &str) {
        info!("{message}");
    }
}
