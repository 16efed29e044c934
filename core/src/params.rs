pub const SCAN_INTERVAL: f32 = 0.5f32;

pub const UNIT_SEARCH_RADIUS: i32 = 30;
pub const UNIT_SEARCH_STEP: usize = 5;
pub const CLASSIFY_RADIUS: i32 = 15;
pub const CLASSIFY_STEP: usize = 3;
pub const ENEMY_COLOR_TOLERANCE: u8 = 40;

pub const HEALTH_BAR_OFFSET: i32 = 20;
pub const HEALTH_BAR_HALF_WIDTH: i32 = 25;
pub const HEALTH_COLOR_TOLERANCE: u8 = 50;
pub const ELIXIR_COLOR_TOLERANCE: u8 = 45;

pub const ELIXIR_REGEN_PER_SECOND: f32 = 1.4f32;
pub const ELIXIR_WINDOW: f32 = 10f32;
pub const MAX_ELIXIR: u32 = 10;

pub const ENEMY_PLAY_HISTORY: usize = 8;
pub const RECENT_CARDS: usize = 4;
pub const SUCCESS_MEMORY: usize = 20;
pub const FAILURE_MEMORY: usize = 10;

pub const PUSH_COOLDOWN: f32 = 15f32;
pub const TANK_PULL_DISTANCE: f32 = 40f32;
pub const SPELL_PREDICTION_OFFSET: i32 = 15;

pub const EMOTE_CHANCE: f64 = 0.15f64;
pub const BASE_REACTION: f32 = 0.3f32;
pub const MIN_REACTION: f32 = 0.05f32;

pub const CARD_THINK_DELAY: f32 = 0.1f32;
pub const EMERGENCY_THINK_DELAY: f32 = 0.05f32;
pub const EMOTE_THINK_DELAY: f32 = 0.2f32;
