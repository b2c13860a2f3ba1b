//! Cave Runner - simulation core for an endless side-scrolling cave runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (terrain generation, physics, hazard timing)
//! - `view`: Geometry query surface for an external renderer
//! - `highscores`: Reference high-score collaborator (single persisted scalar)
//! - `settings`: Runtime configuration loaded from JSON

pub mod error;
pub mod highscores;
pub mod settings;
pub mod sim;
pub mod view;

pub use error::{GenerationError, PersistenceError, RunError};
pub use highscores::{HighScore, Scoreboard};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (100 Hz)
    pub const SIM_DT: f32 = 0.01;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Corridor dimensions (pixels)
    pub const CORRIDOR_WIDTH: i32 = 800;
    pub const CORRIDOR_HEIGHT: i32 = 400;

    /// Player sprite box
    pub const PLAYER_WIDTH: i32 = 100;
    pub const PLAYER_HEIGHT: i32 = 74;
    /// Where the player is placed after every regeneration
    pub const PLAYER_START_X: i32 = -PLAYER_WIDTH / 2;
    pub const PLAYER_START_Y: i32 = 200;
    /// Leftward movement stops once x reaches this
    pub const PLAYER_MIN_X: i32 = -30;

    /// Movement, per tick
    pub const WALK_SPEED: i32 = 4;
    pub const JUMP_IMPULSE: i32 = 15;
    pub const GRAVITY: i32 = 1;

    /// Collision tolerances (pixels)
    pub const CEILING_TOLERANCE: i32 = 5;
    pub const CUTOFF_JUMP_TOLERANCE: i32 = 50;
    pub const GAP_EDGE_TOLERANCE: i32 = 10;
    pub const HEAD_CLEARANCE: i32 = 10;

    /// Terrain block geometry
    pub const BLOCK_WIDTH: i32 = 40;
    pub const BLOCK_COUNT: usize = (CORRIDOR_WIDTH / BLOCK_WIDTH) as usize;
    pub const GAP: i32 = PLAYER_HEIGHT + 20;
    pub const SEPARATION: i32 = GAP * 2;
    pub const JUMP_FALL_HEIGHT: i32 = 100;
    pub const TOLERANCE: i32 = GAP / 3;
    pub const TOP_BOTTOM_DISTANCE: i32 = 20;

    /// Closure above which a standing player's head is crushed
    pub const KILL_CLOSURE: i32 = SEPARATION - PLAYER_HEIGHT + HEAD_CLEARANCE;

    /// Generation odds
    pub const GAP_CHANCE: f64 = 0.1;
    pub const JUMP_FALL_CHANCE: f64 = 0.1;
    /// Longest allowed run of non-gap blocks
    pub const MAX_BLOCKS_WITHOUT_GAP: u32 = 10;
    /// Gap counter carried by the first block of a sequence
    pub const FIRST_BLOCK_GAP_COUNTER: u32 = 8;
    /// Rejection-sampling retry bound for level blocks
    pub const MAX_HEIGHT_ATTEMPTS: u32 = 10_000;

    /// Hazard timing (seconds)
    pub const FIRST_CLOSE_DELAY_SECS: f32 = 5.0;
    pub const MIN_ANIMATION_SECS: f32 = 0.01;

    /// Sprite frames advance once every this many ticks
    pub const ANIMATION_FRAME_TICKS: u64 = 7;
}

/// Split a player x coordinate into (block index, offset within that block),
/// measured at the player's horizontal center.
#[inline]
pub fn locate_block(player_x: i32) -> (usize, i32) {
    use consts::{BLOCK_WIDTH, PLAYER_WIDTH};
    let center = player_x + PLAYER_WIDTH / 2;
    let index = center.div_euclid(BLOCK_WIDTH).max(0) as usize;
    (index, center.rem_euclid(BLOCK_WIDTH))
}
