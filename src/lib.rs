//! Breakout - A brick-breaking arcade game simulation
//!
//! Core modules:
//! - `sim`: Simulation engine (entities, collision geometry, tick, snapshots)
//! - `scheduler`: Fixed-rate tick driver and row-descent driver
//! - `settings`: Session configuration (ball speed, frame rate, timers)
//! - `error`: Error types

pub mod error;
pub mod scheduler;
pub mod settings;
pub mod sim;

pub use error::{SettingsError, SimError};
pub use scheduler::Scheduler;
pub use settings::Settings;

/// Game configuration constants (logical coordinates, origin top-left, y down)
pub mod consts {
    /// Logical field dimensions
    pub const SCREEN_WIDTH: i32 = 800;
    pub const SCREEN_HEIGHT: i32 = 600;

    /// Paddle may travel this far past either side wall
    pub const PADDLE_OVERSCAN: i32 = 5;

    /// Paddle defaults
    pub const PADDLE_WIDTH: i32 = 100;
    pub const PADDLE_HEIGHT: i32 = 8;
    /// Gap between the paddle's bottom edge and the bottom of the field
    pub const PADDLE_BOTTOM_MARGIN: i32 = 50;
    /// Paddle moves this much faster than the ball
    pub const PADDLE_SPEED_FACTOR: f32 = 1.5;

    /// Ball defaults
    pub const BALL_DIAMETER: f32 = 10.0;

    /// Block defaults
    pub const BLOCK_WIDTH: i32 = 70;
    pub const BLOCK_HEIGHT: i32 = 30;
    pub const BLOCK_GAP: i32 = 2;
    pub const BLOCK_START_HEALTH: u32 = 1;

    /// Distance blocks drop on each row-descent firing
    pub const ROW_DESCENT_STEP: i32 = BLOCK_HEIGHT + BLOCK_GAP;
    /// Distance blocks are pushed back up after a block reaches the paddle
    pub const ROW_RESET_STEP: i32 = BLOCK_HEIGHT * 6 + 12;

    /// Scoring
    pub const BLOCK_HIT_SCORE: u64 = 10;
    pub const BOUNCE_SCORE: u64 = 1;
    pub const STARTING_LIVES: u32 = 3;

    /// Default session timing
    pub const DEFAULT_BALL_SPEED: u32 = 300;
    pub const DEFAULT_FRAME_RATE: u32 = 60;
    pub const DEFAULT_ROW_DESCENT_MS: u64 = 7000;
}
