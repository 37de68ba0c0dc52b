//! Simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Fixed logical coordinates (800x600), no device scaling
//! - Fixed per-tick steps derived from settings
//! - Stable iteration order (block collection order)
//! - No rendering, timing or platform dependencies

pub mod collision;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{CollisionAxis, Rect, collision_axis};
pub use snapshot::{BallView, BlockView, PaddleView, Snapshot};
pub use state::{Ball, Block, GamePhase, GameState, LaunchIntent, Paddle, initial_blocks};
pub use tick::{TickInput, apply_input, descend_rows, tick};
