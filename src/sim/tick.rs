//! Fixed-step simulation tick
//!
//! Core game loop that advances the simulation by one frame. All input for a
//! frame is applied first, then entities move and collisions resolve.

use super::collision::{CollisionAxis, collision_axis};
use super::state::{GameState, LaunchIntent};
use crate::consts::*;

/// Input for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Held left intent
    pub move_left: bool,
    /// Held right intent
    pub move_right: bool,
    /// Absolute paddle x from pointer input (unclamped)
    pub paddle_x: Option<i32>,
    /// Launch with the given intent (keyboard)
    pub launch: Option<LaunchIntent>,
    /// Launch with a random intent (pointer click)
    pub launch_random: bool,
    /// Launch in the direction the paddle is held (space bar)
    pub launch_from_paddle: bool,
    /// Idle/demo mode - autopilot plays the game
    pub idle_mode: bool,
}

impl TickInput {
    /// Drop one-shot commands after a tick consumed them; held intents persist
    pub fn clear_one_shot(&mut self) {
        self.paddle_x = None;
        self.launch = None;
        self.launch_random = false;
        self.launch_from_paddle = false;
    }
}

/// What the block scan resolved this tick
enum BlockScan {
    Clear,
    Hit,
    TooLow,
}

/// Write a frame's input into the entities
///
/// Launch commands only take effect while the ball rests on the paddle.
pub fn apply_input(state: &mut GameState, input: &TickInput) {
    if state.is_game_over() {
        return;
    }

    state.paddle.move_left = input.move_left;
    state.paddle.move_right = input.move_right;
    if let Some(x) = input.paddle_x {
        state.paddle.set_absolute_x(x);
    }

    if let Some(intent) = input.launch {
        state.launch_with(intent);
    } else if input.launch_from_paddle {
        state.launch_with(LaunchIntent::from_paddle(&state.paddle));
    } else if input.launch_random {
        state.launch_random();
    }

    if input.idle_mode {
        autopilot(state);
    }
}

/// Serve immediately, then chase the ball with the paddle center
fn autopilot(state: &mut GameState) {
    if !state.ball.launched {
        state.launch_random();
        return;
    }

    let ball_center = state.ball.pos.x + state.ball.diameter / 2.0;
    let delta = ball_center - state.paddle.center_x();
    let dead_zone = state.paddle_step.max(1) as f32;

    state.paddle.move_left = delta < -dead_zone;
    state.paddle.move_right = delta > dead_zone;
}

/// Advance the game state by one tick
///
/// Does nothing once the game is over.
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.is_game_over() {
        return;
    }

    apply_input(state, input);
    state.time_ticks += 1;

    state.paddle.update(state.paddle_step);
    state.ball.update(&state.paddle, state.ball_step);

    // --- BLOCKS ---
    match scan_blocks(state) {
        BlockScan::TooLow => {
            if state.lose_life() {
                return;
            }
            log::info!("Blocks reached the paddle, {} lives left", state.lives);
            state.ball.reset(&state.paddle);
            for block in &mut state.blocks {
                block.move_up();
            }
        }
        BlockScan::Hit | BlockScan::Clear => {}
    }

    // --- PADDLE / WALLS / FLOOR ---
    let ball = state.ball.bounds();
    if ball.intersects(&state.paddle.bounds()) {
        state.score += BOUNCE_SCORE;
        // A straight-up ball picks up the paddle's lateral motion
        if state.ball.direction.x == 0 {
            if state.paddle.move_left {
                state.ball.direction.x = -1;
            } else if state.paddle.move_right {
                state.ball.direction.x = 1;
            }
        }
        state.ball.bounce_horizontal();
    } else if ball.left() <= 0.0 || ball.right() >= SCREEN_WIDTH as f32 {
        state.score += BOUNCE_SCORE;
        state.ball.bounce_vertical();
    } else if ball.top() <= 0.0 {
        state.score += BOUNCE_SCORE;
        state.ball.bounce_horizontal();
    } else if ball.bottom() >= SCREEN_HEIGHT as f32 {
        if state.lose_life() {
            return;
        }
        log::info!("Ball lost, {} lives left", state.lives);
        state.ball.reset(&state.paddle);
    }
}

/// Resolve at most one block event, in collection order
///
/// The first live block the ball touches takes the hit. A block whose bottom
/// passed the paddle's top only counts if no earlier block was hit.
fn scan_blocks(state: &mut GameState) -> BlockScan {
    let ball = state.ball.bounds();
    let paddle_top = state.paddle.pos.y;

    for block in state.blocks.iter_mut().filter(|b| b.is_alive()) {
        let axis = collision_axis(&ball, &block.bounds());
        if axis != CollisionAxis::None {
            block.hit();
            state.score += BLOCK_HIT_SCORE;
            match axis {
                CollisionAxis::Vertical => state.ball.bounce_vertical(),
                CollisionAxis::Horizontal => state.ball.bounce_horizontal(),
                CollisionAxis::None => {}
            }
            if !block.is_alive() {
                log::debug!("Block at ({}, {}) destroyed", block.pos.x, block.pos.y);
            }
            return BlockScan::Hit;
        }

        if block.bottom() > paddle_top {
            return BlockScan::TooLow;
        }
    }

    BlockScan::Clear
}

/// Row-descent: drop every block by one row step
///
/// Does nothing once the game is over.
pub fn descend_rows(state: &mut GameState) {
    if state.is_game_over() {
        return;
    }
    for block in &mut state.blocks {
        block.move_down();
    }
    log::debug!("Rows descended at tick {}", state.time_ticks);
}
