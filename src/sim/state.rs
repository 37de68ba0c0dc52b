//! Game state and entity types
//!
//! The `GameState` owns every entity. Entities never reference each other;
//! cross-entity effects are applied by the tick.

use glam::{IVec2, Vec2};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::snapshot::{BallView, BlockView, PaddleView, Snapshot};
use crate::consts::*;
use crate::error::SimError;
use crate::settings::Settings;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay (ball may still be resting on the paddle)
    Playing,
    /// Lives ran out; terminal
    GameOver,
}

/// Lateral direction given to the ball as it leaves the paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaunchIntent {
    Left,
    Still,
    Right,
}

impl LaunchIntent {
    /// Horizontal direction component for this intent
    pub fn dx(self) -> i32 {
        match self {
            LaunchIntent::Left => -1,
            LaunchIntent::Still => 0,
            LaunchIntent::Right => 1,
        }
    }

    /// Intent matching the paddle's held movement (left wins)
    pub fn from_paddle(paddle: &Paddle) -> Self {
        if paddle.move_left {
            LaunchIntent::Left
        } else if paddle.move_right {
            LaunchIntent::Right
        } else {
            LaunchIntent::Still
        }
    }

    /// Uniformly random intent
    pub fn random(rng: &mut impl Rng) -> Self {
        match rng.random_range(-1..=1) {
            -1 => LaunchIntent::Left,
            0 => LaunchIntent::Still,
            _ => LaunchIntent::Right,
        }
    }
}

impl TryFrom<i32> for LaunchIntent {
    type Error = SimError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(LaunchIntent::Left),
            0 => Ok(LaunchIntent::Still),
            1 => Ok(LaunchIntent::Right),
            other => Err(SimError::InvalidLaunchIntent(other)),
        }
    }
}

/// The ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    /// Top-left of the bounding square
    pub pos: Vec2,
    pub diameter: f32,
    pub launched: bool,
    /// Travel direction, each component in {-1, 0, 1}
    pub direction: IVec2,
}

impl Ball {
    pub fn new(pos: Vec2, diameter: f32) -> Self {
        Self {
            pos,
            diameter,
            launched: false,
            direction: IVec2::ZERO,
        }
    }

    /// Leave the paddle, always travelling upward
    pub fn launch(&mut self, intent: LaunchIntent) {
        self.launched = true;
        self.direction = IVec2::new(intent.dx(), -1);
    }

    /// Rest centered on top of the paddle
    pub fn follow(&mut self, paddle: &Paddle) {
        self.pos.x = paddle.pos.x as f32 + (paddle.width / 2) as f32 - self.diameter / 2.0;
        self.pos.y = paddle.pos.y as f32 - self.diameter;
    }

    /// Advance one tick: track the paddle until launched, then travel `step` per axis
    pub fn update(&mut self, paddle: &Paddle, step: i32) {
        if !self.launched {
            self.follow(paddle);
        } else {
            self.pos += (self.direction * step).as_vec2();
        }
    }

    /// Reverse vertical travel (top/bottom impacts)
    pub fn bounce_horizontal(&mut self) {
        self.direction.y = -self.direction.y;
    }

    /// Reverse horizontal travel (side impacts)
    pub fn bounce_vertical(&mut self) {
        self.direction.x = -self.direction.x;
    }

    /// Back onto the paddle after a lost life
    pub fn reset(&mut self, paddle: &Paddle) {
        self.launched = false;
        self.direction = IVec2::ZERO;
        self.follow(paddle);
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.diameter, self.diameter)
    }
}

/// The player's paddle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub pos: IVec2,
    pub width: i32,
    pub height: i32,
    pub move_left: bool,
    pub move_right: bool,
}

impl Default for Paddle {
    fn default() -> Self {
        Self {
            pos: IVec2::new(
                SCREEN_WIDTH / 2 - PADDLE_WIDTH / 2,
                SCREEN_HEIGHT - PADDLE_HEIGHT - PADDLE_BOTTOM_MARGIN,
            ),
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
            move_left: false,
            move_right: false,
        }
    }
}

impl Paddle {
    /// Move by `step` according to held intent, staying within the overscan band
    ///
    /// Only one direction applies per tick; left is checked first.
    pub fn update(&mut self, step: i32) {
        if self.move_left && self.pos.x > -PADDLE_OVERSCAN {
            self.pos.x = self.pos.x.saturating_sub(step);
        } else if self.move_right
            && self.pos.x.saturating_add(self.width) < SCREEN_WIDTH + PADDLE_OVERSCAN
        {
            self.pos.x = self.pos.x.saturating_add(step);
        }
    }

    /// Absolute positioning (pointer input); not clamped
    pub fn set_absolute_x(&mut self, x: i32) {
        self.pos.x = x;
    }

    pub fn center_x(&self) -> f32 {
        self.pos.x as f32 + self.width as f32 / 2.0
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.pos.x as f32,
            self.pos.y as f32,
            self.width as f32,
            self.height as f32,
        )
    }
}

/// A destructible block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub pos: IVec2,
    pub width: i32,
    pub height: i32,
    /// 0 means destroyed; the block stays in the collection
    pub health: u32,
}

impl Block {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            pos: IVec2::new(x, y),
            width: BLOCK_WIDTH,
            height: BLOCK_HEIGHT,
            health: BLOCK_START_HEALTH,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Take one hit; never drops below zero
    pub fn hit(&mut self) {
        self.health = self.health.saturating_sub(1);
    }

    /// Row-descent shift
    pub fn move_down(&mut self) {
        self.pos.y += ROW_DESCENT_STEP;
    }

    /// Push back after the field reached the paddle
    pub fn move_up(&mut self) {
        self.pos.y -= ROW_RESET_STEP;
    }

    pub fn bottom(&self) -> i32 {
        self.pos.y + self.height
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.pos.x as f32,
            self.pos.y as f32,
            self.width as f32,
            self.height as f32,
        )
    }
}

/// The fixed starting grid, column-major
///
/// Columns span from one block width up to `11 * BLOCK_WIDTH - 90`, which
/// leaves nine columns inside the field; rows fill `3..8` block heights.
pub fn initial_blocks() -> Vec<Block> {
    let column_end = BLOCK_WIDTH * 11 - 90;
    let row_end = BLOCK_HEIGHT * 8;

    let mut blocks = Vec::new();
    for x in (BLOCK_WIDTH..column_end).step_by((BLOCK_WIDTH + BLOCK_GAP) as usize) {
        for y in (BLOCK_HEIGHT * 3..row_end).step_by((BLOCK_HEIGHT + BLOCK_GAP) as usize) {
            blocks.push(Block::new(x, y));
        }
    }
    blocks
}

/// Complete game state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Blocks in fixed iteration order
    pub blocks: Vec<Block>,
    pub ball: Ball,
    pub paddle: Paddle,
    /// Never decreases
    pub score: u64,
    pub lives: u32,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Ball travel per tick
    pub ball_step: i32,
    /// Paddle travel per tick
    pub paddle_step: i32,
    /// Random launch intents
    pub rng: Pcg32,
}

impl GameState {
    /// Create a new session with the starting grid
    pub fn new(settings: &Settings) -> Self {
        Self::with_blocks(settings, initial_blocks())
    }

    /// Create a session with a custom block field
    pub fn with_blocks(settings: &Settings, blocks: Vec<Block>) -> Self {
        let paddle = Paddle::default();
        let mut ball = Ball::new(Vec2::ZERO, BALL_DIAMETER);
        ball.follow(&paddle);

        Self {
            blocks,
            ball,
            paddle,
            score: 0,
            lives: STARTING_LIVES,
            phase: GamePhase::Playing,
            time_ticks: 0,
            ball_step: settings.ball_step(),
            paddle_step: settings.paddle_step(),
            rng: Pcg32::seed_from_u64(settings.seed),
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Launch the ball with a raw `-1 | 0 | 1` intent
    ///
    /// Validates before touching the ball. Returns `Ok(false)` if the ball was
    /// already in flight or the game is over.
    pub fn launch_ball(&mut self, movement: i32) -> Result<bool, SimError> {
        let intent = LaunchIntent::try_from(movement)?;
        Ok(self.launch_with(intent))
    }

    /// Launch with a typed intent; no-op unless the ball is resting on the paddle
    pub fn launch_with(&mut self, intent: LaunchIntent) -> bool {
        if self.ball.launched || self.is_game_over() {
            return false;
        }
        self.ball.launch(intent);
        log::info!("Ball launched {:?}", intent);
        true
    }

    /// Launch with a random intent drawn from the session RNG
    pub fn launch_random(&mut self) -> bool {
        let intent = LaunchIntent::random(&mut self.rng);
        self.launch_with(intent)
    }

    /// Take a life; latches game over at zero
    ///
    /// Returns true if the game is now over.
    pub fn lose_life(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.phase = GamePhase::GameOver;
            log::info!("Game over with score {}", self.score);
            true
        } else {
            false
        }
    }

    pub fn live_blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(|b| b.is_alive())
    }

    /// All blocks destroyed
    pub fn is_cleared(&self) -> bool {
        self.live_blocks().next().is_none()
    }

    /// Read-only view for presentation layers
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            blocks: self
                .live_blocks()
                .map(|b| BlockView {
                    x: b.pos.x,
                    y: b.pos.y,
                    width: b.width,
                    height: b.height,
                    health: b.health,
                })
                .collect(),
            ball: BallView {
                x: self.ball.pos.x,
                y: self.ball.pos.y,
                diameter: self.ball.diameter,
                launched: self.ball.launched,
            },
            paddle: PaddleView {
                x: self.paddle.pos.x,
                y: self.paddle.pos.y,
                width: self.paddle.width,
                height: self.paddle.height,
            },
            score: self.score,
            lives: self.lives,
            game_over: self.is_game_over(),
            time_ticks: self.time_ticks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_grid() {
        let blocks = initial_blocks();
        assert_eq!(blocks.len(), 45);
        assert!(blocks.iter().all(|b| b.health == 1));
        // Column-major order
        assert_eq!(blocks[0].pos, IVec2::new(70, 90));
        assert_eq!(blocks[1].pos, IVec2::new(70, 122));
        assert_eq!(blocks[4].pos, IVec2::new(70, 218));
        assert_eq!(blocks[5].pos, IVec2::new(142, 90));
        assert_eq!(blocks[44].pos, IVec2::new(646, 218));
        assert!(blocks.iter().all(|b| b.pos.x + b.width <= SCREEN_WIDTH));
    }

    #[test]
    fn test_initial_positions() {
        let state = GameState::new(&Settings::default());
        assert_eq!(state.paddle.pos, IVec2::new(350, 542));
        assert_eq!(state.ball.pos, Vec2::new(395.0, 532.0));
        assert!(!state.ball.launched);
        assert_eq!(state.lives, 3);
        assert_eq!(state.score, 0);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_launch_directions() {
        let cases = [
            (LaunchIntent::Left, IVec2::new(-1, -1)),
            (LaunchIntent::Still, IVec2::new(0, -1)),
            (LaunchIntent::Right, IVec2::new(1, -1)),
        ];
        for (intent, expected) in cases {
            let mut ball = Ball::new(Vec2::ZERO, BALL_DIAMETER);
            ball.launch(intent);
            assert!(ball.launched);
            assert_eq!(ball.direction, expected);
        }
    }

    #[test]
    fn test_launch_rejects_invalid_intent() {
        let mut state = GameState::new(&Settings::default());
        let before = state.ball.clone();

        assert_eq!(state.launch_ball(2), Err(SimError::InvalidLaunchIntent(2)));
        assert_eq!(state.launch_ball(-7), Err(SimError::InvalidLaunchIntent(-7)));
        assert_eq!(state.ball, before);
        assert!(!state.ball.launched);
    }

    #[test]
    fn test_launch_only_once() {
        let mut state = GameState::new(&Settings::default());
        assert_eq!(state.launch_ball(1), Ok(true));
        assert_eq!(state.launch_ball(-1), Ok(false));
        assert_eq!(state.ball.direction, IVec2::new(1, -1));
    }

    #[test]
    fn test_bounce_mapping() {
        let mut ball = Ball::new(Vec2::ZERO, BALL_DIAMETER);
        ball.launch(LaunchIntent::Right);

        ball.bounce_horizontal();
        assert_eq!(ball.direction, IVec2::new(1, 1));

        ball.bounce_vertical();
        assert_eq!(ball.direction, IVec2::new(-1, 1));
    }

    #[test]
    fn test_follow_centers_on_paddle() {
        let mut paddle = Paddle::default();
        paddle.pos = IVec2::new(-5, 542);
        let mut ball = Ball::new(Vec2::ZERO, BALL_DIAMETER);
        ball.update(&paddle, 5);
        assert_eq!(ball.pos, Vec2::new(40.0, 532.0));
    }

    #[test]
    fn test_paddle_bounds() {
        let mut paddle = Paddle::default();
        paddle.move_left = true;
        paddle.pos.x = -4;
        paddle.update(7);
        assert_eq!(paddle.pos.x, -11);
        // Past the overscan band: no further movement
        paddle.update(7);
        assert_eq!(paddle.pos.x, -11);

        paddle.move_left = false;
        paddle.move_right = true;
        paddle.pos.x = SCREEN_WIDTH + PADDLE_OVERSCAN - paddle.width;
        paddle.update(7);
        assert_eq!(paddle.pos.x, SCREEN_WIDTH + PADDLE_OVERSCAN - paddle.width);
    }

    #[test]
    fn test_paddle_left_wins() {
        let mut paddle = Paddle::default();
        paddle.move_left = true;
        paddle.move_right = true;
        paddle.update(7);
        assert_eq!(paddle.pos.x, 343);
    }

    #[test]
    fn test_block_moves() {
        let mut block = Block::new(70, 90);
        block.move_down();
        assert_eq!(block.pos.y, 122);
        block.move_up();
        assert_eq!(block.pos.y, 122 - 192);
    }

    #[test]
    fn test_block_health_floor() {
        let mut block = Block::new(0, 0);
        block.hit();
        block.hit();
        assert_eq!(block.health, 0);
        assert!(!block.is_alive());
    }

    #[test]
    fn test_random_launch_is_seeded() {
        let settings = Settings::default();
        let mut a = GameState::new(&settings);
        let mut b = GameState::new(&settings);
        assert!(a.launch_random());
        assert!(b.launch_random());
        assert_eq!(a.ball.direction, b.ball.direction);
        assert_eq!(a.ball.direction.y, -1);
    }

    #[test]
    fn test_snapshot_skips_dead_blocks() {
        let mut state = GameState::new(&Settings::default());
        state.blocks[0].health = 0;
        let snap = state.snapshot();
        assert_eq!(snap.blocks.len(), 44);
        assert_eq!(snap.blocks[0].y, 122);
        assert_eq!(snap.lives, 3);
        assert!(!snap.game_over);
    }
}
