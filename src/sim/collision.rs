//! Collision geometry for the ball and axis-aligned rectangles
//!
//! The ball is always treated as its bounding square. Block hits are
//! classified by which edge band the square overlaps, not by a contact normal.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (top-left origin, y down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Strict overlap test: rectangles that only share an edge do not intersect
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.size.x <= 0.0 || self.size.y <= 0.0 || other.size.x <= 0.0 || other.size.y <= 0.0
        {
            return false;
        }
        self.right() > other.left()
            && self.bottom() > other.top()
            && self.left() < other.right()
            && self.top() < other.bottom()
    }
}

/// Which velocity component a block hit reflects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionAxis {
    /// No edge band overlapped
    None,
    /// Top or bottom edge hit; reflects vertical travel (`Ball::bounce_horizontal`)
    Horizontal,
    /// Left or right edge hit; reflects horizontal travel (`Ball::bounce_vertical`)
    Vertical,
}

/// Classify a hit between the ball's bounding square and a block
///
/// An edge band fires when the ball's span straddles that edge (inclusive) and
/// the ball overlaps the block along the other axis. Top/bottom take priority,
/// so a corner overlap resolves as `Horizontal`.
pub fn collision_axis(ball: &Rect, block: &Rect) -> CollisionAxis {
    let outside_vertical = ball.right() < block.left() || ball.left() > block.right();
    let outside_horizontal = ball.bottom() < block.top() || ball.top() > block.bottom();

    let straddles = |lo: f32, hi: f32, edge: f32| hi >= edge && lo <= edge;

    let on_top = straddles(ball.top(), ball.bottom(), block.top()) && !outside_vertical;
    let on_bottom = straddles(ball.top(), ball.bottom(), block.bottom()) && !outside_vertical;
    let on_left = straddles(ball.left(), ball.right(), block.left()) && !outside_horizontal;
    let on_right = straddles(ball.left(), ball.right(), block.right()) && !outside_horizontal;

    if on_top || on_bottom {
        CollisionAxis::Horizontal
    } else if on_left || on_right {
        CollisionAxis::Vertical
    } else {
        CollisionAxis::None
    }
}
