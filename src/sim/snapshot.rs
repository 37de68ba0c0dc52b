//! Read-only state published to presentation layers

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockView {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub health: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BallView {
    pub x: f32,
    pub y: f32,
    pub diameter: f32,
    pub launched: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaddleView {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Everything a renderer needs for one frame
///
/// Only live blocks are listed, in collection order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub blocks: Vec<BlockView>,
    pub ball: BallView,
    pub paddle: PaddleView,
    pub score: u64,
    pub lives: u32,
    pub game_over: bool,
    pub time_ticks: u64,
}
