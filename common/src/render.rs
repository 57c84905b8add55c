use std::collections::HashSet;
use std::collections::VecDeque;

use crate::session::SessionPhase;
use crate::snake::{Food, Point, SnakeGameState};

/// Borrowed view of everything a renderer draws for one tick.
pub struct Frame<'a> {
    pub cell_size: i32,
    pub width: i32,
    pub height: i32,
    pub body: &'a VecDeque<Point>,
    pub food: Option<&'a Food>,
    pub obstacles: &'a HashSet<Point>,
    pub score: u32,
    pub level: u32,
    pub speed: u32,
    pub phase: SessionPhase,
}

impl<'a> Frame<'a> {
    pub fn new(state: &'a SnakeGameState, phase: SessionPhase) -> Self {
        let field = state.settings().field;
        Self {
            cell_size: field.cell_size,
            width: field.width,
            height: field.height,
            body: state.snake().body(),
            food: state.food(),
            obstacles: state.obstacles(),
            score: state.score(),
            level: state.level(),
            speed: state.speed(),
            phase,
        }
    }
}

pub trait Renderer {
    fn render(&mut self, frame: &Frame<'_>);
}
