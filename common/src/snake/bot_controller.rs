use serde::{Deserialize, Serialize};

use crate::SessionRng;
use super::game_state::SnakeGameState;
use super::types::{Direction, Point};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BotKind {
    /// Safe move closest to the food, falling back to a random safe move.
    Greedy,
    Random,
}

/// Picks a turn for a headless run. Returns `None` once the game is over.
pub struct BotController;

impl BotController {
    pub fn calculate_move(
        kind: BotKind,
        state: &SnakeGameState,
        rng: &mut SessionRng,
    ) -> Option<Direction> {
        if state.is_over() {
            return None;
        }
        match kind {
            BotKind::Greedy => Self::greedy(state, rng),
            BotKind::Random => Self::random_safe_move(state, rng),
        }
    }

    fn greedy(state: &SnakeGameState, rng: &mut SessionRng) -> Option<Direction> {
        let Some(food) = state.food() else {
            return Self::random_safe_move(state, rng);
        };
        let head = state.snake().head();

        Self::safe_directions(state)
            .into_iter()
            .min_by_key(|dir| Self::next_position(head, *dir, state).manhattan_distance(&food.position))
            .or_else(|| Self::random_safe_move(state, rng))
    }

    fn random_safe_move(state: &SnakeGameState, rng: &mut SessionRng) -> Option<Direction> {
        let safe = Self::safe_directions(state);
        match rng.choose(&safe) {
            Some(direction) => Some(*direction),
            None => Some(state.snake().direction),
        }
    }

    fn safe_directions(state: &SnakeGameState) -> Vec<Direction> {
        let snake = state.snake();
        let head = snake.head();
        Direction::ALL
            .into_iter()
            .filter(|dir| snake.can_turn(*dir))
            .filter(|dir| Self::is_safe_position(Self::next_position(head, *dir, state), state))
            .collect()
    }

    fn next_position(from: Point, direction: Direction, state: &SnakeGameState) -> Point {
        from.step(direction, state.settings().field.cell_size)
    }

    fn is_safe_position(pos: Point, state: &SnakeGameState) -> bool {
        state.settings().field.contains(&pos)
            && !state.obstacles().contains(&pos)
            && !state.snake().would_bite_itself(&pos)
    }
}
