use std::collections::HashSet;

use crate::{log, log_debug, log_warn, SessionRng};
use super::food::Food;
use super::placement::place_free_cell;
use super::settings::{LevelPolicy, ObstaclePolicy, SnakeSettings};
use super::snake::Snake;
use super::types::{DeathReason, Direction, EndReason, Point};

/// What happened during a single tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Point value of the food eaten this tick.
    pub ate: Option<u32>,
    pub level_up: bool,
    pub food_expired: bool,
    pub obstacles_regenerated: bool,
    pub end_reason: Option<EndReason>,
}

#[derive(Clone, Debug)]
pub struct SnakeGameState {
    settings: SnakeSettings,
    snake: Snake,
    food: Option<Food>,
    obstacles: HashSet<Point>,
    score: u32,
    level: u32,
    speed: u32,
    food_eaten_this_level: u32,
    rescore_band: u32,
    ticks: u64,
    end_reason: Option<EndReason>,
}

impl SnakeGameState {
    pub fn new(settings: SnakeSettings, rng: &mut SessionRng) -> Result<Self, String> {
        Self::with_progress(settings, 1, 0, rng)
    }

    /// Starts a game from a saved level and score. Speed and obstacle count
    /// follow the restored level.
    pub fn with_progress(
        settings: SnakeSettings,
        level: u32,
        score: u32,
        rng: &mut SessionRng,
    ) -> Result<Self, String> {
        let snake = Snake::new(&settings.start_body, settings.start_direction)?;
        let level = level.clamp(1, settings.max_level());
        let speed = settings.speed_for_level(level);
        let rescore_band = match settings.obstacle_policy {
            ObstaclePolicy::Regenerating {
                rescore_every: Some(every),
                ..
            } if every > 0 => score / every,
            _ => 0,
        };

        let mut state = Self {
            settings,
            snake,
            food: None,
            obstacles: HashSet::new(),
            score,
            level,
            speed,
            food_eaten_this_level: 0,
            rescore_band,
            ticks: 0,
            end_reason: None,
        };

        if !state.respawn_food(rng) {
            return Err("no free cell for the first food item".to_string());
        }
        state.regenerate_obstacles(rng);
        Ok(state)
    }

    pub fn tick(&mut self, turn: Option<Direction>, rng: &mut SessionRng) -> TickReport {
        let mut report = TickReport::default();
        if let Some(reason) = self.end_reason {
            report.end_reason = Some(reason);
            return report;
        }

        if let Some(direction) = turn {
            if self.snake.can_turn(direction) {
                self.snake.direction = direction;
            } else {
                log_debug!("Ignoring reverse turn {:?} while moving {:?}", direction, self.snake.direction);
            }
        }

        self.ticks += 1;
        let next_head = self
            .snake
            .head()
            .step(self.snake.direction, self.settings.field.cell_size);

        if let Err(reason) = self.check_collision(&next_head) {
            log!(
                "Game over at tick {}: {} at ({}, {})",
                self.ticks,
                reason,
                next_head.x,
                next_head.y
            );
            let reason = EndReason::Collision(reason);
            self.end_reason = Some(reason);
            report.end_reason = Some(reason);
            return report;
        }

        let eaten = self.food.as_ref().is_some_and(|food| food.position == next_head);
        let expired = self.food.as_mut().is_some_and(|food| food.age());
        self.snake.advance(next_head, eaten);

        if eaten {
            let Some(food) = self.food.take() else {
                return report;
            };
            let old_score = self.score;
            self.score = self.score.saturating_add(food.value());
            self.food_eaten_this_level += 1;
            report.ate = Some(food.value());
            log!(
                "Ate {} food at ({}, {}). Score: {}",
                food.kind.name,
                next_head.x,
                next_head.y,
                self.score
            );

            if self.level_up_due(old_score) {
                self.level_up(rng);
                report.level_up = true;
                report.obstacles_regenerated |= self.has_obstacles();
            }

            if !self.respawn_food(rng) {
                return self.fill_field(report);
            }
        } else if expired {
            report.food_expired = true;
            if !self.respawn_food(rng) {
                return self.fill_field(report);
            }
        }

        if self.rescore_due() {
            self.regenerate_obstacles(rng);
            report.obstacles_regenerated = true;
        }

        report
    }

    fn check_collision(&self, next_head: &Point) -> Result<(), DeathReason> {
        if !self.settings.field.contains(next_head) {
            return Err(DeathReason::WallCollision);
        }
        if self.snake.would_bite_itself(next_head) {
            return Err(DeathReason::SelfCollision);
        }
        if self.obstacles.contains(next_head) {
            return Err(DeathReason::ObstacleCollision);
        }
        Ok(())
    }

    fn level_up_due(&self, old_score: u32) -> bool {
        match self.settings.level_policy {
            LevelPolicy::ScoreThreshold { every } => old_score / every < self.score / every,
            LevelPolicy::FoodCount { every } => self.food_eaten_this_level >= every,
        }
    }

    fn level_up(&mut self, rng: &mut SessionRng) {
        self.level = self.level.saturating_add(1);
        self.speed = self.settings.speed_for_level(self.level);
        self.food_eaten_this_level = 0;
        log!("Level up! Level: {}, speed: {}", self.level, self.speed);
        self.regenerate_obstacles(rng);
    }

    fn rescore_due(&mut self) -> bool {
        let ObstaclePolicy::Regenerating {
            rescore_every: Some(every),
            ..
        } = self.settings.obstacle_policy
        else {
            return false;
        };
        let band = self.score / every;
        if band > self.rescore_band {
            self.rescore_band = band;
            return true;
        }
        false
    }

    fn has_obstacles(&self) -> bool {
        !matches!(self.settings.obstacle_policy, ObstaclePolicy::None)
    }

    fn fill_field(&mut self, mut report: TickReport) -> TickReport {
        log!("No free cell left for food. Final score: {}", self.score);
        self.end_reason = Some(EndReason::FieldFilled);
        report.end_reason = Some(EndReason::FieldFilled);
        report
    }

    fn is_reserved(&self, cell: &Point) -> bool {
        self.snake.contains(cell)
            || self.obstacles.contains(cell)
            || self.food.as_ref().is_some_and(|food| food.position == *cell)
    }

    /// Replaces the food item. Returns false when the field has no free cell.
    fn respawn_food(&mut self, rng: &mut SessionRng) -> bool {
        self.food = None;
        let Some(kind) = rng.choose(&self.settings.food_kinds).cloned() else {
            return false;
        };
        let Some(position) = place_free_cell(
            &self.settings.field,
            self.settings.placement_attempts,
            rng,
            |cell| self.is_reserved(cell),
        ) else {
            return false;
        };

        log_debug!("Food '{}' spawned at ({}, {})", kind.name, position.x, position.y);
        self.food = Some(Food::new(position, kind));
        true
    }

    fn regenerate_obstacles(&mut self, rng: &mut SessionRng) {
        let count = self.settings.obstacle_count_for_level(self.level);
        self.obstacles.clear();

        while self.obstacles.len() < count {
            let Some(cell) = place_free_cell(
                &self.settings.field,
                self.settings.placement_attempts,
                rng,
                |cell| self.is_reserved(cell),
            ) else {
                log_warn!(
                    "Field full: placed {} of {} obstacles",
                    self.obstacles.len(),
                    count
                );
                break;
            };
            self.obstacles.insert(cell);
        }

        if count > 0 {
            log_debug!("Obstacles regenerated: {}", self.obstacles.len());
        }
    }

    pub fn settings(&self) -> &SnakeSettings {
        &self.settings
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Option<&Food> {
        self.food.as_ref()
    }

    pub fn obstacles(&self) -> &HashSet<Point> {
        &self.obstacles
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    pub fn is_over(&self) -> bool {
        self.end_reason.is_some()
    }

    #[cfg(test)]
    pub(crate) fn set_food(&mut self, food: Food) {
        self.food = Some(food);
    }

    #[cfg(test)]
    pub(crate) fn set_obstacles(&mut self, obstacles: &[Point]) {
        self.obstacles = obstacles.iter().copied().collect();
    }

    #[cfg(test)]
    pub(crate) fn set_score(&mut self, score: u32) {
        self.score = score;
    }
}
