use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

use crate::config::Validate;
use super::food::FoodKind;
use super::types::{Direction, FieldSize, Point};

pub const DEFAULT_PLACEMENT_ATTEMPTS: u32 = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LevelPolicy {
    /// Level up whenever the score passes a multiple of `every`.
    ScoreThreshold { every: u32 },
    /// Level up on every `every`-th food item eaten.
    FoodCount { every: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObstaclePolicy {
    None,
    /// `base_count + level` obstacles, rebuilt on level up and, with
    /// `rescore_every`, each time the score enters a new band of that width.
    Regenerating {
        base_count: u32,
        rescore_every: Option<u32>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    Arcade,
    Classic,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnakeSettings {
    pub field: FieldSize,
    pub start_body: Vec<Point>,
    pub start_direction: Direction,
    pub level_policy: LevelPolicy,
    pub obstacle_policy: ObstaclePolicy,
    pub base_speed: u32,
    pub speed_step: u32,
    pub paused_speed: u32,
    pub food_kinds: Vec<FoodKind>,
    pub placement_attempts: u32,
}

fn default_start_body() -> Vec<Point> {
    vec![Point::new(100, 100), Point::new(80, 100), Point::new(60, 100)]
}

impl SnakeSettings {
    /// 600x400 field with obstacles and three food kinds of different value and lifetime.
    pub fn arcade() -> Self {
        Self {
            field: FieldSize::new(600, 400, 20),
            start_body: default_start_body(),
            start_direction: Direction::Right,
            level_policy: LevelPolicy::ScoreThreshold { every: 3 },
            obstacle_policy: ObstaclePolicy::Regenerating {
                base_count: 3,
                rescore_every: Some(10),
            },
            base_speed: 5,
            speed_step: 1,
            paused_speed: 5,
            food_kinds: vec![
                FoodKind::new("normal", 1, Some(40)),
                FoodKind::new("medium", 2, Some(30)),
                FoodKind::new("rare", 3, Some(20)),
            ],
            placement_attempts: DEFAULT_PLACEMENT_ATTEMPTS,
        }
    }

    /// 640x480 field, no obstacles, a single food kind; level up every fourth item.
    pub fn classic() -> Self {
        Self {
            field: FieldSize::new(640, 480, 20),
            start_body: default_start_body(),
            start_direction: Direction::Right,
            level_policy: LevelPolicy::FoodCount { every: 4 },
            obstacle_policy: ObstaclePolicy::None,
            base_speed: 10,
            speed_step: 2,
            paused_speed: 5,
            food_kinds: vec![FoodKind::new("normal", 1, None)],
            placement_attempts: DEFAULT_PLACEMENT_ATTEMPTS,
        }
    }

    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Arcade => Self::arcade(),
            Preset::Classic => Self::classic(),
        }
    }

    pub fn speed_for_level(&self, level: u32) -> u32 {
        level
            .saturating_sub(1)
            .saturating_mul(self.speed_step)
            .saturating_add(self.base_speed)
    }

    /// Highest meaningful level: beyond it the obstacle set could not grow.
    pub fn max_level(&self) -> u32 {
        u32::try_from(self.field.cell_count()).unwrap_or(u32::MAX)
    }

    pub fn obstacle_count_for_level(&self, level: u32) -> usize {
        match self.obstacle_policy {
            ObstaclePolicy::None => 0,
            ObstaclePolicy::Regenerating { base_count, .. } => {
                base_count.saturating_add(level) as usize
            }
        }
    }

    pub fn tick_interval(speed: u32) -> Duration {
        Duration::from_millis(1000 / u64::from(speed.max(1)))
    }
}

impl Default for SnakeSettings {
    fn default() -> Self {
        Self::arcade()
    }
}

impl Validate for SnakeSettings {
    fn validate(&self) -> Result<(), String> {
        let field = &self.field;
        if field.cell_size <= 0 {
            return Err("cell_size must be positive".to_string());
        }
        if field.width % field.cell_size != 0 || field.height % field.cell_size != 0 {
            return Err("field dimensions must be multiples of cell_size".to_string());
        }
        if field.columns() < 5 || field.rows() < 5 {
            return Err("field must be at least 5x5 cells".to_string());
        }

        if self.start_body.is_empty() {
            return Err("start_body must not be empty".to_string());
        }
        let mut seen = HashSet::new();
        for cell in &self.start_body {
            if !field.contains(cell) || !field.is_aligned(cell) {
                return Err(format!("start cell ({}, {}) is not a field cell", cell.x, cell.y));
            }
            if !seen.insert(*cell) {
                return Err(format!("start cell ({}, {}) is repeated", cell.x, cell.y));
            }
        }
        for pair in self.start_body.windows(2) {
            if pair[0].manhattan_distance(&pair[1]) != field.cell_size {
                return Err("start_body cells must be adjacent".to_string());
            }
        }
        if self.start_body.len() >= 2
            && self.start_body[0].step(self.start_direction, field.cell_size) == self.start_body[1]
        {
            return Err("start_direction points back into the body".to_string());
        }
        if self.start_body.len() + 1 >= field.cell_count() {
            return Err("field is too small for the start body and food".to_string());
        }

        let every = match self.level_policy {
            LevelPolicy::ScoreThreshold { every } | LevelPolicy::FoodCount { every } => every,
        };
        if every == 0 {
            return Err("level policy threshold must be at least 1".to_string());
        }
        if let ObstaclePolicy::Regenerating {
            rescore_every: Some(0),
            ..
        } = self.obstacle_policy
        {
            return Err("rescore_every must be at least 1".to_string());
        }

        if self.base_speed == 0 || self.paused_speed == 0 {
            return Err("speeds must be at least 1 tick per second".to_string());
        }
        if self.speed_step == 0 {
            return Err("speed_step must be at least 1".to_string());
        }
        if self.food_kinds.is_empty() {
            return Err("at least one food kind is required".to_string());
        }
        for kind in &self.food_kinds {
            if kind.value == 0 {
                return Err(format!("food kind '{}' must be worth at least 1 point", kind.name));
            }
            if kind.lifetime == Some(0) {
                return Err(format!("food kind '{}' has a zero lifetime", kind.name));
            }
        }
        if self.placement_attempts == 0 {
            return Err("placement_attempts must be at least 1".to_string());
        }
        Ok(())
    }
}
