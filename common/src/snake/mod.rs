mod bot_controller;
mod food;
mod game_state;
mod placement;
mod settings;
mod snake;
mod types;

pub use bot_controller::{BotController, BotKind};
pub use food::{Food, FoodKind};
pub use game_state::{SnakeGameState, TickReport};
pub use placement::place_free_cell;
pub use settings::{LevelPolicy, ObstaclePolicy, Preset, SnakeSettings, DEFAULT_PLACEMENT_ATTEMPTS};
pub use snake::Snake;
pub use types::{DeathReason, Direction, EndReason, FieldSize, Point};
