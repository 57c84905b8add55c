use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(&self, direction: Direction, cell_size: i32) -> Point {
        let (dx, dy) = direction.unit();
        Point::new(self.x + dx * cell_size, self.y + dy * cell_size)
    }

    pub fn manhattan_distance(&self, other: &Point) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Screen orientation: `Up` decreases `y`.
    pub fn unit(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn is_opposite(&self, other: &Direction) -> bool {
        matches!(
            (self, other),
            (Direction::Left, Direction::Right)
                | (Direction::Right, Direction::Left)
                | (Direction::Up, Direction::Down)
                | (Direction::Down, Direction::Up)
        )
    }
}

/// Playing field in field units. Cells sit on multiples of `cell_size`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSize {
    pub width: i32,
    pub height: i32,
    pub cell_size: i32,
}

impl FieldSize {
    pub fn new(width: i32, height: i32, cell_size: i32) -> Self {
        Self {
            width,
            height,
            cell_size,
        }
    }

    pub fn columns(&self) -> i32 {
        self.width / self.cell_size
    }

    pub fn rows(&self) -> i32 {
        self.height / self.cell_size
    }

    pub fn cell_count(&self) -> usize {
        (self.columns().max(0) as usize) * (self.rows().max(0) as usize)
    }

    pub fn contains(&self, point: &Point) -> bool {
        point.x >= 0 && point.x < self.width && point.y >= 0 && point.y < self.height
    }

    pub fn is_aligned(&self, point: &Point) -> bool {
        point.x % self.cell_size == 0 && point.y % self.cell_size == 0
    }

    pub fn cell_at(&self, column: i32, row: i32) -> Point {
        Point::new(column * self.cell_size, row * self.cell_size)
    }

    pub fn cells(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.rows()).flat_map(move |row| (0..self.columns()).map(move |col| self.cell_at(col, row)))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeathReason {
    WallCollision,
    SelfCollision,
    ObstacleCollision,
}

impl fmt::Display for DeathReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DeathReason::WallCollision => "wall collision",
            DeathReason::SelfCollision => "self collision",
            DeathReason::ObstacleCollision => "obstacle collision",
        };
        write!(f, "{}", text)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndReason {
    Collision(DeathReason),
    /// No free cell was left for the next food item.
    FieldFilled,
    Quit,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndReason::Collision(reason) => write!(f, "{}", reason),
            EndReason::FieldFilled => write!(f, "field filled"),
            EndReason::Quit => write!(f, "quit"),
        }
    }
}
