use std::collections::{HashSet, VecDeque};

use super::types::{Direction, Point};

/// Occupied cells, head first, with a set mirror for O(1) lookups.
#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Point>,
    body_set: HashSet<Point>,
    pub direction: Direction,
}

impl Snake {
    /// `cells` must be non-empty and free of duplicates.
    pub fn new(cells: &[Point], direction: Direction) -> Result<Self, String> {
        if cells.is_empty() {
            return Err("snake needs at least one cell".to_string());
        }

        let mut body = VecDeque::with_capacity(cells.len());
        let mut body_set = HashSet::with_capacity(cells.len());
        for cell in cells {
            if !body_set.insert(*cell) {
                return Err(format!("duplicate snake cell ({}, {})", cell.x, cell.y));
            }
            body.push_back(*cell);
        }

        Ok(Self {
            body,
            body_set,
            direction,
        })
    }

    pub fn head(&self) -> Point {
        self.body[0]
    }

    pub fn tail(&self) -> Point {
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn body(&self) -> &VecDeque<Point> {
        &self.body
    }

    pub fn contains(&self, point: &Point) -> bool {
        self.body_set.contains(point)
    }

    /// The tail cell is about to be vacated, so moving onto it is allowed.
    pub fn would_bite_itself(&self, next_head: &Point) -> bool {
        self.body_set.contains(next_head) && *next_head != self.tail()
    }

    /// Reversing straight into the neck is never a valid turn.
    pub fn can_turn(&self, direction: Direction) -> bool {
        self.body.len() < 2 || !direction.is_opposite(&self.direction)
    }

    pub fn advance(&mut self, next_head: Point, grow: bool) {
        if !grow
            && let Some(tail) = self.body.pop_back()
        {
            self.body_set.remove(&tail);
        }
        self.body.push_front(next_head);
        self.body_set.insert(next_head);
    }
}
