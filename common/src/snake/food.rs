use serde::{Deserialize, Serialize};

use super::types::Point;

/// One entry of the food table a new item is drawn from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodKind {
    pub name: String,
    pub value: u32,
    /// Ticks until the item expires; `None` never expires.
    pub lifetime: Option<u32>,
}

impl FoodKind {
    pub fn new(name: &str, value: u32, lifetime: Option<u32>) -> Self {
        Self {
            name: name.to_string(),
            value,
            lifetime,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Food {
    pub position: Point,
    pub kind: FoodKind,
    pub remaining_lifetime: Option<u32>,
}

impl Food {
    pub fn new(position: Point, kind: FoodKind) -> Self {
        let remaining_lifetime = kind.lifetime;
        Self {
            position,
            kind,
            remaining_lifetime,
        }
    }

    pub fn value(&self) -> u32 {
        self.kind.value
    }

    /// Counts one tick down. Returns true once the item has expired.
    pub fn age(&mut self) -> bool {
        match self.remaining_lifetime.as_mut() {
            Some(remaining) => {
                *remaining = remaining.saturating_sub(1);
                *remaining == 0
            }
            None => false,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_lifetime == Some(0)
    }
}
