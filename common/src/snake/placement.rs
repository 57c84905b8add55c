use crate::SessionRng;
use super::types::{FieldSize, Point};

/// Picks a uniformly random free cell.
///
/// Draws up to `attempts` random cells first; if every draw hits a blocked
/// cell, falls back to choosing among an exhaustive scan of free cells.
/// Returns `None` only when the field has no free cell at all.
pub fn place_free_cell<F>(
    field: &FieldSize,
    attempts: u32,
    rng: &mut SessionRng,
    is_blocked: F,
) -> Option<Point>
where
    F: Fn(&Point) -> bool,
{
    let columns = field.columns();
    let rows = field.rows();
    if columns <= 0 || rows <= 0 {
        return None;
    }

    for _ in 0..attempts {
        let candidate = field.cell_at(rng.random_range(0..columns), rng.random_range(0..rows));
        if !is_blocked(&candidate) {
            return Some(candidate);
        }
    }

    let free: Vec<Point> = field.cells().filter(|cell| !is_blocked(cell)).collect();
    rng.choose(&free).copied()
}
