//! Neighbor swaps shared by every ordered list the editors manage.

use std::fmt;
use std::str::FromStr;

/// Which neighbor to swap with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward the start of the list.
    Up,
    /// Toward the end of the list.
    Down,
}

impl Direction {
    /// The opposite direction.
    #[must_use]
    pub fn reverse(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Up => "up",
            Direction::Down => "down",
        })
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            other => Err(format!("direction must be `up` or `down`, not `{other}`")),
        }
    }
}

/// Swaps `items[index]` with its neighbor. Returns the new index, or `None`
/// (leaving the list untouched) when the item is already at that edge or the
/// index is out of range.
pub fn swap_neighbor<T>(items: &mut [T], index: usize, direction: Direction) -> Option<usize> {
    if index >= items.len() {
        return None;
    }
    let target = match direction {
        Direction::Up => index.checked_sub(1)?,
        Direction::Down => index + 1,
    };
    if target >= items.len() {
        return None;
    }
    items.swap(index, target);
    Some(target)
}
