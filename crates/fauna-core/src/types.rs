//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell coordinate in the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub row: usize,
    pub col: usize,
}

impl Location {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Whether `other` is one of the eight cells surrounding this one
    pub fn is_adjacent(&self, other: &Location) -> bool {
        *self != *other && self.row.abs_diff(other.row) <= 1 && self.col.abs_diff(other.col) <= 1
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The species a creature belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Species {
    Rabbit,
    Fox,
}

impl Species {
    pub const ALL: [Species; 2] = [Species::Rabbit, Species::Fox];

    pub fn name(&self) -> &'static str {
        match self {
            Species::Rabbit => "Rabbit",
            Species::Fox => "Fox",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Handle to a creature stored in the arena.
///
/// The generation distinguishes a reclaimed slot from the creature that used
/// to live in it, so a handle to a dead creature never resolves to a newborn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CreatureId {
    pub index: u32,
    pub generation: u32,
}

impl CreatureId {
    pub fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }
}

impl fmt::Display for CreatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// Why a creature died
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathCause {
    OldAge,
    Starvation,
    Overcrowding,
    Eaten,
}

impl DeathCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeathCause::OldAge => "old_age",
            DeathCause::Starvation => "starvation",
            DeathCause::Overcrowding => "overcrowding",
            DeathCause::Eaten => "eaten",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_location_equality_is_structural() {
        let a = Location::new(3, 4);
        let b = Location::new(3, 4);
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
        assert!(!set.contains(&Location::new(4, 3)));
    }

    #[test]
    fn test_adjacency() {
        let center = Location::new(1, 1);
        assert!(center.is_adjacent(&Location::new(0, 0)));
        assert!(center.is_adjacent(&Location::new(2, 1)));
        assert!(!center.is_adjacent(&center));
        assert!(!center.is_adjacent(&Location::new(3, 1)));
    }

    #[test]
    fn test_species_display() {
        assert_eq!(Species::Fox.to_string(), "Fox");
        assert_eq!(Species::Rabbit.to_string(), "Rabbit");
    }
}
