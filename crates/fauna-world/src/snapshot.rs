//! Serializable copies of simulation state.

use fauna_core::{CreatureId, Location, Result, Species};
use serde::{Deserialize, Serialize};

/// One member of the population
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureRecord {
    pub id: CreatureId,
    pub species: Species,
    pub age: u32,
    pub food_level: Option<i32>,
    pub location: Location,
    pub born_at: u64,
}

/// Population in traversal order plus the species in every cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub step: u64,
    pub depth: usize,
    pub width: usize,
    pub creatures: Vec<CreatureRecord>,
    /// Row-major, one entry per cell
    pub cells: Vec<Option<Species>>,
}

impl Snapshot {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn species_at(&self, loc: Location) -> Option<Species> {
        if loc.row >= self.depth || loc.col >= self.width {
            return None;
        }
        self.cells[loc.row * self.width + loc.col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_species_lookup() {
        let snapshot = Snapshot {
            step: 3,
            depth: 1,
            width: 2,
            creatures: vec![CreatureRecord {
                id: CreatureId::new(0, 0),
                species: Species::Fox,
                age: 4,
                food_level: Some(2),
                location: Location::new(0, 1),
                born_at: 0,
            }],
            cells: vec![None, Some(Species::Fox)],
        };

        assert_eq!(snapshot.species_at(Location::new(0, 1)), Some(Species::Fox));
        assert_eq!(snapshot.species_at(Location::new(0, 0)), None);
        assert_eq!(snapshot.species_at(Location::new(5, 5)), None);

        let restored = Snapshot::from_bytes(&snapshot.to_bytes().unwrap()).unwrap();
        assert_eq!(restored, snapshot);
        assert!(snapshot.to_json().unwrap().contains("\"Fox\""));
    }
}
