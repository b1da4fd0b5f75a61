//! Dense 2D field holding at most one creature per cell.

use crate::random::Randomizer;
use fauna_core::{CreatureId, Error, Location, Result};
use serde::{Deserialize, Serialize};

/// A bounded rectangular grid of `depth` rows by `width` columns.
///
/// Cells store creature handles, not creatures; the arena owns the creatures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    depth: usize,
    width: usize,
    cells: Vec<Option<CreatureId>>,
}

impl Field {
    pub fn new(depth: usize, width: usize) -> Self {
        assert!(depth > 0 && width > 0, "field dimensions must be positive");
        Self {
            depth,
            width,
            cells: vec![None; depth * width],
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn contains(&self, loc: Location) -> bool {
        loc.row < self.depth && loc.col < self.width
    }

    /// Index of `loc` in the backing storage, or `OutOfBounds`
    pub fn checked_index(&self, loc: Location) -> Result<usize> {
        if self.contains(loc) {
            Ok(loc.row * self.width + loc.col)
        } else {
            Err(Error::OutOfBounds {
                location: loc,
                depth: self.depth,
                width: self.width,
            })
        }
    }

    fn index(&self, loc: Location) -> usize {
        match self.checked_index(loc) {
            Ok(index) => index,
            Err(e) => panic!("{}", e),
        }
    }

    /// Put `id` at `loc`, overwriting any previous occupant
    pub fn place(&mut self, id: CreatureId, loc: Location) {
        let index = self.index(loc);
        self.cells[index] = Some(id);
    }

    pub fn clear(&mut self, loc: Location) {
        let index = self.index(loc);
        self.cells[index] = None;
    }

    pub fn clear_all(&mut self) {
        self.cells.fill(None);
    }

    pub fn object_at(&self, loc: Location) -> Option<CreatureId> {
        self.cells[self.index(loc)]
    }

    /// Occupant lookup that reports bad coordinates instead of panicking
    pub fn try_object_at(&self, loc: Location) -> Result<Option<CreatureId>> {
        Ok(self.cells[self.checked_index(loc)?])
    }

    pub fn is_free(&self, loc: Location) -> bool {
        self.object_at(loc).is_none()
    }

    /// In-bounds Moore neighbours of `loc`, in random order.
    ///
    /// The shuffle keeps movement and predation free of directional bias.
    pub fn adjacent_locations(&self, loc: Location, rng: &mut Randomizer) -> Vec<Location> {
        assert!(self.contains(loc), "{}", self.out_of_bounds(loc));

        let rows = loc.row.saturating_sub(1)..=(loc.row + 1).min(self.depth - 1);
        let mut neighbours = Vec::with_capacity(8);
        for row in rows {
            let cols = loc.col.saturating_sub(1)..=(loc.col + 1).min(self.width - 1);
            for col in cols {
                let next = Location::new(row, col);
                if next != loc {
                    neighbours.push(next);
                }
            }
        }

        rng.shuffle(&mut neighbours);
        neighbours
    }

    /// Empty neighbours of `loc`, keeping the shuffled order
    pub fn free_adjacent_locations(&self, loc: Location, rng: &mut Randomizer) -> Vec<Location> {
        self.adjacent_locations(loc, rng)
            .into_iter()
            .filter(|&next| self.is_free(next))
            .collect()
    }

    pub fn free_adjacent_location(&self, loc: Location, rng: &mut Randomizer) -> Option<Location> {
        self.free_adjacent_locations(loc, rng).into_iter().next()
    }

    fn out_of_bounds(&self, loc: Location) -> Error {
        Error::OutOfBounds {
            location: loc,
            depth: self.depth,
            width: self.width,
        }
    }

    /// Get location from index
    pub fn index_to_location(&self, index: usize) -> Location {
        Location::new(index / self.width, index % self.width)
    }

    /// Iterator over all locations in row-major order
    pub fn locations(&self) -> impl Iterator<Item = Location> + '_ {
        (0..self.cells.len()).map(move |i| self.index_to_location(i))
    }

    /// Iterator over all cells with their locations
    pub fn iter(&self) -> impl Iterator<Item = (Location, Option<CreatureId>)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (self.index_to_location(i), *cell))
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }
}
