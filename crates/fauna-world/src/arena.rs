//! Generational storage for creatures.

use crate::creature::Creature;
use fauna_core::CreatureId;

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    creature: Option<Creature>,
}

/// Owns every creature that is alive or died during the current step.
#[derive(Debug, Clone, Default)]
pub struct CreatureArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl CreatureArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, creature: Creature) -> CreatureId {
        self.len += 1;
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.creature = Some(creature);
                CreatureId::new(index, slot.generation)
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    creature: Some(creature),
                });
                CreatureId::new(index, 0)
            }
        }
    }

    pub fn get(&self, id: CreatureId) -> Option<&Creature> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.creature.as_ref())
    }

    pub fn get_mut(&mut self, id: CreatureId) -> Option<&mut Creature> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.creature.as_mut())
    }

    /// Reclaim a slot. Handles to it go stale.
    pub fn remove(&mut self, id: CreatureId) -> Option<Creature> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let creature = slot.creature.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        Some(creature)
    }

    pub fn clear(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.creature.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index as u32);
            }
        }
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (CreatureId, &Creature)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.creature
                .as_ref()
                .map(|creature| (CreatureId::new(index as u32, slot.generation), creature))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fauna_core::Location;

    fn rabbit() -> Creature {
        Creature::rabbit(Location::new(0, 0), 0, 0)
    }

    #[test]
    fn test_insert_and_get() {
        let mut arena = CreatureArena::new();
        let a = arena.insert(rabbit());
        let b = arena.insert(Creature::fox(Location::new(1, 1), 3, 5, 0));

        assert_ne!(a, b);
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(b).unwrap().food_level(), Some(5));
    }

    #[test]
    fn test_removed_handle_goes_stale() {
        let mut arena = CreatureArena::new();
        let old = arena.insert(rabbit());
        assert!(arena.remove(old).is_some());
        assert!(arena.get(old).is_none());
        assert!(arena.remove(old).is_none());

        let new = arena.insert(rabbit());
        assert_eq!(new.index, old.index);
        assert_ne!(new.generation, old.generation);
        assert!(arena.get(old).is_none());
        assert!(arena.get(new).is_some());
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut arena = CreatureArena::new();
        let ids: Vec<_> = (0..5).map(|_| arena.insert(rabbit())).collect();
        arena.clear();
        assert!(arena.is_empty());
        assert!(ids.iter().all(|id| arena.get(*id).is_none()));
        assert_eq!(arena.iter().count(), 0);
    }
}
