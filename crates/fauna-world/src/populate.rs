//! Initial random seeding of the field.

use crate::creature::Creature;
use crate::habitat::Habitat;
use fauna_core::CreatureId;

impl Habitat {
    /// Empty the habitat and scatter foxes and rabbits over it.
    ///
    /// Cells are visited in row-major order. Each cell draws a fox roll and a
    /// rabbit roll; the fox roll wins when both succeed. Returns the new
    /// creatures in creation order.
    pub(crate) fn populate(&mut self) -> Vec<CreatureId> {
        self.clear();

        let fox_probability = self.config.fox_creation_probability;
        let rabbit_probability = self.config.rabbit_creation_probability;
        let mut population = Vec::new();

        for location in self.field.locations().collect::<Vec<_>>() {
            let fox_roll = self.rng.next_double();
            let rabbit_roll = self.rng.next_double();

            let creature = if fox_roll <= fox_probability {
                let age = self.rng.next_int(self.config.fox.max_age);
                let food_level = self.rng.next_int(self.config.rabbit_food_value as u32) as i32;
                Creature::fox(location, age, food_level, 0)
            } else if rabbit_roll <= rabbit_probability {
                let age = self.rng.next_int(self.config.rabbit.max_age);
                Creature::rabbit(location, age, 0)
            } else {
                continue;
            };

            population.push(self.insert(creature));
        }

        population
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fauna_core::{SeedMode, SimulationConfig, Species};

    fn config(seed: u64) -> SimulationConfig {
        SimulationConfig {
            depth: 30,
            width: 30,
            seed: SeedMode::Fixed(seed),
            ..Default::default()
        }
    }

    #[test]
    fn test_population_in_row_major_order() {
        let mut habitat = Habitat::new(config(42));
        let population = habitat.populate();

        assert!(!population.is_empty());
        assert_eq!(population.len(), habitat.field.occupied_count());

        let locations: Vec<_> = population
            .iter()
            .map(|id| habitat.creature(*id).location().unwrap())
            .collect();
        let mut sorted = locations.clone();
        sorted.sort_by_key(|loc| (loc.row, loc.col));
        assert_eq!(locations, sorted);
    }

    #[test]
    fn test_initial_attributes_in_range() {
        let mut habitat = Habitat::new(config(7));
        let population = habitat.populate();

        for id in population {
            let creature = habitat.creature(id);
            assert_eq!(creature.born_at(), 0);
            match creature.species() {
                Species::Fox => {
                    assert!(creature.age() < 150);
                    let food = creature.food_level().unwrap();
                    assert!((0..7).contains(&food));
                }
                Species::Rabbit => assert!(creature.age() < 40),
            }
        }
    }

    #[test]
    fn test_two_rolls_per_cell() {
        let mut habitat = Habitat::new(SimulationConfig {
            fox_creation_probability: 0.0,
            rabbit_creation_probability: 0.0,
            ..config(1)
        });
        let population = habitat.populate();

        assert!(population.is_empty());
        assert_eq!(habitat.rng.draws(), 2 * 30 * 30);
    }

    #[test]
    fn test_fox_wins_when_both_rolls_succeed() {
        let mut habitat = Habitat::new(SimulationConfig {
            depth: 4,
            width: 4,
            fox_creation_probability: 1.0,
            rabbit_creation_probability: 1.0,
            ..Default::default()
        });
        let population = habitat.populate();

        assert_eq!(population.len(), 16);
        assert!(population
            .iter()
            .all(|id| habitat.creature(*id).species() == Species::Fox));
    }

    #[test]
    fn test_repopulating_clears_previous_creatures() {
        let mut habitat = Habitat::new(config(9));
        let first = habitat.populate();
        let second = habitat.populate();

        assert!(first.iter().all(|id| habitat.creatures.get(*id).is_none()));
        assert_eq!(habitat.creatures.len(), second.len());
        assert_eq!(habitat.field.occupied_count(), second.len());
    }
}
