//! Per-species behaviour and the state it mutates.

use crate::arena::CreatureArena;
use crate::creature::Creature;
use crate::field::Field;
use crate::observer::FieldView;
use crate::random::Randomizer;
use fauna_core::{CreatureId, DeathCause, Location, SimulationConfig, Species};
use tracing::debug;

/// The field, the creatures on it, and the random stream they draw from.
///
/// Only the creature currently acting mutates a habitat, and only through
/// [`Habitat::act`].
#[derive(Debug, Clone)]
pub struct Habitat {
    pub(crate) field: Field,
    pub(crate) creatures: CreatureArena,
    pub(crate) rng: Randomizer,
    pub(crate) config: SimulationConfig,
}

impl Habitat {
    /// Build an empty habitat. Dimensions must already be substituted.
    pub(crate) fn new(config: SimulationConfig) -> Self {
        let (depth, width) = config.effective_dimensions();
        Self {
            field: Field::new(depth, width),
            creatures: CreatureArena::new(),
            rng: Randomizer::new(config.seed),
            config,
        }
    }

    pub fn view(&self) -> FieldView<'_> {
        FieldView::new(&self.field, &self.creatures)
    }

    pub(crate) fn creature(&self, id: CreatureId) -> &Creature {
        self.creatures
            .get(id)
            .unwrap_or_else(|| panic!("stale creature handle {}", id))
    }

    fn creature_mut(&mut self, id: CreatureId) -> &mut Creature {
        self.creatures
            .get_mut(id)
            .unwrap_or_else(|| panic!("stale creature handle {}", id))
    }

    pub(crate) fn is_alive(&self, id: CreatureId) -> bool {
        self.creatures.get(id).map_or(false, Creature::is_alive)
    }

    fn location_of(&self, id: CreatureId) -> Location {
        self.creature(id)
            .location()
            .unwrap_or_else(|| panic!("creature {} has no location", id))
    }

    /// Store a creature and place it on the field
    pub(crate) fn insert(&mut self, creature: Creature) -> CreatureId {
        let location = creature.location();
        let id = self.creatures.insert(creature);
        if let Some(location) = location {
            self.field.place(id, location);
        }
        id
    }

    /// Drop a dead creature from storage
    pub(crate) fn reap(&mut self, id: CreatureId) {
        debug_assert!(!self.is_alive(id), "reaping live creature {}", id);
        self.creatures.remove(id);
    }

    pub(crate) fn clear(&mut self) {
        self.field.clear_all();
        self.creatures.clear();
    }

    /// Run one turn for `id`, appending any offspring to `newborns`.
    ///
    /// Panics if the creature is already dead.
    pub(crate) fn act(&mut self, id: CreatureId, newborns: &mut Vec<CreatureId>, step: u64) {
        let creature = self.creature(id);
        assert!(creature.is_alive(), "creature {} acted after death", id);

        match creature.species() {
            Species::Rabbit => self.act_rabbit(id, newborns, step),
            Species::Fox => self.act_fox(id, newborns, step),
        }
    }

    fn act_rabbit(&mut self, id: CreatureId, newborns: &mut Vec<CreatureId>, step: u64) {
        self.increment_age(id);
        if !self.is_alive(id) {
            return;
        }

        self.give_birth(id, newborns, step);

        let here = self.location_of(id);
        match self.field.free_adjacent_location(here, &mut self.rng) {
            Some(next) => self.move_to(id, next),
            None => self.kill(id, DeathCause::Overcrowding),
        }
    }

    fn act_fox(&mut self, id: CreatureId, newborns: &mut Vec<CreatureId>, step: u64) {
        self.increment_age(id);
        if self.creature_mut(id).digest() {
            self.kill(id, DeathCause::Starvation);
        }
        if !self.is_alive(id) {
            return;
        }

        self.give_birth(id, newborns, step);

        let here = self.location_of(id);
        let target = match self.find_food(id, here) {
            Some(prey_cell) => Some(prey_cell),
            None => self.field.free_adjacent_location(here, &mut self.rng),
        };

        match target {
            Some(next) => self.move_to(id, next),
            None => self.kill(id, DeathCause::Overcrowding),
        }
    }

    fn increment_age(&mut self, id: CreatureId) {
        let max_age = self.config.species(self.creature(id).species()).max_age;
        if self.creature_mut(id).tick(max_age) {
            self.kill(id, DeathCause::OldAge);
        }
    }

    /// Litter size for this turn; zero when the creature does not breed.
    pub(crate) fn breed(&mut self, id: CreatureId) -> u32 {
        let creature = self.creature(id);
        let age = creature.age();
        let params = self.config.species(creature.species());

        if age >= params.breeding_age && self.rng.next_double() <= params.breeding_probability {
            self.rng.next_int(params.max_litter_size) + 1
        } else {
            0
        }
    }

    /// Place up to one litter in free neighbouring cells. Births beyond the
    /// number of free cells are dropped.
    fn give_birth(&mut self, id: CreatureId, newborns: &mut Vec<CreatureId>, step: u64) {
        let here = self.location_of(id);
        let species = self.creature(id).species();
        let free = self.field.free_adjacent_locations(here, &mut self.rng);
        let litter = self.breed(id);
        if litter == 0 {
            return;
        }

        let food_value = self.config.rabbit_food_value;
        let born = free.len().min(litter as usize);
        for location in free.into_iter().take(litter as usize) {
            let young = match species {
                Species::Rabbit => Creature::rabbit(location, 0, step),
                Species::Fox => Creature::fox(location, 0, food_value, step),
            };
            newborns.push(self.insert(young));
        }

        debug!(
            parent = %id,
            species = %species,
            litter = litter,
            born = born,
            step = step,
            "Litter born"
        );
    }

    /// Eat the first live rabbit among the shuffled neighbours and return its cell
    fn find_food(&mut self, id: CreatureId, here: Location) -> Option<Location> {
        for location in self.field.adjacent_locations(here, &mut self.rng) {
            let Some(occupant) = self.field.object_at(location) else {
                continue;
            };
            let is_prey = self
                .creatures
                .get(occupant)
                .map_or(false, |c| c.species() == Species::Rabbit && c.is_alive());

            if is_prey {
                self.kill(occupant, DeathCause::Eaten);
                let food_value = self.config.rabbit_food_value;
                self.creature_mut(id).feed(food_value);
                return Some(location);
            }
        }
        None
    }

    fn move_to(&mut self, id: CreatureId, next: Location) {
        let creature = self.creature_mut(id);
        let previous = creature.location();
        creature.set_location(next);

        if let Some(previous) = previous {
            self.field.clear(previous);
        }
        self.field.place(id, next);
    }

    /// Kill a creature and free its cell. Killing twice is a no-op.
    pub(crate) fn kill(&mut self, id: CreatureId, cause: DeathCause) {
        let creature = self.creature_mut(id);
        let species = creature.species();
        let age = creature.age();

        if let Some(location) = creature.mark_dead(cause) {
            self.field.clear(location);
            debug!(
                creature = %id,
                species = %species,
                age = age,
                cause = cause.as_str(),
                row = location.row,
                col = location.col,
                "Creature died"
            );
        }
    }
}
