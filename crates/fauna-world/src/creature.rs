//! Creature state shared by every species.

use fauna_core::{DeathCause, Location, Species};
use serde::{Deserialize, Serialize};

/// Species-specific state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Kind {
    Rabbit,
    Fox {
        /// Steps left before starving
        food_level: i32,
    },
}

impl Kind {
    pub fn species(&self) -> Species {
        match self {
            Kind::Rabbit => Species::Rabbit,
            Kind::Fox { .. } => Species::Fox,
        }
    }
}

/// A creature in the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    kind: Kind,
    alive: bool,
    age: u32,
    location: Option<Location>,
    born_at: u64,
    death: Option<DeathCause>,
}

impl Creature {
    pub fn rabbit(location: Location, age: u32, born_at: u64) -> Self {
        Self::new(Kind::Rabbit, location, age, born_at)
    }

    pub fn fox(location: Location, age: u32, food_level: i32, born_at: u64) -> Self {
        Self::new(Kind::Fox { food_level }, location, age, born_at)
    }

    fn new(kind: Kind, location: Location, age: u32, born_at: u64) -> Self {
        Self {
            kind,
            alive: true,
            age,
            location: Some(location),
            born_at,
            death: None,
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn species(&self) -> Species {
        self.kind.species()
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    /// Current cell; `None` once dead
    pub fn location(&self) -> Option<Location> {
        self.location
    }

    /// Step during which the creature was created (0 for the initial population)
    pub fn born_at(&self) -> u64 {
        self.born_at
    }

    pub fn death_cause(&self) -> Option<DeathCause> {
        self.death
    }

    /// Food level for foxes, `None` for species that do not eat
    pub fn food_level(&self) -> Option<i32> {
        match self.kind {
            Kind::Fox { food_level } => Some(food_level),
            Kind::Rabbit => None,
        }
    }

    /// Age by one step. Returns true when the creature is now too old to live.
    pub(crate) fn tick(&mut self, max_age: u32) -> bool {
        self.age = self.age.saturating_add(1);
        self.age > max_age
    }

    /// Use up one step of food. Returns true when the fox has starved.
    pub(crate) fn digest(&mut self) -> bool {
        match &mut self.kind {
            Kind::Fox { food_level } => {
                *food_level = food_level.saturating_sub(1);
                *food_level <= 0
            }
            Kind::Rabbit => false,
        }
    }

    pub(crate) fn feed(&mut self, food_value: i32) {
        if let Kind::Fox { food_level } = &mut self.kind {
            *food_level = food_value;
        }
    }

    pub(crate) fn set_location(&mut self, location: Location) {
        assert!(self.alive, "cannot place a dead creature at {}", location);
        self.location = Some(location);
    }

    /// Mark as dead and give up the location. Returns the cell to clear, if
    /// this call was the one that killed the creature.
    pub(crate) fn mark_dead(&mut self, cause: DeathCause) -> Option<Location> {
        if !self.alive {
            return None;
        }
        self.alive = false;
        self.death = Some(cause);
        self.location.take()
    }
}
