//! Predator-prey simulation engine.
//!
//! Foxes and rabbits age, breed, move and (for foxes) hunt on a bounded grid.
//! All randomness comes from one seeded stream, so runs with a fixed seed are
//! reproducible step for step.

pub mod arena;
pub mod creature;
pub mod field;
mod habitat;
pub mod observer;
mod populate;
pub mod random;
pub mod simulation;
pub mod snapshot;

pub use arena::CreatureArena;
pub use creature::{Creature, Kind};
pub use field::Field;
pub use observer::{
    Colour, FieldStats, FieldView, NullObserver, Observer, Palette, PopulationCount, TextView,
    Token,
};
pub use random::Randomizer;
pub use simulation::Simulator;
pub use snapshot::{CreatureRecord, Snapshot};
