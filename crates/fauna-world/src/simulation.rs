//! Scheduler driving the predator-prey simulation.

use crate::creature::Creature;
use crate::field::Field;
use crate::habitat::Habitat;
use crate::observer::{FieldStats, FieldView, Observer};
use crate::snapshot::{CreatureRecord, Snapshot};
use fauna_core::{
    CreatureId, Error, Location, Result, SimulationConfig, Species, DEFAULT_DEPTH, DEFAULT_WIDTH,
};
use tracing::{debug, info, instrument, warn};

/// Steps a population in a stable order and reports to an observer.
///
/// Creatures act in the order they joined the population. Offspring born
/// during a step are appended after the survivors and first act on the
/// following step.
pub struct Simulator<O: Observer = FieldStats> {
    habitat: Habitat,
    population: Vec<CreatureId>,
    observer: O,
    step: u64,
    total_births: u64,
    total_deaths: u64,
}

impl<O: Observer> Simulator<O> {
    /// A populated simulator on the default 50x50 field
    pub fn new(observer: O) -> Self {
        Self::with_dimensions(DEFAULT_DEPTH, DEFAULT_WIDTH, observer)
    }

    /// A populated simulator. Non-positive dimensions fall back to the defaults.
    pub fn with_dimensions(depth: i32, width: i32, observer: O) -> Self {
        let mut sim = Self::build(SimulationConfig::with_dimensions(depth, width), observer);
        sim.reset();
        sim
    }

    pub fn from_config(config: SimulationConfig, observer: O) -> Result<Self> {
        config.validate()?;
        let mut sim = Self::build(config, observer);
        sim.reset();
        Ok(sim)
    }

    /// A simulator with an empty field, for placing creatures by hand
    pub fn empty(config: SimulationConfig, observer: O) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, observer))
    }

    fn build(mut config: SimulationConfig, observer: O) -> Self {
        if !config.has_valid_dimensions() {
            warn!(
                depth = config.depth,
                width = config.width,
                "Dimensions must be greater than zero; using defaults {}x{}",
                DEFAULT_DEPTH,
                DEFAULT_WIDTH
            );
            config.depth = DEFAULT_DEPTH;
            config.width = DEFAULT_WIDTH;
        }

        Self {
            habitat: Habitat::new(config),
            population: Vec::new(),
            observer,
            step: 0,
            total_births: 0,
            total_deaths: 0,
        }
    }

    /// Run a long simulation from the current state
    pub fn run_long_simulation(&mut self) -> u64 {
        self.simulate(self.habitat.config.long_run_steps)
    }

    /// Run up to `num_steps` steps, stopping early once the observer reports
    /// the field is no longer viable. Returns the number of steps taken.
    #[instrument(skip(self), fields(start_step = self.step))]
    pub fn simulate(&mut self, num_steps: u64) -> u64 {
        let mut taken = 0;
        while taken < num_steps && self.observer.is_viable(&self.habitat.view()) {
            self.simulate_one_step();
            taken += 1;
        }

        let counts = FieldStats::count(&self.habitat.view());
        info!(
            event = "run_summary",
            requested_steps = num_steps,
            steps_taken = taken,
            final_step = self.step,
            halted_early = taken < num_steps,
            rabbits = counts.rabbits,
            foxes = counts.foxes,
            total_births = self.total_births,
            total_deaths = self.total_deaths,
            "Simulation run finished"
        );

        taken
    }

    /// Advance by one step: every live creature acts once, the dead are
    /// dropped, and this step's offspring join the population.
    pub fn simulate_one_step(&mut self) {
        self.step += 1;

        let mut newborns = Vec::new();
        let mut acted = std::mem::take(&mut self.population);

        for &id in &acted {
            // Eaten earlier in this traversal: never act again.
            if self.habitat.is_alive(id) {
                self.habitat.act(id, &mut newborns, self.step);
            }
        }

        // Creatures that already acted may since have been eaten.
        let births = newborns.len() as u64;
        acted.extend(newborns);
        let mut survivors = Vec::with_capacity(acted.len());
        let mut deaths = 0u64;
        for id in acted {
            if self.habitat.is_alive(id) {
                survivors.push(id);
            } else {
                self.habitat.reap(id);
                deaths += 1;
            }
        }
        self.population = survivors;

        self.total_births += births;
        self.total_deaths += deaths;
        debug!(
            step = self.step,
            births = births,
            deaths = deaths,
            population = self.population.len(),
            "Step complete"
        );

        let interval = self.habitat.config.metrics_interval;
        if interval > 0 && self.step % interval == 0 {
            self.emit_population_metrics();
        }

        self.observer.show_status(self.step, &self.habitat.view());
    }

    /// Clear the field, repopulate it and restart the step counter
    pub fn reset(&mut self) {
        self.step = 0;
        self.total_births = 0;
        self.total_deaths = 0;
        self.population = self.habitat.populate();

        let counts = FieldStats::count(&self.habitat.view());
        info!(
            depth = self.habitat.field.depth(),
            width = self.habitat.field.width(),
            rabbits = counts.rabbits,
            foxes = counts.foxes,
            "Field populated"
        );

        self.observer.show_status(self.step, &self.habitat.view());
    }

    fn emit_population_metrics(&self) {
        let counts = FieldStats::count(&self.habitat.view());
        let mut age_sum = 0u64;
        let mut food_sum = 0i64;
        for id in &self.population {
            let creature = self.habitat.creature(*id);
            age_sum += creature.age() as u64;
            food_sum += creature.food_level().unwrap_or(0) as i64;
        }
        let avg_age = if self.population.is_empty() {
            0
        } else {
            age_sum / self.population.len() as u64
        };
        let avg_fox_food = if counts.foxes == 0 {
            0
        } else {
            food_sum / counts.foxes as i64
        };

        info!(
            event = "population_metrics",
            step = self.step,
            total_population = self.population.len(),
            rabbits = counts.rabbits,
            foxes = counts.foxes,
            avg_age = avg_age,
            avg_fox_food = avg_fox_food,
            total_births = self.total_births,
            total_deaths = self.total_deaths,
            "Population metrics snapshot"
        );
    }

    /// Add a rabbit at `loc` to the end of the population
    pub fn spawn_rabbit(&mut self, loc: Location, age: u32) -> Result<CreatureId> {
        self.ensure_vacant(loc)?;
        let id = self.habitat.insert(Creature::rabbit(loc, age, self.step));
        self.population.push(id);
        Ok(id)
    }

    /// Add a fox at `loc` to the end of the population
    pub fn spawn_fox(&mut self, loc: Location, age: u32, food_level: i32) -> Result<CreatureId> {
        if food_level < 0 {
            return Err(Error::InvalidState(format!(
                "fox food level must not be negative, got {}",
                food_level
            )));
        }
        self.ensure_vacant(loc)?;
        let id = self
            .habitat
            .insert(Creature::fox(loc, age, food_level, self.step));
        self.population.push(id);
        Ok(id)
    }

    fn ensure_vacant(&self, loc: Location) -> Result<()> {
        match self.habitat.field.try_object_at(loc)? {
            Some(occupant) => Err(Error::InvalidState(format!(
                "cell {} is already occupied by {}",
                loc, occupant
            ))),
            None => Ok(()),
        }
    }

    pub fn step(&self) -> u64 {
        self.step
    }

    /// Live creatures in traversal order
    pub fn population(&self) -> &[CreatureId] {
        &self.population
    }

    /// Look up a creature. Creatures removed from the population resolve to `None`.
    pub fn creature(&self, id: CreatureId) -> Option<&Creature> {
        self.habitat.creatures.get(id)
    }

    pub fn field(&self) -> &Field {
        &self.habitat.field
    }

    pub fn view(&self) -> FieldView<'_> {
        self.habitat.view()
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.habitat.config
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn into_observer(self) -> O {
        self.observer
    }

    pub fn count(&self, species: Species) -> usize {
        self.population
            .iter()
            .filter(|id| self.habitat.creature(**id).species() == species)
            .count()
    }

    pub fn snapshot(&self) -> Snapshot {
        let creatures = self
            .population
            .iter()
            .filter_map(|id| {
                let creature = self.habitat.creature(*id);
                creature.location().map(|location| CreatureRecord {
                    id: *id,
                    species: creature.species(),
                    age: creature.age(),
                    food_level: creature.food_level(),
                    location,
                    born_at: creature.born_at(),
                })
            })
            .collect();

        let view = self.habitat.view();
        let cells = self
            .habitat
            .field
            .locations()
            .map(|loc| view.object_at(loc).map(Creature::species))
            .collect();

        Snapshot {
            step: self.step,
            depth: self.habitat.field.depth(),
            width: self.habitat.field.width(),
            creatures,
            cells,
        }
    }
}

impl Default for Simulator<FieldStats> {
    fn default() -> Self {
        Self::new(FieldStats::new())
    }
}
