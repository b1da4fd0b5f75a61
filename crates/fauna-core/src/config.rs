//! Configuration types for the simulation.

use crate::error::{Error, Result};
use crate::types::Species;
use serde::{Deserialize, Serialize};

/// Seed used when runs are meant to be reproducible
pub const DEFAULT_SEED: u64 = 1111;
/// Default field depth (rows)
pub const DEFAULT_DEPTH: i32 = 50;
/// Default field width (columns)
pub const DEFAULT_WIDTH: i32 = 50;

/// Life-history parameters shared by every member of a species
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesConfig {
    /// Age at which a creature may start to breed
    pub breeding_age: u32,
    /// A creature older than this dies
    pub max_age: u32,
    /// Chance of breeding on a step once of breeding age (0.0 to 1.0)
    pub breeding_probability: f64,
    /// Largest litter a single breeding event can produce
    pub max_litter_size: u32,
}

impl SpeciesConfig {
    pub fn rabbit() -> Self {
        Self {
            breeding_age: 5,
            max_age: 40,
            breeding_probability: 0.15,
            max_litter_size: 4,
        }
    }

    pub fn fox() -> Self {
        Self {
            breeding_age: 10,
            max_age: 150,
            breeding_probability: 0.35,
            max_litter_size: 5,
        }
    }

    fn validate(&self, species: Species) -> Result<()> {
        if !(0.0..=1.0).contains(&self.breeding_probability) {
            return Err(Error::InvalidConfig(format!(
                "{} breeding probability {} is outside [0, 1]",
                species, self.breeding_probability
            )));
        }
        if self.max_litter_size == 0 {
            return Err(Error::InvalidConfig(format!(
                "{} max litter size must be at least 1",
                species
            )));
        }
        if self.max_age == 0 {
            return Err(Error::InvalidConfig(format!(
                "{} max age must be at least 1",
                species
            )));
        }
        Ok(())
    }
}

/// How the random stream is seeded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeedMode {
    /// Reproducible runs from a fixed seed
    Fixed(u64),
    /// Seed drawn from the operating system
    Entropy,
}

impl Default for SeedMode {
    fn default() -> Self {
        SeedMode::Fixed(DEFAULT_SEED)
    }
}

/// Simulation configuration parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of rows; non-positive values fall back to the default
    pub depth: i32,
    /// Number of columns; non-positive values fall back to the default
    pub width: i32,
    /// Random stream seeding
    pub seed: SeedMode,
    pub rabbit: SpeciesConfig,
    pub fox: SpeciesConfig,
    /// Steps a fox can go after eating one rabbit before it starves
    pub rabbit_food_value: i32,
    /// Chance that a fox is created in a given cell at population time
    pub fox_creation_probability: f64,
    /// Chance that a rabbit is created in a given cell at population time
    pub rabbit_creation_probability: f64,
    /// Steps run by a long simulation
    pub long_run_steps: u64,
    /// Emit population metrics every this many steps (0 disables)
    pub metrics_interval: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            width: DEFAULT_WIDTH,
            seed: SeedMode::default(),
            rabbit: SpeciesConfig::rabbit(),
            fox: SpeciesConfig::fox(),
            rabbit_food_value: 7,
            fox_creation_probability: 0.02,
            rabbit_creation_probability: 0.08,
            long_run_steps: 500,
            metrics_interval: 100,
        }
    }
}

impl SimulationConfig {
    pub fn with_dimensions(depth: i32, width: i32) -> Self {
        Self {
            depth,
            width,
            ..Default::default()
        }
    }

    pub fn species(&self, species: Species) -> &SpeciesConfig {
        match species {
            Species::Rabbit => &self.rabbit,
            Species::Fox => &self.fox,
        }
    }

    /// Whether both dimensions are usable as-is
    pub fn has_valid_dimensions(&self) -> bool {
        self.depth > 0 && self.width > 0
    }

    /// Field dimensions, substituting the defaults when either is non-positive
    pub fn effective_dimensions(&self) -> (usize, usize) {
        if self.has_valid_dimensions() {
            (self.depth as usize, self.width as usize)
        } else {
            (DEFAULT_DEPTH as usize, DEFAULT_WIDTH as usize)
        }
    }

    /// Check the parameters the engine relies on.
    ///
    /// Dimensions are not checked here; bad dimensions are substituted rather
    /// than rejected.
    pub fn validate(&self) -> Result<()> {
        self.rabbit.validate(Species::Rabbit)?;
        self.fox.validate(Species::Fox)?;

        if self.rabbit_food_value <= 0 {
            return Err(Error::InvalidConfig(format!(
                "rabbit food value must be positive, got {}",
                self.rabbit_food_value
            )));
        }

        for (name, p) in [
            ("fox creation probability", self.fox_creation_probability),
            ("rabbit creation probability", self.rabbit_creation_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(Error::InvalidConfig(format!("{} {} is outside [0, 1]", name, p)));
            }
        }

        Ok(())
    }
}

/// Runner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub simulation: SimulationConfig,
    /// Steps to run; `None` runs a long simulation
    pub steps: Option<u64>,
    /// Draw the grid every this many steps (0 prints status lines only)
    pub render_every: u64,
    /// Log filter used when `RUST_LOG` is not set
    pub log_filter: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            steps: None,
            render_every: 50,
            log_filter: "info,fauna_world=info".to_string(),
        }
    }
}

impl RunnerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: RunnerConfig = serde_json::from_str(json)?;
        config.simulation.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON config file
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs() {
        let config = SimulationConfig::default();
        assert_eq!(config.depth, 50);
        assert_eq!(config.width, 50);
        assert_eq!(config.seed, SeedMode::Fixed(1111));
        assert_eq!(config.rabbit.max_age, 40);
        assert_eq!(config.fox.max_litter_size, 5);
        assert_eq!(config.rabbit_food_value, 7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_dimension_substitution() {
        let config = SimulationConfig::with_dimensions(0, 20);
        assert!(!config.has_valid_dimensions());
        assert_eq!(config.effective_dimensions(), (50, 50));

        let config = SimulationConfig::with_dimensions(-3, -3);
        assert_eq!(config.effective_dimensions(), (50, 50));

        let config = SimulationConfig::with_dimensions(3, 7);
        assert_eq!(config.effective_dimensions(), (3, 7));
    }

    #[test]
    fn test_validation_rejects_bad_parameters() {
        let mut config = SimulationConfig::default();
        config.fox.breeding_probability = 1.5;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let mut config = SimulationConfig::default();
        config.rabbit.max_litter_size = 0;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.rabbit_food_value = 0;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.rabbit_creation_probability = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_runner_config_from_partial_json() {
        let json = r#"{ "simulation": { "depth": 20, "width": 30, "seed": "Entropy" }, "steps": 10 }"#;
        let config = RunnerConfig::from_json(json).unwrap();
        assert_eq!(config.simulation.depth, 20);
        assert_eq!(config.simulation.width, 30);
        assert_eq!(config.simulation.seed, SeedMode::Entropy);
        assert_eq!(config.simulation.fox, SpeciesConfig::fox());
        assert_eq!(config.steps, Some(10));
        assert_eq!(config.render_every, 50);
    }

    #[test]
    fn test_runner_config_rejects_invalid_simulation() {
        let json = r#"{ "simulation": { "fox_creation_probability": 2.0 } }"#;
        assert!(RunnerConfig::from_json(json).is_err());
    }

    #[test]
    fn test_runner_config_missing_file() {
        let path = std::env::temp_dir().join("fauna-no-such-config.json");
        let err = RunnerConfig::from_path(&path).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_runner_config_from_file() {
        let path = std::env::temp_dir().join(format!("fauna-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "steps": 3 }"#).unwrap();
        let config = RunnerConfig::from_path(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.steps, Some(3));
    }
}
