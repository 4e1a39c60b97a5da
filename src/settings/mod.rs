use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Default config file looked up in the working directory (`tickbot.toml`)
pub const DEFAULT_CONFIG_NAME: &str = "tickbot";
pub const ENV_PREFIX: &str = "TICKBOT";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Configuration validation error: {0}")]
    Validation(String),
}

/// Simulation parameters
///
/// Defaults reproduce the fixed-constant run: a N(0, 1) walk from 100, a
/// 10-price window, $1000 of cash and 100 ticks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    pub mean: f64,
    pub stddev: f64,
    pub initial_price: f64,
    pub window_size: usize,
    pub initial_funds: f64,
    pub ticks: usize,
    /// Fixed RNG seed; `None` seeds from OS entropy
    pub seed: Option<u64>,
    /// Fail the run on a non-positive price instead of trading on it
    pub strict_prices: bool,
    /// Number of independent simulations
    pub runs: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            mean: 0.0,
            stddev: 1.0,
            initial_price: 100.0,
            window_size: 10,
            initial_funds: 1000.0,
            ticks: 100,
            seed: None,
            strict_prices: false,
            runs: 1,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_size == 0 {
            return Err(ConfigError::Validation(
                "window_size must be at least 1".to_string(),
            ));
        }
        if self.ticks == 0 {
            return Err(ConfigError::Validation("ticks must be at least 1".to_string()));
        }
        if self.runs == 0 {
            return Err(ConfigError::Validation("runs must be at least 1".to_string()));
        }
        if !self.mean.is_finite() {
            return Err(ConfigError::Validation(format!(
                "mean must be finite, got {}",
                self.mean
            )));
        }
        if !self.stddev.is_finite() || self.stddev < 0.0 {
            return Err(ConfigError::Validation(format!(
                "stddev must be finite and non-negative, got {}",
                self.stddev
            )));
        }
        if !self.initial_price.is_finite() {
            return Err(ConfigError::Validation(format!(
                "initial_price must be finite, got {}",
                self.initial_price
            )));
        }
        if !self.initial_funds.is_finite() || self.initial_funds < 0.0 {
            return Err(ConfigError::Validation(format!(
                "initial_funds must be finite and non-negative, got {}",
                self.initial_funds
            )));
        }
        Ok(())
    }

    /// Seed for the `run`-th simulation of a batch
    pub fn seed_for_run(&self, run: usize) -> Option<u64> {
        self.seed.map(|seed| seed.wrapping_add(run as u64))
    }
}

/// Values given on the command line, applied on top of file and env
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub mean: Option<f64>,
    pub stddev: Option<f64>,
    pub initial_price: Option<f64>,
    pub window_size: Option<usize>,
    pub initial_funds: Option<f64>,
    pub ticks: Option<usize>,
    pub seed: Option<u64>,
    pub strict_prices: bool,
    pub runs: Option<usize>,
}

impl Overrides {
    pub fn apply(&self, config: &mut SimConfig) {
        if let Some(mean) = self.mean {
            config.mean = mean;
        }
        if let Some(stddev) = self.stddev {
            config.stddev = stddev;
        }
        if let Some(initial_price) = self.initial_price {
            config.initial_price = initial_price;
        }
        if let Some(window_size) = self.window_size {
            config.window_size = window_size;
        }
        if let Some(initial_funds) = self.initial_funds {
            config.initial_funds = initial_funds;
        }
        if let Some(ticks) = self.ticks {
            config.ticks = ticks;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.strict_prices {
            config.strict_prices = true;
        }
        if let Some(runs) = self.runs {
            config.runs = runs;
        }
    }
}

/// Builds a `SimConfig` from defaults, an optional TOML file and environment
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    env_prefix: String,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self {
            file: None,
            env_prefix: ENV_PREFIX.to_string(),
        }
    }
}

impl ConfigLoader {
    /// Use an explicit config file; unlike the default lookup it must exist
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    pub fn load(&self) -> Result<SimConfig, ConfigError> {
        let file_source = match &self.file {
            Some(path) => config::File::from(path.as_path()).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        let builder = config::Config::builder()
            .add_source(file_source)
            .add_source(config::Environment::with_prefix(&self.env_prefix).try_parsing(true))
            .build()?;

        let config = builder.try_deserialize::<SimConfig>()?;
        tracing::debug!(?config, "Loaded configuration");

        Ok(config)
    }
}
