//! Parser configuration.
//!
//! Controls the program name used in diagnostics, the time unit table for
//! duration values, per-command core limits, and the defaults reported for
//! flags the user did not supply.
//!
//! # Example YAML
//!
//! ```yaml
//! program_name: wperf
//! time_units:
//!   ms: 0.001
//!   s: 1.0
//!   m: 60.0
//!   h: 3600.0
//!   d: 86400.0
//! sample_max_cores: 1
//! count_max_cores: 128
//! record_spawn_delay_ms: 1000
//! sample_display_row: 50
//! ```

use std::collections::BTreeMap;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::registry::CommandTag;
use crate::units::default_time_units;

/// Settings shared by every parse performed with one [`ArgParser`](crate::ArgParser).
///
/// Fields missing from a YAML file fall back to their defaults.
///
/// # Examples
///
/// ```
/// use wperf_args_core::{CommandTag, ParserConfig};
///
/// let config = ParserConfig::default();
/// assert_eq!(config.program_name, "wperf");
/// assert_eq!(config.max_cores(CommandTag::Sample), 1);
/// assert_eq!(config.time_units["m"], 60.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Program name shown at the start of reconstructed command lines.
    pub program_name: String,
    /// Unit suffix to seconds multiplier.
    pub time_units: BTreeMap<String, f64>,
    /// Maximum cores accepted by `sample`.
    pub sample_max_cores: usize,
    /// Maximum cores accepted by every other command.
    pub count_max_cores: usize,
    /// Delay before sampling a spawned process, in milliseconds.
    pub record_spawn_delay_ms: u64,
    /// Number of sample rows displayed.
    pub sample_display_row: u64,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            program_name: "wperf".to_string(),
            time_units: default_time_units(),
            sample_max_cores: 1,
            count_max_cores: 128,
            record_spawn_delay_ms: 1000,
            sample_display_row: 50,
        }
    }
}

impl ParserConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::ConfigError::IoError) if the file cannot
    /// be read, or [`YamlError`](crate::ConfigError::YamlError) if parsing
    /// fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::ConfigError::IoError) if the file cannot
    /// be written, or [`YamlError`](crate::ConfigError::YamlError) if
    /// serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Maximum number of cores a core list may name under `command`.
    pub fn max_cores(&self, command: CommandTag) -> usize {
        match command {
            CommandTag::Sample => self.sample_max_cores,
            _ => self.count_max_cores,
        }
    }
}
