//! Parser configuration.
//!
//! Controls the defaults applied when the source text leaves something out.
//!
//! # Example YAML
//!
//! ```yaml
//! default_title: Imported Routine
//! default_rest_seconds: 60
//! default_reps: 10
//! folder_id: "42"
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use routine_import_core::{DEFAULT_REPS, DEFAULT_REST_SECONDS, DEFAULT_ROUTINE_TITLE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading or saving a [`ParserConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Values that parse but make no sense.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Convenience alias for results with [`ConfigError`].
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Defaults used while extracting routines.
///
/// Missing keys take the built-in defaults.
///
/// # Examples
///
/// ```
/// use routine_import_parser::ParserConfig;
///
/// let config: ParserConfig = serde_yaml::from_str("default_rest_seconds: 90").unwrap();
/// assert_eq!(config.default_rest_seconds, 90);
/// assert_eq!(config.default_reps, 10);
/// assert_eq!(config.default_title, "Imported Routine");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Title used when the source names none.
    pub default_title: String,
    /// Rest between sets when the source gives none.
    pub default_rest_seconds: u32,
    /// Reps per set for abbreviated JSON entries without `reps`.
    pub default_reps: u32,
    /// Destination folder for routines that do not carry one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            default_title: DEFAULT_ROUTINE_TITLE.to_string(),
            default_rest_seconds: DEFAULT_REST_SECONDS,
            default_reps: DEFAULT_REPS,
            folder_id: None,
        }
    }
}

impl ParserConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::IoError`] if the file cannot be read,
    /// [`ConfigError::YamlError`] if parsing fails, or
    /// [`ConfigError::Invalid`] for a blank default title.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config: Self = serde_yaml::from_reader(reader)?;
        config.check()?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::IoError`] if the file cannot be written, or
    /// [`ConfigError::YamlError`] if serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    fn check(&self) -> Result<()> {
        if self.default_title.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "default_title must not be blank".to_string(),
            ));
        }
        Ok(())
    }
}
