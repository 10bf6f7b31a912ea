//! File-based configuration loading.

use super::Store;
use crate::error::{ConfigError, Result};
use config::{File, Map, Value};
use std::path::{Path, PathBuf};

/// Loads a [`Store`] from a YAML, TOML, or JSON file, with the format
/// detected from the file extension.
///
/// # Examples
///
/// ```rust,no_run
/// use xref_config::sources::FileSource;
///
/// # fn example() -> xref_config::error::Result<()> {
/// let store = FileSource::new("config/default.yaml").load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Create a new file source.
    ///
    /// The format is detected from the file extension:
    /// - `.yaml`, `.yml` -> YAML
    /// - `.toml` -> TOML
    /// - `.json` -> JSON
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path this source reads.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Validate that the file extension is supported.
    fn validate_extension(&self) -> Result<()> {
        let extension = self
            .path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                ConfigError::LoadError(format!(
                    "Unable to determine file format for: {}",
                    self.path.display()
                ))
            })?;

        match extension {
            "yaml" | "yml" | "toml" | "json" => Ok(()),
            _ => Err(ConfigError::LoadError(format!(
                "Unsupported file extension: {}. Supported: .yaml, .yml, .toml, .json",
                extension
            ))),
        }
    }

    /// Read and parse the file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::LoadError`] if the extension is unsupported, the
    /// file does not exist, or it cannot be parsed.
    pub fn load(&self) -> Result<Store> {
        self.validate_extension()?;

        if !self.path.exists() {
            return Err(ConfigError::LoadError(format!(
                "Configuration file not found: {}",
                self.path.display()
            )));
        }

        let parsed = config::Config::builder()
            .add_source(File::from(self.path.clone()).required(true))
            .build()
            .map_err(|e| {
                ConfigError::LoadError(format!(
                    "Failed to load file {}: {}",
                    self.path.display(),
                    e
                ))
            })?;

        let map = parsed
            .try_deserialize::<Map<String, Value>>()
            .map_err(|e| {
                ConfigError::LoadError(format!(
                    "Failed to parse file {}: {}",
                    self.path.display(),
                    e
                ))
            })?;

        tracing::debug!(path = %self.path.display(), "loaded configuration file");
        Ok(Store::from_map(map))
    }
}
