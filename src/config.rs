use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CATALOG_ENV: &str = "MOVIE_PICKER_CSV";
pub const SEED_ENV: &str = "MOVIE_PICKER_SEED";
pub const CONFIG_ENV: &str = "MOVIE_PICKER_CONFIG";
pub const NO_COLOR_ENV: &str = "NO_COLOR";

/// Runtime configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// CSV file holding the catalog
    pub catalog_path: PathBuf,
    /// Fixed RNG seed for reproducible picks
    pub seed: Option<u64>,
    /// Emit ANSI colors in movie cards
    pub color: bool,
}

impl Config {
    /// Create a new default configuration
    pub fn new(catalog_path: impl Into<PathBuf>) -> Self {
        Self {
            catalog_path: catalog_path.into(),
            seed: None,
            color: true,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.catalog_path.exists() {
            return Err(Error::Config(format!(
                "Catalog file does not exist: {}",
                self.catalog_path.display()
            )));
        }

        if !self.catalog_path.is_file() {
            return Err(Error::Config(format!(
                "Catalog path is not a file: {}",
                self.catalog_path.display()
            )));
        }

        Ok(())
    }
}

/// Optional YAML config file, e.g. `~/.movie-picker/config.yml`:
///
/// ```yaml
/// catalog: /home/me/movies.csv
/// seed: 42
/// color: false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub catalog: Option<PathBuf>,
    pub seed: Option<u64>,
    pub color: Option<bool>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }
}

/// Builder for creating configurations
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with default settings
    pub fn new(catalog_path: impl Into<PathBuf>) -> Self {
        Self {
            config: Config::new(catalog_path),
        }
    }

    /// Set the catalog file
    pub fn catalog(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.catalog_path = path.into();
        self
    }

    /// Fix the RNG seed
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Enable or disable colored output
    pub fn color(mut self, enabled: bool) -> Self {
        self.config.color = enabled;
        self
    }

    /// Apply values from a config file; unset keys keep the current value
    pub fn file(mut self, file: FileConfig) -> Self {
        if let Some(catalog) = file.catalog {
            self.config.catalog_path = catalog;
        }
        if let Some(seed) = file.seed {
            self.config.seed = Some(seed);
        }
        if let Some(color) = file.color {
            self.config.color = color;
        }
        self
    }

    /// Apply `MOVIE_PICKER_CSV`, `MOVIE_PICKER_SEED` and `NO_COLOR`
    pub fn env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(path) = lookup(CATALOG_ENV).filter(|p| !p.trim().is_empty()) {
            self.config.catalog_path = PathBuf::from(path);
        }
        if let Some(seed) = lookup(SEED_ENV) {
            let seed = seed.trim().parse::<u64>().map_err(|_| {
                Error::Config(format!("{} must be an unsigned integer, got '{}'", SEED_ENV, seed))
            })?;
            self.config.seed = Some(seed);
        }
        if lookup(NO_COLOR_ENV).is_some_and(|v| !v.is_empty()) {
            self.config.color = false;
        }
        Ok(self)
    }

    /// Build the final configuration
    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        debug!(config = ?self.config, "resolved configuration");
        Ok(self.config)
    }
}

/// `movies.csv` next to the running executable
pub fn default_catalog_path() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    let dir = exe
        .parent()
        .ok_or_else(|| Error::Config("Could not determine executable directory".to_string()))?;
    Ok(dir.join("movies.csv"))
}

/// `$HOME/.movie-picker/config.yml`, if a home directory is known
pub fn default_config_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .ok()
        .map(|home| PathBuf::from(home).join(".movie-picker").join("config.yml"))
}
