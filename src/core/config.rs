//! Ambient configuration: logging level/target and input/output directories.
//!
//! Loading and persisting this configuration is the CLI's concern; this
//! module only owns the schema, defaults, and in-memory get/set/unset logic
//! so the CLI's `config` subcommand has something to drive.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Default CLI configuration loaded based on build profile.
/// Uses release defaults in release mode, debug defaults in debug mode.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace).
    #[serde(default)]
    pub level: String,
    /// Log file path.
    #[serde(default)]
    pub file: String,
    /// Enable verbose output.
    #[serde(default)]
    pub verbose: bool,
}

/// Input/output path configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding workload-sheet and scheduling-input JSON documents.
    #[serde(default)]
    pub input_dir: String,
    /// Directory schedule-result summaries are written to.
    #[serde(default)]
    pub output_dir: String,
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Path settings.
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Optional CLI overrides for configuration values.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level.
    pub level: Option<String>,
    /// Override log file path.
    pub file: Option<String>,
    /// Override verbose flag.
    pub verbose: Option<bool>,
    /// Override the input directory.
    pub input_dir: Option<String>,
    /// Override the output directory.
    pub output_dir: Option<String>,
}

impl Config {
    /// Get the `$CAMPUS_SCHEDULER` directory path.
    ///
    /// - Linux: `~/.config/campus-scheduler`
    /// - macOS: `~/Library/Application Support/campus-scheduler`
    /// - Windows: `%APPDATA%\campus-scheduler`
    #[must_use]
    pub fn get_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("campus-scheduler")
    }

    /// Merge missing fields from defaults into this config.
    ///
    /// Only fields that are empty in the current config and non-empty in
    /// defaults are updated, so upgrading the binary adds new fields without
    /// clobbering existing user settings.
    ///
    /// # Returns
    /// `true` if any fields were added/changed, `false` otherwise.
    #[allow(clippy::useless_let_if_seq)]
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let mut changed = false;

        if self.logging.level.is_empty() && !defaults.logging.level.is_empty() {
            self.logging.level.clone_from(&defaults.logging.level);
            changed = true;
        }
        if self.logging.file.is_empty() && !defaults.logging.file.is_empty() {
            self.logging.file.clone_from(&defaults.logging.file);
            changed = true;
        }
        if self.paths.input_dir.is_empty() && !defaults.paths.input_dir.is_empty() {
            self.paths.input_dir.clone_from(&defaults.paths.input_dir);
            changed = true;
        }
        if self.paths.output_dir.is_empty() && !defaults.paths.output_dir.is_empty() {
            self.paths
                .output_dir
                .clone_from(&defaults.paths.output_dir);
            changed = true;
        }

        changed
    }

    /// Apply CLI-provided overrides onto the loaded configuration.
    ///
    /// Only non-`None` values in the overrides struct replace config values;
    /// nothing is persisted to disk by this call.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file.clone_from(file);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }
        if let Some(input_dir) = &overrides.input_dir {
            self.paths.input_dir.clone_from(input_dir);
        }
        if let Some(output_dir) = &overrides.output_dir {
            self.paths.output_dir.clone_from(output_dir);
        }
    }

    /// Get the user config file path: `config.toml` in release builds,
    /// `dconfig.toml` in debug builds, under [`get_config_dir`](Self::get_config_dir).
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_config_dir().join(CONFIG_FILE_NAME)
    }

    /// Expand `$CAMPUS_SCHEDULER` in a string to the actual config directory.
    #[must_use]
    fn expand_variables(value: &str) -> String {
        if value.contains("$CAMPUS_SCHEDULER") {
            let dir = Self::get_config_dir();
            value.replace("$CAMPUS_SCHEDULER", dir.to_str().unwrap_or("."))
        } else {
            value.to_string()
        }
    }

    /// Parse a TOML configuration string, expanding `$CAMPUS_SCHEDULER` in its values.
    ///
    /// # Errors
    /// Returns an error if the TOML cannot be parsed or doesn't match the expected schema.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;

        config.logging.file = Self::expand_variables(&config.logging.file);
        config.paths.input_dir = Self::expand_variables(&config.paths.input_dir);
        config.paths.output_dir = Self::expand_variables(&config.paths.output_dir);

        Ok(config)
    }

    /// Load the compiled-in default configuration for this build profile.
    ///
    /// # Panics
    /// Panics if the embedded default configuration is invalid TOML; this
    /// should never happen since the defaults ship with the binary.
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).expect("failed to parse compiled-in default configuration")
    }

    /// Load configuration from file, or create it from defaults on first run.
    ///
    /// Existing files are merged against defaults so upgrading the binary
    /// picks up newly added fields without discarding user settings.
    #[must_use]
    pub fn load() -> Self {
        let config_file = Self::get_config_file_path();
        let defaults = Self::from_defaults();

        if config_file.exists() {
            if let Ok(content) = fs::read_to_string(&config_file) {
                if let Ok(mut config) = Self::from_toml(&content) {
                    if config.merge_defaults(&defaults) {
                        let _ = config.save();
                    }
                    return config;
                }
            }
        } else {
            if let Some(parent) = config_file.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let _ = defaults.save();
            return defaults;
        }

        defaults
    }

    /// Serialize and write this configuration to the platform-specific config file.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized, the config
    /// directory cannot be created, or the file cannot be written.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_file = Self::get_config_file_path();
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(&config_file, toml_str)?;
        Ok(())
    }

    /// Get a configuration value by key (`level`, `file`, `verbose`, `input_dir`, `output_dir`).
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "level" => Some(self.logging.level.clone()),
            "file" => Some(self.logging.file.clone()),
            "verbose" => Some(self.logging.verbose.to_string()),
            "input_dir" | "input-dir" => Some(self.paths.input_dir.clone()),
            "output_dir" | "output-dir" => Some(self.paths.output_dir.clone()),
            _ => None,
        }
    }

    /// Set a configuration value by key.
    ///
    /// # Errors
    /// Returns an error if the key is unrecognized, or the value fails to
    /// parse into the field's type (e.g. a non-boolean for `verbose`).
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "level" => self.logging.level = value.to_string(),
            "file" => self.logging.file = value.to_string(),
            "verbose" => {
                self.logging.verbose = value
                    .parse::<bool>()
                    .map_err(|_| format!("invalid boolean value for 'verbose': '{value}'"))?;
            }
            "input_dir" | "input-dir" => self.paths.input_dir = value.to_string(),
            "output_dir" | "output-dir" => self.paths.output_dir = value.to_string(),
            _ => return Err(format!("unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Reset a single configuration value to its default.
    ///
    /// # Errors
    /// Returns an error if the key is unrecognized.
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        match key {
            "level" => self.logging.level.clone_from(&defaults.logging.level),
            "file" => self.logging.file.clone_from(&defaults.logging.file),
            "verbose" => self.logging.verbose = defaults.logging.verbose,
            "input_dir" | "input-dir" => self
                .paths
                .input_dir
                .clone_from(&defaults.paths.input_dir),
            "output_dir" | "output-dir" => self
                .paths
                .output_dir
                .clone_from(&defaults.paths.output_dir),
            _ => return Err(format!("unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Delete the on-disk config file so the next [`load`](Self::load) recreates it from defaults.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be deleted.
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[paths]")?;
        writeln!(f, "  input_dir = \"{}\"", self.paths.input_dir)?;
        writeln!(f, "  output_dir = \"{}\"", self.paths.output_dir)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_embedded_defaults() {
        let config = Config::from_defaults();
        assert!(!config.logging.level.is_empty());
        assert!(!config.paths.input_dir.is_empty());
    }

    #[test]
    fn get_and_set_round_trip() {
        let mut config = Config::default();
        config.set("level", "debug").unwrap();
        assert_eq!(config.get("level"), Some("debug".to_string()));
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut config = Config::default();
        assert!(config.set("bogus", "x").is_err());
    }

    #[test]
    fn set_rejects_invalid_boolean() {
        let mut config = Config::default();
        assert!(config.set("verbose", "maybe").is_err());
    }

    #[test]
    fn unset_restores_default() {
        let defaults = Config::from_defaults();
        let mut config = defaults.clone();
        config.set("level", "trace").unwrap();
        config.unset("level", &defaults).unwrap();
        assert_eq!(config.logging.level, defaults.logging.level);
    }

    #[test]
    fn overrides_only_touch_present_fields() {
        let mut config = Config::from_defaults();
        let original_file = config.logging.file.clone();
        let overrides = ConfigOverrides {
            verbose: Some(true),
            ..Default::default()
        };
        config.apply_overrides(&overrides);
        assert!(config.logging.verbose);
        assert_eq!(config.logging.file, original_file);
    }
}
