//! # Configuration Management Module
//!
//! ## Purpose
//! Centralized configuration for the listing matcher, loaded from a TOML
//! file with environment variable overrides and validation.
//!
//! ## Configuration Sources (in order of precedence)
//! 1. Environment variables (`LISTING_MATCHER_*`)
//! 2. Configuration file
//! 3. Default values
//!
//! ## Usage
//! ```rust,no_run
//! use listing_matcher::config::Config;
//!
//! # fn main() -> listing_matcher::Result<()> {
//! let config = Config::from_file("config.toml")?;
//! println!("parallel matching: {}", config.matching.parallel);
//! # Ok(())
//! # }
//! ```

use crate::errors::{MatchError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure containing all system settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Matching behavior
    pub matching: MatchingConfig,
    /// Result sink behavior
    pub output: OutputConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

/// Matching behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Strip trailing "for ..." / "pour ..." accessory clauses from titles
    pub strip_accessory_clause: bool,
    /// Fan listings out across the thread pool
    pub parallel: bool,
    /// Worker thread count; 0 lets the pool decide
    pub threads: usize,
}

/// Result sink configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pass unmatched listings through unchanged instead of dropping them
    pub emit_unmatched: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Emit structured JSON log lines
    pub json_format: bool,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            strip_accessory_clause: true,
            parallel: true,
            threads: num_cpus::get(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            emit_unmatched: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::from_file("config.toml")
    }

    /// Load configuration from a specific file. A missing file is not an
    /// error; defaults apply with a warning.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|e| MatchError::Config {
                message: format!("failed to read config file {path:?}: {e}"),
            })?;
            toml::from_str(&content).map_err(|e| MatchError::Config {
                message: format!("failed to parse config file {path:?}: {e}"),
            })?
        } else {
            tracing::warn!("configuration file not found: {:?}, using defaults", path);
            Self::default()
        };

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(level) = std::env::var("LISTING_MATCHER_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(threads) = std::env::var("LISTING_MATCHER_THREADS") {
            self.matching.threads = threads.parse().map_err(|_| MatchError::Config {
                message: "invalid thread count in LISTING_MATCHER_THREADS".to_string(),
            })?;
        }
        if let Ok(emit) = std::env::var("LISTING_MATCHER_EMIT_UNMATCHED") {
            self.output.emit_unmatched = emit.parse().map_err(|_| MatchError::Config {
                message: "invalid boolean in LISTING_MATCHER_EMIT_UNMATCHED".to_string(),
            })?;
        }
        Ok(())
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.logging.level.parse::<tracing::Level>().is_err() {
            return Err(MatchError::Validation {
                field: "logging.level".to_string(),
                reason: format!("unrecognized log level {:?}", self.logging.level),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!(config.matching.strip_accessory_clause);
        assert!(!config.output.emit_unmatched);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[output]\nemit_unmatched = true\n\n[logging]\nlevel = \"debug\"\n"
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert!(config.output.emit_unmatched);
        assert_eq!(config.logging.level, "debug");
        // Untouched sections keep their defaults.
        assert!(config.matching.parallel);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = Config::from_file("definitely-not-a-real-config.toml").unwrap();
        assert!(!config.output.emit_unmatched);
    }

    #[test]
    fn bad_log_level_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nlevel = \"loud\"\n").unwrap();

        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, MatchError::Validation { .. }));
    }
}
