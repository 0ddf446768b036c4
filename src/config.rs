//! Configuration Module - User preferences from config.toml
//!
//! Supports:
//! - Log level
//! - Fingerprint side length and on/off switch
//! - Directory scan defaults

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::hash::DEFAULT_SIDE;

/// sniffhash configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,
    /// Fingerprint settings
    pub hash: HashConfig,
    /// Scan settings
    pub scan: ScanConfig,
}

/// General application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Fingerprint settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashConfig {
    /// Compute ahash/dhash for images
    pub enabled: bool,
    /// Side length images are downsampled to (bits per pass = size * size)
    pub size: u32,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            size: DEFAULT_SIDE,
        }
    }
}

/// Scan settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Number of parallel workers (0 = auto)
    pub workers: usize,
    /// Skip hidden files by default
    pub skip_hidden: bool,
    /// Max depth (0 = unlimited)
    pub max_depth: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            workers: 0, // auto-detect
            skip_hidden: true,
            max_depth: 0,
        }
    }
}

impl Config {
    /// Load config from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;

        Ok(config)
    }

    /// Save config to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;

        Ok(())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "sniffhash", "sniffhash")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".sniffhash")
                    .join("config.toml")
            })
    }

    /// Create the config file at `path` if it doesn't exist.
    ///
    /// Returns true when a file was written.
    pub fn ensure_exists_at(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        Config::default().save_to(path)?;
        tracing::info!("Created default config at {}", path.display());
        Ok(true)
    }

    /// Worker count with 0 resolved to the CPU count
    pub fn effective_workers(&self) -> usize {
        if self.scan.workers == 0 {
            num_cpus::get()
        } else {
            self.scan.workers
        }
    }
}

/// Generate a sample config file with comments
pub fn generate_sample_config() -> String {
    format!(
        r#"# sniffhash configuration
# Location: ~/.config/sniffhash/config.toml (or %APPDATA%\sniffhash\config\config.toml on Windows)

[general]
# Log level: trace, debug, info, warn, error (RUST_LOG overrides)
log_level = "info"

[hash]
# Compute ahash/dhash fingerprints for JPEG, PNG, GIF and WebP
enabled = true

# Side length images are downsampled to. ahash has size*size bits,
# dhash twice that. Fingerprints taken at different sizes don't compare.
size = {DEFAULT_SIDE}

[scan]
# Number of parallel workers (0 = auto-detect CPU count)
workers = 0

# Skip hidden files and directories
skip_hidden = true

# Maximum scan depth (0 = unlimited)
max_depth = 0
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.log_level, "info");
        assert!(config.hash.enabled);
        assert_eq!(config.hash.size, 32);
        assert!(config.scan.skip_hidden);
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.hash.size = 16;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_parse_sample_config() {
        let sample = generate_sample_config();
        let config: Config = toml::from_str(&sample).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str("[hash]\nsize = 8\n").unwrap();
        assert_eq!(config.hash.size, 8);
        assert!(config.hash.enabled);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_ensure_exists_at() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        assert!(Config::ensure_exists_at(&path).unwrap());
        assert!(!Config::ensure_exists_at(&path).unwrap());
        assert!(Config::load_from(&path).is_ok());
    }

    #[test]
    fn test_load_missing_file_errors() {
        let dir = TempDir::new().unwrap();
        assert!(Config::load_from(&dir.path().join("missing.toml")).is_err());
    }
}
