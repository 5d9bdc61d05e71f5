//! TOML configuration file support.
//!
//! Settings shared across runs can live in a config file instead of flags.
//! Flags override file values, file values override built-in defaults.
//!
//! ```toml
//! # dbdi.toml
//! [alignment]
//! ppm = 2.0
//! mode = "sequential"
//! collision = "nearest-wins"
//!
//! [imputation]
//! method = "linear"
//! baseline_spread = 0.01
//! seed = 42
//!
//! [adducts]
//! method = "spearman"
//! threshold = 0.9
//! mass_error = 2.0
//!
//! [[adducts.rules]]
//! deltamz = 2.01565
//! motive = "H2"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use dbdi::adducts::{AdductRule, CorrelationMethod};
use dbdi::align::{AlignMode, CollisionPolicy};
use dbdi::impute::InterpolationMethod;

/// Root configuration structure for dbdi.toml files.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Alignment settings.
    #[serde(default)]
    pub alignment: AlignmentConfig,

    /// Imputation settings.
    #[serde(default)]
    pub imputation: ImputationConfig,

    /// Adduct search settings.
    #[serde(default)]
    pub adducts: AdductsConfig,
}

/// Configuration for the align command.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlignmentConfig {
    /// Relative m/z window in ppm.
    pub ppm: Option<f64>,

    /// Alignment driver.
    pub mode: Option<AlignMode>,

    /// Within-scan collision policy.
    pub collision: Option<CollisionPolicy>,
}

/// Configuration for the impute command.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImputationConfig {
    /// Interpolation method.
    pub method: Option<InterpolationMethod>,

    /// Relative half-width of the baseline band.
    pub baseline_spread: Option<f64>,

    /// Seed of the baseline generator.
    pub seed: Option<u64>,
}

/// Configuration for the adducts command.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdductsConfig {
    /// Correlation coefficient.
    pub method: Option<CorrelationMethod>,

    /// Correlation threshold.
    pub threshold: Option<f64>,

    /// Mass error in ppm.
    pub mass_error: Option<f64>,

    /// Custom rules appended to the defaults.
    #[serde(default)]
    pub rules: Vec<AdductRule>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Load the file when a path is given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::from_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [alignment]
            ppm = 5.0
            mode = "batch"
            collision = "last-write-wins"

            [imputation]
            method = "pad"
            seed = 7

            [adducts]
            method = "kendall"
            threshold = 0.8

            [[adducts.rules]]
            deltamz = 2.01565
            motive = "H2"
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.alignment.ppm, Some(5.0));
        assert_eq!(config.alignment.mode, Some(AlignMode::Batch));
        assert_eq!(config.alignment.collision, Some(CollisionPolicy::LastWriteWins));
        assert_eq!(config.imputation.method, Some(InterpolationMethod::Pad));
        assert_eq!(config.imputation.seed, Some(7));
        assert_eq!(config.imputation.baseline_spread, None);
        assert_eq!(config.adducts.method, Some(CorrelationMethod::Kendall));
        assert_eq!(config.adducts.rules, vec![AdductRule::new(2.01565, "H2")]);
    }

    #[test]
    fn test_partial_config() {
        let config = Config::from_str("[alignment]\nppm = 10").unwrap();
        assert_eq!(config.alignment.ppm, Some(10.0));
        assert_eq!(config.alignment.mode, None);
        assert!(config.adducts.rules.is_empty());
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.alignment.ppm, None);
    }

    #[test]
    fn test_rejects_unknown_fields() {
        assert!(Config::from_str("[alignment]\nppm_window = 2").is_err());
        assert!(Config::from_str("[[adducts.rules]]\ndeltamz = 2.0\nlabel = \"H2\"").is_err());
    }
}
