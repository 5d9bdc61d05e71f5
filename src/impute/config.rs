use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ImputeError;

/// Default relative half-width of the baseline fill band
pub const DEFAULT_BASELINE_SPREAD: f64 = 0.01;

/// How gaps inside a feature's data region are filled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationMethod {
    /// Straight line between the neighbouring observations, by scan position
    #[default]
    Linear,
    /// Value of the closer neighbour; ties take the earlier one
    Nearest,
    /// Carry the previous observation forward
    Pad,
}

impl FromStr for InterpolationMethod {
    type Err = ImputeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "nearest" => Ok(Self::Nearest),
            "pad" | "ffill" => Ok(Self::Pad),
            _ => Err(ImputeError::UnknownMethod(s.to_string())),
        }
    }
}

impl fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Linear => "linear",
            Self::Nearest => "nearest",
            Self::Pad => "pad",
        };
        f.write_str(name)
    }
}

/// Configuration for [`impute_intensities`](super::impute_intensities)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImputeConfig {
    /// Phase I interpolation method
    pub method: InterpolationMethod,

    /// Phase II baseline values are drawn from
    /// `[min * (1 - spread), min * (1 + spread)]`
    pub baseline_spread: f64,
}

impl Default for ImputeConfig {
    fn default() -> Self {
        Self {
            method: InterpolationMethod::default(),
            baseline_spread: DEFAULT_BASELINE_SPREAD,
        }
    }
}

impl ImputeConfig {
    /// Set the interpolation method
    pub fn with_method(mut self, method: InterpolationMethod) -> Self {
        self.method = method;
        self
    }

    /// Set the baseline spread
    pub fn with_baseline_spread(mut self, spread: f64) -> Self {
        self.baseline_spread = spread;
        self
    }

    pub(super) fn validate(&self) -> Result<(), ImputeError> {
        if !self.baseline_spread.is_finite() || !(0.0..1.0).contains(&self.baseline_spread) {
            return Err(ImputeError::InvalidSpread(self.baseline_spread));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_from_str() {
        assert_eq!("linear".parse::<InterpolationMethod>().unwrap(), InterpolationMethod::Linear);
        assert_eq!("Nearest".parse::<InterpolationMethod>().unwrap(), InterpolationMethod::Nearest);
        assert_eq!("pad".parse::<InterpolationMethod>().unwrap(), InterpolationMethod::Pad);
        assert!(matches!(
            "cubic".parse::<InterpolationMethod>(),
            Err(ImputeError::UnknownMethod(name)) if name == "cubic"
        ));
    }

    #[test]
    fn test_config_from_toml() {
        let config: ImputeConfig = toml::from_str("method = \"nearest\"").unwrap();
        assert_eq!(config.method, InterpolationMethod::Nearest);
        assert_eq!(config.baseline_spread, DEFAULT_BASELINE_SPREAD);

        assert!(toml::from_str::<ImputeConfig>("methd = \"pad\"").is_err());
    }

    #[test]
    fn test_spread_validation() {
        assert!(ImputeConfig::default().validate().is_ok());
        assert!(ImputeConfig::default().with_baseline_spread(-0.1).validate().is_err());
        assert!(ImputeConfig::default().with_baseline_spread(1.0).validate().is_err());
    }
}
