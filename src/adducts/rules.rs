use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

use super::error::AdductError;

/// Header of the mass-difference column in rule files
pub const DELTA_COLUMN: &str = "deltamz";
/// Header of the label column in rule files
pub const MOTIVE_COLUMN: &str = "motive";

/// A known mass difference between two ion species of one analyte
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdductRule {
    /// Mass difference in Da
    #[serde(rename = "deltamz")]
    pub delta_mz: f64,
    /// Label of the adduct or in-source fragment
    pub motive: String,
}

impl AdductRule {
    /// Create a rule
    pub fn new(delta_mz: f64, motive: impl Into<String>) -> Self {
        Self {
            delta_mz,
            motive: motive.into(),
        }
    }

    /// Accepted mass-difference window for a tolerance in ppm
    pub fn window(&self, mass_error_ppm: f64) -> (f64, f64) {
        let half = self.delta_mz * mass_error_ppm * 1e-6;
        (self.delta_mz - half, self.delta_mz + half)
    }

    /// True when `mz_diff` lies inside the window, bounds included
    pub fn accepts(&self, mz_diff: f64, mass_error_ppm: f64) -> bool {
        let (lower, upper) = self.window(mass_error_ppm);
        mz_diff >= lower && mz_diff <= upper
    }

    fn validate(&self) -> Result<(), AdductError> {
        if !self.delta_mz.is_finite() || self.delta_mz <= 0.0 {
            return Err(AdductError::SchemaMismatch(format!(
                "rule '{}' has invalid {DELTA_COLUMN} {}",
                self.motive, self.delta_mz
            )));
        }
        if self.motive.trim().is_empty() {
            return Err(AdductError::SchemaMismatch(format!(
                "rule with {DELTA_COLUMN} {} has an empty {MOTIVE_COLUMN}",
                self.delta_mz
            )));
        }
        Ok(())
    }
}

/// Ordered set of adduct rules; default rules first, custom rules appended
#[derive(Debug, Clone, PartialEq)]
pub struct RuleLibrary {
    rules: Vec<AdductRule>,
}

impl Default for RuleLibrary {
    fn default() -> Self {
        Self {
            rules: vec![
                AdductRule::new(15.994915, "O"),
                AdductRule::new(31.989830, "O2"),
                AdductRule::new(18.010565, "H2O"),
            ],
        }
    }
}

impl RuleLibrary {
    /// A library without the default rules
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Rules in library order
    pub fn rules(&self) -> &[AdductRule] {
        &self.rules
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when the library holds no rule
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Append one rule. Labels must be unique.
    pub fn push(&mut self, rule: AdductRule) -> Result<(), AdductError> {
        rule.validate()?;
        if self.rules.iter().any(|r| r.motive == rule.motive) {
            return Err(AdductError::SchemaMismatch(format!(
                "duplicate {MOTIVE_COLUMN} '{}'",
                rule.motive
            )));
        }
        if let Some(existing) = self.rules.iter().find(|r| r.delta_mz == rule.delta_mz) {
            warn!(
                "Rule '{}' repeats the mass difference of '{}' ({})",
                rule.motive, existing.motive, rule.delta_mz
            );
        }
        self.rules.push(rule);
        Ok(())
    }

    /// Append custom rules in order
    pub fn extend(&mut self, rules: impl IntoIterator<Item = AdductRule>) -> Result<(), AdductError> {
        for rule in rules {
            self.push(rule)?;
        }
        Ok(())
    }

    /// Default rules followed by `custom`
    pub fn with_custom(custom: impl IntoIterator<Item = AdductRule>) -> Result<Self, AdductError> {
        let mut library = Self::default();
        library.extend(custom)?;
        Ok(library)
    }
}

/// Read custom rules from CSV with the exact header `deltamz,motive`
pub fn read_rules_csv<R: Read>(reader: R) -> Result<Vec<AdductRule>, AdductError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let header: Vec<&str> = csv_reader.headers()?.iter().collect();
    if header != [DELTA_COLUMN, MOTIVE_COLUMN] {
        return Err(AdductError::SchemaMismatch(format!(
            "expected columns '{DELTA_COLUMN},{MOTIVE_COLUMN}', found '{}'",
            header.join(",")
        )));
    }

    let mut rules = Vec::new();
    let mut seen = HashSet::new();
    for (line, record) in csv_reader.records().enumerate() {
        let record = record?;
        let delta_mz: f64 = record[0].parse().map_err(|_| {
            AdductError::SchemaMismatch(format!(
                "line {}: {DELTA_COLUMN} '{}' is not a number",
                line + 2,
                &record[0]
            ))
        })?;
        let rule = AdductRule::new(delta_mz, &record[1]);
        rule.validate()?;
        if !seen.insert(rule.motive.clone()) {
            return Err(AdductError::SchemaMismatch(format!(
                "line {}: duplicate {MOTIVE_COLUMN} '{}'",
                line + 2,
                rule.motive
            )));
        }
        rules.push(rule);
    }
    Ok(rules)
}

/// Read custom rules from a CSV file
pub fn read_rules_file(path: impl AsRef<Path>) -> Result<Vec<AdductRule>, AdductError> {
    let file = std::fs::File::open(path)?;
    read_rules_csv(std::io::BufReader::new(file))
}
