//! # Adduct and In-Source Fragment Identification
//!
//! Ion species of one analyte (oxygen adducts, water losses, ...) rise and
//! fall together across a direct-infusion run. Candidates are found in two
//! steps:
//!
//! 1. Every pair of feature traces is correlated; pairs above the threshold
//!    are kept, reported once from each feature's perspective.
//! 2. Each rule of the [`RuleLibrary`] keeps the pairs whose mass difference
//!    lies within `delta ± delta * mass_error * 1e-6`.
//!
//! The input must be dense, typically the output of
//! [`impute_intensities`](crate::impute::impute_intensities).
//!
//! ```rust
//! use dbdi::adducts::{identify_adducts, AdductSearch, CorrelationMethod};
//! use dbdi::table::FilledTable;
//!
//! let table = FilledTable::new(
//!     vec![100.0, 115.994915, 250.0],
//!     4,
//!     vec![
//!         1.0, 2.0, 3.0, 4.0,
//!         2.0, 4.1, 6.0, 8.2,
//!         9.0, 1.0, 7.0, 2.0,
//!     ],
//! )?;
//! let search = AdductSearch::default().with_method(CorrelationMethod::Pearson);
//! let report = identify_adducts(&table, &search)?;
//!
//! let oxygen = report.group("O").unwrap();
//! assert_eq!(oxygen.pairs.len(), 2);
//! assert_eq!(oxygen.pairs[0].base_id, "ID1");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod correlation;
mod error;
mod report;
mod rules;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

pub use correlation::{average_ranks, kendall_tau_b, pearson, CorrelationMatrix, CorrelationMethod};
pub use error::AdductError;
pub use report::{AdductGroup, AdductPair, AdductReport};
pub use rules::{read_rules_csv, read_rules_file, AdductRule, RuleLibrary, DELTA_COLUMN, MOTIVE_COLUMN};

use crate::table::{IntensityMatrix, TableError};

/// Default correlation threshold
pub const DEFAULT_THRESHOLD: f64 = 0.9;
/// Default mass error in ppm
pub const DEFAULT_MASS_ERROR_PPM: f64 = 2.0;

/// Parameters of an adduct search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdductSearch {
    /// Correlation coefficient
    pub method: CorrelationMethod,
    /// Pairs must correlate strictly above this value
    pub threshold: f64,
    /// Mass tolerance of the rules in ppm
    pub mass_error: f64,
    /// Custom rules appended to the default library
    pub rules: Vec<AdductRule>,
}

impl Default for AdductSearch {
    fn default() -> Self {
        Self {
            method: CorrelationMethod::default(),
            threshold: DEFAULT_THRESHOLD,
            mass_error: DEFAULT_MASS_ERROR_PPM,
            rules: Vec::new(),
        }
    }
}

impl AdductSearch {
    /// Set the correlation method
    pub fn with_method(mut self, method: CorrelationMethod) -> Self {
        self.method = method;
        self
    }

    /// Set the correlation threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the mass error in ppm
    pub fn with_mass_error(mut self, mass_error: f64) -> Self {
        self.mass_error = mass_error;
        self
    }

    /// Append custom rules
    pub fn with_rules(mut self, rules: impl IntoIterator<Item = AdductRule>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Check the numeric parameters and build the rule library
    pub fn library(&self) -> Result<RuleLibrary, AdductError> {
        if !(self.threshold > 0.0 && self.threshold < 1.0) {
            return Err(AdductError::InvalidThreshold(self.threshold));
        }
        if !self.mass_error.is_finite() || self.mass_error <= 0.0 {
            return Err(AdductError::InvalidMassError(self.mass_error));
        }
        RuleLibrary::with_custom(self.rules.iter().cloned())
    }
}

/// Search `table` for adducts, using each row's `mean_mz` as its mass
pub fn identify_adducts<M: IntensityMatrix + ?Sized>(
    table: &M,
    search: &AdductSearch,
) -> Result<AdductReport, AdductError> {
    let masses: Vec<f64> = (0..table.n_features()).map(|row| table.mean_mz(row)).collect();
    identify_adducts_with_masses(table, &masses, search)
}

/// Search `table` for adducts using an external mass list, one mass per row.
///
/// Theoretical masses give tighter matches than the aligned mean masses.
pub fn identify_adducts_with_masses<M: IntensityMatrix + ?Sized>(
    table: &M,
    masses: &[f64],
    search: &AdductSearch,
) -> Result<AdductReport, AdductError> {
    let library = search.library()?;

    if masses.len() != table.n_features() {
        return Err(AdductError::DimensionMismatch {
            features: table.n_features(),
            masses: masses.len(),
        });
    }
    if table.n_scans() < 2 {
        return Err(AdductError::TooFewScans(table.n_scans()));
    }

    let traces = (0..table.n_features())
        .map(|row| table.dense_row(row))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| match e {
            TableError::MissingValue { feature, scan } => AdductError::MissingValue { feature, scan },
            other => AdductError::SchemaMismatch(other.to_string()),
        })?;

    let matrix = CorrelationMatrix::compute(&traces, search.method);
    debug!(
        "Computed {} correlation matrix over {} traces",
        search.method,
        matrix.size()
    );

    let mut correlated = Vec::new();
    let mut undefined = 0;
    for i in 0..matrix.size() {
        for (j, &corr) in matrix.row(i).iter().enumerate() {
            if i == j {
                continue;
            }
            if corr.is_nan() {
                undefined += 1;
            } else if corr > search.threshold {
                correlated.push(AdductPair {
                    base_id: table.feature_id(i),
                    base_mz: masses[i],
                    match_id: table.feature_id(j),
                    match_mz: masses[j],
                    mz_diff: (masses[j] - masses[i]).abs(),
                    corr,
                });
            }
        }
    }
    if undefined > 0 {
        warn!(
            "{} ordered pairs have an undefined correlation (constant traces) and were skipped",
            undefined
        );
    }

    let groups: Vec<AdductGroup> = library
        .rules()
        .iter()
        .map(|rule| AdductGroup {
            motive: rule.motive.clone(),
            delta_mz: rule.delta_mz,
            pairs: correlated
                .iter()
                .filter(|pair| rule.accepts(pair.mz_diff, search.mass_error))
                .cloned()
                .collect(),
        })
        .collect();

    let report = AdductReport {
        correlated_pairs: correlated.len(),
        groups,
    };
    info!(
        "{} correlated pairs above {} ({}), {} explained by {} rules",
        report.correlated_pairs,
        search.threshold,
        search.method,
        report.total_pairs(),
        library.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{AlignedTable, FilledTable};

    fn sample() -> FilledTable {
        // ID1 and ID2 differ by one oxygen and rise together; ID3 is unrelated;
        // ID4 is a water loss partner of ID1 that also follows the trend
        FilledTable::new(
            vec![100.0, 115.994915, 250.0, 118.010565],
            5,
            vec![
                1.0, 2.0, 3.0, 4.0, 5.0, //
                2.0, 4.0, 6.5, 8.0, 10.0, //
                5.0, 1.0, 4.0, 2.0, 3.0, //
                10.0, 19.0, 31.0, 42.0, 49.0,
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_oxygen_and_water_pairs() {
        let report = identify_adducts(&sample(), &AdductSearch::default()).unwrap();

        let oxygen = report.group("O").unwrap();
        let ids: Vec<(&str, &str)> = oxygen
            .pairs
            .iter()
            .map(|p| (p.base_id.as_str(), p.match_id.as_str()))
            .collect();
        assert_eq!(ids, vec![("ID1", "ID2"), ("ID2", "ID1")]);
        assert!((oxygen.pairs[0].mz_diff - 15.994915).abs() < 1e-9);

        let water = report.group("H2O").unwrap();
        assert_eq!(water.pairs.len(), 2);
        assert_eq!(water.pairs[0].match_id, "ID4");

        assert!(report.group("O2").unwrap().pairs.is_empty());
        assert_eq!(report.groups.len(), 3);
    }

    #[test]
    fn test_custom_rule_is_searched() {
        // ID2 vs ID4: 2.01565
        let search = AdductSearch::default().with_rules(vec![AdductRule::new(2.01565, "H2")]);
        let report = identify_adducts(&sample(), &search).unwrap();
        assert_eq!(report.groups.last().map(|g| g.motive.as_str()), Some("H2"));
        assert_eq!(report.group("H2").map(|g| g.pairs.len()), Some(2));
    }

    #[test]
    fn test_every_method_runs() {
        for method in [
            CorrelationMethod::Pearson,
            CorrelationMethod::Spearman,
            CorrelationMethod::Kendall,
        ] {
            let search = AdductSearch::default().with_method(method);
            let report = identify_adducts(&sample(), &search).unwrap();
            assert_eq!(report.group("O").map(|g| g.pairs.len()), Some(2), "{method}");
        }
    }

    #[test]
    fn test_external_masses() {
        let masses = [200.0, 300.0, 400.0, 500.0];
        let report = identify_adducts_with_masses(&sample(), &masses, &AdductSearch::default()).unwrap();
        assert_eq!(report.total_pairs(), 0);
        assert!(report.correlated_pairs > 0);

        assert!(matches!(
            identify_adducts_with_masses(&sample(), &masses[..2], &AdductSearch::default()),
            Err(AdductError::DimensionMismatch { features: 4, masses: 2 })
        ));
    }

    #[test]
    fn test_rejects_missing_values() {
        let table = AlignedTable::new(vec![100.0, 200.0], 2, vec![Some(1.0), Some(2.0), Some(3.0), None]).unwrap();
        assert!(matches!(
            identify_adducts(&table, &AdductSearch::default()),
            Err(AdductError::MissingValue { ref feature, scan: 2 }) if feature == "ID2"
        ));
    }

    #[test]
    fn test_rejects_bad_parameters() {
        let table = sample();
        for threshold in [0.0, 1.0, -0.5, f64::NAN] {
            assert!(matches!(
                identify_adducts(&table, &AdductSearch::default().with_threshold(threshold)),
                Err(AdductError::InvalidThreshold(_))
            ));
        }
        assert!(matches!(
            identify_adducts(&table, &AdductSearch::default().with_mass_error(0.0)),
            Err(AdductError::InvalidMassError(_))
        ));

        let single = FilledTable::new(vec![100.0, 200.0], 1, vec![1.0, 2.0]).unwrap();
        assert!(matches!(
            identify_adducts(&single, &AdductSearch::default()),
            Err(AdductError::TooFewScans(1))
        ));
    }

    #[test]
    fn test_constant_traces_never_pass() {
        let table = FilledTable::new(
            vec![100.0, 115.994915],
            3,
            vec![5.0, 5.0, 5.0, 5.0, 5.0, 5.0],
        )
        .unwrap();
        let report = identify_adducts(&table, &AdductSearch::default()).unwrap();
        assert_eq!(report.correlated_pairs, 0);
    }

    #[test]
    fn test_search_from_toml() {
        let search: AdductSearch = toml::from_str(
            r#"
            method = "kendall"
            threshold = 0.8

            [[rules]]
            deltamz = 2.01565
            motive = "H2"
            "#,
        )
        .unwrap();
        assert_eq!(search.method, CorrelationMethod::Kendall);
        assert_eq!(search.mass_error, DEFAULT_MASS_ERROR_PPM);
        assert_eq!(search.rules.len(), 1);
        assert!(toml::from_str::<AdductSearch>("treshold = 0.8").is_err());
    }
}
