use std::fmt;

#[cfg(feature = "colorized_output")]
use console::style;
use serde::Serialize;

use super::IntensityMatrix;

/// Shape and fill statistics of a feature table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSummary {
    /// Number of feature rows
    pub n_features: usize,
    /// Number of scan columns
    pub n_scans: usize,
    /// Non-missing cells
    pub present_cells: usize,
    /// Missing cells
    pub missing_cells: usize,
    /// Smallest and largest representative mass
    pub mz_range: Option<(f64, f64)>,
    /// Features observed per scan, in column order
    pub features_per_scan: Vec<usize>,
    /// Features observed in every scan
    pub complete_features: usize,
}

impl TableSummary {
    /// Summarize any intensity matrix
    pub fn of<M: IntensityMatrix + ?Sized>(table: &M) -> Self {
        let mut features_per_scan = vec![0; table.n_scans()];
        let mut complete_features = 0;
        let mut min_mz = f64::INFINITY;
        let mut max_mz = f64::NEG_INFINITY;

        for row in 0..table.n_features() {
            let mut observed = 0;
            for (column, count) in features_per_scan.iter_mut().enumerate() {
                if table.intensity(row, column).is_some() {
                    *count += 1;
                    observed += 1;
                }
            }
            if observed == table.n_scans() {
                complete_features += 1;
            }
            min_mz = min_mz.min(table.mean_mz(row));
            max_mz = max_mz.max(table.mean_mz(row));
        }

        let total = table.n_features() * table.n_scans();
        let present_cells: usize = features_per_scan.iter().sum();
        Self {
            n_features: table.n_features(),
            n_scans: table.n_scans(),
            present_cells,
            missing_cells: total - present_cells,
            mz_range: (table.n_features() > 0).then_some((min_mz, max_mz)),
            features_per_scan,
            complete_features,
        }
    }

    /// Fraction of non-missing cells, 1.0 for an empty table
    pub fn fill_ratio(&self) -> f64 {
        let total = self.present_cells + self.missing_cells;
        if total == 0 {
            1.0
        } else {
            self.present_cells as f64 / total as f64
        }
    }

    /// Format the summary with colors (requires console feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            let mut output = String::new();
            output.push_str(&format!("{}\n", style("Feature Table Summary").bold().cyan()));
            output.push_str(&format!("{}\n", style("=====================").cyan()));
            output.push_str(&format!("{}: {}\n", style("Features").bold(), self.n_features));
            output.push_str(&format!("{}: {}\n", style("Scans").bold(), self.n_scans));
            if let Some((lo, hi)) = self.mz_range {
                output.push_str(&format!("{}: {:.4} - {:.4}\n", style("m/z range").bold(), lo, hi));
            }
            let ratio = format!("{:.1}%", self.fill_ratio() * 100.0);
            let ratio = if self.missing_cells == 0 {
                style(ratio).green()
            } else {
                style(ratio).yellow()
            };
            output.push_str(&format!(
                "{}: {} present, {} missing ({} filled)\n",
                style("Cells").bold(),
                style(self.present_cells).green(),
                style(self.missing_cells).yellow(),
                ratio
            ));
            output.push_str(&format!(
                "{}: {}\n",
                style("Complete features").bold(),
                self.complete_features
            ));
            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            self.to_string()
        }
    }
}

impl fmt::Display for TableSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Feature Table Summary")?;
        writeln!(f, "=====================")?;
        writeln!(f, "Features: {}", self.n_features)?;
        writeln!(f, "Scans: {}", self.n_scans)?;
        if let Some((lo, hi)) = self.mz_range {
            writeln!(f, "m/z range: {:.4} - {:.4}", lo, hi)?;
        }
        writeln!(
            f,
            "Cells: {} present, {} missing ({:.1}% filled)",
            self.present_cells,
            self.missing_cells,
            self.fill_ratio() * 100.0
        )?;
        writeln!(f, "Complete features: {}", self.complete_features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::AlignedTable;

    #[test]
    fn test_summary_counts() {
        let table = AlignedTable::new(
            vec![100.0, 250.5],
            3,
            vec![Some(1.0), Some(2.0), Some(3.0), None, Some(4.0), None],
        )
        .unwrap();
        let summary = TableSummary::of(&table);

        assert_eq!(summary.n_features, 2);
        assert_eq!(summary.present_cells, 4);
        assert_eq!(summary.missing_cells, 2);
        assert_eq!(summary.features_per_scan, vec![1, 2, 1]);
        assert_eq!(summary.complete_features, 1);
        assert_eq!(summary.mz_range, Some((100.0, 250.5)));
        assert!((summary.fill_ratio() - 4.0 / 6.0).abs() < 1e-12);
        assert!(summary.to_string().contains("Features: 2"));
    }

    #[test]
    fn test_empty_table() {
        let table = AlignedTable::new(Vec::new(), 0, Vec::new()).unwrap();
        let summary = TableSummary::of(&table);
        assert_eq!(summary.mz_range, None);
        assert_eq!(summary.fill_ratio(), 1.0);
    }
}
