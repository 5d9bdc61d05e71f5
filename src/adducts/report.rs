use std::io::Write;

use serde::Serialize;

use super::error::AdductError;

/// Two correlated features, seen from the base feature
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdductPair {
    /// Identifier of the base feature
    pub base_id: String,
    /// Mass of the base feature
    pub base_mz: f64,
    /// Identifier of the correlated feature
    pub match_id: String,
    /// Mass of the correlated feature
    pub match_mz: f64,
    /// Absolute mass difference
    pub mz_diff: f64,
    /// Correlation of the two traces
    pub corr: f64,
}

/// Pairs explained by one adduct rule
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdductGroup {
    /// Rule label
    pub motive: String,
    /// Rule mass difference
    pub delta_mz: f64,
    /// Matching pairs in base-row order
    pub pairs: Vec<AdductPair>,
}

/// Result of an adduct search, one group per rule in library order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AdductReport {
    /// Number of correlated pairs before mass filtering, both directions
    pub correlated_pairs: usize,
    /// Groups in rule-library order, including empty ones
    pub groups: Vec<AdductGroup>,
}

impl AdductReport {
    /// Group for a rule label
    pub fn group(&self, motive: &str) -> Option<&AdductGroup> {
        self.groups.iter().find(|g| g.motive == motive)
    }

    /// Total number of reported pairs across all groups
    pub fn total_pairs(&self) -> usize {
        self.groups.iter().map(|g| g.pairs.len()).sum()
    }

    /// Serialize as pretty-printed JSON
    pub fn write_json<W: Write>(&self, writer: W) -> Result<(), AdductError> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Write one CSV row per pair, prefixed by the rule label
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), AdductError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record([
            "motive", "base_id", "base_mz", "match_id", "match_mz", "mz_diff", "corr",
        ])?;
        for group in &self.groups {
            for pair in &group.pairs {
                csv_writer.write_record([
                    group.motive.clone(),
                    pair.base_id.clone(),
                    pair.base_mz.to_string(),
                    pair.match_id.clone(),
                    pair.match_mz.to_string(),
                    pair.mz_diff.to_string(),
                    pair.corr.to_string(),
                ])?;
            }
        }
        csv_writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> AdductReport {
        AdductReport {
            correlated_pairs: 2,
            groups: vec![
                AdductGroup {
                    motive: "O".to_string(),
                    delta_mz: 15.994915,
                    pairs: vec![AdductPair {
                        base_id: "ID1".to_string(),
                        base_mz: 100.0,
                        match_id: "ID2".to_string(),
                        match_mz: 115.994915,
                        mz_diff: 15.994915,
                        corr: 0.95,
                    }],
                },
                AdductGroup {
                    motive: "H2O".to_string(),
                    delta_mz: 18.010565,
                    pairs: Vec::new(),
                },
            ],
        }
    }

    #[test]
    fn test_lookup() {
        let report = report();
        assert_eq!(report.total_pairs(), 1);
        assert_eq!(report.group("O").map(|g| g.pairs.len()), Some(1));
        assert!(report.group("O2").is_none());
    }

    #[test]
    fn test_csv_output() {
        let mut buffer = Vec::new();
        report().write_csv(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "motive,base_id,base_mz,match_id,match_mz,mz_diff,corr");
        assert_eq!(lines[1], "O,ID1,100,ID2,115.994915,15.994915,0.95");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_json_output() {
        let mut buffer = Vec::new();
        report().write_json(&mut buffer).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["groups"][0]["motive"], "O");
        assert_eq!(value["groups"][0]["pairs"][0]["match_id"], "ID2");
        assert_eq!(value["groups"][1]["pairs"].as_array().map(Vec::len), Some(0));
    }
}
