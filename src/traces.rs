//! # Trace Selection
//!
//! Picks a handful of feature traces (XICs) out of a dense table for visual
//! inspection of correlation and adduct results. Each trace is labelled with
//! its Pearson correlation to the first selected trace. Rendering is left to
//! the consumer; [`TraceSet::write_csv`] emits long-format data that any
//! plotting tool can read.

use std::io::Write;

use serde::Serialize;

use crate::adducts::pearson;
use crate::table::{IntensityMatrix, TableError};

/// Errors that can occur while selecting traces
#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    /// No identifier was given
    #[error("No feature selected")]
    EmptySelection,

    /// An identifier does not name a row of the table
    #[error("Unknown feature '{0}'")]
    UnknownFeature(String),

    /// A selected trace has a missing cell
    #[error("Missing value for feature {feature} in scan{scan}; impute the table first")]
    MissingValue {
        /// Feature identifier (`IDn`)
        feature: String,
        /// 1-based scan column
        scan: usize,
    },

    /// Error from the CSV writer
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// I/O error while writing
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Intensity scale of the selected traces
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceTransform {
    /// Raw intensities
    #[default]
    Identity,
    /// `log2(intensity)`
    Log2,
}

/// One selected feature trace
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    /// Feature identifier
    pub id: String,
    /// Representative mass
    pub mean_mz: f64,
    /// Pearson correlation to the first selected trace
    pub correlation: f64,
    /// Intensity per scan after the transform
    pub values: Vec<f64>,
}

impl Trace {
    /// Legend label, e.g. `ID5 - r = 0.953`
    pub fn label(&self) -> String {
        format!("{} - r = {:.3}", self.id, self.correlation)
    }
}

/// Traces selected for one plot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceSet {
    /// Transform applied to every trace
    pub transform: TraceTransform,
    /// Traces in selection order
    pub traces: Vec<Trace>,
}

impl TraceSet {
    /// Number of scans per trace
    pub fn n_scans(&self) -> usize {
        self.traces.first().map_or(0, |t| t.values.len())
    }

    /// Write long-format CSV: `id,label,scan,intensity`, one row per point
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), TraceError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["id", "label", "scan", "intensity"])?;
        for trace in &self.traces {
            let label = trace.label();
            for (column, value) in trace.values.iter().enumerate() {
                csv_writer.write_record([
                    trace.id.clone(),
                    label.clone(),
                    (column + 1).to_string(),
                    value.to_string(),
                ])?;
            }
        }
        csv_writer.flush()?;
        Ok(())
    }
}

/// Select traces by `IDn` identifier, in the given order
pub fn select_traces<M, S>(table: &M, ids: &[S], transform: TraceTransform) -> Result<TraceSet, TraceError>
where
    M: IntensityMatrix + ?Sized,
    S: AsRef<str>,
{
    if ids.is_empty() {
        return Err(TraceError::EmptySelection);
    }

    let mut selected = Vec::with_capacity(ids.len());
    for id in ids {
        let id = id.as_ref();
        let row = table
            .row_index_of(id)
            .ok_or_else(|| TraceError::UnknownFeature(id.to_string()))?;
        let values = table.dense_row(row).map_err(|e| match e {
            TableError::MissingValue { feature, scan } => TraceError::MissingValue { feature, scan },
            other => TraceError::UnknownFeature(other.to_string()),
        })?;
        selected.push((row, values));
    }

    // correlation on raw intensities; the transform only changes the scale
    let reference = selected[0].1.clone();
    let traces = selected
        .into_iter()
        .map(|(row, values)| {
            let correlation = pearson(&reference, &values);
            let values = match transform {
                TraceTransform::Identity => values,
                TraceTransform::Log2 => values.into_iter().map(f64::log2).collect(),
            };
            Trace {
                id: table.feature_id(row),
                mean_mz: table.mean_mz(row),
                correlation,
                values,
            }
        })
        .collect();

    Ok(TraceSet { transform, traces })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{AlignedTable, FilledTable};

    fn table() -> FilledTable {
        FilledTable::new(
            vec![100.0, 200.0, 300.0],
            4,
            vec![
                1.0, 2.0, 4.0, 8.0, //
                2.0, 4.0, 8.0, 16.0, //
                8.0, 4.0, 2.0, 1.0,
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_select_and_label() {
        let set = select_traces(&table(), &["ID1", "ID2", "ID3"], TraceTransform::Identity).unwrap();
        assert_eq!(set.traces.len(), 3);
        assert_eq!(set.n_scans(), 4);
        assert_eq!(set.traces[0].label(), "ID1 - r = 1.000");
        assert_eq!(set.traces[1].label(), "ID2 - r = 1.000");
        assert!(set.traces[2].correlation < 0.0);
        assert_eq!(set.traces[2].mean_mz, 300.0);
    }

    #[test]
    fn test_log2_transform() {
        let set = select_traces(&table(), &["ID2"], TraceTransform::Log2).unwrap();
        assert_eq!(set.traces[0].values, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_selection_errors() {
        let empty: [&str; 0] = [];
        assert!(matches!(
            select_traces(&table(), &empty, TraceTransform::Identity),
            Err(TraceError::EmptySelection)
        ));
        assert!(matches!(
            select_traces(&table(), &["ID4"], TraceTransform::Identity),
            Err(TraceError::UnknownFeature(id)) if id == "ID4"
        ));

        let sparse = AlignedTable::new(vec![100.0], 2, vec![Some(1.0), None]).unwrap();
        assert!(matches!(
            select_traces(&sparse, &["ID1"], TraceTransform::Identity),
            Err(TraceError::MissingValue { scan: 2, .. })
        ));
    }

    #[test]
    fn test_long_format_csv() {
        let set = select_traces(&table(), &["ID3"], TraceTransform::Identity).unwrap();
        let mut buffer = Vec::new();
        set.write_csv(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "id,label,scan,intensity");
        assert_eq!(lines[1], "ID3,ID3 - r = 1.000,1,8");
        assert_eq!(lines.len(), 5);
    }
}
