//! Split a feature table back into one peak list per scan.
//!
//! The inverse of alignment for downstream tools that expect spectra: each
//! scan column becomes a [`Scan`] whose peaks are `(mean_mz, intensity)` of
//! the features present in that scan, sorted by m/z.

use crate::spectrum::{Peak, Scan};
use crate::table::{scan_column_name, IntensityMatrix};

/// One scan per table column; missing cells are dropped
pub fn export_to_spectra<M: IntensityMatrix + ?Sized>(table: &M) -> Vec<Scan> {
    (0..table.n_scans())
        .map(|column| {
            let mut scan = Scan::new(
                column + 1,
                (0..table.n_features())
                    .filter_map(|row| {
                        table
                            .intensity(row, column)
                            .map(|intensity| Peak::new(table.mean_mz(row), intensity))
                    })
                    .collect(),
            );
            scan.title = Some(scan_column_name(column));
            scan.sort_by_mz();
            scan
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{AlignedTable, FilledTable};

    #[test]
    fn test_columns_become_scans() {
        let table = AlignedTable::new(
            vec![100.0, 150.0, 200.0],
            2,
            vec![Some(1.0), None, Some(2.0), Some(3.0), None, Some(4.0)],
        )
        .unwrap();

        let scans = export_to_spectra(&table);
        assert_eq!(scans.len(), 2);
        assert_eq!(scans[0].index, 1);
        assert_eq!(scans[0].title.as_deref(), Some("scan1"));
        assert_eq!(scans[0].peaks, vec![Peak::new(100.0, 1.0), Peak::new(150.0, 2.0)]);
        assert_eq!(scans[1].peaks, vec![Peak::new(150.0, 3.0), Peak::new(200.0, 4.0)]);
    }

    #[test]
    fn test_peaks_sorted_by_mass() {
        // rows out of mass order, as a hand-built table may be
        let table = FilledTable::new(vec![300.0, 100.0], 1, vec![1.0, 2.0]).unwrap();
        let scans = export_to_spectra(&table);
        assert_eq!(scans[0].peaks, vec![Peak::new(100.0, 2.0), Peak::new(300.0, 1.0)]);
    }

    #[test]
    fn test_empty_column_yields_empty_scan() {
        let table = AlignedTable::new(vec![100.0], 2, vec![Some(1.0), None]).unwrap();
        let scans = export_to_spectra(&table);
        assert!(scans[1].is_empty());
    }
}
