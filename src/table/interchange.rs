//! CSV reading and writing of feature tables.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::warn;

use super::{
    feature_id, scan_column_name, AlignedTable, FilledTable, IntensityMatrix, TableError, ID_COLUMN,
    MEAN_MZ_COLUMN,
};

/// Write any intensity matrix as CSV; missing cells become empty fields.
pub fn write_matrix<M: IntensityMatrix + ?Sized, W: Write>(matrix: &M, writer: W) -> Result<(), TableError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = Vec::with_capacity(matrix.n_scans() + 2);
    header.push(ID_COLUMN.to_string());
    header.push(MEAN_MZ_COLUMN.to_string());
    header.extend((0..matrix.n_scans()).map(scan_column_name));
    csv_writer.write_record(&header)?;

    let mut record = Vec::with_capacity(header.len());
    for row in 0..matrix.n_features() {
        record.clear();
        record.push(matrix.feature_id(row));
        record.push(matrix.mean_mz(row).to_string());
        for column in 0..matrix.n_scans() {
            record.push(
                matrix
                    .intensity(row, column)
                    .map(|v| v.to_string())
                    .unwrap_or_default(),
            );
        }
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    Ok(())
}

impl AlignedTable {
    /// Write the table as CSV
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), TableError> {
        write_matrix(self, writer)
    }

    /// Write the table to a CSV file
    pub fn write_csv_file(&self, path: impl AsRef<Path>) -> Result<(), TableError> {
        let file = File::create(path)?;
        self.write_csv(BufWriter::new(file))
    }

    /// Read a table from CSV.
    ///
    /// Empty cells and `NaN` cells are read as missing. Row identifiers are
    /// re-derived from row order.
    pub fn read_csv<R: Read>(reader: R) -> Result<Self, TableError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let n_scans = check_header(csv_reader.headers()?)?;

        let mut mean_mz = Vec::new();
        let mut cells = Vec::new();
        for (row, record) in csv_reader.records().enumerate() {
            let record = record?;
            let line = row + 2;
            if record.len() != n_scans + 2 {
                return Err(TableError::InvalidFormat(format!(
                    "line {line}: expected {} fields, found {}",
                    n_scans + 2,
                    record.len()
                )));
            }

            let id = &record[0];
            if id != feature_id(row) {
                warn!("line {line}: identifier '{id}' replaced by '{}'", feature_id(row));
            }

            let mz = parse_cell(&record[1], line, MEAN_MZ_COLUMN)?.ok_or_else(|| {
                TableError::InvalidFormat(format!("line {line}: mean_mz is missing"))
            })?;
            mean_mz.push(mz);

            for column in 0..n_scans {
                cells.push(parse_cell(&record[column + 2], line, &scan_column_name(column))?);
            }
        }

        AlignedTable::new(mean_mz, n_scans, cells)
    }

    /// Read a table from a CSV file
    pub fn read_csv_file(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let file = File::open(path)?;
        Self::read_csv(BufReader::new(file))
    }
}

impl FilledTable {
    /// Write the table as CSV
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), TableError> {
        write_matrix(self, writer)
    }

    /// Write the table to a CSV file
    pub fn write_csv_file(&self, path: impl AsRef<Path>) -> Result<(), TableError> {
        let file = File::create(path)?;
        self.write_csv(BufWriter::new(file))
    }

    /// Read a dense table from CSV; any missing cell is an error
    pub fn read_csv<R: Read>(reader: R) -> Result<Self, TableError> {
        FilledTable::try_from(AlignedTable::read_csv(reader)?)
    }

    /// Read a dense table from a CSV file
    pub fn read_csv_file(path: impl AsRef<Path>) -> Result<Self, TableError> {
        FilledTable::try_from(AlignedTable::read_csv_file(path)?)
    }
}

fn check_header(header: &csv::StringRecord) -> Result<usize, TableError> {
    if header.len() < 3 {
        return Err(TableError::InvalidFormat(format!(
            "expected at least 3 columns (id, mean_mz, scan1), found {}",
            header.len()
        )));
    }
    if &header[0] != ID_COLUMN || &header[1] != MEAN_MZ_COLUMN {
        return Err(TableError::InvalidFormat(format!(
            "header must start with '{ID_COLUMN},{MEAN_MZ_COLUMN}', found '{},{}'",
            &header[0], &header[1]
        )));
    }
    for (column, name) in header.iter().skip(2).enumerate() {
        let expected = scan_column_name(column);
        if name != expected {
            return Err(TableError::InvalidFormat(format!(
                "column {} must be '{expected}', found '{name}'",
                column + 3
            )));
        }
    }
    Ok(header.len() - 2)
}

fn parse_cell(field: &str, line: usize, column: &str) -> Result<Option<f64>, TableError> {
    if field.is_empty() || field.eq_ignore_ascii_case("nan") || field.eq_ignore_ascii_case("na") {
        return Ok(None);
    }
    let value: f64 = field.parse().map_err(|_| {
        TableError::InvalidFormat(format!("line {line}, {column}: '{field}' is not a number"))
    })?;
    if !value.is_finite() {
        return Err(TableError::InvalidFormat(format!(
            "line {line}, {column}: '{field}' is not finite"
        )));
    }
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_layout() {
        let table = AlignedTable::new(
            vec![100.5, 200.25],
            2,
            vec![Some(10.0), None, None, Some(2.5)],
        )
        .unwrap();

        let mut buffer = Vec::new();
        table.write_csv(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert_eq!(text, "id,mean_mz,scan1,scan2\nID1,100.5,10,\nID2,200.25,,2.5\n");
    }

    #[test]
    fn test_read_back() {
        let text = "id,mean_mz,scan1,scan2\nID1,100.5,10,NaN\nID2,200.25,,2.5\n";
        let table = AlignedTable::read_csv(text.as_bytes()).unwrap();
        assert_eq!(table.n_features(), 2);
        assert_eq!(table.n_scans(), 2);
        assert_eq!(table.get(0, 0), Some(10.0));
        assert_eq!(table.get(0, 1), None);
        assert_eq!(table.get(1, 0), None);
        assert_eq!(table.mean_mz(1), 200.25);
    }

    #[test]
    fn test_rejects_bad_header() {
        let text = "feature,mz,scan1\nID1,100.0,1\n";
        assert!(matches!(
            AlignedTable::read_csv(text.as_bytes()),
            Err(TableError::InvalidFormat(_))
        ));

        let text = "id,mean_mz,scan1,scan3\nID1,100.0,1,2\n";
        assert!(matches!(
            AlignedTable::read_csv(text.as_bytes()),
            Err(TableError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_rejects_bad_cell() {
        let text = "id,mean_mz,scan1\nID1,100.0,abc\n";
        assert!(matches!(
            AlignedTable::read_csv(text.as_bytes()),
            Err(TableError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_filled_read_requires_complete_table() {
        let text = "id,mean_mz,scan1,scan2\nID1,100.0,1,\n";
        assert!(matches!(
            FilledTable::read_csv(text.as_bytes()),
            Err(TableError::MissingValue { .. })
        ));
    }
}
