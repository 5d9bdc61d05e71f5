//! Mascot Generic Format (MGF) reader and writer.
//!
//! Format:
//! ```text
//! BEGIN IONS
//! TITLE=scan1
//! SCANS=1
//! RTINSECONDS=12.5
//! 100.0001 1520.0
//! 150.0730 880.5
//! END IONS
//! ```
//!
//! Headers other than `TITLE`, `SCANS` and `RTINSECONDS` are ignored, as are
//! global parameters outside `BEGIN IONS`/`END IONS` blocks and comment lines
//! starting with `#`, `;` or `!`. A peak line may carry a trailing charge
//! column, which is ignored.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Lines, Write};
use std::path::Path;

use log::debug;

use crate::spectrum::{Peak, Scan};

const BEGIN: &str = "BEGIN IONS";
const END: &str = "END IONS";

/// Errors that can occur while reading or writing MGF
#[derive(Debug, thiserror::Error)]
pub enum MgfError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line could not be parsed
    #[error("MGF parse error at line {line}: {msg}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// What went wrong
        msg: String,
    },

    /// The input ended inside an ion block
    #[error("MGF ion block opened at line {line} is not closed")]
    Unterminated {
        /// Line of the unclosed `BEGIN IONS`
        line: usize,
    },
}

/// Streaming MGF reader yielding one [`Scan`] per ion block
pub struct MgfReader<R: BufRead> {
    lines: Lines<R>,
    line: usize,
    blocks: usize,
}

impl<R: BufRead> MgfReader<R> {
    /// Wrap a buffered reader
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
            blocks: 0,
        }
    }

    fn parse_error(&self, msg: impl Into<String>) -> MgfError {
        MgfError::Parse {
            line: self.line,
            msg: msg.into(),
        }
    }

    fn next_line(&mut self) -> Option<Result<String, MgfError>> {
        let line = self.lines.next()?;
        self.line += 1;
        Some(line.map_err(MgfError::from))
    }

    fn read_block(&mut self) -> Result<Scan, MgfError> {
        let opened_at = self.line;
        self.blocks += 1;
        let mut scan = Scan::new(self.blocks, Vec::new());

        loop {
            let line = match self.next_line() {
                Some(line) => line?,
                None => return Err(MgfError::Unterminated { line: opened_at }),
            };
            let line = line.trim();
            if is_skippable(line) {
                continue;
            }
            if line.eq_ignore_ascii_case(END) {
                return Ok(scan);
            }
            if line.eq_ignore_ascii_case(BEGIN) {
                return Err(self.parse_error("BEGIN IONS inside an open ion block"));
            }

            if let Some((key, value)) = line.split_once('=') {
                self.apply_header(&mut scan, key.trim(), value.trim())?;
                continue;
            }

            let mut fields = line.split_whitespace();
            let (Some(mz), Some(intensity)) = (fields.next(), fields.next()) else {
                return Err(self.parse_error(format!("expected 'mz intensity', found '{line}'")));
            };
            let mz: f64 = mz
                .parse()
                .map_err(|_| self.parse_error(format!("invalid m/z '{mz}'")))?;
            let intensity: f64 = intensity
                .parse()
                .map_err(|_| self.parse_error(format!("invalid intensity '{intensity}'")))?;
            scan.peaks.push(Peak::new(mz, intensity));
        }
    }

    fn apply_header(&self, scan: &mut Scan, key: &str, value: &str) -> Result<(), MgfError> {
        match key.to_ascii_uppercase().as_str() {
            "TITLE" => scan.title = Some(value.to_string()),
            "SCANS" => {
                // ranges such as "12-14" keep their first scan number
                let first = value.split(['-', ',']).next().unwrap_or(value).trim();
                scan.index = first
                    .parse()
                    .map_err(|_| self.parse_error(format!("invalid SCANS value '{value}'")))?;
            }
            "RTINSECONDS" => {
                scan.retention_time = Some(
                    value
                        .parse()
                        .map_err(|_| self.parse_error(format!("invalid RTINSECONDS value '{value}'")))?,
                );
            }
            _ => {}
        }
        Ok(())
    }
}

impl<R: BufRead> Iterator for MgfReader<R> {
    type Item = Result<Scan, MgfError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.next_line()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e)),
            };
            let line = line.trim();
            if is_skippable(line) {
                continue;
            }
            if line.eq_ignore_ascii_case(BEGIN) {
                return Some(self.read_block());
            }
            // global parameters apply to no scan field we keep
            if line.contains('=') {
                continue;
            }
            return Some(Err(self.parse_error(format!("unexpected line outside an ion block: '{line}'"))));
        }
    }
}

fn is_skippable(line: &str) -> bool {
    line.is_empty() || line.starts_with(['#', ';', '!'])
}

/// Read every ion block of an MGF stream
pub fn read_mgf<R: BufRead>(reader: R) -> Result<Vec<Scan>, MgfError> {
    let scans = MgfReader::new(reader).collect::<Result<Vec<_>, _>>()?;
    debug!("Read {} MGF scans", scans.len());
    Ok(scans)
}

/// Read every ion block of an MGF file
pub fn read_mgf_file(path: impl AsRef<Path>) -> Result<Vec<Scan>, MgfError> {
    let file = File::open(path)?;
    read_mgf(BufReader::new(file))
}

/// Write scans as MGF ion blocks
pub fn write_mgf<W: Write>(mut writer: W, scans: &[Scan]) -> Result<(), MgfError> {
    for scan in scans {
        writer.write_all(b"BEGIN IONS\n")?;
        if let Some(title) = &scan.title {
            writeln!(writer, "TITLE={title}")?;
        }
        writeln!(writer, "SCANS={}", scan.index)?;
        if let Some(rt) = scan.retention_time {
            writeln!(writer, "RTINSECONDS={rt:0.4}")?;
        }
        for peak in &scan.peaks {
            writeln!(writer, "{} {}", peak.mz, peak.intensity)?;
        }
        writer.write_all(b"END IONS\n\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Write scans to an MGF file
pub fn write_mgf_file(path: impl AsRef<Path>, scans: &[Scan]) -> Result<(), MgfError> {
    let file = File::create(path)?;
    write_mgf(BufWriter::new(file), scans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectrum::ScanBuilder;

    const SAMPLE: &str = "\
# exported run
CHARGE=1+

BEGIN IONS
TITLE=first scan
SCANS=7
RTINSECONDS=1.5
100.0001 10.0
200.5 20.0 1+
END IONS

BEGIN IONS
150.25\t5
END IONS
";

    #[test]
    fn test_read_blocks() {
        let scans = read_mgf(SAMPLE.as_bytes()).unwrap();
        assert_eq!(scans.len(), 2);

        assert_eq!(scans[0].index, 7);
        assert_eq!(scans[0].title.as_deref(), Some("first scan"));
        assert_eq!(scans[0].retention_time, Some(1.5));
        assert_eq!(scans[0].peaks, vec![Peak::new(100.0001, 10.0), Peak::new(200.5, 20.0)]);

        assert_eq!(scans[1].index, 2);
        assert_eq!(scans[1].title, None);
        assert_eq!(scans[1].peaks, vec![Peak::new(150.25, 5.0)]);
    }

    #[test]
    fn test_write_then_read() {
        let scans = vec![
            ScanBuilder::new(1)
                .title("scan1")
                .retention_time(2.25)
                .add_peak(100.5, 3.0)
                .add_peak(101.5, 4.0)
                .build(),
            ScanBuilder::new(2).add_peak(99.0, 1.0).build(),
        ];

        let mut buffer = Vec::new();
        write_mgf(&mut buffer, &scans).unwrap();
        let text = String::from_utf8(buffer.clone()).unwrap();
        assert!(text.starts_with("BEGIN IONS\nTITLE=scan1\nSCANS=1\nRTINSECONDS=2.2500\n100.5 3\n"));

        assert_eq!(read_mgf(buffer.as_slice()).unwrap(), scans);
    }

    #[test]
    fn test_parse_errors_carry_line_numbers() {
        let text = "BEGIN IONS\n100.0 abc\nEND IONS\n";
        assert!(matches!(
            read_mgf(text.as_bytes()),
            Err(MgfError::Parse { line: 2, .. })
        ));

        let text = "BEGIN IONS\n100.0\nEND IONS\n";
        assert!(matches!(read_mgf(text.as_bytes()), Err(MgfError::Parse { line: 2, .. })));

        let text = "BEGIN IONS\nBEGIN IONS\n";
        assert!(matches!(read_mgf(text.as_bytes()), Err(MgfError::Parse { line: 2, .. })));

        let text = "garbage\n";
        assert!(matches!(read_mgf(text.as_bytes()), Err(MgfError::Parse { line: 1, .. })));
    }

    #[test]
    fn test_unterminated_block() {
        let text = "\nBEGIN IONS\n100.0 1.0\n";
        assert!(matches!(
            read_mgf(text.as_bytes()),
            Err(MgfError::Unterminated { line: 2 })
        ));
    }

    #[test]
    fn test_empty_input() {
        assert!(read_mgf("".as_bytes()).unwrap().is_empty());
    }
}
