//! Reading history streams back for post-processing.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Parsed view of one history stream.
///
/// The counterpart of [`HistoryWriter`](super::HistoryWriter): recovers the
/// header and the per-step lines, decoding them back into numbers.
pub struct HistoryReader {
    header: String,
    lines: Vec<String>,
}

impl HistoryReader {
    /// Read a stream written by the history writer.
    pub fn open(path: &Path) -> io::Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let mut header = String::new();
        let mut lines = Vec::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if i == 0 {
                if let Some(rest) = line.strip_prefix("# ") {
                    header = rest.to_string();
                    continue;
                }
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "history stream is missing its header line",
                ));
            }
            lines.push(line);
        }
        Ok(Self { header, lines })
    }

    /// The run identification header.
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Number of recorded steps.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the stream recorded no steps.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Decode every line as a field row.
    pub fn rows(&self) -> io::Result<Vec<Vec<f64>>> {
        self.lines
            .iter()
            .map(|line| {
                line.split_whitespace()
                    .map(|token| {
                        token.parse::<f64>().map_err(|e| {
                            io::Error::new(
                                io::ErrorKind::InvalidData,
                                format!("bad field value {token:?}: {e}"),
                            )
                        })
                    })
                    .collect()
            })
            .collect()
    }

    /// Decode every line as a list of cell indices.
    pub fn index_rows(&self) -> io::Result<Vec<Vec<usize>>> {
        self.lines
            .iter()
            .map(|line| {
                line.split_whitespace()
                    .map(|token| {
                        token.parse::<usize>().map_err(|e| {
                            io::Error::new(
                                io::ErrorKind::InvalidData,
                                format!("bad cell index {token:?}: {e}"),
                            )
                        })
                    })
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::super::writer::HistoryWriter;
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn round_trips_what_the_writer_wrote() {
        let dir = tempdir().unwrap();
        let mut writer = HistoryWriter::create(dir.path(), 1, "roundtrip").unwrap();
        writer.write_step(&[0.125, -3.5, 0.0], &[2, 5]).unwrap();
        writer.write_step(&[1.0, 2.0, 3.0], &[2, 5]).unwrap();
        let (field_path, particles_path) = writer.finish().unwrap();

        let field = HistoryReader::open(&field_path).unwrap();
        assert_eq!(field.header(), "roundtrip");
        assert_eq!(
            field.rows().unwrap(),
            vec![vec![0.125, -3.5, 0.0], vec![1.0, 2.0, 3.0]]
        );

        let particles = HistoryReader::open(&particles_path).unwrap();
        assert_eq!(particles.index_rows().unwrap(), vec![vec![2, 5], vec![2, 5]]);
    }

    #[test]
    fn rejects_a_stream_without_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bare.txt");
        std::fs::write(&path, "0.0 1.0\n").unwrap();
        let err = HistoryReader::open(&path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn rejects_unparseable_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        std::fs::write(&path, "# h\n0.0 oops\n").unwrap();
        let reader = HistoryReader::open(&path).unwrap();
        assert!(reader.rows().is_err());
    }
}
