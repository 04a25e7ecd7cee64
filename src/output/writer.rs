//! Text history streams for field rows and particle positions.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Prefix shared by every artifact this crate writes.
pub const FILE_PREFIX: &str = "chorda";

/// Writer for the two per-run history streams.
///
/// Each stream starts with a single `#`-prefixed header line identifying the
/// run, then carries one whitespace-delimited line per time step. Lines are
/// flushed as they are written, so an aborted run leaves every completed
/// step readable on disk.
pub struct HistoryWriter {
    field: BufWriter<File>,
    particles: BufWriter<File>,
    field_path: PathBuf,
    particles_path: PathBuf,
    steps_written: u64,
}

impl HistoryWriter {
    /// Open both streams in `out_dir`, named with the run timestamp, and
    /// write the header line to each.
    pub fn create(out_dir: &Path, timestamp: u64, header: &str) -> io::Result<Self> {
        let field_path = out_dir.join(format!("{FILE_PREFIX}-field_{timestamp}.txt"));
        let particles_path = out_dir.join(format!("{FILE_PREFIX}-particles_{timestamp}.txt"));
        let mut field = BufWriter::new(File::create(&field_path)?);
        let mut particles = BufWriter::new(File::create(&particles_path)?);
        writeln!(field, "# {header}")?;
        writeln!(particles, "# {header}")?;
        Ok(Self {
            field,
            particles,
            field_path,
            particles_path,
            steps_written: 0,
        })
    }

    /// Append one line per stream for the current step and flush both.
    pub fn write_step(&mut self, row: &[f64], positions: &[usize]) -> io::Result<()> {
        writeln!(self.field, "{}", join(row.iter()))?;
        writeln!(self.particles, "{}", join(positions.iter()))?;
        self.field.flush()?;
        self.particles.flush()?;
        self.steps_written += 1;
        Ok(())
    }

    /// Steps written so far.
    pub fn steps_written(&self) -> u64 {
        self.steps_written
    }

    /// Flush and close both streams, returning their paths.
    pub fn finish(mut self) -> io::Result<(PathBuf, PathBuf)> {
        self.field.flush()?;
        self.particles.flush()?;
        Ok((self.field_path, self.particles_path))
    }
}

fn join<T: ToString>(values: impl Iterator<Item = T>) -> String {
    values
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writes_header_and_one_line_per_step() {
        let dir = tempdir().unwrap();
        let mut writer = HistoryWriter::create(dir.path(), 42, "test run").unwrap();
        writer.write_step(&[0.5, -0.25], &[1]).unwrap();
        writer.write_step(&[1.0, 0.0], &[1]).unwrap();
        assert_eq!(writer.steps_written(), 2);
        let (field_path, particles_path) = writer.finish().unwrap();

        let field = std::fs::read_to_string(field_path).unwrap();
        assert_eq!(field, "# test run\n0.5 -0.25\n1 0\n");
        let particles = std::fs::read_to_string(particles_path).unwrap();
        assert_eq!(particles, "# test run\n1\n1\n");
    }

    #[test]
    fn particle_free_steps_write_empty_lines() {
        let dir = tempdir().unwrap();
        let mut writer = HistoryWriter::create(dir.path(), 7, "free").unwrap();
        writer.write_step(&[0.0], &[]).unwrap();
        let (_, particles_path) = writer.finish().unwrap();
        let particles = std::fs::read_to_string(particles_path).unwrap();
        assert_eq!(particles, "# free\n\n");
    }
}
