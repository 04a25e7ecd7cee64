//! Bounded-memory time-indexed storage for field rows.
//!
//! [`FieldHistory`] holds the time series of 1D field snapshots produced by
//! the simulation. The absolute time index grows monotonically with every
//! append, while the physically retained window is capped by an optional
//! retention bound: once the absolute index exceeds the bound, each append
//! evicts exactly the oldest retained row (FIFO), so the window settles at
//! `memory + 1` rows. Queries are phrased in absolute time and fail
//! explicitly when they address an evicted step.

use std::collections::VecDeque;

use thiserror::Error;

/// Errors from constructing or querying a [`FieldHistory`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    /// Retention bound below the minimum the integration scheme needs.
    #[error("retention bound must be at least 3, got {0}")]
    RetentionTooSmall(u64),
    /// Initial history had no rows.
    #[error("initial history must contain at least one row")]
    EmptySeed,
    /// Initial rows disagree in length.
    #[error("initial row {row} has {got} cells, expected {expected}")]
    RaggedSeed {
        row: usize,
        expected: usize,
        got: usize,
    },
    /// Rows of zero width carry no field at all.
    #[error("field rows must contain at least one cell")]
    ZeroWidth,
    /// An appended row does not match the fixed spatial width.
    #[error("appended row has {got} cells, buffer width is {expected}")]
    ShapeMismatch { expected: usize, got: usize },
    /// The requested absolute time step has been evicted.
    #[error("time step {step} has been evicted, oldest retained is {oldest}")]
    RetentionExceeded { step: u64, oldest: u64 },
    /// Spatial index outside the lattice.
    #[error("cell index {index} out of bounds for width {width}")]
    PositionOutOfBounds { index: usize, width: usize },
}

/// Time series of field rows with an optional retention bound.
///
/// The absolute time index starts at `initial_rows.len() - 1` and increases
/// by exactly one per [`append`](Self::append). With `memory = Some(m)`,
/// eviction starts strictly once the absolute index exceeds `m`, leaving
/// `m + 1` addressable rows in steady state; with `memory = None` the
/// window grows without bound and nothing is ever evicted.
#[derive(Debug, Clone)]
pub struct FieldHistory {
    rows: VecDeque<Vec<f64>>,
    width: usize,
    memory: Option<u64>,
    last_step: u64,
}

impl FieldHistory {
    /// Smallest admissible retention bound. The integration scheme reads
    /// two prior rows and appends a third, so anything below 3 could evict
    /// a row the propagator still needs.
    pub const MIN_RETENTION: u64 = 3;

    /// Create a history from its seed rows.
    ///
    /// `initial_rows` must be a non-empty rectangular table with non-empty
    /// rows; `memory`, when bounded, must be at least
    /// [`MIN_RETENTION`](Self::MIN_RETENTION).
    pub fn new(initial_rows: Vec<Vec<f64>>, memory: Option<u64>) -> Result<Self, HistoryError> {
        if let Some(m) = memory {
            if m < Self::MIN_RETENTION {
                return Err(HistoryError::RetentionTooSmall(m));
            }
        }
        let width = match initial_rows.first() {
            None => return Err(HistoryError::EmptySeed),
            Some(row) if row.is_empty() => return Err(HistoryError::ZeroWidth),
            Some(row) => row.len(),
        };
        for (i, row) in initial_rows.iter().enumerate().skip(1) {
            if row.len() != width {
                return Err(HistoryError::RaggedSeed {
                    row: i,
                    expected: width,
                    got: row.len(),
                });
            }
        }
        let last_step = initial_rows.len() as u64 - 1;
        Ok(Self {
            rows: VecDeque::from(initial_rows),
            width,
            memory,
            last_step,
        })
    }

    /// Append the row for the next time step.
    ///
    /// Advances the absolute time index by one. In steady state this evicts
    /// exactly the oldest retained row, regardless of how far the index
    /// already exceeds the bound.
    pub fn append(&mut self, row: Vec<f64>) -> Result<(), HistoryError> {
        if row.len() != self.width {
            return Err(HistoryError::ShapeMismatch {
                expected: self.width,
                got: row.len(),
            });
        }
        self.last_step += 1;
        self.rows.push_back(row);
        if let Some(m) = self.memory {
            if self.last_step > m {
                self.rows.pop_front();
            }
        }
        Ok(())
    }

    /// The field row for absolute time step `t`.
    ///
    /// Fails with [`HistoryError::RetentionExceeded`] when `t` has already
    /// been evicted.
    ///
    /// # Panics
    ///
    /// `t` must not exceed [`current_step`](Self::current_step); querying a
    /// step that has not been produced yet is a caller error and panics.
    pub fn row_at(&self, t: u64) -> Result<&[f64], HistoryError> {
        let index = match self.memory {
            // Steady state: shift absolute time into the retained window.
            Some(m) if self.last_step > m => {
                let shifted = t as i64 - self.last_step as i64 + m as i64;
                if shifted < 0 {
                    return Err(HistoryError::RetentionExceeded {
                        step: t,
                        oldest: self.last_step - m,
                    });
                }
                shifted as usize
            }
            // Warm-up or unbounded: index space equals absolute time space.
            _ => t as usize,
        };
        Ok(self.rows[index].as_slice())
    }

    /// Values of cell `n` across every retained row, oldest first.
    ///
    /// Reflects the storage window as-is; no retention translation.
    pub fn column_at(&self, n: usize) -> Result<Vec<f64>, HistoryError> {
        if n >= self.width {
            return Err(HistoryError::PositionOutOfBounds {
                index: n,
                width: self.width,
            });
        }
        Ok(self.rows.iter().map(|row| row[n]).collect())
    }

    /// The newest row, i.e. the row for [`current_step`](Self::current_step).
    pub fn last(&self) -> &[f64] {
        self.rows
            .back()
            .map(Vec::as_slice)
            .expect("history always retains at least its newest row")
    }

    /// Number of rows currently retained.
    pub fn time_extent(&self) -> usize {
        self.rows.len()
    }

    /// Fixed row width (number of spatial cells).
    pub fn spatial_extent(&self) -> usize {
        self.width
    }

    /// Current absolute time index.
    pub fn current_step(&self) -> u64 {
        self.last_step
    }

    /// Oldest absolute time step still addressable.
    pub fn oldest_retained_step(&self) -> u64 {
        match self.memory {
            Some(m) if self.last_step > m => self.last_step - m,
            _ => 0,
        }
    }

    /// The configured retention bound (`None` = unbounded).
    pub fn memory(&self) -> Option<u64> {
        self.memory
    }
}
