use crate::Timestamp;

use thiserror::Error;

/// Input faults detected before an indicator runs.
///
/// Warm-up is never an error: rows without enough history come back as
/// `None`. These variants cover caller contract violations, where computing
/// anyway would produce misaligned output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A bar's timestamp is lower than the one before it.
    #[error("timestamps must be ascending: row {index} has {current} after {previous}")]
    UnsortedTimestamps {
        index: usize,
        previous: Timestamp,
        current: Timestamp,
    },

    /// Two bars share a timestamp, so the join key is ambiguous.
    #[error("duplicate timestamp {timestamp} at row {index}")]
    DuplicateTimestamp { index: usize, timestamp: Timestamp },

    /// A labelled input column does not exist in the frame.
    #[error("missing column {name:?}")]
    MissingColumn { name: String },

    /// An input price cell is undefined.
    #[error("column {column:?} has no value at row {row}")]
    MissingValue { column: String, row: usize },

    /// A column does not have one cell per index row.
    #[error("column {name:?} has {actual} rows, expected {expected}")]
    ColumnLength {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// An appended column would shadow an existing one.
    #[error("column {name:?} already exists")]
    DuplicateColumn { name: String },
}

/// Convenience alias for results carrying [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
