use thiserror::Error;

/// Failure classes of the data plane.
///
/// Every variant is fatal: the pipeline never skips a bad record and
/// continues, because silent data loss in a scientific dataset is worse
/// than halting. Unresolved cluster references are not represented here
/// at all; they are an expected condition, not an error.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed row at line {line}: expected at least {expected} tab-delimited fields, found {found}")]
    MalformedRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("corrupt index stream at record {record}: {reason}")]
    CorruptIndex { record: u64, reason: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
