use std::io;

use thiserror::Error;

/// Reasons a raw console entry is refused by one of the input parsers.
///
/// The `Display` text is what the user sees before being asked again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Please provide an input entry.")]
    Empty,
    #[error("Invalid input! Please enter digits only (0-9).")]
    NotDigits,
    #[error("Invalid input! The number is too large.")]
    TooLarge,
    #[error("Invalid input! Please enter a valid number.")]
    NotANumber,
    #[error("Invalid input! Please enter a finite number.")]
    NotFinite,
    #[error("Invalid input! The amount cannot be negative.")]
    Negative,
    #[error("Invalid input! Please enter a valid date in YYYY-MM-DD format.")]
    DateFormat,
    #[error("Invalid input! {0} is not a real calendar date.")]
    NoSuchDate(String),
    #[error("Invalid input! Please enter 'true' (or 't') or 'false' (or 'f').")]
    NotBoolean,
    #[error("Invalid option selected! Please choose an option from {min}-{max}.")]
    OutOfRange { min: u64, max: u64 },
}

/// Failures raised by a record store or while decoding its rows
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sql(#[from] sqlx::Error),
    #[error("column `{0}` missing from result row")]
    MissingColumn(String),
    #[error("column `{column}` does not hold {expected}")]
    ColumnType {
        column: String,
        expected: &'static str,
    },
    #[error("column `{column}` has unsupported type {type_name}")]
    UnsupportedType { column: String, type_name: String },
    #[error("table {table} has no column `{column}`")]
    UnknownColumn { table: &'static str, column: String },
    #[error("project {0} is marked finalised but has no completion date")]
    MissingCompletionDate(i64),
}

/// Anything that can end a menu action early
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("console error: {0}")]
    Console(#[from] io::Error),
}

impl AppError {
    /// Console failures (closed stdin, broken stdout) end the session
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::Console(_))
    }
}
