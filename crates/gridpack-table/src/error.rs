#![forbid(unsafe_code)]

//! Errors raised while formatting and packing table rows.

use std::fmt;
use std::io;

/// A cell value could not be produced or formatted.
///
/// Raised by [`crate::Getter`] implementations. The table fills in the
/// column name when the getter leaves it empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatError {
    column: Option<String>,
    message: String,
}

impl FormatError {
    /// Error with a message and no column attached yet.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            column: None,
            message: message.into(),
        }
    }

    /// Attach the column the error occurred in, unless one is already set.
    #[must_use]
    pub fn in_column(mut self, column: &str) -> Self {
        if self.column.is_none() {
            self.column = Some(column.to_owned());
        }
        self
    }

    /// Column name, if known.
    #[must_use]
    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    /// Human readable cause.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.column {
            Some(column) => write!(f, "column {column:?}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for FormatError {}

/// Errors from [`crate::Table`] operations.
#[derive(Debug)]
pub enum TableError {
    /// A row has a different number of cells than the table has columns.
    SchemaMismatch { expected: usize, actual: usize },
    /// A column with this name is already part of the schema.
    DuplicateColumn { name: String },
    /// A getter failed.
    Format(FormatError),
    /// Writing to the output failed.
    Sink(io::Error),
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SchemaMismatch { expected, actual } => {
                write!(f, "bad number of columns: {actual}, must be {expected}")
            }
            Self::DuplicateColumn { name } => write!(f, "duplicate column {name:?}"),
            Self::Format(err) => write!(f, "format failed: {err}"),
            Self::Sink(err) => write!(f, "write failed: {err}"),
        }
    }
}

impl std::error::Error for TableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Format(err) => Some(err),
            Self::Sink(err) => Some(err),
            Self::SchemaMismatch { .. } | Self::DuplicateColumn { .. } => None,
        }
    }
}

impl From<FormatError> for TableError {
    fn from(err: FormatError) -> Self {
        Self::Format(err)
    }
}

impl From<io::Error> for TableError {
    fn from(err: io::Error) -> Self {
        Self::Sink(err)
    }
}
