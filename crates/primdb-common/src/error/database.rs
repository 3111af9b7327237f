//! Database error types.
//!
//! Every failure a command can produce is a variant of [`DbError`]. A user
//! declining a destructive confirmation is deliberately *not* an error; the
//! engine reports it as a cancelled outcome instead.

use std::fmt;
use thiserror::Error;

/// Coarse error kinds shown to the user.
///
/// Each [`ErrorCode`] belongs to exactly one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed column spec, bad cast, wrong arity, reserved-name collision,
    /// malformed clause.
    InvalidValue,
    /// Table or column absent.
    NotFound,
    /// Duplicate table name.
    AlreadyExists,
    /// The persistence layer failed to write.
    Storage,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Error codes for categorizing errors.
///
/// These codes can be used for programmatic error handling and
/// are stable across versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    // Value errors (0x0100 - 0x01FF)
    /// A value or column spec failed validation.
    InvalidValue = 0x0100,
    /// The command name is not recognised.
    UnknownCommand = 0x0101,
    /// Configuration is invalid.
    InvalidConfig = 0x0102,

    // Lookup errors (0x0200 - 0x02FF)
    /// Table not found.
    TableNotFound = 0x0200,
    /// Column not found.
    ColumnNotFound = 0x0201,
    /// Table already exists.
    TableExists = 0x0202,

    // Storage errors (0x0300 - 0x03FF)
    /// General I/O error.
    Io = 0x0300,
    /// JSON encoding failed.
    Serialization = 0x0301,
}

impl ErrorCode {
    /// Returns the numeric code.
    #[inline]
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Returns the kind this code belongs to.
    #[must_use]
    pub const fn kind(self) -> ErrorKind {
        match self {
            Self::InvalidValue | Self::UnknownCommand | Self::InvalidConfig => {
                ErrorKind::InvalidValue
            }
            Self::TableNotFound | Self::ColumnNotFound => ErrorKind::NotFound,
            Self::TableExists => ErrorKind::AlreadyExists,
            Self::Io | Self::Serialization => ErrorKind::Storage,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// The main error type for primdb.
///
/// # Example
///
/// ```rust
/// use primdb_common::error::{DbError, ErrorCode};
///
/// let err = DbError::invalid_value("age:float");
/// assert_eq!(err.code(), ErrorCode::InvalidValue);
/// assert_eq!(err.to_string(), "invalid value: age:float");
/// ```
#[derive(Debug, Error)]
pub enum DbError {
    /// A column spec, value, clause, or argument list is malformed.
    #[error("invalid value: {message}")]
    InvalidValue {
        /// The offending input.
        message: String,
    },

    /// The command name is not recognised.
    #[error("unknown command: {command}")]
    UnknownCommand {
        /// The command as typed.
        command: String,
    },

    /// Table not found.
    #[error("table \"{table}\" not found")]
    TableNotFound {
        /// The table name.
        table: String,
    },

    /// Column not found.
    #[error("column \"{column}\" not found")]
    ColumnNotFound {
        /// The column name.
        column: String,
    },

    /// Table already exists.
    #[error("table \"{table}\" already exists")]
    AlreadyExists {
        /// The table name.
        table: String,
    },

    /// I/O error while writing persisted state.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Persisted state could not be encoded.
    #[error("serialization error: {message}")]
    Serialization {
        /// Error message.
        message: String,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Error message.
        message: String,
    },
}

impl DbError {
    /// Returns the error code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidValue { .. } => ErrorCode::InvalidValue,
            Self::UnknownCommand { .. } => ErrorCode::UnknownCommand,
            Self::TableNotFound { .. } => ErrorCode::TableNotFound,
            Self::ColumnNotFound { .. } => ErrorCode::ColumnNotFound,
            Self::AlreadyExists { .. } => ErrorCode::TableExists,
            Self::Io { .. } => ErrorCode::Io,
            Self::Serialization { .. } => ErrorCode::Serialization,
            Self::InvalidConfig { .. } => ErrorCode::InvalidConfig,
        }
    }

    /// Returns the user-facing kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.code().kind()
    }

    /// Creates an invalid value error.
    #[must_use]
    pub fn invalid_value(message: impl Into<String>) -> Self {
        Self::InvalidValue {
            message: message.into(),
        }
    }

    /// Creates a table not found error.
    #[must_use]
    pub fn table_not_found(table: impl Into<String>) -> Self {
        Self::TableNotFound {
            table: table.into(),
        }
    }

    /// Creates a column not found error.
    #[must_use]
    pub fn column_not_found(column: impl Into<String>) -> Self {
        Self::ColumnNotFound {
            column: column.into(),
        }
    }

    /// Creates an already exists error.
    #[must_use]
    pub fn already_exists(table: impl Into<String>) -> Self {
        Self::AlreadyExists {
            table: table.into(),
        }
    }

    /// Creates an unknown command error.
    #[must_use]
    pub fn unknown_command(command: impl Into<String>) -> Self {
        Self::UnknownCommand {
            command: command.into(),
        }
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }
}
