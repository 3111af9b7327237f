//! System-wide constants for primdb.

// =============================================================================
// Schema Constants
// =============================================================================

/// Name of the identifier column every table starts with.
///
/// Injected by `create_table`, never supplied by the caller.
pub const ID_COLUMN: &str = "ID";

/// Separator between a column name and its type in a column spec.
pub const COLUMN_SPEC_SEPARATOR: char = ':';

/// Separator used when printing a column list.
pub const COLUMN_LIST_SEPARATOR: &str = ", ";

// =============================================================================
// File Layout Constants
// =============================================================================

/// Default data directory.
pub const DEFAULT_DATA_DIR: &str = ".";

/// Default schema file name, relative to the data directory.
pub const DEFAULT_META_FILE: &str = "db_meta.json";

/// Default directory holding one row file per table, relative to the data
/// directory.
pub const DEFAULT_ROWS_DIR: &str = "data";

/// Extension of per-table row files.
pub const ROWS_FILE_EXTENSION: &str = "json";

/// First identifier handed out in an empty table.
pub const FIRST_ROW_ID: i64 = 1;
