//! Table schemas.
//!
//! A schema is an ordered list of typed columns. The first column is always
//! the reserved `ID:int` column; callers never supply it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use primdb_common::{DbError, DbResult, COLUMN_LIST_SEPARATOR, COLUMN_SPEC_SEPARATOR, ID_COLUMN};

/// Column data types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    /// 64-bit signed integer, token `int`.
    Int,
    /// Text, token `str`.
    Str,
    /// Boolean, token `bool`.
    Bool,
}

impl ColumnType {
    /// Returns the type token used in column specs.
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnType::Int => "int",
            ColumnType::Str => "str",
            ColumnType::Bool => "bool",
        }
    }
}

impl FromStr for ColumnType {
    type Err = DbError;

    /// Tokens match exactly; `Int` or `STR` are rejected.
    fn from_str(token: &str) -> DbResult<Self> {
        match token {
            "int" => Ok(ColumnType::Int),
            "str" => Ok(ColumnType::Str),
            "bool" => Ok(ColumnType::Bool),
            other => Err(DbError::invalid_value(other)),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A column definition, persisted as `"name:type"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColumnSpec {
    name: String,
    data_type: ColumnType,
}

impl ColumnSpec {
    /// Creates a column spec.
    pub fn new(name: impl Into<String>, data_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }

    /// The reserved identifier column.
    pub fn id() -> Self {
        Self::new(ID_COLUMN, ColumnType::Int)
    }

    /// Parses `name:type`, splitting on the first `:`.
    ///
    /// Checks syntax and type token only. Uniqueness depends on the other
    /// columns of the table; see [`validate_column_spec`].
    pub fn parse(raw: &str) -> DbResult<Self> {
        let (name, token) = raw
            .split_once(COLUMN_SPEC_SEPARATOR)
            .ok_or_else(|| DbError::invalid_value(raw))?;

        let name = name.trim();
        if name.is_empty() {
            return Err(DbError::invalid_value(raw));
        }

        let data_type = token.trim().parse()?;
        Ok(Self::new(name, data_type))
    }

    /// Column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column type.
    pub fn data_type(&self) -> ColumnType {
        self.data_type
    }

    /// Returns true for the reserved `ID` column.
    pub fn is_id(&self) -> bool {
        self.name == ID_COLUMN
    }
}

impl fmt::Display for ColumnSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.name, COLUMN_SPEC_SEPARATOR, self.data_type)
    }
}

impl TryFrom<String> for ColumnSpec {
    type Error = DbError;

    fn try_from(raw: String) -> DbResult<Self> {
        Self::parse(&raw)
    }
}

impl From<ColumnSpec> for String {
    fn from(spec: ColumnSpec) -> Self {
        spec.to_string()
    }
}

/// Validates one caller-supplied column spec against the columns already
/// accepted for the same table.
///
/// Fails with `InvalidValue` when the spec has no `:`, an empty name, an
/// unsupported type, or a name equal (ignoring case) to an existing column,
/// including the implicit `ID`.
pub fn validate_column_spec(raw: &str, existing: &[ColumnSpec]) -> DbResult<ColumnSpec> {
    let spec = ColumnSpec::parse(raw)?;

    let duplicate = spec.name.eq_ignore_ascii_case(ID_COLUMN)
        || existing
            .iter()
            .any(|column| column.name.eq_ignore_ascii_case(&spec.name));
    if duplicate {
        return Err(DbError::invalid_value(spec.name));
    }

    Ok(spec)
}

/// The ordered column list of one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableSchema {
    columns: Vec<ColumnSpec>,
}

impl TableSchema {
    /// Builds a schema from caller-supplied column specs, prepending `ID:int`.
    ///
    /// Fails with `InvalidValue` if `specs` is empty or any spec is invalid.
    pub fn from_specs<S: AsRef<str>>(specs: &[S]) -> DbResult<Self> {
        if specs.is_empty() {
            return Err(DbError::invalid_value("at least one column is required"));
        }

        let mut columns = vec![ColumnSpec::id()];
        for raw in specs {
            let spec = validate_column_spec(raw.as_ref(), &columns[1..])?;
            columns.push(spec);
        }

        Ok(Self { columns })
    }

    /// All columns, `ID` first.
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Columns the caller supplies values for on insert.
    pub fn data_columns(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns.iter().filter(|column| !column.is_id())
    }

    /// Looks up a column by exact name.
    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|column| column.name == name)
    }

    /// Column names in schema order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|column| column.name.clone()).collect()
    }

    /// Number of columns, including `ID`.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the schema has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Renders the columns as `name:type` joined by `", "`.
    pub fn format_columns(&self) -> String {
        self.columns
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(COLUMN_LIST_SEPARATOR)
    }
}
