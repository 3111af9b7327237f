//! Row operations on one table.
//!
//! Every operation works on the full in-memory [`RowList`] of a table. The
//! caller loads it, runs the operation, and writes the whole list back.

use std::sync::Arc;

use tracing::debug;

use primdb_cache::{Fingerprint, QueryCache};
use primdb_common::{DbError, DbResult, FIRST_ROW_ID, ID_COLUMN};

use crate::confirm::{Confirm, Outcome};
use crate::record::{max_id, Record, RowList};
use crate::schema::TableSchema;
use crate::value::Value;

/// Memoized select results, owned by the process that issues reads.
pub type RowCache = QueryCache<Value, RowList>;

/// A single equality condition, `column = value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    /// Column compared.
    pub column: String,
    /// Value it must equal.
    pub value: Value,
}

impl Predicate {
    /// Creates a predicate from an already typed value.
    pub fn new(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Binds `column = raw` against a schema, casting `raw` to the column's
    /// type.
    pub fn bind(schema: &TableSchema, column: &str, raw: &str) -> DbResult<Self> {
        let (column, value) = bind_column_value(schema, column, raw)?;
        Ok(Self { column, value })
    }

    /// Exact typed equality; a missing column never matches.
    pub fn matches(&self, record: &Record) -> bool {
        record.get(&self.column) == Some(&self.value)
    }
}

/// The `set column = value` half of an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// Column assigned.
    pub column: String,
    /// New value.
    pub value: Value,
}

impl Assignment {
    /// Binds `column = raw` against a schema. The `ID` column is read-only.
    pub fn bind(schema: &TableSchema, column: &str, raw: &str) -> DbResult<Self> {
        if column == ID_COLUMN {
            return Err(DbError::invalid_value(format!("{ID_COLUMN} cannot be updated")));
        }
        let (column, value) = bind_column_value(schema, column, raw)?;
        Ok(Self { column, value })
    }
}

fn bind_column_value(schema: &TableSchema, column: &str, raw: &str) -> DbResult<(String, Value)> {
    let spec = schema
        .column(column)
        .ok_or_else(|| DbError::column_not_found(column))?;
    let value = Value::cast(raw, spec.data_type())?;
    Ok((spec.name().to_string(), value))
}

/// Casts `values` in schema order and appends a new record.
///
/// Returns the new identifier: the highest existing one plus one, or 1 for an
/// empty table. Fails with `InvalidValue` on an arity mismatch, a failed
/// cast, or when the highest ID is already `i64::MAX`; `rows` is untouched on
/// failure.
pub fn insert<S: AsRef<str>>(schema: &TableSchema, values: &[S], rows: &mut RowList) -> DbResult<i64> {
    let expected = schema.data_columns().count();
    if values.len() != expected {
        return Err(DbError::invalid_value(format!(
            "expected {expected} values, got {}",
            values.len()
        )));
    }

    let id = if rows.is_empty() {
        FIRST_ROW_ID
    } else {
        max_id(rows)
            .checked_add(1)
            .ok_or_else(|| DbError::invalid_value("no identifiers left after the highest ID"))?
    };

    let mut record = Record::with_id(id);
    for (column, raw) in schema.data_columns().zip(values) {
        let value = Value::cast(raw.as_ref().trim(), column.data_type())?;
        record.set(column.name(), value);
    }

    rows.push(record);
    debug!(id, rows = rows.len(), "record inserted");
    Ok(id)
}

/// Returns all rows, or the rows matching `predicate`, in storage order.
///
/// Results come from `cache` when a read with the same fingerprint has run
/// before in this process.
pub fn select(cache: &mut RowCache, rows: &[Record], predicate: Option<&Predicate>) -> Arc<RowList> {
    let row_count = rows.len();
    let max_id = max_id(rows);

    match predicate {
        None => cache.get_or_insert_with(Fingerprint::all(row_count, max_id), || rows.to_vec()),
        Some(predicate) => {
            let key = Fingerprint::filtered(
                predicate.column.clone(),
                predicate.value.clone(),
                row_count,
                max_id,
            );
            cache.get_or_insert_with(key, || {
                rows.iter()
                    .filter(|record| predicate.matches(record))
                    .cloned()
                    .collect()
            })
        }
    }
}

/// Applies `set` to every row matching `filter` and returns their
/// identifiers. Zero matches is not an error.
pub fn update(rows: &mut [Record], set: &Assignment, filter: &Predicate) -> Vec<i64> {
    let mut updated = Vec::new();
    for record in rows.iter_mut().filter(|record| filter.matches(record)) {
        record.set(set.column.clone(), set.value.clone());
        updated.extend(record.id());
    }
    debug!(count = updated.len(), "records updated");
    updated
}

/// Removes every row matching `filter` once `confirm` agrees.
///
/// Returns the removed identifiers in storage order. A declined gate leaves
/// `rows` untouched.
pub fn delete(rows: &mut RowList, filter: &Predicate, confirm: &mut dyn Confirm) -> Outcome<Vec<i64>> {
    if !confirm.confirm(&format!("delete rows where {} = {}", filter.column, filter.value)) {
        debug!("delete cancelled");
        return Outcome::Cancelled;
    }

    let (removed, kept): (RowList, RowList) = std::mem::take(rows)
        .into_iter()
        .partition(|record| filter.matches(record));
    *rows = kept;

    let deleted: Vec<i64> = removed.iter().filter_map(Record::id).collect();
    debug!(count = deleted.len(), "records deleted");
    Outcome::Done(deleted)
}
