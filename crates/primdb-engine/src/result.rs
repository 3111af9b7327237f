//! Statement results.

use std::sync::Arc;

use crate::record::RowList;
use crate::schema::TableSchema;

/// Result of executing a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum StatementResult {
    /// `create_table` succeeded.
    TableCreated {
        /// Table name.
        table: String,
        /// The stored schema, `ID` first.
        schema: TableSchema,
    },
    /// `drop_table` succeeded.
    TableDropped {
        /// Table name.
        table: String,
    },
    /// `list_tables` output, sorted.
    Tables(Vec<String>),
    /// `insert` succeeded.
    Inserted {
        /// Table name.
        table: String,
        /// Identifier of the new record.
        id: i64,
    },
    /// `select` output.
    Rows {
        /// Column names in schema order.
        columns: Vec<String>,
        /// Matching rows in storage order.
        rows: Arc<RowList>,
    },
    /// `update` finished.
    Updated {
        /// Table name.
        table: String,
        /// Identifiers of the changed records.
        ids: Vec<i64>,
    },
    /// `delete` finished.
    Deleted {
        /// Table name.
        table: String,
        /// Identifiers of the removed records.
        ids: Vec<i64>,
    },
    /// `info` output.
    Info {
        /// Table name.
        table: String,
        /// Table schema.
        schema: TableSchema,
        /// Number of stored rows.
        row_count: usize,
    },
    /// The user declined a confirmation; nothing changed.
    Cancelled,
}

impl StatementResult {
    /// Returns the number of rows affected, if applicable.
    pub fn rows_affected(&self) -> Option<usize> {
        match self {
            StatementResult::Inserted { .. } => Some(1),
            StatementResult::Updated { ids, .. } | StatementResult::Deleted { ids, .. } => {
                Some(ids.len())
            }
            StatementResult::Rows { rows, .. } => Some(rows.len()),
            _ => None,
        }
    }

    /// Returns the rows if this is a `select` result.
    pub fn as_rows(&self) -> Option<(&[String], &RowList)> {
        match self {
            StatementResult::Rows { columns, rows } => Some((columns.as_slice(), &**rows)),
            _ => None,
        }
    }

    /// Returns true if the user declined a confirmation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, StatementResult::Cancelled)
    }

    /// Display as a string.
    ///
    /// A `select` result gives only its [`row_count_line`]; front ends render
    /// the rows themselves from [`StatementResult::as_rows`].
    pub fn display(&self) -> String {
        match self {
            StatementResult::TableCreated { table, schema } => format!(
                "Table \"{}\" created with columns: {}",
                table,
                schema.format_columns()
            ),
            StatementResult::TableDropped { table } => format!("Table \"{}\" dropped.", table),
            StatementResult::Tables(tables) => {
                if tables.is_empty() {
                    "No tables.".to_string()
                } else {
                    tables
                        .iter()
                        .map(|name| format!("- {}", name))
                        .collect::<Vec<_>>()
                        .join("\n")
                }
            }
            StatementResult::Inserted { table, id } => {
                format!("Record with ID={} inserted into \"{}\".", id, table)
            }
            StatementResult::Rows { rows, .. } => row_count_line(rows.len()),
            StatementResult::Updated { table, ids } => {
                summarize("updated in", table, ids)
            }
            StatementResult::Deleted { table, ids } => {
                summarize("deleted from", table, ids)
            }
            StatementResult::Info {
                table,
                schema,
                row_count,
            } => format!(
                "Table: {}\nColumns: {}\nRows: {}",
                table,
                schema.format_columns(),
                row_count
            ),
            StatementResult::Cancelled => "Operation cancelled.".to_string(),
        }
    }
}

fn summarize(verb: &str, table: &str, ids: &[i64]) -> String {
    if ids.is_empty() {
        return format!("No records matched in \"{}\".", table);
    }

    let ids = ids
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("Records with ID {} {} \"{}\".", ids, verb, table)
}

/// The `(N rows)` line printed under a `select` result.
pub fn row_count_line(count: usize) -> String {
    format!("({} row{})", count, if count == 1 { "" } else { "s" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;

    fn schema() -> TableSchema {
        TableSchema::from_specs(&["name:str", "age:int"]).unwrap()
    }

    #[test]
    fn test_created_message() {
        let result = StatementResult::TableCreated {
            table: "users".to_string(),
            schema: schema(),
        };
        assert_eq!(
            result.display(),
            "Table \"users\" created with columns: ID:int, name:str, age:int"
        );
    }

    #[test]
    fn test_tables_message() {
        assert_eq!(StatementResult::Tables(vec![]).display(), "No tables.");
        assert_eq!(
            StatementResult::Tables(vec!["a".to_string(), "b".to_string()]).display(),
            "- a\n- b"
        );
    }

    #[test]
    fn test_update_and_delete_messages() {
        let updated = StatementResult::Updated {
            table: "users".to_string(),
            ids: vec![1, 3],
        };
        assert_eq!(updated.display(), "Records with ID 1, 3 updated in \"users\".");
        assert_eq!(updated.rows_affected(), Some(2));

        let deleted = StatementResult::Deleted {
            table: "users".to_string(),
            ids: vec![],
        };
        assert_eq!(deleted.display(), "No records matched in \"users\".");
        assert_eq!(deleted.rows_affected(), Some(0));
    }

    #[test]
    fn test_rows_display_is_the_count() {
        let rows = vec![Record::with_id(1).with("name", "Alice").with("age", 30)];
        let result = StatementResult::Rows {
            columns: schema().column_names(),
            rows: Arc::new(rows),
        };

        assert_eq!(result.display(), "(1 row)");
        assert_eq!(result.rows_affected(), Some(1));
        assert_eq!(row_count_line(0), "(0 rows)");
        assert_eq!(row_count_line(2), "(2 rows)");
    }

    #[test]
    fn test_cancelled() {
        let result = StatementResult::Cancelled;
        assert!(result.is_cancelled());
        assert_eq!(result.display(), "Operation cancelled.");
        assert_eq!(result.rows_affected(), None);
    }
}
