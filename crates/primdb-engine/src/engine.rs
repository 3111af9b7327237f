//! Statement dispatch.
//!
//! The `Database` struct is the top-level entry point for primdb. It loads
//! state from its [`Persistence`] at the start of every statement, routes the
//! statement to the catalog or the row engine, and writes changed state back.

use tracing::{debug, info};

use primdb_cache::CacheStats;
use primdb_common::config::DatabaseConfig;
use primdb_common::instrument::timed;
use primdb_common::DbResult;

use crate::catalog::Catalog;
use crate::confirm::{Confirm, Outcome};
use crate::parser::Statement;
use crate::result::StatementResult;
use crate::storage::{JsonStore, Persistence};
use crate::table::{delete, insert, select, update, Assignment, Predicate, RowCache};

/// Database statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DatabaseStats {
    /// Statements executed successfully, including cancelled ones.
    pub statements: u64,
    /// Statements that failed.
    pub errors: u64,
}

/// The main database engine.
///
/// Holds no table state between statements other than the query cache,
/// which lives as long as the `Database` value.
#[derive(Debug)]
pub struct Database<P = JsonStore> {
    store: P,
    cache: RowCache,
    stats: DatabaseStats,
}

impl Database<JsonStore> {
    /// Opens a database over the files described by `config`.
    pub fn open(config: DatabaseConfig) -> DbResult<Self> {
        config.validate()?;
        info!(data_dir = %config.data_dir().display(), "opening database");
        Ok(Self::with_store(JsonStore::new(config)))
    }
}

impl<P: Persistence> Database<P> {
    /// Creates a database over an existing store.
    pub fn with_store(store: P) -> Self {
        Self {
            store,
            cache: RowCache::new(),
            stats: DatabaseStats::default(),
        }
    }

    /// Parses and executes one command line.
    pub fn run(&mut self, line: &str, confirm: &mut dyn Confirm) -> DbResult<StatementResult> {
        let result = Statement::parse(line).and_then(|stmt| self.dispatch(stmt, confirm));
        self.record(&result);
        result
    }

    /// Executes a parsed statement.
    pub fn execute(
        &mut self,
        stmt: Statement,
        confirm: &mut dyn Confirm,
    ) -> DbResult<StatementResult> {
        let result = self.dispatch(stmt, confirm);
        self.record(&result);
        result
    }

    fn record(&mut self, result: &DbResult<StatementResult>) {
        match result {
            Ok(_) => self.stats.statements += 1,
            Err(e) => {
                self.stats.errors += 1;
                debug!(code = %e.code(), error = %e, "statement failed");
            }
        }
    }

    fn dispatch(
        &mut self,
        stmt: Statement,
        confirm: &mut dyn Confirm,
    ) -> DbResult<StatementResult> {
        debug!(command = stmt.name(), table = stmt.table(), "executing statement");
        let mut catalog = self.store.load_catalog();

        match stmt {
            Statement::CreateTable { table, columns } => {
                let schema = catalog.create_table(&table, columns.as_slice())?.clone();
                self.store.save_catalog(&catalog)?;
                info!(table = %table, "table created");
                Ok(StatementResult::TableCreated { table, schema })
            }

            Statement::DropTable { table } => match catalog.drop_table(&table, confirm)? {
                Outcome::Cancelled => Ok(StatementResult::Cancelled),
                Outcome::Done(_) => {
                    self.store.save_catalog(&catalog)?;
                    self.store.remove_rows(&table)?;
                    info!(table = %table, "table dropped");
                    Ok(StatementResult::TableDropped { table })
                }
            },

            Statement::ListTables => Ok(StatementResult::Tables(catalog.list_tables())),

            Statement::Insert { table, values } => {
                let schema = catalog.require_table(&table)?;
                let mut rows = self.store.load_rows(&table);

                let id = timed("insert", || insert(schema, values.as_slice(), &mut rows))?;
                self.store.save_rows(&table, &rows)?;
                Ok(StatementResult::Inserted { table, id })
            }

            Statement::Select { table, filter } => {
                let schema = catalog.require_table(&table)?;
                let predicate = filter
                    .map(|clause| Predicate::bind(schema, &clause.column, &clause.value))
                    .transpose()?;
                let rows = self.store.load_rows(&table);

                let cache = &mut self.cache;
                let result = timed("select", || select(cache, &rows, predicate.as_ref()));
                Ok(StatementResult::Rows {
                    columns: schema.column_names(),
                    rows: result,
                })
            }

            Statement::Update { table, set, filter } => {
                let schema = catalog.require_table(&table)?;
                let set = Assignment::bind(schema, &set.column, &set.value)?;
                let filter = Predicate::bind(schema, &filter.column, &filter.value)?;
                let mut rows = self.store.load_rows(&table);

                let ids = update(&mut rows, &set, &filter);
                if !ids.is_empty() {
                    self.store.save_rows(&table, &rows)?;
                }
                Ok(StatementResult::Updated { table, ids })
            }

            Statement::Delete { table, filter } => {
                let schema = catalog.require_table(&table)?;
                let filter = Predicate::bind(schema, &filter.column, &filter.value)?;
                let mut rows = self.store.load_rows(&table);

                match delete(&mut rows, &filter, confirm) {
                    Outcome::Cancelled => Ok(StatementResult::Cancelled),
                    Outcome::Done(ids) => {
                        if !ids.is_empty() {
                            self.store.save_rows(&table, &rows)?;
                        }
                        Ok(StatementResult::Deleted { table, ids })
                    }
                }
            }

            Statement::Info { table } => {
                let schema = catalog.require_table(&table)?.clone();
                let row_count = self.store.load_rows(&table).len();
                Ok(StatementResult::Info {
                    table,
                    schema,
                    row_count,
                })
            }
        }
    }

    /// Loads the current catalog.
    pub fn catalog(&self) -> Catalog {
        self.store.load_catalog()
    }

    /// Returns query cache statistics.
    pub fn cache_stats(&self) -> &CacheStats {
        self.cache.stats()
    }

    /// Returns the number of cached select results.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Returns statement statistics.
    pub fn stats(&self) -> DatabaseStats {
        self.stats
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &P {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use crate::storage::MemoryStore;
    use crate::value::Value;
    use primdb_common::{ErrorCode, ErrorKind};

    fn db() -> Database<MemoryStore> {
        Database::with_store(MemoryStore::new())
    }

    fn run(db: &mut Database<MemoryStore>, line: &str) -> StatementResult {
        db.run(line, &mut true).unwrap()
    }

    #[test]
    fn test_users_scenario() {
        let mut db = db();

        let created = run(&mut db, "create_table users name:str age:int");
        assert_eq!(
            created.display(),
            "Table \"users\" created with columns: ID:int, name:str, age:int"
        );

        let inserted = run(&mut db, r#"insert into users values ("Alice", 30)"#);
        assert_eq!(
            inserted,
            StatementResult::Inserted {
                table: "users".to_string(),
                id: 1
            }
        );
        assert_eq!(
            db.store().load_rows("users"),
            vec![Record::with_id(1).with("name", "Alice").with("age", 30)]
        );

        let selected = run(&mut db, r#"select from users where name = "Alice""#);
        let (columns, rows) = selected.as_rows().unwrap();
        assert_eq!(columns, ["ID", "name", "age"]);
        assert_eq!(rows.len(), 1);

        let updated = run(&mut db, r#"update users set age = 31 where name = "Alice""#);
        assert_eq!(updated.rows_affected(), Some(1));
        assert_eq!(
            db.store().load_rows("users")[0].get("age"),
            Some(&Value::Int(31))
        );

        let deleted = run(&mut db, r#"delete from users where name = "Alice""#);
        assert_eq!(
            deleted,
            StatementResult::Deleted {
                table: "users".to_string(),
                ids: vec![1]
            }
        );
        assert!(db.store().load_rows("users").is_empty());
    }

    #[test]
    fn test_list_and_info() {
        let mut db = db();
        assert_eq!(run(&mut db, "list_tables").display(), "No tables.");

        run(&mut db, "create_table users name:str");
        run(&mut db, "create_table orders total:int");
        run(&mut db, "insert into orders values (12)");

        assert_eq!(
            run(&mut db, "list_tables"),
            StatementResult::Tables(vec!["orders".to_string(), "users".to_string()])
        );
        assert_eq!(
            run(&mut db, "info orders").display(),
            "Table: orders\nColumns: ID:int, total:int\nRows: 1"
        );
    }

    #[test]
    fn test_drop_removes_rows() {
        let mut db = db();
        run(&mut db, "create_table users name:str");
        run(&mut db, r#"insert into users values ("A")"#);

        let dropped = run(&mut db, "drop_table users");
        assert_eq!(dropped.display(), "Table \"users\" dropped.");
        assert!(!db.store().has_rows("users"));
        assert!(!db.catalog().table_exists("users"));

        run(&mut db, "create_table users name:str");
        let inserted = run(&mut db, r#"insert into users values ("B")"#);
        assert_eq!(inserted.rows_affected(), Some(1));
        assert!(matches!(inserted, StatementResult::Inserted { id: 1, .. }));
    }

    #[test]
    fn test_drop_cancelled() {
        let mut db = db();
        run(&mut db, "create_table users name:str");

        let result = db.run("drop_table users", &mut false).unwrap();
        assert!(result.is_cancelled());
        assert!(db.catalog().table_exists("users"));
    }

    #[test]
    fn test_drop_missing_does_not_prompt() {
        struct Panicking;
        impl Confirm for Panicking {
            fn confirm(&mut self, _action: &str) -> bool {
                panic!("should not prompt");
            }
        }

        let mut db = db();
        let err = db.run("drop_table ghost", &mut Panicking).unwrap_err();
        assert_eq!(err.code(), ErrorCode::TableNotFound);
    }

    #[test]
    fn test_delete_cancelled() {
        let mut db = db();
        run(&mut db, "create_table users name:str");
        run(&mut db, r#"insert into users values ("A")"#);
        let before = db.store().load_rows("users");

        let result = db.run("delete from users where ID = 1", &mut false).unwrap();
        assert!(result.is_cancelled());
        assert_eq!(db.store().load_rows("users"), before);
    }

    #[test]
    fn test_delete_prompt_names_the_filter() {
        struct Recorder(Vec<String>);
        impl Confirm for Recorder {
            fn confirm(&mut self, action: &str) -> bool {
                self.0.push(action.to_string());
                true
            }
        }

        let mut db = db();
        run(&mut db, "create_table users name:str");

        let mut recorder = Recorder(Vec::new());
        db.run(r#"delete from users where name = "x""#, &mut recorder)
            .unwrap();
        assert_eq!(recorder.0, vec!["delete rows where name = x"]);
    }

    #[test]
    fn test_errors() {
        let mut db = db();
        run(&mut db, "create_table users name:str age:int");

        let cases = [
            ("create_table users x:int", ErrorKind::AlreadyExists),
            ("insert into ghosts values (1)", ErrorKind::NotFound),
            (r#"insert into users values ("A")"#, ErrorKind::InvalidValue),
            ("insert into users values (A, 1)", ErrorKind::InvalidValue),
            ("select from users where email = 1", ErrorKind::NotFound),
            (r#"select from users where age = "1""#, ErrorKind::InvalidValue),
            ("update users set ID = 5 where age = 1", ErrorKind::InvalidValue),
            ("info ghosts", ErrorKind::NotFound),
            ("create_table empty", ErrorKind::InvalidValue),
        ];
        for (line, kind) in cases {
            let err = db.run(line, &mut true).unwrap_err();
            assert_eq!(err.kind(), kind, "{line}");
        }

        assert_eq!(db.stats().errors, cases.len() as u64);
        assert!(db.store().load_rows("users").is_empty());
    }

    #[test]
    fn test_zero_match_update_and_delete() {
        let mut db = db();
        run(&mut db, "create_table users name:str age:int");
        run(&mut db, r#"insert into users values ("A", 1)"#);

        let updated = run(&mut db, "update users set age = 2 where age = 99");
        assert_eq!(updated.rows_affected(), Some(0));

        let deleted = run(&mut db, "delete from users where age = 99");
        assert_eq!(deleted.rows_affected(), Some(0));
        assert_eq!(db.store().load_rows("users").len(), 1);
    }

    #[test]
    fn test_select_after_update_is_stale() {
        let mut db = db();
        run(&mut db, "create_table users name:str age:int");
        run(&mut db, r#"insert into users values ("A", 1)"#);

        run(&mut db, "select from users");
        run(&mut db, "update users set age = 2 where ID = 1");

        let after = run(&mut db, "select from users");
        let (_, rows) = after.as_rows().unwrap();
        assert_eq!(rows[0].get("age"), Some(&Value::Int(1)));
        assert_eq!(db.cache_stats().hits(), 1);
        assert_eq!(db.cache_len(), 1);
    }

    #[test]
    fn test_insert_past_max_id_is_an_error() {
        let mut store = MemoryStore::new();
        let mut catalog = Catalog::new();
        catalog.create_table("t", &["x:int"]).unwrap();
        store.save_catalog(&catalog).unwrap();
        store
            .save_rows("t", &[Record::with_id(i64::MAX).with("x", 1)])
            .unwrap();
        let mut db = Database::with_store(store);

        let err = db.run("insert into t values (2)", &mut true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
        assert_eq!(db.store().load_rows("t").len(), 1);
        assert_eq!(db.stats().errors, 1);

        // The database keeps serving statements.
        assert!(run(&mut db, "select from t").as_rows().is_some());
    }

    #[test]
    fn test_fingerprint_has_no_table_name() {
        let mut db = db();
        run(&mut db, "create_table a x:int");
        run(&mut db, "create_table b x:int");
        run(&mut db, "insert into a values (10)");
        run(&mut db, "insert into b values (20)");

        run(&mut db, "select from a");
        let from_b = run(&mut db, "select from b");
        let (_, rows) = from_b.as_rows().unwrap();
        assert_eq!(rows[0].get("x"), Some(&Value::Int(10)));
        assert_eq!(db.cache_len(), 1);
    }
}
