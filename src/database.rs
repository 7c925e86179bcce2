//! Top-level database wrapper
//!
//! Glues statement dispatch to table persistence: parse the statement,
//! load the table it names, execute, and save the rows back when the
//! statement mutated them. A statement that fails to parse never touches
//! storage.

use crate::error::Result;
use crate::sql::{executor, parser, QueryResult};
use crate::storage::{JsonStore, RowStore};
use std::path::Path;

/// A directory-backed database.
///
/// # Quick start
///
/// ```no_run
/// use querylite::Database;
///
/// # fn main() -> querylite::Result<()> {
/// let db = Database::open("./data")?;
/// db.execute(r#"INSERT INTO users (id, name) VALUES (1, "Alice")"#)?;
/// let result = db.execute("SELECT * FROM users WHERE id = 1")?;
/// # Ok(())
/// # }
/// ```
pub struct Database {
    store: JsonStore,
}

impl Database {
    /// Open (or create) a database rooted at `dir`.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            store: JsonStore::open(dir)?,
        })
    }

    /// Execute one SQL statement against its table.
    pub fn execute(&self, sql: &str) -> Result<QueryResult> {
        let statement = parser::parse(sql)?;
        let table = statement.table().to_string();
        let mutates = statement.is_mutation();

        let mut rows = self.store.load(&table)?;
        let result = executor::execute(statement, &mut rows);
        if mutates {
            self.store.save(&table, &rows)?;
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;
    use crate::types::Value;
    use tempfile::TempDir;

    #[test]
    fn test_execute_persists_mutations() {
        let dir = TempDir::new().unwrap();

        {
            let db = Database::open(dir.path()).unwrap();
            db.execute(r#"INSERT INTO users (id, name) VALUES (1, "Alice")"#)
                .unwrap();
            db.execute(r#"INSERT INTO users (id, name) VALUES (2, "Bob")"#)
                .unwrap();
            db.execute(r#"UPDATE users SET name = "Bobby" WHERE id = 2"#)
                .unwrap();
        }

        // a fresh handle sees the saved state
        let db = Database::open(dir.path()).unwrap();
        let result = db.execute("SELECT name FROM users ORDER BY id").unwrap();
        let names: Vec<String> = result
            .rows()
            .unwrap()
            .iter()
            .map(|r| r.get("name").unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["Alice", "Bobby"]);
    }

    #[test]
    fn test_delete_persists_kept_set() {
        let dir = TempDir::new().unwrap();
        let db = Database::open(dir.path()).unwrap();
        db.execute(r#"INSERT INTO users (id) VALUES (1)"#).unwrap();
        db.execute(r#"INSERT INTO users (id) VALUES (2)"#).unwrap();

        let result = db.execute("DELETE FROM users WHERE id = 1").unwrap();
        assert_eq!(result.affected_rows(), 1);

        let result = db.execute("SELECT * FROM users").unwrap();
        let remaining = result.rows().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].get("id"), Some(&Value::Text("2".into())));
    }

    #[test]
    fn test_select_does_not_create_table_file() {
        let dir = TempDir::new().unwrap();
        let db = Database::open(dir.path()).unwrap();
        let result = db.execute("SELECT * FROM ghosts").unwrap();
        assert!(result.rows().unwrap().is_empty());
        assert!(!dir.path().join("ghosts.json").exists());
    }

    #[test]
    fn test_failed_parse_touches_nothing() {
        let dir = TempDir::new().unwrap();
        let db = Database::open(dir.path()).unwrap();
        db.execute(r#"INSERT INTO users (id) VALUES (1)"#).unwrap();

        let err = db.execute("INSERT INTO users VALUES (2)").unwrap_err();
        assert!(matches!(err, QueryError::MalformedStatement(_)));

        let result = db.execute("SELECT * FROM users").unwrap();
        assert_eq!(result.rows().unwrap().len(), 1);
    }

    #[test]
    fn test_unsupported_statement_error() {
        let dir = TempDir::new().unwrap();
        let db = Database::open(dir.path()).unwrap();
        let err = db.execute("EXPLAIN SELECT * FROM users").unwrap_err();
        match err {
            QueryError::UnsupportedStatement(word) => assert_eq!(word, "EXPLAIN"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
