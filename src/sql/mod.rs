/// QueryLite SQL engine
///
/// A small SQL-subset engine with no grammar compiler: statements are
/// taken apart by locating clause keywords, and filters are evaluated by
/// quote- and depth-aware splitting.
///
/// Architecture:
/// - split: field splitters that respect quoting and parenthesis depth
/// - parser: clause extraction from statement text
/// - evaluator: WHERE-clause evaluation against records
/// - executor: statement execution over in-memory rows

pub mod ast;
pub mod evaluator;
pub mod executor;
pub mod parser;
pub mod split;

pub use ast::{
    ColumnSpec, DeleteStmt, InsertStmt, OrderBy, SelectStmt, SortDirection, Statement, UpdateStmt,
};
pub use executor::QueryResult;

use crate::error::Result;
use crate::types::Record;

/// Parse and execute a single SQL statement against a table's rows.
///
/// Mutating statements edit `rows` in place; persisting the new row set is
/// the caller's responsibility. A statement that fails to parse leaves
/// `rows` untouched.
pub fn execute(sql: &str, rows: &mut Vec<Record>) -> Result<QueryResult> {
    let statement = parser::parse(sql)?;
    Ok(executor::execute(statement, rows))
}
