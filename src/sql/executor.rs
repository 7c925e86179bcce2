//! Statement execution over in-memory rows
//!
//! The executor owns no state: it takes the caller's row vector, edits it
//! in place for mutations, and reports what happened. Persisting the
//! updated rows is the caller's job.

use super::ast::*;
use super::evaluator::matches;
use super::split::strip_quotes;
use crate::types::{Record, Value};
use std::cmp::Ordering;

const NULL: Value = Value::Null;

/// Result of executing one statement.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    /// SELECT: projected rows, in result order
    Rows(Vec<Record>),
    /// INSERT: the record that was appended
    Inserted(Record),
    /// UPDATE: how many records were touched
    Updated(usize),
    /// DELETE: how many records were removed
    Deleted(usize),
}

impl QueryResult {
    pub fn affected_rows(&self) -> usize {
        match self {
            QueryResult::Rows(_) => 0,
            QueryResult::Inserted(_) => 1,
            QueryResult::Updated(count) | QueryResult::Deleted(count) => *count,
        }
    }

    /// SELECT rows, or None for mutation results.
    pub fn rows(&self) -> Option<&[Record]> {
        match self {
            QueryResult::Rows(rows) => Some(rows),
            _ => None,
        }
    }
}

/// Execute a parsed statement against a table's rows.
pub fn execute(statement: Statement, rows: &mut Vec<Record>) -> QueryResult {
    match statement {
        Statement::Select(stmt) => execute_select(&stmt, rows),
        Statement::Insert(stmt) => execute_insert(&stmt, rows),
        Statement::Update(stmt) => execute_update(&stmt, rows),
        Statement::Delete(stmt) => execute_delete(&stmt, rows),
    }
}

fn execute_select(stmt: &SelectStmt, rows: &[Record]) -> QueryResult {
    let mut selected: Vec<Record> = rows
        .iter()
        .filter(|record| passes_filter(stmt.where_clause.as_deref(), record))
        .cloned()
        .collect();

    if let Some(order) = &stmt.order_by {
        // stable sort; DESC reverses the comparison, not the rows, so ties
        // keep their input order either way
        selected.sort_by(|a, b| {
            let ordering = sort_key_cmp(a, b, &order.field);
            match order.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }

    if let Some(limit) = stmt.limit {
        selected.truncate(limit);
    }

    let projected = match &stmt.columns {
        ColumnSpec::Star => selected,
        ColumnSpec::Columns(columns) => selected
            .iter()
            .map(|record| project(record, columns))
            .collect(),
    };

    QueryResult::Rows(projected)
}

fn execute_insert(stmt: &InsertStmt, rows: &mut Vec<Record>) -> QueryResult {
    let mut record = Record::new();
    for (i, column) in stmt.columns.iter().enumerate() {
        // extra columns beyond the value list map to null; extra values
        // beyond the column list are dropped by the zip
        let value = match stmt.values.get(i) {
            Some(raw) => Value::Text(strip_quotes(raw).to_string()),
            None => Value::Null,
        };
        record.set(column, value);
    }
    rows.push(record.clone());
    QueryResult::Inserted(record)
}

fn execute_update(stmt: &UpdateStmt, rows: &mut [Record]) -> QueryResult {
    let mut updated = 0;
    for record in rows.iter_mut() {
        if passes_filter(stmt.where_clause.as_deref(), record) {
            for (field, value) in &stmt.assignments {
                record.set(field, Value::Text(value.clone()));
            }
            updated += 1;
        }
    }
    QueryResult::Updated(updated)
}

fn execute_delete(stmt: &DeleteStmt, rows: &mut Vec<Record>) -> QueryResult {
    let before = rows.len();
    rows.retain(|record| !passes_filter(stmt.where_clause.as_deref(), record));
    QueryResult::Deleted(before - rows.len())
}

fn passes_filter(filter: Option<&str>, record: &Record) -> bool {
    match filter {
        Some(expr) => matches(expr, record),
        None => true,
    }
}

fn sort_key_cmp(a: &Record, b: &Record, field: &str) -> Ordering {
    let ka = a.get(field).unwrap_or(&NULL);
    let kb = b.get(field).unwrap_or(&NULL);
    ka.partial_cmp(kb).unwrap_or(Ordering::Equal)
}

/// Rebuild a record with exactly the named columns, in the given order.
/// Absent fields project as null.
fn project(record: &Record, columns: &[String]) -> Record {
    columns
        .iter()
        .map(|column| {
            let value = record.get(column).cloned().unwrap_or(Value::Null);
            (column.clone(), value)
        })
        .collect()
}
