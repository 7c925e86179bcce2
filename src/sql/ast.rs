//! Statement model
//!
//! Filter expressions stay as unparsed substrings here; they are only
//! interpreted by the evaluator, record by record.

/// Top-level SQL statement
#[derive(Debug, Clone)]
pub enum Statement {
    Select(SelectStmt),
    Insert(InsertStmt),
    Update(UpdateStmt),
    Delete(DeleteStmt),
}

impl Statement {
    /// Table the statement operates on.
    pub fn table(&self) -> &str {
        match self {
            Statement::Select(stmt) => &stmt.table,
            Statement::Insert(stmt) => &stmt.table,
            Statement::Update(stmt) => &stmt.table,
            Statement::Delete(stmt) => &stmt.table,
        }
    }

    /// Does executing this statement change the row set?
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Statement::Select(_))
    }
}

/// SELECT statement
#[derive(Debug, Clone)]
pub struct SelectStmt {
    pub columns: ColumnSpec,
    pub table: String,
    pub where_clause: Option<String>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone)]
pub enum ColumnSpec {
    /// `*`: no projection
    Star,
    /// Explicit column list, in statement order
    Columns(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct OrderBy {
    pub field: String,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// INSERT statement. Values are raw tokens exactly as split out of the
/// statement; surrounding quotes are stripped when the row is built.
#[derive(Debug, Clone)]
pub struct InsertStmt {
    pub table: String,
    pub columns: Vec<String>,
    pub values: Vec<String>,
}

/// UPDATE statement. Assignment values already have one quote layer
/// stripped.
#[derive(Debug, Clone)]
pub struct UpdateStmt {
    pub table: String,
    pub assignments: Vec<(String, String)>,
    pub where_clause: Option<String>,
}

/// DELETE statement
#[derive(Debug, Clone)]
pub struct DeleteStmt {
    pub table: String,
    pub where_clause: Option<String>,
}
