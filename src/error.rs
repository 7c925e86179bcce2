//! Error types for the QueryLite engine

use thiserror::Error;

pub type Result<T> = std::result::Result<T, QueryError>;

#[derive(Error, Debug)]
pub enum QueryError {
    /// The leading command word is not one of SELECT/INSERT/UPDATE/DELETE.
    #[error("Unsupported statement: {0}")]
    UnsupportedStatement(String),

    /// The command keyword matched but the statement does not have the
    /// expected clause shape. Carries the full statement text.
    #[error("Malformed statement: {0}")]
    MalformedStatement(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid table name: {0}")]
    InvalidTableName(String),
}

impl From<serde_json::Error> for QueryError {
    fn from(err: serde_json::Error) -> Self {
        QueryError::Serialization(err.to_string())
    }
}
