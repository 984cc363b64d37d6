use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Incorrect number of values for {table} columns {columns:?}: expected {expected}, got {got}")]
    ColumnMismatch {
        table: &'static str,
        columns: Vec<String>,
        expected: usize,
        got: usize,
    },

    #[error("Unknown column '{column}' for table {table}")]
    UnknownColumn { table: &'static str, column: String },

    #[error("{0}")]
    Other(String),
}
