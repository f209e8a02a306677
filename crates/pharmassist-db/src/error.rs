use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DbError {
    /// Bad credentials, unreachable host or unknown database at connect time
    #[error("Connection error: {0}")]
    Connection(String),

    /// Malformed SQL or a failing statement
    #[error("Query error: {0}")]
    Query(String),

    #[error("Decode error: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, DbError>;
