use thiserror::Error;

/// Failure reported by the persistence collaborator.
///
/// Always non-fatal to the task being logged: the record layer reports
/// these on the `proclog` tracing target and swallows them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PersistError {
    #[error("Connectivity error: {0}")]
    Connectivity(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Entry {0} not found")]
    EntryNotFound(i64),
}

#[derive(Error, Debug)]
pub enum LogError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Persist(#[from] PersistError),
}

pub type Result<T> = std::result::Result<T, LogError>;
