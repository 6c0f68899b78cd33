//! Core error types for pomoplan-core.
//!
//! Every failure the core can surface falls in one of three groups:
//! guard violations on the phase state machine, references to entries
//! that do not exist, and invalid arguments or configuration. All of them
//! indicate a caller bug and are returned immediately, never retried.

use std::path::PathBuf;
use thiserror::Error;

use crate::timer::PhaseStatus;

/// Core error type for pomoplan-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A phase operation was called in a status that does not allow it.
    #[error("Cannot {operation}: expected status {}, found {actual}", format_statuses(.expected))]
    InvalidTransition {
        operation: &'static str,
        expected: &'static [PhaseStatus],
        actual: PhaseStatus,
    },

    /// A plan entry, archive entry or edit target does not exist.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// The state database could not be opened or queried.
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Rejected plan input, such as an empty description.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The data directory could not be created.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// State or config values did not fit their JSON shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    pub(crate) fn not_found(kind: &'static str, id: impl ToString) -> Self {
        CoreError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

fn format_statuses(statuses: &[PhaseStatus]) -> String {
    statuses
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(" or ")
}

/// Failures of the SQLite state store.
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Any statement failure, including a busy or locked file.
    #[error("Query failed: {0}")]
    QueryFailed(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Out of bounds
    #[error("Index {index} out of bounds for {collection} (length: {len})")]
    OutOfBounds {
        collection: String,
        index: usize,
        len: usize,
    },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        DatabaseError::QueryFailed(err.to_string())
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

pub type Result<T, E = CoreError> = std::result::Result<T, E>;
