//! Error types for Classroom
//!
//! All modules use `ClassroomResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Classroom operations
pub type ClassroomResult<T> = Result<T, ClassroomError>;

/// All errors that can occur in Classroom
#[derive(Error, Debug)]
pub enum ClassroomError {
    // Store errors
    #[error("Backing store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Store IO error: {context}")]
    StoreIo {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Record in {collection} has no '{field}' key")]
    MissingKey { collection: String, field: String },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Workspace errors
    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Folder not found: {0}")]
    FolderNotFound(String),

    #[error("Invalid snapshot: {0}")]
    SnapshotInvalid(String),

    // Sandbox errors
    #[error("Interpreter not found: {name}")]
    InterpreterNotFound { name: String },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

impl ClassroomError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a store IO error with context
    pub fn store_io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::StoreIo {
            context: context.into(),
            source,
        }
    }

    /// Create an invalid name error
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid path error
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::InterpreterNotFound { .. } => {
                Some("Install Node.js or set sandbox.interpreter in the config file")
            }
            Self::FileNotFound(_) | Self::FolderNotFound(_) => {
                Some("Run: classroom tree to list the project")
            }
            Self::StoreUnavailable(_) => Some("Check the store.dir setting and its permissions"),
            Self::SnapshotInvalid(_) => Some("Use a file produced by: classroom project export"),
            _ => None,
        }
    }
}
