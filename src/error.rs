use std::path::PathBuf;

use thiserror::Error;

use crate::debug::DebugError;

/// The model document or the project configuration could not be loaded.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Missing section in interaction model: {path}")]
    MissingSection { path: String },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid resources config: {0}")]
    InvalidResources(String),
}

/// A sample names something the model does not declare.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("Intent {intent}: sample \"{template}\" references undeclared slot {slot}")]
    UnknownSlot {
        intent: String,
        template: String,
        slot: String,
    },

    #[error("Intent {intent}: slot {slot} has undeclared type {type_name}")]
    UnknownType {
        intent: String,
        slot: String,
        type_name: String,
    },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LimitError {
    #[error("Intent {intent} expands to {cases} cases, limit is {limit}")]
    TooManyCases {
        intent: String,
        cases: u128,
        limit: usize,
    },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Reference error: {0}")]
    Reference(#[from] ReferenceError),

    #[error("Limit error: {0}")]
    Limit(#[from] LimitError),

    #[error("Debug error: {0}")]
    Debug(#[from] DebugError),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type InternalResult<T> = Result<T, Error>;

impl Error {
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Error::Internal(message.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Configuration(ConfigurationError::Json(e))
    }
}
