use thiserror::Error;

use crate::devdocs::DevDocsError;

/// Raised when a value object rejects its raw input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

/// Errors surfaced by the manager to the protocol layer.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{message}: {source}")]
    BadRequest {
        message: String,
        #[source]
        source: ValidationError,
    },

    #[error("{message}: {source}")]
    Internal {
        message: String,
        #[source]
        source: DevDocsError,
    },
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn internal(message: impl Into<String>, source: DevDocsError) -> Self {
        Self::Internal {
            message: message.into(),
            source,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::BadRequest { .. } => "BAD_REQUEST",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(source: ValidationError) -> Self {
        Self::BadRequest {
            message: "validation error".to_string(),
            source,
        }
    }
}
