//! Error taxonomy for the identity store.
//!
//! `IamError` carries the seven AWS-compatible kinds from the spec plus the
//! raw I/O and serialization variants the rest of the crate maps into them
//! (see `fsio::map_io_error`). Only `Io`/`Serialization` ever originate
//! directly from `?`; every other variant is constructed deliberately at a
//! decision point so the caller-facing AWS error code is always correct.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IamError {
    #[error("Access denied: {message}")]
    AccessDenied { message: String },

    #[error("Entity already exists: {entity}")]
    EntityAlreadyExists { entity: String },

    #[error("No such entity: {entity}")]
    NoSuchEntity { entity: String },

    #[error("Delete conflict: {reason}")]
    DeleteConflict { reason: String },

    #[error("Limit exceeded: {reason}")]
    LimitExceeded { reason: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Service failure: {0}")]
    ServiceFailure(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl IamError {
    /// The AWS exception code a caller-facing translation layer would render.
    pub fn aws_code(&self) -> &'static str {
        match self {
            IamError::AccessDenied { .. } => "AccessDeniedException",
            IamError::EntityAlreadyExists { .. } => "EntityAlreadyExists",
            IamError::NoSuchEntity { .. } => "NoSuchEntity",
            IamError::DeleteConflict { .. } => "DeleteConflict",
            IamError::LimitExceeded { .. } => "LimitExceeded",
            IamError::ValidationError { .. } => "ValidationError",
            IamError::ServiceFailure(_) => "ServiceFailure",
            IamError::Io(_) => "ServiceFailure",
            IamError::Serialization(_) => "ValidationError",
        }
    }

    pub fn access_denied(message: impl Into<String>) -> Self {
        IamError::AccessDenied {
            message: message.into(),
        }
    }

    pub fn no_such_entity(entity: impl Into<String>) -> Self {
        IamError::NoSuchEntity {
            entity: entity.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IamError>;
