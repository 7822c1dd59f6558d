use thiserror::Error;

use crate::pagination::PaginationError;
use crate::repository::errors::RepositoryError;

pub const INVALID_DATA: &str = "Dados inválidos";
pub const INVALID_PARAMETERS: &str = "Parâmetros inválidos";

/// Failures surfaced by the service layer. Each variant maps to one HTTP
/// status at the route boundary.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Rejected input. `details` lists one message per offending field.
    #[error("{message}")]
    Validation {
        message: String,
        details: Vec<String>,
    },

    /// The payload points at a parent row that does not exist.
    #[error("{0}")]
    InvalidReference(String),

    #[error("{0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn validation(details: Vec<String>) -> Self {
        ServiceError::Validation {
            message: INVALID_DATA.to_string(),
            details,
        }
    }

    /// Converts a repository failure, naming the missing entity on
    /// [`RepositoryError::NotFound`].
    pub fn from_repository(err: RepositoryError, not_found: &str) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound(not_found.to_string()),
            other => ServiceError::from(other),
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => {
                ServiceError::NotFound("Registro não encontrado".to_string())
            }
            RepositoryError::InvalidFilter(detail) => ServiceError::Validation {
                message: INVALID_PARAMETERS.to_string(),
                details: vec![detail],
            },
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

impl From<PaginationError> for ServiceError {
    fn from(err: PaginationError) -> Self {
        ServiceError::Validation {
            message: INVALID_PARAMETERS.to_string(),
            details: vec![err.to_string()],
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::Internal(format!("Failed to serialize response row: {err}"))
    }
}
