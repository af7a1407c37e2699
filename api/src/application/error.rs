use crate::domain::validation::ValidationError;

/// Failure of a use case, classified so the HTTP layer can pick status and ret code.
#[derive(thiserror::Error, Debug)]
pub enum ServiceError {
    #[error("missing parameter: {0}")]
    MissingParam(String),
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Duplicate(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("wrong password")]
    WrongPassword,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::Missing(field) => ServiceError::MissingParam(field.to_string()),
            ValidationError::Invalid(msg) => ServiceError::InvalidInput(msg),
        }
    }
}

impl ServiceError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        ServiceError::NotFound(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        ServiceError::Forbidden(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        ServiceError::InvalidInput(msg.into())
    }
}
