//! Service-layer error taxonomy and its HTTP mapping.

use bookstore_db::DbError;
use bookstore_http::error::AppError;
use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure of a catalog write operation.
///
/// Reads never use this for absence; a missing record is `Ok(None)`.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Caller data violates a creation precondition.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A record the operation depends on does not exist.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Persisted data breaks an internal invariant; not caused by the caller.
    #[error("integrity fault: {0}")]
    IntegrityFault(String),

    #[error(transparent)]
    Store(#[from] DbError),
}

impl ServiceError {
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::InvalidArgument(_) => "invalid_argument",
            ServiceError::InvalidState(_) => "invalid_state",
            ServiceError::IntegrityFault(_) => "integrity_fault",
            ServiceError::Store(_) => "store_error",
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        let code = err.code();
        match err {
            ServiceError::InvalidArgument(message) | ServiceError::InvalidState(message) => {
                AppError::bad_request_with_code(code, message)
            }
            other => AppError::Internal(anyhow::Error::new(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn client_errors_map_to_bad_request() {
        let err: AppError = ServiceError::InvalidArgument("id already set".into()).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err: AppError = ServiceError::InvalidState("author 9 not found".into()).into();
        assert!(matches!(err, AppError::BadRequest { ref code, .. } if code == "invalid_state"));
    }

    #[test]
    fn integrity_faults_map_to_internal_error() {
        let err: AppError = ServiceError::IntegrityFault("author has no id".into()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let err: AppError = ServiceError::Store(DbError::Poisoned).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
