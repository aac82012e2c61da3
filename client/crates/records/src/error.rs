//! Records Error Types
//!
//! This module provides records-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use auth::AuthError;
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::transport::TransportError;
use thiserror::Error;

/// Records-specific result type alias
pub type RecordsResult<T> = Result<T, RecordsError>;

/// Records-specific error variants
#[derive(Debug, Error)]
pub enum RecordsError {
    /// A form field failed client-side validation
    #[error("{message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },

    /// No authenticated session to act on behalf of
    #[error("Inicie sesión para continuar")]
    NotSignedIn,

    /// The API rejected the token (401)
    #[error("{0}")]
    Unauthorized(String),

    /// The role may not perform this operation (403 or local check)
    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    /// E.g. the doctor is already booked at that time (409)
    #[error("{0}")]
    Conflict(String),

    /// The API rejected the payload (400/422)
    #[error("{0}")]
    Validation(String),

    /// Any other non-2xx status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// A 2xx response whose body did not have the expected shape
    #[error("Unexpected response from server: {0}")]
    UnexpectedResponse(String),

    #[error("Could not reach the server: {0}")]
    Transport(#[from] TransportError),

    /// Registration through the auth gateway failed
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RecordsError {
    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        RecordsError::InvalidField {
            field,
            message: message.into(),
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            RecordsError::InvalidField { .. } | RecordsError::Validation(_) => {
                ErrorKind::BadRequest
            }
            RecordsError::NotSignedIn | RecordsError::Unauthorized(_) => ErrorKind::Unauthorized,
            RecordsError::Forbidden(_) => ErrorKind::Forbidden,
            RecordsError::NotFound(_) => ErrorKind::NotFound,
            RecordsError::Conflict(_) => ErrorKind::Conflict,
            RecordsError::Api { status, .. } => ErrorKind::from_status_code(*status),
            RecordsError::UnexpectedResponse(_) => ErrorKind::BadGateway,
            RecordsError::Transport(e) if e.is_timeout() => ErrorKind::RequestTimeout,
            RecordsError::Transport(_) => ErrorKind::ServiceUnavailable,
            RecordsError::Auth(e) => e.kind(),
            RecordsError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Text for the page's error banner
    pub fn user_message(&self) -> String {
        match self {
            RecordsError::Transport(_) => {
                "No se pudo conectar con el servidor. Intente de nuevo.".to_string()
            }
            RecordsError::UnexpectedResponse(_) => "Respuesta inesperada del servidor.".to_string(),
            RecordsError::Internal(_) => "Ocurrió un error inesperado.".to_string(),
            RecordsError::Api { message, .. } => message.clone(),
            RecordsError::Auth(e) => e.user_message(),
            other => other.to_string(),
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        let err = AppError::new(self.kind(), self.user_message());
        match self {
            RecordsError::NotSignedIn | RecordsError::Unauthorized(_) => {
                err.with_action("Vuelva a iniciar sesión")
            }
            RecordsError::Transport(_) => err.with_action("Verifique su conexión"),
            _ => err,
        }
    }

    /// Log the error with appropriate level
    pub(crate) fn log(&self) {
        match self {
            RecordsError::Transport(e) => {
                tracing::warn!(error = %e, "Records request failed");
            }
            RecordsError::UnexpectedResponse(msg) | RecordsError::Internal(msg) => {
                tracing::error!(message = %msg, "Records internal error");
            }
            RecordsError::Unauthorized(_) => {
                tracing::info!("Records request rejected: session no longer valid");
            }
            RecordsError::Api { status, .. } if *status >= 500 => {
                tracing::warn!(status, "Records API server error");
            }
            _ => {
                tracing::debug!(error = %self, "Records error");
            }
        }
    }
}

impl From<RecordsError> for AppError {
    fn from(err: RecordsError) -> Self {
        err.to_app_error()
    }
}

impl From<serde_json::Error> for RecordsError {
    fn from(err: serde_json::Error) -> Self {
        RecordsError::Internal(format!("Could not encode request: {err}"))
    }
}
