//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::storage::StorageError;
use platform::transport::TransportError;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
///
/// Messages that originate from the API are carried verbatim; the login
/// page shows them as-is.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong credentials or rejected one-time code
    #[error("{0}")]
    InvalidCredentials(String),

    /// Account locked after too many failed attempts
    #[error("{message}")]
    AccountLocked {
        message: String,
        locked_until: Option<String>,
    },

    /// A form field failed client-side validation
    #[error("{message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },

    /// The API rejected the payload (400/422)
    #[error("{0}")]
    Validation(String),

    /// The API refused the operation for this role (403)
    #[error("{0}")]
    Forbidden(String),

    /// The resource already exists, e.g. an e-mail already registered (409)
    #[error("{0}")]
    Conflict(String),

    /// Neither the login response nor the token carried a role
    #[error("Session has no role")]
    MissingRole,

    /// Any other non-2xx status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// A 2xx response whose body did not have the expected shape
    #[error("Unexpected response from server: {0}")]
    UnexpectedResponse(String),

    /// The request never produced a response
    #[error("Could not reach the server: {0}")]
    Transport(#[from] TransportError),

    /// Durable storage failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidCredentials(_) => ErrorKind::Unauthorized,
            AuthError::AccountLocked { .. } => ErrorKind::Locked,
            AuthError::InvalidField { .. } | AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::Forbidden(_) => ErrorKind::Forbidden,
            AuthError::Conflict(_) => ErrorKind::Conflict,
            AuthError::MissingRole | AuthError::UnexpectedResponse(_) => ErrorKind::BadGateway,
            AuthError::Api { status, .. } => ErrorKind::from_status_code(*status),
            AuthError::Transport(e) if e.is_timeout() => ErrorKind::RequestTimeout,
            AuthError::Transport(_) => ErrorKind::ServiceUnavailable,
            AuthError::Storage(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Text for the login banner or the form
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Transport(_) => {
                "No se pudo conectar con el servidor. Intente de nuevo.".to_string()
            }
            AuthError::Storage(_) | AuthError::Internal(_) => {
                "Ocurrió un error inesperado.".to_string()
            }
            AuthError::MissingRole | AuthError::UnexpectedResponse(_) => {
                "Respuesta inesperada del servidor.".to_string()
            }
            AuthError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        let err = AppError::new(self.kind(), self.user_message());
        match self {
            AuthError::AccountLocked {
                locked_until: Some(until),
                ..
            } => err.with_action(format!("Intente de nuevo en {}", until)),
            AuthError::Transport(_) => err.with_action("Verifique su conexión"),
            _ => err,
        }
    }

    /// Log the error with appropriate level
    pub(crate) fn log(&self) {
        match self {
            AuthError::Transport(e) => {
                tracing::warn!(error = %e, "Auth request failed");
            }
            AuthError::Storage(e) => {
                tracing::error!(error = %e, "Auth storage error");
            }
            AuthError::Internal(msg) | AuthError::UnexpectedResponse(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::AccountLocked { locked_until, .. } => {
                tracing::warn!(locked_until = ?locked_until, "Login rejected: account locked");
            }
            AuthError::InvalidCredentials(_) => {
                tracing::info!("Login rejected: invalid credentials");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        err.to_app_error()
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(err: serde_json::Error) -> Self {
        AuthError::Internal(format!("Could not encode request: {err}"))
    }
}
