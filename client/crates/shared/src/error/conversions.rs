//! Conversions from foreign errors
//!
//! Local I/O fails while reading or writing the stored token; JSON fails
//! when an API payload does not decode. A payload that cannot be decoded
//! is the server's fault, so it maps to `BadGateway`.

use super::app_error::AppError;
use super::kind::ErrorKind;

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        use std::io::ErrorKind as Io;

        let kind = match err.kind() {
            Io::TimedOut => ErrorKind::RequestTimeout,
            Io::ConnectionRefused | Io::ConnectionReset | Io::ConnectionAborted => {
                ErrorKind::BadGateway
            }
            _ => ErrorKind::InternalServerError,
        };
        AppError::new(kind, "No se pudo acceder al almacenamiento local").with_source(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            serde_json::error::Category::Io => AppError::internal("Error interno").with_source(err),
            _ => AppError::bad_gateway("Respuesta inesperada del servidor").with_source(err),
        }
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::bad_request("Identificador inválido").with_source(err)
    }
}
