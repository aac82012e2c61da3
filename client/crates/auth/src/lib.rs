//! Auth (Authentication) Client Module
//!
//! Clean Architecture structure:
//! - `domain/` - Session, roles, token codec, gateway trait
//! - `application/` - Session store and use cases
//! - `infra/` - HTTP gateway over the platform transport
//! - `presentation/` - Routes, route guard, navigation, login controller
//!
//! ## Features
//! - Password and face login with optional one-time-code step-up
//! - Session restored from the stored bearer token on start-up
//! - Role-based page access (Médico, Paciente, Secretario, Administrador)
//! - Doctor and patient registration for front-desk staff
//!
//! ## Security Model
//! - Token claims are decoded without verification and treated as hints
//! - Only the raw token is persisted
//! - Clinical history pages are never rendered for Secretario
//! - Tokens, passwords and codes never appear in logs

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::session_store::SessionStore;
pub use domain::entity::{PendingMfaChallenge, Session, UserSummary};
pub use domain::gateway::AuthGateway;
pub use domain::value_object::{email::Email, role::Role, token::BearerToken};
pub use error::{AuthError, AuthResult};
pub use infra::http::HttpAuthGateway;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::gateway::{
        CreatedUser, DoctorRegistration, FaceCapture, LoginResponse, LoginUser, OtpVerification,
        PatientRegistration,
    };
    pub use crate::domain::value_object::*;
}

pub mod guard {
    pub use crate::presentation::navigation::*;
    pub use crate::presentation::route_guard::*;
    pub use crate::presentation::routes::*;
}
