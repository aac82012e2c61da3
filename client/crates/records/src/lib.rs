//! Records (Medical Records) Client Module
//!
//! Clean Architecture structure:
//! - `domain/` - Appointments, clinical history, accounts, audit entries, repository traits
//! - `application/` - Resource loader and configuration
//! - `infra/` - HTTP implementation of the repositories
//! - `presentation/` - Page controllers
//!
//! ## Features
//! - Appointment booking and cancellation
//! - Clinical history reading and editing
//! - Account activation and registration for administrators
//! - Paged, filtered audit log
//!
//! ## Security Model
//! - Role checks run before any request and again on the API
//! - Clinical history is never fetched for Secretario or Administrador
//! - A 401 on any page surfaces as `requires_reauth()` so the caller logs out

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::{RecordsConfig, Resource};
pub use error::{RecordsError, RecordsResult};
pub use infra::http::HttpRecordsApi;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entities::*;
    pub use crate::domain::value_objects::*;
}

pub mod controllers {
    pub use crate::presentation::*;
}

#[cfg(test)]
mod tests;
