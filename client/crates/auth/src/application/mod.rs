//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod registration;
pub mod session_store;
pub mod sign_in;

// Re-exports
pub use config::AuthConfig;
pub use registration::{DoctorForm, PatientForm, RegisterUserUseCase};
pub use session_store::SessionStore;
pub use sign_in::{SignInOutcome, SignInUseCase};
