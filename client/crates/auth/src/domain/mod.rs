//! Domain Layer
//!
//! Entities, value objects and the gateway trait the API implements.

pub mod entity;
pub mod gateway;
pub mod value_object;

// Re-exports
pub use entity::{PendingMfaChallenge, Session, UserSummary};
pub use gateway::AuthGateway;
