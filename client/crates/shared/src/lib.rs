//! Shared Kernel - vocabulary shared by every client crate
//!
//! This crate contains the "smallest core" the other crates agree on:
//! - The unified error type and result alias
//! - HTTP status classification of errors
//! - Typed identifiers for records returned by the API
//!
//! **Design Principle**: Only include things whose meaning is identical
//! for the session layer and for the page controllers.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
