//! Infrastructure Layer
//!
//! HTTP implementation of the auth gateway.

pub mod http;

pub use self::http::HttpAuthGateway;
