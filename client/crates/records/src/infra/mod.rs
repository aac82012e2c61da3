//! Infrastructure Layer
//!
//! HTTP implementation of the records repositories.

pub mod http;

pub use self::http::HttpRecordsApi;
