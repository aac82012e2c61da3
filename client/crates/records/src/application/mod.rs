//! Application Layer
//!
//! Controller configuration and the shared resource loader.

pub mod config;
pub mod resource;

pub use config::RecordsConfig;
pub use resource::Resource;
