//! Platform Crate - Technical Infrastructure
//!
//! This crate provides the client's technical foundations:
//! - Client configuration (API base URL, storage location)
//! - Durable key/value storage (the browser-storage equivalent)
//! - HTTP transport to the Sirona API (reqwest) behind a trait seam
//! - base64url helpers for token payloads
//! - Password policy checks mirrored from the backend

pub mod config;
pub mod crypto;
pub mod password;
pub mod storage;
pub mod transport;
