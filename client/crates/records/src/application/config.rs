//! Application Configuration
//!
//! Configuration for the records page controllers.

/// Records application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordsConfig {
    /// Entries per audit-log page (1..=100)
    pub audit_page_size: u32,
    /// Longest appointment reason accepted
    pub max_reason_len: usize,
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self {
            audit_page_size: 20,
            max_reason_len: 500,
        }
    }
}
