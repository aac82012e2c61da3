//! Domain Entities
//!
//! Records as the API returns them. The client never creates these on its
//! own; it only reads them and sends drafts back.

use auth::Role;
use chrono::{DateTime, Utc};
use kernel::id::{AppointmentId, AuditEntryId, DoctorId, HistoryEntryId, PatientId, UserAccountId};
use serde::Deserialize;

use crate::domain::value_objects::AppointmentStatus;

/// Appointment entity
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub doctor_id: DoctorId,
    #[serde(default)]
    pub doctor_name: Option<String>,
    #[serde(default)]
    pub patient_id: Option<PatientId>,
    #[serde(default)]
    pub patient_name: Option<String>,
    pub scheduled_at: DateTime<Utc>,
    #[serde(default)]
    pub reason: String,
    pub status: AppointmentStatus,
}

impl Appointment {
    /// Only scheduled appointments can be cancelled
    pub fn can_cancel(&self) -> bool {
        self.status == AppointmentStatus::Scheduled
    }

    pub fn is_upcoming_at(&self, now: DateTime<Utc>) -> bool {
        self.can_cancel() && self.scheduled_at > now
    }
}

/// Doctor offered when scheduling
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Doctor {
    pub id: DoctorId,
    pub full_name: String,
    #[serde(default)]
    pub specialty: Option<String>,
}

/// One entry of a patient's clinical history
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HistoryEntry {
    pub id: HistoryEntryId,
    pub patient_id: PatientId,
    pub diagnosis: String,
    #[serde(default)]
    pub treatment: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub doctor_name: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Account listed in user management
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserAccount {
    pub id: UserAccountId,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub role: Role,
    pub is_active: bool,
}

impl UserAccount {
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.email)
    }
}

/// One audit-log line
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuditEntry {
    pub id: AuditEntryId,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub user_email: Option<String>,
    pub action: String,
    #[serde(default)]
    pub resource: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
}

/// A page of audit entries
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuditPage {
    #[serde(alias = "items", alias = "logs")]
    pub entries: Vec<AuditEntry>,
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
}

impl AuditPage {
    pub fn total_pages(&self) -> u32 {
        if self.page_size == 0 {
            return 0;
        }
        let pages = self.total.div_ceil(u64::from(self.page_size));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}
