//! Domain Value Objects
//!
//! Validated drafts and queries sent to the API, plus small enums.

use auth::Role;
use chrono::{DateTime, NaiveDate, Utc};
use derive_more::Display;
use kernel::id::DoctorId;
use serde::{Deserialize, Serialize};

use crate::domain::entities::UserAccount;
use crate::error::{RecordsError, RecordsResult};

/// Longest diagnosis accepted
pub const MAX_DIAGNOSIS_LENGTH: usize = 1000;

/// Longest treatment or notes text accepted
pub const MAX_CLINICAL_TEXT_LENGTH: usize = 2000;

/// Largest audit page the API serves
pub const MAX_AUDIT_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    #[display("Programada")]
    #[serde(alias = "programada")]
    Scheduled,
    #[display("Completada")]
    #[serde(alias = "completada")]
    Completed,
    #[display("Cancelada")]
    #[serde(alias = "cancelada", alias = "canceled")]
    Cancelled,
}

// ============================================================================
// Appointments
// ============================================================================

/// Appointment to book
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAppointment {
    pub doctor_id: DoctorId,
    pub scheduled_at: DateTime<Utc>,
    pub reason: String,
}

impl NewAppointment {
    /// Validate a booking as of `now`
    ///
    /// The time must be strictly in the future and the reason between 1
    /// and `max_reason_len` characters after trimming.
    pub fn new(
        doctor_id: Option<DoctorId>,
        scheduled_at: Option<DateTime<Utc>>,
        reason: &str,
        now: DateTime<Utc>,
        max_reason_len: usize,
    ) -> RecordsResult<Self> {
        let doctor_id =
            doctor_id.ok_or_else(|| RecordsError::invalid("doctor_id", "Seleccione un médico"))?;

        let scheduled_at = scheduled_at
            .ok_or_else(|| RecordsError::invalid("scheduled_at", "Indique fecha y hora"))?;
        if scheduled_at <= now {
            return Err(RecordsError::invalid(
                "scheduled_at",
                "La cita debe ser en el futuro",
            ));
        }

        let reason = reason.trim();
        if reason.is_empty() {
            return Err(RecordsError::invalid("reason", "Indique el motivo de la cita"));
        }
        if reason.chars().count() > max_reason_len {
            return Err(RecordsError::invalid(
                "reason",
                format!("El motivo no puede superar {max_reason_len} caracteres"),
            ));
        }

        Ok(Self {
            doctor_id,
            scheduled_at,
            reason: reason.to_string(),
        })
    }
}

// ============================================================================
// Clinical history
// ============================================================================

/// New or edited history entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryDraft {
    pub diagnosis: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treatment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl HistoryDraft {
    pub fn new(diagnosis: &str, treatment: &str, notes: &str) -> RecordsResult<Self> {
        let diagnosis = diagnosis.trim();
        if diagnosis.is_empty() {
            return Err(RecordsError::invalid("diagnosis", "El diagnóstico es obligatorio"));
        }
        if diagnosis.chars().count() > MAX_DIAGNOSIS_LENGTH {
            return Err(RecordsError::invalid(
                "diagnosis",
                format!("El diagnóstico no puede superar {MAX_DIAGNOSIS_LENGTH} caracteres"),
            ));
        }

        Ok(Self {
            diagnosis: diagnosis.to_string(),
            treatment: optional_text("treatment", treatment)?,
            notes: optional_text("notes", notes)?,
        })
    }
}

fn optional_text(field: &'static str, raw: &str) -> RecordsResult<Option<String>> {
    let value = raw.trim();
    if value.chars().count() > MAX_CLINICAL_TEXT_LENGTH {
        return Err(RecordsError::invalid(
            field,
            format!("No puede superar {MAX_CLINICAL_TEXT_LENGTH} caracteres"),
        ));
    }
    Ok((!value.is_empty()).then(|| value.to_string()))
}

// ============================================================================
// User management
// ============================================================================

/// Client-side filter over the user list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub role: Option<Role>,
    /// Matched case-insensitively against e-mail and full name
    pub text: String,
}

impl UserFilter {
    pub fn matches(&self, user: &UserAccount) -> bool {
        if self.role.is_some_and(|role| role != user.role) {
            return false;
        }
        let needle = self.text.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        user.email.to_lowercase().contains(&needle)
            || user
                .full_name
                .as_deref()
                .is_some_and(|n| n.to_lowercase().contains(&needle))
    }
}

// ============================================================================
// Audit logs
// ============================================================================

/// Validated audit-log query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditQuery {
    pub page: u32,
    pub page_size: u32,
    pub user: Option<String>,
    pub action: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl AuditQuery {
    pub fn new(
        page: u32,
        page_size: u32,
        user: &str,
        action: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> RecordsResult<Self> {
        if !(1..=MAX_AUDIT_PAGE_SIZE).contains(&page_size) {
            return Err(RecordsError::invalid(
                "page_size",
                format!("El tamaño de página debe estar entre 1 y {MAX_AUDIT_PAGE_SIZE}"),
            ));
        }
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(RecordsError::invalid(
                    "from",
                    "La fecha inicial no puede ser posterior a la final",
                ));
            }
        }

        let non_blank = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        };

        Ok(Self {
            page: page.max(1),
            page_size,
            user: non_blank(user),
            action: non_blank(action),
            from,
            to,
        })
    }

    /// Query-string pairs, unset filters omitted
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("page_size", self.page_size.to_string()),
        ];
        if let Some(user) = &self.user {
            pairs.push(("user", user.clone()));
        }
        if let Some(action) = &self.action {
            pairs.push(("action", action.clone()));
        }
        if let Some(from) = self.from {
            pairs.push(("from", from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = self.to {
            pairs.push(("to", to.format("%Y-%m-%d").to_string()));
        }
        pairs
    }
}
