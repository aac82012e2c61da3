//! Presentation Layer
//!
//! Page controllers for appointments, clinical history, registration,
//! user management and audit logs. Each keeps its lists in a
//! [`Resource`](crate::application::Resource) and its forms in plain
//! fields; a view layer renders them.

pub mod appointments;
pub mod audit_logs;
pub mod patient_history;
pub mod registration;
pub mod user_management;

use auth::presentation::FieldError;
use auth::{AuthError, BearerToken, Role, Session};
use kernel::error::kind::ErrorKind;

use crate::error::{RecordsError, RecordsResult};

pub use appointments::{AppointmentForm, AppointmentsController};
pub use audit_logs::{AuditFilterForm, AuditLogsController};
pub use patient_history::{HistoryForm, PatientHistoryController};
pub use registration::RegistrationController;
pub use user_management::UserManagementController;

/// Outcome message shown above a form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

/// Submission state shared by every form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormStatus {
    field_error: Option<FieldError>,
    notice: Option<Notice>,
    submitting: bool,
    reauth_required: bool,
}

impl FormStatus {
    pub fn field_error(&self) -> Option<&FieldError> {
        self.field_error.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// A mutation was answered 401
    pub fn requires_reauth(&self) -> bool {
        self.reauth_required
    }

    /// Start a submission; `false` while one is already running
    pub(crate) fn begin(&mut self) -> bool {
        if self.submitting {
            return false;
        }
        self.submitting = true;
        self.field_error = None;
        self.notice = None;
        true
    }

    pub(crate) fn succeed(&mut self, message: impl Into<String>) {
        self.submitting = false;
        self.notice = Some(Notice::Success(message.into()));
    }

    pub(crate) fn fail(&mut self, err: RecordsError) {
        self.submitting = false;
        if err.kind() == ErrorKind::Unauthorized {
            self.reauth_required = true;
        }
        match err {
            RecordsError::InvalidField { field, message }
            | RecordsError::Auth(AuthError::InvalidField { field, message }) => {
                self.field_error = Some(FieldError { field, message });
            }
            other => {
                self.notice = Some(Notice::Error(other.user_message()));
            }
        }
    }

    pub(crate) fn clear(&mut self) {
        self.field_error = None;
        self.notice = None;
    }
}

/// Token of an authenticated session
pub(crate) fn bearer_for(session: &Session) -> RecordsResult<&BearerToken> {
    match session.token() {
        Some(token) if session.is_authenticated() => Ok(token),
        _ => Err(RecordsError::NotSignedIn),
    }
}

/// Token of a session whose role passes `allowed`
pub(crate) fn bearer_for_role(
    session: &Session,
    allowed: impl Fn(Role) -> bool,
) -> RecordsResult<&BearerToken> {
    let token = bearer_for(session)?;
    match session.role() {
        Some(role) if allowed(role) => Ok(token),
        role => {
            tracing::warn!(role = ?role, "Records operation refused for role");
            Err(RecordsError::Forbidden(
                "No tiene permisos para esta sección".to_string(),
            ))
        }
    }
}
