//! Repository Traits
//!
//! Interfaces to the records endpoints. Implementation is in the
//! infrastructure layer. Every call carries the session's bearer token.

use auth::BearerToken;
use kernel::id::{AppointmentId, HistoryEntryId, PatientId, UserAccountId};

use crate::domain::entities::{
    Appointment, AuditPage, Doctor, HistoryEntry, UserAccount,
};
use crate::domain::value_objects::{AuditQuery, HistoryDraft, NewAppointment};
use crate::error::RecordsResult;

/// Whose clinical history to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistorySubject {
    /// The logged-in patient
    Own,
    Patient(PatientId),
}

/// Appointment repository trait
#[trait_variant::make(AppointmentRepository: Send)]
pub trait LocalAppointmentRepository {
    /// Appointments visible to the caller's role
    async fn list(&self, bearer: &BearerToken) -> RecordsResult<Vec<Appointment>>;

    async fn list_doctors(&self, bearer: &BearerToken) -> RecordsResult<Vec<Doctor>>;

    async fn create(
        &self,
        bearer: &BearerToken,
        appointment: &NewAppointment,
    ) -> RecordsResult<Appointment>;

    async fn cancel(&self, bearer: &BearerToken, id: AppointmentId) -> RecordsResult<()>;
}

/// Clinical history repository trait
#[trait_variant::make(HistoryRepository: Send)]
pub trait LocalHistoryRepository {
    async fn list(
        &self,
        bearer: &BearerToken,
        subject: HistorySubject,
    ) -> RecordsResult<Vec<HistoryEntry>>;

    async fn create(
        &self,
        bearer: &BearerToken,
        patient_id: PatientId,
        draft: &HistoryDraft,
    ) -> RecordsResult<HistoryEntry>;

    async fn update(
        &self,
        bearer: &BearerToken,
        patient_id: PatientId,
        entry_id: HistoryEntryId,
        draft: &HistoryDraft,
    ) -> RecordsResult<HistoryEntry>;
}

/// User account repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    async fn list(&self, bearer: &BearerToken) -> RecordsResult<Vec<UserAccount>>;

    /// Activate or deactivate an account
    async fn set_active(
        &self,
        bearer: &BearerToken,
        id: UserAccountId,
        active: bool,
    ) -> RecordsResult<()>;
}

/// Audit log repository trait
#[trait_variant::make(AuditLogRepository: Send)]
pub trait LocalAuditLogRepository {
    async fn page(&self, bearer: &BearerToken, query: &AuditQuery) -> RecordsResult<AuditPage>;
}
