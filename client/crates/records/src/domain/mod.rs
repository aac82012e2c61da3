//! Domain Layer
//!
//! Records entities, validated drafts and repository traits.

pub mod entities;
pub mod repository;
pub mod value_objects;

pub use entities::{Appointment, AuditEntry, AuditPage, Doctor, HistoryEntry, UserAccount};
pub use repository::{
    AppointmentRepository, AuditLogRepository, HistoryRepository, HistorySubject, UserRepository,
};
pub use value_objects::{AppointmentStatus, AuditQuery, HistoryDraft, NewAppointment, UserFilter};
