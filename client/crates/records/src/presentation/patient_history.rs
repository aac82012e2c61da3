//! Clinical History Page Controller
//!
//! A patient reads their own history; a doctor reads a patient's history
//! and adds or edits entries. Secretario is refused before any request.

use std::sync::Arc;

use auth::{Role, Session};
use kernel::id::{HistoryEntryId, PatientId};

use crate::application::Resource;
use crate::domain::entities::HistoryEntry;
use crate::domain::repository::{HistoryRepository, HistorySubject};
use crate::domain::value_objects::HistoryDraft;
use crate::error::{RecordsError, RecordsResult};
use crate::presentation::{FormStatus, bearer_for_role};

/// Entry form as typed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryForm {
    pub diagnosis: String,
    pub treatment: String,
    pub notes: String,
}

impl From<&HistoryEntry> for HistoryForm {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            diagnosis: entry.diagnosis.clone(),
            treatment: entry.treatment.clone().unwrap_or_default(),
            notes: entry.notes.clone().unwrap_or_default(),
        }
    }
}

pub struct PatientHistoryController<R: HistoryRepository> {
    repo: Arc<R>,
    subject: HistorySubject,
    pub entries: Resource<Vec<HistoryEntry>>,
    pub form: HistoryForm,
    editing: Option<HistoryEntryId>,
    status: FormStatus,
}

impl<R: HistoryRepository> PatientHistoryController<R> {
    pub fn new(repo: Arc<R>, subject: HistorySubject) -> Self {
        Self {
            repo,
            subject,
            entries: Resource::Idle,
            form: HistoryForm::default(),
            editing: None,
            status: FormStatus::default(),
        }
    }

    pub fn subject(&self) -> HistorySubject {
        self.subject
    }

    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    pub fn editing(&self) -> Option<HistoryEntryId> {
        self.editing
    }

    pub fn requires_reauth(&self) -> bool {
        self.entries.requires_reauth() || self.status.requires_reauth()
    }

    /// Whether `role` may read this history
    fn may_read(&self, role: Role) -> bool {
        match self.subject {
            HistorySubject::Own => role == Role::Paciente,
            HistorySubject::Patient(_) => role == Role::Medico,
        }
    }

    /// Whether the session may add or edit entries
    pub fn can_edit(&self, session: &Session) -> bool {
        matches!(self.subject, HistorySubject::Patient(_)) && session.role() == Some(Role::Medico)
    }

    pub async fn mount(&mut self, session: &Session) {
        self.refresh(session).await;
    }

    pub async fn refresh(&mut self, session: &Session) {
        let subject = self.subject;
        let repo = &self.repo;
        let allowed = |role: Role| role.can_view_clinical_history() && self.may_read(role);
        match bearer_for_role(session, allowed) {
            Ok(bearer) => self.entries.load(|| repo.list(bearer, subject)).await,
            Err(e) => self.entries.finish(Err(e)),
        }
    }

    /// Load an entry into the form for editing
    pub fn start_edit(&mut self, entry_id: HistoryEntryId) -> bool {
        let Some(entry) = self
            .entries
            .data()
            .and_then(|entries| entries.iter().find(|e| e.id == entry_id))
        else {
            return false;
        };
        self.form = HistoryForm::from(entry);
        self.editing = Some(entry_id);
        self.status.clear();
        true
    }

    pub fn cancel_edit(&mut self) {
        self.form = HistoryForm::default();
        self.editing = None;
        self.status.clear();
    }

    /// Create or update the entry in the form; `true` on success
    pub async fn save(&mut self, session: &Session) -> bool {
        if !self.status.begin() {
            return false;
        }

        let result = self.submit(session).await;
        match result {
            Ok(entry) => {
                let message = if self.editing.is_some() {
                    "Entrada actualizada"
                } else {
                    "Entrada agregada"
                };
                tracing::info!(entry_id = %entry.id, patient_id = %entry.patient_id, "History entry saved");
                self.form = HistoryForm::default();
                self.editing = None;
                self.status.succeed(message);
                self.refresh(session).await;
                true
            }
            Err(e) => {
                self.status.fail(e);
                false
            }
        }
    }

    async fn submit(&self, session: &Session) -> RecordsResult<HistoryEntry> {
        let HistorySubject::Patient(patient_id) = self.subject else {
            return Err(RecordsError::Forbidden(
                "El historial propio es de solo lectura".to_string(),
            ));
        };
        let bearer = bearer_for_role(session, |role| role == Role::Medico)?;
        let draft = HistoryDraft::new(&self.form.diagnosis, &self.form.treatment, &self.form.notes)?;

        match self.editing {
            Some(entry_id) => self.repo.update(bearer, patient_id, entry_id, &draft).await,
            None => self.repo.create(bearer, patient_id, &draft).await,
        }
    }

    /// The patient this history belongs to, when known
    pub fn patient_id(&self) -> Option<PatientId> {
        match self.subject {
            HistorySubject::Patient(id) => Some(id),
            HistorySubject::Own => None,
        }
    }
}
