//! Page controller scenarios over in-memory repositories

#[cfg(test)]
mod support {
    use std::sync::Mutex;

    use auth::{AuthConfig, BearerToken, Role, Session, SessionStore};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use kernel::id::{AppointmentId, HistoryEntryId, PatientId, UserAccountId};
    use platform::storage::MemoryStorage;

    use crate::domain::entities::{
        Appointment, AuditEntry, AuditPage, Doctor, HistoryEntry, UserAccount,
    };
    use crate::domain::repository::{
        AppointmentRepository, AuditLogRepository, HistoryRepository, HistorySubject,
        UserRepository,
    };
    use crate::domain::value_objects::{
        AppointmentStatus, AuditQuery, HistoryDraft, NewAppointment,
    };
    use crate::error::{RecordsError, RecordsResult};

    pub const ADMIN_EMAIL: &str = "admin@sirona.test";

    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    pub fn session(role: Role, email: &str) -> Session {
        let mut store = SessionStore::new(MemoryStorage::new(), &AuthConfig::default());
        store
            .login(email, BearerToken::new("h.p.s"), Some(role), None)
            .unwrap()
            .clone()
    }

    /// Every repository backed by plain vectors
    #[derive(Default)]
    pub struct InMemoryRecords {
        pub appointments: Mutex<Vec<Appointment>>,
        pub doctors: Mutex<Vec<Doctor>>,
        pub history: Mutex<Vec<HistoryEntry>>,
        pub users: Mutex<Vec<UserAccount>>,
        pub audit: Mutex<Vec<AuditEntry>>,
        pub calls: Mutex<Vec<String>>,
        /// Status the next call fails with
        pub fail_next: Mutex<Option<u16>>,
    }

    impl InMemoryRecords {
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: &str) -> RecordsResult<()> {
            self.calls.lock().unwrap().push(call.to_string());
            match self.fail_next.lock().unwrap().take() {
                None => Ok(()),
                Some(401) => Err(RecordsError::Unauthorized("Token expirado".into())),
                Some(409) => Err(RecordsError::Conflict("Horario no disponible".into())),
                Some(status) => Err(RecordsError::Api {
                    status,
                    message: "Error del servidor".into(),
                }),
            }
        }

        pub fn with_doctor(self, name: &str) -> Self {
            self.doctors.lock().unwrap().push(Doctor {
                id: kernel::id::DoctorId::new(),
                full_name: name.to_string(),
                specialty: Some("Medicina general".into()),
            });
            self
        }

        pub fn with_appointment(self, status: AppointmentStatus) -> (Self, AppointmentId) {
            let id = AppointmentId::new();
            self.appointments.lock().unwrap().push(Appointment {
                id,
                doctor_id: kernel::id::DoctorId::new(),
                doctor_name: None,
                patient_id: None,
                patient_name: None,
                scheduled_at: now() + Duration::days(1),
                reason: "Control".into(),
                status,
            });
            (self, id)
        }

        pub fn with_history(self, patient_id: PatientId, diagnosis: &str) -> (Self, HistoryEntryId) {
            let id = HistoryEntryId::new();
            self.history.lock().unwrap().push(HistoryEntry {
                id,
                patient_id,
                diagnosis: diagnosis.to_string(),
                treatment: None,
                notes: None,
                doctor_name: None,
                created_at: now(),
                updated_at: None,
            });
            (self, id)
        }

        pub fn with_user(self, email: &str, role: Role) -> (Self, UserAccountId) {
            let id = UserAccountId::new();
            self.users.lock().unwrap().push(UserAccount {
                id,
                email: email.to_string(),
                full_name: None,
                role,
                is_active: true,
            });
            (self, id)
        }

        pub fn with_audit_entries(self, count: usize) -> Self {
            {
                let mut audit = self.audit.lock().unwrap();
                for i in 0..count {
                    audit.push(AuditEntry {
                        id: kernel::id::AuditEntryId::new(),
                        timestamp: now() - Duration::minutes(i as i64),
                        user_email: Some(ADMIN_EMAIL.into()),
                        action: if i % 2 == 0 { "LOGIN" } else { "VIEW_HISTORY" }.into(),
                        resource: None,
                        details: None,
                        ip_address: None,
                    });
                }
            }
            self
        }
    }

    impl AppointmentRepository for InMemoryRecords {
        async fn list(&self, _bearer: &BearerToken) -> RecordsResult<Vec<Appointment>> {
            self.record("appointments.list")?;
            Ok(self.appointments.lock().unwrap().clone())
        }

        async fn list_doctors(&self, _bearer: &BearerToken) -> RecordsResult<Vec<Doctor>> {
            self.record("doctors.list")?;
            Ok(self.doctors.lock().unwrap().clone())
        }

        async fn create(
            &self,
            _bearer: &BearerToken,
            draft: &NewAppointment,
        ) -> RecordsResult<Appointment> {
            self.record("appointments.create")?;
            let appointment = Appointment {
                id: AppointmentId::new(),
                doctor_id: draft.doctor_id,
                doctor_name: None,
                patient_id: None,
                patient_name: None,
                scheduled_at: draft.scheduled_at,
                reason: draft.reason.clone(),
                status: AppointmentStatus::Scheduled,
            };
            self.appointments.lock().unwrap().push(appointment.clone());
            Ok(appointment)
        }

        async fn cancel(&self, _bearer: &BearerToken, id: AppointmentId) -> RecordsResult<()> {
            self.record("appointments.cancel")?;
            let mut appointments = self.appointments.lock().unwrap();
            match appointments.iter_mut().find(|a| a.id == id) {
                Some(a) => {
                    a.status = AppointmentStatus::Cancelled;
                    Ok(())
                }
                None => Err(RecordsError::NotFound("Cita no encontrada".into())),
            }
        }
    }

    impl HistoryRepository for InMemoryRecords {
        async fn list(
            &self,
            _bearer: &BearerToken,
            subject: HistorySubject,
        ) -> RecordsResult<Vec<HistoryEntry>> {
            self.record("history.list")?;
            let history = self.history.lock().unwrap();
            Ok(match subject {
                HistorySubject::Own => history.clone(),
                HistorySubject::Patient(id) => {
                    history.iter().filter(|e| e.patient_id == id).cloned().collect()
                }
            })
        }

        async fn create(
            &self,
            _bearer: &BearerToken,
            patient_id: PatientId,
            draft: &HistoryDraft,
        ) -> RecordsResult<HistoryEntry> {
            self.record("history.create")?;
            let entry = HistoryEntry {
                id: HistoryEntryId::new(),
                patient_id,
                diagnosis: draft.diagnosis.clone(),
                treatment: draft.treatment.clone(),
                notes: draft.notes.clone(),
                doctor_name: None,
                created_at: now(),
                updated_at: None,
            };
            self.history.lock().unwrap().push(entry.clone());
            Ok(entry)
        }

        async fn update(
            &self,
            _bearer: &BearerToken,
            _patient_id: PatientId,
            entry_id: HistoryEntryId,
            draft: &HistoryDraft,
        ) -> RecordsResult<HistoryEntry> {
            self.record("history.update")?;
            let mut history = self.history.lock().unwrap();
            let entry = history
                .iter_mut()
                .find(|e| e.id == entry_id)
                .ok_or_else(|| RecordsError::NotFound("Entrada no encontrada".into()))?;
            entry.diagnosis = draft.diagnosis.clone();
            entry.treatment = draft.treatment.clone();
            entry.notes = draft.notes.clone();
            entry.updated_at = Some(now());
            Ok(entry.clone())
        }
    }

    impl UserRepository for InMemoryRecords {
        async fn list(&self, _bearer: &BearerToken) -> RecordsResult<Vec<UserAccount>> {
            self.record("users.list")?;
            Ok(self.users.lock().unwrap().clone())
        }

        async fn set_active(
            &self,
            _bearer: &BearerToken,
            id: UserAccountId,
            active: bool,
        ) -> RecordsResult<()> {
            self.record("users.set_active")?;
            if let Some(user) = self.users.lock().unwrap().iter_mut().find(|u| u.id == id) {
                user.is_active = active;
            }
            Ok(())
        }
    }

    impl AuditLogRepository for InMemoryRecords {
        async fn page(&self, _bearer: &BearerToken, query: &AuditQuery) -> RecordsResult<AuditPage> {
            self.record("audit.page")?;
            let matching: Vec<AuditEntry> = self
                .audit
                .lock()
                .unwrap()
                .iter()
                .filter(|e| query.action.as_deref().is_none_or(|a| e.action == a))
                .cloned()
                .collect();
            let start = ((query.page - 1) * query.page_size) as usize;
            Ok(AuditPage {
                total: matching.len() as u64,
                entries: matching
                    .into_iter()
                    .skip(start)
                    .take(query.page_size as usize)
                    .collect(),
                page: query.page,
                page_size: query.page_size,
            })
        }
    }
}

#[cfg(test)]
mod appointment_scenarios {
    use std::sync::Arc;

    use auth::Role;
    use chrono::Duration;
    use kernel::error::kind::ErrorKind;

    use super::support::*;
    use crate::application::RecordsConfig;
    use crate::domain::value_objects::AppointmentStatus;
    use crate::presentation::{AppointmentsController, Notice};

    #[tokio::test]
    async fn test_mount_loads_appointments_and_doctors() {
        let (repo, _) = InMemoryRecords::default()
            .with_doctor("Dra. Elena García")
            .with_appointment(AppointmentStatus::Scheduled);
        let repo = Arc::new(repo);
        let mut page = AppointmentsController::new(repo.clone(), RecordsConfig::default());
        assert!(page.appointments.is_idle());

        page.mount(&session(Role::Paciente, "ana@sirona.test")).await;

        assert_eq!(page.appointments.data().map(Vec::len), Some(1));
        let doctor = page.doctors.data().unwrap()[0].clone();
        assert_eq!(page.doctor_name(doctor.id), Some("Dra. Elena García"));
        assert_eq!(repo.calls(), ["appointments.list", "doctors.list"]);
    }

    #[tokio::test]
    async fn test_schedule_then_refetch() {
        let repo = Arc::new(InMemoryRecords::default().with_doctor("Dr. Mario Ruiz"));
        let session = session(Role::Paciente, "ana@sirona.test");
        let mut page = AppointmentsController::new(repo.clone(), RecordsConfig::default());
        page.mount(&session).await;

        page.form.doctor_id = page.doctors.data().map(|d| d[0].id);
        page.form.scheduled_at = (now() + Duration::days(2)).format("%Y-%m-%dT%H:%M").to_string();
        page.form.reason = "Dolor de espalda".into();

        assert!(page.schedule_at(&session, now()).await);
        assert_eq!(
            page.status().notice(),
            Some(&Notice::Success("Cita programada".into()))
        );
        assert_eq!(page.appointments.data().map(Vec::len), Some(1));
        assert!(page.form.reason.is_empty());
        assert_eq!(
            repo.calls(),
            ["appointments.list", "doctors.list", "appointments.create", "appointments.list"]
        );
    }

    #[tokio::test]
    async fn test_past_time_is_rejected_locally() {
        let repo = Arc::new(InMemoryRecords::default().with_doctor("Dr. Mario Ruiz"));
        let session = session(Role::Paciente, "ana@sirona.test");
        let mut page = AppointmentsController::new(repo.clone(), RecordsConfig::default());
        page.mount(&session).await;

        page.form.doctor_id = page.doctors.data().map(|d| d[0].id);
        page.form.scheduled_at = "2026-02-28T09:00".into();
        page.form.reason = "Control".into();

        assert!(!page.schedule_at(&session, now()).await);
        assert_eq!(
            page.status().field_error().map(|f| f.field),
            Some("scheduled_at")
        );
        assert!(!repo.calls().contains(&"appointments.create".to_string()));
        assert!(!page.status().is_submitting());
    }

    #[tokio::test]
    async fn test_conflict_is_shown_inline() {
        let repo = Arc::new(InMemoryRecords::default().with_doctor("Dr. Mario Ruiz"));
        let session = session(Role::Paciente, "ana@sirona.test");
        let mut page = AppointmentsController::new(repo.clone(), RecordsConfig::default());
        page.mount(&session).await;

        page.form.doctor_id = page.doctors.data().map(|d| d[0].id);
        page.form.scheduled_at = "2026-03-05T10:00".into();
        page.form.reason = "Control".into();
        *repo.fail_next.lock().unwrap() = Some(409);

        assert!(!page.schedule_at(&session, now()).await);
        assert_eq!(
            page.status().notice(),
            Some(&Notice::Error("Horario no disponible".into()))
        );
        assert_eq!(page.form.reason, "Control");
    }

    #[tokio::test]
    async fn test_only_scheduled_can_be_cancelled() {
        let (repo, scheduled) =
            InMemoryRecords::default().with_appointment(AppointmentStatus::Scheduled);
        let (repo, completed) = repo.with_appointment(AppointmentStatus::Completed);
        let repo = Arc::new(repo);
        let session = session(Role::Paciente, "ana@sirona.test");
        let mut page = AppointmentsController::new(repo.clone(), RecordsConfig::default());
        page.mount(&session).await;

        assert!(!page.cancel(&session, completed).await);
        assert!(!repo.calls().contains(&"appointments.cancel".to_string()));

        assert!(page.cancel(&session, scheduled).await);
        let cancelled = page
            .appointments
            .data()
            .unwrap()
            .iter()
            .find(|a| a.id == scheduled)
            .unwrap()
            .status;
        assert_eq!(cancelled, AppointmentStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_expired_session_asks_for_reauth() {
        let repo = Arc::new(InMemoryRecords::default());
        *repo.fail_next.lock().unwrap() = Some(401);
        let mut page = AppointmentsController::new(repo, RecordsConfig::default());

        page.mount(&session(Role::Medico, "dr@sirona.test")).await;

        assert!(page.requires_reauth());
        assert_eq!(
            page.appointments.error().map(|e| e.kind()),
            Some(ErrorKind::Unauthorized)
        );
    }

    #[tokio::test]
    async fn test_anonymous_session_never_calls_the_api() {
        let repo = Arc::new(InMemoryRecords::default());
        let mut page = AppointmentsController::new(repo.clone(), RecordsConfig::default());

        page.mount(&auth::Session::anonymous()).await;

        assert!(page.requires_reauth());
        assert!(repo.calls().is_empty());
    }
}

#[cfg(test)]
mod history_scenarios {
    use std::sync::Arc;

    use auth::Role;
    use kernel::error::kind::ErrorKind;
    use kernel::id::PatientId;

    use super::support::*;
    use crate::domain::repository::HistorySubject;
    use crate::presentation::PatientHistoryController;

    #[tokio::test]
    async fn test_secretary_is_refused_before_any_request() {
        let patient = PatientId::new();
        let (repo, _) = InMemoryRecords::default().with_history(patient, "Asma");
        let repo = Arc::new(repo);
        let mut page = PatientHistoryController::new(repo.clone(), HistorySubject::Patient(patient));

        page.mount(&session(Role::Secretario, "recepcion@sirona.test")).await;

        assert_eq!(
            page.entries.error().map(|e| e.kind()),
            Some(ErrorKind::Forbidden)
        );
        assert!(repo.calls().is_empty());
    }

    #[tokio::test]
    async fn test_doctor_adds_and_edits_entries() {
        let patient = PatientId::new();
        let (repo, existing) = InMemoryRecords::default().with_history(patient, "Asma");
        let repo = Arc::new(repo);
        let doctor = session(Role::Medico, "dr@sirona.test");
        let mut page = PatientHistoryController::new(repo.clone(), HistorySubject::Patient(patient));

        page.mount(&doctor).await;
        assert!(page.can_edit(&doctor));
        assert_eq!(page.entries.data().map(Vec::len), Some(1));

        page.form.diagnosis = "Rinitis alérgica".into();
        page.form.treatment = "Antihistamínicos".into();
        assert!(page.save(&doctor).await);
        assert_eq!(page.entries.data().map(Vec::len), Some(2));

        assert!(page.start_edit(existing));
        assert_eq!(page.form.diagnosis, "Asma");
        page.form.notes = "Revisar en primavera".into();
        assert!(page.save(&doctor).await);
        assert_eq!(page.editing(), None);

        let edited = page
            .entries
            .data()
            .unwrap()
            .iter()
            .find(|e| e.id == existing)
            .cloned()
            .unwrap();
        assert_eq!(edited.notes.as_deref(), Some("Revisar en primavera"));
        assert!(edited.updated_at.is_some());
        assert_eq!(
            repo.calls(),
            [
                "history.list",
                "history.create",
                "history.list",
                "history.update",
                "history.list"
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_diagnosis_is_rejected_locally() {
        let patient = PatientId::new();
        let repo = Arc::new(InMemoryRecords::default());
        let doctor = session(Role::Medico, "dr@sirona.test");
        let mut page = PatientHistoryController::new(repo.clone(), HistorySubject::Patient(patient));
        page.mount(&doctor).await;

        page.form.diagnosis = "   ".into();
        assert!(!page.save(&doctor).await);
        assert_eq!(page.status().field_error().map(|f| f.field), Some("diagnosis"));
        assert_eq!(repo.calls(), ["history.list"]);
    }

    #[tokio::test]
    async fn test_patient_reads_own_history_only() {
        let (repo, _) = InMemoryRecords::default().with_history(PatientId::new(), "Gripe");
        let repo = Arc::new(repo);
        let patient = session(Role::Paciente, "ana@sirona.test");
        let mut page = PatientHistoryController::new(repo.clone(), HistorySubject::Own);

        page.mount(&patient).await;
        assert_eq!(page.entries.data().map(Vec::len), Some(1));
        assert!(!page.can_edit(&patient));

        page.form.diagnosis = "Autodiagnóstico".into();
        assert!(!page.save(&patient).await);
        assert_eq!(repo.calls(), ["history.list"]);

        let mut other = PatientHistoryController::new(repo, HistorySubject::Patient(PatientId::new()));
        other.mount(&patient).await;
        assert_eq!(
            other.entries.error().map(|e| e.kind()),
            Some(ErrorKind::Forbidden)
        );
    }
}

#[cfg(test)]
mod user_management_scenarios {
    use std::sync::Arc;

    use auth::{HttpAuthGateway, Role};
    use kernel::error::kind::ErrorKind;
    use kernel::id::UserAccountId;
    use platform::transport::testing::RecordingTransport;
    use serde_json::json;

    use super::support::*;
    use crate::presentation::{Notice, UserManagementController};

    type Page = UserManagementController<InMemoryRecords, HttpAuthGateway<Arc<RecordingTransport>>>;

    fn page(repo: Arc<InMemoryRecords>, transport: &Arc<RecordingTransport>) -> Page {
        UserManagementController::new(repo, Arc::new(HttpAuthGateway::new(transport.clone())))
    }

    /// Repository with an admin, a doctor and a patient; returns the first two ids
    fn seeded() -> (Arc<InMemoryRecords>, UserAccountId, UserAccountId) {
        let (repo, admin) = InMemoryRecords::default().with_user(ADMIN_EMAIL, Role::Administrador);
        let (repo, doctor) = repo.with_user("dr.ruiz@sirona.test", Role::Medico);
        let (repo, _) = repo.with_user("ana@sirona.test", Role::Paciente);
        (Arc::new(repo), admin, doctor)
    }

    #[tokio::test]
    async fn test_admin_filters_users_locally() {
        let (repo, _, _) = seeded();
        let transport = Arc::new(RecordingTransport::new());
        let mut page = page(repo.clone(), &transport);
        page.mount(&session(Role::Administrador, ADMIN_EMAIL)).await;

        assert_eq!(page.visible_users().len(), 3);
        page.filter.role = Some(Role::Medico);
        assert_eq!(page.visible_users()[0].email, "dr.ruiz@sirona.test");
        page.filter.role = None;
        page.filter.text = "ANA".into();
        assert_eq!(page.visible_users().len(), 1);
        assert_eq!(page.count_by_role(Role::Paciente), 1);
        assert_eq!(repo.calls(), ["users.list"]);
    }

    #[tokio::test]
    async fn test_admin_cannot_deactivate_self() {
        let (repo, admin, doctor) = seeded();
        let transport = Arc::new(RecordingTransport::new());
        let session = session(Role::Administrador, ADMIN_EMAIL);
        let mut page = page(repo.clone(), &transport);
        page.mount(&session).await;

        assert!(!page.set_active(&session, admin, false).await);
        assert_eq!(
            page.status().notice(),
            Some(&Notice::Error("No puede desactivar su propia cuenta".into()))
        );
        assert!(!repo.calls().contains(&"users.set_active".to_string()));

        assert!(page.set_active(&session, doctor, false).await);
        let deactivated = page
            .users
            .data()
            .unwrap()
            .iter()
            .find(|u| u.id == doctor)
            .map(|u| u.is_active);
        assert_eq!(deactivated, Some(false));
    }

    #[tokio::test]
    async fn test_non_admin_is_refused() {
        let (repo, _, _) = seeded();
        let transport = Arc::new(RecordingTransport::new());
        let mut page = page(repo.clone(), &transport);
        page.mount(&session(Role::Secretario, "recepcion@sirona.test")).await;

        assert_eq!(page.users.error().map(|e| e.kind()), Some(ErrorKind::Forbidden));
        assert!(repo.calls().is_empty());
    }

    #[tokio::test]
    async fn test_registration_reloads_the_list() {
        let (repo, _, _) = seeded();
        let transport = Arc::new(RecordingTransport::new());
        transport.respond(201, json!({"email": "lucia@sirona.test", "role": "Paciente"}));
        let session = session(Role::Administrador, ADMIN_EMAIL);
        let mut page = page(repo.clone(), &transport);
        page.mount(&session).await;

        page.registration.patient_form.email = "lucia@sirona.test".into();
        page.registration.patient_form.password = "paciente2024".into();
        page.registration.patient_form.full_name = "Lucía Pérez".into();
        page.registration.patient_form.birth_date = "1990-05-17".into();
        page.registration.patient_form.document_id = "12345678Z".into();

        assert!(page.register_patient(&session).await);
        assert_eq!(
            page.registration.last_created().map(|c| c.role),
            Some(Role::Paciente)
        );
        assert_eq!(repo.calls(), ["users.list", "users.list"]);
        assert_eq!(
            transport.last_request().unwrap().path,
            "/api/users/patients"
        );
    }

    #[tokio::test]
    async fn test_registration_field_errors_stay_local() {
        let (repo, _, _) = seeded();
        let transport = Arc::new(RecordingTransport::new());
        let session = session(Role::Administrador, ADMIN_EMAIL);
        let mut page = page(repo, &transport);

        page.registration.doctor_form.email = "no-es-correo".into();
        assert!(!page.register_doctor(&session).await);
        assert_eq!(
            page.registration.status().field_error().map(|f| f.field),
            Some("email")
        );
        assert!(transport.requests().is_empty());
    }
}

#[cfg(test)]
mod audit_scenarios {
    use std::sync::Arc;

    use auth::Role;

    use super::support::*;
    use crate::application::RecordsConfig;
    use crate::presentation::AuditLogsController;

    fn config() -> RecordsConfig {
        RecordsConfig {
            audit_page_size: 10,
            ..RecordsConfig::default()
        }
    }

    #[tokio::test]
    async fn test_pages_forward_and_back() {
        let repo = Arc::new(InMemoryRecords::default().with_audit_entries(25));
        let admin = session(Role::Administrador, ADMIN_EMAIL);
        let mut page = AuditLogsController::new(repo.clone(), &config());

        page.mount(&admin).await;
        assert_eq!(page.current_page(), 1);
        assert_eq!(page.page.data().map(|p| p.entries.len()), Some(10));

        assert!(page.next_page(&admin).await);
        assert!(page.next_page(&admin).await);
        assert_eq!(page.current_page(), 3);
        assert_eq!(page.page.data().map(|p| p.entries.len()), Some(5));
        assert!(!page.next_page(&admin).await);

        assert!(page.previous_page(&admin).await);
        assert_eq!(page.current_page(), 2);
        assert_eq!(repo.calls().len(), 4);
    }

    #[tokio::test]
    async fn test_filter_restarts_at_first_page() {
        let repo = Arc::new(InMemoryRecords::default().with_audit_entries(25));
        let admin = session(Role::Administrador, ADMIN_EMAIL);
        let mut page = AuditLogsController::new(repo, &config());
        page.mount(&admin).await;
        page.next_page(&admin).await;

        page.filter.action = "LOGIN".into();
        assert!(page.apply_filter(&admin).await);
        assert_eq!(page.current_page(), 1);
        assert_eq!(page.page.data().map(|p| p.total), Some(13));
    }

    #[tokio::test]
    async fn test_inverted_range_never_reaches_the_api() {
        let repo = Arc::new(InMemoryRecords::default());
        let admin = session(Role::Administrador, ADMIN_EMAIL);
        let mut page = AuditLogsController::new(repo.clone(), &config());

        page.filter.from = "2026-02-10".into();
        page.filter.to = "2026-02-01".into();
        assert!(!page.apply_filter(&admin).await);
        assert_eq!(page.status().field_error().map(|f| f.field), Some("from"));
        assert!(repo.calls().is_empty());

        assert!(!page.set_page_size(&admin, 500).await);
        assert_eq!(page.page_size(), 10);
    }

    #[tokio::test]
    async fn test_doctors_cannot_read_the_audit_log() {
        let repo = Arc::new(InMemoryRecords::default().with_audit_entries(3));
        let mut page = AuditLogsController::new(repo.clone(), &config());

        page.mount(&session(Role::Medico, "dr@sirona.test")).await;

        assert!(page.page.error().is_some());
        assert!(repo.calls().is_empty());
    }
}
