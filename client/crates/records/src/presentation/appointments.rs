//! Appointments Page Controller
//!
//! Lists the caller's appointments and the bookable doctors, books new
//! appointments and cancels scheduled ones.

use std::sync::Arc;

use auth::Session;
use chrono::{DateTime, NaiveDateTime, Utc};
use kernel::id::{AppointmentId, DoctorId};

use crate::application::{RecordsConfig, Resource};
use crate::domain::entities::{Appointment, Doctor};
use crate::domain::repository::AppointmentRepository;
use crate::domain::value_objects::NewAppointment;
use crate::error::{RecordsError, RecordsResult};
use crate::presentation::{FormStatus, bearer_for};

/// Booking form as typed
#[derive(Debug, Clone, Default)]
pub struct AppointmentForm {
    pub doctor_id: Option<DoctorId>,
    /// `YYYY-MM-DDTHH:MM` (UTC) or RFC 3339
    pub scheduled_at: String,
    pub reason: String,
}

impl AppointmentForm {
    fn validate(&self, now: DateTime<Utc>, max_reason_len: usize) -> RecordsResult<NewAppointment> {
        let scheduled_at = match self.scheduled_at.trim() {
            "" => None,
            raw => Some(parse_datetime(raw).ok_or_else(|| {
                RecordsError::invalid("scheduled_at", "Fecha y hora inválidas")
            })?),
        };
        NewAppointment::new(self.doctor_id, scheduled_at, &self.reason, now, max_reason_len)
    }
}

fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"]
        .into_iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

pub struct AppointmentsController<R: AppointmentRepository> {
    repo: Arc<R>,
    config: RecordsConfig,
    pub appointments: Resource<Vec<Appointment>>,
    pub doctors: Resource<Vec<Doctor>>,
    pub form: AppointmentForm,
    status: FormStatus,
}

impl<R: AppointmentRepository> AppointmentsController<R> {
    pub fn new(repo: Arc<R>, config: RecordsConfig) -> Self {
        Self {
            repo,
            config,
            appointments: Resource::Idle,
            doctors: Resource::Idle,
            form: AppointmentForm::default(),
            status: FormStatus::default(),
        }
    }

    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    /// Any fetch or mutation was answered 401
    pub fn requires_reauth(&self) -> bool {
        self.appointments.requires_reauth()
            || self.doctors.requires_reauth()
            || self.status.requires_reauth()
    }

    /// Fetch appointments and doctors
    pub async fn mount(&mut self, session: &Session) {
        self.refresh(session).await;

        let repo = &self.repo;
        match bearer_for(session) {
            Ok(bearer) => self.doctors.load(|| repo.list_doctors(bearer)).await,
            Err(e) => self.doctors.finish(Err(e)),
        }
    }

    /// Fetch appointments again
    pub async fn refresh(&mut self, session: &Session) {
        let repo = &self.repo;
        match bearer_for(session) {
            Ok(bearer) => self.appointments.load(|| repo.list(bearer)).await,
            Err(e) => self.appointments.finish(Err(e)),
        }
    }

    pub fn doctor_name(&self, id: DoctorId) -> Option<&str> {
        self.doctors
            .data()?
            .iter()
            .find(|d| d.id == id)
            .map(|d| d.full_name.as_str())
    }

    /// Book the appointment in the form
    pub async fn schedule(&mut self, session: &Session) -> bool {
        self.schedule_at(session, Utc::now()).await
    }

    /// Book as of `now`; `true` on success
    pub async fn schedule_at(&mut self, session: &Session, now: DateTime<Utc>) -> bool {
        if !self.status.begin() {
            return false;
        }

        let result = match (
            bearer_for(session),
            self.form.validate(now, self.config.max_reason_len),
        ) {
            (Ok(bearer), Ok(draft)) => self.repo.create(bearer, &draft).await,
            (Err(e), _) | (_, Err(e)) => Err(e),
        };

        match result {
            Ok(created) => {
                tracing::info!(appointment_id = %created.id, "Appointment scheduled");
                self.form = AppointmentForm::default();
                self.status.succeed("Cita programada");
                self.refresh(session).await;
                true
            }
            Err(e) => {
                self.status.fail(e);
                false
            }
        }
    }

    /// Cancel a scheduled appointment; `true` on success
    pub async fn cancel(&mut self, session: &Session, id: AppointmentId) -> bool {
        if !self.status.begin() {
            return false;
        }

        let cancellable = self
            .appointments
            .data()
            .and_then(|list| list.iter().find(|a| a.id == id))
            .map(Appointment::can_cancel);

        let result = match (cancellable, bearer_for(session)) {
            (_, Err(e)) => Err(e),
            (None, _) => Err(RecordsError::NotFound("Cita no encontrada".to_string())),
            (Some(false), _) => Err(RecordsError::Validation(
                "Solo se pueden cancelar citas programadas".to_string(),
            )),
            (Some(true), Ok(bearer)) => self.repo.cancel(bearer, id).await,
        };

        match result {
            Ok(()) => {
                tracing::info!(appointment_id = %id, "Appointment cancelled");
                self.status.succeed("Cita cancelada");
                self.refresh(session).await;
                true
            }
            Err(e) => {
                self.status.fail(e);
                false
            }
        }
    }
}
