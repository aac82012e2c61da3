//! HTTP Records API
//!
//! One client implementing every records repository over an
//! [`ApiTransport`].

use auth::BearerToken;
use kernel::id::{AppointmentId, HistoryEntryId, PatientId, UserAccountId};
use platform::transport::{ApiRequest, ApiResponse, ApiTransport, ErrorBody};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Appointment, AuditPage, Doctor, HistoryEntry, UserAccount};
use crate::domain::repository::{
    AppointmentRepository, AuditLogRepository, HistoryRepository, HistorySubject, UserRepository,
};
use crate::domain::value_objects::{AuditQuery, HistoryDraft, NewAppointment};
use crate::error::{RecordsError, RecordsResult};

const APPOINTMENTS_PATH: &str = "/api/appointments";
const DOCTORS_PATH: &str = "/api/doctors";
const USERS_PATH: &str = "/api/users";
const AUDIT_LOGS_PATH: &str = "/api/audit-logs";

fn history_path(subject: HistorySubject) -> String {
    match subject {
        HistorySubject::Own => "/api/patients/me/history".to_string(),
        HistorySubject::Patient(id) => format!("/api/patients/{id}/history"),
    }
}

/// Lists arrive bare or wrapped in `{"data": [...]}`
#[derive(Deserialize)]
#[serde(untagged)]
enum ListBody<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
}

impl<T> From<ListBody<T>> for Vec<T> {
    fn from(body: ListBody<T>) -> Self {
        match body {
            ListBody::Bare(items) | ListBody::Wrapped { data: items } => items,
        }
    }
}

#[derive(Serialize)]
struct StatusBody {
    is_active: bool,
}

/// HTTP-backed records client
#[derive(Debug, Clone)]
pub struct HttpRecordsApi<T: ApiTransport> {
    transport: T,
}

impl<T: ApiTransport + Sync> HttpRecordsApi<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    async fn send(&self, request: ApiRequest) -> RecordsResult<ApiResponse> {
        let method = request.method.clone();
        let path = request.path.clone();
        let response = self.transport.send(request).await?;
        if response.is_success() {
            return Ok(response);
        }
        tracing::debug!(method = %method, path = %path, status = response.status, "Records request rejected");
        let err = error_from_response(&response);
        err.log();
        Err(err)
    }

    async fn fetch<R: DeserializeOwned>(&self, request: ApiRequest) -> RecordsResult<R> {
        self.send(request)
            .await?
            .json()
            .map_err(|e| RecordsError::UnexpectedResponse(e.to_string()))
    }

    async fn fetch_list<R: DeserializeOwned>(&self, request: ApiRequest) -> RecordsResult<Vec<R>> {
        self.fetch::<ListBody<R>>(request).await.map(Vec::from)
    }
}

impl<T: ApiTransport + Sync> AppointmentRepository for HttpRecordsApi<T> {
    async fn list(&self, bearer: &BearerToken) -> RecordsResult<Vec<Appointment>> {
        self.fetch_list(ApiRequest::get(APPOINTMENTS_PATH).bearer(bearer.as_str()))
            .await
    }

    async fn list_doctors(&self, bearer: &BearerToken) -> RecordsResult<Vec<Doctor>> {
        self.fetch_list(ApiRequest::get(DOCTORS_PATH).bearer(bearer.as_str()))
            .await
    }

    async fn create(
        &self,
        bearer: &BearerToken,
        appointment: &NewAppointment,
    ) -> RecordsResult<Appointment> {
        let request = ApiRequest::post(APPOINTMENTS_PATH)
            .bearer(bearer.as_str())
            .json(appointment)?;
        self.fetch(request).await
    }

    async fn cancel(&self, bearer: &BearerToken, id: AppointmentId) -> RecordsResult<()> {
        let request =
            ApiRequest::post(format!("{APPOINTMENTS_PATH}/{id}/cancel")).bearer(bearer.as_str());
        self.send(request).await.map(|_| ())
    }
}

impl<T: ApiTransport + Sync> HistoryRepository for HttpRecordsApi<T> {
    async fn list(
        &self,
        bearer: &BearerToken,
        subject: HistorySubject,
    ) -> RecordsResult<Vec<HistoryEntry>> {
        self.fetch_list(ApiRequest::get(history_path(subject)).bearer(bearer.as_str()))
            .await
    }

    async fn create(
        &self,
        bearer: &BearerToken,
        patient_id: PatientId,
        draft: &HistoryDraft,
    ) -> RecordsResult<HistoryEntry> {
        let request = ApiRequest::post(history_path(HistorySubject::Patient(patient_id)))
            .bearer(bearer.as_str())
            .json(draft)?;
        self.fetch(request).await
    }

    async fn update(
        &self,
        bearer: &BearerToken,
        patient_id: PatientId,
        entry_id: HistoryEntryId,
        draft: &HistoryDraft,
    ) -> RecordsResult<HistoryEntry> {
        let path = format!(
            "{}/{entry_id}",
            history_path(HistorySubject::Patient(patient_id))
        );
        let request = ApiRequest::put(path).bearer(bearer.as_str()).json(draft)?;
        self.fetch(request).await
    }
}

impl<T: ApiTransport + Sync> UserRepository for HttpRecordsApi<T> {
    async fn list(&self, bearer: &BearerToken) -> RecordsResult<Vec<UserAccount>> {
        self.fetch_list(ApiRequest::get(USERS_PATH).bearer(bearer.as_str()))
            .await
    }

    async fn set_active(
        &self,
        bearer: &BearerToken,
        id: UserAccountId,
        active: bool,
    ) -> RecordsResult<()> {
        let request = ApiRequest::patch(format!("{USERS_PATH}/{id}/status"))
            .bearer(bearer.as_str())
            .json(&StatusBody { is_active: active })?;
        self.send(request).await.map(|_| ())
    }
}

impl<T: ApiTransport + Sync> AuditLogRepository for HttpRecordsApi<T> {
    async fn page(&self, bearer: &BearerToken, query: &AuditQuery) -> RecordsResult<AuditPage> {
        let request = query
            .to_pairs()
            .into_iter()
            .fold(
                ApiRequest::get(AUDIT_LOGS_PATH).bearer(bearer.as_str()),
                |request, (key, value)| request.query(key, value),
            );
        self.fetch(request).await
    }
}

/// Map a non-2xx response onto a [`RecordsError`]
pub fn error_from_response(response: &ApiResponse) -> RecordsError {
    let text = ErrorBody::from_response(response)
        .text()
        .map(str::to_string);

    match response.status {
        401 => RecordsError::Unauthorized(
            text.unwrap_or_else(|| "Su sesión ha expirado".to_string()),
        ),
        403 => RecordsError::Forbidden(
            text.unwrap_or_else(|| "No tiene permisos para esta acción".to_string()),
        ),
        404 => RecordsError::NotFound(
            text.unwrap_or_else(|| "Registro no encontrado".to_string()),
        ),
        409 => RecordsError::Conflict(
            text.unwrap_or_else(|| "El registro entra en conflicto con otro".to_string()),
        ),
        400 | 422 => RecordsError::Validation(
            text.unwrap_or_else(|| "Datos inválidos".to_string()),
        ),
        status => RecordsError::Api {
            status,
            message: text.unwrap_or_else(|| format!("Error del servidor ({status})")),
        },
    }
}
