//! Registration Page Controller
//!
//! Doctor and patient sign-up forms for Secretario and Administrador.

use std::sync::Arc;

use auth::application::{DoctorForm, PatientForm, RegisterUserUseCase};
use auth::models::CreatedUser;
use auth::{AuthGateway, Session};

use crate::presentation::FormStatus;

pub struct RegistrationController<G: AuthGateway> {
    use_case: RegisterUserUseCase<G>,
    pub doctor_form: DoctorForm,
    pub patient_form: PatientForm,
    last_created: Option<CreatedUser>,
    status: FormStatus,
}

impl<G: AuthGateway> RegistrationController<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            use_case: RegisterUserUseCase::new(gateway),
            doctor_form: DoctorForm::default(),
            patient_form: PatientForm::default(),
            last_created: None,
            status: FormStatus::default(),
        }
    }

    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    pub fn last_created(&self) -> Option<&CreatedUser> {
        self.last_created.as_ref()
    }

    /// `true` on success; the form is cleared
    pub async fn register_doctor(&mut self, session: &Session) -> bool {
        if !self.status.begin() {
            return false;
        }
        match self.use_case.register_doctor(session, &self.doctor_form).await {
            Ok(created) => {
                self.doctor_form = DoctorForm::default();
                self.status
                    .succeed(format!("Médico registrado: {}", created.email));
                self.last_created = Some(created);
                true
            }
            Err(e) => {
                self.status.fail(e.into());
                false
            }
        }
    }

    /// `true` on success; the form is cleared
    pub async fn register_patient(&mut self, session: &Session) -> bool {
        if !self.status.begin() {
            return false;
        }
        match self.use_case.register_patient(session, &self.patient_form).await {
            Ok(created) => {
                self.patient_form = PatientForm::default();
                self.status
                    .succeed(format!("Paciente registrado: {}", created.email));
                self.last_created = Some(created);
                true
            }
            Err(e) => {
                self.status.fail(e.into());
                false
            }
        }
    }
}
