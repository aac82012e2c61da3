//! Register User Use Case
//!
//! Validates doctor/patient registration forms and forwards them to the
//! API on behalf of a Secretario or Administrador session.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use platform::password::{ClearTextPassword, PasswordPolicyError};

use crate::domain::entity::session::Session;
use crate::domain::gateway::{AuthGateway, CreatedUser, DoctorRegistration, PatientRegistration};
use crate::domain::value_object::{email::Email, token::BearerToken};
use crate::error::{AuthError, AuthResult};

/// Longest accepted free-text field
const MAX_TEXT_LENGTH: usize = 200;

/// Doctor registration form as typed
#[derive(Debug, Clone, Default)]
pub struct DoctorForm {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub specialty: String,
    pub license_number: String,
    pub phone: String,
}

/// Patient registration form as typed
#[derive(Debug, Clone, Default)]
pub struct PatientForm {
    pub email: String,
    pub password: String,
    pub full_name: String,
    /// `YYYY-MM-DD`
    pub birth_date: String,
    pub document_id: String,
    pub phone: String,
}

impl DoctorForm {
    pub fn validate(&self) -> AuthResult<DoctorRegistration> {
        Ok(DoctorRegistration {
            email: parse_email(&self.email)?,
            password: parse_password(&self.password)?,
            full_name: required("full_name", &self.full_name, "El nombre completo es obligatorio")?,
            specialty: required("specialty", &self.specialty, "La especialidad es obligatoria")?,
            license_number: required(
                "license_number",
                &self.license_number,
                "El número de colegiado es obligatorio",
            )?,
            phone: optional(&self.phone),
        })
    }
}

impl PatientForm {
    pub fn validate(&self) -> AuthResult<PatientRegistration> {
        self.validate_on(Utc::now().date_naive())
    }

    /// Validate with `today` as the latest acceptable birth date
    pub fn validate_on(&self, today: NaiveDate) -> AuthResult<PatientRegistration> {
        let email = parse_email(&self.email)?;
        let password = parse_password(&self.password)?;
        let full_name = required("full_name", &self.full_name, "El nombre completo es obligatorio")?;

        let birth_date = NaiveDate::parse_from_str(self.birth_date.trim(), "%Y-%m-%d")
            .map_err(|_| invalid("birth_date", "Fecha de nacimiento inválida"))?;
        if birth_date > today {
            return Err(invalid(
                "birth_date",
                "La fecha de nacimiento no puede estar en el futuro",
            ));
        }

        let document_id = required("document_id", &self.document_id, "El documento es obligatorio")?;

        Ok(PatientRegistration {
            email,
            password,
            full_name,
            birth_date,
            document_id,
            phone: optional(&self.phone),
        })
    }
}

fn invalid(field: &'static str, message: impl Into<String>) -> AuthError {
    AuthError::InvalidField {
        field,
        message: message.into(),
    }
}

fn parse_email(raw: &str) -> AuthResult<Email> {
    Email::new(raw).map_err(|e| invalid("email", e.message()))
}

fn parse_password(raw: &str) -> AuthResult<ClearTextPassword> {
    ClearTextPassword::new(raw.to_string()).map_err(|e| invalid("password", password_message(&e)))
}

fn password_message(err: &PasswordPolicyError) -> String {
    match err {
        PasswordPolicyError::TooShort { min, .. } => {
            format!("La contraseña debe tener al menos {min} caracteres")
        }
        PasswordPolicyError::TooLong { max, .. } => {
            format!("La contraseña no puede superar {max} caracteres")
        }
        PasswordPolicyError::EmptyOrWhitespace => "La contraseña es obligatoria".to_string(),
        PasswordPolicyError::InvalidCharacter => {
            "La contraseña contiene caracteres no válidos".to_string()
        }
        PasswordPolicyError::MissingLetter => {
            "La contraseña debe contener al menos una letra".to_string()
        }
        PasswordPolicyError::MissingDigit => {
            "La contraseña debe contener al menos un número".to_string()
        }
    }
}

fn required(field: &'static str, raw: &str, message: &str) -> AuthResult<String> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(invalid(field, message));
    }
    if value.chars().count() > MAX_TEXT_LENGTH {
        return Err(invalid(
            field,
            format!("No puede superar {MAX_TEXT_LENGTH} caracteres"),
        ));
    }
    Ok(value.to_string())
}

fn optional(raw: &str) -> Option<String> {
    let value = raw.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Register user use case
pub struct RegisterUserUseCase<G: AuthGateway> {
    gateway: Arc<G>,
}

impl<G: AuthGateway> RegisterUserUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    pub async fn register_doctor(
        &self,
        session: &Session,
        form: &DoctorForm,
    ) -> AuthResult<CreatedUser> {
        let bearer = registrar_token(session)?;
        let registration = form.validate()?;

        let created = self
            .gateway
            .register_doctor(bearer, &registration)
            .await
            .inspect_err(AuthError::log)?;
        tracing::info!(email = %created.email, role = %created.role, "Doctor registered");
        Ok(created)
    }

    pub async fn register_patient(
        &self,
        session: &Session,
        form: &PatientForm,
    ) -> AuthResult<CreatedUser> {
        let bearer = registrar_token(session)?;
        let registration = form.validate()?;

        let created = self
            .gateway
            .register_patient(bearer, &registration)
            .await
            .inspect_err(AuthError::log)?;
        tracing::info!(email = %created.email, role = %created.role, "Patient registered");
        Ok(created)
    }
}

/// Token of a session allowed to create accounts
fn registrar_token(session: &Session) -> AuthResult<&BearerToken> {
    match (session.role(), session.token()) {
        (Some(role), Some(token)) if role.can_register_users() => Ok(token),
        (Some(role), _) => {
            tracing::warn!(role = %role, "Registration refused for role");
            Err(AuthError::Forbidden(
                "No tiene permisos para registrar usuarios".to_string(),
            ))
        }
        _ => Err(AuthError::InvalidCredentials(
            "Inicie sesión para continuar".to_string(),
        )),
    }
}
