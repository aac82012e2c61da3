//! Login Page Controller
//!
//! State behind the login page: three modes (password, face, one-time
//! code) with their own forms, one banner, a lockout flag and an
//! in-flight flag. Rendering is left to the caller; every submit returns
//! where to navigate, if anywhere.

use std::sync::Arc;

use derive_more::Display;
use platform::password::ClearTextPassword;
use platform::storage::DurableStorage;

use crate::application::session_store::SessionStore;
use crate::application::sign_in::{SignInOutcome, SignInUseCase};
use crate::domain::entity::PendingMfaChallenge;
use crate::domain::gateway::{AuthGateway, FaceCapture};
use crate::domain::value_object::{email::Email, otp_code::OtpCode};
use crate::error::{AuthError, AuthResult};
use crate::presentation::routes::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum LoginMode {
    #[default]
    #[display("Contraseña")]
    Password,
    #[display("Reconocimiento facial")]
    Face,
    #[display("Código de verificación")]
    Otp,
}

#[derive(Debug, Clone, Default)]
pub struct PasswordForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default)]
pub struct FaceForm {
    pub email: String,
    pub capture: Option<FaceCapture>,
}

#[derive(Debug, Clone, Default)]
pub struct OtpForm {
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    Info(String),
    Error(String),
}

/// A form field that failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

pub struct LoginController<G: AuthGateway> {
    sign_in: SignInUseCase<G>,
    mode: LoginMode,
    pub password_form: PasswordForm,
    pub face_form: FaceForm,
    pub otp_form: OtpForm,
    pending: Option<PendingMfaChallenge>,
    banner: Option<Banner>,
    field_error: Option<FieldError>,
    locked: bool,
    submitting: bool,
}

impl<G: AuthGateway> LoginController<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            sign_in: SignInUseCase::new(gateway),
            mode: LoginMode::default(),
            password_form: PasswordForm::default(),
            face_form: FaceForm::default(),
            otp_form: OtpForm::default(),
            pending: None,
            banner: None,
            field_error: None,
            locked: false,
            submitting: false,
        }
    }

    pub fn mode(&self) -> LoginMode {
        self.mode
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    pub fn field_error(&self) -> Option<&FieldError> {
        self.field_error.as_ref()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// E-mail awaiting a one-time code
    pub fn pending_email(&self) -> Option<&Email> {
        self.pending.as_ref().map(|p| &p.pending_email)
    }

    /// Whether the submit button is enabled
    pub fn can_submit(&self) -> bool {
        !self.locked && !self.submitting && (self.mode != LoginMode::Otp || self.pending.is_some())
    }

    /// Switch between the password and face tabs
    ///
    /// The OTP mode is only entered through a step-up answer; asking for
    /// it here is ignored.
    pub fn select_mode(&mut self, mode: LoginMode) {
        if mode == LoginMode::Otp || self.mode == LoginMode::Otp {
            return;
        }
        self.mode = mode;
        self.field_error = None;
    }

    /// Leave the OTP step, discarding the pending challenge
    pub fn back_to_credentials(&mut self) {
        self.pending = None;
        self.otp_form = OtpForm::default();
        self.mode = LoginMode::Password;
        self.banner = None;
        self.field_error = None;
    }

    pub async fn submit_password<S: DurableStorage>(
        &mut self,
        store: &mut SessionStore<S>,
    ) -> Option<Route> {
        if !self.begin_submit(LoginMode::Password) {
            return None;
        }
        let result = match self.password_credentials() {
            Ok((email, password)) => self
                .sign_in
                .with_password(store, &email, &password)
                .await
                .map(|outcome| (email, outcome)),
            Err(e) => Err(e),
        };
        self.submitting = false;
        self.finish_first_factor(result)
    }

    pub async fn submit_face<S: DurableStorage>(
        &mut self,
        store: &mut SessionStore<S>,
    ) -> Option<Route> {
        if !self.begin_submit(LoginMode::Face) {
            return None;
        }
        let result = match self.face_credentials() {
            Ok((email, capture)) => self
                .sign_in
                .with_face(store, &email, &capture)
                .await
                .map(|outcome| (email, outcome)),
            Err(e) => Err(e),
        };
        self.submitting = false;
        self.finish_first_factor(result)
    }

    /// Verify the typed code; failures keep the OTP form up
    pub async fn submit_otp<S: DurableStorage>(
        &mut self,
        store: &mut SessionStore<S>,
    ) -> Option<Route> {
        if !self.begin_submit(LoginMode::Otp) {
            return None;
        }
        let Some(challenge) = self.pending.clone() else {
            self.submitting = false;
            return None;
        };

        let result = match OtpCode::new(&self.otp_form.code) {
            Ok(code) => self.sign_in.verify_otp(store, &challenge, &code).await,
            Err(e) => Err(AuthError::InvalidField {
                field: "otp",
                message: e.message().to_string(),
            }),
        };
        self.submitting = false;

        match result {
            Ok(_) => {
                self.reset_after_login();
                Some(Route::Home)
            }
            Err(e) => {
                self.otp_form.code.clear();
                self.show_error(e);
                None
            }
        }
    }

    fn begin_submit(&mut self, mode: LoginMode) -> bool {
        if self.mode != mode || !self.can_submit() {
            tracing::debug!(mode = %mode, locked = self.locked, "Login submit ignored");
            return false;
        }
        self.submitting = true;
        self.banner = None;
        self.field_error = None;
        true
    }

    fn password_credentials(&self) -> AuthResult<(Email, ClearTextPassword)> {
        let email = parse_email(&self.password_form.email)?;
        let password = ClearTextPassword::for_login(self.password_form.password.clone()).map_err(
            |_| AuthError::InvalidField {
                field: "password",
                message: "La contraseña es obligatoria".to_string(),
            },
        )?;
        Ok((email, password))
    }

    fn face_credentials(&self) -> AuthResult<(Email, FaceCapture)> {
        let email = parse_email(&self.face_form.email)?;
        let capture = self.face_form.capture.clone().ok_or(AuthError::InvalidField {
            field: "face_image",
            message: "Capture una imagen de su rostro".to_string(),
        })?;
        Ok((email, capture))
    }

    fn finish_first_factor(&mut self, result: AuthResult<(Email, SignInOutcome)>) -> Option<Route> {
        match result {
            Ok((_, SignInOutcome::Authenticated(_))) => {
                self.reset_after_login();
                Some(Route::Home)
            }
            Ok((email, SignInOutcome::MfaRequired(challenge))) => {
                self.banner = Some(Banner::Info(format!(
                    "Ingrese el código de verificación enviado a {}",
                    email.as_str()
                )));
                self.pending = Some(challenge);
                self.otp_form = OtpForm::default();
                self.mode = LoginMode::Otp;
                None
            }
            Err(e) => {
                self.show_error(e);
                None
            }
        }
    }

    fn show_error(&mut self, err: AuthError) {
        match err {
            AuthError::InvalidField { field, message } => {
                self.field_error = Some(FieldError { field, message });
            }
            AuthError::AccountLocked { message, .. } => {
                self.locked = true;
                self.banner = Some(Banner::Error(message));
            }
            other => {
                self.banner = Some(Banner::Error(other.user_message()));
            }
        }
    }

    fn reset_after_login(&mut self) {
        self.password_form.password.clear();
        self.face_form.capture = None;
        self.otp_form = OtpForm::default();
        self.pending = None;
        self.banner = None;
        self.field_error = None;
        self.mode = LoginMode::Password;
    }
}

fn parse_email(raw: &str) -> AuthResult<Email> {
    Email::new(raw).map_err(|e| AuthError::InvalidField {
        field: "email",
        message: e.message().to_string(),
    })
}
