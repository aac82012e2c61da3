//! Sign In Use Case
//!
//! Runs a password, face or one-time-code login against the gateway and
//! records the result in the session store.

use std::sync::Arc;

use platform::password::ClearTextPassword;
use platform::storage::DurableStorage;

use crate::application::session_store::SessionStore;
use crate::domain::entity::{PendingMfaChallenge, Session};
use crate::domain::gateway::{AuthGateway, FaceCapture, LoginResponse};
use crate::domain::value_object::{email::Email, otp_code::OtpCode};
use crate::error::{AuthError, AuthResult};

/// What a first-factor login ended in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInOutcome {
    /// Session is authenticated
    Authenticated(Session),
    /// A one-time code must be verified for this e-mail
    MfaRequired(PendingMfaChallenge),
}

/// Sign in use case
pub struct SignInUseCase<G: AuthGateway> {
    gateway: Arc<G>,
}

impl<G: AuthGateway> SignInUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    pub async fn with_password<S: DurableStorage>(
        &self,
        store: &mut SessionStore<S>,
        email: &Email,
        password: &ClearTextPassword,
    ) -> AuthResult<SignInOutcome> {
        let response = self
            .gateway
            .login(email, password)
            .await
            .inspect_err(AuthError::log)?;
        complete_first_factor(store, email, response)
    }

    pub async fn with_face<S: DurableStorage>(
        &self,
        store: &mut SessionStore<S>,
        email: &Email,
        image: &FaceCapture,
    ) -> AuthResult<SignInOutcome> {
        let response = self
            .gateway
            .login_with_face(email, image)
            .await
            .inspect_err(AuthError::log)?;
        complete_first_factor(store, email, response)
    }

    /// Finish a pending challenge
    ///
    /// A rejected code leaves the session untouched; the caller may retry
    /// with the same challenge.
    pub async fn verify_otp<S: DurableStorage>(
        &self,
        store: &mut SessionStore<S>,
        challenge: &PendingMfaChallenge,
        code: &OtpCode,
    ) -> AuthResult<Session> {
        let email = &challenge.pending_email;
        let verified = self
            .gateway
            .verify_otp(email, code)
            .await
            .inspect_err(AuthError::log)?;

        let session = store.login(email.as_str(), verified.token, Some(verified.role), None)?;
        Ok(session.clone())
    }
}

fn complete_first_factor<S: DurableStorage>(
    store: &mut SessionStore<S>,
    email: &Email,
    response: LoginResponse,
) -> AuthResult<SignInOutcome> {
    if response.requires_mfa {
        tracing::info!(email = %email.as_str(), "Login requires a one-time code");
        return Ok(SignInOutcome::MfaRequired(PendingMfaChallenge {
            pending_email: email.clone(),
        }));
    }

    let Some(token) = response.token else {
        let err = AuthError::UnexpectedResponse("login succeeded without a token".to_string());
        err.log();
        return Err(err);
    };

    let user = response.user.unwrap_or_default();
    let name = user.name.or(user.full_name);
    let session = store.login(email.as_str(), token, response.role, name)?;
    Ok(SignInOutcome::Authenticated(session.clone()))
}
