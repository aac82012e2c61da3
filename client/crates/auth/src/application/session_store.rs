//! Session Store
//!
//! Single owner of the in-memory session. The only durable state is the
//! raw bearer token under one storage key; everything else is rebuilt
//! from the token's claims on start-up.
//!
//! Restoring a session never calls the API. A revoked token is therefore
//! treated as valid until the first authorized request answers 401, at
//! which point the caller logs out.

use chrono::{DateTime, Utc};
use platform::storage::DurableStorage;

use crate::application::config::AuthConfig;
use crate::domain::entity::{session::Session, user_summary::UserSummary};
use crate::domain::value_object::{
    role::Role,
    token::{BearerToken, UntrustedClaims},
};
use crate::error::{AuthError, AuthResult};

/// Why a stored token was thrown away
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Discarded {
    Malformed,
    MissingEmail,
    MissingRole,
    Expired,
}

pub struct SessionStore<S: DurableStorage> {
    storage: S,
    token_key: String,
    session: Session,
    initialized: bool,
}

impl<S: DurableStorage> SessionStore<S> {
    pub fn new(storage: S, config: &AuthConfig) -> Self {
        Self {
            storage,
            token_key: config.token_storage_key.clone(),
            session: Session::loading(),
            initialized: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Restore the session from durable storage
    pub fn initialize(&mut self) -> &Session {
        self.initialize_at(Utc::now())
    }

    /// Restore the session as of `now`
    ///
    /// Runs once; later calls return the current session unchanged.
    pub fn initialize_at(&mut self, now: DateTime<Utc>) -> &Session {
        if !self.initialized {
            self.initialized = true;
            self.session = self.restore(now);
        }
        &self.session
    }

    fn restore(&self, now: DateTime<Utc>) -> Session {
        let raw = match self.storage.get(&self.token_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!("No stored token; starting anonymous");
                return Session::anonymous();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not read stored token; starting anonymous");
                return Session::anonymous();
            }
        };

        let token = BearerToken::new(raw);
        match token.decode_untrusted() {
            Ok(claims) => match restorable_user(&claims, now) {
                Ok(user) => {
                    tracing::info!(email = %user.email, role = %user.role, "Session restored");
                    Session::authenticated(user, token)
                }
                Err(reason) => {
                    self.discard(reason);
                    Session::anonymous()
                }
            },
            Err(e) => {
                tracing::debug!(error = %e, "Stored token is malformed");
                self.discard(Discarded::Malformed);
                Session::anonymous()
            }
        }
    }

    fn discard(&self, reason: Discarded) {
        tracing::info!(reason = ?reason, "Discarding stored token");
        if let Err(e) = self.storage.remove(&self.token_key) {
            tracing::warn!(error = %e, "Could not remove stored token");
        }
    }

    /// Record a completed login
    ///
    /// Only the token is persisted. When `role` is `None` the token's
    /// claims supply it; with no role anywhere the session is untouched.
    pub fn login(
        &mut self,
        email: &str,
        token: BearerToken,
        role: Option<Role>,
        name: Option<String>,
    ) -> AuthResult<&Session> {
        let claims = token.decode_untrusted().ok();
        let role = role
            .or_else(|| {
                claims
                    .as_ref()
                    .and_then(|c| c.role.as_deref())
                    .and_then(Role::from_code)
            })
            .ok_or(AuthError::MissingRole)?;

        let name = name.or_else(|| claims.as_ref().and_then(|c| c.name.clone()));
        let full_name = claims.and_then(|c| c.full_name);
        let user = UserSummary::new(email.trim(), role, name, full_name);

        if let Err(e) = self.storage.set(&self.token_key, token.as_str()) {
            tracing::warn!(error = %e, "Could not persist token; session will not survive a restart");
        }

        tracing::info!(email = %user.email, role = %user.role, "Logged in");
        self.initialized = true;
        self.session = Session::authenticated(user, token);
        Ok(&self.session)
    }

    /// Forget the session and the stored token
    pub fn logout(&mut self) -> &Session {
        if let Err(e) = self.storage.remove(&self.token_key) {
            tracing::warn!(error = %e, "Could not remove stored token");
        }
        if let Some(user) = self.session.user() {
            tracing::info!(email = %user.email, "Logged out");
        }
        self.initialized = true;
        self.session = Session::anonymous();
        &self.session
    }
}

fn restorable_user(claims: &UntrustedClaims, now: DateTime<Utc>) -> Result<UserSummary, Discarded> {
    if claims.email().is_none() {
        return Err(Discarded::MissingEmail);
    }
    if claims.is_expired_at(now) {
        return Err(Discarded::Expired);
    }
    UserSummary::from_claims(claims).ok_or(Discarded::MissingRole)
}
