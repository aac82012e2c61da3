//! Session Entity
//!
//! In-memory authentication state. Only the session store can build an
//! authenticated session; everyone else reads it through `&Session`.

use crate::domain::entity::user_summary::UserSummary;
use crate::domain::value_object::{email::Email, role::Role, token::BearerToken};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    is_authenticated: bool,
    user: Option<UserSummary>,
    token: Option<BearerToken>,
    is_loading: bool,
}

impl Session {
    /// Before restore has run
    pub fn loading() -> Self {
        Self {
            is_authenticated: false,
            user: None,
            token: None,
            is_loading: true,
        }
    }

    /// Resolved, nobody logged in
    pub fn anonymous() -> Self {
        Self {
            is_loading: false,
            ..Self::loading()
        }
    }

    /// Resolved, logged in. An authenticated session always carries a user
    /// (and therefore a role) and a token.
    pub(crate) fn authenticated(user: UserSummary, token: BearerToken) -> Self {
        Self {
            is_authenticated: true,
            user: Some(user),
            token: Some(token),
            is_loading: false,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn user(&self) -> Option<&UserSummary> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&BearerToken> {
        self.token.as_ref()
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::loading()
    }
}

/// Step-up challenge awaiting a one-time code
///
/// Lives only inside the login page between a `requires_mfa` answer and
/// a successful verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMfaChallenge {
    pub pending_email: Email,
}
