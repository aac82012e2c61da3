//! User Summary Entity
//!
//! Who is logged in, as far as the client knows. Rebuilt from the token
//! on every start and never persisted on its own.

use crate::domain::value_object::{role::Role, token::UntrustedClaims};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub email: String,
    pub role: Role,
    pub name: String,
    pub full_name: String,
}

impl UserSummary {
    /// Build a summary, filling in display names that were not supplied
    ///
    /// `name` falls back to the e-mail's local part and `full_name` to `name`.
    pub fn new(
        email: impl Into<String>,
        role: Role,
        name: Option<String>,
        full_name: Option<String>,
    ) -> Self {
        let email = email.into();
        let name = name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| local_part(&email).to_string());
        let full_name = full_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| name.clone());

        Self {
            email,
            role,
            name,
            full_name,
        }
    }

    /// Summary from unverified claims
    ///
    /// `None` when the e-mail is missing or the role is absent/unknown.
    pub fn from_claims(claims: &UntrustedClaims) -> Option<Self> {
        let email = claims.email()?;
        let role = claims.role.as_deref().and_then(Role::from_code)?;
        Some(Self::new(
            email,
            role,
            claims.name.clone(),
            claims.full_name.clone(),
        ))
    }
}

fn local_part(email: &str) -> &str {
    email.split_once('@').map(|(l, _)| l).unwrap_or(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_fallbacks() {
        let user = UserSummary::new("ana@sirona.test", Role::Paciente, None, None);
        assert_eq!(user.name, "ana");
        assert_eq!(user.full_name, "ana");

        let user = UserSummary::new(
            "ana@sirona.test",
            Role::Paciente,
            Some("Ana".into()),
            Some("  ".into()),
        );
        assert_eq!(user.full_name, "Ana");
    }

    #[test]
    fn test_from_claims() {
        let claims = UntrustedClaims {
            email: Some("dr@sirona.test".into()),
            role: Some("medico".into()),
            full_name: Some("Dr. Pérez".into()),
            ..Default::default()
        };
        let user = UserSummary::from_claims(&claims).unwrap();
        assert_eq!(user.role, Role::Medico);
        assert_eq!(user.name, "dr");
        assert_eq!(user.full_name, "Dr. Pérez");
    }

    #[test]
    fn test_from_claims_requires_email_and_role() {
        let no_email = UntrustedClaims {
            role: Some("Paciente".into()),
            ..Default::default()
        };
        assert!(UserSummary::from_claims(&no_email).is_none());

        let unknown_role = UntrustedClaims {
            email: Some("x@sirona.test".into()),
            role: Some("Enfermero".into()),
            ..Default::default()
        };
        assert!(UserSummary::from_claims(&unknown_role).is_none());
    }
}
