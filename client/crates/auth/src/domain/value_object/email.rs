//! Email Value Object
//!
//! The login identifier. Validation here only catches typos before a
//! request is sent; the API decides whether the account exists.

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Maximum email length (per RFC 5321)
const EMAIL_MAX_LENGTH: usize = 254;

/// Maximum local-part length (per RFC 5321)
const LOCAL_PART_MAX_LENGTH: usize = 64;

/// Email address value object
///
/// Kept as submitted apart from trimming; use [`Email::same_address`] to
/// compare two addresses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub fn new(email: impl Into<String>) -> AppResult<Self> {
        let email = email.into().trim().to_string();

        if email.is_empty() {
            return Err(AppError::bad_request("El correo es obligatorio"));
        }
        if email.len() > EMAIL_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "El correo no puede superar {} caracteres",
                EMAIL_MAX_LENGTH
            )));
        }
        if !Self::is_valid_format(&email) {
            return Err(AppError::bad_request("Formato de correo inválido")
                .with_action("Use el formato nombre@dominio.com"));
        }

        Ok(Self(email))
    }

    fn is_valid_format(email: &str) -> bool {
        let Some((local, domain)) = email.split_once('@') else {
            return false;
        };
        if domain.contains('@') || local.contains(char::is_whitespace) {
            return false;
        }
        if local.is_empty() || local.len() > LOCAL_PART_MAX_LENGTH {
            return false;
        }

        // Domain: dotted labels of [a-z0-9-], no empty label, no edge hyphen
        let labels: Vec<&str> = domain.split('.').collect();
        labels.len() >= 2
            && labels.iter().all(|label| {
                !label.is_empty()
                    && !label.starts_with('-')
                    && !label.ends_with('-')
                    && label
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '-')
            })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison with another address
    pub fn same_address(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other.trim())
    }

    pub fn domain(&self) -> &str {
        self.0.split_once('@').map(|(_, d)| d).unwrap_or("")
    }

    /// The part before `@`; used as a display name when none is known
    pub fn local_part(&self) -> &str {
        self.0.split_once('@').map(|(l, _)| l).unwrap_or("")
    }
}

impl FromStr for Email {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        Email::new(s)
    }
}

impl TryFrom<String> for Email {
    type Error = AppError;

    fn try_from(s: String) -> AppResult<Self> {
        Email::new(s)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_valid() {
        assert!(Email::new("ana@sirona.test").is_ok());
        assert!(Email::new("dr.perez@hospital.com.ar").is_ok());
        assert!(Email::new("user+tag@example.com").is_ok());
        assert!(Email::new("  Ana@Sirona.TEST ").is_ok());
    }

    #[test]
    fn test_email_invalid() {
        assert!(Email::new("").is_err());
        assert!(Email::new("anasirona.test").is_err());
        assert!(Email::new("ana@").is_err());
        assert!(Email::new("@sirona.test").is_err());
        assert!(Email::new("ana@@sirona.test").is_err());
        assert!(Email::new("ana@sirona").is_err());
        assert!(Email::new("ana@-sirona.test").is_err());
        assert!(Email::new("ana@sirona..test").is_err());
        assert!(Email::new("a na@sirona.test").is_err());
    }

    #[test]
    fn test_email_parts() {
        let email = Email::new("Ana.Lopez@Sirona.test").unwrap();
        assert_eq!(email.domain(), "Sirona.test");
        assert_eq!(email.local_part(), "Ana.Lopez");
    }

    #[test]
    fn test_email_is_kept_as_submitted() {
        let email = Email::new("  Ana.Lopez@Sirona.test ").unwrap();
        assert_eq!(email.as_str(), "Ana.Lopez@Sirona.test");
        assert!(email.same_address("ana.lopez@sirona.TEST"));
        assert!(!email.same_address("ana@sirona.test"));
    }

    #[test]
    fn test_email_error_is_bad_request() {
        let err = Email::new("nope").unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(err.action().is_some());
    }
}
