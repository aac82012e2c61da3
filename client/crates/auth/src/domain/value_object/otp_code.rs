//! One-time code typed during MFA step-up

use std::fmt;

use kernel::error::app_error::{AppError, AppResult};

/// Number of digits in a one-time code
pub const OTP_CODE_LENGTH: usize = 6;

/// A well-formed one-time code (six ASCII digits)
///
/// Only the shape is checked; whether the code is right is the API's call,
/// and there is no client-side attempt limit.
#[derive(Clone, PartialEq, Eq)]
pub struct OtpCode(String);

impl OtpCode {
    /// Spaces typed between digit groups are ignored.
    pub fn new(raw: &str) -> AppResult<Self> {
        let code: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

        if code.len() != OTP_CODE_LENGTH || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(AppError::bad_request(format!(
                "El código debe tener {} dígitos",
                OTP_CODE_LENGTH
            )));
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OtpCode(******)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_codes() {
        assert_eq!(OtpCode::new("123456").unwrap().as_str(), "123456");
        assert_eq!(OtpCode::new("123 456").unwrap().as_str(), "123456");
    }

    #[test]
    fn test_invalid_codes() {
        assert!(OtpCode::new("").is_err());
        assert!(OtpCode::new("12345").is_err());
        assert!(OtpCode::new("1234567").is_err());
        assert!(OtpCode::new("12a456").is_err());
        assert!(OtpCode::new("１２３４５６").is_err());
    }

    #[test]
    fn test_debug_hides_code() {
        let code = OtpCode::new("654321").unwrap();
        assert!(!format!("{:?}", code).contains("654321"));
    }
}
