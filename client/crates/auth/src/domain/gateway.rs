//! Auth Gateway Trait
//!
//! Interface to the authentication endpoints of the API. Implementation
//! is in the infrastructure layer.
//!
//! Each call is one request: no retry, no deduplication, no timeout of its
//! own. Callers keep their submit buttons disabled while a call is out.

use chrono::NaiveDate;
use kernel::id::UserAccountId;
use platform::password::ClearTextPassword;

use crate::domain::value_object::{
    email::Email, otp_code::OtpCode, role::Role, token::BearerToken,
};
use crate::error::{AuthError, AuthResult};

// ============================================================================
// Inputs
// ============================================================================

/// Image accepted for face capture uploads
const FACE_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

/// A captured face image
#[derive(Clone, PartialEq, Eq)]
pub struct FaceCapture {
    bytes: Vec<u8>,
    mime_type: String,
    file_name: String,
}

impl FaceCapture {
    pub fn new(bytes: Vec<u8>, mime_type: &str) -> AuthResult<Self> {
        if bytes.is_empty() {
            return Err(AuthError::InvalidField {
                field: "face_image",
                message: "Capture una imagen de su rostro".into(),
            });
        }
        let mime_type = mime_type.trim().to_ascii_lowercase();
        if !FACE_MIME_TYPES.contains(&mime_type.as_str()) {
            return Err(AuthError::InvalidField {
                field: "face_image",
                message: "Use una imagen JPEG, PNG o WebP".into(),
            });
        }
        let extension = mime_type.trim_start_matches("image/");
        let file_name = format!("face.{}", if extension == "jpeg" { "jpg" } else { extension });

        Ok(Self {
            bytes,
            mime_type,
            file_name,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

impl std::fmt::Debug for FaceCapture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaceCapture")
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A validated doctor account to create
#[derive(Debug)]
pub struct DoctorRegistration {
    pub email: Email,
    pub password: ClearTextPassword,
    pub full_name: String,
    pub specialty: String,
    pub license_number: String,
    pub phone: Option<String>,
}

/// A validated patient account to create
#[derive(Debug)]
pub struct PatientRegistration {
    pub email: Email,
    pub password: ClearTextPassword,
    pub full_name: String,
    pub birth_date: NaiveDate,
    pub document_id: String,
    pub phone: Option<String>,
}

// ============================================================================
// Outputs
// ============================================================================

/// Display data the API may return along with a login
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoginUser {
    pub email: Option<String>,
    pub name: Option<String>,
    pub full_name: Option<String>,
}

/// Answer to a password or face login
///
/// When `requires_mfa` is set the token and role are usually absent: the
/// login completes through [`AuthGateway::verify_otp`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginResponse {
    pub token: Option<BearerToken>,
    pub role: Option<Role>,
    pub requires_mfa: bool,
    pub user: Option<LoginUser>,
}

/// Answer to a successful OTP verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpVerification {
    pub token: BearerToken,
    pub role: Role,
}

/// Account created by a registration call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedUser {
    pub id: Option<UserAccountId>,
    pub email: String,
    pub role: Role,
}

// ============================================================================
// Gateway
// ============================================================================

#[trait_variant::make(AuthGateway: Send)]
pub trait LocalAuthGateway {
    /// `POST /api/auth/login`
    async fn login(&self, email: &Email, password: &ClearTextPassword)
    -> AuthResult<LoginResponse>;

    /// `POST /api/auth/login/face` (multipart)
    async fn login_with_face(&self, email: &Email, image: &FaceCapture)
    -> AuthResult<LoginResponse>;

    /// `POST /api/auth/otp/verify`
    async fn verify_otp(&self, email: &Email, code: &OtpCode) -> AuthResult<OtpVerification>;

    /// Create a doctor account; requires a Secretario/Administrador session
    async fn register_doctor(
        &self,
        bearer: &BearerToken,
        registration: &DoctorRegistration,
    ) -> AuthResult<CreatedUser>;

    /// Create a patient account; requires a Secretario/Administrador session
    async fn register_patient(
        &self,
        bearer: &BearerToken,
        registration: &PatientRegistration,
    ) -> AuthResult<CreatedUser>;
}
