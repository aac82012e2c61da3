//! HTTP Auth Gateway
//!
//! `AuthGateway` over an [`ApiTransport`]. Builds the request bodies,
//! parses success payloads and maps error bodies onto [`AuthError`].

use platform::password::ClearTextPassword;
use platform::transport::{
    ApiRequest, ApiResponse, ApiTransport, ErrorBody, FilePart, FormField,
};
use serde::{Deserialize, Serialize};

use crate::domain::gateway::{
    AuthGateway, CreatedUser, DoctorRegistration, FaceCapture, LoginResponse, LoginUser,
    OtpVerification, PatientRegistration,
};
use crate::domain::value_object::{
    email::Email, otp_code::OtpCode, role::Role, token::BearerToken,
};
use crate::error::{AuthError, AuthResult};

const LOGIN_PATH: &str = "/api/auth/login";
const FACE_LOGIN_PATH: &str = "/api/auth/login/face";
const OTP_VERIFY_PATH: &str = "/api/auth/otp/verify";
const DOCTORS_PATH: &str = "/api/users/doctors";
const PATIENTS_PATH: &str = "/api/users/patients";

// ============================================================================
// Wire types
// ============================================================================

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct OtpBody<'a> {
    email: &'a str,
    otp: &'a str,
}

#[derive(Serialize)]
struct DoctorBody<'a> {
    email: &'a str,
    password: &'a str,
    full_name: &'a str,
    specialty: &'a str,
    license_number: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<&'a str>,
}

#[derive(Serialize)]
struct PatientBody<'a> {
    email: &'a str,
    password: &'a str,
    full_name: &'a str,
    birth_date: String,
    document_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<&'a str>,
}

#[derive(Debug, Default, Deserialize)]
struct LoginUserDto {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, alias = "fullName")]
    full_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginResponseDto {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    requires_mfa: bool,
    #[serde(default)]
    user: Option<LoginUserDto>,
}

#[derive(Debug, Deserialize)]
struct OtpResponseDto {
    token: String,
    #[serde(default)]
    role: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreatedUserDto {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    role: Option<String>,
}

impl From<LoginResponseDto> for LoginResponse {
    fn from(dto: LoginResponseDto) -> Self {
        Self {
            token: dto
                .token
                .filter(|t| !t.trim().is_empty())
                .map(BearerToken::new),
            role: dto.role.as_deref().and_then(Role::from_code),
            requires_mfa: dto.requires_mfa,
            user: dto.user.map(|u| LoginUser {
                email: u.email,
                name: u.name,
                full_name: u.full_name,
            }),
        }
    }
}

// ============================================================================
// Gateway
// ============================================================================

/// HTTP-backed auth gateway
#[derive(Debug, Clone)]
pub struct HttpAuthGateway<T: ApiTransport> {
    transport: T,
}

impl<T: ApiTransport + Sync> HttpAuthGateway<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    async fn send(&self, request: ApiRequest) -> AuthResult<ApiResponse> {
        let path = request.path.clone();
        let response = self.transport.send(request).await?;
        if response.is_success() {
            Ok(response)
        } else {
            tracing::debug!(path = %path, status = response.status, "Auth request rejected");
            Err(error_from_response(&response))
        }
    }

    async fn create_user(
        &self,
        request: ApiRequest,
        default_role: Role,
        email: &Email,
    ) -> AuthResult<CreatedUser> {
        let response = self.send(request).await?;
        // Some deployments answer 201 with an empty body
        let dto: Option<CreatedUserDto> = response.json().ok();

        Ok(match dto {
            Some(dto) => CreatedUser {
                id: dto.id.and_then(|id| id.parse().ok()),
                email: dto.email.unwrap_or_else(|| email.as_str().to_string()),
                role: dto
                    .role
                    .as_deref()
                    .and_then(Role::from_code)
                    .unwrap_or(default_role),
            },
            None => CreatedUser {
                id: None,
                email: email.as_str().to_string(),
                role: default_role,
            },
        })
    }
}

fn parse_login(response: &ApiResponse) -> AuthResult<LoginResponse> {
    response
        .json::<LoginResponseDto>()
        .map(LoginResponse::from)
        .map_err(|e| AuthError::UnexpectedResponse(e.to_string()))
}

impl<T: ApiTransport + Sync> AuthGateway for HttpAuthGateway<T> {
    async fn login(
        &self,
        email: &Email,
        password: &ClearTextPassword,
    ) -> AuthResult<LoginResponse> {
        let request = ApiRequest::post(LOGIN_PATH).json(&LoginBody {
            email: email.as_str(),
            password: password.expose(),
        })?;
        parse_login(&self.send(request).await?)
    }

    async fn login_with_face(
        &self,
        email: &Email,
        image: &FaceCapture,
    ) -> AuthResult<LoginResponse> {
        let request = ApiRequest::post(FACE_LOGIN_PATH).multipart(vec![
            FormField::text("email", email.as_str()),
            FormField::file(
                "face_image",
                FilePart {
                    file_name: image.file_name().to_string(),
                    mime_type: image.mime_type().to_string(),
                    bytes: image.bytes().to_vec(),
                },
            ),
        ]);
        parse_login(&self.send(request).await?)
    }

    async fn verify_otp(&self, email: &Email, code: &OtpCode) -> AuthResult<OtpVerification> {
        let request = ApiRequest::post(OTP_VERIFY_PATH).json(&OtpBody {
            email: email.as_str(),
            otp: code.as_str(),
        })?;
        let dto: OtpResponseDto = self
            .send(request)
            .await?
            .json()
            .map_err(|e| AuthError::UnexpectedResponse(e.to_string()))?;

        if dto.token.trim().is_empty() {
            return Err(AuthError::UnexpectedResponse(
                "OTP verification returned no token".to_string(),
            ));
        }
        let token = BearerToken::new(dto.token);
        let role = dto
            .role
            .as_deref()
            .and_then(Role::from_code)
            .or_else(|| {
                token
                    .decode_untrusted()
                    .ok()
                    .and_then(|c| c.role)
                    .as_deref()
                    .and_then(Role::from_code)
            })
            .ok_or(AuthError::MissingRole)?;

        Ok(OtpVerification { token, role })
    }

    async fn register_doctor(
        &self,
        bearer: &BearerToken,
        registration: &DoctorRegistration,
    ) -> AuthResult<CreatedUser> {
        let request = ApiRequest::post(DOCTORS_PATH)
            .bearer(bearer.as_str())
            .json(&DoctorBody {
                email: registration.email.as_str(),
                password: registration.password.expose(),
                full_name: &registration.full_name,
                specialty: &registration.specialty,
                license_number: &registration.license_number,
                phone: registration.phone.as_deref(),
            })?;
        self.create_user(request, Role::Medico, &registration.email)
            .await
    }

    async fn register_patient(
        &self,
        bearer: &BearerToken,
        registration: &PatientRegistration,
    ) -> AuthResult<CreatedUser> {
        let request = ApiRequest::post(PATIENTS_PATH)
            .bearer(bearer.as_str())
            .json(&PatientBody {
                email: registration.email.as_str(),
                password: registration.password.expose(),
                full_name: &registration.full_name,
                birth_date: registration.birth_date.format("%Y-%m-%d").to_string(),
                document_id: &registration.document_id,
                phone: registration.phone.as_deref(),
            })?;
        self.create_user(request, Role::Paciente, &registration.email)
            .await
    }
}

// ============================================================================
// Error mapping
// ============================================================================

/// Map a non-2xx response onto an [`AuthError`]
///
/// A lockout flag wins over the status code. Backend messages are kept
/// verbatim; a generic Spanish text fills in when the body has none.
pub fn error_from_response(response: &ApiResponse) -> AuthError {
    let body = ErrorBody::from_response(response);
    let text = body.text().map(str::to_string);

    if body.account_locked || response.status == 423 {
        let message = text.unwrap_or_else(|| match &body.locked_until {
            Some(until) => format!("Cuenta bloqueada. Intente de nuevo en {until}"),
            None => "Cuenta bloqueada temporalmente".to_string(),
        });
        return AuthError::AccountLocked {
            message,
            locked_until: body.locked_until,
        };
    }

    match response.status {
        401 => AuthError::InvalidCredentials(
            text.unwrap_or_else(|| "Credenciales inválidas".to_string()),
        ),
        400 | 422 => AuthError::Validation(
            text.unwrap_or_else(|| "Datos inválidos".to_string()),
        ),
        403 => AuthError::Forbidden(
            text.unwrap_or_else(|| "No tiene permisos para esta acción".to_string()),
        ),
        409 => AuthError::Conflict(
            text.unwrap_or_else(|| "El usuario ya existe".to_string()),
        ),
        status => AuthError::Api {
            status,
            message: text.unwrap_or_else(|| format!("Error del servidor ({status})")),
        },
    }
}
