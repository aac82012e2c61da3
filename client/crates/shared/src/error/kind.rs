//! Error Kind
//!
//! [`ErrorKind`] classifies every failure the client can see, whether the
//! API answered with an error status or the request never completed.
//! [`ErrorKind::display`] tells a view how to surface it.

use serde::Serialize;

/// How a view should surface an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorDisplay {
    /// Next to the offending form field
    Inline,
    /// Banner above the page, optionally with a retry button
    Banner,
    /// Drop the session and go to the login page
    RedirectToLogin,
}

/// Error classification, keyed by the HTTP status it corresponds to
///
/// ```rust
/// use kernel::error::kind::{ErrorDisplay, ErrorKind};
///
/// let kind = ErrorKind::from_status_code(401);
/// assert_eq!(kind, ErrorKind::Unauthorized);
/// assert_eq!(kind.display(), ErrorDisplay::RedirectToLogin);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    /// Invalid input, whether caught locally or rejected by the API (400, 422)
    BadRequest,
    /// No session, or the token is wrong or expired (401)
    Unauthorized,
    /// The role may not perform the action (403)
    Forbidden,
    NotFound,
    /// The request took too long (408)
    RequestTimeout,
    /// Clashes with current state, e.g. a double-booked slot (409)
    Conflict,
    /// Account locked after repeated failures (423)
    Locked,
    TooManyRequests,
    /// Local bug or server failure (500)
    InternalServerError,
    /// The API could not be reached or answered garbage (502)
    BadGateway,
    ServiceUnavailable,
}

impl ErrorKind {
    #[inline]
    pub const fn status_code(&self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::Unauthorized => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::RequestTimeout => 408,
            ErrorKind::Conflict => 409,
            ErrorKind::Locked => 423,
            ErrorKind::TooManyRequests => 429,
            ErrorKind::InternalServerError => 500,
            ErrorKind::BadGateway => 502,
            ErrorKind::ServiceUnavailable => 503,
        }
    }

    /// Classify a status answered by the API
    ///
    /// 422 folds into `BadRequest`. Unknown 4xx codes become `BadRequest`,
    /// anything else `InternalServerError`.
    pub const fn from_status_code(code: u16) -> Self {
        match code {
            400 | 422 => ErrorKind::BadRequest,
            401 => ErrorKind::Unauthorized,
            403 => ErrorKind::Forbidden,
            404 => ErrorKind::NotFound,
            408 => ErrorKind::RequestTimeout,
            409 => ErrorKind::Conflict,
            423 => ErrorKind::Locked,
            429 => ErrorKind::TooManyRequests,
            502 | 504 => ErrorKind::BadGateway,
            503 => ErrorKind::ServiceUnavailable,
            400..=499 => ErrorKind::BadRequest,
            _ => ErrorKind::InternalServerError,
        }
    }

    /// Short English label for logs
    #[inline]
    pub const fn label(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "bad request",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::NotFound => "not found",
            ErrorKind::RequestTimeout => "timeout",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Locked => "locked",
            ErrorKind::TooManyRequests => "rate limited",
            ErrorKind::InternalServerError => "internal",
            ErrorKind::BadGateway => "bad gateway",
            ErrorKind::ServiceUnavailable => "unavailable",
        }
    }

    /// Where a view shows this error
    pub const fn display(&self) -> ErrorDisplay {
        match self {
            ErrorKind::BadRequest => ErrorDisplay::Inline,
            ErrorKind::Unauthorized => ErrorDisplay::RedirectToLogin,
            _ => ErrorDisplay::Banner,
        }
    }

    /// Repeating the same request later may succeed
    #[inline]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorKind::RequestTimeout
                | ErrorKind::TooManyRequests
                | ErrorKind::BadGateway
                | ErrorKind::ServiceUnavailable
        )
    }

    #[inline]
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// The token is no longer accepted; log out.
    #[inline]
    pub const fn requires_reauth(&self) -> bool {
        matches!(self, ErrorKind::Unauthorized)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        for kind in [
            ErrorKind::BadRequest,
            ErrorKind::Unauthorized,
            ErrorKind::Forbidden,
            ErrorKind::NotFound,
            ErrorKind::Conflict,
            ErrorKind::Locked,
            ErrorKind::ServiceUnavailable,
        ] {
            assert_eq!(ErrorKind::from_status_code(kind.status_code()), kind);
        }
        assert_eq!(ErrorKind::from_status_code(422), ErrorKind::BadRequest);
        assert_eq!(ErrorKind::from_status_code(418), ErrorKind::BadRequest);
        assert_eq!(ErrorKind::from_status_code(504), ErrorKind::BadGateway);
        assert_eq!(ErrorKind::from_status_code(200), ErrorKind::InternalServerError);
    }

    #[test]
    fn test_display_target() {
        assert_eq!(ErrorKind::BadRequest.display(), ErrorDisplay::Inline);
        assert_eq!(ErrorKind::Unauthorized.display(), ErrorDisplay::RedirectToLogin);
        assert_eq!(ErrorKind::Forbidden.display(), ErrorDisplay::Banner);
        assert_eq!(ErrorKind::Locked.display(), ErrorDisplay::Banner);
    }

    #[test]
    fn test_retryable() {
        assert!(ErrorKind::BadGateway.is_retryable());
        assert!(ErrorKind::RequestTimeout.is_retryable());
        assert!(!ErrorKind::Conflict.is_retryable());
        assert!(!ErrorKind::InternalServerError.is_retryable());
        assert!(ErrorKind::InternalServerError.is_server_error());
    }
}
