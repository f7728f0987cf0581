//! Turns authentication failures from the identity provider, the transport or
//! the HTTP layer into one of a closed set of user-facing descriptors.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthErrorKind {
    SessionExpired,
    Unauthorized,
    InvalidCredentials,
    NetworkError,
    PermissionDenied,
    UserNotFound,
    EmailNotVerified,
    AccountDisabled,
    RateLimited,
    UnknownError,
}

impl AuthErrorKind {
    pub const ALL: [AuthErrorKind; 10] = [
        AuthErrorKind::SessionExpired,
        AuthErrorKind::Unauthorized,
        AuthErrorKind::InvalidCredentials,
        AuthErrorKind::NetworkError,
        AuthErrorKind::PermissionDenied,
        AuthErrorKind::UserNotFound,
        AuthErrorKind::EmailNotVerified,
        AuthErrorKind::AccountDisabled,
        AuthErrorKind::RateLimited,
        AuthErrorKind::UnknownError,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthErrorKind::SessionExpired => "SESSION_EXPIRED",
            AuthErrorKind::Unauthorized => "UNAUTHORIZED",
            AuthErrorKind::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthErrorKind::NetworkError => "NETWORK_ERROR",
            AuthErrorKind::PermissionDenied => "PERMISSION_DENIED",
            AuthErrorKind::UserNotFound => "USER_NOT_FOUND",
            AuthErrorKind::EmailNotVerified => "EMAIL_NOT_VERIFIED",
            AuthErrorKind::AccountDisabled => "ACCOUNT_DISABLED",
            AuthErrorKind::RateLimited => "RATE_LIMITED",
            AuthErrorKind::UnknownError => "UNKNOWN_ERROR",
        }
    }

    /// Maps an identity-provider error code. Unrecognised codes give `None`.
    pub fn from_provider_code(code: &str) -> Option<Self> {
        match code {
            "session_expired" => Some(AuthErrorKind::SessionExpired),
            "unauthenticated" | "unauthorized" => Some(AuthErrorKind::Unauthorized),
            "invalid_credentials" => Some(AuthErrorKind::InvalidCredentials),
            "user_not_found" => Some(AuthErrorKind::UserNotFound),
            "email_not_verified" => Some(AuthErrorKind::EmailNotVerified),
            "account_disabled" => Some(AuthErrorKind::AccountDisabled),
            "rate_limited" => Some(AuthErrorKind::RateLimited),
            "network_error" => Some(AuthErrorKind::NetworkError),
            "permission_denied" => Some(AuthErrorKind::PermissionDenied),
            _ => None,
        }
    }

    pub fn from_status(status: u16) -> Self {
        match status {
            401 => AuthErrorKind::Unauthorized,
            403 => AuthErrorKind::PermissionDenied,
            404 => AuthErrorKind::UserNotFound,
            429 => AuthErrorKind::RateLimited,
            500..=599 => AuthErrorKind::NetworkError,
            _ => AuthErrorKind::UnknownError,
        }
    }

    /// Base delay before the first automatic retry, in milliseconds. Zero for
    /// errors that retrying cannot fix.
    pub fn base_retry_delay_ms(&self) -> u64 {
        match self {
            AuthErrorKind::NetworkError => 1_000,
            AuthErrorKind::RateLimited => 60_000,
            AuthErrorKind::InvalidCredentials => 2_000,
            AuthErrorKind::EmailNotVerified => 5_000,
            AuthErrorKind::UnknownError => 3_000,
            AuthErrorKind::SessionExpired
            | AuthErrorKind::Unauthorized
            | AuthErrorKind::PermissionDenied
            | AuthErrorKind::UserNotFound
            | AuthErrorKind::AccountDisabled => 0,
        }
    }
}

impl fmt::Display for AuthErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}

/// What the user sees for a failed authenticated action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthError {
    #[serde(rename = "type")]
    pub kind: AuthErrorKind,
    pub title: &'static str,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_url: Option<&'static str>,
    pub can_retry: bool,
    pub severity: Severity,
}

impl AuthError {
    pub fn for_kind(kind: AuthErrorKind) -> Self {
        let (title, message, action, action_url, can_retry, severity) = match kind {
            AuthErrorKind::SessionExpired => (
                "Your session has expired",
                "You were signed out automatically for security. Please sign in again.",
                "Sign in again",
                Some("/sign-in"),
                false,
                Severity::Warning,
            ),
            AuthErrorKind::Unauthorized => (
                "Sign in required",
                "Please sign in to use this feature.",
                "Sign in",
                Some("/sign-in"),
                false,
                Severity::Info,
            ),
            AuthErrorKind::InvalidCredentials => (
                "Incorrect sign-in details",
                "Check your email and password and try again.",
                "Try again",
                None,
                true,
                Severity::Error,
            ),
            AuthErrorKind::NetworkError => (
                "Network connection error",
                "Check your internet connection and try again.",
                "Try again",
                None,
                true,
                Severity::Error,
            ),
            AuthErrorKind::PermissionDenied => (
                "Permission denied",
                "You are not allowed to do this. Contact an administrator.",
                "Go home",
                Some("/"),
                false,
                Severity::Error,
            ),
            AuthErrorKind::UserNotFound => (
                "User not found",
                "This email is not registered. Please create an account.",
                "Sign up",
                Some("/sign-up"),
                false,
                Severity::Info,
            ),
            AuthErrorKind::EmailNotVerified => (
                "Email verification required",
                "Click the verification link sent to the email you signed up with.",
                "Resend verification email",
                None,
                true,
                Severity::Warning,
            ),
            AuthErrorKind::AccountDisabled => (
                "Account disabled",
                "Your account was disabled by an administrator. Contact support.",
                "Contact support",
                Some("/contact"),
                false,
                Severity::Error,
            ),
            AuthErrorKind::RateLimited => (
                "Too many attempts",
                "Please wait a minute or two and try again.",
                "Retry later",
                None,
                true,
                Severity::Warning,
            ),
            AuthErrorKind::UnknownError => (
                "Something went wrong",
                "If the problem persists, contact support.",
                "Try again",
                None,
                true,
                Severity::Error,
            ),
        };

        Self {
            kind,
            title,
            message,
            action: Some(action),
            action_url,
            can_retry,
            severity,
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProviderErrorEntry {
    pub code: String,
    #[serde(default)]
    pub message: String,
}

/// The shapes a failure can arrive in. The caller knows which one it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawAuthError {
    /// An identity-provider error body.
    Provider {
        code: Option<String>,
        errors: Vec<ProviderErrorEntry>,
    },
    /// A transport or runtime failure with only a message.
    Exception { message: String },
    /// A non-success HTTP response.
    HttpStatus(u16),
    Unknown,
}

const NETWORK_HINTS: [&str; 3] = ["fetch", "network", "NetworkError"];

/// Resolves any raw failure to a descriptor. Never fails.
pub fn classify(raw: &RawAuthError) -> AuthError {
    let kind = match raw {
        RawAuthError::Provider { code, errors } => errors
            .first()
            .map(|entry| entry.code.as_str())
            .filter(|code| !code.is_empty())
            .or(code.as_deref())
            .and_then(AuthErrorKind::from_provider_code)
            .unwrap_or(AuthErrorKind::UnknownError),
        RawAuthError::Exception { message } => {
            if NETWORK_HINTS.iter().any(|hint| message.contains(hint)) {
                AuthErrorKind::NetworkError
            } else {
                AuthErrorKind::UnknownError
            }
        }
        RawAuthError::HttpStatus(status) => AuthErrorKind::from_status(*status),
        RawAuthError::Unknown => AuthErrorKind::UnknownError,
    };

    AuthError::for_kind(kind)
}

/// Like [`classify`], and logs the result under an optional context label.
pub fn classify_and_log(raw: &RawAuthError, context: Option<&str>) -> AuthError {
    let error = classify(raw);
    tracing::debug!(
        context = context.unwrap_or("-"),
        kind = %error.kind,
        severity = %error.severity,
        can_retry = error.can_retry,
        "Auth error: {}",
        error.title
    );
    error
}

const MAX_BACKOFF_EXPONENT: u32 = 4;

/// Backoff before retry number `attempt` (1-based; 0 counts as 1), in
/// milliseconds. Non-retryable kinds always get 0.
pub fn retry_delay(kind: AuthErrorKind, attempt: u32) -> u64 {
    let exponent = attempt.max(1).saturating_sub(1).min(MAX_BACKOFF_EXPONENT);
    kind.base_retry_delay_ms() * 2u64.pow(exponent)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(code: Option<&str>, entries: &[&str]) -> RawAuthError {
        RawAuthError::Provider {
            code: code.map(str::to_string),
            errors: entries
                .iter()
                .map(|c| ProviderErrorEntry {
                    code: c.to_string(),
                    message: String::new(),
                })
                .collect(),
        }
    }

    #[test]
    fn provider_codes_prefer_the_first_entry() {
        assert_eq!(
            classify(&provider(Some("rate_limited"), &["session_expired", "x"])).kind,
            AuthErrorKind::SessionExpired
        );
        assert_eq!(
            classify(&provider(Some("rate_limited"), &[])).kind,
            AuthErrorKind::RateLimited
        );
        assert_eq!(
            classify(&provider(None, &["unauthenticated"])).kind,
            AuthErrorKind::Unauthorized
        );
        assert_eq!(
            classify(&provider(None, &["brand_new_code"])).kind,
            AuthErrorKind::UnknownError
        );
        assert_eq!(
            classify(&provider(None, &[])).kind,
            AuthErrorKind::UnknownError
        );
    }

    #[test]
    fn exceptions_are_sniffed_for_network_failures() {
        let exception = |m: &str| RawAuthError::Exception {
            message: m.to_string(),
        };

        assert_eq!(
            classify(&exception("Failed to fetch")).kind,
            AuthErrorKind::NetworkError
        );
        assert_eq!(
            classify(&exception("NetworkError when attempting")).kind,
            AuthErrorKind::NetworkError
        );
        assert_eq!(
            classify(&exception("undefined is not a function")).kind,
            AuthErrorKind::UnknownError
        );
    }

    #[test]
    fn http_statuses_map_to_kinds() {
        let kind = |s| classify(&RawAuthError::HttpStatus(s)).kind;

        assert_eq!(kind(401), AuthErrorKind::Unauthorized);
        assert_eq!(kind(403), AuthErrorKind::PermissionDenied);
        assert_eq!(kind(404), AuthErrorKind::UserNotFound);
        assert_eq!(kind(429), AuthErrorKind::RateLimited);
        assert_eq!(kind(500), AuthErrorKind::NetworkError);
        assert_eq!(kind(503), AuthErrorKind::NetworkError);
        assert_eq!(kind(400), AuthErrorKind::UnknownError);
        assert_eq!(kind(200), AuthErrorKind::UnknownError);
        assert_eq!(
            classify(&RawAuthError::Unknown).kind,
            AuthErrorKind::UnknownError
        );
    }

    #[test]
    fn descriptors_are_consistent_with_retry_policy() {
        for kind in AuthErrorKind::ALL {
            let error = AuthError::for_kind(kind);
            assert_eq!(error.kind, kind);
            assert!(error.action.is_some());
            assert_eq!(error.can_retry, kind.base_retry_delay_ms() > 0, "{}", kind);
            if !error.can_retry {
                assert!(error.action_url.is_some(), "{}", kind);
            }
        }
    }

    #[test]
    fn retry_delay_backs_off_exponentially_with_a_cap() {
        assert_eq!(retry_delay(AuthErrorKind::NetworkError, 0), 1_000);
        assert_eq!(retry_delay(AuthErrorKind::NetworkError, 1), 1_000);
        assert_eq!(retry_delay(AuthErrorKind::NetworkError, 2), 2_000);
        assert_eq!(retry_delay(AuthErrorKind::NetworkError, 5), 16_000);
        assert_eq!(retry_delay(AuthErrorKind::NetworkError, 9), 16_000);
        assert_eq!(retry_delay(AuthErrorKind::RateLimited, 2), 120_000);
        assert_eq!(retry_delay(AuthErrorKind::UnknownError, 3), 12_000);
        assert_eq!(retry_delay(AuthErrorKind::SessionExpired, 3), 0);
        assert_eq!(retry_delay(AuthErrorKind::AccountDisabled, 1), 0);
    }

    #[test]
    fn descriptor_serializes_with_type_field() {
        let json = serde_json::to_value(AuthError::for_kind(AuthErrorKind::RateLimited)).unwrap();

        assert_eq!(json["type"], "RATE_LIMITED");
        assert_eq!(json["severity"], "warning");
        assert_eq!(json["canRetry"], true);
        assert!(json.get("actionUrl").is_none());
    }
}
