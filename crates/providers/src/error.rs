use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Local, pre-network parameter failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Unsupported protocol: {0}")]
    UnsupportedProtocol(String),

    #[error("Invalid IP address format: {0}")]
    InvalidIpFormat(String),

    #[error("Field '{0}' must not be empty")]
    EmptyField(&'static str),

    #[error("Invalid schema '{0}', expected one of person, company, vessel, aircraft, crypto")]
    InvalidSchema(String),

    #[error("Invalid scope '{0}', expected basic or full")]
    InvalidScope(String),

    #[error("Invalid nationality '{0}', expected a 2-letter ISO 3166-1 country code")]
    InvalidNationality(String),

    #[error("Invalid birth year '{0}', expected a year between 1000 and 9999")]
    InvalidBirthYear(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Tool not found: {0}")]
    UnknownTool(String),
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedProtocol(_) => "UnsupportedProtocol",
            Self::InvalidIpFormat(_) => "InvalidIpFormat",
            Self::EmptyField(_) => "EmptyField",
            Self::InvalidSchema(_) => "InvalidSchema",
            Self::InvalidScope(_) => "InvalidScope",
            Self::InvalidNationality(_) => "InvalidNationality",
            Self::InvalidBirthYear(_) => "InvalidBirthYear",
            Self::InvalidArguments(_) => "InvalidArguments",
            Self::UnknownTool(_) => "UnknownTool",
        }
    }
}

/// Every way a screening call can fail.
///
/// The set is closed: callers branch on [`ScreeningError::kind`] rather than
/// parsing messages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScreeningError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Authentication failed (HTTP {status}): {message}")]
    Authentication { status: u16, message: String },

    #[error("Rate limited by provider: {message}")]
    RateLimited {
        retry_after: Option<String>,
        message: String,
    },

    #[error("Provider rejected the request (HTTP {status}): {detail}")]
    InvalidRequest { status: u16, detail: String },

    #[error("Provider unavailable (HTTP {status}): {message}")]
    ProviderUnavailable { status: u16, message: String },

    #[error("Provider error (HTTP {status}): {message}")]
    Provider { status: u16, message: String },

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {timeout_ms}ms")]
    NetworkTimeout { timeout_ms: u64 },
}

/// Stable error vocabulary exposed to the calling agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    ValidationError,
    AuthenticationError,
    RateLimited,
    InvalidRequest,
    ProviderUnavailable,
    ProviderError,
    MalformedResponse,
    NetworkError,
    NetworkTimeout,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "ValidationError",
            Self::AuthenticationError => "AuthenticationError",
            Self::RateLimited => "RateLimited",
            Self::InvalidRequest => "InvalidRequest",
            Self::ProviderUnavailable => "ProviderUnavailable",
            Self::ProviderError => "ProviderError",
            Self::MalformedResponse => "MalformedResponse",
            Self::NetworkError => "NetworkError",
            Self::NetworkTimeout => "NetworkTimeout",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured error object returned to the agent in place of a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub kind: ErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<String>,
}

impl ScreeningError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::ValidationError,
            Self::Authentication { .. } => ErrorKind::AuthenticationError,
            Self::RateLimited { .. } => ErrorKind::RateLimited,
            Self::InvalidRequest { .. } => ErrorKind::InvalidRequest,
            Self::ProviderUnavailable { .. } => ErrorKind::ProviderUnavailable,
            Self::Provider { .. } => ErrorKind::ProviderError,
            Self::MalformedResponse(_) => ErrorKind::MalformedResponse,
            Self::Network(_) => ErrorKind::NetworkError,
            Self::NetworkTimeout { .. } => ErrorKind::NetworkTimeout,
        }
    }

    /// Validation sub-kind, e.g. `UnsupportedProtocol`.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::Validation(e) => Some(e.code()),
            _ => None,
        }
    }

    /// HTTP status reported by the provider, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { status, .. }
            | Self::InvalidRequest { status, .. }
            | Self::ProviderUnavailable { status, .. }
            | Self::Provider { status, .. } => Some(*status),
            Self::RateLimited { .. } => Some(429),
            _ => None,
        }
    }

    pub fn retry_after(&self) -> Option<&str> {
        match self {
            Self::RateLimited { retry_after, .. } => retry_after.as_deref(),
            _ => None,
        }
    }

    /// Whether the failure happened before any network I/O.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Replaces every occurrence of `secret` in the carried messages.
    pub fn redact(self, secret: &str) -> Self {
        if secret.is_empty() {
            return self;
        }
        let scrub = |s: String| s.replace(secret, "[REDACTED]");
        match self {
            Self::Authentication { status, message } => Self::Authentication {
                status,
                message: scrub(message),
            },
            Self::RateLimited {
                retry_after,
                message,
            } => Self::RateLimited {
                retry_after,
                message: scrub(message),
            },
            Self::InvalidRequest { status, detail } => Self::InvalidRequest {
                status,
                detail: scrub(detail),
            },
            Self::ProviderUnavailable { status, message } => Self::ProviderUnavailable {
                status,
                message: scrub(message),
            },
            Self::Provider { status, message } => Self::Provider {
                status,
                message: scrub(message),
            },
            Self::MalformedResponse(m) => Self::MalformedResponse(scrub(m)),
            Self::Network(m) => Self::Network(scrub(m)),
            other => other,
        }
    }

    pub fn to_payload(&self) -> ErrorPayload {
        ErrorPayload {
            kind: self.kind(),
            code: self.code().map(str::to_string),
            message: self.to_string(),
            status: self.status(),
            retry_after: self.retry_after().map(str::to_string),
        }
    }
}
