//! Error types for the relay.

/// Domain-level errors (input that violates a business rule).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("{0}")]
    Validation(String),
}

/// Identity verification errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    #[error("Google ID token is required")]
    MissingToken,

    /// The verifier rejected the token; the payload is the verifier's diagnostic.
    #[error("{0}")]
    InvalidToken(String),
}

/// Payment processor adapter errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("Payment processor did not respond in time")]
    Timeout,

    #[error("Payment processor unreachable: {0}")]
    Transport(String),

    /// Non-2xx answer; `message` is the processor's own message when it sent one.
    #[error("{message}")]
    Upstream { status: u16, message: String },

    #[error("Malformed payment processor response: {detail}")]
    MalformedResponse { status: Option<u16>, detail: String },
}

impl GatewayError {
    /// HTTP status to answer with: mirrored when the processor gave one.
    pub fn status_code(&self) -> u16 {
        match self {
            GatewayError::Timeout => 504,
            GatewayError::Transport(_) => 500,
            GatewayError::Upstream { status, .. } => *status,
            GatewayError::MalformedResponse { .. } => 500,
        }
    }
}

/// Application-level errors (for HTTP responses).
///
/// Maps cleanly to HTTP status codes and to the error envelope.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Validation {
        message: String,
        detail: Option<String>,
    },

    #[error("{message}: {detail}")]
    Authentication { message: String, detail: String },

    #[error("{message}: {detail}")]
    Upstream {
        status: u16,
        message: String,
        detail: String,
    },

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Endpoint not found")]
    NotFound,

    #[error("Too many requests from this IP, please try again later.")]
    RateLimited,
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation {
            message: message.into(),
            detail: None,
        }
    }

    /// Wraps an adapter failure with the name of the operation that failed.
    pub fn upstream(message: impl Into<String>, err: GatewayError) -> Self {
        AppError::Upstream {
            status: err.status_code(),
            message: message.into(),
            detail: err.to_string(),
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            AppError::Validation { .. } => 400,
            AppError::Authentication { .. } => 401,
            AppError::Upstream { status, .. } => *status,
            AppError::Internal(_) => 500,
            AppError::NotFound => 404,
            AppError::RateLimited => 429,
        }
    }

    /// The client-facing message of the envelope.
    pub fn message(&self) -> String {
        match self {
            AppError::Validation { message, .. }
            | AppError::Authentication { message, .. }
            | AppError::Upstream { message, .. } => message.clone(),
            AppError::Internal(_) => "Internal server error".into(),
            other => other.to_string(),
        }
    }

    /// The diagnostic placed in the envelope's `error` field.
    pub fn detail(&self) -> Option<String> {
        match self {
            AppError::Validation { detail, .. } => detail.clone(),
            AppError::Authentication { detail, .. } | AppError::Upstream { detail, .. } => {
                Some(detail.clone())
            }
            AppError::Internal(detail) => Some(detail.clone()),
            AppError::NotFound | AppError::RateLimited => None,
        }
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidAmount(detail) => AppError::Validation {
                message: "Amount must be a positive number".into(),
                detail: Some(detail),
            },
            DomainError::Validation(msg) => AppError::validation(msg),
        }
    }
}

impl From<IdentityError> for AppError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::MissingToken => AppError::validation(err.to_string()),
            IdentityError::InvalidToken(detail) => AppError::Authentication {
                message: "Invalid Google token".into(),
                detail,
            },
        }
    }
}
