//! Data Transfer Objects (DTOs) for requests and responses.
//!
//! Request DTOs keep every field optional so that `{}` still deserializes;
//! `validate()` turns them into typed domain values or a validation error.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::domain::{PaymentAmount, PaymentInit};
use crate::error::{DomainError, IdentityError};

/// Currency used when a payment request does not name one.
pub const DEFAULT_CURRENCY: &str = "NGN";

// ─────────────────────────────────────────────────────────────────────────────
// Response Envelope
// ─────────────────────────────────────────────────────────────────────────────

/// Outcome marker of the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// The uniform wrapper around every response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: ResponseStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>, error: Option<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            message: message.into(),
            data: None,
            error,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Auth DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to sign in with a Google ID token.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct GoogleSignInRequest {
    /// ID token obtained by the client from Google Sign-In
    #[serde(default)]
    pub token: Option<String>,
}

impl GoogleSignInRequest {
    /// Returns the trimmed token, or `MissingToken` if it is absent or blank.
    pub fn validate(self) -> Result<String, IdentityError> {
        self.token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(IdentityError::MissingToken)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Payment DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to initialize a payment.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InitializePaymentRequest {
    /// Customer email address
    #[schema(example = "ada@example.com")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Amount in major units, as a number or numeric string
    #[schema(value_type = f64, example = 199.99)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Value>,
    /// ISO currency code, defaults to NGN
    #[schema(example = "NGN")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[schema(value_type = Object)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    /// Optional caller-chosen transaction reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Optional URL the processor redirects to after checkout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
}

impl InitializePaymentRequest {
    /// Validates the request into a [`PaymentInit`].
    pub fn validate(self) -> Result<PaymentInit, DomainError> {
        let email = non_blank(self.email);
        // A literal `0` or `false` counts as absent, not as a bad amount.
        let amount = self.amount.filter(|v| match v {
            Value::Null | Value::Bool(false) => false,
            Value::String(s) => !s.trim().is_empty(),
            Value::Number(n) => n.as_f64() != Some(0.0),
            _ => true,
        });

        let (Some(email), Some(amount)) = (email, amount) else {
            return Err(DomainError::Validation(
                "Email and amount are required".into(),
            ));
        };

        if !is_plausible_email(&email) {
            return Err(DomainError::Validation(format!(
                "Invalid email address: {}",
                email
            )));
        }

        let amount = PaymentAmount::parse(&amount)?;

        let currency = match non_blank(self.currency) {
            Some(code) if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) => {
                code.to_ascii_uppercase()
            }
            Some(code) => {
                return Err(DomainError::Validation(format!(
                    "Currency must be a three-letter ISO code, got '{}'",
                    code
                )));
            }
            None => DEFAULT_CURRENCY.to_string(),
        };

        let metadata = match self.metadata {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(map)) => map,
            Some(_) => {
                return Err(DomainError::Validation(
                    "Metadata must be a JSON object".into(),
                ));
            }
        };

        Ok(PaymentInit {
            email,
            amount,
            currency,
            metadata,
            reference: non_blank(self.reference),
            callback_url: non_blank(self.callback_url),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Webhook DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Acknowledgement returned to the processor for a webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WebhookAck {
    pub received: bool,
}
