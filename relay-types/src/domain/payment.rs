//! Payment processor types, reshaped to a stable contract.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use super::amount::{PaymentAmount, major_units};

/// A validated request to start a payment.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentInit {
    pub email: String,
    pub amount: PaymentAmount,
    pub currency: String,
    pub metadata: Map<String, Value>,
    /// Caller-chosen transaction reference; the processor generates one when absent.
    pub reference: Option<String>,
    pub callback_url: Option<String>,
}

/// The processor's answer to an initialization, passed through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaymentInitialization {
    /// Checkout page the customer must be sent to
    #[schema(example = "https://checkout.paystack.com/0peioxfhpn")]
    pub authorization_url: String,
    #[schema(example = "0peioxfhpn")]
    pub access_code: String,
    #[schema(example = "7PVGX8MEk85tgeEpVDtD")]
    pub reference: String,
}

/// Transaction status as reported by the processor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentStatus {
    Pending,
    Success,
    Failed,
    Abandoned,
    Reversed,
    Ongoing,
    Processing,
    Queued,
    Other(String),
}

impl PaymentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Success => "success",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Abandoned => "abandoned",
            PaymentStatus::Reversed => "reversed",
            PaymentStatus::Ongoing => "ongoing",
            PaymentStatus::Processing => "processing",
            PaymentStatus::Queued => "queued",
            PaymentStatus::Other(s) => s,
        }
    }
}

impl From<String> for PaymentStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "pending" => PaymentStatus::Pending,
            "success" => PaymentStatus::Success,
            "failed" => PaymentStatus::Failed,
            "abandoned" => PaymentStatus::Abandoned,
            "reversed" => PaymentStatus::Reversed,
            "ongoing" => PaymentStatus::Ongoing,
            "processing" => PaymentStatus::Processing,
            "queued" => PaymentStatus::Queued,
            _ => PaymentStatus::Other(s),
        }
    }
}

impl From<PaymentStatus> for String {
    fn from(status: PaymentStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Customer attached to a verified payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Customer {
    #[schema(example = "ada@example.com")]
    pub email: String,
}

/// A verified payment, keeping only the fields clients rely on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    #[schema(example = "7PVGX8MEk85tgeEpVDtD")]
    pub reference: String,
    /// Amount in major currency units
    #[serde(with = "major_units")]
    #[schema(value_type = f64, example = 199.99)]
    pub amount: Decimal,
    #[schema(example = "NGN")]
    pub currency: String,
    #[schema(value_type = String, example = "success")]
    pub status: PaymentStatus,
    pub paid_at: Option<DateTime<Utc>>,
    #[schema(example = "card")]
    pub channel: Option<String>,
    pub customer: Customer,
    #[schema(value_type = Object)]
    pub metadata: Value,
}

/// Header the processor puts the webhook body signature in.
pub const WEBHOOK_SIGNATURE_HEADER: &str = "x-paystack-signature";

/// An event notification posted by the processor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookEvent {
    pub event: String,
    #[serde(default)]
    pub data: Value,
}

impl WebhookEvent {
    /// Returns the transaction reference carried by the event, if any.
    pub fn reference(&self) -> Option<&str> {
        self.data.get("reference").and_then(Value::as_str)
    }
}
