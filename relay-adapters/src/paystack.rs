//! Paystack payment gateway adapter.
//!
//! Each operation is a single authenticated HTTPS call; failures are mapped to
//! [`GatewayError`] and never retried.

use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

use relay_types::{
    Customer, GatewayError, PaymentGateway, PaymentInit, PaymentInitialization, PaymentRecord,
    PaymentStatus, to_decimal,
};

use crate::{AdapterError, PaystackConfig, security};

/// Paystack's public API base URL.
pub const PAYSTACK_BASE_URL: &str = "https://api.paystack.co";

/// Paystack wraps every payload as `{ status, message, data }`.
#[derive(Debug, Deserialize)]
struct PaystackEnvelope<T> {
    #[serde(default)]
    message: Option<String>,
    data: Option<T>,
}

#[derive(Debug, Serialize)]
struct InitializeBody<'a> {
    email: &'a str,
    amount: i64,
    currency: &'a str,
    metadata: &'a Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reference: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    callback_url: Option<&'a str>,
}

/// The subset of Paystack's transaction object the relay keeps.
#[derive(Debug, Deserialize)]
struct PaystackTransaction {
    reference: String,
    amount: i64,
    currency: String,
    status: PaymentStatus,
    #[serde(default)]
    paid_at: Option<DateTime<Utc>>,
    #[serde(default)]
    channel: Option<String>,
    customer: PaystackCustomer,
    #[serde(default)]
    metadata: Value,
}

#[derive(Debug, Deserialize)]
struct PaystackCustomer {
    email: String,
}

impl From<PaystackTransaction> for PaymentRecord {
    fn from(tx: PaystackTransaction) -> Self {
        PaymentRecord {
            reference: tx.reference,
            amount: to_decimal(tx.amount),
            currency: tx.currency,
            status: tx.status,
            paid_at: tx.paid_at,
            channel: tx.channel,
            customer: Customer {
                email: tx.customer.email,
            },
            metadata: tx.metadata,
        }
    }
}

/// Paystack REST client implementing [`PaymentGateway`].
pub struct PaystackGateway {
    http: Client,
    base_url: Url,
    secret_key: SecretString,
}

impl PaystackGateway {
    /// Creates a gateway from the configuration.
    pub fn new(config: &PaystackConfig) -> Result<Self, AdapterError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| AdapterError::InvalidUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AdapterError::InvalidUrl {
                url: config.base_url.clone(),
                reason: "URL cannot be a base".into(),
            });
        }

        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            base_url,
            secret_key: SecretString::new(config.secret_key.expose_secret().clone()),
        })
    }

    /// Appends path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, GatewayError> {
        let response = request
            .bearer_auth(self.secret_key.expose_secret())
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(transport_error)?;

        if !status.is_success() {
            let message = serde_json::from_slice::<PaystackEnvelope<Value>>(&body)
                .ok()
                .and_then(|envelope| envelope.message)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("Request failed")
                        .to_string()
                });
            warn!(status = status.as_u16(), %message, "Paystack rejected request");
            return Err(GatewayError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: PaystackEnvelope<T> =
            serde_json::from_slice(&body).map_err(|e| GatewayError::MalformedResponse {
                status: Some(status.as_u16()),
                detail: e.to_string(),
            })?;

        envelope.data.ok_or_else(|| GatewayError::MalformedResponse {
            status: Some(status.as_u16()),
            detail: "response has no data".into(),
        })
    }
}

fn transport_error(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::Transport(err.to_string())
    }
}

#[async_trait::async_trait]
impl PaymentGateway for PaystackGateway {
    #[instrument(skip(self, init), fields(amount = init.amount.minor_units(), currency = %init.currency))]
    async fn initialize(&self, init: &PaymentInit) -> Result<PaymentInitialization, GatewayError> {
        let body = InitializeBody {
            email: &init.email,
            amount: init.amount.minor_units(),
            currency: &init.currency,
            metadata: &init.metadata,
            reference: init.reference.as_deref(),
            callback_url: init.callback_url.as_deref(),
        };

        let request = self
            .http
            .post(self.endpoint(&["transaction", "initialize"]))
            .json(&body);
        let initialization: PaymentInitialization = self.send(request).await?;

        debug!(reference = %initialization.reference, "Paystack transaction initialized");
        Ok(initialization)
    }

    #[instrument(skip(self))]
    async fn verify(&self, reference: &str) -> Result<PaymentRecord, GatewayError> {
        let request = self
            .http
            .get(self.endpoint(&["transaction", "verify", reference]));
        let transaction: PaystackTransaction = self.send(request).await?;

        debug!(status = %transaction.status, "Paystack transaction verified");
        Ok(transaction.into())
    }

    fn verify_webhook_signature(&self, payload: &[u8], signature: &str) -> bool {
        security::verify_webhook_signature(payload, signature, self.secret_key.expose_secret())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway(base_url: &str) -> PaystackGateway {
        let config = PaystackConfig {
            base_url: base_url.into(),
            ..PaystackConfig::new("sk_test_123")
        };
        PaystackGateway::new(&config).unwrap()
    }

    #[test]
    fn test_endpoint_encodes_reference_as_one_segment() {
        let gateway = gateway("https://api.paystack.co");
        let url = gateway.endpoint(&["transaction", "verify", "a/b c"]);
        assert_eq!(
            url.as_str(),
            "https://api.paystack.co/transaction/verify/a%2Fb%20c"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let gateway = gateway("http://localhost:8080/paystack/");
        let url = gateway.endpoint(&["transaction", "initialize"]);
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/paystack/transaction/initialize"
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let config = PaystackConfig {
            base_url: "not a url".into(),
            ..PaystackConfig::new("sk_test_123")
        };
        assert!(matches!(
            PaystackGateway::new(&config),
            Err(AdapterError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_transaction_reshaping_drops_extra_fields() {
        let tx: PaystackTransaction = serde_json::from_value(serde_json::json!({
            "id": 4099260516u64,
            "domain": "test",
            "status": "success",
            "reference": "re4lyvq3s3",
            "amount": 19999,
            "gateway_response": "Successful",
            "paid_at": "2024-08-22T09:15:02.000Z",
            "channel": "card",
            "currency": "NGN",
            "metadata": "",
            "customer": { "id": 181873746, "email": "ada@example.com" },
            "authorization": { "bin": "408408" }
        }))
        .unwrap();

        let record: PaymentRecord = tx.into();
        assert_eq!(record.amount, to_decimal(19999));
        assert_eq!(record.status, PaymentStatus::Success);
        assert_eq!(record.customer.email, "ada@example.com");
        assert!(record.paid_at.is_some());
    }
}
