//! Adapter configuration.
//!
//! Built once at startup and handed to the adapter constructors by reference.

use std::time::Duration;

use secrecy::SecretString;

use crate::google::GOOGLE_CERTS_URL;
use crate::paystack::PAYSTACK_BASE_URL;

/// Default bound on every outbound request.
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(15);

/// Google identity settings.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    /// OAuth client id; ID tokens must carry it as their audience.
    pub client_id: String,
    /// JWKS endpoint publishing Google's signing keys.
    pub certs_url: String,
    pub timeout: Duration,
}

impl GoogleConfig {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            certs_url: GOOGLE_CERTS_URL.to_string(),
            timeout: DEFAULT_UPSTREAM_TIMEOUT,
        }
    }
}

/// Paystack settings. The secret key is never logged.
#[derive(Debug)]
pub struct PaystackConfig {
    pub secret_key: SecretString,
    pub base_url: String,
    pub timeout: Duration,
}

impl PaystackConfig {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: SecretString::new(secret_key.into()),
            base_url: PAYSTACK_BASE_URL.to_string(),
            timeout: DEFAULT_UPSTREAM_TIMEOUT,
        }
    }
}
