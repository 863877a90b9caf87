//! Payment gateway port.
//!
//! Adapters issue exactly one outbound call per operation and never retry:
//! initialization is not safe to repeat without reference deduplication.

use crate::domain::{PaymentInit, PaymentInitialization, PaymentRecord};
use crate::error::GatewayError;

/// The payment processor as seen by the application layer.
#[async_trait::async_trait]
pub trait PaymentGateway: Send + Sync + 'static {
    /// Starts a transaction; the amount is sent in minor units.
    async fn initialize(&self, init: &PaymentInit) -> Result<PaymentInitialization, GatewayError>;

    /// Looks up a transaction by reference, reshaped to [`PaymentRecord`].
    async fn verify(&self, reference: &str) -> Result<PaymentRecord, GatewayError>;

    /// Checks a webhook signature against the raw request body.
    fn verify_webhook_signature(&self, payload: &[u8], signature: &str) -> bool;
}
