//! Domain models for the relay.

pub mod amount;
pub mod identity;
pub mod payment;

pub use amount::{PaymentAmount, to_decimal, to_minor_units};
pub use identity::IdentityClaims;
pub use payment::{
    Customer, PaymentInit, PaymentInitialization, PaymentRecord, PaymentStatus,
    WEBHOOK_SIGNATURE_HEADER, WebhookEvent,
};
