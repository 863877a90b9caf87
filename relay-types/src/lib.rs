//! # Relay Types
//!
//! Domain types and port traits for the sign-in & payment relay.
//! This crate has ZERO external IO dependencies - only data structures,
//! conversion rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pure domain types (PaymentAmount, IdentityClaims, PaymentRecord)
//! - `ports/` - Trait definitions that outbound adapters must implement
//! - `dto/` - Request DTOs and the response envelope
//! - `error/` - Domain, adapter and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    Customer, IdentityClaims, PaymentAmount, PaymentInit, PaymentInitialization, PaymentRecord,
    PaymentStatus, WEBHOOK_SIGNATURE_HEADER, WebhookEvent, to_decimal, to_minor_units,
};
pub use dto::*;
pub use error::{AppError, DomainError, GatewayError, IdentityError};
pub use ports::{IdentityVerifier, PaymentGateway};
