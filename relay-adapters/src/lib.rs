//! # Relay Adapters
//!
//! Concrete outbound adapters for the relay.
//! This crate provides the HTTP-backed implementations of the
//! `IdentityVerifier` and `PaymentGateway` ports.
//!
//! - `google` - Google ID token verification against Google's published keys
//! - `paystack` - Paystack transaction initialize / verify
//! - `security` - Webhook signature checks

pub mod config;
pub mod google;
pub mod paystack;
pub mod security;

pub use config::{GoogleConfig, PaystackConfig};
pub use google::GoogleIdTokenVerifier;
pub use paystack::PaystackGateway;

/// Errors raised while constructing an adapter.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}
