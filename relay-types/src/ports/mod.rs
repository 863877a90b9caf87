//! Port traits (interfaces for adapters).
//!
//! These are the contracts that outbound adapters must implement.
//! The application layer depends on these traits, not concrete implementations.

mod gateway;
mod identity;

pub use gateway::PaymentGateway;
pub use identity::IdentityVerifier;
