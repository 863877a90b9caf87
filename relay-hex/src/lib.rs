//! # Relay Hex
//!
//! Application service layer and HTTP adapter for the sign-in & payment relay.
//!
//! ## Architecture
//!
//! - `service/` - Application service (validates input, drives the ports)
//! - `inbound/` - HTTP adapter (Axum server)
//! - `openapi/` - OpenAPI document of the HTTP surface
//!
//! The service is generic over `V: IdentityVerifier` and `G: PaymentGateway`,
//! allowing different adapter implementations to be injected.

pub mod inbound;
pub mod openapi;
pub mod service;


pub use service::RelayService;
