//! Relay Application Service
//!
//! Validates requests and drives the outbound ports.
//! Contains NO infrastructure logic - validation, orchestration and error mapping only.

use tracing::{info, warn};

use relay_types::{
    AppError, GoogleSignInRequest, IdentityClaims, IdentityVerifier, InitializePaymentRequest,
    PaymentGateway, PaymentInitialization, PaymentRecord, WebhookEvent,
};

/// Application service for sign-in and payment operations.
///
/// Generic over the two ports - the adapters are injected at compile time.
/// Validation always runs before any outbound call is made.
pub struct RelayService<V: IdentityVerifier, G: PaymentGateway> {
    verifier: V,
    gateway: G,
}

impl<V: IdentityVerifier, G: PaymentGateway> RelayService<V, G> {
    /// Creates a new relay service with the given adapters.
    pub fn new(verifier: V, gateway: G) -> Self {
        Self { verifier, gateway }
    }

    /// Returns a reference to the identity verifier.
    pub fn verifier(&self) -> &V {
        &self.verifier
    }

    /// Returns a reference to the payment gateway.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Identity
    // ─────────────────────────────────────────────────────────────────────────────

    /// Verifies a Google ID token and returns the signed-in user's claims.
    pub async fn google_sign_in(&self, req: GoogleSignInRequest) -> Result<IdentityClaims, AppError> {
        let token = req.validate()?;

        self.verifier.verify(&token).await.map_err(|e| {
            warn!("Google authentication error: {}", e);
            e.into()
        })
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Payments
    // ─────────────────────────────────────────────────────────────────────────────

    /// Starts a payment with the processor.
    pub async fn initialize_payment(
        &self,
        req: InitializePaymentRequest,
    ) -> Result<PaymentInitialization, AppError> {
        let init = req.validate()?;

        self.gateway.initialize(&init).await.map_err(|e| {
            warn!("Paystack initialization error: {}", e);
            AppError::upstream("Failed to initialize payment", e)
        })
    }

    /// Looks up a payment by reference.
    pub async fn verify_payment(&self, reference: &str) -> Result<PaymentRecord, AppError> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(AppError::validation("Payment reference is required"));
        }

        self.gateway.verify(reference).await.map_err(|e| {
            warn!("Paystack verification error: {}", e);
            AppError::upstream("Failed to verify payment", e)
        })
    }

    /// Authenticates and parses a webhook delivery from the processor.
    pub fn receive_webhook(
        &self,
        payload: &[u8],
        signature: Option<&str>,
    ) -> Result<WebhookEvent, AppError> {
        let signature = signature
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::Authentication {
                message: "Invalid webhook signature".into(),
                detail: "Missing signature header".into(),
            })?;

        if !self.gateway.verify_webhook_signature(payload, signature) {
            warn!("Rejected webhook with bad signature");
            return Err(AppError::Authentication {
                message: "Invalid webhook signature".into(),
                detail: "Signature does not match payload".into(),
            });
        }

        let event: WebhookEvent =
            serde_json::from_slice(payload).map_err(|e| AppError::Validation {
                message: "Invalid webhook payload".into(),
                detail: Some(e.to_string()),
            })?;

        info!(
            event = %event.event,
            reference = event.reference().unwrap_or("-"),
            "Paystack webhook received"
        );
        Ok(event)
    }
}
