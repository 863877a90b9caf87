//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use relay_types::{
    Customer, GoogleSignInRequest, IdentityClaims, InitializePaymentRequest,
    PaymentInitialization, PaymentRecord, ResponseStatus, WebhookAck,
};
use utoipa::OpenApi;

// Dummy functions to generate path documentation
// These are not the actual handlers, just for OpenAPI path generation

/// List available endpoints
#[utoipa::path(
    get,
    path = "/",
    tag = "meta",
    responses(
        (status = 200, description = "Endpoint listing", body = inline(serde_json::Value))
    )
)]
async fn index() {}

/// Sign in with a Google ID token
#[utoipa::path(
    post,
    path = "/auth/google",
    tag = "auth",
    request_body = GoogleSignInRequest,
    responses(
        (status = 200, description = "Token verified; `data` holds the claims", body = IdentityClaims),
        (status = 400, description = "Token missing"),
        (status = 401, description = "Token rejected by Google verification")
    )
)]
async fn google_sign_in() {}

/// Initialize a payment
#[utoipa::path(
    post,
    path = "/payment/initialize",
    tag = "payment",
    request_body = InitializePaymentRequest,
    responses(
        (status = 200, description = "Payment initialized; `data` holds the checkout details", body = PaymentInitialization),
        (status = 400, description = "Email or amount missing or invalid"),
        (status = 504, description = "Payment processor timed out")
    )
)]
async fn initialize_payment() {}

/// Verify a payment
#[utoipa::path(
    get,
    path = "/payment/verify/{reference}",
    tag = "payment",
    params(
        ("reference" = String, Path, description = "Transaction reference")
    ),
    responses(
        (status = 200, description = "Payment found; `data` holds the record", body = PaymentRecord),
        (status = 404, description = "Processor does not know the reference")
    )
)]
async fn verify_payment() {}

/// Receive a Paystack webhook
#[utoipa::path(
    post,
    path = "/payment/webhook",
    tag = "payment",
    params(
        ("x-paystack-signature" = String, Header, description = "HMAC-SHA512 of the body")
    ),
    responses(
        (status = 200, description = "Event accepted", body = WebhookAck),
        (status = 401, description = "Signature missing or invalid")
    )
)]
async fn payment_webhook() {}

/// OpenAPI documentation for the relay API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Google Sign-In & Paystack Payment API",
        version = "0.1.0",
        description = "Relay exposing Google ID token verification and Paystack payments. Every response is a `{status, message, data?, error?}` envelope."
    ),
    paths(
        index,
        google_sign_in,
        initialize_payment,
        verify_payment,
        payment_webhook,
    ),
    components(
        schemas(
            ResponseStatus,
            GoogleSignInRequest,
            IdentityClaims,
            InitializePaymentRequest,
            PaymentInitialization,
            PaymentRecord,
            Customer,
            WebhookAck,
        )
    ),
    tags(
        (name = "meta", description = "Service information"),
        (name = "auth", description = "Google Sign-In"),
        (name = "payment", description = "Paystack payments")
    )
)]
pub struct ApiDoc;
