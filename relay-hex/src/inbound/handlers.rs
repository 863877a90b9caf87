//! HTTP request handlers.
//!
//! Every handler answers with an [`ApiResponse`] envelope, success or not.

use std::any::Any;
use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{FromRequest, Path, Request, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::json;

use relay_types::{
    ApiResponse, AppError, GoogleSignInRequest, IdentityVerifier, InitializePaymentRequest,
    PaymentGateway, WEBHOOK_SIGNATURE_HEADER, WebhookAck,
};

use crate::RelayService;

/// Application state shared across handlers.
pub struct AppState<V: IdentityVerifier, G: PaymentGateway> {
    pub service: RelayService<V, G>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ApiResponse::<()>::error(self.0.message(), self.0.detail());

        (status, Json(body)).into_response()
    }
}

/// JSON body extractor whose rejection is an error envelope instead of plain text.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(AppError::Validation {
                message: "Invalid JSON body".into(),
                detail: Some(rejection.body_text()),
            }
            .into()),
        }
    }
}

/// Lists the available endpoints.
pub async fn index() -> impl IntoResponse {
    Json(ApiResponse::success(
        "Google Sign-In & Paystack Payment API",
        json!({
            "endpoints": {
                "auth": {
                    "googleSignIn": "POST /auth/google"
                },
                "payment": {
                    "initialize": "POST /payment/initialize",
                    "verify": "GET /payment/verify/:reference",
                    "webhook": "POST /payment/webhook"
                }
            }
        }),
    ))
}

/// Sign in with a Google ID token.
#[tracing::instrument(skip_all)]
pub async fn google_sign_in<V: IdentityVerifier, G: PaymentGateway>(
    State(state): State<Arc<AppState<V, G>>>,
    ApiJson(req): ApiJson<GoogleSignInRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let claims = state.service.google_sign_in(req).await?;
    Ok(Json(ApiResponse::success(
        "Google authentication successful",
        claims,
    )))
}

/// Initialize a payment with the processor.
#[tracing::instrument(skip_all, fields(email = ?req.email))]
pub async fn initialize_payment<V: IdentityVerifier, G: PaymentGateway>(
    State(state): State<Arc<AppState<V, G>>>,
    ApiJson(req): ApiJson<InitializePaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let initialization = state.service.initialize_payment(req).await?;
    Ok(Json(ApiResponse::success(
        "Payment initialized successfully",
        initialization,
    )))
}

/// Verify a payment by reference.
#[tracing::instrument(skip_all, fields(reference = %reference))]
pub async fn verify_payment<V: IdentityVerifier, G: PaymentGateway>(
    State(state): State<Arc<AppState<V, G>>>,
    Path(reference): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state.service.verify_payment(&reference).await?;
    Ok(Json(ApiResponse::success(
        "Payment verification successful",
        record,
    )))
}

/// `GET /payment/verify` without a reference segment.
pub async fn missing_reference() -> ApiError {
    AppError::validation("Payment reference is required").into()
}

/// Receive a processor webhook.
#[tracing::instrument(skip_all)]
pub async fn payment_webhook<V: IdentityVerifier, G: PaymentGateway>(
    State(state): State<Arc<AppState<V, G>>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let signature = headers
        .get(WEBHOOK_SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    state.service.receive_webhook(&body, signature)?;
    Ok(Json(ApiResponse::success(
        "Webhook received",
        WebhookAck { received: true },
    )))
}

/// Fallback for unmatched routes and methods.
pub async fn not_found() -> ApiError {
    ApiError(AppError::NotFound)
}

/// Converts a handler panic into a 500 envelope.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    };

    tracing::error!("Unhandled error: {}", detail);
    ApiError(AppError::Internal(detail)).into_response()
}
