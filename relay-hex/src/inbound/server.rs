//! HTTP Server configuration and startup.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    Json, Router,
    http::{HeaderValue, header},
    middleware,
    routing::{get, post},
};
use tower_http::{
    catch_panic::CatchPanicLayer, cors::CorsLayer, set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;

use relay_types::{ApiResponse, IdentityVerifier, PaymentGateway};

use super::handlers::{self, AppState};
use super::rate_limit::{RateLimiterState, rate_limit_middleware};
use crate::{RelayService, openapi::ApiDoc};

/// HTTP Server for the relay API.
pub struct HttpServer<V: IdentityVerifier, G: PaymentGateway> {
    state: Arc<AppState<V, G>>,
    rate_limiter: Arc<RateLimiterState>,
}

impl<V: IdentityVerifier, G: PaymentGateway> HttpServer<V, G> {
    /// Creates a new HTTP server with the given service.
    pub fn new(service: RelayService<V, G>) -> Self {
        Self {
            state: Arc::new(AppState { service }),
            rate_limiter: Arc::new(RateLimiterState::default()), // 100 req / 15 min default
        }
    }

    /// Creates a new HTTP server with custom rate limiting.
    pub fn with_rate_limit(service: RelayService<V, G>, requests: u32, window: Duration) -> Self {
        Self {
            state: Arc::new(AppState { service }),
            rate_limiter: Arc::new(RateLimiterState::new(requests, window)),
        }
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        let router = Router::new()
            .route("/", get(handlers::index))
            .route("/openapi.json", get(openapi_document))
            .route("/auth/google", post(handlers::google_sign_in::<V, G>))
            .route(
                "/payment/initialize",
                post(handlers::initialize_payment::<V, G>),
            )
            .route("/payment/verify", get(handlers::missing_reference))
            .route(
                "/payment/verify/{reference}",
                get(handlers::verify_payment::<V, G>),
            )
            .route("/payment/webhook", post(handlers::payment_webhook::<V, G>))
            .fallback(handlers::not_found)
            .method_not_allowed_fallback(handlers::not_found);

        #[cfg(feature = "otel-metrics")]
        let router = router.layer(axum_otel_metrics::HttpMetricsLayerBuilder::new().build());

        router
            .layer(middleware::from_fn_with_state(
                self.rate_limiter.clone(),
                rate_limit_middleware,
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::X_FRAME_OPTIONS,
                HeaderValue::from_static("SAMEORIGIN"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::REFERRER_POLICY,
                HeaderValue::from_static("no-referrer"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::X_DNS_PREFETCH_CONTROL,
                HeaderValue::from_static("off"),
            ))
            .layer(CorsLayer::permissive())
            .layer(CatchPanicLayer::custom(handlers::handle_panic))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        axum::serve(
            listener,
            self.router()
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        Ok(())
    }
}

async fn openapi_document() -> Json<ApiResponse<utoipa::openapi::OpenApi>> {
    Json(ApiResponse::success("OpenAPI document", ApiDoc::openapi()))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
