//! # Relay Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Build the Google and Paystack adapters
//! - Create the relay service
//! - Start the HTTP server

mod config;

use opentelemetry::global;
use opentelemetry_sdk::{propagation::TraceContextPropagator, trace as sdktrace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use relay_adapters::{GoogleIdTokenVerifier, PaystackGateway};
use relay_hex::{RelayService, inbound::HttpServer};

const OTLP_ENDPOINT_VAR: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";

fn init_tracer() -> anyhow::Result<(sdktrace::Tracer, sdktrace::SdkTracerProvider)> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    // gRPC exporter with batch processing; endpoint comes from the standard OTEL_* variables
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .build()?;

    let provider = sdktrace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .build();

    global::set_tracer_provider(provider.clone());

    use opentelemetry::trace::TracerProvider as _;
    Ok((provider.tracer("relay-service"), provider))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // OpenTelemetry only when a collector is configured
    let otel = match std::env::var(OTLP_ENDPOINT_VAR) {
        Ok(endpoint) if !endpoint.trim().is_empty() => Some(init_tracer()?),
        _ => None,
    };
    let telemetry = otel
        .as_ref()
        .map(|(tracer, _)| tracing_opentelemetry::layer().with_tracer(tracer.clone()));

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,relay_app=debug,relay_hex=debug,relay_adapters=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(telemetry)
        .init();

    // Load configuration
    let config = config::Config::from_env()?;

    tracing::info!(
        "Starting relay server on port {} ({})",
        config.port,
        config.app_env
    );
    tracing::debug!(
        paystack = %config.paystack.base_url,
        google_certs = %config.google.certs_url,
        "Upstream endpoints"
    );
    if otel.is_some() {
        tracing::info!("Exporting traces over OTLP");
    }

    // Build the outbound adapters
    let verifier = GoogleIdTokenVerifier::new(&config.google)?;
    let gateway = PaystackGateway::new(&config.paystack)?;

    // Create the relay service
    let service = RelayService::new(verifier, gateway);

    // Create and run the HTTP server
    let server = HttpServer::with_rate_limit(
        service,
        config.rate_limit_max_requests,
        config.rate_limit_window,
    );
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    // Ensure traces are flushed before exit
    if let Some((_, provider)) = otel {
        let _ = provider.shutdown();
    }
    Ok(())
}
