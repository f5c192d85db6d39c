use opentelemetry::KeyValue;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::{WithExportConfig, WithHttpConfig};
use opentelemetry_sdk::trace::SdkTracerProvider;
use std::collections::HashMap;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub headers: HashMap<String, String>,
    pub service_name: String,
}

impl TelemetryConfig {
    pub fn from_env() -> Self {
        let enabled = std::env::var("OTEL_ENABLED")
            .unwrap_or_else(|_| "false".to_string())
            .parse()
            .unwrap_or(false);

        let endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .unwrap_or_else(|_| "http://localhost:4318".to_string());

        let service_name =
            std::env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| "mockbird".to_string());

        let mut headers = HashMap::new();
        if let Ok(raw) = std::env::var("OTEL_EXPORTER_OTLP_HEADERS") {
            // "key=value,key2=value2"
            for pair in raw.split(',') {
                if let Some((name, value)) = pair.split_once('=') {
                    headers.insert(name.trim().to_string(), value.trim().to_string());
                }
            }
        }

        Self {
            enabled,
            endpoint,
            headers,
            service_name,
        }
    }
}

/// Keeps the tracer provider alive and flushes it on shutdown.
pub struct TelemetryGuard {
    provider: Option<SdkTracerProvider>,
}

impl TelemetryGuard {
    fn new(provider: Option<SdkTracerProvider>) -> Self {
        Self { provider }
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.provider.take() {
            tracing::info!("Shutting down telemetry...");
            if let Err(err) = provider.shutdown() {
                eprintln!("Failed to shut down tracer provider: {}", err);
            }
        }
    }
}

pub fn init_telemetry() -> crate::Result<TelemetryGuard> {
    let config = TelemetryConfig::from_env();

    if config.enabled {
        match init_with_otel(&config) {
            Ok(provider) => return Ok(TelemetryGuard::new(Some(provider))),
            Err(err) => {
                eprintln!(
                    "Failed to initialize OpenTelemetry: {}. Falling back to stdout-only logging.",
                    err
                );
                init_stdout_only();
            }
        }
    } else {
        init_stdout_only();
    }

    Ok(TelemetryGuard::new(None))
}

fn init_with_otel(config: &TelemetryConfig) -> crate::Result<SdkTracerProvider> {
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .map_err(|e| {
            crate::MockbirdError::TelemetryError(format!("Failed to build HTTP client: {}", e))
        })?;

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_http()
        .with_http_client(client)
        .with_endpoint(&config.endpoint)
        .with_protocol(opentelemetry_otlp::Protocol::HttpBinary)
        .with_timeout(std::time::Duration::from_secs(5))
        .with_headers(config.headers.clone())
        .build()
        .map_err(|e| {
            crate::MockbirdError::TelemetryError(format!("Failed to build OTLP exporter: {}", e))
        })?;

    let resource = opentelemetry_sdk::Resource::builder_empty()
        .with_service_name(config.service_name.clone())
        .with_attributes([KeyValue::new("service.version", env!("CARGO_PKG_VERSION"))])
        .build();

    let provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(resource)
        .build();

    let tracer = provider.tracer("mockbird");

    opentelemetry::global::set_tracer_provider(provider.clone());

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("mockbird=info,tower_http=info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_line_number(true);

    let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(otel_layer)
        .init();

    tracing::info!(
        "OpenTelemetry initialized with endpoint: {}",
        config.endpoint
    );
    Ok(provider)
}

fn init_stdout_only() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("mockbird=info,tower_http=info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .init();

    tracing::info!("Tracing initialized (stdout only, OpenTelemetry disabled)");
}
