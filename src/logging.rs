use crate::app_env::{self, OtelEndpoints};
use anyhow::Context;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::{KeyValue, global};
use opentelemetry_http::HeaderExtractor;
use opentelemetry_otlp::{MetricExporter, SpanExporter, WithExportConfig};
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::TracerProvider;
use opentelemetry_sdk::{Resource, runtime};
use std::time::Duration;
use tracing::level_filters::LevelFilter;
use tracing::{Span, debug, debug_span, field, warn};
use tracing_opentelemetry::{MetricsLayer, OpenTelemetryLayer, OpenTelemetrySpanExt};
use tracing_subscriber::{EnvFilter, prelude::*, registry};
use tower_http::trace::TraceLayer;

/// The name of the service as it should appear in OpenTelemetry collectors
const SERVICE_NAME: &str = "todo-rest";

/// OpenTelemetry providers which export spans and metrics in the background
pub struct OtelExporters {
    tracer_provider: TracerProvider,
    meter_provider: SdkMeterProvider,
}

impl OtelExporters {
    /// Flushes anything still buffered and stops the exporters
    pub fn shutdown(&self) {
        if let Err(err) = self.tracer_provider.shutdown() {
            warn!("Failed to shut down span exporter: {err}");
        }
        if let Err(err) = self.meter_provider.shutdown() {
            warn!("Failed to shut down metric exporter: {err}");
        }
    }
}

/// Wraps the router in a layer which opens a span per request. The span joins the caller's trace
/// when the request carries W3C trace context headers and records the response status.
pub fn attach_tracing_http<T>(router: Router<T>) -> Router<T>
where
    T: Clone + Send + Sync + 'static,
{
    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(|request: &Request<Body>| {
                let req_span = debug_span!(
                    "request",
                    method = request.method().as_str(),
                    path = request.uri().path(),
                    response_status = field::Empty,
                );

                req_span.set_parent(global::get_text_map_propagator(|propagator| {
                    propagator.extract(&HeaderExtractor(request.headers()))
                }));

                req_span
            })
            .on_response(|response: &Response<Body>, latency: Duration, span: &Span| {
                span.record("response_status", field::display(response.status()));
                debug!(latency_ms = latency.as_millis() as u64, "request processing complete");
            }),
    )
}

/// Builds the exporters which send spans and metrics to OpenTelemetry-compatible gRPC
/// endpoints (typically http://localhost:4317 with a standard sidecar setup)
pub fn init_exporters(endpoints: &OtelEndpoints) -> anyhow::Result<OtelExporters> {
    let span_export = SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&endpoints.span_url)
        .build()
        .context("building span exporter")?;
    let meter_export = MetricExporter::builder()
        .with_tonic()
        .with_endpoint(&endpoints.metric_url)
        .build()
        .context("building metric exporter")?;

    let resource = Resource::new([KeyValue::new("service.name", SERVICE_NAME)]);
    let tracer_provider = TracerProvider::builder()
        .with_batch_exporter(span_export, runtime::Tokio)
        .with_resource(resource.clone())
        .build();
    let meter_provider = SdkMeterProvider::builder()
        .with_reader(PeriodicReader::builder(meter_export, runtime::Tokio).build())
        .with_resource(resource)
        .build();

    Ok(OtelExporters {
        tracer_provider,
        meter_provider,
    })
}

/// Constructs a filter which uses [app_env::LOG_LEVEL] to configure per-module logging. Filters
/// to the "info" level by default.
pub fn init_env_filter() -> anyhow::Result<EnvFilter> {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var(app_env::LOG_LEVEL)
        .from_env()
        .with_context(|| format!("parsing {} directives", app_env::LOG_LEVEL))
}

/// Installs the global subscriber. Stdout receives JSON logs filtered by `env_filter`. When
/// exporters are given, everything at "debug" and above is also sent to OpenTelemetry.
/// Libraries logging through the "log" crate are bridged into the same subscriber.
pub fn setup_logging_and_tracing(env_filter: EnvFilter, otel_exporters: Option<&OtelExporters>) {
    global::set_text_map_propagator(TraceContextPropagator::new());

    match otel_exporters {
        Some(exporters) => {
            let tracer = exporters.tracer_provider.tracer(SERVICE_NAME);
            registry()
                .with(LevelFilter::DEBUG)
                .with(OpenTelemetryLayer::new(tracer))
                .with(MetricsLayer::new(exporters.meter_provider.clone()))
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_filter(env_filter),
                )
                .init();
        }
        None => {
            registry()
                .with(LevelFilter::DEBUG)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_filter(env_filter),
                )
                .init();
        }
    }
}
