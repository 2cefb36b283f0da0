//! Tracing and metrics for the control plane.
//!
//! # Purpose
//! Installs the log subscriber (with OTLP export when an endpoint is
//! configured), extracts W3C trace context from inbound requests, and owns
//! the Prometheus recorder behind the security gate's counters.
//!
//! # Metrics
//! - `controlplane_authz_decisions_total{scope, outcome}`: one per
//!   authenticated request. `outcome` is `allow`, `deny`, or `privileged`.
//! - `controlplane_authn_failures_total{kind}`: one per request rejected
//!   while resolving the caller. `kind` is `unauthorized` or `forbidden`.
//!
//! # Notes
//! Installation is guarded by `OnceLock`; repeated calls (tests, restarts in
//! the same process) reuse the first recorder.
use anyhow::Context;
use axum::http::HeaderMap;
use mesh_authz::{AccessScope, ResolveError};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use opentelemetry::KeyValue;
use opentelemetry::global;
use opentelemetry::propagation::Extractor;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::SdkTracerProvider;
use std::net::SocketAddr;
use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub const AUTHZ_DECISIONS: &str = "controlplane_authz_decisions_total";
pub const AUTHN_FAILURES: &str = "controlplane_authn_failures_total";

/// Outcome label for master-key requests, which skip evaluation.
pub const PRIVILEGED_OUTCOME: &str = "privileged";

static RECORDER: OnceLock<PrometheusHandle> = OnceLock::new();
static SUBSCRIBER: OnceLock<()> = OnceLock::new();
static PROPAGATOR: OnceLock<()> = OnceLock::new();

pub fn init_observability(service_name: &str) -> anyhow::Result<PrometheusHandle> {
    PROPAGATOR.get_or_init(install_propagator);
    SUBSCRIBER.get_or_init(|| install_subscriber(service_name));
    let handle = metrics_recorder()?;
    metrics::describe_counter!(
        AUTHZ_DECISIONS,
        "Security gate decisions by evaluator scope and outcome"
    );
    metrics::describe_counter!(
        AUTHN_FAILURES,
        "Requests rejected while resolving the caller"
    );
    Ok(handle)
}

pub fn record_decision(scope: AccessScope, outcome: &'static str) {
    metrics::counter!(AUTHZ_DECISIONS, "scope" => scope.as_str(), "outcome" => outcome)
        .increment(1);
}

pub fn record_authn_failure(err: &ResolveError) {
    let kind = match err {
        ResolveError::Unauthorized(_) => "unauthorized",
        ResolveError::Forbidden(_) => "forbidden",
    };
    metrics::counter!(AUTHN_FAILURES, "kind" => kind).increment(1);
}

fn install_propagator() {
    global::set_text_map_propagator(TraceContextPropagator::new());
}

fn install_subscriber(service_name: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let otel = otlp_provider(service_name).map(|provider| {
        tracing_opentelemetry::layer().with_tracer(provider.tracer(service_name.to_string()))
    });
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(otel)
        .try_init();
}

/// Span export is enabled only when `OTEL_EXPORTER_OTLP_ENDPOINT` is set.
fn otlp_provider(service_name: &str) -> Option<SdkTracerProvider> {
    std::env::var_os("OTEL_EXPORTER_OTLP_ENDPOINT")?;
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .build()
        .ok()?;
    let resource = Resource::builder_empty()
        .with_attributes(service_attributes(service_name, instance_id()))
        .build();
    Some(
        SdkTracerProvider::builder()
            .with_batch_exporter(exporter)
            .with_resource(resource)
            .build(),
    )
}

fn instance_id() -> Option<String> {
    std::env::var("MESH_SERVICE_INSTANCE_ID")
        .or_else(|_| std::env::var("HOSTNAME"))
        .ok()
        .filter(|value| !value.is_empty())
}

fn service_attributes(service_name: &str, instance_id: Option<String>) -> Vec<KeyValue> {
    let mut attrs = vec![KeyValue::new("service.name", service_name.to_string())];
    if let Some(instance_id) = instance_id {
        attrs.push(KeyValue::new("service.instance.id", instance_id));
    }
    attrs
}

/// Parent context for a request span, from `traceparent`/`tracestate`.
pub fn trace_context_from_headers(headers: &HeaderMap) -> opentelemetry::Context {
    PROPAGATOR.get_or_init(install_propagator);
    global::get_text_map_propagator(|propagator| propagator.extract(&RequestHeaders(headers)))
}

struct RequestHeaders<'a>(&'a HeaderMap);

impl Extractor for RequestHeaders<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|value| value.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|name| name.as_str()).collect()
    }
}

fn metrics_recorder() -> anyhow::Result<PrometheusHandle> {
    if let Some(handle) = RECORDER.get() {
        return Ok(handle.clone());
    }
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .context("install metrics recorder")?;
    Ok(RECORDER.get_or_init(|| handle).clone())
}

fn metrics_router(handle: PrometheusHandle) -> axum::Router {
    axum::Router::new().route(
        "/metrics",
        axum::routing::get(move || async move { handle.render() }),
    )
}

/// Serve `/metrics` until the task is aborted.
pub async fn serve_metrics(handle: PrometheusHandle, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "metrics listening");
    axum::serve(listener, metrics_router(handle).into_make_service()).await
}
