//! Control-plane HTTP application wiring.
//!
//! # Purpose
//! Builds the Axum router, places the security gate in front of every
//! business route, and defines the shared application state.
//!
//! # Notes
//! Route layers run outermost-last: the [`RouteTarget`] tag is added after
//! the gate so the gate can read it, and the ownership guard is added before
//! the gate so it sees the bound [`Caller`](crate::gate::Caller).
use crate::api;
use crate::api::access::access_grant;
use crate::gate::{RouteTarget, SecurityGate, require_path_user, security_gate};
use crate::observability;
use crate::store::ControlPlaneStore;
use axum::routing::{MethodRouter, get};
use axum::{Extension, Router, middleware};
use mesh_authz::{ActorResolver, ResourceType};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_opentelemetry::OpenTelemetrySpanExt;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ControlPlaneStore>,
    pub resolver: ActorResolver,
}

fn gated(
    route: MethodRouter<AppState>,
    gate: &SecurityGate,
    target: Option<RouteTarget>,
) -> MethodRouter<AppState> {
    let route = route.route_layer(middleware::from_fn_with_state(gate.clone(), security_gate));
    match target {
        Some(target) => route.route_layer(Extension(target)),
        None => route,
    }
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
            let parent = observability::trace_context_from_headers(request.headers());
            let span = tracing::info_span!(
                "http.request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version()
            );
            span.set_parent(parent);
            span
        });

    let gate = SecurityGate::new(&state);
    let admin_gate = gate.clone().require_admin();
    let users = RouteTarget::global(ResourceType::User).with_id_param("username");
    let hosts = RouteTarget::global(ResourceType::Host);
    let network = RouteTarget::network_subjects("network", "resource", "resource_id");

    Router::new()
        .route(
            "/api/v1/system/health",
            get(api::system::system_health),
        )
        .route(
            "/api/v1/openapi.json",
            get(api::openapi::openapi_json),
        )
        .route(
            "/api/v1/users/:username",
            gated(
                get(api::users::get_user).route_layer(middleware::from_fn(require_path_user)),
                &gate,
                Some(users.clone()),
            ),
        )
        .route(
            "/api/v1/users/:username/access",
            gated(
                get(access_grant).put(access_grant).delete(access_grant),
                &gate,
                Some(users),
            ),
        )
        .route(
            "/api/v1/hosts",
            gated(get(access_grant).post(access_grant), &gate, Some(hosts.clone())),
        )
        .route(
            "/api/v1/hosts/:host_id",
            gated(
                get(access_grant).put(access_grant).delete(access_grant),
                &gate,
                Some(hosts.with_id_param("host_id")),
            ),
        )
        .route(
            "/api/v1/networks/:network/:resource",
            gated(get(access_grant).post(access_grant), &gate, Some(network.clone())),
        )
        .route(
            "/api/v1/networks/:network/:resource/:resource_id",
            gated(
                get(access_grant).put(access_grant).patch(access_grant).delete(access_grant),
                &gate,
                Some(network),
            ),
        )
        .route(
            "/api/v1/authz/check",
            gated(
                get(access_grant)
                    .post(access_grant)
                    .put(access_grant)
                    .patch(access_grant)
                    .delete(access_grant)
                    .head(access_grant)
                    .options(access_grant),
                &gate,
                None,
            ),
        )
        .route(
            "/api/v1/server/admin",
            gated(
                get(access_grant),
                &admin_gate,
                Some(RouteTarget::global(ResourceType::User)),
            ),
        )
        .layer(trace_layer)
        .with_state(state)
}
