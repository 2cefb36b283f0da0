//! Handlers for gated resource routes.
//!
//! Resource management itself lives elsewhere; these endpoints report what
//! the security gate allowed so operators and tests can observe decisions.
use crate::api::types::AccessGrant;
use crate::gate::Caller;
use axum::{Extension, Json};
use mesh_authz::AccessRequest;

#[utoipa::path(
    get,
    path = "/api/v1/authz/check",
    tag = "authz",
    params(
        ("target-rsrc" = Option<String>, Header, description = "Target resource type"),
        ("target-rsrc-id" = Option<String>, Header, description = "Target resource id"),
        ("net-id" = Option<String>, Header, description = "Network id"),
        ("is-global-access" = Option<String>, Header, description = "`yes` for global scope")
    ),
    responses(
        (status = 200, description = "Access granted", body = AccessGrant),
        (status = 401, description = "Missing or invalid credential", body = ErrorResponse),
        (status = 403, description = "Access denied", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
/// Echo the access decision for the current request.
pub(crate) async fn access_grant(
    Extension(caller): Extension<Caller>,
    Extension(request): Extension<AccessRequest>,
) -> Json<AccessGrant> {
    Json(AccessGrant::new(
        caller.actor_id.as_str(),
        caller.privileged,
        &request,
    ))
}
