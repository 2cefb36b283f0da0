//! Guard for routes that only the named user may call.
use crate::api::error::api_forbidden;
use crate::gate::security::Caller;
use axum::extract::{Path, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use mesh_authz::{Decision, require_self};
use std::collections::HashMap;

/// Allow the request only when the `username` path parameter names the
/// caller. Must run inside the security gate.
pub async fn require_path_user(
    params: Option<Path<HashMap<String, String>>>,
    request: Request,
    next: Next,
) -> Response {
    let path_user = params
        .and_then(|Path(mut params)| params.remove("username"))
        .unwrap_or_default();
    let decision = require_self(
        &path_user,
        request
            .extensions()
            .get::<Caller>()
            .map(|caller| &caller.actor_id),
    );
    match decision {
        Decision::Allow => next.run(request).await,
        Decision::Deny(reason) => {
            tracing::info!(path_user = %path_user, "caller does not own the requested record");
            api_forbidden(&reason.to_string()).into_response()
        }
    }
}
