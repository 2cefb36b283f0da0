//! Resource metadata headers read by the gate and echoed on responses.
use axum::http::header::ACCESS_CONTROL_ALLOW_ORIGIN;
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use mesh_authz::{AccessRequest, AccessScope, DenyReason, Operation};

pub const TARGET_RSRC: HeaderName = HeaderName::from_static("target-rsrc");
pub const TARGET_RSRC_ID: HeaderName = HeaderName::from_static("target-rsrc-id");
pub const NET_ID: HeaderName = HeaderName::from_static("net-id");
pub const IS_GLOBAL_ACCESS: HeaderName = HeaderName::from_static("is-global-access");
pub const ACCESS_PERM: HeaderName = HeaderName::from_static("access-perm");
pub const REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Build an [`AccessRequest`] from caller-supplied metadata headers.
///
/// `is-global-access: yes` or `true` selects the global evaluator; anything
/// else is network scoped. Missing headers read as empty values.
pub fn access_request_from_headers(operation: Operation, headers: &HeaderMap) -> AccessRequest {
    let value = |name: &HeaderName| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
    };
    let base = if matches!(value(&IS_GLOBAL_ACCESS), "yes" | "true") {
        AccessRequest::global(operation)
    } else {
        AccessRequest::network(operation, "")
    };
    base.target_raw(value(&TARGET_RSRC))
        .with_id(value(&TARGET_RSRC_ID))
        .in_network(value(&NET_ID))
}

/// Copy the request metadata onto a response.
pub fn echo_access(headers: &mut HeaderMap, request: &AccessRequest) {
    let target = request
        .target_type
        .as_ref()
        .map(|target| target.as_str())
        .unwrap_or_default();
    let network = request
        .network_id
        .as_ref()
        .map(|network| network.as_str())
        .unwrap_or_default();
    let global = match request.scope {
        AccessScope::Global => "yes",
        AccessScope::Network => "no",
    };
    set(headers, TARGET_RSRC, target);
    set(headers, TARGET_RSRC_ID, &request.target_id);
    set(headers, NET_ID, network);
    set(headers, IS_GLOBAL_ACCESS, global);
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
}

pub fn echo_denial(headers: &mut HeaderMap, reason: &DenyReason) {
    set(headers, ACCESS_PERM, &reason.to_string());
}

fn set(headers: &mut HeaderMap, name: HeaderName, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(value) => {
            headers.insert(name, value);
        }
        Err(_) => tracing::debug!(header = %name, "skipping non-ascii metadata header"),
    }
}
