//! The security gate middleware.
//!
//! # Flow
//! 1. Derive the [`AccessRequest`] from the route tag, or from the metadata
//!    headers when the route is untagged.
//! 2. Resolve the caller from `Authorization` (master key or session token).
//! 3. Ask [`mesh_authz::authorize`] for a decision; the master key skips it.
//! 4. On allow, insert [`Caller`] and the request for the handler.
//!
//! # Security considerations
//! Any `Caller` extension present on the incoming request is discarded before
//! resolution so handlers cannot be handed a forged identity.
use crate::api::error::{api_forbidden, api_unauthorized};
use crate::app::AppState;
use crate::gate::headers::{self, REQUEST_ID};
use crate::gate::target::RouteTarget;
use crate::observability::{PRIVILEGED_OUTCOME, record_authn_failure, record_decision};
use crate::store::ControlPlaneStore;
use axum::extract::{Path, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use mesh_authz::{
    AccessRequest, ActorId, ActorResolver, Decision, Operation, ResolveError, authorize,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// The authenticated caller of the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub actor_id: ActorId,
    /// Authenticated with the master key.
    pub privileged: bool,
}

#[derive(Clone)]
pub struct SecurityGate {
    store: Arc<dyn ControlPlaneStore>,
    resolver: ActorResolver,
    require_admin: bool,
}

impl SecurityGate {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: Arc::clone(&state.store),
            resolver: state.resolver.clone(),
            require_admin: false,
        }
    }

    /// Only admin or super-admin credentials (or the master key) pass.
    pub fn require_admin(mut self) -> Self {
        self.require_admin = true;
        self
    }
}

pub async fn security_gate(
    State(gate): State<SecurityGate>,
    params: Option<Path<HashMap<String, String>>>,
    mut request: Request,
    next: Next,
) -> Response {
    request.extensions_mut().remove::<Caller>();
    let request_id = request
        .headers()
        .get(REQUEST_ID)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let access = access_request_for(&request, params.map(|Path(params)| params));

    let credential = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    let resolved = match gate.resolver.resolve(credential, gate.require_admin) {
        Ok(resolved) => resolved,
        Err(err) => {
            record_authn_failure(&err);
            info!(error = %err, "request rejected by security gate");
            let response = match err {
                ResolveError::Unauthorized(message) => api_unauthorized(&message),
                ResolveError::Forbidden(message) => api_forbidden(&message),
            };
            return response.with_request_id(request_id).into_response();
        }
    };

    let actor_id = resolved.actor_id();
    let decision = if resolved.is_privileged() {
        Decision::Allow
    } else {
        authorize(gate.store.as_ref(), &actor_id, &access).await
    };
    let outcome = if resolved.is_privileged() {
        PRIVILEGED_OUTCOME
    } else {
        decision.label()
    };
    record_decision(access.scope, outcome);

    if let Decision::Deny(reason) = decision {
        info!(
            actor = %actor_id,
            operation = %access.operation,
            scope = access.scope.as_str(),
            reason = %reason,
            "access denied"
        );
        let mut response = api_forbidden(&reason.to_string())
            .with_request_id(request_id)
            .into_response();
        headers::echo_access(response.headers_mut(), &access);
        headers::echo_denial(response.headers_mut(), &reason);
        return response;
    }

    debug!(actor = %actor_id, privileged = resolved.is_privileged(), "access granted");
    request.extensions_mut().insert(Caller {
        actor_id,
        privileged: resolved.is_privileged(),
    });
    request.extensions_mut().insert(access.clone());
    let mut response = next.run(request).await;
    headers::echo_access(response.headers_mut(), &access);
    response
}

fn access_request_for(request: &Request, params: Option<HashMap<String, String>>) -> AccessRequest {
    let operation = Operation::from_method(request.method());
    match request.extensions().get::<RouteTarget>() {
        Some(target) => target.access_request(operation, &params.unwrap_or_default()),
        None => headers::access_request_from_headers(operation, request.headers()),
    }
}
