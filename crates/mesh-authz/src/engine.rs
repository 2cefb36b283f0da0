//! Decision orchestration for one request.
//!
//! # Purpose
//! Loads an [`AccessSnapshot`] through the store and routes it to the global
//! or network evaluator according to the request scope.
//!
//! # Key invariants
//! - Store failures never escape as errors; they become denials.
//! - Nothing is cached between calls.
use crate::{AccessRequest, AccessScope, AccessSnapshot, AccessStore, ActorId, Decision};

pub async fn authorize(
    store: &dyn AccessStore,
    actor_id: &ActorId,
    request: &AccessRequest,
) -> Decision {
    let snapshot = AccessSnapshot::resolve(store, actor_id, request).await;
    evaluate(&snapshot, request)
}

/// Evaluate a request against an already-loaded snapshot.
pub fn evaluate(snapshot: &AccessSnapshot, request: &AccessRequest) -> Decision {
    let decision = match request.scope {
        AccessScope::Global => crate::global::evaluate(snapshot, request),
        AccessScope::Network => crate::network::evaluate(snapshot, request),
    };
    tracing::debug!(
        actor = %snapshot.actor_id(),
        scope = request.scope.as_str(),
        operation = %request.operation,
        target = request.target_type.as_ref().map(|target| target.as_str()).unwrap_or(""),
        target_id = %request.target_id,
        outcome = decision.label(),
        reason = %decision.deny_reason().map(ToString::to_string).unwrap_or_default(),
        "authorization evaluated"
    );
    decision
}
