//! Network-scoped permission evaluation.
//!
//! After the platform-role checks, every role the actor holds for the
//! requested network (directly, then through groups) is matched in turn.
//! The first role that allows wins; individual role denials are never
//! surfaced and the fallback reason is always "access denied".
use crate::decision::{first_allow, first_verdict};
use crate::matcher::{MatchInput, match_role};
use crate::{AccessRequest, AccessSnapshot, Decision, DenyReason, ResourceType, Role, Verdict};

struct NetworkCheck<'a> {
    platform_role: &'a Role,
    request: &'a AccessRequest,
}

const PRECHECKS: [fn(&NetworkCheck<'_>) -> Verdict; 4] = [
    full_access,
    target_present,
    network_present,
    metrics_always_allowed,
];

pub fn evaluate(snapshot: &AccessSnapshot, request: &AccessRequest) -> Decision {
    let platform_role = match snapshot.platform_role() {
        Ok(role) => role,
        Err(reason) => return Decision::Deny(reason),
    };
    let check = NetworkCheck {
        platform_role,
        request,
    };
    match first_verdict(&PRECHECKS, &check) {
        Verdict::Allow => return Decision::Allow,
        Verdict::Deny(reason) => return Decision::Deny(reason),
        Verdict::Inconclusive => {}
    }
    let Some(network_id) = request.network_id.as_ref() else {
        return Decision::Deny(DenyReason::NetworkIdMissing);
    };

    let input = MatchInput {
        actor_id: snapshot.actor_id(),
        request,
        network_id,
        ownership: snapshot.ownership(),
    };
    first_allow(
        snapshot.direct_roles().chain(snapshot.group_roles()),
        |role| {
            let decision = match_role(role, &input);
            tracing::trace!(role = %role.role_id, outcome = decision.label(), "network role checked");
            decision
        },
        DenyReason::AccessDenied,
    )
}

fn full_access(check: &NetworkCheck<'_>) -> Verdict {
    if check.platform_role.full_access {
        Verdict::Allow
    } else {
        Verdict::Inconclusive
    }
}

fn target_present(check: &NetworkCheck<'_>) -> Verdict {
    match check.request.target_type {
        Some(_) => Verdict::Inconclusive,
        None => Verdict::Deny(DenyReason::TargetTypeMissing),
    }
}

fn network_present(check: &NetworkCheck<'_>) -> Verdict {
    match check.request.network_id {
        Some(_) => Verdict::Inconclusive,
        None => Verdict::Deny(DenyReason::NetworkIdMissing),
    }
}

fn metrics_always_allowed(check: &NetworkCheck<'_>) -> Verdict {
    if check.request.is_target(ResourceType::Metric) {
        Verdict::Allow
    } else {
        Verdict::Inconclusive
    }
}
