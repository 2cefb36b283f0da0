//! Authorization outcomes.
//!
//! # Purpose
//! Every evaluator returns an explicit value instead of mutating request state.
//! Intermediate rules return a [`Verdict`]; the evaluators collapse their rule
//! sequence into a terminal [`Decision`].
//!
//! # Key invariants
//! - A [`Decision`] is either `Allow` or `Deny`; there is no partial grant.
//! - [`DenyReason`] renders the exact reason strings surfaced to clients in
//!   the `access-perm` response header.
use crate::LookupError;
use thiserror::Error;

/// Why a request was denied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DenyReason {
    #[error("access denied")]
    AccessDenied,
    #[error("access denied to {0} rsrc")]
    ResourceTypeDenied(String),
    #[error("target rsrc is missing")]
    TargetTypeMissing,
    #[error("network id is missing")]
    NetworkIdMissing,
    #[error("target rsrc id is missing")]
    TargetIdMissing,
    #[error("target rsrc id is empty")]
    TargetIdEmpty,
    #[error("operation not permitted")]
    OperationNotPermitted,
    #[error("forbidden")]
    Forbidden,
    #[error("{0}")]
    Lookup(#[from] LookupError),
}

/// Terminal authorization result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn deny_reason(&self) -> Option<&DenyReason> {
        match self {
            Decision::Allow => None,
            Decision::Deny(reason) => Some(reason),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Decision::Allow => "allow",
            Decision::Deny(_) => "deny",
        }
    }
}

/// Result of a single rule: decisive, or no opinion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Deny(DenyReason),
    Inconclusive,
}

impl From<Decision> for Verdict {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Allow => Verdict::Allow,
            Decision::Deny(reason) => Verdict::Deny(reason),
        }
    }
}

/// Run rules in order and stop at the first decisive verdict.
///
/// Falls back to `otherwise` when every rule is inconclusive.
pub fn first_decisive<I, F>(rules: &[F], input: &I, otherwise: DenyReason) -> Decision
where
    F: Fn(&I) -> Verdict,
{
    match first_verdict(rules, input) {
        Verdict::Allow => Decision::Allow,
        Verdict::Deny(reason) => Decision::Deny(reason),
        Verdict::Inconclusive => Decision::Deny(otherwise),
    }
}

/// Like [`first_decisive`], but reports `Inconclusive` instead of denying
/// when no rule has an opinion.
pub fn first_verdict<I, F>(rules: &[F], input: &I) -> Verdict
where
    F: Fn(&I) -> Verdict,
{
    rules
        .iter()
        .map(|rule| rule(input))
        .find(|verdict| *verdict != Verdict::Inconclusive)
        .unwrap_or(Verdict::Inconclusive)
}

/// OR-combine lazily evaluated candidates: the first `Allow` wins, denials are
/// ignored, and `otherwise` is returned when nothing allows.
pub fn first_allow<T>(
    candidates: impl IntoIterator<Item = T>,
    mut evaluate: impl FnMut(T) -> Decision,
    otherwise: DenyReason,
) -> Decision {
    for candidate in candidates {
        if evaluate(candidate).is_allowed() {
            return Decision::Allow;
        }
    }
    Decision::Deny(otherwise)
}
