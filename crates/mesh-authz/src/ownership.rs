use crate::{ActorId, Decision, DenyReason};

/// Allow only when the path names the actor bound to the request.
///
/// A request with no bound actor is denied.
pub fn require_self(path_user: &str, caller: Option<&ActorId>) -> Decision {
    match caller {
        Some(actor_id) if actor_id.as_str() == path_user => Decision::Allow,
        _ => Decision::Deny(DenyReason::Forbidden),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_bound_actor_only() {
        let alice = ActorId::new("alice");
        assert!(require_self("alice", Some(&alice)).is_allowed());
        assert_eq!(
            require_self("bob", Some(&alice)),
            Decision::Deny(DenyReason::Forbidden)
        );
        assert_eq!(
            require_self("alice", None),
            Decision::Deny(DenyReason::Forbidden)
        );
    }
}
