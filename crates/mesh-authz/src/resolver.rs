//! Turns a raw `Authorization` value into an actor.
//!
//! # Purpose
//! Splits the credential, recognizes the static master key, and delegates
//! everything else to a [`CredentialVerifier`].
//!
//! # Key invariants
//! - The credential must contain at least two space-separated parts; the
//!   second is the token. The scheme word is not interpreted.
//! - An empty master key never matches.
//! - Verifier failures are reported as unauthorized, never forbidden.
//!
//! # Examples
//! ```rust
//! use std::sync::Arc;
//! use mesh_authz::{ActorResolver, AuthzError, AuthzResult, CredentialVerifier, VerifiedCredential};
//!
//! struct RejectAll;
//! impl CredentialVerifier for RejectAll {
//!     fn verify(&self, token: &str) -> AuthzResult<VerifiedCredential> {
//!         Err(AuthzError::UnknownResourceType(token.to_string()))
//!     }
//! }
//!
//! let resolver = ActorResolver::new(Some("s3cret".to_string()), Arc::new(RejectAll));
//! let actor = resolver.resolve(Some("Bearer s3cret"), false).expect("master key");
//! assert!(actor.is_privileged());
//! assert!(resolver.resolve(Some("Bearer nope"), false).is_err());
//! ```
use crate::{ActorId, AuthzResult, ResolveError};
use std::sync::Arc;

/// Identity assigned to requests that present the master key.
pub const MASTER_ACTOR: &str = "masteradministrator";

/// Claims a verifier extracted from a valid token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedCredential {
    pub actor_id: ActorId,
    pub admin: bool,
    pub super_admin: bool,
}

pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, token: &str) -> AuthzResult<VerifiedCredential>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedActor {
    /// Master-key holder; skips permission evaluation.
    Privileged,
    Actor(VerifiedCredential),
}

impl ResolvedActor {
    pub fn actor_id(&self) -> ActorId {
        match self {
            ResolvedActor::Privileged => ActorId::new(MASTER_ACTOR),
            ResolvedActor::Actor(credential) => credential.actor_id.clone(),
        }
    }

    pub fn is_privileged(&self) -> bool {
        matches!(self, ResolvedActor::Privileged)
    }
}

#[derive(Clone)]
pub struct ActorResolver {
    master_key: Option<String>,
    verifier: Arc<dyn CredentialVerifier>,
}

impl ActorResolver {
    pub fn new(master_key: Option<String>, verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self {
            master_key: master_key.filter(|key| !key.is_empty()),
            verifier,
        }
    }

    /// Resolve the `Authorization` header value.
    ///
    /// # Errors
    /// - [`ResolveError::Unauthorized`] for a missing, malformed, or invalid credential.
    /// - [`ResolveError::Forbidden`] when `require_admin` is set and the
    ///   verified credential carries neither admin flag.
    pub fn resolve(
        &self,
        credential: Option<&str>,
        require_admin: bool,
    ) -> Result<ResolvedActor, ResolveError> {
        let credential =
            credential.ok_or_else(|| ResolveError::Unauthorized("missing credential".into()))?;
        let token = credential
            .split(' ')
            .nth(1)
            .ok_or_else(|| ResolveError::Unauthorized("malformed credential".into()))?;

        if self.master_key.as_deref() == Some(token) {
            return Ok(ResolvedActor::Privileged);
        }

        let verified = self.verifier.verify(token).map_err(|err| {
            tracing::debug!(error = %err, "credential verification failed");
            ResolveError::Unauthorized("invalid credential".into())
        })?;
        if require_admin && !(verified.admin || verified.super_admin) {
            return Err(ResolveError::Forbidden(
                "administrator privileges required".into(),
            ));
        }
        Ok(ResolvedActor::Actor(verified))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AuthzError, LookupError};

    /// Accepts `user:<name>`, `admin:<name>`, and `super:<name>` tokens.
    struct PrefixVerifier;

    impl CredentialVerifier for PrefixVerifier {
        fn verify(&self, token: &str) -> AuthzResult<VerifiedCredential> {
            let (kind, name) = token
                .split_once(':')
                .ok_or_else(|| AuthzError::Lookup(LookupError::not_found("token", token)))?;
            Ok(VerifiedCredential {
                actor_id: ActorId::new(name),
                admin: kind == "admin",
                super_admin: kind == "super",
            })
        }
    }

    fn resolver(master_key: Option<&str>) -> ActorResolver {
        ActorResolver::new(master_key.map(str::to_string), Arc::new(PrefixVerifier))
    }

    #[test]
    fn rejects_missing_or_short_credentials() {
        let resolver = resolver(None);
        for credential in [None, Some(""), Some("Bearer")] {
            assert!(matches!(
                resolver.resolve(credential, false),
                Err(ResolveError::Unauthorized(_))
            ));
        }
    }

    #[test]
    fn master_key_is_privileged() {
        let resolved = resolver(Some("m4ster"))
            .resolve(Some("Bearer m4ster"), true)
            .expect("master");
        assert!(resolved.is_privileged());
        assert_eq!(resolved.actor_id().as_str(), MASTER_ACTOR);
    }

    #[test]
    fn empty_master_key_never_matches() {
        let resolver = resolver(Some(""));
        assert!(matches!(
            resolver.resolve(Some("Bearer "), false),
            Err(ResolveError::Unauthorized(_))
        ));
    }

    #[test]
    fn verified_tokens_resolve_to_actor() {
        let resolved = resolver(Some("m4ster"))
            .resolve(Some("Bearer user:alice"), false)
            .expect("actor");
        assert_eq!(resolved.actor_id().as_str(), "alice");
        assert!(!resolved.is_privileged());
    }

    #[test]
    fn invalid_token_is_unauthorized() {
        assert_eq!(
            resolver(None).resolve(Some("Bearer garbage"), false),
            Err(ResolveError::Unauthorized("invalid credential".into()))
        );
    }

    #[test]
    fn admin_requirement() {
        let resolver = resolver(None);
        assert!(matches!(
            resolver.resolve(Some("Bearer user:alice"), true),
            Err(ResolveError::Forbidden(_))
        ));
        assert!(resolver.resolve(Some("Bearer admin:bob"), true).is_ok());
        assert!(resolver.resolve(Some("Bearer super:carol"), true).is_ok());
    }
}
