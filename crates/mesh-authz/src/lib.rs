//! Authorization engine for the mesh control plane.
//!
//! # Purpose
//! Decides, per API request, whether an authenticated actor may perform an
//! operation on a resource. Combines a platform-wide role, per-network
//! roles, and group-inherited roles with wildcard and per-instance grants.
//!
//! # How it fits
//! The control-plane service resolves the actor from the `Authorization`
//! header ([`ActorResolver`]), builds an [`AccessRequest`] from headers or
//! route metadata, and calls [`authorize`]. Records come from an
//! [`AccessStore`] implementation owned by the service.
//!
//! # Key invariants
//! - Every decision is exactly allow or deny, and every failure denies.
//! - `full_access` roles short-circuit all table matching.
//! - Wildcard grants (`all_<type>`) are consulted before concrete ids.
//! - Records are read once per request and never cached across requests.
//!
//! # Examples
//! ```rust
//! use mesh_authz::{AccessRequest, AccessSnapshot, Actor, Operation, ResourceType, Role, evaluate};
//!
//! let snapshot = AccessSnapshot::new(Actor::new("alice", "user"), Some(Role::new("user")));
//! let metrics = AccessRequest::global(Operation::Read).target(ResourceType::Metric);
//! assert!(evaluate(&snapshot, &metrics).is_allowed());
//! ```
//!
//! # Common pitfalls
//! - Header-driven requests with an empty `target-rsrc` are denied before
//!   any role is consulted; tag routes instead of relying on defaults.

mod decision;
mod engine;
mod errors;
mod global;
mod matcher;
mod model;
mod network;
mod operation;
mod ownership;
mod permission;
mod request;
mod resolver;
mod resource;
mod snapshot;
mod store;
mod token;
mod types;

pub use decision::{Decision, DenyReason, Verdict, first_allow, first_decisive, first_verdict};
pub use engine::{authorize, evaluate};
pub use errors::{AuthzError, AuthzResult, LookupError, ResolveError};
pub use matcher::{MatchInput, match_role};
pub use model::{Actor, ExternalClient, Group, NetworkRoles, Role};
pub use operation::{Operation, check_scope};
pub use ownership::require_self;
pub use permission::{PermissionScope, PermissionTable, ResourceGrants};
pub use request::{AccessRequest, AccessScope, TargetType, subjects_from_path};
pub use resolver::{
    ActorResolver, CredentialVerifier, MASTER_ACTOR, ResolvedActor, VerifiedCredential,
};
pub use resource::{ResourceId, ResourceType};
pub use snapshot::{AccessSnapshot, OwnershipIndex, ownership_network};
pub use store::{AccessStore, LookupResult};
pub use token::{JwtCredentialIssuer, JwtCredentialVerifier, MeshClaims};
pub use types::{ActorId, ClientId, GroupId, NetworkId, RoleId};

/// Evaluators over a loaded [`AccessSnapshot`].
pub mod evaluators {
    pub use crate::global::evaluate as global;
    pub use crate::network::evaluate as network;
}
