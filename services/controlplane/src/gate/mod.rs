//! Request authorization for the control-plane API.
//!
//! # Purpose
//! Every business route is wrapped by the [`security::security_gate`]
//! middleware, which resolves the caller, derives an
//! [`AccessRequest`](mesh_authz::AccessRequest) for the route, and asks the
//! authorization engine for a decision before the handler runs.
//!
//! # Key invariants
//! - Unauthenticated requests get 401, denied requests get 403.
//! - Resource metadata is echoed back as response headers on every
//!   authenticated outcome.
//! - Handlers only ever see a [`security::Caller`] inserted by the gate.
pub mod headers;
pub mod ownership;
pub mod security;
pub mod target;

pub use ownership::require_path_user;
pub use security::{Caller, SecurityGate, security_gate};
pub use target::{RouteTarget, TargetSource};
