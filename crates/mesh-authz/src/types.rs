//! Strongly typed identifiers for authorization records.
//!
//! # Purpose
//! Wraps string identifiers so actor, role, group, network, and client IDs
//! cannot be swapped by accident when walking role grants.
//!
//! # Key invariants
//! - Each wrapper preserves the original string exactly.
//! - `Display`, `as_str`, and serde all use the raw value.
//! - Every wrapper borrows as `str`, so maps keyed by an ID can be queried
//!   with a plain string slice.
//!
//! # Examples
//! ```rust
//! use mesh_authz::{ActorId, NetworkId};
//!
//! let actor = ActorId::new("alice");
//! let network = NetworkId::new("netmaker");
//! assert_eq!(format!("{actor}@{network}"), "alice@netmaker");
//! ```
use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }
    };
}

string_id!(
    /// Username-equivalent identity of an authenticated actor.
    ActorId
);
string_id!(
    /// Identifier of a platform-wide or network-scoped role.
    RoleId
);
string_id!(
    /// Identifier of an actor group.
    GroupId
);
string_id!(
    /// Identifier of a mesh network.
    NetworkId
);
string_id!(
    /// Identifier of an externally issued client.
    ClientId
);
