//! Permission scopes and permission tables.
//!
//! # Purpose
//! A role grants access through two tables (global and network level). Each
//! table maps a [`ResourceType`] to per-instance grants keyed by
//! [`ResourceId`], where every grant is a [`PermissionScope`].
//!
//! # Key invariants
//! - The four CRUD flags are independent.
//! - `self_only` restricts a grant to resources owned by the caller; it is
//!   only consulted for external clients.
//!
//! # Examples
//! ```rust
//! use mesh_authz::{Operation, PermissionScope};
//!
//! let scope = PermissionScope::read_only();
//! assert!(scope.permits(Operation::Read));
//! assert!(!scope.permits(Operation::Delete));
//! ```
use crate::{Operation, ResourceId, ResourceType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// CRUD grant plus the self-only restriction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionScope {
    pub create: bool,
    pub read: bool,
    pub update: bool,
    pub delete: bool,
    pub self_only: bool,
}

impl PermissionScope {
    pub fn read_only() -> Self {
        Self {
            read: true,
            ..Self::default()
        }
    }

    pub fn full() -> Self {
        Self {
            create: true,
            read: true,
            update: true,
            delete: true,
            self_only: false,
        }
    }

    pub fn with_self_only(mut self) -> Self {
        self.self_only = true;
        self
    }

    pub fn permits(&self, operation: Operation) -> bool {
        match operation {
            Operation::Create => self.create,
            Operation::Read => self.read,
            Operation::Update => self.update,
            Operation::Delete => self.delete,
        }
    }
}

/// Grants for one resource type, keyed by instance ID or `all_<type>`.
pub type ResourceGrants = HashMap<ResourceId, PermissionScope>;

/// Grants for every resource type a role mentions.
pub type PermissionTable = HashMap<ResourceType, ResourceGrants>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_scope_permits_everything() {
        let scope = PermissionScope::full();
        for operation in Operation::ALL {
            assert!(scope.permits(operation));
        }
        assert!(!scope.self_only);
    }

    #[test]
    fn default_scope_permits_nothing() {
        let scope = PermissionScope::default();
        for operation in Operation::ALL {
            assert!(!scope.permits(operation));
        }
    }

    #[test]
    fn missing_flags_deserialize_as_false() {
        let scope: PermissionScope =
            serde_json::from_str(r#"{"read": true, "self_only": true}"#).expect("scope");
        assert_eq!(scope, PermissionScope::read_only().with_self_only());
    }
}
