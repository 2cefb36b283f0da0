use crate::{Decision, DenyReason, PermissionScope};
use http::Method;
use serde::{Deserialize, Serialize};

/// CRUD operation a request performs on its target resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Create,
        Operation::Read,
        Operation::Update,
        Operation::Delete,
    ];

    /// Map an HTTP verb onto a CRUD operation. Verbs outside
    /// POST/GET/PUT/PATCH/DELETE are treated as reads.
    pub fn from_method(method: &Method) -> Self {
        match *method {
            Method::POST => Operation::Create,
            Method::PUT | Method::PATCH => Operation::Update,
            Method::DELETE => Operation::Delete,
            _ => Operation::Read,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check a grant against the requested operation.
pub fn check_scope(scope: &PermissionScope, operation: Operation) -> Decision {
    if scope.permits(operation) {
        Decision::Allow
    } else {
        Decision::Deny(DenyReason::OperationNotPermitted)
    }
}
