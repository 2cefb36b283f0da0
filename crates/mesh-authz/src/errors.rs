use thiserror::Error;

/// Failure reported by an [`AccessStore`](crate::AccessStore) lookup.
///
/// Lookup failures never escalate into server errors: evaluators fold them
/// into a denial so a store outage cannot read as "no restrictions".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl LookupError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        LookupError::NotFound {
            kind,
            id: id.into(),
        }
    }
}

/// Failure turning a raw credential into an actor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
}

#[derive(Debug, Error)]
pub enum AuthzError {
    #[error("unknown resource type: {0}")]
    UnknownResourceType(String),
    #[error("invalid token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

pub type AuthzResult<T> = Result<T, AuthzError>;
