//! The immutable description of what a request wants to do.
//!
//! # Purpose
//! Transport adapters parse headers or path parameters once into an
//! [`AccessRequest`]; evaluators only ever read it.
//!
//! # Key invariants
//! - An empty target type or network id is treated as absent.
//! - An unrecognized target type is kept verbatim so deny reasons can name it.
use crate::{NetworkId, Operation, ResourceType};
use serde::{Deserialize, Serialize};

/// Which evaluator a request is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessScope {
    Global,
    Network,
}

impl AccessScope {
    pub fn as_str(self) -> &'static str {
        match self {
            AccessScope::Global => "global",
            AccessScope::Network => "network",
        }
    }
}

/// Target resource type as named by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetType {
    Known(ResourceType),
    Unrecognized(String),
}

impl TargetType {
    /// Parse a raw type name. Returns `None` for an empty value.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }
        Some(match ResourceType::parse(raw) {
            Ok(resource) => TargetType::Known(resource),
            Err(_) => TargetType::Unrecognized(raw.to_string()),
        })
    }

    pub fn known(&self) -> Option<ResourceType> {
        match self {
            TargetType::Known(resource) => Some(*resource),
            TargetType::Unrecognized(_) => None,
        }
    }

    pub fn is(&self, resource: ResourceType) -> bool {
        self.known() == Some(resource)
    }

    pub fn as_str(&self) -> &str {
        match self {
            TargetType::Known(resource) => resource.as_str(),
            TargetType::Unrecognized(raw) => raw,
        }
    }
}

impl From<ResourceType> for TargetType {
    fn from(resource: ResourceType) -> Self {
        TargetType::Known(resource)
    }
}

impl std::fmt::Display for TargetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resource metadata and operation for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRequest {
    pub operation: Operation,
    pub scope: AccessScope,
    pub target_type: Option<TargetType>,
    /// Empty when the request addresses a collection.
    pub target_id: String,
    pub network_id: Option<NetworkId>,
}

impl AccessRequest {
    pub fn global(operation: Operation) -> Self {
        Self {
            operation,
            scope: AccessScope::Global,
            target_type: None,
            target_id: String::new(),
            network_id: None,
        }
    }

    pub fn network(operation: Operation, network_id: impl Into<NetworkId>) -> Self {
        Self {
            scope: AccessScope::Network,
            ..Self::global(operation)
        }
        .in_network(network_id)
    }

    pub fn target(mut self, target: impl Into<TargetType>) -> Self {
        self.target_type = Some(target.into());
        self
    }

    /// Set the target from a raw type name; an empty name clears it.
    pub fn target_raw(mut self, raw: &str) -> Self {
        self.target_type = TargetType::parse(raw);
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.target_id = id.into();
        self
    }

    /// Set the network; an empty id clears it.
    pub fn in_network(mut self, network_id: impl Into<NetworkId>) -> Self {
        let network_id = network_id.into();
        self.network_id = (!network_id.as_str().is_empty()).then_some(network_id);
        self
    }

    pub fn is_target(&self, resource: ResourceType) -> bool {
        self.target_type
            .as_ref()
            .is_some_and(|target| target.is(resource))
    }
}

/// Derive `(resource type, resource id)` from the first two segments of a
/// path such as `/hosts/host-1`. The id is empty when only the type segment
/// is present; `None` when there is no type segment.
pub fn subjects_from_path(path: &str) -> Option<(TargetType, String)> {
    let mut segments = path.split('/').filter(|segment| !segment.is_empty());
    let target = TargetType::parse(segments.next()?)?;
    let id = segments.next().unwrap_or_default().to_string();
    Some((target, id))
}
