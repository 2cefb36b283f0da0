//! Resource types and resource identifiers used in permission tables.
//!
//! # Purpose
//! Defines the closed set of resource types a role can grant access to and
//! the identifier form used to key individual grants.
//!
//! # Key invariants
//! - Every resource type has exactly one stable wire name.
//! - The wildcard identifier for a type is `all_<wire name>` and is checked
//!   before any concrete identifier.
//! - `hosts` falls back to `remote_access_gw` grants (see the matcher).
//!
//! # Examples
//! ```rust
//! use mesh_authz::{ResourceId, ResourceType};
//!
//! let wildcard = ResourceType::Host.wildcard();
//! assert_eq!(wildcard.as_str(), "all_hosts");
//! assert!(wildcard.is_wildcard());
//! assert!(!ResourceId::new("host-1").is_wildcard());
//! ```
use crate::{AuthzError, AuthzResult};
use serde::{Deserialize, Serialize};

const WILDCARD_PREFIX: &str = "all_";

/// Resource type named by a permission table or a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceType {
    #[serde(rename = "hosts")]
    Host,
    #[serde(rename = "relays")]
    Relay,
    #[serde(rename = "remote_access_gw")]
    RemoteAccessGateway,
    #[serde(rename = "extclients")]
    ExternalClient,
    #[serde(rename = "inet_gw")]
    InternetGateway,
    #[serde(rename = "egress")]
    EgressGateway,
    #[serde(rename = "networks")]
    Network,
    #[serde(rename = "enrollment_key")]
    EnrollmentKey,
    #[serde(rename = "users")]
    User,
    #[serde(rename = "acl")]
    Acl,
    #[serde(rename = "dns")]
    Dns,
    #[serde(rename = "fail_over")]
    FailOver,
    #[serde(rename = "metrics")]
    Metric,
}

impl ResourceType {
    pub const ALL: [ResourceType; 13] = [
        ResourceType::Host,
        ResourceType::Relay,
        ResourceType::RemoteAccessGateway,
        ResourceType::ExternalClient,
        ResourceType::InternetGateway,
        ResourceType::EgressGateway,
        ResourceType::Network,
        ResourceType::EnrollmentKey,
        ResourceType::User,
        ResourceType::Acl,
        ResourceType::Dns,
        ResourceType::FailOver,
        ResourceType::Metric,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceType::Host => "hosts",
            ResourceType::Relay => "relays",
            ResourceType::RemoteAccessGateway => "remote_access_gw",
            ResourceType::ExternalClient => "extclients",
            ResourceType::InternetGateway => "inet_gw",
            ResourceType::EgressGateway => "egress",
            ResourceType::Network => "networks",
            ResourceType::EnrollmentKey => "enrollment_key",
            ResourceType::User => "users",
            ResourceType::Acl => "acl",
            ResourceType::Dns => "dns",
            ResourceType::FailOver => "fail_over",
            ResourceType::Metric => "metrics",
        }
    }

    /// The `all_<type>` identifier that grants every instance of this type.
    pub fn wildcard(self) -> ResourceId {
        ResourceId(format!("{WILDCARD_PREFIX}{}", self.as_str()))
    }

    /// Parse a wire name.
    ///
    /// # Errors
    /// - [`AuthzError::UnknownResourceType`] when the name is not in the closed set.
    pub fn parse(value: &str) -> AuthzResult<Self> {
        value.parse()
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ResourceType {
    type Err = AuthzError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ResourceType::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == value)
            .ok_or_else(|| AuthzError::UnknownResourceType(value.to_string()))
    }
}

/// Key of a single grant inside a permission table: a concrete instance ID
/// or the `all_<type>` wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.0.starts_with(WILDCARD_PREFIX)
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::borrow::Borrow<str> for ResourceId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
