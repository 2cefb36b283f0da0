//! HTTP API request/response types.
//!
//! # Purpose
//! Defines the payload shapes returned by the control-plane REST API and
//! used for OpenAPI schema generation.
use mesh_authz::{AccessRequest, AccessScope, Actor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct HealthStatus {
    pub status: String,
    pub backend: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub request_id: Option<String>,
}

/// What the security gate allowed for the current request.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct AccessGrant {
    pub actor_id: String,
    pub privileged: bool,
    pub operation: String,
    pub global: bool,
    pub resource_type: Option<String>,
    pub resource_id: String,
    pub network_id: Option<String>,
}

impl AccessGrant {
    pub fn new(actor_id: &str, privileged: bool, request: &AccessRequest) -> Self {
        Self {
            actor_id: actor_id.to_string(),
            privileged,
            operation: request.operation.to_string(),
            global: request.scope == AccessScope::Global,
            resource_type: request
                .target_type
                .as_ref()
                .map(|target| target.as_str().to_string()),
            resource_id: request.target_id.clone(),
            network_id: request.network_id.as_ref().map(ToString::to_string),
        }
    }
}

/// Public view of an actor record.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct ActorView {
    pub actor_id: String,
    pub platform_role: String,
    pub network_roles: BTreeMap<String, Vec<String>>,
    pub groups: Vec<String>,
}

impl From<Actor> for ActorView {
    fn from(actor: Actor) -> Self {
        let network_roles = actor
            .network_roles
            .into_iter()
            .map(|(network_id, roles)| {
                let mut roles: Vec<String> = roles.into_iter().map(|r| r.to_string()).collect();
                roles.sort();
                (network_id.to_string(), roles)
            })
            .collect();
        let mut groups: Vec<String> = actor.groups.into_iter().map(|g| g.to_string()).collect();
        groups.sort();
        Self {
            actor_id: actor.actor_id.to_string(),
            platform_role: actor.platform_role.to_string(),
            network_roles,
            groups,
        }
    }
}
