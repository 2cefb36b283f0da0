//! Route tagging: how a route names the resource it acts on.
//!
//! Routes attach a [`RouteTarget`] as an extension. The gate falls back to
//! the metadata headers when a route carries no tag.
use mesh_authz::{AccessRequest, Operation, ResourceType};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub enum TargetSource {
    /// The route always targets one resource type; the id, if any, comes
    /// from a path parameter.
    Fixed {
        resource: ResourceType,
        id_param: Option<&'static str>,
    },
    /// Type and id are read from path parameters; the type is parsed from
    /// its wire name and may be unrecognized.
    PathSubjects {
        type_param: &'static str,
        id_param: &'static str,
    },
}

#[derive(Debug, Clone)]
pub struct RouteTarget {
    global: bool,
    source: TargetSource,
    network_param: Option<&'static str>,
}

impl RouteTarget {
    pub fn global(resource: ResourceType) -> Self {
        Self {
            global: true,
            source: TargetSource::Fixed {
                resource,
                id_param: None,
            },
            network_param: None,
        }
    }

    /// Network-scoped route whose type and id are path parameters.
    pub fn network_subjects(
        network_param: &'static str,
        type_param: &'static str,
        id_param: &'static str,
    ) -> Self {
        Self {
            global: false,
            source: TargetSource::PathSubjects {
                type_param,
                id_param,
            },
            network_param: Some(network_param),
        }
    }

    pub fn with_id_param(mut self, name: &'static str) -> Self {
        if let TargetSource::Fixed { id_param, .. } = &mut self.source {
            *id_param = Some(name);
        }
        self
    }

    pub fn source(&self) -> &TargetSource {
        &self.source
    }

    /// Build the request from decoded path parameters.
    pub fn access_request(
        &self,
        operation: Operation,
        params: &HashMap<String, String>,
    ) -> AccessRequest {
        let param = |name: Option<&'static str>| {
            name.and_then(|name| params.get(name))
                .map(String::as_str)
                .unwrap_or_default()
        };
        let base = if self.global {
            AccessRequest::global(operation)
        } else {
            AccessRequest::network(operation, param(self.network_param))
        };
        match &self.source {
            TargetSource::Fixed { resource, id_param } => {
                base.target(*resource).with_id(param(*id_param))
            }
            TargetSource::PathSubjects {
                type_param,
                id_param,
            } => base
                .target_raw(param(Some(*type_param)))
                .with_id(param(Some(*id_param))),
        }
    }
}
