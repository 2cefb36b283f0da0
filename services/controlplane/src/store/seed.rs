//! YAML seed data for the in-memory store.
//!
//! Role, group, actor, and external-client records are created by management
//! APIs outside this service; a seed file stands in for them at startup.
//!
//! ```yaml
//! roles:
//!   - role_id: platform-user
//!   - role_id: host-viewer
//!     network_id: n1
//!     network_level_access:
//!       hosts:
//!         all_hosts: { read: true }
//! actors:
//!   - actor_id: alice
//!     platform_role: platform-user
//!     network_roles:
//!       n1: [host-viewer]
//! ```
use super::{ControlPlaneStore, StoreResult};
use anyhow::{Context, Result};
use mesh_authz::{Actor, ExternalClient, Group, Role};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Seed {
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub actors: Vec<Actor>,
    #[serde(default)]
    pub external_clients: Vec<ExternalClient>,
}

impl Seed {
    pub fn from_yaml(contents: &str) -> Result<Self> {
        serde_yaml::from_str(contents).with_context(|| "parse seed yaml")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("read seed file: {}", path.display()))?;
        Self::from_yaml(&contents)
    }

    /// Write every record into `store`, replacing records with the same id.
    pub async fn apply(self, store: &dyn ControlPlaneStore) -> StoreResult<()> {
        let counts = (
            self.roles.len(),
            self.groups.len(),
            self.actors.len(),
            self.external_clients.len(),
        );
        for role in self.roles {
            store.upsert_role(role).await?;
        }
        for group in self.groups {
            store.upsert_group(group).await?;
        }
        for actor in self.actors {
            store.upsert_actor(actor).await?;
        }
        for client in self.external_clients {
            store.upsert_external_client(client).await?;
        }
        tracing::info!(
            roles = counts.0,
            groups = counts.1,
            actors = counts.2,
            external_clients = counts.3,
            "store seeded"
        );
        Ok(())
    }
}
