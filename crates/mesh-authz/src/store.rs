use crate::{
    Actor, ActorId, ClientId, ExternalClient, Group, GroupId, LookupError, NetworkId, Role, RoleId,
};
use async_trait::async_trait;

pub type LookupResult<T> = Result<T, LookupError>;

/// Read-only access to the records the engine evaluates.
///
/// Implementations return [`LookupError::NotFound`] for missing records and
/// [`LookupError::Unavailable`] for backend failures; the engine turns both
/// into denials.
#[async_trait]
pub trait AccessStore: Send + Sync {
    async fn fetch_actor(&self, actor_id: &ActorId) -> LookupResult<Actor>;
    async fn fetch_role(&self, role_id: &RoleId) -> LookupResult<Role>;
    async fn fetch_group(&self, group_id: &GroupId) -> LookupResult<Group>;
    async fn fetch_external_client(
        &self,
        client_id: &ClientId,
        network_id: &NetworkId,
    ) -> LookupResult<ExternalClient>;

    fn is_owner(&self, actor_id: &ActorId, client: &ExternalClient) -> bool {
        client.is_owned_by(actor_id)
    }
}
