#![allow(dead_code)]

use axum::body::Body;
use axum::routing::RouterIntoService;
use controlplane::app::{AppState, build_router};
use controlplane::store::ControlPlaneStore;
use controlplane::store::memory::InMemoryStore;
use mesh_authz::{
    Actor, ActorId, ActorResolver, ExternalClient, JwtCredentialIssuer, JwtCredentialVerifier,
    PermissionScope, ResourceType, Role,
};
use std::sync::Arc;
use std::time::Duration;

pub const SECRET: &[u8] = b"integration-secret";
pub const ISSUER: &str = "mesh-controlplane";
pub const MASTER_KEY: &str = "m4ster";

pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

/// Records shared by the HTTP tests.
///
/// - `alice`: platform user; reads hosts in `n1`, manages only her own
///   external clients there.
/// - `bob`: platform user with no network roles.
/// - `ops`: reads every user record, may read and update host `h1`.
/// - `root`: full-access platform role.
pub async fn seeded_store() -> InMemoryStore {
    let store = InMemoryStore::new();
    let roles = [
        Role::new("platform-user"),
        Role::new("platform-admin").with_full_access(),
        Role::new("platform-ops")
            .grant_global(
                ResourceType::User,
                ResourceType::User.wildcard(),
                PermissionScope::read_only(),
            )
            .grant_global(
                ResourceType::Host,
                "h1",
                PermissionScope {
                    read: true,
                    update: true,
                    ..PermissionScope::default()
                },
            ),
        Role::new("host-viewer").for_network("n1").grant_network(
            ResourceType::Host,
            ResourceType::Host.wildcard(),
            PermissionScope::read_only(),
        ),
        Role::new("client-user").for_network("n1").grant_network(
            ResourceType::ExternalClient,
            ResourceType::ExternalClient.wildcard(),
            PermissionScope::full().with_self_only(),
        ),
    ];
    for role in roles {
        store.upsert_role(role).await.expect("role");
    }
    let actors = [
        Actor::new("alice", "platform-user")
            .with_network_role("n1", "host-viewer")
            .with_network_role("n1", "client-user"),
        Actor::new("bob", "platform-user"),
        Actor::new("ops", "platform-ops"),
        Actor::new("root", "platform-admin"),
    ];
    for actor in actors {
        store.upsert_actor(actor).await.expect("actor");
    }
    for (client, owner) in [("laptop", "alice"), ("phone", "bob")] {
        store
            .upsert_external_client(ExternalClient {
                client_id: client.into(),
                network_id: "n1".into(),
                owner_id: owner.into(),
            })
            .await
            .expect("client");
    }
    store
}

pub async fn app() -> RouterIntoService<Body, ()> {
    let verifier = JwtCredentialVerifier::new(ISSUER, SECRET, 0);
    let state = AppState {
        store: Arc::new(seeded_store().await),
        resolver: ActorResolver::new(Some(MASTER_KEY.to_string()), Arc::new(verifier)),
    };
    build_router(state).into_service()
}

pub fn token(actor: &str, admin: bool) -> String {
    JwtCredentialIssuer::new(ISSUER, SECRET, Duration::from_secs(600))
        .mint(&ActorId::new(actor), admin, false)
        .expect("mint")
}

pub fn bearer(actor: &str) -> String {
    format!("Bearer {}", token(actor, false))
}

pub fn header<'a>(response: &'a axum::response::Response, name: &str) -> Option<&'a str> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
}
