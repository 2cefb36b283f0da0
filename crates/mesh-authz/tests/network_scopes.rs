mod common;

use common::FixtureStore;
use mesh_authz::{
    AccessRequest, Actor, ActorId, Decision, DenyReason, Group, Operation, PermissionScope,
    ResourceType, Role, authorize,
};

fn platform_user() -> Role {
    Role::new("platform-user")
}

fn host_viewer() -> Role {
    Role::new("host-viewer").for_network("n1").grant_network(
        ResourceType::Host,
        ResourceType::Host.wildcard(),
        PermissionScope::read_only(),
    )
}

fn client_creator() -> Role {
    Role::new("client-creator").for_network("n2").grant_network(
        ResourceType::ExternalClient,
        ResourceType::ExternalClient.wildcard(),
        PermissionScope {
            create: true,
            ..PermissionScope::default()
        },
    )
}

fn store() -> FixtureStore {
    FixtureStore::default()
        .with_role(platform_user())
        .with_role(host_viewer())
        .with_role(client_creator())
        .with_actor(Actor::new("alice", "platform-user").with_network_role("n1", "host-viewer"))
        .with_actor(Actor::new("bob", "platform-user").in_group("n2-operators"))
        .with_group(Group::new("n2-operators").with_network_role("n2", "client-creator"))
}

#[tokio::test]
async fn direct_network_role_grants_reads_only() {
    let store = store();
    let alice = ActorId::new("alice");

    let read = AccessRequest::network(Operation::Read, "n1").target(ResourceType::Host);
    assert!(authorize(&store, &alice, &read).await.is_allowed());

    let delete = AccessRequest::network(Operation::Delete, "n1").target(ResourceType::Host);
    assert_eq!(
        authorize(&store, &alice, &delete).await,
        Decision::Deny(DenyReason::AccessDenied)
    );

    let other_network = AccessRequest::network(Operation::Read, "n2").target(ResourceType::Host);
    assert!(!authorize(&store, &alice, &other_network).await.is_allowed());
}

#[tokio::test]
async fn group_role_grants_create_on_its_network() {
    let store = store();
    let bob = ActorId::new("bob");

    let create = AccessRequest::network(Operation::Create, "n2").target(ResourceType::ExternalClient);
    assert!(authorize(&store, &bob, &create).await.is_allowed());

    let read = AccessRequest::network(Operation::Read, "n2")
        .target(ResourceType::ExternalClient)
        .with_id("laptop");
    assert!(!authorize(&store, &bob, &read).await.is_allowed());

    let elsewhere = AccessRequest::network(Operation::Create, "n1").target(ResourceType::ExternalClient);
    assert!(!authorize(&store, &bob, &elsewhere).await.is_allowed());
}

#[tokio::test]
async fn missing_metadata_is_reported() {
    let store = store();
    let alice = ActorId::new("alice");
    assert_eq!(
        authorize(&store, &alice, &AccessRequest::network(Operation::Read, "n1")).await,
        Decision::Deny(DenyReason::TargetTypeMissing)
    );
    let no_network = AccessRequest::network(Operation::Read, "").target(ResourceType::Host);
    assert_eq!(
        authorize(&store, &alice, &no_network).await,
        Decision::Deny(DenyReason::NetworkIdMissing)
    );
}

#[tokio::test]
async fn metrics_always_allowed() {
    let store = store();
    for operation in Operation::ALL {
        let request = AccessRequest::network(operation, "n9").target(ResourceType::Metric);
        assert!(authorize(&store, &ActorId::new("bob"), &request).await.is_allowed());
    }
}

#[tokio::test]
async fn full_access_platform_role_allows_everything() {
    let store = FixtureStore::default()
        .with_role(Role::new("super-admin").with_full_access())
        .with_actor(Actor::new("root", "super-admin"));
    let root = ActorId::new("root");
    for operation in Operation::ALL {
        for resource in ResourceType::ALL {
            for id in ["", "x1"] {
                let request = AccessRequest::network(operation, "n1").target(resource).with_id(id);
                assert!(authorize(&store, &root, &request).await.is_allowed());
            }
        }
    }
    assert_eq!(store.lookups(), {
        let mut expected = Vec::new();
        for _ in 0..Operation::ALL.len() * ResourceType::ALL.len() * 2 {
            expected.push("actor:root".to_string());
            expected.push("role:super-admin".to_string());
        }
        expected
    });
}

#[tokio::test]
async fn full_access_network_role_allows_everything_on_that_network() {
    let store = FixtureStore::default()
        .with_role(platform_user())
        .with_role(Role::new("net-admin").for_network("n1").with_full_access())
        .with_actor(Actor::new("carol", "platform-user").with_network_role("n1", "net-admin"));
    let carol = ActorId::new("carol");
    for operation in Operation::ALL {
        let request = AccessRequest::network(operation, "n1")
            .target_raw("widgets")
            .with_id("w1");
        assert!(authorize(&store, &carol, &request).await.is_allowed());
    }
}

#[tokio::test]
async fn unknown_actor_denies_with_lookup_reason() {
    let store = store();
    let request = AccessRequest::network(Operation::Read, "n1").target(ResourceType::Metric);
    let decision = authorize(&store, &ActorId::new("mallory"), &request).await;
    assert_eq!(
        decision.deny_reason().map(ToString::to_string),
        Some("actor mallory not found".to_string())
    );
}

#[tokio::test]
async fn missing_platform_role_denies() {
    let store = FixtureStore::default()
        .with_role(host_viewer())
        .with_actor(Actor::new("dave", "deleted-role").with_network_role("n1", "host-viewer"));
    let request = AccessRequest::network(Operation::Read, "n1").target(ResourceType::Host);
    assert_eq!(
        authorize(&store, &ActorId::new("dave"), &request).await,
        Decision::Deny(DenyReason::AccessDenied)
    );
}

#[tokio::test]
async fn failing_roles_and_groups_are_skipped() {
    let store = FixtureStore::default()
        .with_role(platform_user())
        .with_role(host_viewer())
        .with_unavailable_role("broken")
        .with_actor(
            Actor::new("erin", "platform-user")
                .with_network_role("n1", "broken")
                .with_network_role("n1", "host-viewer")
                .in_group("missing-group"),
        );
    let request = AccessRequest::network(Operation::Read, "n1")
        .target(ResourceType::Host)
        .with_id("h1");
    assert!(authorize(&store, &ActorId::new("erin"), &request).await.is_allowed());
}

#[tokio::test]
async fn each_record_is_fetched_once() {
    let shared = Role::new("shared").grant_network(
        ResourceType::Dns,
        ResourceType::Dns.wildcard(),
        PermissionScope::read_only(),
    );
    let store = FixtureStore::default()
        .with_role(platform_user())
        .with_role(shared)
        .with_group(Group::new("g1").with_network_role("n1", "shared"))
        .with_group(Group::new("g2").with_network_role("n1", "shared"))
        .with_actor(
            Actor::new("frank", "platform-user")
                .with_network_role("n1", "shared")
                .in_group("g1")
                .in_group("g2"),
        );
    let request = AccessRequest::network(Operation::Delete, "n1")
        .target(ResourceType::Dns)
        .with_id("d1");
    assert!(!authorize(&store, &ActorId::new("frank"), &request).await.is_allowed());
    assert_eq!(
        store.lookups(),
        vec![
            "actor:frank",
            "role:platform-user",
            "group:g1",
            "group:g2",
            "role:shared",
        ]
    );
}
