//! ACL resolution: own list, materialization from the inheritance chain,
//! and the unavailable case.

use assert_matches::assert_matches;
use meshpod_access::AclReconciler;
use meshpod_core::{AccessModes, AclDocument, MeshpodError, Uri};
use meshpod_testkit::{factories, MemoryAclStore};
use std::sync::Arc;

fn reconciler(acls: &MemoryAclStore) -> AclReconciler {
    AclReconciler::new(Arc::new(acls.clone()))
}

#[tokio::test]
async fn own_list_wins_over_inherited() {
    let acls = MemoryAclStore::new();
    let resource = Uri::new("https://owner.example/data/sensor.json");
    let container = Uri::new("https://owner.example/data/");

    let mut own = AclDocument::new();
    own.set_agent(factories::party("owner"), AccessModes::full());
    acls.insert_document(&resource, own.clone());

    let mut inherited = AclDocument::new();
    inherited.set_public(AccessModes::read_only());
    acls.insert_document(&container, inherited);

    let resolved = reconciler(&acls).resolve(&resource).await.expect("resolve");
    assert!(!resolved.materialized);
    assert_eq!(resolved.document, own);
}

#[tokio::test]
async fn materialized_list_is_persisted_on_the_next_save() {
    let acls = MemoryAclStore::new();
    let resource = Uri::new("https://owner.example/data/sensor.json");
    let container = Uri::new("https://owner.example/data/");
    let owner = factories::party("owner");
    let requester = factories::party("requester");

    let mut inherited = AclDocument::new();
    inherited.set_agent(owner.clone(), AccessModes::full());
    acls.insert_document(&container, inherited);

    let reconciler = reconciler(&acls);
    let resolved = reconciler.resolve(&resource).await.expect("resolve");
    assert!(resolved.materialized);
    // Resolution alone writes nothing.
    assert_eq!(acls.document(&resource), None);

    reconciler
        .set_agent_access(&resource, &requester, AccessModes::full())
        .await
        .expect("grant");

    // The save persisted the inherited entries along with the new grant.
    let saved = acls.document(&resource).expect("own list now exists");
    assert_eq!(saved.agent_modes(&owner), AccessModes::full());
    assert_eq!(saved.agent_modes(&requester), AccessModes::full());
}

#[tokio::test]
async fn no_reachable_list_is_an_error_not_an_invention() {
    let acls = MemoryAclStore::new();
    let err = reconciler(&acls)
        .resolve(&Uri::new("https://owner.example/data/orphan.json"))
        .await
        .expect_err("nothing reachable");
    assert_matches!(err, MeshpodError::AclUnavailable { .. });
}

#[tokio::test]
async fn empty_modes_are_a_full_revoke() {
    let acls = MemoryAclStore::new();
    let resource = Uri::new("https://owner.example/data/sensor.json");
    let requester = factories::party("requester");

    let mut own = AclDocument::new();
    own.set_agent(requester.clone(), AccessModes::full());
    acls.insert_document(&resource, own);

    reconciler(&acls)
        .set_agent_access(&resource, &requester, AccessModes::none())
        .await
        .expect("revoke");

    let saved = acls.document(&resource).expect("own list kept");
    assert_eq!(saved.agent_modes(&requester), AccessModes::none());
    assert!(saved.is_empty());
}

#[tokio::test]
async fn public_grant_is_set_and_cleared_independently() {
    let acls = MemoryAclStore::new();
    let resource = Uri::new("https://owner.example/data/sensor.json");
    let owner = factories::party("owner");

    let mut own = AclDocument::new();
    own.set_agent(owner.clone(), AccessModes::full());
    acls.insert_document(&resource, own);

    let reconciler = reconciler(&acls);
    reconciler
        .set_public_access(&resource, AccessModes::read_only())
        .await
        .expect("publish");
    let saved = acls.document(&resource).expect("list");
    assert_eq!(saved.public_modes(), AccessModes::read_only());
    assert_eq!(saved.agent_modes(&owner), AccessModes::full());

    reconciler
        .set_public_access(&resource, AccessModes::none())
        .await
        .expect("unpublish");
    let saved = acls.document(&resource).expect("list");
    assert_eq!(saved.public_modes(), AccessModes::none());
}
