//! Membership reconciliation across registry containers: removals on
//! departure, single-record insertion, on-demand private registries, and
//! per-container failure isolation.

use meshpod_core::{
    AccessModes, ClockRef, PodStorageEffects, RegistryConfig, RegistryMembership, Uri,
};
use meshpod_registry::RegistryMembershipSynchronizer;
use meshpod_testkit::{factories, ManualClock, MemoryAclStore, MemoryPodStorage};
use std::sync::Arc;

struct Fixture {
    storage: MemoryPodStorage,
    acls: MemoryAclStore,
    clock: ManualClock,
    sync: RegistryMembershipSynchronizer,
}

fn fixture() -> Fixture {
    let storage = MemoryPodStorage::new();
    let acls = MemoryAclStore::new();
    let clock = ManualClock::fixed();
    let sync = RegistryMembershipSynchronizer::new(
        Arc::new(storage.clone()),
        Arc::new(acls.clone()),
        Arc::new(clock.clone()) as ClockRef,
    );
    Fixture {
        storage,
        acls,
        clock,
        sync,
    }
}

fn registry(name: &str) -> Uri {
    Uri::new(format!("https://{}.example/registry/", name))
}

async fn records_for(storage: &MemoryPodStorage, container: &Uri, party: &Uri) -> Vec<Uri> {
    let members = match storage.list_container(container).await {
        Ok(members) => members,
        Err(_) => return Vec::new(),
    };
    let mut found = Vec::new();
    for uri in members {
        if let Ok(graph) = storage.read_graph(&uri).await {
            if let Some(record) = RegistryMembership::from_graph(uri.clone(), &graph) {
                if record.member_id == *party {
                    found.push(uri);
                }
            }
        }
    }
    found
}

#[tokio::test]
async fn switching_registries_moves_the_record() {
    let fixture = fixture();
    let party = factories::party("owner");
    let (reg_a, reg_b, reg_c) = (registry("a"), registry("b"), registry("c"));
    for container in [&reg_a, &reg_b, &reg_c] {
        fixture.storage.insert_container(container);
    }

    let before = RegistryConfig::research(
        [reg_a.clone(), reg_b.clone()],
        registry("owner-private"),
    );
    let report = fixture.sync.sync_membership(&party, None, &before).await;
    assert!(report.is_clean());
    assert_eq!(report.inserted.len(), 2);

    let after = RegistryConfig::research(
        [reg_b.clone(), reg_c.clone()],
        registry("owner-private"),
    );
    let report = fixture
        .sync
        .sync_membership(&party, Some(&before), &after)
        .await;
    assert!(report.is_clean());
    assert_eq!(report.removed, vec![reg_a.clone()]);
    assert_eq!(report.inserted, vec![reg_c.clone()]);

    assert!(records_for(&fixture.storage, &reg_a, &party).await.is_empty());
    assert_eq!(records_for(&fixture.storage, &reg_b, &party).await.len(), 1);
    assert_eq!(records_for(&fixture.storage, &reg_c, &party).await.len(), 1);
}

#[tokio::test]
async fn repeated_sync_is_idempotent() {
    let fixture = fixture();
    let party = factories::party("owner");
    let reg_a = registry("a");
    fixture.storage.insert_container(&reg_a);

    let config = RegistryConfig::research([reg_a.clone()], registry("owner-private"));
    let first = fixture.sync.sync_membership(&party, None, &config).await;
    assert_eq!(first.inserted, vec![reg_a.clone()]);

    let second = fixture
        .sync
        .sync_membership(&party, Some(&config), &config)
        .await;
    assert!(second.is_clean());
    assert!(second.inserted.is_empty());
    assert!(second.removed.is_empty());

    assert_eq!(records_for(&fixture.storage, &reg_a, &party).await.len(), 1);
}

#[tokio::test]
async fn other_parties_records_are_left_alone() {
    let fixture = fixture();
    let party = factories::party("owner");
    let neighbor = factories::party("neighbor");
    let reg_a = registry("a");
    fixture.storage.insert_container(&reg_a);
    fixture.storage.insert_graph(
        &reg_a.join("registration-neighbor"),
        RegistryMembership::membership_graph(&neighbor, fixture.clock.current()),
    );

    let before = RegistryConfig::research([reg_a.clone()], registry("owner-private"));
    fixture.sync.sync_membership(&party, None, &before).await;
    let after = RegistryConfig::research([], registry("owner-private"));
    let report = fixture
        .sync
        .sync_membership(&party, Some(&before), &after)
        .await;

    assert_eq!(report.removed, vec![reg_a.clone()]);
    assert!(records_for(&fixture.storage, &reg_a, &party).await.is_empty());
    assert_eq!(
        records_for(&fixture.storage, &reg_a, &neighbor).await.len(),
        1
    );
}

#[tokio::test]
async fn private_mode_creates_the_registry_with_a_public_read_grant() {
    let fixture = fixture();
    let party = factories::party("owner");
    let private = registry("owner-private");

    let config = RegistryConfig::private(private.clone());
    let report = fixture.sync.sync_membership(&party, None, &config).await;
    assert!(report.is_clean());
    assert_eq!(report.inserted, vec![private.clone()]);

    assert!(fixture.storage.container_exists(&private));
    assert_eq!(records_for(&fixture.storage, &private, &party).await.len(), 1);

    let acl = fixture.acls.document(&private).expect("registry acl");
    assert_eq!(acl.agent_modes(&party), AccessModes::full());
    assert_eq!(acl.public_modes(), AccessModes::read_only());
}

#[tokio::test]
async fn existing_private_registry_keeps_its_acl() {
    let fixture = fixture();
    let party = factories::party("owner");
    let private = registry("owner-private");
    fixture.storage.insert_container(&private);

    let config = RegistryConfig::private(private.clone());
    fixture.sync.sync_membership(&party, None, &config).await;

    // The container pre-existed, so no ACL was written for it.
    assert_eq!(fixture.acls.document(&private), None);
    assert_eq!(records_for(&fixture.storage, &private, &party).await.len(), 1);
}

#[tokio::test]
async fn unreachable_departed_container_is_treated_as_clean() {
    let fixture = fixture();
    let party = factories::party("owner");
    let (reg_gone, reg_b) = (registry("gone"), registry("b"));
    fixture.storage.insert_container(&reg_b);
    // reg_gone was never registered as a container: listing it is not-found.

    let before = RegistryConfig::research(
        [reg_gone.clone(), reg_b.clone()],
        registry("owner-private"),
    );
    let after = RegistryConfig::research([reg_b.clone()], registry("owner-private"));
    let report = fixture
        .sync
        .sync_membership(&party, Some(&before), &after)
        .await;

    assert!(report.is_clean());
    assert!(report.removed.is_empty());
}

#[tokio::test]
async fn one_broken_container_does_not_block_the_rest() {
    let fixture = fixture();
    let party = factories::party("owner");
    let (reg_broken, reg_ok) = (registry("broken"), registry("ok"));
    fixture.storage.insert_container(&reg_broken);
    fixture.storage.insert_container(&reg_ok);
    fixture.storage.poison(&reg_broken);

    let config = RegistryConfig::research(
        [reg_broken.clone(), reg_ok.clone()],
        registry("owner-private"),
    );
    let report = fixture.sync.sync_membership(&party, None, &config).await;

    assert_eq!(report.inserted, vec![reg_ok.clone()]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].0, reg_broken);
    assert_eq!(records_for(&fixture.storage, &reg_ok, &party).await.len(), 1);
}
