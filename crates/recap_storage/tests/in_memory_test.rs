use recap_core::{NewSummary, RequesterId, ResourceId};
use recap_interface::{ResourceDirectory, SummaryStore};
use recap_storage::{InMemoryResourceDirectory, InMemorySummaryStore};

fn summary(resource: &str, text: &str) -> NewSummary {
    NewSummary::new(
        ResourceId::new(resource),
        text,
        "gpt-4o-mini",
        "meeting-summary-v1",
        250,
        1,
    )
}

#[tokio::test]
async fn directory_distinguishes_missing_from_owned() {
    let directory = InMemoryResourceDirectory::new();
    directory.insert("mtg-1", "alice").await;

    let owner = directory.owner_of(&ResourceId::new("mtg-1")).await.unwrap();
    assert_eq!(owner, Some(RequesterId::new("alice")));

    let missing = directory.owner_of(&ResourceId::new("mtg-2")).await.unwrap();
    assert_eq!(missing, None);

    assert_eq!(directory.lookup_count(), 2);
}

#[tokio::test]
async fn directory_outage_is_a_storage_error() {
    let directory = InMemoryResourceDirectory::new();
    directory.set_unavailable(true);

    let err = directory
        .owner_of(&ResourceId::new("mtg-1"))
        .await
        .unwrap_err();
    assert!(format!("{}", err).contains("unavailable"));
}

#[tokio::test]
async fn upsert_overwrites_instead_of_appending() {
    let store = InMemorySummaryStore::new();

    let first = store.upsert(summary("mtg-1", "first draft")).await.unwrap();
    let second = store.upsert(summary("mtg-1", "second draft")).await.unwrap();

    assert_eq!(store.len().await, 1);
    assert_eq!(store.write_count(), 2);
    assert_eq!(second.id, first.id);
    assert_eq!(second.created_at, first.created_at);
    assert!(second.updated_at >= first.updated_at);

    let stored = store.get(&ResourceId::new("mtg-1")).await.unwrap().unwrap();
    assert_eq!(stored.text, "second draft");
}

#[tokio::test]
async fn different_resources_get_different_rows() {
    let store = InMemorySummaryStore::new();

    let a = store.upsert(summary("mtg-a", "alpha")).await.unwrap();
    let b = store.upsert(summary("mtg-b", "beta")).await.unwrap();

    assert_ne!(a.id, b.id);
    assert_eq!(store.len().await, 2);
}

#[tokio::test]
async fn get_returns_none_for_unknown_resource() {
    let store = InMemorySummaryStore::new();
    assert!(store.is_empty().await);
    assert!(store.get(&ResourceId::new("nope")).await.unwrap().is_none());
}

#[tokio::test]
async fn unavailable_store_counts_the_write_but_keeps_nothing() {
    let store = InMemorySummaryStore::new();
    store.set_unavailable(true);

    assert!(store.upsert(summary("mtg-1", "text")).await.is_err());
    assert_eq!(store.write_count(), 1);

    store.set_unavailable(false);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn concurrent_upserts_leave_one_row() {
    let store = InMemorySummaryStore::new();

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .upsert(summary("mtg-race", &format!("writer {}", i)))
                    .await
                    .unwrap()
            })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().id);
    }

    assert_eq!(store.len().await, 1);
    ids.dedup();
    assert_eq!(ids.len(), 1);
}
