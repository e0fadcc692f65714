use std::collections::HashSet;
use std::time::Duration;
use swipelist_core::{ChangeKind, Person, PersonStore, ScopeError, StoreError};

fn three() -> Vec<Person> {
    vec![
        Person::new(1, "Bill", 99),
        Person::new(2, "Teddy", 88),
        Person::new(3, "Shelly", 44),
    ]
}

fn ids(store: &PersonStore) -> Vec<i64> {
    store.snapshot().iter().map(|person| person.id).collect()
}

fn assert_unique_ids(store: &PersonStore) {
    let ids = ids(store);
    assert_eq!(ids.iter().collect::<HashSet<_>>().len(), ids.len());
}

#[test]
fn seeded_store_holds_six_people() {
    let store = PersonStore::seeded();
    assert_eq!(store.len(), 6);
    assert_eq!(store.get(0).unwrap(), Person::new(1, "Bill", 99));
    assert_eq!(store.get(5).unwrap(), Person::new(6, "Marcy", 333));
}

#[test]
fn insert_at_shifts_following_rows() {
    let store = PersonStore::from_persons(three()).unwrap();
    store.insert_at(1, Person::new(9, "Zed", 30)).unwrap();
    assert_eq!(ids(&store), vec![1, 9, 2, 3]);
}

#[test]
fn insert_at_past_end_is_rejected_without_change() {
    let store = PersonStore::from_persons(three()).unwrap();
    let err = store.insert_at(4, Person::new(9, "Zed", 30)).unwrap_err();
    assert_eq!(err, StoreError::IndexOutOfRange { index: 4, len: 3 });
    assert_eq!(ids(&store), vec![1, 2, 3]);
}

#[test]
fn insert_and_push_reject_duplicate_ids() {
    let store = PersonStore::from_persons(three()).unwrap();
    assert_eq!(
        store.insert_at(0, Person::new(2, "Other Teddy", 1)).unwrap_err(),
        StoreError::DuplicateId(2)
    );
    assert_eq!(
        store.push(Person::new(3, "Other Shelly", 1)).unwrap_err(),
        StoreError::DuplicateId(3)
    );
    assert_unique_ids(&store);
}

#[test]
fn remove_by_identity_matches_by_value() {
    let store = PersonStore::from_persons(three()).unwrap();

    assert_eq!(store.remove_by_identity(&Person::new(2, "Teddy", 87)), None);
    assert_eq!(store.remove_by_identity(&Person::new(2, "Teddy", 88)), Some(1));
    assert_eq!(store.remove_by_identity(&Person::new(2, "Teddy", 88)), None);
    assert_eq!(ids(&store), vec![1, 3]);
}

#[test]
fn ids_stay_unique_across_mixed_mutations() {
    let store = PersonStore::seeded();
    let operations: Vec<Box<dyn Fn(&PersonStore)>> = vec![
        Box::new(|store| {
            let first = store.get(0).unwrap();
            store.remove_by_identity(&first);
        }),
        Box::new(|store| {
            let _ = store.insert_at(0, Person::new(1, "Bill", 99));
        }),
        Box::new(|store| {
            let _ = store.insert_at(2, Person::new(1, "Bill", 99));
        }),
        Box::new(|store| {
            let _ = store.push(Person::new(7, "New", 1));
        }),
        Box::new(|store| {
            let _ = store.insert_at(store.len(), Person::new(7, "New", 1));
        }),
    ];

    for operation in operations {
        operation(&store);
        assert_unique_ids(&store);
    }
    assert_eq!(store.len(), 7);
}

#[tokio::test(start_paused = true)]
async fn add_appends_only_after_delay() {
    let store = PersonStore::from_persons(three()).unwrap();
    let mut changes = store.subscribe();

    store.add(Person::new(7, "New", 1)).unwrap();
    assert_eq!(ids(&store), vec![1, 2, 3]);

    tokio::time::sleep(Duration::from_millis(499)).await;
    assert_eq!(ids(&store), vec![1, 2, 3]);

    tokio::time::sleep(Duration::from_millis(2)).await;
    assert_eq!(ids(&store), vec![1, 2, 3, 7]);

    let change = changes.recv().await.unwrap();
    assert_eq!(change.kind, ChangeKind::Appended { index: 3 });
    assert_eq!(change.revision, 1);
}

#[tokio::test(start_paused = true)]
async fn add_uses_configured_delay() {
    let store = PersonStore::from_persons(three())
        .unwrap()
        .with_add_delay(Duration::from_millis(50));

    store.add(Person::new(7, "New", 1)).unwrap();
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(store.len(), 4);
}

#[tokio::test(start_paused = true)]
async fn add_with_taken_id_is_skipped_at_apply_time() {
    let store = PersonStore::from_persons(three()).unwrap();

    store.add(Person::new(7, "New", 1)).unwrap();
    store.push(Person::new(7, "Pushed", 2)).unwrap();
    tokio::time::sleep(Duration::from_millis(600)).await;

    assert_eq!(ids(&store), vec![1, 2, 3, 7]);
    assert_eq!(store.get(3).unwrap().name, "Pushed");
}

#[tokio::test(start_paused = true)]
async fn close_cancels_pending_add() {
    let store = PersonStore::from_persons(three()).unwrap();

    store.add(Person::new(7, "New", 1)).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    store.close();
    tokio::time::sleep(Duration::from_millis(1_000)).await;

    assert_eq!(ids(&store), vec![1, 2, 3]);
    assert_eq!(
        store.add(Person::new(8, "Late", 1)).unwrap_err(),
        StoreError::Scope(ScopeError::Closed)
    );
}
