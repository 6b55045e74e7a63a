//! Behavioral tests for the record store.
//!
//! - `crud.rs`            - create, find, update/delete by content (duplicates included)
//! - `partial_failure.rs` - per-document failures in the mutation phase
//! - `live.rs`            - live query pushes and listener lifecycle


use crate::instrumented::InstrumentedCollection;
use crate::live::{LiveQuery, SnapshotEvent};
use crate::types::{QuerySnapshot, Student};
use crate::{RecordStoreClient, SqliteCollection};

type TestClient = RecordStoreClient<SqliteCollection>;
type InstrumentedClient = RecordStoreClient<InstrumentedCollection<SqliteCollection>>;

async fn client() -> TestClient {
    RecordStoreClient::new(SqliteCollection::in_memory("students").await.unwrap())
}

async fn instrumented_client() -> InstrumentedClient {
    let collection = SqliteCollection::in_memory("students").await.unwrap();
    RecordStoreClient::new(InstrumentedCollection::new(collection))
}

/// Takes every queued event and returns the last snapshot among them.
fn latest_snapshot(live: &mut LiveQuery) -> Option<QuerySnapshot> {
    let mut latest = None;
    while let Some(event) = live.try_next() {
        if let SnapshotEvent::Snapshot(snapshot) = event {
            latest = Some(snapshot);
        }
    }
    latest
}

fn students(snapshot: &QuerySnapshot) -> Vec<Student> {
    snapshot.students()
}

/// Basic workflow: create, live push, update, delete.
#[tokio::test]
async fn basic_workflow() {
    let client = client().await;
    let mut live = client.listen().await;

    client.create(Student::new("Ana", 20)).await.unwrap();
    client.create(Student::new("Bo", 31)).await.unwrap();

    let snapshot = latest_snapshot(&mut live).unwrap();
    assert_eq!(
        students(&snapshot),
        vec![Student::new("Ana", 20), Student::new("Bo", 31)]
    );

    let updated = client.update_age_matching("Ana", 21).await.unwrap();
    assert_eq!(updated.succeeded(), 1);

    let deleted = client.delete_matching("Bo", 31).await.unwrap();
    assert_eq!(deleted.succeeded(), 1);

    let snapshot = latest_snapshot(&mut live).unwrap();
    assert_eq!(students(&snapshot), vec![Student::new("Ana", 21)]);

    live.stop();
}
