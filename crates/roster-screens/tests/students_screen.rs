//! Students screen driven end to end over an in-memory collection.

use roster_screens::{ActionOutcome, ListChange, StudentsScreen, ValidationError};
use roster_store::{
    DocumentCollection, InstrumentedCollection, ListenError, RecordStoreClient, SnapshotEvent,
    SqliteCollection, Student,
};

async fn screen() -> StudentsScreen<SqliteCollection> {
    let collection = SqliteCollection::in_memory("students").await.unwrap();
    StudentsScreen::new(RecordStoreClient::new(collection))
}

fn fill(screen: &mut StudentsScreen<impl DocumentCollection>, name: &str, age: &str) {
    screen.form_mut().set_name(name);
    screen.form_mut().set_age_text(age);
}

#[tokio::test]
async fn add_shows_up_in_list_after_pump() {
    let mut screen = screen().await;
    screen.start().await;
    screen.pump();
    assert!(screen.list().is_empty());

    fill(&mut screen, "Ana", "20");
    assert!(matches!(screen.on_add().await, ActionOutcome::Created(_)));
    screen.pump();

    assert_eq!(screen.list().students(), &[Student::new("Ana", 20)]);
    let cards = screen.cards();
    assert_eq!(cards[0].name_line, "Name: Ana");
    assert_eq!(cards[0].age_line, "Age: 20");
}

#[tokio::test]
async fn list_is_untouched_until_pumped() {
    let mut screen = screen().await;
    screen.start().await;
    screen.pump();

    fill(&mut screen, "Ana", "20");
    screen.on_add().await;
    assert!(screen.list().is_empty());

    assert_eq!(screen.next_event().await, Some(ListChange::Replaced));
    assert_eq!(screen.list().len(), 1);
}

#[tokio::test]
async fn invalid_age_makes_no_backend_calls() {
    let collection = SqliteCollection::in_memory("students").await.unwrap();
    let mut screen = StudentsScreen::new(RecordStoreClient::new(InstrumentedCollection::new(
        collection,
    )));
    screen.start().await;

    fill(&mut screen, "Ana", "abc");
    for outcome in [
        screen.on_add().await,
        screen.on_delete().await,
        screen.on_update().await,
    ] {
        assert!(matches!(
            outcome,
            ActionOutcome::Rejected(ValidationError::InvalidAge(ref raw)) if raw == "abc"
        ));
    }

    let calls = screen.client().collection().calls();
    assert_eq!(calls.data_calls(), 0);
    assert_eq!(calls.listen, 1);
}

#[tokio::test]
async fn delete_removes_all_duplicates_from_list() {
    let mut screen = screen().await;
    screen.start().await;

    fill(&mut screen, "Ana", "20");
    screen.on_add().await;
    screen.on_add().await;
    fill(&mut screen, "Bo", "20");
    screen.on_add().await;

    fill(&mut screen, "Ana", "20");
    match screen.on_delete().await {
        ActionOutcome::Mutated(report) => assert_eq!(report.succeeded(), 2),
        other => panic!("unexpected outcome: {other:?}"),
    }
    screen.pump();

    assert_eq!(screen.list().students(), &[Student::new("Bo", 20)]);
}

#[tokio::test]
async fn update_changes_age_of_every_namesake() {
    let mut screen = screen().await;
    screen.start().await;

    fill(&mut screen, "Ana", "20");
    screen.on_add().await;
    fill(&mut screen, "Ana", "30");
    screen.on_add().await;

    fill(&mut screen, "Ana", "44");
    screen.on_update().await;
    screen.pump();

    assert_eq!(
        screen.list().students(),
        &[Student::new("Ana", 44), Student::new("Ana", 44)]
    );
}

#[tokio::test]
async fn deleting_last_record_empties_list() {
    let mut screen = screen().await;
    screen.start().await;

    fill(&mut screen, "Ana", "20");
    screen.on_add().await;
    screen.pump();
    assert_eq!(screen.list().len(), 1);

    screen.on_delete().await;
    screen.pump();
    assert!(screen.list().is_empty());
}

#[tokio::test]
async fn missing_and_error_pushes_keep_last_good_list() {
    let collection = SqliteCollection::in_memory("students").await.unwrap();
    let hub = collection.hub().clone();
    let mut screen = StudentsScreen::new(RecordStoreClient::new(collection));
    screen.start().await;

    fill(&mut screen, "Ana", "20");
    screen.on_add().await;
    screen.pump();

    hub.publish("students", SnapshotEvent::Missing);
    hub.publish("students", SnapshotEvent::Error(ListenError::new("offline")));
    assert_eq!(screen.pump(), 2);

    assert_eq!(screen.list().students(), &[Student::new("Ana", 20)]);
}

#[tokio::test]
async fn start_registers_only_once() {
    let collection = SqliteCollection::in_memory("students").await.unwrap();
    let hub = collection.hub().clone();
    let mut screen = StudentsScreen::new(RecordStoreClient::new(collection));

    screen.start().await;
    screen.start().await;
    assert!(screen.is_listening());
    assert_eq!(hub.listener_count("students"), 1);
}

#[tokio::test]
async fn close_is_idempotent_and_releases_listener() {
    let collection = SqliteCollection::in_memory("students").await.unwrap();
    let hub = collection.hub().clone();
    let mut screen = StudentsScreen::new(RecordStoreClient::new(collection));
    screen.start().await;

    screen.close();
    screen.close();
    assert!(screen.is_closed());
    assert!(!screen.is_listening());
    assert_eq!(hub.listener_count("students"), 0);
    assert_eq!(screen.next_event().await, None);

    screen.start().await;
    assert_eq!(hub.listener_count("students"), 0);
}

#[tokio::test]
async fn closing_never_started_screen_is_a_no_op() {
    let mut screen = screen().await;
    screen.close();
    screen.close();
    assert_eq!(screen.pump(), 0);
}

#[tokio::test]
async fn dropping_screen_releases_listener() {
    let collection = SqliteCollection::in_memory("students").await.unwrap();
    let hub = collection.hub().clone();
    {
        let mut screen = StudentsScreen::new(RecordStoreClient::new(collection));
        screen.start().await;
        assert_eq!(hub.listener_count("students"), 1);
    }
    assert_eq!(hub.listener_count("students"), 0);
}

#[tokio::test]
async fn other_screen_writes_reach_this_list() {
    let collection = SqliteCollection::in_memory("students").await.unwrap();
    let mut watching = StudentsScreen::new(RecordStoreClient::new(collection.clone()));
    let mut editing = StudentsScreen::new(RecordStoreClient::new(collection));
    watching.start().await;

    fill(&mut editing, "Remote", "5");
    editing.on_add().await;
    watching.pump();

    assert_eq!(watching.list().students(), &[Student::new("Remote", 5)]);
}
