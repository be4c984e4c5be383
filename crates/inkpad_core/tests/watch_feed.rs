use inkpad_core::db::open_db_in_memory;
use inkpad_core::{ContentItem, ImageStore, NoteService, NoteServiceError};
use std::path::Path;
use std::thread;

fn service(dir: &Path) -> NoteService {
    let conn = open_db_in_memory().unwrap();
    let images = ImageStore::new(dir.join("images")).unwrap();
    NoteService::new(conn, images)
}

#[test]
fn feed_yields_current_snapshot_and_refreshes_after_mutations() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(dir.path());
    let mut feed = service.watch(None);

    assert!(feed.current().unwrap().is_empty());
    assert!(feed.try_next().unwrap().is_none());

    let note = service
        .add_note("first", vec![ContentItem::text("body")], 1, false)
        .unwrap();

    let refreshed = feed.try_next().unwrap().expect("mutation must notify");
    assert_eq!(refreshed.len(), 1);
    assert_eq!(refreshed[0].id, note.id);

    service.delete_note(note.id).unwrap();
    let after_delete = feed.try_next().unwrap().expect("delete must notify");
    assert!(after_delete.is_empty());
}

#[test]
fn query_feed_follows_only_the_matching_subset() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(dir.path());
    let mut feed = service.watch(Some("plan".to_string()));

    service.add_note("plan alpha", vec![], 1, false).unwrap();
    service.add_note("unrelated", vec![], 2, false).unwrap();

    let snapshot = feed.try_next().unwrap().expect("mutations must notify");
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].title, "plan alpha");
}

#[test]
fn backlog_of_events_collapses_into_one_fresh_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(dir.path());
    let note = service.add_note("pin target", vec![], 1, false).unwrap();
    let mut feed = service.watch(None);

    // More events than the channel buffers; the feed must lag-skip to the
    // freshest committed state instead of failing.
    for _ in 0..20 {
        service.switch_pin_status(note.id).unwrap();
    }

    let snapshot = feed.try_next().unwrap().expect("backlog must notify");
    assert_eq!(snapshot.len(), 1);
    assert!(!snapshot[0].is_pinned);

    assert!(feed.try_next().unwrap().is_none());
}

#[test]
fn every_subscriber_observes_the_same_mutation() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(dir.path());
    let mut first = service.watch(None);
    let mut second = service.watch(None);

    service.add_note("shared", vec![], 1, false).unwrap();

    assert_eq!(first.try_next().unwrap().expect("notify first").len(), 1);
    assert_eq!(second.try_next().unwrap().expect("notify second").len(), 1);
}

#[test]
fn blocking_next_wakes_on_a_writer_thread() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(dir.path());
    let mut feed = service.watch(None);

    let writer = {
        let service = service.clone();
        thread::spawn(move || {
            service
                .add_note("from writer", vec![ContentItem::text("x")], 1, false)
                .unwrap();
        })
    };

    let snapshot = feed.next().unwrap();
    writer.join().unwrap();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].title, "from writer");
}

#[test]
fn feed_reports_closed_once_all_service_handles_are_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(dir.path());
    let mut feed = service.watch(None);
    drop(service);

    let err = feed.try_next().unwrap_err();
    assert!(matches!(err, NoteServiceError::FeedClosed));
}
