use inkpad_core::db::open_db_in_memory;
use inkpad_core::{
    ContentItem, CreateNoteCommand, CreateNoteScreen, CreateNoteState, EditNoteCommand,
    EditNoteScreen, EditNoteState, ImageStore, NoteService, NoteServiceError, NotesCommand,
    NotesScreen,
};
use std::fs;
use std::path::{Path, PathBuf};

fn service(dir: &Path) -> NoteService {
    let conn = open_db_in_memory().unwrap();
    let images = ImageStore::new(dir.join("images")).unwrap();
    NoteService::new(conn, images)
}

fn external_image(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, name).unwrap();
    path
}

#[test]
fn create_flow_saves_a_filtered_draft_and_finishes() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(dir.path());
    let image = external_image(dir.path(), "pic.jpg");

    let mut screen = CreateNoteScreen::new(service.clone());
    screen
        .process_command(CreateNoteCommand::InputTitle("Groceries".into()))
        .unwrap();
    screen
        .process_command(CreateNoteCommand::InputContent {
            index: 0,
            text: "Milk".into(),
        })
        .unwrap();
    screen
        .process_command(CreateNoteCommand::AddImage(
            image.to_string_lossy().into_owned(),
        ))
        .unwrap();
    assert!(screen.state().is_save_enabled());

    screen.process_command(CreateNoteCommand::Save).unwrap();
    assert_eq!(screen.state(), &CreateNoteState::Finished);

    let notes = service.all_notes().unwrap();
    assert_eq!(notes.len(), 1);
    let stored = &notes[0];
    assert_eq!(stored.title, "Groceries");
    // The trailing blank editor line is filtered; the image is imported.
    assert_eq!(stored.content.len(), 2);
    assert_eq!(stored.content[0], ContentItem::text("Milk"));
    let image_path = stored.content[1].image_path().unwrap();
    assert!(service.images().is_internal(image_path));
}

#[test]
fn create_flow_back_discards_the_draft() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(dir.path());

    let mut screen = CreateNoteScreen::new(service.clone());
    screen
        .process_command(CreateNoteCommand::InputTitle("discarded".into()))
        .unwrap();
    screen.process_command(CreateNoteCommand::Back).unwrap();

    assert_eq!(screen.state(), &CreateNoteState::Finished);
    assert!(service.all_notes().unwrap().is_empty());
}

#[test]
fn commands_after_finished_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(dir.path());

    let mut screen = CreateNoteScreen::new(service.clone());
    screen.process_command(CreateNoteCommand::Back).unwrap();
    screen
        .process_command(CreateNoteCommand::InputTitle("too late".into()))
        .unwrap();
    screen.process_command(CreateNoteCommand::Save).unwrap();

    assert_eq!(screen.state(), &CreateNoteState::Finished);
    assert!(service.all_notes().unwrap().is_empty());
}

#[test]
fn edit_flow_loads_mutates_and_saves() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(dir.path());
    let created = service
        .add_note("Plans", vec![ContentItem::text("old body")], 1_000, false)
        .unwrap();

    let mut screen = EditNoteScreen::new(service.clone(), created.id).unwrap();
    match screen.state() {
        EditNoteState::Editing(note) => assert_eq!(note.title, "Plans"),
        other => panic!("unexpected state: {other:?}"),
    }

    screen
        .process_command(EditNoteCommand::InputTitle("Plans v2".into()))
        .unwrap();
    screen
        .process_command(EditNoteCommand::InputContent {
            index: 0,
            text: "new body".into(),
        })
        .unwrap();
    screen.process_command(EditNoteCommand::Save).unwrap();
    assert_eq!(screen.state(), &EditNoteState::Finished);

    let stored = service.get_note(created.id).unwrap();
    assert_eq!(stored.title, "Plans v2");
    assert_eq!(stored.content, vec![ContentItem::text("new body")]);
    // Save stamps a fresh updated_at.
    assert!(stored.updated_at >= created.updated_at);
}

#[test]
fn edit_flow_delete_removes_the_note() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(dir.path());
    let created = service
        .add_note("doomed", vec![ContentItem::text("x")], 1, false)
        .unwrap();

    let mut screen = EditNoteScreen::new(service.clone(), created.id).unwrap();
    screen.process_command(EditNoteCommand::Delete).unwrap();
    assert_eq!(screen.state(), &EditNoteState::Finished);

    assert!(matches!(
        service.get_note(created.id).unwrap_err(),
        NoteServiceError::NotFound(_)
    ));
}

#[test]
fn edit_screen_for_missing_note_fails_with_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(dir.path());

    let err = EditNoteScreen::new(service, 404).unwrap_err();
    assert!(matches!(err, NoteServiceError::NotFound(404)));
}

#[test]
fn notes_screen_partitions_pinned_and_unpinned() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(dir.path());
    let pinned = service.add_note("pinned", vec![], 3, true).unwrap();
    let plain_a = service.add_note("plain a", vec![], 2, false).unwrap();
    let plain_b = service.add_note("plain b", vec![], 1, false).unwrap();

    let screen = NotesScreen::new(service).unwrap();
    let state = screen.state();
    assert_eq!(
        state.pinned_notes.iter().map(|n| n.id).collect::<Vec<_>>(),
        vec![pinned.id]
    );
    assert_eq!(
        state.other_notes.iter().map(|n| n.id).collect::<Vec<_>>(),
        vec![plain_a.id, plain_b.id]
    );
}

#[test]
fn notes_screen_search_filters_and_trims_the_query() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(dir.path());
    service.add_note("grocery run", vec![], 1, false).unwrap();
    service.add_note("meeting", vec![], 2, false).unwrap();

    let mut screen = NotesScreen::new(service).unwrap();
    screen
        .process_command(NotesCommand::InputSearchQuery("  grocery ".into()))
        .unwrap();

    let state = screen.state();
    assert_eq!(state.query, "grocery");
    assert_eq!(state.other_notes.len(), 1);
    assert_eq!(state.other_notes[0].title, "grocery run");
}

#[test]
fn notes_screen_pin_toggle_moves_a_note_between_partitions() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(dir.path());
    let note = service.add_note("mover", vec![], 1, false).unwrap();

    let mut screen = NotesScreen::new(service).unwrap();
    assert!(screen.state().pinned_notes.is_empty());

    screen
        .process_command(NotesCommand::SwitchPinnedStatus(note.id))
        .unwrap();
    assert_eq!(screen.state().pinned_notes.len(), 1);
    assert!(screen.state().other_notes.is_empty());

    screen
        .process_command(NotesCommand::SwitchPinnedStatus(note.id))
        .unwrap();
    assert!(screen.state().pinned_notes.is_empty());
    assert_eq!(screen.state().other_notes.len(), 1);
}

#[test]
fn notes_screen_delete_refreshes_the_projection() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(dir.path());
    let doomed = service.add_note("doomed", vec![], 1, false).unwrap();
    service.add_note("kept", vec![], 2, false).unwrap();

    let mut screen = NotesScreen::new(service).unwrap();
    screen
        .process_command(NotesCommand::DeleteNote(doomed.id))
        .unwrap();

    let state = screen.state();
    assert_eq!(state.other_notes.len(), 1);
    assert_eq!(state.other_notes[0].title, "kept");
}
