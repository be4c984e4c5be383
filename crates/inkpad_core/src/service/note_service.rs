//! Note use-case service.
//!
//! # Responsibility
//! - Provide whole-note add/edit/get/list/delete/pin APIs.
//! - Import external image references before persisting them.
//! - Garbage-collect image files orphaned by an edit or delete.
//! - Notify feed subscribers after every committed mutation.
//!
//! # Invariants
//! - Edits use full content replacement semantics.
//! - Persisted image references always point inside the store root.
//! - A missing note id surfaces as a typed `NotFound`, never a crash.

use crate::images::{ImageStore, ImageStoreError};
use crate::model::note::{ContentItem, Note, NoteId};
use crate::repo::note_repo::{NoteRepository, RepoError, SqliteNoteRepository};
use crate::watch::{NoteFeed, StoreEvent, FEED_BUFFER_SIZE};
use log::info;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::broadcast;

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Target note does not exist.
    NotFound(NoteId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Image file copy/delete failure.
    Image(ImageStoreError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
    /// The feed's owning service was dropped.
    FeedClosed,
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Image(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent note state: {details}"),
            Self::FeedClosed => write!(f, "note feed closed: service dropped"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Image(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<ImageStoreError> for NoteServiceError {
    fn from(value: ImageStoreError) -> Self {
        Self::Image(value)
    }
}

/// Orchestrating facade over the note repository and image store.
///
/// Cheap to clone; clones share the connection, the store, and the change
/// feed channel.
#[derive(Debug, Clone)]
pub struct NoteService {
    conn: Arc<Mutex<Connection>>,
    images: ImageStore,
    events: broadcast::Sender<StoreEvent>,
}

impl NoteService {
    /// Creates a service over a migrated connection and an image store.
    pub fn new(conn: Connection, images: ImageStore) -> Self {
        let (events, _) = broadcast::channel(FEED_BUFFER_SIZE);
        Self {
            conn: Arc::new(Mutex::new(conn)),
            images,
            events,
        }
    }

    /// Returns the image store backing this service.
    pub fn images(&self) -> &ImageStore {
        &self.images
    }

    /// Persists a new note, importing external image references first.
    ///
    /// Returns the stored note read back with its assigned id and rewritten
    /// image paths.
    pub fn add_note(
        &self,
        title: impl Into<String>,
        content: Vec<ContentItem>,
        updated_at: i64,
        is_pinned: bool,
    ) -> Result<Note, NoteServiceError> {
        let content = self.import_external_images(content)?;
        let draft = Note::draft(title, content, updated_at, is_pinned);

        let id = self.with_conn(|conn| SqliteNoteRepository::new(conn).insert_note(&draft))?;
        let note = self.read_back(id, "created note not found in read-back")?;
        info!(
            "event=note_add module=service status=ok id={id} items={}",
            note.content.len()
        );
        self.notify();
        Ok(note)
    }

    /// Replaces a note in full and garbage-collects orphaned images.
    ///
    /// The previous version is loaded first; every image path it referenced
    /// that the new version dropped is removed from the store. Newly added
    /// external references are imported before the replacement is written.
    pub fn edit_note(&self, note: &Note) -> Result<Note, NoteServiceError> {
        let previous = self.get_note(note.id)?;

        let kept = note.image_paths();
        for orphan in previous.image_paths().difference(&kept) {
            self.images.remove(orphan)?;
        }

        let content = self.import_external_images(note.content.clone())?;
        let replacement = Note {
            content,
            ..note.clone()
        };
        self.with_conn(|conn| SqliteNoteRepository::new(conn).replace_note(&replacement))?;

        let stored = self.read_back(note.id, "edited note not found in read-back")?;
        info!(
            "event=note_edit module=service status=ok id={} items={}",
            note.id,
            stored.content.len()
        );
        self.notify();
        Ok(stored)
    }

    /// Deletes a note, its content rows (cascade), and every image it
    /// referenced inside the store.
    pub fn delete_note(&self, id: NoteId) -> Result<(), NoteServiceError> {
        let note = self.get_note(id)?;

        self.with_conn(|conn| SqliteNoteRepository::new(conn).delete_note(id))?;
        for path in note.image_paths() {
            self.images.remove(&path)?;
        }

        info!("event=note_delete module=service status=ok id={id}");
        self.notify();
        Ok(())
    }

    /// Gets one note by id.
    ///
    /// # Errors
    /// [`NoteServiceError::NotFound`] when no such note exists.
    pub fn get_note(&self, id: NoteId) -> Result<Note, NoteServiceError> {
        self.with_conn(|conn| SqliteNoteRepository::new(conn).get_note(id))?
            .ok_or(NoteServiceError::NotFound(id))
    }

    /// Snapshot of all notes, newest-updated first.
    pub fn all_notes(&self) -> Result<Vec<Note>, NoteServiceError> {
        let notes = self.with_conn(|conn| SqliteNoteRepository::new(conn).list_notes(None))?;
        Ok(notes)
    }

    /// Snapshot of notes whose title or text content contains `query`,
    /// case-insensitive, newest-updated first.
    pub fn search_notes(&self, query: &str) -> Result<Vec<Note>, NoteServiceError> {
        let notes =
            self.with_conn(|conn| SqliteNoteRepository::new(conn).list_notes(Some(query)))?;
        Ok(notes)
    }

    /// Toggles the pinned flag in place.
    pub fn switch_pin_status(&self, id: NoteId) -> Result<(), NoteServiceError> {
        self.with_conn(|conn| SqliteNoteRepository::new(conn).toggle_pinned(id))?;
        info!("event=note_pin_toggle module=service status=ok id={id}");
        self.notify();
        Ok(())
    }

    /// Subscribes to a continuously-updating note list.
    ///
    /// `query = None` follows all notes; otherwise the feed follows the
    /// matching subset. The feed yields a fresh snapshot after every store
    /// mutation.
    pub fn watch(&self, query: Option<String>) -> NoteFeed {
        NoteFeed::new(Arc::clone(&self.conn), query, self.events.subscribe())
    }

    fn import_external_images(
        &self,
        content: Vec<ContentItem>,
    ) -> Result<Vec<ContentItem>, NoteServiceError> {
        content
            .into_iter()
            .map(|item| match item {
                ContentItem::Image { path } if !self.images.is_internal(&path) => {
                    let internal = self.images.import(&path)?;
                    Ok(ContentItem::image(internal.to_string_lossy().into_owned()))
                }
                other => Ok(other),
            })
            .collect()
    }

    fn read_back(&self, id: NoteId, details: &'static str) -> Result<Note, NoteServiceError> {
        self.with_conn(|conn| SqliteNoteRepository::new(conn).get_note(id))?
            .ok_or(NoteServiceError::InconsistentState(details))
    }

    fn with_conn<T>(&self, operation: impl FnOnce(&mut Connection) -> T) -> T {
        let mut conn = self.conn.lock().expect("note store mutex poisoned");
        operation(&mut conn)
    }

    fn notify(&self) {
        // No active subscribers is fine; send only fails when the receiver
        // count is zero.
        let _ = self.events.send(StoreEvent::Changed);
    }
}

/// Current wall-clock time in epoch milliseconds.
///
/// Used by screen reducers as the `updated_at` stamp for saves.
pub fn epoch_ms_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}
