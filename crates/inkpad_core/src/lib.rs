//! Core domain logic for the inkpad note store.
//! This crate is the single source of truth for note persistence and image
//! lifecycle invariants.

pub mod db;
pub mod images;
pub mod logging;
pub mod model;
pub mod repo;
pub mod screens;
pub mod service;
pub mod watch;

pub use images::{ImageStore, ImageStoreError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{ContentItem, Note, NoteId};
pub use repo::note_repo::{NoteRepository, RepoError, RepoResult, SqliteNoteRepository};
pub use screens::create::{CreateNoteCommand, CreateNoteScreen, CreateNoteState};
pub use screens::edit::{EditNoteCommand, EditNoteScreen, EditNoteState};
pub use screens::notes::{NotesCommand, NotesScreen, NotesScreenState};
pub use service::note_service::{epoch_ms_now, NoteService, NoteServiceError};
pub use watch::{NoteFeed, StoreEvent};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
