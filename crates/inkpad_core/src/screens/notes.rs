//! Note list screen state machine.
//!
//! # Responsibility
//! - Hold the search query and the pinned/unpinned projections of the
//!   matching note list.
//! - Forward pin-toggle and delete commands to the service.
//!
//! # Invariants
//! - A blank query shows all notes; otherwise the substring-matching subset.
//! - Both partitions preserve the store's newest-updated-first order.

use crate::model::note::{Note, NoteId};
use crate::service::note_service::{NoteService, NoteServiceError};

/// UI command for the list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotesCommand {
    InputSearchQuery(String),
    SwitchPinnedStatus(NoteId),
    DeleteNote(NoteId),
}

/// List screen state: query plus pinned/unpinned partitions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotesScreenState {
    pub query: String,
    pub pinned_notes: Vec<Note>,
    pub other_notes: Vec<Note>,
}

/// List screen bound to a note service.
pub struct NotesScreen {
    service: NoteService,
    state: NotesScreenState,
}

impl NotesScreen {
    /// Creates the screen and loads the initial (unfiltered) projection.
    pub fn new(service: NoteService) -> Result<Self, NoteServiceError> {
        let mut screen = Self {
            service,
            state: NotesScreenState::default(),
        };
        screen.refresh()?;
        Ok(screen)
    }

    pub fn state(&self) -> &NotesScreenState {
        &self.state
    }

    /// Applies one command, then re-projects the list from committed state.
    pub fn process_command(&mut self, command: NotesCommand) -> Result<(), NoteServiceError> {
        match command {
            NotesCommand::InputSearchQuery(query) => {
                self.state.query = query.trim().to_string();
            }
            NotesCommand::SwitchPinnedStatus(id) => {
                self.service.switch_pin_status(id)?;
            }
            NotesCommand::DeleteNote(id) => {
                self.service.delete_note(id)?;
            }
        }
        self.refresh()
    }

    /// Re-queries the store and re-derives the pinned/unpinned partitions.
    pub fn refresh(&mut self) -> Result<(), NoteServiceError> {
        let notes = if self.state.query.is_empty() {
            self.service.all_notes()?
        } else {
            self.service.search_notes(&self.state.query)?
        };
        let (pinned, other) = partition_pinned(notes);
        self.state.pinned_notes = pinned;
        self.state.other_notes = other;
        Ok(())
    }
}

/// Splits a note list into (pinned, unpinned), both order-preserving.
fn partition_pinned(notes: Vec<Note>) -> (Vec<Note>, Vec<Note>) {
    notes.into_iter().partition(|note| note.is_pinned)
}
