//! Note editing screen state machine.
//!
//! # Responsibility
//! - Load the target note, mutate the in-memory copy from UI commands, and
//!   persist or delete it on the terminal commands.
//!
//! # Invariants
//! - `Initial` lasts until the note load completes; the target note id is
//!   fixed at construction.
//! - `Save` stamps a fresh `updated_at` and replaces the note in full.
//! - `Save`, `Delete`, and `Back` are terminal.

use crate::model::note::{Note, NoteId};
use crate::screens::{edit_text_at, push_image};
use crate::service::note_service::{epoch_ms_now, NoteService, NoteServiceError};

/// UI command for the editing screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditNoteCommand {
    InputTitle(String),
    InputContent { index: usize, text: String },
    AddImage(String),
    Save,
    Delete,
    Back,
}

/// Editing screen state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditNoteState {
    /// Before the note load completes.
    Initial,
    Editing(Note),
    /// Terminal; the caller navigates away.
    Finished,
}

/// Editing screen bound to a note service and one note id.
#[derive(Debug)]
pub struct EditNoteScreen {
    service: NoteService,
    state: EditNoteState,
}

impl EditNoteScreen {
    /// Loads the target note and enters `Editing`.
    ///
    /// # Errors
    /// [`NoteServiceError::NotFound`] when the id does not exist; the screen
    /// is not constructed in that case.
    pub fn new(service: NoteService, note_id: NoteId) -> Result<Self, NoteServiceError> {
        let note = service.get_note(note_id)?;
        Ok(Self {
            service,
            state: EditNoteState::Editing(note),
        })
    }

    pub fn state(&self) -> &EditNoteState {
        &self.state
    }

    /// Applies one command.
    ///
    /// Non-terminal commands are pure state transitions; `Save` and `Delete`
    /// perform the service call before transitioning to `Finished`.
    pub fn process_command(&mut self, command: EditNoteCommand) -> Result<(), NoteServiceError> {
        match command {
            EditNoteCommand::Save => {
                if let EditNoteState::Editing(note) = &self.state {
                    let stamped = Note {
                        updated_at: epoch_ms_now(),
                        ..note.clone()
                    };
                    self.service.edit_note(&stamped)?;
                    self.state = EditNoteState::Finished;
                }
                Ok(())
            }
            EditNoteCommand::Delete => {
                if let EditNoteState::Editing(note) = &self.state {
                    self.service.delete_note(note.id)?;
                    self.state = EditNoteState::Finished;
                }
                Ok(())
            }
            other => {
                let current = std::mem::replace(&mut self.state, EditNoteState::Finished);
                self.state = apply(current, other);
                Ok(())
            }
        }
    }
}

/// Pure transition for every non-terminal command.
fn apply(state: EditNoteState, command: EditNoteCommand) -> EditNoteState {
    match (state, command) {
        (EditNoteState::Editing(note), EditNoteCommand::InputTitle(title)) => {
            EditNoteState::Editing(Note { title, ..note })
        }
        (EditNoteState::Editing(note), EditNoteCommand::InputContent { index, text }) => {
            let content = edit_text_at(&note.content, index, &text);
            EditNoteState::Editing(Note { content, ..note })
        }
        (EditNoteState::Editing(note), EditNoteCommand::AddImage(path)) => {
            let content = push_image(&note.content, &path);
            EditNoteState::Editing(Note { content, ..note })
        }
        (_, EditNoteCommand::Back) => EditNoteState::Finished,
        (state, _) => state,
    }
}
