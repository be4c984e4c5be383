//! Note creation screen state machine.
//!
//! # Responsibility
//! - Accumulate a draft (title + ordered content) from UI commands.
//! - Persist the draft through the service on `Save`.
//!
//! # Invariants
//! - The screen starts with one empty text item so input can begin at once.
//! - `Save` filters blank text items before persisting.
//! - `Save` and `Back` are terminal: the state becomes `Finished`.

use crate::model::note::ContentItem;
use crate::screens::{edit_text_at, push_image};
use crate::service::note_service::{epoch_ms_now, NoteService, NoteServiceError};

/// UI command for the creation screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateNoteCommand {
    InputTitle(String),
    InputContent { index: usize, text: String },
    AddImage(String),
    Save,
    Back,
}

/// Creation screen state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateNoteState {
    Creating {
        title: String,
        content: Vec<ContentItem>,
    },
    /// Terminal; the caller navigates away.
    Finished,
}

impl CreateNoteState {
    /// Fresh draft: empty title, one empty text item.
    pub fn new() -> Self {
        Self::Creating {
            title: String::new(),
            content: vec![ContentItem::text("")],
        }
    }

    /// Advisory save gate: non-blank title plus at least one image or
    /// non-blank text item.
    pub fn is_save_enabled(&self) -> bool {
        match self {
            Self::Creating { title, content } => {
                !title.trim().is_empty()
                    && !content.is_empty()
                    && content.iter().any(|item| !item.is_blank_text())
            }
            Self::Finished => false,
        }
    }
}

impl Default for CreateNoteState {
    fn default() -> Self {
        Self::new()
    }
}

/// Creation screen bound to a note service.
pub struct CreateNoteScreen {
    service: NoteService,
    state: CreateNoteState,
}

impl CreateNoteScreen {
    pub fn new(service: NoteService) -> Self {
        Self {
            service,
            state: CreateNoteState::new(),
        }
    }

    pub fn state(&self) -> &CreateNoteState {
        &self.state
    }

    /// Applies one command.
    ///
    /// Non-terminal commands are pure state transitions; `Save` persists the
    /// draft before transitioning to `Finished`.
    pub fn process_command(&mut self, command: CreateNoteCommand) -> Result<(), NoteServiceError> {
        match command {
            CreateNoteCommand::Save => {
                if let CreateNoteState::Creating { title, content } = &self.state {
                    let kept: Vec<ContentItem> = content
                        .iter()
                        .filter(|item| !item.is_blank_text())
                        .cloned()
                        .collect();
                    self.service
                        .add_note(title.clone(), kept, epoch_ms_now(), false)?;
                    self.state = CreateNoteState::Finished;
                }
                Ok(())
            }
            other => {
                let current = std::mem::replace(&mut self.state, CreateNoteState::Finished);
                self.state = apply(current, other);
                Ok(())
            }
        }
    }
}

/// Pure transition for every non-`Save` command.
fn apply(state: CreateNoteState, command: CreateNoteCommand) -> CreateNoteState {
    match (state, command) {
        (CreateNoteState::Creating { content, .. }, CreateNoteCommand::InputTitle(title)) => {
            CreateNoteState::Creating { title, content }
        }
        (
            CreateNoteState::Creating { title, content },
            CreateNoteCommand::InputContent { index, text },
        ) => CreateNoteState::Creating {
            title,
            content: edit_text_at(&content, index, &text),
        },
        (CreateNoteState::Creating { title, content }, CreateNoteCommand::AddImage(path)) => {
            CreateNoteState::Creating {
                title,
                content: push_image(&content, &path),
            }
        }
        (_, CreateNoteCommand::Back) => CreateNoteState::Finished,
        (state, _) => state,
    }
}
