//! Domain model for notes and their ordered content.
//!
//! # Responsibility
//! - Define the canonical note shape used by core business logic.
//! - Keep content as a closed tagged union instead of open inheritance.
//!
//! # Invariants
//! - Content ordering inside a note is significant and preserved.
//! - `NoteId` 0 marks a draft that has not been persisted yet.

pub mod note;
