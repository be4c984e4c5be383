//! Use-case orchestration over persistence and the image store.
//!
//! # Responsibility
//! - Combine repository writes, image lifecycle, and change notification
//!   into whole note operations.
//!
//! # Invariants
//! - Service APIs never bypass repository persistence contracts.
//! - Every committed mutation emits one change event.

pub mod note_service;
