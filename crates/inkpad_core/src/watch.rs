//! Change feed over committed note state.
//!
//! # Responsibility
//! - Fan out store mutation events to every active reader.
//! - Re-project events into refreshed note-list snapshots per subscription.
//!
//! # Invariants
//! - Readers never block writers; events are dropped-to-latest on lag.
//! - A feed snapshot always reflects committed state at query time, so a
//!   lagged reader still observes the freshest data.
//! - The feed closes once every service handle is dropped.

use crate::model::note::Note;
use crate::repo::note_repo::{NoteRepository, SqliteNoteRepository};
use crate::service::note_service::NoteServiceError;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

pub(crate) const FEED_BUFFER_SIZE: usize = 16;

/// Store mutation notification carried by the broadcast channel.
///
/// Subscribers re-query on every event, so the event itself carries no
/// payload beyond "committed state changed".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    Changed,
}

/// Continuously-updating note list bound to one optional search query.
///
/// Produced by `NoteService::watch`. Yields the current snapshot on demand
/// and a re-queried snapshot after every store mutation.
pub struct NoteFeed {
    conn: Arc<Mutex<Connection>>,
    query: Option<String>,
    events: broadcast::Receiver<StoreEvent>,
}

impl NoteFeed {
    pub(crate) fn new(
        conn: Arc<Mutex<Connection>>,
        query: Option<String>,
        events: broadcast::Receiver<StoreEvent>,
    ) -> Self {
        Self {
            conn,
            query,
            events,
        }
    }

    /// Queries the current snapshot without waiting for a change.
    pub fn current(&self) -> Result<Vec<Note>, NoteServiceError> {
        self.snapshot()
    }

    /// Blocks until the store changes, then returns a refreshed snapshot.
    ///
    /// # Errors
    /// - [`NoteServiceError::FeedClosed`] once every service handle is gone.
    ///
    /// # Panics
    /// Must not be called from within an async runtime (delegates to
    /// `broadcast::Receiver::blocking_recv`).
    pub fn next(&mut self) -> Result<Vec<Note>, NoteServiceError> {
        match self.events.blocking_recv() {
            // A lagged reader skipped events; the snapshot below is
            // re-queried from committed state, so nothing is lost.
            Ok(StoreEvent::Changed) | Err(RecvError::Lagged(_)) => self.snapshot(),
            Err(RecvError::Closed) => Err(NoteServiceError::FeedClosed),
        }
    }

    /// Returns a refreshed snapshot when a change is pending, `None` when the
    /// store has not changed since the last poll.
    pub fn try_next(&mut self) -> Result<Option<Vec<Note>>, NoteServiceError> {
        // Drain the backlog; one snapshot covers any number of queued events.
        let mut changed = false;
        loop {
            match self.events.try_recv() {
                Ok(StoreEvent::Changed) | Err(TryRecvError::Lagged(_)) => changed = true,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Closed) => {
                    if changed {
                        break;
                    }
                    return Err(NoteServiceError::FeedClosed);
                }
            }
        }

        if changed {
            self.snapshot().map(Some)
        } else {
            Ok(None)
        }
    }

    fn snapshot(&self) -> Result<Vec<Note>, NoteServiceError> {
        let mut conn = self.conn.lock().expect("note store mutex poisoned");
        let notes = SqliteNoteRepository::new(&mut conn).list_notes(self.query.as_deref())?;
        Ok(notes)
    }
}
