//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist note rows and their ordered content rows.
//! - Own the full-replacement write path (`replace_note`) with atomic
//!   semantics.
//!
//! # Invariants
//! - Content rows are keyed by `(note_id, position)` and written in body
//!   order starting at 0.
//! - `replace_note` deletes and re-inserts the whole content sequence inside
//!   one transaction.
//! - Listing order is `updated_at DESC, id ASC`.
//! - Search is a case-insensitive substring match over title and text
//!   payloads; image payloads never match.

use crate::db::DbError;
use crate::model::note::{ContentItem, Note, NoteId};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    title,
    updated_at,
    is_pinned
FROM notes";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for note persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(NoteId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for note CRUD operations.
pub trait NoteRepository {
    /// Inserts a draft note with its content rows and returns the new id.
    fn insert_note(&mut self, note: &Note) -> RepoResult<NoteId>;
    /// Replaces the note row and its full content sequence atomically.
    fn replace_note(&mut self, note: &Note) -> RepoResult<()>;
    /// Gets one note by id, including its ordered content.
    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// Lists notes newest-updated first, optionally filtered by substring.
    fn list_notes(&self, query: Option<&str>) -> RepoResult<Vec<Note>>;
    /// Flips the pinned flag in place. Does not touch `updated_at`.
    fn toggle_pinned(&self, id: NoteId) -> RepoResult<()>;
    /// Deletes the note row; content rows cascade at the storage layer.
    fn delete_note(&self, id: NoteId) -> RepoResult<()>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn insert_note(&mut self, note: &Note) -> RepoResult<NoteId> {
        if note.is_persisted() {
            return Err(RepoError::InvalidData(format!(
                "insert_note requires a draft (id 0), got id {}",
                note.id
            )));
        }

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO notes (title, updated_at, is_pinned)
             VALUES (?1, ?2, ?3);",
            params![
                note.title.as_str(),
                note.updated_at,
                bool_to_int(note.is_pinned)
            ],
        )?;
        let id = tx.last_insert_rowid();
        insert_content_rows(&tx, id, &note.content)?;
        tx.commit()?;

        Ok(id)
    }

    fn replace_note(&mut self, note: &Note) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE notes
             SET
                title = ?2,
                updated_at = ?3,
                is_pinned = ?4
             WHERE id = ?1;",
            params![
                note.id,
                note.title.as_str(),
                note.updated_at,
                bool_to_int(note.is_pinned)
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(note.id));
        }

        tx.execute("DELETE FROM content WHERE note_id = ?1;", [note.id])?;
        insert_content_rows(&tx, note.id, &note.content)?;
        tx.commit()?;

        Ok(())
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            let content = load_content_for_note(self.conn, id)?;
            return Ok(Some(Note {
                id: row.get("id")?,
                title: row.get("title")?,
                content,
                updated_at: row.get("updated_at")?,
                is_pinned: parse_pinned(row.get("is_pinned")?)?,
            }));
        }

        Ok(None)
    }

    fn list_notes(&self, query: Option<&str>) -> RepoResult<Vec<Note>> {
        let mut sql = format!("{NOTE_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(query) = query.filter(|value| !value.trim().is_empty()) {
            // SQLite LIKE is case-insensitive for ASCII, which is the
            // documented search contract.
            sql.push_str(
                " AND (title LIKE '%' || ? || '%'
                   OR EXISTS (
                       SELECT 1
                       FROM content c
                       WHERE c.note_id = notes.id
                         AND c.kind = 'text'
                         AND c.payload LIKE '%' || ? || '%'
                   ))",
            );
            let trimmed = query.trim().to_string();
            bind_values.push(Value::Text(trimmed.clone()));
            bind_values.push(Value::Text(trimmed));
        }

        sql.push_str(" ORDER BY updated_at DESC, id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            let id: NoteId = row.get("id")?;
            let content = load_content_for_note(self.conn, id)?;
            notes.push(Note {
                id,
                title: row.get("title")?,
                content,
                updated_at: row.get("updated_at")?,
                is_pinned: parse_pinned(row.get("is_pinned")?)?,
            });
        }

        Ok(notes)
    }

    fn toggle_pinned(&self, id: NoteId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE notes SET is_pinned = NOT is_pinned WHERE id = ?1;",
            [id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn delete_note(&self, id: NoteId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM notes WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn insert_content_rows(tx: &Transaction<'_>, id: NoteId, content: &[ContentItem]) -> RepoResult<()> {
    let mut stmt = tx.prepare(
        "INSERT INTO content (note_id, position, kind, payload)
         VALUES (?1, ?2, ?3, ?4);",
    )?;
    for (position, item) in content.iter().enumerate() {
        let (kind, payload) = content_item_to_db(item);
        stmt.execute(params![id, position as i64, kind, payload])?;
    }
    Ok(())
}

fn load_content_for_note(conn: &Connection, id: NoteId) -> RepoResult<Vec<ContentItem>> {
    let mut stmt = conn.prepare(
        "SELECT kind, payload
         FROM content
         WHERE note_id = ?1
         ORDER BY position ASC;",
    )?;
    let mut rows = stmt.query([id])?;
    let mut content = Vec::new();
    while let Some(row) = rows.next()? {
        let kind: String = row.get("kind")?;
        let payload: String = row.get("payload")?;
        content.push(parse_content_item(&kind, payload)?);
    }
    Ok(content)
}

fn content_item_to_db(item: &ContentItem) -> (&'static str, &str) {
    match item {
        ContentItem::Text { text } => ("text", text.as_str()),
        ContentItem::Image { path } => ("image", path.as_str()),
    }
}

fn parse_content_item(kind: &str, payload: String) -> RepoResult<ContentItem> {
    match kind {
        "text" => Ok(ContentItem::Text { text: payload }),
        "image" => Ok(ContentItem::Image { path: payload }),
        other => Err(RepoError::InvalidData(format!(
            "invalid content kind `{other}` in content.kind"
        ))),
    }
}

fn parse_pinned(value: i64) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid is_pinned value `{other}` in notes.is_pinned"
        ))),
    }
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
