//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `inkpad_core` linkage and
//!   database bootstrap.
//! - Keep output deterministic for quick local sanity checks.

use inkpad_core::db::{open_db, open_db_in_memory};
use inkpad_core::{NoteRepository, SqliteNoteRepository};

fn main() {
    println!("inkpad_core version={}", inkpad_core::core_version());

    let opened = match std::env::args().nth(1) {
        Some(path) => open_db(path),
        None => open_db_in_memory(),
    };

    let mut conn = match opened {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("failed to open database: {err}");
            std::process::exit(1);
        }
    };

    let repo = SqliteNoteRepository::new(&mut conn);
    match repo.list_notes(None) {
        Ok(notes) => println!("notes={}", notes.len()),
        Err(err) => {
            eprintln!("failed to list notes: {err}");
            std::process::exit(1);
        }
    }
}
