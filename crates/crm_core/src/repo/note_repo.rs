//! Note repository contract and SQLite implementation.
//!
//! # Invariants
//! - Notes are listed per customer ordered by `date ASC, id ASC`.
//! - Note rows reference their customer with a non-cascading foreign key;
//!   `delete_notes_for_customer` is the explicit cascade step.

use crate::model::note::{InteractionType, NewNote, Note};
use crate::model::{CustomerId, EntityKind, NoteId};
use crate::repo::{date_to_db, parse_date, row_exists, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    content,
    date,
    interaction_type,
    customer_id
FROM notes";

/// Repository interface for customer notes.
pub trait NoteRepository {
    fn create_note(&self, customer_id: CustomerId, note: &NewNote) -> RepoResult<Note>;
    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>>;
    fn note_exists(&self, id: NoteId) -> RepoResult<bool>;
    fn update_note(&self, note: &Note) -> RepoResult<()>;
    fn delete_note(&self, id: NoteId) -> RepoResult<()>;
    /// Deletes every note of one customer and returns how many were removed.
    fn delete_notes_for_customer(&self, customer_id: CustomerId) -> RepoResult<usize>;
    fn list_notes_for_customer(&self, customer_id: CustomerId) -> RepoResult<Vec<Note>>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn create_note(&self, customer_id: CustomerId, note: &NewNote) -> RepoResult<Note> {
        note.validate()?;

        self.conn.execute(
            "INSERT INTO notes (content, date, interaction_type, customer_id)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                note.content.as_str(),
                date_to_db(note.date),
                note.interaction_type.as_db_str(),
                customer_id,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        self.get_note(id)?
            .ok_or(RepoError::NotFound(EntityKind::Note, id))
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_note_row(row)?));
        }
        Ok(None)
    }

    fn note_exists(&self, id: NoteId) -> RepoResult<bool> {
        row_exists(self.conn, "notes", id)
    }

    fn update_note(&self, note: &Note) -> RepoResult<()> {
        note.validate()?;

        let changed = self.conn.execute(
            "UPDATE notes
             SET content = ?1, date = ?2, interaction_type = ?3, customer_id = ?4
             WHERE id = ?5;",
            params![
                note.content.as_str(),
                date_to_db(note.date),
                note.interaction_type.as_db_str(),
                note.customer_id,
                note.id,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(EntityKind::Note, note.id));
        }
        Ok(())
    }

    fn delete_note(&self, id: NoteId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM notes WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(EntityKind::Note, id));
        }
        Ok(())
    }

    fn delete_notes_for_customer(&self, customer_id: CustomerId) -> RepoResult<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM notes WHERE customer_id = ?1;", [customer_id])?;
        Ok(removed)
    }

    fn list_notes_for_customer(&self, customer_id: CustomerId) -> RepoResult<Vec<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL} WHERE customer_id = ?1 ORDER BY date ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([customer_id])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }
        Ok(notes)
    }
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let date_text: String = row.get("date")?;
    let date = parse_date(&date_text, "notes.date")?;

    let type_text: String = row.get("interaction_type")?;
    let interaction_type = InteractionType::parse(&type_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid interaction type `{type_text}` in notes.interaction_type"
        ))
    })?;

    Ok(Note {
        id: row.get("id")?,
        content: row.get("content")?,
        date,
        interaction_type,
        customer_id: row.get("customer_id")?,
    })
}
