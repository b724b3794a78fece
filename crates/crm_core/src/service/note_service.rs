//! Note use-case service.
//!
//! Note creation is the only coupling point between the note feature and the
//! existence validator: the referenced customer must exist.

use crate::error::{CoreError, CoreResult};
use crate::model::note::{NewNote, Note};
use crate::model::{CustomerId, EntityKind, NoteId};
use crate::repo::note_repo::{NoteRepository, SqliteNoteRepository};
use crate::service::entity_validator::EntityValidator;
use crate::service::{ensure_positive_ids, in_transaction};
use log::info;
use rusqlite::Connection;

/// Note service over one connection.
pub struct NoteService<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> NoteService<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }

    /// Attaches a new note to an existing customer.
    pub fn create_note_for_customer(
        &mut self,
        customer_id: CustomerId,
        note: &NewNote,
    ) -> CoreResult<Note> {
        ensure_positive_ids("customer ID must be a positive number", &[customer_id])?;
        note.validate()?;
        let created = in_transaction(self.conn, "create_note_for_customer", |tx| {
            EntityValidator::new(tx).ensure_customer_exists(customer_id)?;
            Ok(SqliteNoteRepository::new(tx).create_note(customer_id, note)?)
        })?;
        info!(
            "event=note_create module=note status=ok note_id={} customer_id={}",
            created.id, customer_id
        );
        Ok(created)
    }

    pub fn get_note(&self, id: NoteId) -> CoreResult<Note> {
        SqliteNoteRepository::new(self.conn)
            .get_note(id)?
            .ok_or(CoreError::not_found(EntityKind::Note, id))
    }

    pub fn update_note(&mut self, note: &Note) -> CoreResult<Note> {
        ensure_positive_ids(
            "note and customer IDs must be positive numbers",
            &[note.id, note.customer_id],
        )?;
        note.validate()?;
        in_transaction(self.conn, "update_note", |tx| {
            let validator = EntityValidator::new(tx);
            validator.ensure_note_exists(note.id)?;
            validator.ensure_customer_exists(note.customer_id)?;
            SqliteNoteRepository::new(tx).update_note(note)?;
            Ok(note.clone())
        })
    }

    pub fn delete_note(&mut self, id: NoteId) -> CoreResult<()> {
        ensure_positive_ids("note ID must be a positive number", &[id])?;
        in_transaction(self.conn, "delete_note", |tx| {
            EntityValidator::new(tx).ensure_note_exists(id)?;
            Ok(SqliteNoteRepository::new(tx).delete_note(id)?)
        })
    }

    /// Lists notes of an existing customer, oldest first.
    pub fn list_notes_for_customer(&self, customer_id: CustomerId) -> CoreResult<Vec<Note>> {
        EntityValidator::new(self.conn).ensure_customer_exists(customer_id)?;
        Ok(SqliteNoteRepository::new(self.conn).list_notes_for_customer(customer_id)?)
    }
}
