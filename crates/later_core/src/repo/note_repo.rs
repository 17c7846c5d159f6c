//! Note repository: SQLite implementation of the content contract.
//!
//! # Invariants
//! - A note can only be created in, or moved to, a space the user owns.
//! - Tags are stored as an ordered JSON array; order and duplicates are
//!   preserved.

use crate::error::DataError;
use crate::model::note::Note;
use crate::model::space::Space;
use crate::model::Entity;
use crate::repo::space_repo::SPACE_OWNER_SQL;
use crate::repo::{
    db_timestamp, ensure_owner, merge_order, parse_db_timestamp, tags_from_db, tags_to_db,
    RepoResult, Reorderable, Repository,
};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    space_id,
    title,
    content,
    tags,
    created_at,
    updated_at,
    sort_order
FROM notes";

const NOTE_OWNER_SQL: &str = "SELECT user_id FROM notes WHERE id = ?1;";

/// SQLite-backed note repository scoped to one user.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
    user_id: String,
}

impl<'conn> SqliteNoteRepository<'conn> {
    pub fn new(conn: &'conn Connection, user_id: impl Into<String>) -> Self {
        Self {
            conn,
            user_id: user_id.into(),
        }
    }

    fn read_back(&self, id: &str) -> RepoResult<Note> {
        self.get(id)?.ok_or_else(|| {
            DataError::NotFound {
                entity: Note::KIND,
                id: id.to_string(),
            }
            .into()
        })
    }
}

impl Repository<Note> for SqliteNoteRepository<'_> {
    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn create(&self, note: &Note) -> RepoResult<Note> {
        ensure_owner(
            self.conn,
            SPACE_OWNER_SQL,
            Space::KIND,
            &note.space_id,
            &self.user_id,
        )?;

        self.conn.execute(
            "INSERT INTO notes (
                id,
                user_id,
                space_id,
                title,
                content,
                tags,
                created_at,
                updated_at,
                sort_order
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                note.id,
                self.user_id,
                note.space_id,
                note.title,
                note.content,
                tags_to_db(&note.tags),
                db_timestamp(&note.created_at),
                db_timestamp(&note.updated_at),
                note.sort_order,
            ],
        )?;

        self.read_back(&note.id)
    }

    fn update(&self, note: &Note) -> RepoResult<Note> {
        ensure_owner(
            self.conn,
            NOTE_OWNER_SQL,
            Note::KIND,
            &note.id,
            &self.user_id,
        )?;
        ensure_owner(
            self.conn,
            SPACE_OWNER_SQL,
            Space::KIND,
            &note.space_id,
            &self.user_id,
        )?;

        self.conn.execute(
            "UPDATE notes
             SET
                space_id = ?3,
                title = ?4,
                content = ?5,
                tags = ?6,
                updated_at = ?7,
                sort_order = ?8
             WHERE id = ?1
               AND user_id = ?2;",
            params![
                note.id,
                self.user_id,
                note.space_id,
                note.title,
                note.content,
                tags_to_db(&note.tags),
                db_timestamp(&note.updated_at),
                note.sort_order,
            ],
        )?;

        self.read_back(&note.id)
    }

    fn delete(&self, id: &str) -> RepoResult<()> {
        ensure_owner(self.conn, NOTE_OWNER_SQL, Note::KIND, id, &self.user_id)?;
        self.conn.execute(
            "DELETE FROM notes WHERE id = ?1 AND user_id = ?2;",
            params![id, self.user_id],
        )?;
        Ok(())
    }

    fn get(&self, id: &str) -> RepoResult<Option<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL}
             WHERE id = ?1
               AND user_id = ?2;"
        ))?;
        let row = stmt
            .query_row(params![id, self.user_id], |row| Ok(parse_note_row(row)))
            .optional()?;
        row.transpose()
    }

    fn list_for_parent(&self, space_id: &str) -> RepoResult<Vec<Note>> {
        ensure_owner(
            self.conn,
            SPACE_OWNER_SQL,
            Space::KIND,
            space_id,
            &self.user_id,
        )?;
        list_notes(self.conn, space_id, &self.user_id)
    }
}

impl Reorderable<Note> for SqliteNoteRepository<'_> {
    fn reorder(&self, space_id: &str, ordered_ids: &[String]) -> RepoResult<Vec<Note>> {
        ensure_owner(
            self.conn,
            SPACE_OWNER_SQL,
            Space::KIND,
            space_id,
            &self.user_id,
        )?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let current = list_notes(&tx, space_id, &self.user_id)?
            .into_iter()
            .map(|note| note.id)
            .collect::<Vec<_>>();
        let ordered = merge_order(Note::KIND, &current, ordered_ids)?;
        for (index, id) in ordered.iter().enumerate() {
            tx.execute(
                "UPDATE notes
                 SET sort_order = ?2
                 WHERE id = ?1
                   AND user_id = ?3;",
                params![id, index as i64, self.user_id],
            )?;
        }
        tx.commit()?;

        list_notes(self.conn, space_id, &self.user_id)
    }
}

fn list_notes(conn: &Connection, space_id: &str, user_id: &str) -> RepoResult<Vec<Note>> {
    let mut stmt = conn.prepare(&format!(
        "{NOTE_SELECT_SQL}
         WHERE space_id = ?1
           AND user_id = ?2
         ORDER BY sort_order ASC, created_at ASC, id ASC;"
    ))?;
    let mut rows = stmt.query(params![space_id, user_id])?;
    let mut notes = Vec::new();
    while let Some(row) = rows.next()? {
        notes.push(parse_note_row(row)?);
    }
    Ok(notes)
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let tags: String = row.get("tags")?;
    let created_at: String = row.get("created_at")?;
    let updated_at: String = row.get("updated_at")?;
    Ok(Note {
        id: row.get("id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        space_id: row.get("space_id")?,
        user_id: row.get("user_id")?,
        tags: tags_from_db(&tags, "notes.tags")?,
        created_at: parse_db_timestamp(&created_at, "notes.created_at")?,
        updated_at: parse_db_timestamp(&updated_at, "notes.updated_at")?,
        sort_order: row.get("sort_order")?,
    })
}
