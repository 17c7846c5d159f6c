//! Note use-case service.
//!
//! # Invariants
//! - Titles are trimmed, 1..=200 chars; content is at most 100 000 chars.
//! - Tags are trimmed; order and repeats are preserved.

use crate::error::AppResult;
use crate::model::note::{Note, NotePatch};
use crate::model::update::Update;
use crate::repo::Reorderable;
use crate::service::log_outcome;
use crate::service::validation;
use chrono::Utc;

pub struct NoteService<R: Reorderable<Note>> {
    repo: R,
}

impl<R: Reorderable<Note>> NoteService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a note at `sort_order` inside `space_id`.
    pub fn create_note(
        &self,
        space_id: &str,
        title: &str,
        content: Option<&str>,
        sort_order: i64,
    ) -> AppResult<Note> {
        let title = validation::required_text("title", title, validation::NOTE_TITLE_MAX)?;
        let content = validation::optional_text("content", content, validation::CONTENT_MAX)?;

        let mut patch = NotePatch::default().sort_order(sort_order);
        if let Some(content) = content {
            patch = patch.content(content);
        }
        let note = Note::new(title, space_id, self.repo.user_id()).copy_with(patch);

        let result = self.repo.create(&note);
        log_outcome("note_create", &note.id, &result);
        result
    }

    pub fn update_note(&self, current: &Note, patch: NotePatch) -> AppResult<Note> {
        let patch = validate_patch(patch)?.updated_at(Utc::now());
        let result = self.repo.update(&current.copy_with(patch));
        log_outcome("note_update", &current.id, &result);
        result
    }

    /// Re-parents a note into another of the user's spaces.
    pub fn move_note(&self, current: &Note, target_space_id: &str) -> AppResult<Note> {
        let patch = NotePatch::default()
            .space_id(target_space_id)
            .updated_at(Utc::now());
        let result = self.repo.update(&current.copy_with(patch));
        log_outcome("note_move", &current.id, &result);
        result
    }

    pub fn delete_note(&self, id: &str) -> AppResult<()> {
        let result = self.repo.delete(id);
        log_outcome("note_delete", id, &result);
        result
    }

    pub fn get_note(&self, id: &str) -> AppResult<Option<Note>> {
        self.repo.get(id)
    }

    pub fn list_notes(&self, space_id: &str) -> AppResult<Vec<Note>> {
        self.repo.list_for_parent(space_id)
    }

    pub fn reorder_notes(&self, space_id: &str, ordered_ids: &[String]) -> AppResult<Vec<Note>> {
        validation::reorder_ids(ordered_ids)?;
        let result = self.repo.reorder(space_id, ordered_ids);
        log_outcome("note_reorder", space_id, &result);
        result
    }
}

fn validate_patch(mut patch: NotePatch) -> AppResult<NotePatch> {
    patch.title = patch
        .title
        .map(|title| validation::required_text("title", &title, validation::NOTE_TITLE_MAX))
        .transpose()?;
    if let Update::Set(content) = &patch.content {
        patch.content =
            match validation::optional_text("content", Some(content), validation::CONTENT_MAX)? {
                Some(content) => Update::Set(content),
                None => Update::Clear,
            };
    }
    patch.tags = patch
        .tags
        .map(|tags| validation::tags(&tags))
        .transpose()?;
    Ok(patch)
}
