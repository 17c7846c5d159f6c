//! Notes of one space.

use crate::error::AppResult;
use crate::model::note::{Note, NotePatch};
use crate::repo::Reorderable;
use crate::service::note_service::NoteService;
use crate::state::{AsyncValue, EntityCollection};

pub struct NotesController<R: Reorderable<Note>> {
    space_id: String,
    service: NoteService<R>,
    notes: EntityCollection<Note>,
}

impl<R: Reorderable<Note>> NotesController<R> {
    pub fn new(service: NoteService<R>, space_id: impl Into<String>) -> Self {
        Self {
            space_id: space_id.into(),
            service,
            notes: EntityCollection::new(),
        }
    }

    pub fn space_id(&self) -> &str {
        &self.space_id
    }

    pub fn state(&self) -> &AsyncValue<Vec<Note>> {
        self.notes.state()
    }

    pub fn load(&mut self) -> AppResult<&[Note]> {
        let result = self.service.list_notes(&self.space_id);
        self.notes.set(result)
    }

    /// Appends a new note after the held ones.
    pub fn create(&mut self, title: &str, content: Option<&str>) -> AppResult<Note> {
        let sort_order = self.notes.next_sort_order();
        let note = self
            .service
            .create_note(&self.space_id, title, content, sort_order)?;
        self.notes.upsert(note.clone());
        Ok(note)
    }

    pub fn update(&mut self, id: &str, patch: NotePatch) -> AppResult<Note> {
        let current = self.notes.find(id)?.clone();
        let note = self.service.update_note(&current, patch)?;
        self.notes.upsert(note.clone());
        Ok(note)
    }

    /// Moves a note to another space; it leaves this controller.
    pub fn move_to(&mut self, id: &str, target_space_id: &str) -> AppResult<Note> {
        let current = self.notes.find(id)?.clone();
        let note = self.service.move_note(&current, target_space_id)?;
        if note.space_id == self.space_id {
            self.notes.upsert(note.clone());
        } else {
            self.notes.remove(id);
        }
        Ok(note)
    }

    pub fn delete(&mut self, id: &str) -> AppResult<()> {
        self.service.delete_note(id)?;
        self.notes.remove(id);
        Ok(())
    }

    pub fn reorder(&mut self, ordered_ids: &[String]) -> AppResult<&[Note]> {
        let notes = self.service.reorder_notes(&self.space_id, ordered_ids)?;
        self.notes.set(Ok(notes))
    }
}
