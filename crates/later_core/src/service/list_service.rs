//! Custom list use-case service: lists and their items.
//!
//! # Invariants
//! - List names are 1..=100 chars; item titles 1..=500; item notes at most
//!   2 000 chars.
//! - Item counters on the parent list are maintained by storage; patches
//!   never write them.

use crate::error::AppResult;
use crate::model::list::{ListItem, ListItemPatch, ListModel, ListModelPatch, ListStyle};
use crate::model::update::Update;
use crate::repo::Reorderable;
use crate::service::log_outcome;
use crate::service::validation;
use chrono::Utc;

pub struct ListService<L, I>
where
    L: Reorderable<ListModel>,
    I: Reorderable<ListItem>,
{
    lists: L,
    items: I,
}

impl<L, I> ListService<L, I>
where
    L: Reorderable<ListModel>,
    I: Reorderable<ListItem>,
{
    pub fn new(lists: L, items: I) -> Self {
        Self { lists, items }
    }

    pub fn create_list(
        &self,
        space_id: &str,
        name: &str,
        icon: Option<&str>,
        style: ListStyle,
        sort_order: i64,
    ) -> AppResult<ListModel> {
        let name = validation::required_text("name", name, validation::NAME_MAX)?;
        let mut patch = ListModelPatch::default()
            .style(style)
            .sort_order(sort_order);
        if let Some(icon) = icon.map(str::trim).filter(|icon| !icon.is_empty()) {
            patch = patch.icon(icon);
        }
        let list = ListModel::new(name, space_id, self.lists.user_id()).copy_with(patch);

        let result = self.lists.create(&list);
        log_outcome("list_create", &list.id, &result);
        result
    }

    pub fn update_list(&self, current: &ListModel, patch: ListModelPatch) -> AppResult<ListModel> {
        let mut patch = patch;
        patch.name = patch
            .name
            .map(|name| validation::required_text("name", &name, validation::NAME_MAX))
            .transpose()?;
        patch.total_item_count = None;
        patch.checked_item_count = None;

        let result = self
            .lists
            .update(&current.copy_with(patch.updated_at(Utc::now())));
        log_outcome("list_update", &current.id, &result);
        result
    }

    pub fn delete_list(&self, id: &str) -> AppResult<()> {
        let result = self.lists.delete(id);
        log_outcome("list_delete", id, &result);
        result
    }

    pub fn get_list(&self, id: &str) -> AppResult<Option<ListModel>> {
        self.lists.get(id)
    }

    pub fn list_lists(&self, space_id: &str) -> AppResult<Vec<ListModel>> {
        self.lists.list_for_parent(space_id)
    }

    pub fn reorder_lists(
        &self,
        space_id: &str,
        ordered_ids: &[String],
    ) -> AppResult<Vec<ListModel>> {
        validation::reorder_ids(ordered_ids)?;
        let result = self.lists.reorder(space_id, ordered_ids);
        log_outcome("list_reorder", space_id, &result);
        result
    }

    pub fn create_item(
        &self,
        list_id: &str,
        title: &str,
        notes: Option<&str>,
        sort_order: i64,
    ) -> AppResult<ListItem> {
        let title = validation::required_text("title", title, validation::ITEM_TITLE_MAX)?;
        let notes = validation::optional_text("notes", notes, validation::DESCRIPTION_MAX)?;
        let mut item = ListItem::new(list_id, title, sort_order);
        item.notes = notes;

        let result = self.items.create(&item);
        log_outcome("list_item_create", &item.id, &result);
        result
    }

    pub fn update_item(&self, current: &ListItem, patch: ListItemPatch) -> AppResult<ListItem> {
        let mut patch = patch;
        patch.title = patch
            .title
            .map(|title| validation::required_text("title", &title, validation::ITEM_TITLE_MAX))
            .transpose()?;
        if let Update::Set(notes) = &patch.notes {
            patch.notes =
                match validation::optional_text("notes", Some(notes), validation::DESCRIPTION_MAX)? {
                    Some(notes) => Update::Set(notes),
                    None => Update::Clear,
                };
        }

        let result = self.items.update(&current.copy_with(patch));
        log_outcome("list_item_update", &current.id, &result);
        result
    }

    /// Flips the checked state of `current`.
    pub fn toggle_item(&self, current: &ListItem) -> AppResult<ListItem> {
        let result = self
            .items
            .update(&current.copy_with(ListItemPatch::default().checked(!current.is_checked)));
        log_outcome("list_item_toggle", &current.id, &result);
        result
    }

    pub fn delete_item(&self, id: &str) -> AppResult<()> {
        let result = self.items.delete(id);
        log_outcome("list_item_delete", id, &result);
        result
    }

    pub fn list_items(&self, list_id: &str) -> AppResult<Vec<ListItem>> {
        self.items.list_for_parent(list_id)
    }

    pub fn reorder_items(&self, list_id: &str, ordered_ids: &[String]) -> AppResult<Vec<ListItem>> {
        validation::reorder_ids(ordered_ids)?;
        let result = self.items.reorder(list_id, ordered_ids);
        log_outcome("list_item_reorder", list_id, &result);
        result
    }
}
