//! Todo use-case service: todo lists and their items.

use crate::error::AppResult;
use crate::model::todo::{TodoItem, TodoItemPatch, TodoList, TodoListPatch};
use crate::model::update::Update;
use crate::repo::Reorderable;
use crate::service::log_outcome;
use crate::service::validation;
use chrono::Utc;

pub struct TodoService<L, I>
where
    L: Reorderable<TodoList>,
    I: Reorderable<TodoItem>,
{
    lists: L,
    items: I,
}

impl<L, I> TodoService<L, I>
where
    L: Reorderable<TodoList>,
    I: Reorderable<TodoItem>,
{
    pub fn new(lists: L, items: I) -> Self {
        Self { lists, items }
    }

    pub fn create_todo_list(
        &self,
        space_id: &str,
        name: &str,
        description: Option<&str>,
        sort_order: i64,
    ) -> AppResult<TodoList> {
        let name = validation::required_text("name", name, validation::NAME_MAX)?;
        let description =
            validation::optional_text("description", description, validation::DESCRIPTION_MAX)?;
        let mut patch = TodoListPatch::default().sort_order(sort_order);
        if let Some(description) = description {
            patch = patch.description(description);
        }
        let list = TodoList::new(name, space_id, self.lists.user_id()).copy_with(patch);

        let result = self.lists.create(&list);
        log_outcome("todo_list_create", &list.id, &result);
        result
    }

    pub fn update_todo_list(
        &self,
        current: &TodoList,
        patch: TodoListPatch,
    ) -> AppResult<TodoList> {
        let mut patch = patch;
        patch.name = patch
            .name
            .map(|name| validation::required_text("name", &name, validation::NAME_MAX))
            .transpose()?;
        patch.description = validate_description(patch.description)?;
        patch.total_item_count = None;
        patch.completed_item_count = None;

        let result = self
            .lists
            .update(&current.copy_with(patch.updated_at(Utc::now())));
        log_outcome("todo_list_update", &current.id, &result);
        result
    }

    pub fn delete_todo_list(&self, id: &str) -> AppResult<()> {
        let result = self.lists.delete(id);
        log_outcome("todo_list_delete", id, &result);
        result
    }

    pub fn get_todo_list(&self, id: &str) -> AppResult<Option<TodoList>> {
        self.lists.get(id)
    }

    pub fn list_todo_lists(&self, space_id: &str) -> AppResult<Vec<TodoList>> {
        self.lists.list_for_parent(space_id)
    }

    pub fn reorder_todo_lists(
        &self,
        space_id: &str,
        ordered_ids: &[String],
    ) -> AppResult<Vec<TodoList>> {
        validation::reorder_ids(ordered_ids)?;
        let result = self.lists.reorder(space_id, ordered_ids);
        log_outcome("todo_list_reorder", space_id, &result);
        result
    }

    /// Creates an item; optional fields come from `details`.
    pub fn create_item(
        &self,
        todo_list_id: &str,
        title: &str,
        sort_order: i64,
        details: TodoItemPatch,
    ) -> AppResult<TodoItem> {
        let title = validation::required_text("title", title, validation::ITEM_TITLE_MAX)?;
        let mut details = validate_item_patch(details)?;
        details.title = None;
        let item = TodoItem::new(todo_list_id, title, sort_order).copy_with(details);

        let result = self.items.create(&item);
        log_outcome("todo_item_create", &item.id, &result);
        result
    }

    pub fn update_item(&self, current: &TodoItem, patch: TodoItemPatch) -> AppResult<TodoItem> {
        let patch = validate_item_patch(patch)?;
        let result = self.items.update(&current.copy_with(patch));
        log_outcome("todo_item_update", &current.id, &result);
        result
    }

    pub fn toggle_item(&self, current: &TodoItem) -> AppResult<TodoItem> {
        let patch = TodoItemPatch::default().completed(!current.is_completed);
        let result = self.items.update(&current.copy_with(patch));
        log_outcome("todo_item_toggle", &current.id, &result);
        result
    }

    pub fn delete_item(&self, id: &str) -> AppResult<()> {
        let result = self.items.delete(id);
        log_outcome("todo_item_delete", id, &result);
        result
    }

    pub fn list_items(&self, todo_list_id: &str) -> AppResult<Vec<TodoItem>> {
        self.items.list_for_parent(todo_list_id)
    }

    pub fn reorder_items(
        &self,
        todo_list_id: &str,
        ordered_ids: &[String],
    ) -> AppResult<Vec<TodoItem>> {
        validation::reorder_ids(ordered_ids)?;
        let result = self.items.reorder(todo_list_id, ordered_ids);
        log_outcome("todo_item_reorder", todo_list_id, &result);
        result
    }
}

fn validate_description(description: Update<String>) -> AppResult<Update<String>> {
    let Update::Set(text) = description else {
        return Ok(description);
    };
    Ok(
        match validation::optional_text("description", Some(&text), validation::DESCRIPTION_MAX)? {
            Some(text) => Update::Set(text),
            None => Update::Clear,
        },
    )
}

fn validate_item_patch(mut patch: TodoItemPatch) -> AppResult<TodoItemPatch> {
    patch.title = patch
        .title
        .map(|title| validation::required_text("title", &title, validation::ITEM_TITLE_MAX))
        .transpose()?;
    patch.description = validate_description(patch.description)?;
    patch.tags = patch
        .tags
        .map(|tags| validation::tags(&tags))
        .transpose()?;
    Ok(patch)
}
