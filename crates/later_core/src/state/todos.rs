//! Todo lists of one space, and the items of one todo list.

use crate::error::AppResult;
use crate::model::todo::{TodoItem, TodoItemPatch, TodoList, TodoListPatch};
use crate::repo::Reorderable;
use crate::service::todo_service::TodoService;
use crate::state::{AsyncValue, EntityCollection};

pub struct TodoListsController<L, I>
where
    L: Reorderable<TodoList>,
    I: Reorderable<TodoItem>,
{
    space_id: String,
    service: TodoService<L, I>,
    lists: EntityCollection<TodoList>,
}

impl<L, I> TodoListsController<L, I>
where
    L: Reorderable<TodoList>,
    I: Reorderable<TodoItem>,
{
    pub fn new(service: TodoService<L, I>, space_id: impl Into<String>) -> Self {
        Self {
            space_id: space_id.into(),
            service,
            lists: EntityCollection::new(),
        }
    }

    pub fn space_id(&self) -> &str {
        &self.space_id
    }

    pub fn state(&self) -> &AsyncValue<Vec<TodoList>> {
        self.lists.state()
    }

    pub fn load(&mut self) -> AppResult<&[TodoList]> {
        let result = self.service.list_todo_lists(&self.space_id);
        self.lists.set(result)
    }

    pub fn create(&mut self, name: &str, description: Option<&str>) -> AppResult<TodoList> {
        let sort_order = self.lists.next_sort_order();
        let list = self
            .service
            .create_todo_list(&self.space_id, name, description, sort_order)?;
        self.lists.upsert(list.clone());
        Ok(list)
    }

    pub fn update(&mut self, id: &str, patch: TodoListPatch) -> AppResult<TodoList> {
        let current = self.lists.find(id)?.clone();
        let list = self.service.update_todo_list(&current, patch)?;
        self.lists.upsert(list.clone());
        Ok(list)
    }

    pub fn delete(&mut self, id: &str) -> AppResult<()> {
        self.service.delete_todo_list(id)?;
        self.lists.remove(id);
        Ok(())
    }

    pub fn reorder(&mut self, ordered_ids: &[String]) -> AppResult<&[TodoList]> {
        let lists = self
            .service
            .reorder_todo_lists(&self.space_id, ordered_ids)?;
        self.lists.set(Ok(lists))
    }
}

pub struct TodoItemsController<L, I>
where
    L: Reorderable<TodoList>,
    I: Reorderable<TodoItem>,
{
    todo_list_id: String,
    service: TodoService<L, I>,
    items: EntityCollection<TodoItem>,
}

impl<L, I> TodoItemsController<L, I>
where
    L: Reorderable<TodoList>,
    I: Reorderable<TodoItem>,
{
    pub fn new(service: TodoService<L, I>, todo_list_id: impl Into<String>) -> Self {
        Self {
            todo_list_id: todo_list_id.into(),
            service,
            items: EntityCollection::new(),
        }
    }

    pub fn todo_list_id(&self) -> &str {
        &self.todo_list_id
    }

    pub fn state(&self) -> &AsyncValue<Vec<TodoItem>> {
        self.items.state()
    }

    pub fn load(&mut self) -> AppResult<&[TodoItem]> {
        let result = self.service.list_items(&self.todo_list_id);
        self.items.set(result)
    }

    pub fn create(&mut self, title: &str, details: TodoItemPatch) -> AppResult<TodoItem> {
        let sort_order = self.items.next_sort_order();
        let item = self
            .service
            .create_item(&self.todo_list_id, title, sort_order, details)?;
        self.items.upsert(item.clone());
        Ok(item)
    }

    pub fn update(&mut self, id: &str, patch: TodoItemPatch) -> AppResult<TodoItem> {
        let current = self.items.find(id)?.clone();
        let item = self.service.update_item(&current, patch)?;
        self.items.upsert(item.clone());
        Ok(item)
    }

    pub fn toggle(&mut self, id: &str) -> AppResult<TodoItem> {
        let current = self.items.find(id)?.clone();
        let item = self.service.toggle_item(&current)?;
        self.items.upsert(item.clone());
        Ok(item)
    }

    pub fn delete(&mut self, id: &str) -> AppResult<()> {
        self.service.delete_item(id)?;
        self.items.remove(id);
        Ok(())
    }

    pub fn reorder(&mut self, ordered_ids: &[String]) -> AppResult<&[TodoItem]> {
        let items = self.service.reorder_items(&self.todo_list_id, ordered_ids)?;
        self.items.set(Ok(items))
    }
}
