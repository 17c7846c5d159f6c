//! Custom lists of one space, and the items of one list.
//!
//! Item mutations change the parent list's counters in storage; a held
//! [`ListsController`] picks them up on its next `load`.

use crate::error::AppResult;
use crate::model::list::{ListItem, ListItemPatch, ListModel, ListModelPatch, ListStyle};
use crate::repo::Reorderable;
use crate::service::list_service::ListService;
use crate::state::{AsyncValue, EntityCollection};

pub struct ListsController<L, I>
where
    L: Reorderable<ListModel>,
    I: Reorderable<ListItem>,
{
    space_id: String,
    service: ListService<L, I>,
    lists: EntityCollection<ListModel>,
}

impl<L, I> ListsController<L, I>
where
    L: Reorderable<ListModel>,
    I: Reorderable<ListItem>,
{
    pub fn new(service: ListService<L, I>, space_id: impl Into<String>) -> Self {
        Self {
            space_id: space_id.into(),
            service,
            lists: EntityCollection::new(),
        }
    }

    pub fn space_id(&self) -> &str {
        &self.space_id
    }

    pub fn state(&self) -> &AsyncValue<Vec<ListModel>> {
        self.lists.state()
    }

    pub fn load(&mut self) -> AppResult<&[ListModel]> {
        let result = self.service.list_lists(&self.space_id);
        self.lists.set(result)
    }

    pub fn create(
        &mut self,
        name: &str,
        icon: Option<&str>,
        style: ListStyle,
    ) -> AppResult<ListModel> {
        let sort_order = self.lists.next_sort_order();
        let list = self
            .service
            .create_list(&self.space_id, name, icon, style, sort_order)?;
        self.lists.upsert(list.clone());
        Ok(list)
    }

    pub fn update(&mut self, id: &str, patch: ListModelPatch) -> AppResult<ListModel> {
        let current = self.lists.find(id)?.clone();
        let list = self.service.update_list(&current, patch)?;
        self.lists.upsert(list.clone());
        Ok(list)
    }

    pub fn delete(&mut self, id: &str) -> AppResult<()> {
        self.service.delete_list(id)?;
        self.lists.remove(id);
        Ok(())
    }

    pub fn reorder(&mut self, ordered_ids: &[String]) -> AppResult<&[ListModel]> {
        let lists = self.service.reorder_lists(&self.space_id, ordered_ids)?;
        self.lists.set(Ok(lists))
    }
}

pub struct ListItemsController<L, I>
where
    L: Reorderable<ListModel>,
    I: Reorderable<ListItem>,
{
    list_id: String,
    service: ListService<L, I>,
    items: EntityCollection<ListItem>,
}

impl<L, I> ListItemsController<L, I>
where
    L: Reorderable<ListModel>,
    I: Reorderable<ListItem>,
{
    pub fn new(service: ListService<L, I>, list_id: impl Into<String>) -> Self {
        Self {
            list_id: list_id.into(),
            service,
            items: EntityCollection::new(),
        }
    }

    pub fn list_id(&self) -> &str {
        &self.list_id
    }

    pub fn state(&self) -> &AsyncValue<Vec<ListItem>> {
        self.items.state()
    }

    pub fn load(&mut self) -> AppResult<&[ListItem]> {
        let result = self.service.list_items(&self.list_id);
        self.items.set(result)
    }

    pub fn create(&mut self, title: &str, notes: Option<&str>) -> AppResult<ListItem> {
        let sort_order = self.items.next_sort_order();
        let item = self
            .service
            .create_item(&self.list_id, title, notes, sort_order)?;
        self.items.upsert(item.clone());
        Ok(item)
    }

    pub fn update(&mut self, id: &str, patch: ListItemPatch) -> AppResult<ListItem> {
        let current = self.items.find(id)?.clone();
        let item = self.service.update_item(&current, patch)?;
        self.items.upsert(item.clone());
        Ok(item)
    }

    pub fn toggle(&mut self, id: &str) -> AppResult<ListItem> {
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

    pub fn reorder(&mut self, ordered_ids: &[String]) -> AppResult<&[ListItem]> {
        let items = self.service.reorder_items(&self.list_id, ordered_ids)?;
        self.items.set(Ok(items))
    }
}
