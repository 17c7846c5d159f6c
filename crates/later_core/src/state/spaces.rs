//! Long-lived controller over the user's spaces.

use crate::error::AppResult;
use crate::model::space::{Space, SpacePatch};
use crate::repo::space_repo::SpaceRepository;
use crate::service::space_service::SpaceService;
use crate::state::{AsyncValue, EntityCollection};

pub struct SpacesController<R: SpaceRepository> {
    service: SpaceService<R>,
    spaces: EntityCollection<Space>,
    include_archived: bool,
}

impl<R: SpaceRepository> SpacesController<R> {
    pub fn new(service: SpaceService<R>) -> Self {
        Self {
            service,
            spaces: EntityCollection::new(),
            include_archived: false,
        }
    }

    /// Also holds archived spaces after the next `load`.
    pub fn with_archived(mut self) -> Self {
        self.include_archived = true;
        self
    }

    pub fn state(&self) -> &AsyncValue<Vec<Space>> {
        self.spaces.state()
    }

    pub fn load(&mut self) -> AppResult<&[Space]> {
        let result = self.service.list_spaces(self.include_archived);
        self.spaces.set(result)
    }

    pub fn create(
        &mut self,
        name: &str,
        icon: Option<&str>,
        color: Option<&str>,
    ) -> AppResult<Space> {
        let space = self.service.create_space(name, icon, color)?;
        self.spaces.upsert(space.clone());
        Ok(space)
    }

    pub fn update(&mut self, id: &str, patch: SpacePatch) -> AppResult<Space> {
        let current = self.spaces.find(id)?.clone();
        let space = self.service.update_space(&current, patch)?;
        self.spaces.upsert(space.clone());
        Ok(space)
    }

    pub fn archive(&mut self, id: &str) -> AppResult<Space> {
        let space = self.service.archive_space(id)?;
        if self.include_archived {
            self.spaces.upsert(space.clone());
        } else {
            self.spaces.remove(id);
        }
        Ok(space)
    }

    pub fn restore(&mut self, id: &str) -> AppResult<Space> {
        let space = self.service.restore_space(id)?;
        self.spaces.upsert(space.clone());
        Ok(space)
    }

    pub fn delete(&mut self, id: &str) -> AppResult<()> {
        self.service.delete_space(id)?;
        self.spaces.remove(id);
        Ok(())
    }
}
