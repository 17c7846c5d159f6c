//! Space use-case service.
//!
//! # Invariants
//! - Names are trimmed and 1..=100 chars; colors are `#RRGGBB`.
//! - Spaces with content are archived, not deleted.

use crate::error::AppResult;
use crate::model::space::{Space, SpacePatch};
use crate::model::update::Update;
use crate::repo::space_repo::SpaceRepository;
use crate::service::log_outcome;
use crate::service::validation;
use chrono::Utc;

pub struct SpaceService<R: SpaceRepository> {
    repo: R,
}

impl<R: SpaceRepository> SpaceService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn user_id(&self) -> &str {
        self.repo.user_id()
    }

    pub fn create_space(
        &self,
        name: &str,
        icon: Option<&str>,
        color: Option<&str>,
    ) -> AppResult<Space> {
        let name = validation::required_text("name", name, validation::NAME_MAX)?;
        let mut patch = SpacePatch::default();
        if let Some(icon) = icon.map(str::trim).filter(|icon| !icon.is_empty()) {
            patch = patch.icon(icon);
        }
        if let Some(color) = color {
            patch = patch.color(validation::color(color)?);
        }

        let space = Space::new(name, self.user_id()).copy_with(patch);
        let result = self.repo.create(&space);
        log_outcome("space_create", &space.id, &result);
        result
    }

    /// Applies `patch` to `current` after validating the touched fields.
    pub fn update_space(&self, current: &Space, patch: SpacePatch) -> AppResult<Space> {
        let patch = validate_patch(patch)?.updated_at(Utc::now());
        let result = self.repo.update(&current.copy_with(patch));
        log_outcome("space_update", &current.id, &result);
        result
    }

    pub fn archive_space(&self, id: &str) -> AppResult<Space> {
        self.set_archived(id, true)
    }

    pub fn restore_space(&self, id: &str) -> AppResult<Space> {
        self.set_archived(id, false)
    }

    pub fn delete_space(&self, id: &str) -> AppResult<()> {
        let result = self.repo.delete(id);
        log_outcome("space_delete", id, &result);
        result
    }

    pub fn get_space(&self, id: &str) -> AppResult<Option<Space>> {
        self.repo.get(id)
    }

    pub fn list_spaces(&self, include_archived: bool) -> AppResult<Vec<Space>> {
        self.repo.list_spaces(include_archived)
    }

    fn set_archived(&self, id: &str, archived: bool) -> AppResult<Space> {
        let result = self.repo.set_archived(id, archived, Utc::now());
        log_outcome(
            if archived {
                "space_archive"
            } else {
                "space_restore"
            },
            id,
            &result,
        );
        result
    }
}

fn validate_patch(mut patch: SpacePatch) -> AppResult<SpacePatch> {
    patch.name = patch
        .name
        .map(|name| validation::required_text("name", &name, validation::NAME_MAX))
        .transpose()?;
    if let Update::Set(color) = &patch.color {
        patch.color = Update::Set(validation::color(color)?);
    }
    if matches!(&patch.icon, Update::Set(icon) if icon.trim().is_empty()) {
        patch.icon = Update::Clear;
    }
    Ok(patch)
}
