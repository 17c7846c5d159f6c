//! Theme preference controller.

use crate::error::AppResult;
use crate::model::session::ThemeMode;
use crate::repo::preferences_repo::PreferencesRepository;
use crate::service::preferences_service::PreferencesService;
use crate::state::AsyncValue;

pub struct ThemeController<R: PreferencesRepository> {
    service: PreferencesService<R>,
    mode: AsyncValue<ThemeMode>,
}

impl<R: PreferencesRepository> ThemeController<R> {
    pub fn new(service: PreferencesService<R>) -> Self {
        Self {
            service,
            mode: AsyncValue::Loading,
        }
    }

    pub fn state(&self) -> &AsyncValue<ThemeMode> {
        &self.mode
    }

    /// Held mode; `System` until loaded.
    pub fn mode(&self) -> ThemeMode {
        self.mode.value().copied().unwrap_or_default()
    }

    pub fn load(&mut self) -> AppResult<ThemeMode> {
        self.mode = AsyncValue::from_result(self.service.theme_mode());
        match &self.mode {
            AsyncValue::Error(err) => Err(err.clone()),
            _ => Ok(self.mode()),
        }
    }

    pub fn set(&mut self, mode: ThemeMode) -> AppResult<ThemeMode> {
        self.service.set_theme_mode(mode)?;
        self.mode = AsyncValue::Data(mode);
        Ok(mode)
    }

    pub fn toggle(&mut self) -> AppResult<ThemeMode> {
        self.set(self.mode().toggled())
    }
}
