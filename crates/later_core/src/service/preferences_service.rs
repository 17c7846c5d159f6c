//! Device-local preferences: currently the theme mode only.

use crate::error::AppResult;
use crate::model::session::ThemeMode;
use crate::repo::preferences_repo::PreferencesRepository;
use log::info;

const THEME_MODE_KEY: &str = "theme_mode";

pub struct PreferencesService<R: PreferencesRepository> {
    repo: R,
}

impl<R: PreferencesRepository> PreferencesService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Stored theme; `System` when unset or unrecognized.
    pub fn theme_mode(&self) -> AppResult<ThemeMode> {
        Ok(self
            .repo
            .get(THEME_MODE_KEY)?
            .map(|value| ThemeMode::parse_or_default(&value))
            .unwrap_or_default())
    }

    pub fn set_theme_mode(&self, mode: ThemeMode) -> AppResult<()> {
        self.repo.set(THEME_MODE_KEY, mode.as_str())?;
        info!(
            "event=theme_set module=service status=ok mode={}",
            mode.as_str()
        );
        Ok(())
    }

    pub fn reset_theme_mode(&self) -> AppResult<()> {
        self.repo.remove(THEME_MODE_KEY)
    }
}
