use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Storage key of the persisted theme flag.
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    /// Only the exact "dark" sentinel selects dark; anything else is light.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("dark") => ThemeMode::Dark,
            _ => ThemeMode::Light,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

/// Key-value persistence for site preferences.
pub trait ThemeStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ThemeStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

/// Key-value pairs persisted as a RON map. Write failures are logged and
/// the in-memory value is kept.
#[derive(Debug)]
pub struct RonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl RonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(content) => match ron::from_str(&content) {
                Ok(v) => v,
                Err(e) => {
                    log::warn!("failed to parse {}: {}, starting empty", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };
        Self { path, values }
    }

    fn flush(&self) {
        let pretty = ron::ser::PrettyConfig::default();
        match ron::ser::to_string_pretty(&self.values, pretty) {
            Ok(s) => {
                if let Err(e) = std::fs::write(&self.path, s) {
                    log::warn!("failed to write {}: {}", self.path.display(), e);
                }
            }
            Err(e) => log::warn!("failed to serialize preferences: {}", e),
        }
    }
}

impl ThemeStore for RonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
        self.flush();
    }
}

/// What `applyTheme` writes to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeView {
    /// `data-theme` attribute on body and html; `None` removes it.
    pub data_theme: Option<&'static str>,
    pub icon_class: &'static str,
    pub logo_src: &'static str,
}

pub struct ThemeController<S: ThemeStore> {
    store: S,
    mode: ThemeMode,
}

impl<S: ThemeStore> ThemeController<S> {
    /// Read the saved preference; absent means light.
    pub fn load(store: S) -> Self {
        let mode = ThemeMode::from_stored(store.get(THEME_KEY).as_deref());
        Self { store, mode }
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn view(&self) -> ThemeView {
        match self.mode {
            ThemeMode::Dark => ThemeView {
                data_theme: Some("dark"),
                icon_class: "fa-sun",
                logo_src: "imgs/logo white.png",
            },
            ThemeMode::Light => ThemeView {
                data_theme: None,
                icon_class: "fa-moon",
                logo_src: "imgs/logo.png",
            },
        }
    }

    /// Flip, persist, and return the new view.
    pub fn toggle(&mut self) -> ThemeView {
        self.mode = self.mode.toggled();
        self.store.set(THEME_KEY, self.mode.as_str());
        log::debug!("theme -> {}", self.mode.as_str());
        self.view()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_or_unknown_value_is_light() {
        assert_eq!(ThemeMode::from_stored(None), ThemeMode::Light);
        assert_eq!(ThemeMode::from_stored(Some("DARK")), ThemeMode::Light);
        assert_eq!(ThemeMode::from_stored(Some("dark")), ThemeMode::Dark);
    }

    #[test]
    fn toggle_persists_flag() {
        let mut theme = ThemeController::load(MemoryStore::new());
        assert_eq!(theme.view().icon_class, "fa-moon");

        let view = theme.toggle();
        assert_eq!(view.data_theme, Some("dark"));
        assert_eq!(view.logo_src, "imgs/logo white.png");
        assert_eq!(theme.store().get(THEME_KEY).as_deref(), Some("dark"));

        theme.toggle();
        assert_eq!(theme.store().get(THEME_KEY).as_deref(), Some("light"));
        assert_eq!(theme.view().data_theme, None);
    }

    #[test]
    fn saved_dark_preference_survives_reload() {
        let mut store = MemoryStore::new();
        store.set(THEME_KEY, "dark");
        let theme = ThemeController::load(store);
        assert_eq!(theme.mode(), ThemeMode::Dark);
    }

    #[test]
    fn ron_file_store_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "skypioneers-theme-{}.ron",
            std::process::id()
        ));
        {
            let mut store = RonFileStore::open(&path);
            store.set(THEME_KEY, "dark");
        }
        let reopened = RonFileStore::open(&path);
        assert_eq!(reopened.get(THEME_KEY).as_deref(), Some("dark"));
        let _ = std::fs::remove_file(&path);
    }
}
