// src/ui/theme.rs

//! Persisted light/dark theme preference.
//!
//! Initialization order: stored preference, then the system preference,
//! then light. All changes go through one entry point so the persisted
//! file and the in-memory state never drift apart.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Theme file name inside the storage directory.
const THEME_FILE: &str = "theme.toml";

/// The two supported themes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    /// The other mode.
    pub fn opposite(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

/// On-disk representation of the preference.
#[derive(Debug, Serialize, Deserialize)]
struct StoredTheme {
    theme: ThemeMode,
}

/// Theme state with persistence.
#[derive(Debug)]
pub struct ThemeState {
    mode: ThemeMode,
    path: PathBuf,
}

impl ThemeState {
    /// Initialize the theme.
    ///
    /// A stored preference wins; without one the injected system
    /// preference decides; the final fallback is light.
    pub fn init(storage_dir: &Path, system_prefers_dark: bool) -> Self {
        let path = storage_dir.join(THEME_FILE);
        let mode = Self::load(&path).unwrap_or(if system_prefers_dark {
            ThemeMode::Dark
        } else {
            ThemeMode::Light
        });
        Self { mode, path }
    }

    /// Current mode.
    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    /// Set the mode and persist it. The single mutation entry point.
    pub fn set(&mut self, mode: ThemeMode) -> Result<()> {
        self.mode = mode;
        let stored = StoredTheme { theme: mode };
        fs::write(&self.path, toml::to_string(&stored)?)?;
        Ok(())
    }

    /// Flip between light and dark, persisting the result.
    pub fn toggle(&mut self) -> Result<ThemeMode> {
        self.set(self.mode.opposite())?;
        Ok(self.mode)
    }

    fn load(path: &Path) -> Option<ThemeMode> {
        let content = fs::read_to_string(path).ok()?;
        let stored: StoredTheme = toml::from_str(&content)
            .map_err(|e| log::warn!("Ignoring unreadable theme file {:?}: {}", path, e))
            .ok()?;
        Some(stored.theme)
    }
}
