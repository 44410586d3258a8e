//! Typed, file-backed application state.
//!
//! Everything the app remembers between runs (credentials, store
//! customization, last known location) lives in one JSON document behind
//! [`SettingsStore`]. Reads go through [`SettingsStore::load`]; writes go
//! through [`SettingsStore::save`] with a [`SettingsPatch`] naming only the
//! fields to change.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::Coordinate;
use crate::theme::StoreCustomization;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("settings file {path} is not valid JSON: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// The signed-in user as last reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub user_type: String,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAuth {
    pub token: String,
    #[serde(default)]
    pub expires_at: Option<String>,
    pub user: StoredUser,
}

impl std::fmt::Debug for StoredAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredAuth")
            .field("token", &"[redacted]")
            .field("expires_at", &self.expires_at)
            .field("user", &self.user)
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub auth: Option<StoredAuth>,
    pub customization: StoreCustomization,
    pub last_location: Option<Coordinate>,
}

impl AppSettings {
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.auth.as_ref().map(|a| a.token.as_str())
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.auth.is_some()
    }
}

/// A partial update. `None` leaves a field untouched; `auth: Some(None)`
/// clears stored credentials.
#[derive(Debug, Clone, Default)]
pub struct SettingsPatch {
    pub auth: Option<Option<StoredAuth>>,
    pub customization: Option<StoreCustomization>,
    pub last_location: Option<Coordinate>,
}

impl SettingsPatch {
    fn apply(self, settings: &mut AppSettings) {
        if let Some(auth) = self.auth {
            settings.auth = auth;
        }
        if let Some(customization) = self.customization {
            settings.customization = customization;
        }
        if let Some(location) = self.last_location {
            settings.last_location = Some(location);
        }
    }
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SettingsError {
        SettingsError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }

    /// Reads the settings file, returning defaults if it does not exist yet.
    ///
    /// # Errors
    ///
    /// - [`SettingsError::Io`] if the file exists but cannot be read.
    /// - [`SettingsError::Parse`] if its contents are not valid settings JSON.
    pub fn load(&self) -> Result<AppSettings, SettingsError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no settings file, using defaults");
                return Ok(AppSettings::default());
            }
            Err(e) => return Err(self.io_error(e)),
        };
        serde_json::from_str(&content).map_err(|source| SettingsError::Parse {
            path: self.path.display().to_string(),
            source,
        })
    }

    /// Applies `patch` on top of the stored settings and writes the result.
    ///
    /// The file is replaced atomically: the new document is written to a
    /// sibling temp file which is then renamed over the original.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] if the current file cannot be loaded or the
    /// new one cannot be written.
    pub fn save(&self, patch: SettingsPatch) -> Result<AppSettings, SettingsError> {
        let mut settings = self.load()?;
        patch.apply(&mut settings);
        self.write(&settings)?;
        Ok(settings)
    }

    /// Drops stored credentials, keeping everything else.
    ///
    /// # Errors
    ///
    /// Same as [`SettingsStore::save`].
    pub fn clear_auth(&self) -> Result<AppSettings, SettingsError> {
        self.save(SettingsPatch {
            auth: Some(None),
            ..SettingsPatch::default()
        })
    }

    fn write(&self, settings: &AppSettings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let body = serde_json::to_vec_pretty(settings).map_err(|source| SettingsError::Parse {
            path: self.path.display().to_string(),
            source,
        })?;

        let tmp = self.path.with_extension("json.tmp");
        let mut file = std::fs::File::create(&tmp).map_err(|e| self.io_error(e))?;
        file.write_all(&body).map_err(|e| self.io_error(e))?;
        file.sync_all().map_err(|e| self.io_error(e))?;
        drop(file);
        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;

        tracing::debug!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}
