//! Import options, loadable from TOML.
//!
//! ```toml
//! atomic_mode = "object"
//! skip_pattern_validation = false
//! threads = 4
//!
//! [id_schemes]
//! org_unit = "code"
//!
//! [user]
//! username = "admin"
//! authorities = ["F_IGNORE_TRACKER_REQUIRED_VALUE_VALIDATION"]
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracker_model::{AtomicMode, IdScheme, ImportUser};

use crate::error::ConfigError;

/// Identifier scheme used for each kind of reference in the payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdSchemes {
    pub program_stage: IdScheme,
    pub org_unit: IdScheme,
    pub tracked_entity_type: IdScheme,
    pub attribute: IdScheme,
    pub data_element: IdScheme,
}

impl IdSchemes {
    /// Use the same scheme for every kind.
    pub fn uniform(scheme: IdScheme) -> Self {
        Self {
            program_stage: scheme,
            org_unit: scheme,
            tracked_entity_type: scheme,
            attribute: scheme,
            data_element: scheme,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    pub id_schemes: IdSchemes,
    pub atomic_mode: AtomicMode,
    /// Accept generated attribute values without checking their text pattern.
    pub skip_pattern_validation: bool,
    /// Acting user; `None` imports without any special authority.
    pub user: Option<ImportUser>,
    /// Worker threads for parallel validation; `None` uses the global pool.
    pub threads: Option<usize>,
}

impl ImportOptions {
    pub fn from_toml_str(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    /// Load options from a TOML file.
    pub fn from_toml_path(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let options = Self::from_toml_str(&source).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        options.verify()?;
        Ok(options)
    }

    fn verify(&self) -> Result<(), ConfigError> {
        if self.threads == Some(0) {
            return Err(ConfigError::Invalid {
                message: "threads must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Whether the acting user holds `authority`.
    pub fn user_is_authorized(&self, authority: &str) -> bool {
        self.user
            .as_ref()
            .is_some_and(|user| user.is_authorized(authority))
    }

    #[must_use]
    pub fn with_user(mut self, user: ImportUser) -> Self {
        self.user = Some(user);
        self
    }

    #[must_use]
    pub fn with_atomic_mode(mut self, mode: AtomicMode) -> Self {
        self.atomic_mode = mode;
        self
    }

    #[must_use]
    pub fn with_id_schemes(mut self, id_schemes: IdSchemes) -> Self {
        self.id_schemes = id_schemes;
        self
    }
}
