//! # Configuration
//!
//! Curator configuration is managed by [`clapfig`], which handles layered
//! loading from TOML files, environment variables, and compiled defaults.
//!
//! ## Storage Hierarchy
//!
//! Configuration is resolved in priority order:
//! 1. **Environment variables**: `CURATOR__ALLOW_LIST_REMOVAL`, etc.
//! 2. **Data directory config**: `<data dir>/curator.toml`.
//! 3. **Global config**: OS-appropriate config directory (via `directories`).
//! 4. **Compiled defaults**: built-in fallbacks via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `default_view_mode` | `current` | View mode used when none is asked for |
//! | `allow_list_removal` | `false` | Allow removing list elements (append-only otherwise) |
//! | `catalog_file` | `catalog.json` | Schema catalog file in the data directory |
//! | `item_file_ext` | `.json` | Extension of item documents |

use confique::Config;
use serde::{Deserialize, Serialize};

use crate::api::ApiOptions;
use crate::attributes::ViewMode;
use crate::session::SessionOptions;

/// Configuration for curator, stored in `curator.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CuratorConfig {
    /// View mode used when none is asked for: current, original, updated or mapped.
    #[config(default = "current")]
    pub default_view_mode: String,

    /// Allow removing elements from list attributes.
    #[config(default = false)]
    pub allow_list_removal: bool,

    /// Schema catalog file, relative to the data directory.
    #[config(default = "catalog.json")]
    pub catalog_file: String,

    /// Extension of item documents (e.g. ".json").
    #[config(default = ".json")]
    pub item_file_ext: String,
}

impl Default for CuratorConfig {
    fn default() -> Self {
        Self {
            default_view_mode: "current".to_string(),
            allow_list_removal: false,
            catalog_file: "catalog.json".to_string(),
            item_file_ext: ".json".to_string(),
        }
    }
}

impl CuratorConfig {
    /// The configured view mode. Unknown values fall back to current.
    pub fn view_mode(&self) -> ViewMode {
        match self.default_view_mode.parse() {
            Ok(mode) => mode,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring default_view_mode");
                ViewMode::Current
            }
        }
    }

    /// Get the item file extension, normalized to start with a dot.
    pub fn item_file_ext(&self) -> String {
        if self.item_file_ext.starts_with('.') {
            self.item_file_ext.clone()
        } else {
            format!(".{}", self.item_file_ext)
        }
    }

    pub fn api_options(&self) -> ApiOptions {
        ApiOptions {
            default_view_mode: self.view_mode(),
            session: SessionOptions {
                editable: true,
                allow_list_removal: self.allow_list_removal,
            },
        }
    }
}
