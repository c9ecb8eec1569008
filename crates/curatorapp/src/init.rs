//! # Initialization
//!
//! [`initialize`] wires a ready-to-use [`CuratorContext`] from the
//! environment: it picks the data directory, loads configuration, loads the
//! schema catalog once for the process, and builds the API over a
//! [`FileStore`].
//!
//! ## Data Directory Resolution
//!
//! 1. An explicit override (the CLI's `--data`).
//! 2. The `CURATOR_DATA` environment variable.
//! 3. The OS-appropriate data directory (via the `directories` crate).
//! 4. `./.curator` when the OS reports no home directory.
//!
//! ## Configuration Search
//!
//! `curator.toml` is looked up in the global config directory, then in the
//! data directory. Both are merged; the data directory wins.

use crate::api::CuratorApi;
use crate::catalog::{CatalogSource, JsonCatalogSource};
use crate::config::CuratorConfig;
use crate::error::Result;
use crate::store::fs::FileStore;
use clapfig::{Clapfig, SearchMode, SearchPath};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

pub const DATA_ENV: &str = "CURATOR_DATA";
pub const CONFIG_FILE: &str = "curator.toml";

pub struct CuratorContext {
    pub api: CuratorApi<FileStore>,
    pub config: CuratorConfig,
    pub data_dir: PathBuf,
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "curator", "curator")
}

/// Pick the data directory from an override and the `CURATOR_DATA` value.
pub fn resolve_data_dir(data_override: Option<PathBuf>, env_value: Option<String>) -> PathBuf {
    data_override
        .or_else(|| env_value.filter(|v| !v.is_empty()).map(PathBuf::from))
        .or_else(|| project_dirs().map(|dirs| dirs.data_dir().to_path_buf()))
        .unwrap_or_else(|| PathBuf::from(".curator"))
}

/// Load `curator.toml` layers for `data_dir`, falling back to defaults.
pub fn load_config(data_dir: &Path) -> CuratorConfig {
    let mut search_paths = Vec::new();
    if let Some(dirs) = project_dirs() {
        search_paths.push(SearchPath::Path(dirs.config_dir().to_path_buf()));
    }
    search_paths.push(SearchPath::Path(data_dir.to_path_buf()));

    Clapfig::builder()
        .app_name("curator")
        .file_name(CONFIG_FILE)
        .search_paths(search_paths)
        .search_mode(SearchMode::Merge)
        .load()
        .unwrap_or_default()
}

/// Build the context for `data_override`, or the resolved data directory.
pub fn initialize(data_override: Option<PathBuf>) -> Result<CuratorContext> {
    let data_dir = resolve_data_dir(data_override, std::env::var(DATA_ENV).ok());
    let config = load_config(&data_dir);

    let catalog = JsonCatalogSource::new(&data_dir).load(&config.catalog_file)?;
    let store = FileStore::new(data_dir.clone()).with_file_ext(&config.item_file_ext());
    let api = CuratorApi::new(store, catalog, config.api_options());
    tracing::debug!(data_dir = %data_dir.display(), "initialized curator");

    Ok(CuratorContext {
        api,
        config,
        data_dir,
    })
}
