use super::backend::StorageBackend;
use crate::error::{CuratorError, Result};
use crate::lookup::MappingInfo;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const ITEM_PREFIX: &str = "item-";
const MAPPINGS_FILE: &str = "mappings.json";

pub struct FsBackend {
    root: PathBuf,
    file_ext: String,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            file_ext: ".json".to_string(),
        }
    }

    pub fn with_file_ext(mut self, ext: &str) -> Self {
        if ext.starts_with('.') {
            self.file_ext = ext.to_string();
        } else {
            self.file_ext = format!(".{}", ext);
        }
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn file_ext(&self) -> &str {
        &self.file_ext
    }

    fn item_filename(&self, uid: &Uuid) -> String {
        format!("{}{}{}", ITEM_PREFIX, uid, self.file_ext)
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(CuratorError::Io)?;
        }
        Ok(())
    }

    /// Write `content` to `target` through a temporary file in the same
    /// directory.
    fn write_atomic(&self, target: &Path, content: &str) -> Result<()> {
        self.ensure_dir()?;
        let tmp = self.root.join(format!(".tmp-{}", Uuid::new_v4()));
        fs::write(&tmp, content).map_err(CuratorError::Io)?;
        fs::rename(&tmp, target).map_err(CuratorError::Io)?;
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn read_item(&self, uid: &Uuid) -> Result<Option<String>> {
        let path = self.item_path(uid);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).map_err(CuratorError::Io)?;
        Ok(Some(content))
    }

    fn write_item(&self, uid: &Uuid, content: &str) -> Result<()> {
        self.write_atomic(&self.item_path(uid), content)
    }

    fn delete_item(&self, uid: &Uuid) -> Result<bool> {
        let path = self.item_path(uid);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(path).map_err(CuratorError::Io)?;
        Ok(true)
    }

    fn list_item_ids(&self) -> Result<Vec<Uuid>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(CuratorError::Io)? {
            let path = entry.map_err(CuratorError::Io)?.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|s| s.to_str()) else {
                continue;
            };
            let uid = name
                .strip_prefix(ITEM_PREFIX)
                .and_then(|rest| rest.strip_suffix(self.file_ext.as_str()))
                .and_then(|stem| Uuid::parse_str(stem).ok());
            if let Some(uid) = uid {
                ids.push(uid);
            }
        }
        ids.sort();
        Ok(ids)
    }

    fn item_path(&self, uid: &Uuid) -> PathBuf {
        self.root.join(self.item_filename(uid))
    }

    fn load_mappings(&self) -> Result<HashMap<Uuid, MappingInfo>> {
        let path = self.root.join(MAPPINGS_FILE);
        if !path.exists() {
            return Ok(HashMap::new());
        }
        let content = fs::read_to_string(path).map_err(CuratorError::Io)?;
        serde_json::from_str(&content).map_err(CuratorError::Serialization)
    }

    fn save_mappings(&self, mappings: &HashMap<Uuid, MappingInfo>) -> Result<()> {
        let content = serde_json::to_string_pretty(mappings).map_err(CuratorError::Serialization)?;
        self.write_atomic(&self.root.join(MAPPINGS_FILE), &content)
    }
}
