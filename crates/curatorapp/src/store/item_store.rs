use super::backend::StorageBackend;
use super::ItemStore;
use crate::error::{CuratorError, Result};
use crate::lookup::MappingInfo;
use crate::model::Item;
use chrono::Utc;
use std::path::PathBuf;
use uuid::Uuid;

pub struct ItemRepo<B: StorageBackend> {
    /// The underlying storage backend.
    /// Exposed as pub(crate) for testing and internal access only.
    pub(crate) backend: B,
}

impl<B: StorageBackend> ItemRepo<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    fn parse(uid: &Uuid, raw: &str) -> Result<Item> {
        let item: Item = serde_json::from_str(raw).map_err(CuratorError::Serialization)?;
        if item.uid != *uid {
            return Err(CuratorError::Store(format!(
                "document for item {} holds item {}",
                uid, item.uid
            )));
        }
        Ok(item)
    }
}

impl<B: StorageBackend> ItemStore for ItemRepo<B> {
    fn save_item(&mut self, item: &Item) -> Result<Item> {
        let mut saved = item.clone();
        saved.updated_at = Utc::now();
        let content =
            serde_json::to_string_pretty(&saved).map_err(CuratorError::Serialization)?;
        self.backend.write_item(&saved.uid, &content)?;
        Ok(saved)
    }

    fn get_item(&self, uid: &Uuid) -> Result<Item> {
        match self.backend.read_item(uid)? {
            Some(raw) => Self::parse(uid, &raw),
            None => Err(CuratorError::ItemNotFound(*uid)),
        }
    }

    fn list_items(&self) -> Result<Vec<Item>> {
        let mut items = Vec::new();
        for uid in self.backend.list_item_ids()? {
            // Skip documents deleted between listing and reading
            if let Some(raw) = self.backend.read_item(&uid)? {
                items.push(Self::parse(&uid, &raw)?);
            }
        }
        Ok(items)
    }

    fn delete_item(&mut self, uid: &Uuid) -> Result<()> {
        if self.backend.delete_item(uid)? {
            Ok(())
        } else {
            Err(CuratorError::ItemNotFound(*uid))
        }
    }

    fn item_path(&self, uid: &Uuid) -> Result<PathBuf> {
        Ok(self.backend.item_path(uid))
    }

    fn mapping(&self, mapping_item_uid: &Uuid) -> Result<MappingInfo> {
        self.backend
            .load_mappings()?
            .remove(mapping_item_uid)
            .ok_or_else(|| CuratorError::Store(format!("mapping {} not found", mapping_item_uid)))
    }

    fn save_mapping(&mut self, mapping_item_uid: Uuid, info: MappingInfo) -> Result<()> {
        let mut mappings = self.backend.load_mappings()?;
        mappings.insert(mapping_item_uid, info);
        self.backend.save_mappings(&mappings)
    }
}
