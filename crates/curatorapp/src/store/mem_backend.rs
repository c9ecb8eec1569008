use super::backend::StorageBackend;
use crate::error::{CuratorError, Result};
use crate::lookup::MappingInfo;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use uuid::Uuid;

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since the editing subsystem is
/// single-threaded. This lets the `StorageBackend` trait use `&self` for
/// all methods.
#[derive(Default)]
pub struct MemBackend {
    items: RefCell<BTreeMap<Uuid, String>>,
    mappings: RefCell<HashMap<Uuid, MappingInfo>>,
    simulate_write_error: RefCell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    /// Test helper to plant a raw document, e.g. a corrupted one.
    pub fn put_raw(&self, uid: Uuid, content: &str) {
        self.items.borrow_mut().insert(uid, content.to_string());
    }

    fn check_writable(&self) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(CuratorError::Store("Simulated write error".to_string()));
        }
        Ok(())
    }
}

impl StorageBackend for MemBackend {
    fn read_item(&self, uid: &Uuid) -> Result<Option<String>> {
        Ok(self.items.borrow().get(uid).cloned())
    }

    fn write_item(&self, uid: &Uuid, content: &str) -> Result<()> {
        self.check_writable()?;
        self.items.borrow_mut().insert(*uid, content.to_string());
        Ok(())
    }

    fn delete_item(&self, uid: &Uuid) -> Result<bool> {
        Ok(self.items.borrow_mut().remove(uid).is_some())
    }

    fn list_item_ids(&self) -> Result<Vec<Uuid>> {
        Ok(self.items.borrow().keys().copied().collect())
    }

    fn item_path(&self, uid: &Uuid) -> PathBuf {
        PathBuf::from(format!("memory://item-{}", uid))
    }

    fn load_mappings(&self) -> Result<HashMap<Uuid, MappingInfo>> {
        Ok(self.mappings.borrow().clone())
    }

    fn save_mappings(&self, mappings: &HashMap<Uuid, MappingInfo>) -> Result<()> {
        self.check_writable()?;
        *self.mappings.borrow_mut() = mappings.clone();
        Ok(())
    }
}
