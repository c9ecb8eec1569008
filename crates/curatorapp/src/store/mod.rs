//! # Storage Layer
//!
//! Item persistence for curator. The [`ItemStore`] trait is the whole
//! persistence contract the editing subsystem relies on: it accepts a complete
//! item, including its nested attribute graph, and hands back the saved item.
//! There is no diffing. Callers always submit the whole graph and the store
//! replaces the stored document wholesale.
//!
//! ## Layers
//!
//! ```text
//! ┌──────────────────────────┐
//! │  ItemStore (trait)       │  items, timestamps, reference values
//! │  └── ItemRepo<B>         │
//! └────────────┬─────────────┘
//!              │
//! ┌────────────▼─────────────┐
//! │  StorageBackend (trait)  │  raw documents, atomic writes
//! │  ├── FsBackend           │
//! │  └── MemBackend          │
//! └──────────────────────────┘
//! ```
//!
//! ## Collaborator Lookups
//!
//! The store also answers the two data lookups that rendering needs:
//!
//! - **Reference values**: [`ItemStore::references`] scans stored items for
//!   attribute instances of a schema. Suggestion lists are built from these.
//! - **Mapping records**: [`ItemStore::mapping`] reads `mappings.json`.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: production store, one JSON document per item.
//! - [`memory::InMemoryStore`]: for testing logic without filesystem I/O.
//!
//! ## Storage Layout
//!
//! ```text
//! <data dir>/
//! ├── curator.toml          # Configuration
//! ├── catalog.json          # Schema catalog
//! ├── mappings.json         # Mapping records
//! └── item-{uuid}.json      # One document per item
//! ```

use crate::attributes::{Attribute, ValueRef};
use crate::error::Result;
use crate::lookup::MappingInfo;
use crate::model::Item;
use std::path::PathBuf;
use uuid::Uuid;

pub mod backend;
pub mod fs;
pub mod fs_backend;
pub mod item_store;
pub mod mem_backend;
pub mod memory;

/// Abstract interface for item persistence.
pub trait ItemStore {
    /// Save a whole item (create or replace). Refreshes `updated_at` and
    /// returns the item as stored.
    fn save_item(&mut self, item: &Item) -> Result<Item>;

    /// Get an item by uid.
    fn get_item(&self, uid: &Uuid) -> Result<Item>;

    /// List all stored items.
    fn list_items(&self) -> Result<Vec<Item>>;

    /// Delete an item permanently.
    fn delete_item(&mut self, uid: &Uuid) -> Result<()>;

    /// Get the document path for an item (virtual for in-memory stores).
    fn item_path(&self, uid: &Uuid) -> Result<PathBuf>;

    /// Mapping record by uid.
    fn mapping(&self, mapping_item_uid: &Uuid) -> Result<MappingInfo>;

    /// Create or replace a mapping record.
    fn save_mapping(&mut self, mapping_item_uid: Uuid, info: MappingInfo) -> Result<()>;

    /// Previously recorded instances of `schema_uid` across all stored items.
    fn references(&self, schema_uid: &Uuid) -> Result<Vec<Attribute>> {
        let mut found = Vec::new();
        for item in self.list_items()? {
            for attribute in item.attributes.values() {
                collect_instances(attribute, schema_uid, &mut found);
            }
        }
        Ok(found)
    }
}

/// Depth-first walk over the CURRENT graph below `attribute`.
fn collect_instances(attribute: &Attribute, schema_uid: &Uuid, found: &mut Vec<Attribute>) {
    if attribute.schema_uid == *schema_uid {
        found.push(attribute.clone());
    }
    match attribute.current() {
        Some(ValueRef::Object(children)) => {
            for child in children.values() {
                collect_instances(child, schema_uid, found);
            }
        }
        Some(ValueRef::List(elements)) => {
            for element in elements {
                collect_instances(element, schema_uid, found);
            }
        }
        Some(ValueRef::Union(branch)) => collect_instances(&branch.attribute, schema_uid, found),
        _ => {}
    }
}
