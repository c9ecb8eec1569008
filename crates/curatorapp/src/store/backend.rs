use crate::error::Result;
use crate::lookup::MappingInfo;
use std::collections::HashMap;
use std::path::PathBuf;
use uuid::Uuid;

/// Abstract interface for raw storage I/O.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while ItemRepo handles the "what" (serialization, timestamps, lookups).
pub trait StorageBackend {
    // --- Item Documents ---

    /// Read the raw JSON document of an item.
    /// Returns Ok(None) if no document exists for `uid`.
    fn read_item(&self, uid: &Uuid) -> Result<Option<String>>;

    /// Write an item document.
    /// MUST be atomic (e.g. write to tmp then rename) so a crash never
    /// leaves half an item behind.
    fn write_item(&self, uid: &Uuid, content: &str) -> Result<()>;

    /// Delete an item document. Returns false if there was nothing to delete.
    fn delete_item(&self, uid: &Uuid) -> Result<bool>;

    /// Uids of every stored item document.
    fn list_item_ids(&self) -> Result<Vec<Uuid>>;

    /// Where the document for `uid` lives. Virtual for in-memory storage.
    fn item_path(&self, uid: &Uuid) -> PathBuf;

    // --- Mapping Records ---

    /// Load the mapping records (mappings.json). Missing file = no records.
    fn load_mappings(&self) -> Result<HashMap<Uuid, MappingInfo>>;

    /// Save the mapping records.
    fn save_mappings(&self, mappings: &HashMap<Uuid, MappingInfo>) -> Result<()>;
}
