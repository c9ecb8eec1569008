//! # Schema Catalog
//!
//! The catalog holds every item shape and, through them, every attribute
//! schema of a session. It is loaded once when a session starts, never
//! changes while the session lives, and is passed explicitly to whatever
//! needs it. There is no process-wide schema registry.
//!
//! ## Indexing
//!
//! [`SchemaCatalog::new`] walks every item shape recursively and indexes each
//! nested [`AttributeSchema`] by uid, so attributes can find their schema
//! from `schema_uid` alone. Uids must be unique across the catalog.
//!
//! ## Loading
//!
//! [`CatalogSource`] is the contract for fetching a catalog. The production
//! source is [`JsonCatalogSource`], which reads a JSON file:
//!
//! ```text
//! {
//!   "items": [
//!     { "uid": "...", "kind": "SAMPLE", "displayName": "Sample",
//!       "attributes": [ { "uid": "...", "tag": "tissue", "kind": "STRING", ... } ] }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

use crate::attributes::AttributeSchema;
use crate::error::{CuratorError, IntegrityError, Result};
use crate::model::ItemKind;

/// The attribute shape of one kind of item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSchema {
    pub uid: Uuid,
    pub kind: ItemKind,
    pub display_name: String,
    /// Top-level attributes in declaration order.
    pub attributes: Vec<AttributeSchema>,
}

impl ItemSchema {
    pub fn new(kind: ItemKind, attributes: Vec<AttributeSchema>) -> Self {
        Self {
            uid: Uuid::new_v4(),
            kind,
            display_name: kind.to_string(),
            attributes,
        }
    }

    pub fn attribute(&self, tag: &str) -> Option<&AttributeSchema> {
        self.attributes.iter().find(|s| s.tag == tag)
    }
}

/// On-disk form of a catalog.
#[derive(Serialize, Deserialize)]
pub struct CatalogDocument {
    pub items: Vec<ItemSchema>,
}

/// Immutable, session-scoped set of item and attribute schemas.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "CatalogDocument", into = "CatalogDocument")]
pub struct SchemaCatalog {
    items: Vec<ItemSchema>,
    index: HashMap<Uuid, AttributeSchema>,
}

impl TryFrom<CatalogDocument> for SchemaCatalog {
    type Error = IntegrityError;

    fn try_from(file: CatalogDocument) -> std::result::Result<Self, Self::Error> {
        SchemaCatalog::new(file.items)
    }
}

impl From<SchemaCatalog> for CatalogDocument {
    fn from(catalog: SchemaCatalog) -> Self {
        CatalogDocument {
            items: catalog.items,
        }
    }
}

impl SchemaCatalog {
    pub fn new(items: Vec<ItemSchema>) -> std::result::Result<Self, IntegrityError> {
        let mut index = HashMap::new();
        let mut item_uids = Vec::with_capacity(items.len());

        for item in &items {
            if item_uids.contains(&item.uid) {
                return Err(IntegrityError::DuplicateSchema(item.uid));
            }
            item_uids.push(item.uid);

            let mut pending: Vec<&AttributeSchema> = item.attributes.iter().collect();
            while let Some(schema) = pending.pop() {
                if index.insert(schema.uid, schema.clone()).is_some() {
                    return Err(IntegrityError::DuplicateSchema(schema.uid));
                }
                pending.extend(schema.nested());
            }
        }

        Ok(Self { items, index })
    }

    pub fn item_schemas(&self) -> &[ItemSchema] {
        &self.items
    }

    pub fn item_schema(&self, uid: &Uuid) -> Option<&ItemSchema> {
        self.items.iter().find(|s| s.uid == *uid)
    }

    /// First item shape declared for `kind`.
    pub fn item_schema_for(&self, kind: ItemKind) -> Option<&ItemSchema> {
        self.items.iter().find(|s| s.kind == kind)
    }

    pub fn attribute_schema(&self, uid: &Uuid) -> Option<&AttributeSchema> {
        self.index.get(uid)
    }

    /// Like [`Self::attribute_schema`], but a missing schema is an integrity error.
    pub fn require(&self, uid: &Uuid) -> std::result::Result<&AttributeSchema, IntegrityError> {
        self.attribute_schema(uid)
            .ok_or(IntegrityError::UnknownSchema(*uid))
    }

    pub fn require_item(&self, uid: &Uuid) -> std::result::Result<&ItemSchema, IntegrityError> {
        self.item_schema(uid).ok_or(IntegrityError::UnknownSchema(*uid))
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// Fetches the schema catalog for a session.
pub trait CatalogSource {
    /// Load the complete catalog identified by `root`.
    fn load(&self, root: &str) -> Result<SchemaCatalog>;
}

/// A catalog already in memory serves itself, whatever the root.
impl CatalogSource for SchemaCatalog {
    fn load(&self, _root: &str) -> Result<SchemaCatalog> {
        Ok(self.clone())
    }
}

/// Reads catalogs from JSON files in a directory; `root` is the file name.
pub struct JsonCatalogSource {
    dir: PathBuf,
}

impl JsonCatalogSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self, root: &str) -> PathBuf {
        self.dir.join(root)
    }
}

impl CatalogSource for JsonCatalogSource {
    fn load(&self, root: &str) -> Result<SchemaCatalog> {
        let path = self.path(root);
        if !path.exists() {
            return Err(CuratorError::Config(format!(
                "schema catalog not found at {}",
                path.display()
            )));
        }
        let content = fs::read_to_string(&path).map_err(CuratorError::Io)?;
        let catalog: SchemaCatalog =
            serde_json::from_str(&content).map_err(CuratorError::Serialization)?;
        tracing::debug!(
            path = %path.display(),
            schemas = catalog.len(),
            "loaded schema catalog"
        );
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::SchemaSpec;

    fn sample_shape() -> ItemSchema {
        ItemSchema::new(
            ItemKind::Sample,
            vec![
                AttributeSchema::new("tissue", SchemaSpec::string()),
                AttributeSchema::new(
                    "specimen",
                    SchemaSpec::object(vec![
                        AttributeSchema::new("site", SchemaSpec::string()),
                        AttributeSchema::new(
                            "aliquots",
                            SchemaSpec::list(AttributeSchema::new(
                                "aliquot",
                                SchemaSpec::numeric(None, None, false),
                            )),
                        ),
                    ]),
                ),
            ],
        )
    }

    #[test]
    fn indexes_nested_schemas() {
        let shape = sample_shape();
        let specimen = shape.attribute("specimen").unwrap().clone();
        let aliquots = specimen.child("aliquots").unwrap().clone();
        let aliquot_uid = aliquots.element().unwrap().uid;

        let catalog = SchemaCatalog::new(vec![shape]).unwrap();
        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog.attribute_schema(&specimen.uid).unwrap().tag, "specimen");
        assert_eq!(catalog.require(&aliquot_uid).unwrap().tag, "aliquot");
    }

    #[test]
    fn unknown_schema_is_integrity_error() {
        let catalog = SchemaCatalog::new(vec![sample_shape()]).unwrap();
        let missing = Uuid::new_v4();
        assert_eq!(
            catalog.require(&missing).unwrap_err(),
            IntegrityError::UnknownSchema(missing)
        );
    }

    #[test]
    fn duplicate_uids_are_rejected() {
        let mut shape = sample_shape();
        let dup = shape.attributes[0].clone();
        shape.attributes.push(dup.clone());
        assert_eq!(
            SchemaCatalog::new(vec![shape]).unwrap_err(),
            IntegrityError::DuplicateSchema(dup.uid)
        );
    }

    #[test]
    fn finds_item_shape_by_kind() {
        let catalog = SchemaCatalog::new(vec![sample_shape()]).unwrap();
        assert!(catalog.item_schema_for(ItemKind::Sample).is_some());
        assert!(catalog.item_schema_for(ItemKind::Image).is_none());
    }

    #[test]
    fn json_source_loads_catalog_file() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = SchemaCatalog::new(vec![sample_shape()]).unwrap();
        fs::write(
            dir.path().join("catalog.json"),
            serde_json::to_string_pretty(&catalog).unwrap(),
        )
        .unwrap();

        let loaded = JsonCatalogSource::new(dir.path()).load("catalog.json").unwrap();
        assert_eq!(loaded.len(), catalog.len());
        assert_eq!(loaded.item_schemas(), catalog.item_schemas());
    }

    #[test]
    fn json_source_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonCatalogSource::new(dir.path())
            .load("catalog.json")
            .unwrap_err();
        assert!(matches!(err, CuratorError::Config(_)));
    }
}
