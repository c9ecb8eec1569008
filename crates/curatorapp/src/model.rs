//! # Domain Model: Items
//!
//! An [`Item`] is one curated data record (a project, batch, sample, image or
//! observation). Its metadata is an [`AttributeMap`] shaped by the item's
//! [`crate::catalog::ItemSchema`].
//!
//! ## Persistence Unit
//!
//! The whole item, including its nested attribute graph, is the unit of
//! persistence. Items are fetched as a full graph, edited in memory, and
//! replaced wholesale on save. There is no field-level diffing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::attributes::Attribute;
use crate::catalog::ItemSchema;

/// Top-level attributes of an item, keyed by tag.
pub type AttributeMap = BTreeMap<String, Attribute>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemKind {
    Project,
    Batch,
    Sample,
    Image,
    Observation,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Project => "project",
            ItemKind::Batch => "batch",
            ItemKind::Sample => "sample",
            ItemKind::Image => "image",
            ItemKind::Observation => "observation",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "project" => Ok(ItemKind::Project),
            "batch" => Ok(ItemKind::Batch),
            "sample" => Ok(ItemKind::Sample),
            "image" => Ok(ItemKind::Image),
            "observation" => Ok(ItemKind::Observation),
            other => Err(format!("unknown item kind '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub uid: Uuid,
    pub kind: ItemKind,
    pub name: String,
    /// Uid of the item shape in the schema catalog.
    pub schema_uid: Uuid,
    #[serde(default)]
    pub attributes: AttributeMap,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Create an item whose attribute map instantiates every attribute the
    /// shape declares, all empty.
    pub fn new(name: impl Into<String>, shape: &ItemSchema) -> Self {
        let now = Utc::now();
        let attributes = shape
            .attributes
            .iter()
            .map(|schema| (schema.tag.clone(), Attribute::empty(schema)))
            .collect();
        Self {
            uid: Uuid::new_v4(),
            kind: shape.kind,
            name: name.into(),
            schema_uid: shape.uid,
            attributes,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn attribute(&self, tag: &str) -> Option<&Attribute> {
        self.attributes.get(tag)
    }
}
