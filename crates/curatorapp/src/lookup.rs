//! # Lookup Collaborators
//!
//! Three lookups live outside this crate: the schema catalog (see
//! [`crate::catalog`]), previously recorded values for suggestion lists, and
//! mapping records for the MAPPED view. The last two are consulted while
//! rendering, and their answers may not be available yet.
//!
//! ## Pending Placeholders
//!
//! Rendering never waits. It asks the [`LookupCache`]; an unanswered
//! question comes back as [`Lookup::Pending`] and is remembered as a pending
//! request. Whoever drives the collaborators (the UI event loop, the CLI)
//! fetches the pending requests, feeds the answers back with the `fulfill_*`
//! methods, and renders again. Lookups never touch the attribute graph, so
//! re-rendering cannot disturb edits already made.
//!
//! The cache uses `RefCell` because rendering holds it by shared reference
//! and the subsystem is single-threaded.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use uuid::Uuid;

use crate::attributes::{Attribute, ValueRef};
use crate::error::Result;

/// Answer of a lookup that may still be outstanding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "lowercase")]
pub enum Lookup<T> {
    Pending,
    Ready(T),
}

impl<T> Lookup<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Lookup::Pending)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Lookup::Ready(v) => Some(v),
            Lookup::Pending => None,
        }
    }
}

/// The mapping record behind a mapped value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingInfo {
    pub expression: String,
    pub mapper_name: String,
}

/// Previously recorded attribute instances of a schema.
pub trait ReferenceValueLookup {
    fn references(&self, schema_uid: &Uuid) -> Result<Vec<Attribute>>;
}

/// Mapping records by uid.
pub trait MappingLookup {
    fn mapping(&self, mapping_item_uid: &Uuid) -> Result<MappingInfo>;
}

impl<F> ReferenceValueLookup for F
where
    F: Fn(&Uuid) -> Result<Vec<Attribute>>,
{
    fn references(&self, schema_uid: &Uuid) -> Result<Vec<Attribute>> {
        self(schema_uid)
    }
}

impl MappingLookup for HashMap<Uuid, MappingInfo> {
    fn mapping(&self, mapping_item_uid: &Uuid) -> Result<MappingInfo> {
        self.get(mapping_item_uid).cloned().ok_or_else(|| {
            crate::error::CuratorError::Store(format!("mapping {} not found", mapping_item_uid))
        })
    }
}

/// Answers received so far; `None` marks a request still outstanding.
#[derive(Debug, Default)]
pub struct LookupCache {
    suggestions: RefCell<HashMap<Uuid, Option<Vec<String>>>>,
    mappings: RefCell<HashMap<Uuid, Option<MappingInfo>>>,
}

impl LookupCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Suggestions for leaves of `schema_uid`, registering a request if unseen.
    pub fn suggestions(&self, schema_uid: &Uuid) -> Lookup<Vec<String>> {
        let mut suggestions = self.suggestions.borrow_mut();
        match suggestions.entry(*schema_uid).or_insert(None) {
            Some(values) => Lookup::Ready(values.clone()),
            None => Lookup::Pending,
        }
    }

    /// Mapping record for `mapping_item_uid`, registering a request if unseen.
    pub fn mapping(&self, mapping_item_uid: &Uuid) -> Lookup<MappingInfo> {
        let mut mappings = self.mappings.borrow_mut();
        match mappings.entry(*mapping_item_uid).or_insert(None) {
            Some(info) => Lookup::Ready(info.clone()),
            None => Lookup::Pending,
        }
    }

    pub fn pending_suggestions(&self) -> Vec<Uuid> {
        pending_keys(&self.suggestions.borrow())
    }

    pub fn pending_mappings(&self) -> Vec<Uuid> {
        pending_keys(&self.mappings.borrow())
    }

    pub fn has_pending(&self) -> bool {
        !self.pending_suggestions().is_empty() || !self.pending_mappings().is_empty()
    }

    /// Record the instances returned for `schema_uid`.
    ///
    /// Suggestions are the distinct current text values of the instances,
    /// sorted.
    pub fn fulfill_suggestions(&self, schema_uid: &Uuid, instances: &[Attribute]) {
        let values: BTreeSet<String> = instances
            .iter()
            .filter_map(|attr| match attr.current() {
                Some(ValueRef::String(s)) | Some(ValueRef::Enum(s)) if !s.is_empty() => {
                    Some(s.to_string())
                }
                _ => None,
            })
            .collect();
        self.suggestions
            .borrow_mut()
            .insert(*schema_uid, Some(values.into_iter().collect()));
    }

    pub fn fulfill_mapping(&self, mapping_item_uid: &Uuid, info: MappingInfo) {
        self.mappings
            .borrow_mut()
            .insert(*mapping_item_uid, Some(info));
    }

    /// Ask the collaborators for every outstanding request.
    ///
    /// A failing lookup stays pending and is retried on the next call.
    /// Returns how many requests were answered.
    pub fn resolve_pending(
        &self,
        references: &dyn ReferenceValueLookup,
        mappings: &dyn MappingLookup,
    ) -> usize {
        let mut answered = 0;
        for schema_uid in self.pending_suggestions() {
            match references.references(&schema_uid) {
                Ok(instances) => {
                    self.fulfill_suggestions(&schema_uid, &instances);
                    answered += 1;
                }
                Err(e) => tracing::warn!(%schema_uid, error = %e, "reference lookup failed"),
            }
        }
        for mapping_uid in self.pending_mappings() {
            match mappings.mapping(&mapping_uid) {
                Ok(info) => {
                    self.fulfill_mapping(&mapping_uid, info);
                    answered += 1;
                }
                Err(e) => tracing::warn!(%mapping_uid, error = %e, "mapping lookup failed"),
            }
        }
        answered
    }

    /// Forget every answer, e.g. after the underlying records changed.
    pub fn clear(&self) {
        self.suggestions.borrow_mut().clear();
        self.mappings.borrow_mut().clear();
    }
}

fn pending_keys<T>(map: &HashMap<Uuid, Option<T>>) -> Vec<Uuid> {
    let mut keys: Vec<Uuid> = map
        .iter()
        .filter(|(_, v)| v.is_none())
        .map(|(k, _)| *k)
        .collect();
    keys.sort();
    keys
}
