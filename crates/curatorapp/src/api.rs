//! # API Facade
//!
//! The API is the single entry point for every UI client (the CLI, a web
//! front end, tests). It loads items into [`EditSession`]s, saves sessions
//! back, and answers the collaborator lookups from the store.
//!
//! ## What the API Does NOT Do
//!
//! - **Editing logic**: that belongs to the session, navigation and dispatch.
//! - **Presentation**: it returns view trees and validity reports, not text.
//!
//! ## Item Selectors
//!
//! UIs address items the way users type them. [`CuratorApi::resolve_item`]
//! accepts, in order of precedence:
//!
//! - a **uuid**: `3f2b...`
//! - a **display index**: `1`, `2`, ... into [`CuratorApi::list_items`] order
//! - an exact **name**: `S-001`
//!
//! ## The Save Boundary
//!
//! [`CuratorApi::save_session`] is the one place a validation failure
//! becomes an error. It commits every draft, validates the whole item and
//! refuses to persist while anything is invalid. A successful save replaces
//! the stored item wholesale and rebases the session on the saved copy.
//!
//! ## Generic Over ItemStore
//!
//! `CuratorApi<S: ItemStore>` is generic over the storage backend:
//! - Production: `CuratorApi<FileStore>`
//! - Testing: `CuratorApi<InMemoryStore>`

use std::rc::Rc;
use uuid::Uuid;

use crate::attributes::{Attribute, ViewMode};
use crate::catalog::SchemaCatalog;
use crate::error::{CuratorError, Result};
use crate::lookup::{MappingInfo, MappingLookup};
use crate::model::{Item, ItemKind};
use crate::session::{EditSession, SessionOptions};
use crate::store::ItemStore;
use crate::validity::{self, Validity};

/// Behaviour the API applies to every session it opens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApiOptions {
    pub default_view_mode: ViewMode,
    pub session: SessionOptions,
}

pub struct CuratorApi<S: ItemStore> {
    store: S,
    catalog: Rc<SchemaCatalog>,
    options: ApiOptions,
}

/// Mapping records read straight from the store.
struct StoreMappings<'a, S: ItemStore>(&'a S);

impl<S: ItemStore> MappingLookup for StoreMappings<'_, S> {
    fn mapping(&self, mapping_item_uid: &Uuid) -> Result<MappingInfo> {
        self.0.mapping(mapping_item_uid)
    }
}

impl<S: ItemStore> CuratorApi<S> {
    pub fn new(store: S, catalog: SchemaCatalog, options: ApiOptions) -> Self {
        Self {
            store,
            catalog: Rc::new(catalog),
            options,
        }
    }

    pub fn catalog(&self) -> &SchemaCatalog {
        &self.catalog
    }

    pub fn options(&self) -> ApiOptions {
        self.options
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Stored items, ordered by name then creation time.
    pub fn list_items(&self) -> Result<Vec<Item>> {
        let mut items = self.store.list_items()?;
        items.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        Ok(items)
    }

    pub fn get_item(&self, uid: &Uuid) -> Result<Item> {
        self.store.get_item(uid)
    }

    /// Turn a user-typed selector into an item uid.
    pub fn resolve_item(&self, selector: &str) -> Result<Uuid> {
        let selector = selector.trim();
        if let Ok(uid) = Uuid::parse_str(selector) {
            return Ok(uid);
        }
        let items = self.list_items()?;
        if let Ok(index) = selector.parse::<usize>() {
            if let Some(item) = index.checked_sub(1).and_then(|i| items.get(i)) {
                return Ok(item.uid);
            }
        }
        let mut named = items.iter().filter(|item| item.name == selector);
        match (named.next(), named.next()) {
            (Some(item), None) => Ok(item.uid),
            (Some(_), Some(_)) => Err(CuratorError::InvalidPath(format!(
                "more than one item is named '{}'",
                selector
            ))),
            (None, _) => Err(CuratorError::InvalidPath(format!(
                "no item matches '{}'",
                selector
            ))),
        }
    }

    /// Create and store an empty item of `kind`.
    pub fn create_item(&mut self, kind: ItemKind, name: &str) -> Result<Item> {
        let shape = self.catalog.item_schema_for(kind).ok_or_else(|| {
            CuratorError::Config(format!("the schema catalog has no shape for {} items", kind))
        })?;
        let item = Item::new(name, shape);
        let saved = self.store.save_item(&item)?;
        tracing::info!(item = %saved.uid, %kind, name, "created item");
        Ok(saved)
    }

    pub fn delete_item(&mut self, uid: &Uuid) -> Result<()> {
        self.store.delete_item(uid)?;
        tracing::info!(item = %uid, "deleted item");
        Ok(())
    }

    /// Load an item into a fresh edit session.
    pub fn open_session(&self, uid: &Uuid) -> Result<EditSession> {
        let item = self.store.get_item(uid)?;
        EditSession::new(Rc::clone(&self.catalog), item, self.options.session)
    }

    /// Commit, validate and persist a session's item.
    ///
    /// While the item is invalid nothing is written and the validity report
    /// comes back as [`CuratorError::ValidationFailed`]; the session keeps
    /// its edits.
    pub fn save_session(&mut self, session: &mut EditSession) -> Result<Item> {
        session.commit()?;
        let validity = session.validate()?;
        if !validity.is_valid() {
            tracing::warn!(
                item = %session.item().uid,
                invalid = validity.offending().len(),
                "save blocked by invalid fields"
            );
            return Err(CuratorError::ValidationFailed(validity));
        }

        let saved = self.store.save_item(session.item())?;
        tracing::info!(item = %saved.uid, name = %saved.name, "saved item");
        session.rebase(saved.clone());
        Ok(saved)
    }

    /// Validity of a stored item.
    pub fn validate_item(&self, uid: &Uuid) -> Result<Validity> {
        let item = self.store.get_item(uid)?;
        let shape = self.catalog.require_item(&item.schema_uid)?;
        Ok(validity::validate_item(shape, &item)?)
    }

    /// Answer a session's outstanding lookups from the store.
    pub fn resolve_lookups(&self, session: &EditSession) -> usize {
        let references = |schema_uid: &Uuid| -> Result<Vec<Attribute>> {
            self.store.references(schema_uid)
        };
        session.resolve_lookups(&references, &StoreMappings(&self.store))
    }

    pub fn save_mapping(&mut self, mapping_item_uid: Uuid, info: MappingInfo) -> Result<()> {
        self.store.save_mapping(mapping_item_uid, info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{LeafValue, ValueRef};
    use crate::dispatch::ViewBody;
    use crate::lookup::Lookup;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::InMemoryStore;

    fn api_with(fixture: StoreFixture, options: ApiOptions) -> CuratorApi<InMemoryStore> {
        CuratorApi::new(fixture.store, fixture.catalog, options)
    }

    fn api(fixture: StoreFixture) -> CuratorApi<InMemoryStore> {
        api_with(fixture, ApiOptions::default())
    }

    #[test]
    fn test_list_items_sorted_by_name() {
        let api = api(StoreFixture::new()
            .with_sample("S-002")
            .with_project("P-1")
            .with_sample("S-001"));
        let names: Vec<_> = api
            .list_items()
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["P-1", "S-001", "S-002"]);
    }

    #[test]
    fn test_resolve_item_selectors() {
        let api = api(StoreFixture::new().with_sample("S-001").with_sample("S-002"));
        let items = api.list_items().unwrap();

        assert_eq!(api.resolve_item("2").unwrap(), items[1].uid);
        assert_eq!(api.resolve_item("S-001").unwrap(), items[0].uid);
        assert_eq!(
            api.resolve_item(&items[1].uid.to_string()).unwrap(),
            items[1].uid
        );
        assert!(api.resolve_item("0").is_err());
        assert!(api.resolve_item("S-404").is_err());
    }

    #[test]
    fn test_resolve_item_rejects_ambiguous_name() {
        let api = api(StoreFixture::new().with_sample("S-001").with_sample("S-001"));
        assert!(matches!(
            api.resolve_item("S-001"),
            Err(CuratorError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_create_item_uses_item_shape() {
        let mut api = api(StoreFixture::new());
        let item = api.create_item(ItemKind::Project, "P-9").unwrap();
        assert_eq!(item.kind, ItemKind::Project);
        assert!(item.attribute("title").is_some());
        assert_eq!(api.list_items().unwrap().len(), 1);

        // A new project has an empty, required title.
        assert!(!api.validate_item(&item.uid).unwrap().is_valid());
        assert!(matches!(
            api.create_item(ItemKind::Image, "I-1"),
            Err(CuratorError::Config(_))
        ));
    }

    #[test]
    fn test_save_session_persists_whole_item() {
        let fixture = StoreFixture::new().with_sample("S-001");
        let uid = fixture.item_named("S-001").uid;
        let mut api = api(fixture);

        let mut session = api.open_session(&uid).unwrap();
        session.open_segment("specimen").unwrap();
        session.set_leaf_text("site", "liver").unwrap();
        let saved = api.save_session(&mut session).unwrap();

        let stored = api.get_item(&uid).unwrap();
        assert_eq!(stored, saved);
        let Some(ValueRef::Object(children)) = stored.attributes["specimen"].current() else {
            panic!("Expected object");
        };
        assert_eq!(children["site"].current(), Some(ValueRef::String("liver")));
        assert!(!session.is_dirty());
        assert_eq!(session.navigator().depth(), 1);
    }

    #[test]
    fn test_save_session_blocked_while_invalid() {
        let fixture = StoreFixture::new().with_sample("S-001");
        let uid = fixture.item_named("S-001").uid;
        let mut api = api(fixture);

        let mut session = api.open_session(&uid).unwrap();
        session
            .set_leaf("passage", Some(LeafValue::Numeric(15.0)))
            .unwrap();
        session.set_leaf_text("tissue", "").unwrap();

        match api.save_session(&mut session) {
            Err(CuratorError::ValidationFailed(validity)) => {
                let tags: Vec<_> = validity.offending().iter().map(|v| v.tag.clone()).collect();
                assert_eq!(tags, vec!["tissue", "passage"]);
            }
            other => panic!("Expected ValidationFailed, got {:?}", other),
        }
        // Nothing was written and the edits are still there.
        let stored = api.get_item(&uid).unwrap();
        assert_eq!(
            stored.attributes["tissue"].current(),
            Some(ValueRef::String("biopsy"))
        );
        assert!(session.is_dirty());
    }

    #[test]
    fn test_open_session_not_found() {
        let api = api(StoreFixture::new());
        assert!(matches!(
            api.open_session(&Uuid::new_v4()),
            Err(CuratorError::ItemNotFound(_))
        ));
    }

    #[test]
    fn test_session_options_flow_into_sessions() {
        let fixture = StoreFixture::new().with_sample("S-001");
        let uid = fixture.item_named("S-001").uid;
        let options = ApiOptions {
            default_view_mode: ViewMode::Original,
            session: SessionOptions {
                editable: true,
                allow_list_removal: true,
            },
        };
        let api = api_with(fixture, options);
        let session = api.open_session(&uid).unwrap();
        assert!(session.options().allow_list_removal);
        assert_eq!(api.options().default_view_mode, ViewMode::Original);
    }

    #[test]
    fn test_resolve_lookups_from_store() {
        let mapping_uid = Uuid::new_v4();
        let fixture = StoreFixture::new()
            .with_sample("S-001")
            .with_sample("S-002")
            .with_mapping(mapping_uid, "normalize(tissue)", "tissue-mapper");
        let uid = fixture.item_named("S-001").uid;
        let mut api = api(fixture);

        // Record a mapping on tissue and store it.
        let mut item = api.get_item(&uid).unwrap();
        let tissue = item.attributes["tissue"]
            .with_mapping("Biopsy ", LeafValue::String("biopsy".into()), Some(mapping_uid))
            .unwrap();
        item.attributes.insert("tissue".into(), tissue);
        let mut session = EditSession::new(
            Rc::clone(&api.catalog),
            item,
            SessionOptions::default(),
        )
        .unwrap();
        api.save_session(&mut session).unwrap();

        let session = api.open_session(&uid).unwrap();
        let view = session.view(ViewMode::Mapped).unwrap();
        let tissue = view.body.iter().find(|v| v.tag == "tissue").unwrap();
        assert_eq!(tissue.mapping, Some(Lookup::Pending));
        let view = session.view(ViewMode::Current).unwrap();
        assert!(view.pending_lookups);

        // One mapping plus suggestions for tissue, notes and site.
        assert_eq!(api.resolve_lookups(&session), 4);

        let view = session.view(ViewMode::Mapped).unwrap();
        let tissue = view.body.iter().find(|v| v.tag == "tissue").unwrap();
        assert_eq!(
            tissue.mapping.as_ref().and_then(|m| m.ready()).map(|m| m.mapper_name.as_str()),
            Some("tissue-mapper")
        );
        let view = session.view(ViewMode::Current).unwrap();
        let tissue = view.body.iter().find(|v| v.tag == "tissue").unwrap();
        let ViewBody::Leaf {
            hint: crate::dispatch::LeafHint::Text { suggestions, .. },
            ..
        } = &tissue.body
        else {
            panic!("Expected text leaf");
        };
        assert_eq!(
            suggestions.as_ref().and_then(|s| s.ready()).cloned(),
            Some(vec!["biopsy".to_string()])
        );
    }
}
