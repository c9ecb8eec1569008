//! # Edit Sessions
//!
//! An [`EditSession`] is the one open editor for one item. It owns:
//!
//! - the **working copy** of the item, edited in memory,
//! - the **baseline**, the item as last loaded or saved,
//! - the [`Navigator`] with its per-frame drafts,
//! - a [`LookupCache`] for suggestions and mapping records.
//!
//! The session is the Item-level handler: every edit funnels through
//! [`EditSession::update`] (or the navigator's commit) and ends in the
//! working copy's attribute map. Nothing reaches storage until the API saves
//! the session, which replaces the whole item.
//!
//! ## Edit Targets
//!
//! The convenience editors (`set_leaf`, `append_element`, ...) take a tag and
//! resolve it against what is currently visible:
//!
//! 1. The focused attribute itself, when `tag` is its own tag.
//! 2. Otherwise a child of the focus: an OBJECT child by tag, or the active
//!    branch of a UNION when the branch's tag matches.
//! 3. At the root view, an item attribute by tag.
//!
//! Edits inside frames land in drafts and stay uncommitted until
//! [`EditSession::commit`]. Saving commits first.

use serde::Serialize;
use std::rc::Rc;
use uuid::Uuid;

use crate::attributes::{Attribute, AttributeSchema, AttributeValueKind, LeafValue, ViewMode};
use crate::catalog::{ItemSchema, SchemaCatalog};
use crate::dispatch::{self, AttributeView, RenderContext};
use crate::error::{CuratorError, Result};
use crate::lookup::{LookupCache, MappingLookup, ReferenceValueLookup};
use crate::model::Item;
use crate::navigation::{self, Breadcrumb, Frame, Navigator, PathStep};
use crate::validity::{self, Validity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Whether the session accepts edits at all.
    pub editable: bool,
    /// Whether list elements may be removed. Lists are append-only otherwise.
    pub allow_list_removal: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            editable: true,
            allow_list_removal: false,
        }
    }
}

/// What the UI shows for the current navigation state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub mode: ViewMode,
    pub breadcrumbs: Vec<Breadcrumb>,
    /// Item attributes at the root view, the focused attribute otherwise.
    pub body: Vec<AttributeView>,
    /// Some lookup is still outstanding; render again once resolved.
    pub pending_lookups: bool,
}

enum Target {
    Focus,
    Child(String),
}

pub struct EditSession {
    catalog: Rc<SchemaCatalog>,
    item: Item,
    baseline: Item,
    navigator: Navigator,
    lookups: LookupCache,
    options: SessionOptions,
}

impl EditSession {
    /// Open a session on `item`.
    ///
    /// Fails with a data-integrity error if the item's graph does not match
    /// its shape.
    pub fn new(catalog: Rc<SchemaCatalog>, item: Item, options: SessionOptions) -> Result<Self> {
        let shape = catalog.require_item(&item.schema_uid)?;
        validity::validate_item(shape, &item)?;
        tracing::debug!(item = %item.uid, name = %item.name, "opened edit session");
        Ok(Self {
            baseline: item.clone(),
            catalog,
            item,
            navigator: Navigator::new(),
            lookups: LookupCache::new(),
            options,
        })
    }

    pub fn item(&self) -> &Item {
        &self.item
    }

    pub fn baseline(&self) -> &Item {
        &self.baseline
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn lookups(&self) -> &LookupCache {
        &self.lookups
    }

    pub fn options(&self) -> SessionOptions {
        self.options
    }

    pub fn catalog(&self) -> &SchemaCatalog {
        &self.catalog
    }

    pub fn shape(&self) -> Result<&ItemSchema> {
        Ok(self.catalog.require_item(&self.item.schema_uid)?)
    }

    // --- Viewing ---

    pub fn view(&self, mode: ViewMode) -> Result<SessionView> {
        let ctx = RenderContext::new(mode, self.options.editable, &self.lookups);
        let body = match self.navigator.focus() {
            None => dispatch::render_item(self.shape()?, &self.item, &ctx)?,
            Some(frame) => {
                let schema = self.catalog.require(&frame.schema_uid)?;
                let editable = ctx.editable && !self.inside_read_only();
                let ctx = RenderContext::new(mode, editable, &self.lookups);
                vec![dispatch::render(schema, frame.draft(), &ctx)?]
            }
        };
        Ok(SessionView {
            mode,
            breadcrumbs: self.navigator.breadcrumbs(),
            body,
            pending_lookups: self.lookups.has_pending(),
        })
    }

    /// Answer outstanding lookups. Returns how many were answered.
    pub fn resolve_lookups(
        &self,
        references: &dyn ReferenceValueLookup,
        mappings: &dyn MappingLookup,
    ) -> usize {
        self.lookups.resolve_pending(references, mappings)
    }

    // --- Navigation ---

    pub fn open(&mut self, step: PathStep) -> Result<&Frame> {
        let catalog = Rc::clone(&self.catalog);
        let shape = catalog.require_item(&self.item.schema_uid)?;
        self.navigator
            .open(&catalog, shape, &self.item.attributes, step)
    }

    /// Open the child a user-typed segment names at the focus.
    pub fn open_segment(&mut self, segment: &str) -> Result<&Frame> {
        let catalog = Rc::clone(&self.catalog);
        let shape = catalog.require_item(&self.item.schema_uid)?;
        let step = self.navigator.step_for(&catalog, shape, segment)?;
        self.navigator
            .open(&catalog, shape, &self.item.attributes, step)
    }

    /// Open each `/`-separated segment of `path` in turn.
    pub fn open_path(&mut self, path: &str) -> Result<()> {
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            self.open_segment(segment)?;
        }
        Ok(())
    }

    pub fn close(&mut self, uid: Option<&Uuid>) {
        self.navigator.close(uid);
    }

    // --- Editing ---

    /// The single mutation entry: merge an edited attribute into the focus,
    /// or into the item map at the root.
    pub fn update(&mut self, tag: &str, attribute: Attribute) -> Result<()> {
        self.ensure_session_editable()?;
        let catalog = Rc::clone(&self.catalog);
        let shape = catalog.require_item(&self.item.schema_uid)?;
        self.navigator
            .update(&catalog, shape, &mut self.item.attributes, tag, attribute)
    }

    /// Replace the focused attribute and fold every draft into the item.
    pub fn commit_edit(&mut self, value: Attribute) -> Result<()> {
        self.ensure_session_editable()?;
        let catalog = Rc::clone(&self.catalog);
        let shape = catalog.require_item(&self.item.schema_uid)?;
        self.navigator
            .commit_edit(&catalog, shape, &mut self.item.attributes, value)
    }

    /// Fold every draft into the item.
    pub fn commit(&mut self) -> Result<()> {
        let catalog = Rc::clone(&self.catalog);
        let shape = catalog.require_item(&self.item.schema_uid)?;
        self.navigator
            .commit(&catalog, shape, &mut self.item.attributes)
    }

    /// Set, or with `None` revert, the updated value of the leaf `tag`.
    pub fn set_leaf(&mut self, tag: &str, value: Option<LeafValue>) -> Result<()> {
        let catalog = Rc::clone(&self.catalog);
        let (schema, attribute, target) = self.target(&catalog, tag)?;
        self.ensure_editable(schema)?;
        let edited = dispatch::set_leaf(schema, &attribute, value)?;
        self.apply(target, tag, edited)
    }

    /// Parse `input` for the kind of leaf `tag` and set it.
    pub fn set_leaf_text(&mut self, tag: &str, input: &str) -> Result<()> {
        let catalog = Rc::clone(&self.catalog);
        let (schema, _, _) = self.target(&catalog, tag)?;
        let kind = schema.kind();
        if kind.is_composite() {
            return Err(CuratorError::InvalidPath(format!(
                "'{}' is a {} attribute and has no value of its own",
                tag, kind
            )));
        }
        let value = LeafValue::parse(kind, input).ok_or_else(|| {
            CuratorError::InvalidValue(format!("'{}' is not a valid {} value", input, kind))
        })?;
        self.set_leaf(tag, Some(value))
    }

    /// Append an empty element to the list `tag`. Returns its uid.
    pub fn append_element(&mut self, tag: &str) -> Result<Uuid> {
        let catalog = Rc::clone(&self.catalog);
        let (schema, attribute, target) = self.target(&catalog, tag)?;
        self.ensure_editable(schema)?;
        let (edited, uid) = dispatch::new_element(schema, &attribute)?;
        self.apply(target, tag, edited)?;
        Ok(uid)
    }

    /// Remove element `uid` from the list `tag`, if removal is allowed.
    pub fn remove_element(&mut self, tag: &str, uid: &Uuid) -> Result<()> {
        if !self.options.allow_list_removal {
            return Err(CuratorError::PolicyViolation(
                "list elements cannot be removed".to_string(),
            ));
        }
        let catalog = Rc::clone(&self.catalog);
        let (schema, attribute, target) = self.target(&catalog, tag)?;
        self.ensure_editable(schema)?;
        if self
            .navigator
            .frames()
            .iter()
            .any(|f| f.step == PathStep::Element(*uid))
        {
            return Err(CuratorError::PolicyViolation(format!(
                "element {} is open; close it before removing it",
                uid
            )));
        }
        let edited = dispatch::remove_element(schema, &attribute, uid)?;
        self.apply(target, tag, edited)
    }

    /// Select the branch `branch_tag` of the union `tag`.
    pub fn select_branch(&mut self, tag: &str, branch_tag: &str) -> Result<()> {
        let catalog = Rc::clone(&self.catalog);
        let (schema, attribute, target) = self.target(&catalog, tag)?;
        if schema.kind() != AttributeValueKind::Union {
            return Err(CuratorError::InvalidPath(format!(
                "'{}' is a {} attribute, not {}",
                tag,
                schema.kind(),
                AttributeValueKind::Union
            )));
        }
        self.ensure_editable(schema)?;
        let branch = schema
            .nested()
            .into_iter()
            .find(|s| s.tag == branch_tag)
            .ok_or_else(|| {
                CuratorError::InvalidPath(format!("union '{}' has no branch '{}'", tag, branch_tag))
            })?;
        let edited = dispatch::select_branch(schema, &attribute, &branch.uid)?;
        self.apply(target, tag, edited)
    }

    // --- State ---

    /// The item as it would be saved: the working copy with every draft
    /// folded in.
    pub fn projected(&self) -> Result<Item> {
        let shape = self.shape()?;
        let mut item = self.item.clone();
        let mut navigator = self.navigator.clone();
        navigator.commit(&self.catalog, shape, &mut item.attributes)?;
        Ok(item)
    }

    /// Validity of the projected item.
    pub fn validate(&self) -> Result<Validity> {
        let item = self.projected()?;
        Ok(validity::validate_item(self.shape()?, &item)?)
    }

    pub fn is_valid(&self) -> Result<bool> {
        Ok(self.validate()?.is_valid())
    }

    /// Whether anything, committed or drafted, differs from the baseline.
    pub fn is_dirty(&self) -> bool {
        match self.projected() {
            Ok(item) => item.attributes != self.baseline.attributes,
            Err(_) => true,
        }
    }

    /// Drop every edit and return to the root view.
    pub fn discard(&mut self) {
        self.item = self.baseline.clone();
        self.navigator.close(None);
        tracing::debug!(item = %self.item.uid, "discarded edits");
    }

    /// Adopt `saved` as both working copy and baseline, re-opening the
    /// current path where it still exists.
    pub fn rebase(&mut self, saved: Item) {
        let path = self.navigator.path();
        self.baseline = saved.clone();
        self.item = saved;
        self.navigator = Navigator::new();
        self.lookups.clear();

        let catalog = Rc::clone(&self.catalog);
        let reopened = catalog
            .require_item(&self.item.schema_uid)
            .map_err(CuratorError::from)
            .and_then(|shape| {
                self.navigator
                    .open_path(&catalog, shape, &self.item.attributes, path)
            });
        if let Err(e) = reopened {
            tracing::debug!(error = %e, "path no longer exists after rebase, returning home");
            self.navigator.close(None);
        }
    }

    // --- Internals ---

    /// Resolve `tag` to the attribute an edit applies to.
    fn target<'c>(
        &self,
        catalog: &'c SchemaCatalog,
        tag: &str,
    ) -> Result<(&'c AttributeSchema, Attribute, Target)> {
        let Some(frame) = self.navigator.focus() else {
            let shape = catalog.require_item(&self.item.schema_uid)?;
            let schema = shape.attribute(tag).ok_or_else(|| {
                CuratorError::InvalidPath(format!(
                    "{} has no attribute '{}'",
                    shape.display_name, tag
                ))
            })?;
            let attribute = self.item.attributes.get(tag).ok_or_else(|| {
                CuratorError::InvalidPath(format!("attribute '{}' has no value", tag))
            })?;
            return Ok((schema, attribute.clone(), Target::Child(tag.to_string())));
        };

        let schema = catalog.require(&frame.schema_uid)?;
        if schema.tag == tag {
            return Ok((schema, frame.draft().clone(), Target::Focus));
        }
        let step = match schema.kind() {
            AttributeValueKind::Object => PathStep::Field(tag.to_string()),
            AttributeValueKind::Union => PathStep::Branch,
            kind => {
                return Err(CuratorError::InvalidPath(format!(
                    "{} attribute '{}' has no child '{}'",
                    kind, schema.tag, tag
                )))
            }
        };
        let (child_schema, child) = navigation::child_at(schema, frame.draft(), &step)?;
        if child_schema.tag != tag {
            return Err(CuratorError::InvalidPath(format!(
                "'{}' is not the active branch of '{}'",
                tag, schema.tag
            )));
        }
        let (child_uid, child) = (child_schema.uid, child.clone());
        Ok((catalog.require(&child_uid)?, child, Target::Child(tag.to_string())))
    }

    fn apply(&mut self, target: Target, tag: &str, edited: Attribute) -> Result<()> {
        match target {
            Target::Focus => {
                self.navigator.replace_focus(&self.catalog, edited)?;
                tracing::debug!(tag, "replaced focused draft");
                Ok(())
            }
            Target::Child(child_tag) => self.update(&child_tag, edited),
        }
    }

    fn ensure_session_editable(&self) -> Result<()> {
        if !self.options.editable {
            return Err(CuratorError::PolicyViolation(
                "this session is read-only".to_string(),
            ));
        }
        Ok(())
    }

    fn ensure_editable(&self, schema: &AttributeSchema) -> Result<()> {
        self.ensure_session_editable()?;
        if schema.read_only || self.inside_read_only() {
            return Err(CuratorError::PolicyViolation(format!(
                "'{}' is read-only",
                schema.tag
            )));
        }
        Ok(())
    }

    /// Some open frame is read-only, which makes everything under it so.
    fn inside_read_only(&self) -> bool {
        self.navigator.frames().iter().any(|frame| {
            self.catalog
                .attribute_schema(&frame.schema_uid)
                .is_some_and(|s| s.read_only)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::ValueRef;
    use crate::dispatch::ViewBody;
    use crate::lookup::{Lookup, MappingInfo};
    use crate::test_utils;
    use std::collections::HashMap;

    fn session_with(options: SessionOptions) -> EditSession {
        let catalog = Rc::new(test_utils::sample_catalog());
        let item = test_utils::sample_item(&catalog, "S-001");
        EditSession::new(catalog, item, options).unwrap()
    }

    fn session() -> EditSession {
        session_with(SessionOptions::default())
    }

    fn object_child<'a>(attr: &'a Attribute, tag: &str) -> &'a Attribute {
        let Some(ValueRef::Object(children)) = attr.current() else {
            panic!("Expected object");
        };
        &children[tag]
    }

    fn no_lookups(_: &Uuid) -> Result<Vec<Attribute>> {
        Ok(Vec::new())
    }

    #[test]
    fn test_new_rejects_broken_graph() {
        let catalog = Rc::new(test_utils::sample_catalog());
        let mut item = test_utils::sample_item(&catalog, "S-001");
        item.attributes.remove("tissue");
        assert!(matches!(
            EditSession::new(catalog, item, SessionOptions::default()),
            Err(CuratorError::DataIntegrity(_))
        ));
    }

    #[test]
    fn test_set_leaf_at_root() {
        let mut session = session();
        assert!(!session.is_dirty());
        session.set_leaf_text("tissue", "resection").unwrap();
        assert_eq!(
            session.item().attributes["tissue"].current(),
            Some(ValueRef::String("resection"))
        );
        assert!(session.is_dirty());
        assert!(session.is_valid().unwrap());
    }

    #[test]
    fn test_set_leaf_text_rejects_unparsable_input() {
        let mut session = session();
        assert!(matches!(
            session.set_leaf_text("passage", "three"),
            Err(CuratorError::InvalidValue(_))
        ));
        assert!(matches!(
            session.set_leaf_text("specimen", "x"),
            Err(CuratorError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_empty_required_string_is_invalid_but_editable() {
        let mut session = session();
        session.set_leaf_text("tissue", "").unwrap();
        let validity = session.validate().unwrap();
        assert!(!validity.is_valid());
        let offending: Vec<_> = validity.offending().iter().map(|v| v.tag.clone()).collect();
        assert_eq!(offending, vec!["tissue"]);

        session.set_leaf_text("tissue", "biopsy").unwrap();
        assert!(session.is_valid().unwrap());
    }

    #[test]
    fn test_read_only_attribute_rejects_edits() {
        let mut session = session();
        assert!(matches!(
            session.set_leaf_text("batch", "B-8"),
            Err(CuratorError::PolicyViolation(_))
        ));
    }

    #[test]
    fn test_read_only_session_rejects_edits() {
        let mut session = session_with(SessionOptions {
            editable: false,
            ..SessionOptions::default()
        });
        assert!(matches!(
            session.set_leaf_text("tissue", "x"),
            Err(CuratorError::PolicyViolation(_))
        ));
        let view = session.view(ViewMode::Current).unwrap();
        assert!(view.body.iter().all(|v| !v.editable));
    }

    #[test]
    fn test_nested_edit_stays_in_draft_until_commit() {
        let mut session = session();
        session.open_segment("specimen").unwrap();
        session.set_leaf_text("site", "liver").unwrap();

        // Committed state untouched, projection sees the draft.
        let site = object_child(&session.item().attributes["specimen"], "site");
        assert_eq!(site.current(), Some(ValueRef::String("lung")));
        assert!(session.is_dirty());

        session.commit().unwrap();
        let site = object_child(&session.item().attributes["specimen"], "site");
        assert_eq!(site.current(), Some(ValueRef::String("liver")));
    }

    #[test]
    fn test_append_then_edit_element() {
        let mut session = session();
        session.open_path("specimen/aliquots").unwrap();
        let first = session.append_element("aliquots").unwrap();
        let second = session.append_element("aliquots").unwrap();
        session.open(PathStep::Element(first)).unwrap();
        session.set_leaf_text("label", "A1").unwrap();
        session.commit().unwrap();

        let aliquots = object_child(&session.item().attributes["specimen"], "aliquots");
        let Some(ValueRef::List(elements)) = aliquots.current() else {
            panic!("Expected list");
        };
        assert_eq!(
            elements.iter().map(|e| e.uid).collect::<Vec<_>>(),
            vec![first, second]
        );
        assert_eq!(
            object_child(&elements[0], "label").current(),
            Some(ValueRef::String("A1"))
        );
        // The new element's label is required and still empty.
        assert!(!session.is_valid().unwrap());
    }

    #[test]
    fn test_list_removal_is_gated() {
        let mut session = session();
        session.open_path("specimen/aliquots").unwrap();
        let uid = session.append_element("aliquots").unwrap();
        assert!(matches!(
            session.remove_element("aliquots", &uid),
            Err(CuratorError::PolicyViolation(_))
        ));

        let mut session = session_with(SessionOptions {
            allow_list_removal: true,
            ..SessionOptions::default()
        });
        session.open_path("specimen/aliquots").unwrap();
        let uid = session.append_element("aliquots").unwrap();
        let kept = session.append_element("aliquots").unwrap();
        session.remove_element("aliquots", &uid).unwrap();
        let Some(ValueRef::List(elements)) = session.navigator().visible().unwrap().current()
        else {
            panic!("Expected list");
        };
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].uid, kept);
    }

    #[test]
    fn test_select_branch_and_edit_it() {
        let mut session = session();
        let view = session.view(ViewMode::Current).unwrap();
        let origin = view.body.iter().find(|v| v.tag == "origin").unwrap();
        assert_eq!(origin.body, ViewBody::Union { branch: None });

        session.select_branch("origin", "line").unwrap();
        session.open_path("origin/line").unwrap();
        session.set_leaf_text("line", "HeLa").unwrap();
        session.commit().unwrap();

        let Some(ValueRef::Union(selected)) = session.item().attributes["origin"].current() else {
            panic!("Expected union");
        };
        assert_eq!(
            selected.attribute.current(),
            Some(ValueRef::String("HeLa"))
        );
        assert!(session.select_branch("origin", "clone").is_err());
        assert!(session.select_branch("tissue", "line").is_err());
    }

    #[test]
    fn test_close_discards_deeper_drafts() {
        let mut session = session();
        let specimen = session.open_segment("specimen").unwrap().uid;
        session.set_leaf_text("site", "liver").unwrap();
        session.open_segment("aliquots").unwrap();
        session.append_element("aliquots").unwrap();

        session.close(Some(&specimen));
        session.commit().unwrap();

        let specimen = &session.item().attributes["specimen"];
        assert_eq!(
            object_child(specimen, "site").current(),
            Some(ValueRef::String("liver"))
        );
        assert!(object_child(specimen, "aliquots").current().is_none());
    }

    #[test]
    fn test_view_inside_frame_has_breadcrumbs() {
        let mut session = session();
        session.open_path("specimen/aliquots").unwrap();
        session.append_element("aliquots").unwrap();
        session.open_segment("0").unwrap();

        let view = session.view(ViewMode::Current).unwrap();
        let labels: Vec<_> = view.breadcrumbs.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Specimen", "Aliquots", "Aliquots #1"]);
        assert_eq!(view.body.len(), 1);
        assert_eq!(view.body[0].tag, "aliquot");
        assert!(!view.body[0].valid);
    }

    #[test]
    fn test_suggestions_are_pending_until_resolved() {
        let mut session = session();
        session.open_segment("specimen").unwrap();
        let view = session.view(ViewMode::Current).unwrap();
        assert!(view.pending_lookups);

        let references = |_: &Uuid| -> Result<Vec<Attribute>> {
            let catalog = test_utils::sample_catalog();
            let other = test_utils::sample_item(&catalog, "S-002");
            Ok(vec![object_child(&other.attributes["specimen"], "site").clone()])
        };
        let answered = session.resolve_lookups(&references, &HashMap::<Uuid, MappingInfo>::new());
        assert!(answered > 0);

        let view = session.view(ViewMode::Current).unwrap();
        assert!(!view.pending_lookups);
        let site = view.body[0]
            .children()
            .into_iter()
            .find(|v| v.tag == "site")
            .unwrap();
        let ViewBody::Leaf {
            hint: crate::dispatch::LeafHint::Text { suggestions, .. },
            ..
        } = &site.body
        else {
            panic!("Expected text leaf");
        };
        assert_eq!(
            suggestions,
            &Some(Lookup::Ready(vec!["lung".to_string()]))
        );
    }

    #[test]
    fn test_discard_and_rebase() {
        let mut session = session();
        session.open_segment("specimen").unwrap();
        session.set_leaf_text("site", "liver").unwrap();
        session.discard();
        assert!(session.navigator().is_home());
        assert!(!session.is_dirty());

        session.open_segment("specimen").unwrap();
        session.set_leaf_text("site", "liver").unwrap();
        session.commit().unwrap();
        let saved = session.projected().unwrap();
        session.rebase(saved.clone());
        assert!(!session.is_dirty());
        assert_eq!(session.baseline(), &saved);
        assert_eq!(session.navigator().depth(), 1);
        session.resolve_lookups(&no_lookups, &HashMap::<Uuid, MappingInfo>::new());
    }

    #[test]
    fn test_rebase_goes_home_when_path_vanishes() {
        let mut session = session_with(SessionOptions {
            allow_list_removal: true,
            ..SessionOptions::default()
        });
        session.open_path("specimen/aliquots").unwrap();
        session.append_element("aliquots").unwrap();
        session.open_segment("0").unwrap();

        let baseline = session.baseline().clone();
        session.rebase(baseline);
        assert!(session.navigator().is_home());
    }
}
