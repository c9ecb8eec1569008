//! # Navigation
//!
//! Drilling into nested attributes for focused editing. The [`Navigator`] is
//! a stack of [`Frame`]s; an empty stack is the root view of the item's
//! attribute map.
//!
//! ## Paths, Not Callbacks
//!
//! A frame does not remember *how* to write itself back into its parent. It
//! remembers *where* it sits, as a [`PathStep`] relative to the frame below
//! it:
//!
//! | Step | Parent | Addresses |
//! |------|--------|-----------|
//! | `Field(tag)` | item map or OBJECT | the child under `tag` |
//! | `Element(uid)` | LIST | the element with `uid` |
//! | `Branch` | UNION | the active branch |
//!
//! One generic operation, [`with_child_at`], writes a child back through any
//! step. Because every step addresses by tag or uid and goes through the
//! copy-on-write helpers in [`crate::dispatch`], siblings of the edited child
//! keep their value and uid. The whole navigator is plain data and
//! serializes with serde.
//!
//! ## Drafts and Commits
//!
//! Each frame holds a draft copy of the attribute it focuses:
//!
//! ```text
//!   item map ──Field("specimen")──► [0] specimen draft
//!                                     │
//!                    Field("aliquots")▼
//!                                   [1] aliquots draft
//!                                     │
//!                        Element(uid) ▼
//!                                   [2] aliquot draft   ◄── update() lands here
//! ```
//!
//! - [`Navigator::update`] merges an edited child into the deepest draft. At
//!   the root it writes straight into the item map.
//! - [`Navigator::commit_edit`] replaces the deepest draft and folds every
//!   draft outward, innermost first, into the item map.
//! - [`Navigator::close`] truncates the stack. Drafts of the frames it drops
//!   are discarded. Drafts at or above the target frame survive.
//!
//! `close` never fails: an unknown uid, or none at all, goes home.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::attributes::{Attribute, AttributeSchema, AttributeValueKind, ValueRef, ViewMode};
use crate::catalog::{ItemSchema, SchemaCatalog};
use crate::dispatch::{self, pair, Paired};
use crate::error::{CuratorError, IntegrityError, Result};
use crate::model::AttributeMap;

/// Where a frame sits relative to the frame below it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "step", content = "key", rename_all = "camelCase")]
pub enum PathStep {
    Field(String),
    Element(Uuid),
    Branch,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub step: PathStep,
    /// Uid of the focused attribute.
    pub uid: Uuid,
    pub schema_uid: Uuid,
    pub label: String,
    draft: Attribute,
}

impl Frame {
    pub fn draft(&self) -> &Attribute {
        &self.draft
    }
}

/// One breadcrumb: a frame the user can navigate back to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub uid: Uuid,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Navigator {
    frames: Vec<Frame>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_home(&self) -> bool {
        self.frames.is_empty()
    }

    /// The deepest frame, `None` at the root view.
    pub fn focus(&self) -> Option<&Frame> {
        self.frames.last()
    }

    /// The attribute currently shown, `None` at the root view.
    pub fn visible(&self) -> Option<&Attribute> {
        self.focus().map(|f| &f.draft)
    }

    pub fn path(&self) -> Vec<PathStep> {
        self.frames.iter().map(|f| f.step.clone()).collect()
    }

    /// Frame labels, root first.
    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        self.frames
            .iter()
            .map(|f| Breadcrumb {
                uid: f.uid,
                label: f.label.clone(),
            })
            .collect()
    }

    /// Schema of the focused attribute.
    pub fn focus_schema<'c>(&self, catalog: &'c SchemaCatalog) -> Result<Option<&'c AttributeSchema>> {
        match self.focus() {
            Some(frame) => Ok(Some(catalog.require(&frame.schema_uid)?)),
            None => Ok(None),
        }
    }

    /// Push a frame for the child `step` addresses, starting from the
    /// focused attribute (or the item map at the root).
    pub fn open(
        &mut self,
        catalog: &SchemaCatalog,
        shape: &ItemSchema,
        root: &AttributeMap,
        step: PathStep,
    ) -> Result<&Frame> {
        let (schema, child, label) = match self.frames.last() {
            None => {
                let (schema, child) = root_child(shape, root, &step)?;
                (schema, child, schema.display_name.clone())
            }
            Some(parent) => {
                let parent_schema = catalog.require(&parent.schema_uid)?;
                let (schema, child) = child_at(parent_schema, &parent.draft, &step)?;
                (schema, child, label_for(parent_schema, &parent.draft, schema, &step))
            }
        };

        let frame = Frame {
            step,
            uid: child.uid,
            schema_uid: schema.uid,
            label,
            draft: child.clone(),
        };
        tracing::debug!(depth = self.frames.len() + 1, label = %frame.label, "opened frame");
        self.frames.push(frame);
        Ok(&self.frames[self.frames.len() - 1])
    }

    /// Open every step of `path` in turn.
    pub fn open_path(
        &mut self,
        catalog: &SchemaCatalog,
        shape: &ItemSchema,
        root: &AttributeMap,
        path: impl IntoIterator<Item = PathStep>,
    ) -> Result<()> {
        for step in path {
            self.open(catalog, shape, root, step)?;
        }
        Ok(())
    }

    /// Work out which step a user-typed path segment means at the focus.
    ///
    /// At the root or on an OBJECT the segment is a tag. On a LIST it is a
    /// zero-based index or an element uid. On a UNION any segment enters
    /// the active branch.
    pub fn step_for(
        &self,
        catalog: &SchemaCatalog,
        root_shape: &ItemSchema,
        segment: &str,
    ) -> Result<PathStep> {
        let Some(frame) = self.focus() else {
            return match root_shape.attribute(segment) {
                Some(_) => Ok(PathStep::Field(segment.to_string())),
                None => Err(CuratorError::InvalidPath(format!(
                    "{} has no attribute '{}'",
                    root_shape.display_name, segment
                ))),
            };
        };
        let schema = catalog.require(&frame.schema_uid)?;
        match pair(schema, &frame.draft)? {
            Paired::Object { .. } => Ok(PathStep::Field(segment.to_string())),
            Paired::List { .. } => {
                if let Ok(uid) = Uuid::parse_str(segment) {
                    return Ok(PathStep::Element(uid));
                }
                let index: usize = segment.parse().map_err(|_| {
                    CuratorError::InvalidPath(format!(
                        "'{}' is not an index or element uid of list '{}'",
                        segment, schema.tag
                    ))
                })?;
                match frame.draft.current() {
                    Some(ValueRef::List(elements)) if index < elements.len() => {
                        Ok(PathStep::Element(elements[index].uid))
                    }
                    _ => Err(CuratorError::InvalidPath(format!(
                        "list '{}' has no element {}",
                        schema.tag, index
                    ))),
                }
            }
            Paired::Union { .. } => Ok(PathStep::Branch),
            _ => Err(CuratorError::InvalidPath(format!(
                "'{}' is a {} attribute and cannot be entered",
                schema.tag,
                schema.kind()
            ))),
        }
    }

    /// Pop back to the frame focusing `uid`, keeping it open.
    ///
    /// With no uid, or one no frame matches, the stack is cleared.
    pub fn close(&mut self, uid: Option<&Uuid>) {
        match uid.and_then(|uid| self.frames.iter().position(|f| f.uid == *uid)) {
            Some(index) => {
                self.frames.truncate(index + 1);
                tracing::debug!(depth = self.frames.len(), "closed to frame");
            }
            None => {
                if let Some(uid) = uid {
                    tracing::warn!(%uid, "no open frame for uid, returning home");
                }
                self.frames.clear();
                tracing::debug!("navigated home");
            }
        }
    }

    /// Merge an edited child into the focused attribute.
    ///
    /// At the root `tag` names an item attribute and `attribute` replaces it
    /// in `root` directly. Inside a frame the edit stays in the frame's draft
    /// until [`Self::commit`] or [`Self::commit_edit`].
    pub fn update(
        &mut self,
        catalog: &SchemaCatalog,
        shape: &ItemSchema,
        root: &mut AttributeMap,
        tag: &str,
        attribute: Attribute,
    ) -> Result<()> {
        let Some(frame) = self.frames.last_mut() else {
            set_root_child(shape, root, tag, attribute)?;
            tracing::debug!(tag, "updated item attribute");
            return Ok(());
        };
        let schema = catalog.require(&frame.schema_uid)?;
        frame.draft = merge_child(schema, &frame.draft, tag, attribute)?;
        tracing::debug!(tag, frame = %frame.label, "updated draft");
        Ok(())
    }

    /// Replace the focused attribute's draft with `value`, uncommitted.
    pub fn replace_focus(&mut self, catalog: &SchemaCatalog, value: Attribute) -> Result<()> {
        let Some(frame) = self.frames.last_mut() else {
            return Err(CuratorError::InvalidPath(
                "nothing is open to commit an edit to".to_string(),
            ));
        };
        if value.uid != frame.uid {
            return Err(CuratorError::InvalidPath(format!(
                "edit for attribute {} does not match focused attribute {}",
                value.uid, frame.uid
            )));
        }
        pair(catalog.require(&frame.schema_uid)?, &value)?;
        frame.draft = value;
        Ok(())
    }

    /// Replace the focused attribute with `value`, then fold every draft
    /// into the item map.
    pub fn commit_edit(
        &mut self,
        catalog: &SchemaCatalog,
        shape: &ItemSchema,
        root: &mut AttributeMap,
        value: Attribute,
    ) -> Result<()> {
        self.replace_focus(catalog, value)?;
        self.commit(catalog, shape, root)
    }

    /// Fold every draft outward, innermost first, into the item map.
    ///
    /// All frames stay open and their drafts now reflect the committed
    /// state. Nothing is written unless the whole fold succeeds.
    pub fn commit(
        &mut self,
        catalog: &SchemaCatalog,
        shape: &ItemSchema,
        root: &mut AttributeMap,
    ) -> Result<()> {
        let Some(deepest) = self.frames.last() else {
            return Ok(());
        };

        let mut carried = deepest.draft.clone();
        let mut folded = Vec::with_capacity(self.frames.len());
        for index in (1..self.frames.len()).rev() {
            let parent = &self.frames[index - 1];
            let parent_schema = catalog.require(&parent.schema_uid)?;
            carried = with_child_at(
                parent_schema,
                &parent.draft,
                &self.frames[index].step,
                carried,
            )?;
            folded.push((index - 1, carried.clone()));
        }

        let PathStep::Field(tag) = &self.frames[0].step else {
            return Err(CuratorError::InvalidPath(
                "the outermost frame must address an item attribute".to_string(),
            ));
        };
        set_root_child(shape, root, tag, carried)?;

        for (index, draft) in folded {
            self.frames[index].draft = draft;
        }
        tracing::debug!(depth = self.frames.len(), "committed drafts");
        Ok(())
    }
}

/// Top-level attribute `step` addresses in an item map.
fn root_child<'a>(
    shape: &'a ItemSchema,
    root: &'a AttributeMap,
    step: &PathStep,
) -> Result<(&'a AttributeSchema, &'a Attribute)> {
    let PathStep::Field(tag) = step else {
        return Err(CuratorError::InvalidPath(
            "item attributes are addressed by tag".to_string(),
        ));
    };
    let schema = shape.attribute(tag).ok_or_else(|| {
        CuratorError::InvalidPath(format!("{} has no attribute '{}'", shape.display_name, tag))
    })?;
    let attribute = root.get(tag).ok_or_else(|| {
        CuratorError::InvalidPath(format!("attribute '{}' has no value to open", tag))
    })?;
    pair(schema, attribute)?;
    Ok((schema, attribute))
}

fn set_root_child(
    shape: &ItemSchema,
    root: &mut AttributeMap,
    tag: &str,
    attribute: Attribute,
) -> Result<()> {
    let schema = shape
        .attribute(tag)
        .ok_or_else(|| IntegrityError::UnknownChild {
            parent: shape.display_name.clone(),
            tag: tag.to_string(),
        })?;
    pair(schema, &attribute)?;
    root.insert(tag.to_string(), attribute);
    Ok(())
}

/// Child of `parent` that `step` addresses, with its schema.
pub fn child_at<'a>(
    schema: &'a AttributeSchema,
    parent: &'a Attribute,
    step: &PathStep,
) -> Result<(&'a AttributeSchema, &'a Attribute)> {
    let mappable = parent.is_mappable();
    let found = match (pair(schema, parent)?, step) {
        (Paired::Object { children, values }, PathStep::Field(tag)) => {
            let child_schema = children.iter().find(|s| &s.tag == tag);
            let child = values
                .resolve(ViewMode::Current, mappable)
                .and_then(|map| map.get(tag));
            child_schema.zip(child)
        }
        (Paired::List { element, values }, PathStep::Element(uid)) => values
            .resolve(ViewMode::Current, mappable)
            .and_then(|elements| elements.iter().find(|e| e.uid == *uid))
            .map(|e| (element, e)),
        (Paired::Union { branches, values }, PathStep::Branch) => {
            dispatch::active_branch(branches, values, mappable)
        }
        _ => {
            return Err(CuratorError::InvalidPath(format!(
                "{:?} does not address anything in {} attribute '{}'",
                step,
                schema.kind(),
                schema.tag
            )))
        }
    };
    let (child_schema, child) = found.ok_or_else(|| {
        CuratorError::InvalidPath(format!("'{}' has nothing at {:?}", schema.tag, step))
    })?;
    pair(child_schema, child)?;
    Ok((child_schema, child))
}

/// Write `child` back into `parent` at `step`.
pub fn with_child_at(
    schema: &AttributeSchema,
    parent: &Attribute,
    step: &PathStep,
    child: Attribute,
) -> Result<Attribute> {
    match step {
        PathStep::Field(tag) => dispatch::set_child(schema, parent, tag, child),
        PathStep::Element(uid) if *uid == child.uid => {
            dispatch::replace_element(schema, parent, child)
        }
        PathStep::Element(uid) => Err(CuratorError::InvalidPath(format!(
            "element {} cannot be replaced by attribute {}",
            uid, child.uid
        ))),
        PathStep::Branch => dispatch::replace_branch(schema, parent, child),
    }
}

/// Merge an edited child into a focused attribute, by tag for OBJECT, by
/// uid for LIST and by branch for UNION. A focused leaf is replaced by its
/// own edited copy.
fn merge_child(
    schema: &AttributeSchema,
    focused: &Attribute,
    tag: &str,
    child: Attribute,
) -> Result<Attribute> {
    match schema.kind() {
        AttributeValueKind::Object => dispatch::set_child(schema, focused, tag, child),
        AttributeValueKind::List => dispatch::replace_element(schema, focused, child),
        AttributeValueKind::Union => dispatch::replace_branch(schema, focused, child),
        _ if child.uid == focused.uid => {
            pair(schema, &child)?;
            Ok(child)
        }
        kind => Err(CuratorError::InvalidPath(format!(
            "{} attribute '{}' has no child '{}'",
            kind, schema.tag, tag
        ))),
    }
}

fn label_for(
    parent_schema: &AttributeSchema,
    parent: &Attribute,
    schema: &AttributeSchema,
    step: &PathStep,
) -> String {
    match step {
        PathStep::Element(uid) => {
            let position = match parent.current() {
                Some(ValueRef::List(elements)) => elements.iter().position(|e| e.uid == *uid),
                _ => None,
            };
            match position {
                Some(index) => format!("{} #{}", parent_schema.display_name, index + 1),
                None => parent_schema.display_name.clone(),
            }
        }
        PathStep::Field(_) | PathStep::Branch => schema.display_name.clone(),
    }
}
