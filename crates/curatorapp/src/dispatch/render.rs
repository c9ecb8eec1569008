//! Rendering into a UI-neutral view tree.
//!
//! [`render`] turns a (schema, attribute) pair into an [`AttributeView`]
//! carrying everything an editor needs: the value resolved for the view mode,
//! leaf hints, whether the node is editable and whether it is valid. Leaf
//! editors and composite handlers are the UI's business; this module only
//! decides what they are given.
//!
//! Editability is the AND of the session's own flag, the schema's `readOnly`
//! (inherited by everything nested under it), and the view mode (only
//! CURRENT and UPDATED accept edits).
//!
//! Validity markers always describe the CURRENT state, whatever mode the
//! tree is rendered in.

use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

use super::{active_branch, object_children, pair, Paired};
use crate::attributes::{Attribute, AttributeSchema, AttributeValueKind, LeafValue, ViewMode};
use crate::catalog::ItemSchema;
use crate::error::IntegrityError;
use crate::lookup::{Lookup, LookupCache, MappingInfo};
use crate::model::Item;
use crate::validity::{validate, validate_item};

/// What a render is for.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub mode: ViewMode,
    /// Whether the session accepts edits at all.
    pub editable: bool,
    pub lookups: &'a LookupCache,
}

impl<'a> RenderContext<'a> {
    pub fn new(mode: ViewMode, editable: bool, lookups: &'a LookupCache) -> Self {
        Self {
            mode,
            editable,
            lookups,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeView {
    pub uid: Uuid,
    pub schema_uid: Uuid,
    pub tag: String,
    pub display_name: String,
    pub kind: AttributeValueKind,
    pub optional: bool,
    pub editable: bool,
    pub valid: bool,
    /// Mapping record, only in MAPPED mode for attributes that name one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapping: Option<Lookup<MappingInfo>>,
    pub body: ViewBody,
}

impl AttributeView {
    /// Nested views, whatever the body kind.
    pub fn children(&self) -> Vec<&AttributeView> {
        match &self.body {
            ViewBody::Leaf { .. } => Vec::new(),
            ViewBody::Object { children } => children.iter().collect(),
            ViewBody::List { elements } => elements.iter().collect(),
            ViewBody::Union { branch } => branch.iter().map(|b| &**b).collect(),
        }
    }

    /// Depth-first search for the view of attribute `uid`.
    pub fn find(&self, uid: &Uuid) -> Option<&AttributeView> {
        if self.uid == *uid {
            return Some(self);
        }
        self.children().into_iter().find_map(|c| c.find(uid))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "body", rename_all = "camelCase")]
pub enum ViewBody {
    Leaf {
        value: Option<LeafValue>,
        hint: LeafHint,
    },
    /// Children in schema declaration order. Absent optional children are
    /// left out.
    Object { children: Vec<AttributeView> },
    List { elements: Vec<AttributeView> },
    /// `None` when nothing is selected or the selection matches no branch.
    Union { branch: Option<Box<AttributeView>> },
}

/// Which editor a leaf wants, with its constraints.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "editor", rename_all = "camelCase")]
pub enum LeafHint {
    Text {
        multiline: bool,
        /// Offered only while editable.
        #[serde(skip_serializing_if = "Option::is_none")]
        suggestions: Option<Lookup<Vec<String>>>,
    },
    #[serde(rename_all = "camelCase")]
    Number {
        min_value: Option<f64>,
        max_value: Option<f64>,
        is_int: bool,
    },
    Toggle,
    Timestamp,
    #[serde(rename_all = "camelCase")]
    Measurement { allowed_units: Vec<String> },
    #[serde(rename_all = "camelCase")]
    Code { allowed_schemas: Option<Vec<String>> },
    #[serde(rename_all = "camelCase")]
    Choice { allowed_values: Vec<String> },
}

/// Render one attribute and everything nested under it.
///
/// Integrity errors anywhere in the subtree abort the render.
pub fn render(
    schema: &AttributeSchema,
    attribute: &Attribute,
    ctx: &RenderContext<'_>,
) -> Result<AttributeView, IntegrityError> {
    let markers = validate(schema, attribute)?.markers();
    render_node(schema, attribute, ctx, ctx.editable, &markers)
}

/// Render an item's top-level attributes in the order its shape declares.
pub fn render_item(
    shape: &ItemSchema,
    item: &Item,
    ctx: &RenderContext<'_>,
) -> Result<Vec<AttributeView>, IntegrityError> {
    let markers = validate_item(shape, item)?.markers();
    object_children(&shape.display_name, &shape.attributes, &item.attributes)?
        .into_iter()
        .filter_map(|(schema, attribute)| attribute.map(|a| (schema, a)))
        .map(|(schema, attribute)| render_node(schema, attribute, ctx, ctx.editable, &markers))
        .collect()
}

fn render_node(
    schema: &AttributeSchema,
    attribute: &Attribute,
    ctx: &RenderContext<'_>,
    parent_editable: bool,
    markers: &HashMap<Uuid, bool>,
) -> Result<AttributeView, IntegrityError> {
    let editable = parent_editable && !schema.read_only && ctx.mode.allows_editing();
    let leaf_value = || attribute.resolve(ctx.mode).and_then(|v| v.to_leaf());
    let mappable = attribute.is_mappable();

    let body = match pair(schema, attribute)? {
        Paired::String { multiline, .. } => ViewBody::Leaf {
            value: leaf_value(),
            hint: LeafHint::Text {
                multiline,
                suggestions: editable.then(|| ctx.lookups.suggestions(&schema.uid)),
            },
        },
        Paired::Numeric {
            min_value,
            max_value,
            is_int,
            ..
        } => ViewBody::Leaf {
            value: leaf_value(),
            hint: LeafHint::Number {
                min_value,
                max_value,
                is_int,
            },
        },
        Paired::Boolean { .. } => ViewBody::Leaf {
            value: leaf_value(),
            hint: LeafHint::Toggle,
        },
        Paired::DateTime { .. } => ViewBody::Leaf {
            value: leaf_value(),
            hint: LeafHint::Timestamp,
        },
        Paired::Measurement { allowed_units, .. } => ViewBody::Leaf {
            value: leaf_value(),
            hint: LeafHint::Measurement {
                allowed_units: allowed_units.to_vec(),
            },
        },
        Paired::Code {
            allowed_schemas, ..
        } => ViewBody::Leaf {
            value: leaf_value(),
            hint: LeafHint::Code {
                allowed_schemas: allowed_schemas.map(|s| s.to_vec()),
            },
        },
        Paired::Enum { allowed_values, .. } => ViewBody::Leaf {
            value: leaf_value(),
            hint: LeafHint::Choice {
                allowed_values: allowed_values.to_vec(),
            },
        },
        Paired::Object { children, values } => {
            let mut views = Vec::new();
            if let Some(map) = values.resolve(ctx.mode, mappable) {
                for (child_schema, child) in object_children(&schema.tag, children, map)? {
                    if let Some(child) = child {
                        views.push(render_node(child_schema, child, ctx, editable, markers)?);
                    }
                }
            }
            ViewBody::Object { children: views }
        }
        Paired::List { element, values } => {
            let elements = values
                .resolve(ctx.mode, mappable)
                .map(|elements| elements.as_slice())
                .unwrap_or_default()
                .iter()
                .map(|e| render_node(element, e, ctx, editable, markers))
                .collect::<Result<Vec<_>, _>>()?;
            ViewBody::List { elements }
        }
        Paired::Union { branches, values } => {
            let branch = match active_branch(branches, values, mappable) {
                Some((branch_schema, branch)) => Some(Box::new(render_node(
                    branch_schema,
                    branch,
                    ctx,
                    editable,
                    markers,
                )?)),
                None => None,
            };
            ViewBody::Union { branch }
        }
    };

    let mapping = match (ctx.mode, attribute.mapping_item_uid) {
        (ViewMode::Mapped, Some(uid)) => Some(ctx.lookups.mapping(&uid)),
        _ => None,
    };

    Ok(AttributeView {
        uid: attribute.uid,
        schema_uid: schema.uid,
        tag: schema.tag.clone(),
        display_name: schema.display_name.clone(),
        kind: schema.kind(),
        optional: schema.optional,
        editable,
        valid: markers.get(&attribute.uid).copied().unwrap_or(true),
        mapping,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::SchemaSpec;
    use crate::dispatch::{new_element, set_child};
    use crate::model::ItemKind;

    fn leaf_value(view: &AttributeView) -> Option<&LeafValue> {
        match &view.body {
            ViewBody::Leaf { value, .. } => value.as_ref(),
            other => panic!("Expected leaf body, got {:?}", other),
        }
    }

    #[test]
    fn leaf_renders_value_for_mode() {
        let schema = AttributeSchema::new("tissue", SchemaSpec::string());
        let attr = Attribute::leaf(&schema, LeafValue::String("biopsy".into()))
            .unwrap()
            .with_updated_leaf(Some(LeafValue::String("resection".into())))
            .unwrap();
        let lookups = LookupCache::new();

        let current = render(&schema, &attr, &RenderContext::new(ViewMode::Current, true, &lookups))
            .unwrap();
        assert_eq!(
            leaf_value(&current),
            Some(&LeafValue::String("resection".into()))
        );
        assert!(current.editable);

        let original =
            render(&schema, &attr, &RenderContext::new(ViewMode::Original, true, &lookups))
                .unwrap();
        assert_eq!(leaf_value(&original), Some(&LeafValue::String("biopsy".into())));
        assert!(!original.editable);
    }

    #[test]
    fn read_only_is_inherited() {
        let schema = AttributeSchema::new(
            "specimen",
            SchemaSpec::object(vec![AttributeSchema::new("site", SchemaSpec::string())]),
        )
        .read_only();
        let lookups = LookupCache::new();
        let view = render(
            &schema,
            &Attribute::empty(&schema),
            &RenderContext::new(ViewMode::Current, true, &lookups),
        )
        .unwrap();
        assert!(!view.editable);
        assert!(!view.children()[0].editable);
    }

    #[test]
    fn editable_strings_request_suggestions() {
        let schema = AttributeSchema::new("tissue", SchemaSpec::string());
        let attr = Attribute::empty(&schema);
        let lookups = LookupCache::new();
        let ctx = RenderContext::new(ViewMode::Current, true, &lookups);

        let view = render(&schema, &attr, &ctx).unwrap();
        let ViewBody::Leaf {
            hint: LeafHint::Text { suggestions, .. },
            ..
        } = &view.body
        else {
            panic!("Expected text leaf");
        };
        assert_eq!(suggestions, &Some(Lookup::Pending));
        assert_eq!(lookups.pending_suggestions(), vec![schema.uid]);

        let known = Attribute::leaf(&schema, LeafValue::String("lung".into())).unwrap();
        lookups.fulfill_suggestions(&schema.uid, &[known]);
        let view = render(&schema, &attr, &ctx).unwrap();
        let ViewBody::Leaf {
            hint: LeafHint::Text { suggestions, .. },
            ..
        } = &view.body
        else {
            panic!("Expected text leaf");
        };
        assert_eq!(suggestions, &Some(Lookup::Ready(vec!["lung".to_string()])));
    }

    #[test]
    fn object_children_render_in_declaration_order() {
        let schema = AttributeSchema::new(
            "specimen",
            SchemaSpec::object(vec![
                AttributeSchema::new("zone", SchemaSpec::string()),
                AttributeSchema::new("area", SchemaSpec::string()),
            ]),
        );
        let lookups = LookupCache::new();
        let object = Attribute::empty(&schema);
        // Editing a child must not change the order either.
        let area = Attribute::leaf(schema.child("area").unwrap(), LeafValue::String("x".into()))
            .unwrap();
        let object = set_child(&schema, &object, "area", area).unwrap();

        let view = render(
            &schema,
            &object,
            &RenderContext::new(ViewMode::Current, true, &lookups),
        )
        .unwrap();
        let tags: Vec<_> = view.children().iter().map(|c| c.tag.as_str()).collect();
        assert_eq!(tags, vec!["zone", "area"]);
        assert!(!view.valid);
        assert!(view.children()[1].valid);
        assert!(!view.children()[0].valid);
    }

    #[test]
    fn list_renders_elements_in_order() {
        let schema = AttributeSchema::new(
            "aliquots",
            SchemaSpec::list(AttributeSchema::new("aliquot", SchemaSpec::string())),
        );
        let (list, first) = new_element(&schema, &Attribute::empty(&schema)).unwrap();
        let (list, second) = new_element(&schema, &list).unwrap();
        let lookups = LookupCache::new();
        let view = render(&schema, &list, &RenderContext::new(ViewMode::Current, false, &lookups))
            .unwrap();
        let uids: Vec<_> = view.children().iter().map(|c| c.uid).collect();
        assert_eq!(uids, vec![first, second]);
        assert!(view.children().iter().all(|c| !c.editable));
    }

    #[test]
    fn union_without_selection_renders_empty() {
        let schema = AttributeSchema::new(
            "choice",
            SchemaSpec::union(vec![AttributeSchema::new("text", SchemaSpec::string())]),
        )
        .optional();
        let lookups = LookupCache::new();
        let view = render(
            &schema,
            &Attribute::empty(&schema),
            &RenderContext::new(ViewMode::Current, true, &lookups),
        )
        .unwrap();
        assert_eq!(view.body, ViewBody::Union { branch: None });
        assert!(view.valid);
    }

    #[test]
    fn mapped_mode_shows_mapping_lookup() {
        let schema = AttributeSchema::new("tissue", SchemaSpec::string());
        let mapping_uid = Uuid::new_v4();
        let attr = Attribute::leaf(&schema, LeafValue::String("bx".into()))
            .unwrap()
            .with_mapping("bx", LeafValue::String("biopsy".into()), Some(mapping_uid))
            .unwrap();
        let lookups = LookupCache::new();

        let mapped = render(&schema, &attr, &RenderContext::new(ViewMode::Mapped, true, &lookups))
            .unwrap();
        assert_eq!(mapped.mapping, Some(Lookup::Pending));
        assert_eq!(leaf_value(&mapped), Some(&LeafValue::String("biopsy".into())));

        let current =
            render(&schema, &attr, &RenderContext::new(ViewMode::Current, true, &lookups))
                .unwrap();
        assert!(current.mapping.is_none());
    }

    #[test]
    fn kind_mismatch_aborts_render() {
        let schema = AttributeSchema::new("tissue", SchemaSpec::string());
        let attr = Attribute::empty(&AttributeSchema::new("flag", SchemaSpec::Boolean));
        let lookups = LookupCache::new();
        assert!(render(&schema, &attr, &RenderContext::new(ViewMode::Current, true, &lookups))
            .is_err());
    }

    #[test]
    fn item_renders_in_shape_order() {
        let shape = ItemSchema::new(
            ItemKind::Sample,
            vec![
                AttributeSchema::new("weight", SchemaSpec::numeric(None, None, false)),
                AttributeSchema::new("assay", SchemaSpec::string()),
            ],
        );
        let item = Item::new("S-1", &shape);
        let lookups = LookupCache::new();
        let views =
            render_item(&shape, &item, &RenderContext::new(ViewMode::Current, true, &lookups))
                .unwrap();
        let tags: Vec<_> = views.iter().map(|v| v.tag.as_str()).collect();
        assert_eq!(tags, vec!["weight", "assay"]);
    }
}
