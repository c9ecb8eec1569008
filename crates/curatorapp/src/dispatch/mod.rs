//! # Type Dispatch
//!
//! Everything that handles an attribute goes through [`pair`] first. It
//! checks the attribute's value kind against its schema and, on success,
//! hands back a [`Paired`] value that carries the schema constraints and the
//! candidate values of that one kind together.
//!
//! Consumers then `match` on [`Paired`] with no wildcard arm, so adding a
//! kind fails to compile until every consumer handles it. Consumers are:
//!
//! - [`render`]: builds the UI-neutral view tree.
//! - [`crate::validity`]: computes per-field validity.
//! - [`edit`]: copy-on-write edits of leaves and composites.
//!
//! A kind mismatch is a [`IntegrityError`], never a user-facing state. Likewise
//! an OBJECT whose keys disagree with its schema (see [`object_children`]).
//! A UNION with nothing selected, or with a selection no branch matches, is an
//! ordinary empty state.

pub mod edit;
pub mod render;

use chrono::{DateTime, Utc};

use crate::attributes::{
    Attribute, AttributeData, AttributeSchema, Candidates, Code, Measurement, ObjectValue,
    SchemaSpec, UnionValue, ViewMode,
};
use crate::error::IntegrityError;

pub use edit::{
    append_element, new_element, remove_element, replace_branch, replace_element, select_branch,
    set_child, set_leaf,
};
pub use render::{render, render_item, AttributeView, LeafHint, RenderContext, ViewBody};

/// A schema and an attribute of the same kind, viewed together.
#[derive(Debug, Clone, Copy)]
pub enum Paired<'a> {
    String {
        multiline: bool,
        values: &'a Candidates<String>,
    },
    Numeric {
        min_value: Option<f64>,
        max_value: Option<f64>,
        is_int: bool,
        values: &'a Candidates<f64>,
    },
    Boolean {
        values: &'a Candidates<bool>,
    },
    DateTime {
        values: &'a Candidates<DateTime<Utc>>,
    },
    Measurement {
        allowed_units: &'a [String],
        values: &'a Candidates<Measurement>,
    },
    Code {
        allowed_schemas: Option<&'a [String]>,
        values: &'a Candidates<Code>,
    },
    Enum {
        allowed_values: &'a [String],
        values: &'a Candidates<String>,
    },
    Object {
        children: &'a [AttributeSchema],
        values: &'a Candidates<ObjectValue>,
    },
    List {
        element: &'a AttributeSchema,
        values: &'a Candidates<Vec<Attribute>>,
    },
    Union {
        branches: &'a [AttributeSchema],
        values: &'a Candidates<UnionValue>,
    },
}

/// Pair `attribute` with `schema`, failing if their kinds disagree.
pub fn pair<'a>(
    schema: &'a AttributeSchema,
    attribute: &'a Attribute,
) -> Result<Paired<'a>, IntegrityError> {
    let paired = match (&schema.spec, attribute.data()) {
        (SchemaSpec::String { multiline }, AttributeData::String(values)) => Paired::String {
            multiline: *multiline,
            values,
        },
        (
            SchemaSpec::Numeric {
                min_value,
                max_value,
                is_int,
            },
            AttributeData::Numeric(values),
        ) => Paired::Numeric {
            min_value: *min_value,
            max_value: *max_value,
            is_int: *is_int,
            values,
        },
        (SchemaSpec::Boolean, AttributeData::Boolean(values)) => Paired::Boolean { values },
        (SchemaSpec::DateTime, AttributeData::DateTime(values)) => Paired::DateTime { values },
        (SchemaSpec::Measurement { allowed_units }, AttributeData::Measurement(values)) => {
            Paired::Measurement {
                allowed_units,
                values,
            }
        }
        (SchemaSpec::Code { allowed_schemas }, AttributeData::Code(values)) => Paired::Code {
            allowed_schemas: allowed_schemas.as_deref(),
            values,
        },
        (SchemaSpec::Enum { allowed_values }, AttributeData::Enum(values)) => Paired::Enum {
            allowed_values,
            values,
        },
        (SchemaSpec::Object { attributes }, AttributeData::Object(values)) => Paired::Object {
            children: attributes,
            values,
        },
        (SchemaSpec::List { attribute: element }, AttributeData::List(values)) => Paired::List {
            element,
            values,
        },
        (SchemaSpec::Union { attributes }, AttributeData::Union(values)) => Paired::Union {
            branches: attributes,
            values,
        },
        (spec, data) => {
            return Err(IntegrityError::KindMismatch {
                uid: attribute.uid,
                schema_uid: schema.uid,
                expected: spec.kind(),
                found: data.kind(),
            })
        }
    };
    Ok(paired)
}

/// Declared children of an OBJECT value, in schema order.
///
/// Absent optional children come back as `None`. A key the schema does not
/// declare, or a missing required child, is an integrity error.
pub fn object_children<'a>(
    parent: &str,
    declared: &'a [AttributeSchema],
    value: &'a ObjectValue,
) -> Result<Vec<(&'a AttributeSchema, Option<&'a Attribute>)>, IntegrityError> {
    if let Some(orphan) = value
        .keys()
        .find(|tag| !declared.iter().any(|s| &s.tag == *tag))
    {
        return Err(IntegrityError::UnknownChild {
            parent: parent.to_string(),
            tag: orphan.clone(),
        });
    }

    declared
        .iter()
        .map(|schema| match value.get(&schema.tag) {
            Some(child) => Ok((schema, Some(child))),
            None if schema.optional => Ok((schema, None)),
            None => Err(IntegrityError::MissingChild {
                parent: parent.to_string(),
                tag: schema.tag.clone(),
            }),
        })
        .collect()
}

/// The branch a UNION currently shows, with the schema it matched.
///
/// Selection is always read at CURRENT, whatever the view mode. `None` when
/// nothing is selected or no declared branch has the selected schema uid.
pub fn active_branch<'a>(
    branches: &'a [AttributeSchema],
    values: &'a Candidates<UnionValue>,
    mappable: bool,
) -> Option<(&'a AttributeSchema, &'a Attribute)> {
    let selected = values.resolve(ViewMode::Current, mappable)?;
    let schema = branches.iter().find(|s| s.uid == selected.schema_uid)?;
    Some((schema, selected.attribute.as_ref()))
}
