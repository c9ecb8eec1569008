//! Copy-on-write edits.
//!
//! Each helper takes the schema and the attribute being edited and returns a
//! new attribute; the input is never touched. Leaf edits replace only the
//! updated slot. Composite edits take the CURRENT value of the composite,
//! apply the change, and store the result as the updated value, so every
//! untouched child keeps its value and uid.

use uuid::Uuid;

use super::{pair, Paired};
use crate::attributes::{
    Attribute, AttributeSchema, AttributeValueKind, LeafValue, UnionValue, ViewMode,
};
use crate::error::{CuratorError, IntegrityError, Result};

fn wrong_kind(schema: &AttributeSchema, wanted: AttributeValueKind) -> CuratorError {
    CuratorError::InvalidPath(format!(
        "'{}' is a {} attribute, not {}",
        schema.tag,
        schema.kind(),
        wanted
    ))
}

/// Set (or with `None`, revert) the updated value of a leaf attribute.
pub fn set_leaf(
    schema: &AttributeSchema,
    attribute: &Attribute,
    value: Option<LeafValue>,
) -> Result<Attribute> {
    pair(schema, attribute)?;
    if schema.kind().is_composite() {
        return Err(CuratorError::InvalidPath(format!(
            "'{}' is a {} attribute and has no value of its own",
            schema.tag,
            schema.kind()
        )));
    }
    if schema.read_only {
        return Err(CuratorError::PolicyViolation(format!(
            "'{}' is read-only",
            schema.tag
        )));
    }
    Ok(attribute.with_updated_leaf(value)?)
}

/// Replace the child `tag` of an OBJECT attribute.
pub fn set_child(
    schema: &AttributeSchema,
    parent: &Attribute,
    tag: &str,
    child: Attribute,
) -> Result<Attribute> {
    let Paired::Object { children, values } = pair(schema, parent)? else {
        return Err(wrong_kind(schema, AttributeValueKind::Object));
    };
    let declared = children
        .iter()
        .find(|s| s.tag == tag)
        .ok_or_else(|| IntegrityError::UnknownChild {
            parent: schema.tag.clone(),
            tag: tag.to_string(),
        })?;
    pair(declared, &child)?;

    // A null object starts from its declared children.
    let mut map = match values.resolve(ViewMode::Current, parent.is_mappable()) {
        Some(map) => map.clone(),
        None => children
            .iter()
            .map(|s| (s.tag.clone(), Attribute::empty(s)))
            .collect(),
    };
    map.insert(tag.to_string(), child);
    Ok(parent.with_updated_object(map)?)
}

/// Append `element` to the end of a LIST attribute.
pub fn append_element(
    schema: &AttributeSchema,
    list: &Attribute,
    element: Attribute,
) -> Result<Attribute> {
    let Paired::List {
        element: element_schema,
        values,
    } = pair(schema, list)?
    else {
        return Err(wrong_kind(schema, AttributeValueKind::List));
    };
    pair(element_schema, &element)?;

    let mut elements = values
        .resolve(ViewMode::Current, list.is_mappable())
        .cloned()
        .unwrap_or_default();
    elements.push(element);
    Ok(list.with_updated_list(elements)?)
}

/// Append a freshly instantiated, empty element. Returns the new list and
/// the uid of the element.
pub fn new_element(schema: &AttributeSchema, list: &Attribute) -> Result<(Attribute, Uuid)> {
    let element_schema = schema
        .element()
        .ok_or_else(|| wrong_kind(schema, AttributeValueKind::List))?;
    let element = Attribute::empty(element_schema);
    let uid = element.uid;
    Ok((append_element(schema, list, element)?, uid))
}

/// Remove the element with `uid` from a LIST attribute.
pub fn remove_element(schema: &AttributeSchema, list: &Attribute, uid: &Uuid) -> Result<Attribute> {
    let Paired::List { values, .. } = pair(schema, list)? else {
        return Err(wrong_kind(schema, AttributeValueKind::List));
    };
    let mut elements = values
        .resolve(ViewMode::Current, list.is_mappable())
        .cloned()
        .unwrap_or_default();
    let index = elements
        .iter()
        .position(|e| e.uid == *uid)
        .ok_or_else(|| missing_element(schema, uid))?;
    elements.remove(index);
    Ok(list.with_updated_list(elements)?)
}

/// Replace the element sharing `element.uid` in a LIST attribute.
pub fn replace_element(
    schema: &AttributeSchema,
    list: &Attribute,
    element: Attribute,
) -> Result<Attribute> {
    let Paired::List {
        element: element_schema,
        values,
    } = pair(schema, list)?
    else {
        return Err(wrong_kind(schema, AttributeValueKind::List));
    };
    pair(element_schema, &element)?;

    let mut elements = values
        .resolve(ViewMode::Current, list.is_mappable())
        .cloned()
        .unwrap_or_default();
    let slot = elements
        .iter_mut()
        .find(|e| e.uid == element.uid)
        .ok_or_else(|| missing_element(schema, &element.uid))?;
    *slot = element;
    Ok(list.with_updated_list(elements)?)
}

fn missing_element(schema: &AttributeSchema, uid: &Uuid) -> CuratorError {
    CuratorError::InvalidPath(format!("list '{}' has no element {}", schema.tag, uid))
}

/// Select a UNION branch, instantiating it empty.
///
/// Re-selecting the active branch keeps its current value.
pub fn select_branch(
    schema: &AttributeSchema,
    union: &Attribute,
    branch_uid: &Uuid,
) -> Result<Attribute> {
    let Paired::Union { branches, values } = pair(schema, union)? else {
        return Err(wrong_kind(schema, AttributeValueKind::Union));
    };
    let branch = branches
        .iter()
        .find(|s| s.uid == *branch_uid)
        .ok_or_else(|| missing_branch(schema, branch_uid))?;

    let active = values.resolve(ViewMode::Current, union.is_mappable());
    if active.is_some_and(|v| v.schema_uid == *branch_uid) {
        return Ok(union.clone());
    }
    Ok(union.with_updated_union(Some(UnionValue {
        schema_uid: branch.uid,
        attribute: Box::new(Attribute::empty(branch)),
    }))?)
}

/// Replace the selected value of a UNION with `child`, which must
/// instantiate one of its branches.
pub fn replace_branch(
    schema: &AttributeSchema,
    union: &Attribute,
    child: Attribute,
) -> Result<Attribute> {
    let Paired::Union { branches, .. } = pair(schema, union)? else {
        return Err(wrong_kind(schema, AttributeValueKind::Union));
    };
    let branch = branches
        .iter()
        .find(|s| s.uid == child.schema_uid)
        .ok_or_else(|| missing_branch(schema, &child.schema_uid))?;
    pair(branch, &child)?;

    Ok(union.with_updated_union(Some(UnionValue {
        schema_uid: branch.uid,
        attribute: Box::new(child),
    }))?)
}

fn missing_branch(schema: &AttributeSchema, uid: &Uuid) -> CuratorError {
    CuratorError::InvalidPath(format!("union '{}' has no branch {}", schema.tag, uid))
}
