//! # Validity
//!
//! Validity is display state, not an error. [`validate`] walks an attribute
//! and its schema and returns a [`Validity`] tree mirroring the attribute
//! graph. Every node records its own [`Violation`]s and an aggregate `valid`
//! flag. A UI marks each field from its node; a save boundary asks the root
//! node and refuses while it is invalid.
//!
//! All checks read the CURRENT value.
//!
//! | Kind | Check |
//! |------|-------|
//! | any | required and CURRENT is null (or an empty string) |
//! | `NUMERIC` | not finite, outside `[minValue, maxValue]`, non-integral when `isInt` |
//! | `MEASUREMENT` | unit outside `allowedUnits` (when that list is non-empty) |
//! | `CODE` | scheme outside `allowedSchemas` (when set) |
//! | `ENUM` | value outside `allowedValues` |
//! | `OBJECT` | AND over all present children |
//! | `LIST` | AND over all elements |
//! | `UNION` | the selected branch; with none selected, valid iff optional |
//!
//! A null value only ever fails the required check; range, unit, scheme and
//! membership checks apply to values that are present.
//!
//! Children are always evaluated in full, so every offending field shows up
//! in one pass. Integrity errors (kind mismatch, malformed OBJECT) abort the
//! walk and come back as `Err`.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

use crate::attributes::{Attribute, AttributeSchema, ViewMode};
use crate::catalog::ItemSchema;
use crate::dispatch::{active_branch, object_children, pair, Paired};
use crate::error::IntegrityError;
use crate::model::Item;

/// One broken constraint on one attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "violation", rename_all = "camelCase")]
pub enum Violation {
    RequiredEmpty,
    NotFinite,
    BelowMinimum { min: f64 },
    AboveMaximum { max: f64 },
    NotAnInteger,
    UnitNotAllowed { unit: String },
    SchemeNotAllowed { scheme: String },
    ValueNotAllowed { value: String },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::RequiredEmpty => write!(f, "a value is required"),
            Violation::NotFinite => write!(f, "must be a finite number"),
            Violation::BelowMinimum { min } => write!(f, "must be at least {}", min),
            Violation::AboveMaximum { max } => write!(f, "must be at most {}", max),
            Violation::NotAnInteger => write!(f, "must be a whole number"),
            Violation::UnitNotAllowed { unit } => write!(f, "unit '{}' is not allowed", unit),
            Violation::SchemeNotAllowed { scheme } => {
                write!(f, "coding scheme '{}' is not allowed", scheme)
            }
            Violation::ValueNotAllowed { value } => write!(f, "'{}' is not an allowed value", value),
        }
    }
}

/// Validity of one attribute and everything nested under it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Validity {
    pub uid: Uuid,
    pub tag: String,
    /// This node and all of its descendants are free of violations.
    pub valid: bool,
    /// Violations of this node alone.
    pub violations: Vec<Violation>,
    pub children: Vec<Validity>,
}

impl Validity {
    fn node(uid: Uuid, tag: &str, violations: Vec<Violation>, children: Vec<Validity>) -> Self {
        let valid = violations.is_empty() && children.iter().all(|c| c.valid);
        Self {
            uid,
            tag: tag.to_string(),
            valid,
            violations,
            children,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Every node with violations of its own, depth-first.
    pub fn offending(&self) -> Vec<&Validity> {
        let mut found = Vec::new();
        self.collect_offending(&mut found);
        found
    }

    fn collect_offending<'a>(&'a self, found: &mut Vec<&'a Validity>) {
        if !self.violations.is_empty() {
            found.push(self);
        }
        for child in &self.children {
            child.collect_offending(found);
        }
    }

    /// The node for the attribute `uid`, if it is in this tree.
    pub fn find(&self, uid: &Uuid) -> Option<&Validity> {
        if self.uid == *uid {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(uid))
    }

    /// Aggregate validity of every node, keyed by attribute uid.
    pub fn markers(&self) -> HashMap<Uuid, bool> {
        let mut markers = HashMap::new();
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            markers.insert(node.uid, node.valid);
            pending.extend(node.children.iter());
        }
        markers
    }
}

/// Validate `attribute` against `schema`.
pub fn validate(schema: &AttributeSchema, attribute: &Attribute) -> Result<Validity, IntegrityError> {
    let mappable = attribute.is_mappable();
    let mut violations = Vec::new();
    let mut children = Vec::new();

    let require = |present: bool, violations: &mut Vec<Violation>| {
        if !present && !schema.optional {
            violations.push(Violation::RequiredEmpty);
        }
    };

    match pair(schema, attribute)? {
        Paired::String { values, .. } => {
            let value = values.resolve(ViewMode::Current, mappable);
            require(value.is_some_and(|s| !s.is_empty()), &mut violations);
        }
        Paired::Numeric {
            min_value,
            max_value,
            is_int,
            values,
        } => {
            let value = values.resolve(ViewMode::Current, mappable);
            require(value.is_some(), &mut violations);
            if let Some(&n) = value {
                violations.extend(numeric_violations(n, min_value, max_value, is_int));
            }
        }
        Paired::Boolean { values } => {
            require(values.resolve(ViewMode::Current, mappable).is_some(), &mut violations);
        }
        Paired::DateTime { values } => {
            require(values.resolve(ViewMode::Current, mappable).is_some(), &mut violations);
        }
        Paired::Measurement {
            allowed_units,
            values,
        } => {
            let value = values.resolve(ViewMode::Current, mappable);
            require(value.is_some(), &mut violations);
            if let Some(m) = value {
                violations.extend(numeric_violations(m.value, None, None, false));
                if !allowed_units.is_empty() && !allowed_units.contains(&m.unit) {
                    violations.push(Violation::UnitNotAllowed {
                        unit: m.unit.clone(),
                    });
                }
            }
        }
        Paired::Code {
            allowed_schemas,
            values,
        } => {
            let value = values.resolve(ViewMode::Current, mappable);
            require(value.is_some(), &mut violations);
            if let (Some(code), Some(allowed)) = (value, allowed_schemas) {
                if !allowed.contains(&code.scheme) {
                    violations.push(Violation::SchemeNotAllowed {
                        scheme: code.scheme.clone(),
                    });
                }
            }
        }
        Paired::Enum {
            allowed_values,
            values,
        } => {
            let value = values
                .resolve(ViewMode::Current, mappable)
                .filter(|s| !s.is_empty());
            require(value.is_some(), &mut violations);
            if let Some(v) = value {
                if !allowed_values.contains(v) {
                    violations.push(Violation::ValueNotAllowed { value: v.clone() });
                }
            }
        }
        Paired::Object {
            children: declared,
            values,
        } => match values.resolve(ViewMode::Current, mappable) {
            Some(map) => {
                for (child_schema, child) in object_children(&schema.tag, declared, map)? {
                    if let Some(child) = child {
                        children.push(validate(child_schema, child)?);
                    }
                }
            }
            None => require(false, &mut violations),
        },
        Paired::List { element, values } => match values.resolve(ViewMode::Current, mappable) {
            Some(elements) => {
                for e in elements {
                    children.push(validate(element, e)?);
                }
            }
            None => require(false, &mut violations),
        },
        Paired::Union { branches, values } => match active_branch(branches, values, mappable) {
            Some((branch_schema, branch)) => children.push(validate(branch_schema, branch)?),
            None => require(false, &mut violations),
        },
    }

    Ok(Validity::node(attribute.uid, &schema.tag, violations, children))
}

fn numeric_violations(
    n: f64,
    min_value: Option<f64>,
    max_value: Option<f64>,
    is_int: bool,
) -> Vec<Violation> {
    if !n.is_finite() {
        return vec![Violation::NotFinite];
    }
    let mut violations = Vec::new();
    if let Some(min) = min_value.filter(|min| n < *min) {
        violations.push(Violation::BelowMinimum { min });
    }
    if let Some(max) = max_value.filter(|max| n > *max) {
        violations.push(Violation::AboveMaximum { max });
    }
    if is_int && n.fract() != 0.0 {
        violations.push(Violation::NotAnInteger);
    }
    violations
}

/// Aggregate validity of one attribute.
pub fn is_valid(schema: &AttributeSchema, attribute: &Attribute) -> Result<bool, IntegrityError> {
    Ok(validate(schema, attribute)?.valid)
}

/// Validate every attribute an item's shape declares.
///
/// The item's attribute map is held to the same key rules as an OBJECT.
pub fn validate_item(shape: &ItemSchema, item: &Item) -> Result<Validity, IntegrityError> {
    let mut children = Vec::new();
    for (schema, attribute) in object_children(&shape.display_name, &shape.attributes, &item.attributes)? {
        if let Some(attribute) = attribute {
            children.push(validate(schema, attribute)?);
        }
    }
    Ok(Validity::node(item.uid, &item.name, Vec::new(), children))
}
