//! Attribute values.
//!
//! An [`Attribute`] pairs an identity and a schema reference with one of ten
//! kinds of value data. Each kind stores its own [`Candidates`] triple, so the
//! original, updated and mapped slots of an attribute always share a kind.
//!
//! Attributes are edited copy-on-write: every `with_*` method returns a new
//! attribute and leaves `self` untouched. The original slot has no mutator at
//! all; edits land in the updated slot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use super::resolve::{resolve, ViewMode};
use super::spec::{AttributeSchema, AttributeValueKind, SchemaSpec};
use crate::error::IntegrityError;

/// Children of an OBJECT value, keyed by tag.
pub type ObjectValue = BTreeMap<String, Attribute>;

/// The three candidate values of an attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidates<V> {
    original_value: Option<V>,
    updated_value: Option<V>,
    mapped_value: Option<V>,
}

impl<V> Default for Candidates<V> {
    fn default() -> Self {
        Self {
            original_value: None,
            updated_value: None,
            mapped_value: None,
        }
    }
}

impl<V> Candidates<V> {
    pub fn new(original: Option<V>) -> Self {
        Self {
            original_value: original,
            updated_value: None,
            mapped_value: None,
        }
    }

    pub fn original(&self) -> Option<&V> {
        self.original_value.as_ref()
    }

    pub fn updated(&self) -> Option<&V> {
        self.updated_value.as_ref()
    }

    pub fn mapped(&self) -> Option<&V> {
        self.mapped_value.as_ref()
    }

    pub fn with_updated(mut self, updated: Option<V>) -> Self {
        self.updated_value = updated;
        self
    }

    pub fn with_mapped(mut self, mapped: Option<V>) -> Self {
        self.mapped_value = mapped;
        self
    }

    pub fn resolve(&self, mode: ViewMode, mappable: bool) -> Option<&V> {
        resolve(self, mode, mappable)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub value: f64,
    pub unit: String,
}

impl Measurement {
    pub fn new(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
        }
    }
}

/// A coded value, e.g. an ontology term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Code {
    pub code: String,
    pub scheme: String,
    #[serde(default)]
    pub display: Option<String>,
}

impl Code {
    pub fn new(code: impl Into<String>, scheme: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            scheme: scheme.into(),
            display: None,
        }
    }
}

/// The selected branch of a UNION value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnionValue {
    /// Uid of the branch schema `attribute` instantiates.
    pub schema_uid: Uuid,
    pub attribute: Box<Attribute>,
}

/// Value data of an attribute, one variant per kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "valueKind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttributeData {
    String(Candidates<String>),
    Numeric(Candidates<f64>),
    Boolean(Candidates<bool>),
    #[serde(rename = "DATETIME")]
    DateTime(Candidates<DateTime<Utc>>),
    Measurement(Candidates<Measurement>),
    Code(Candidates<Code>),
    Enum(Candidates<String>),
    Object(Candidates<ObjectValue>),
    List(Candidates<Vec<Attribute>>),
    Union(Candidates<UnionValue>),
}

impl AttributeData {
    pub fn kind(&self) -> AttributeValueKind {
        match self {
            AttributeData::String(_) => AttributeValueKind::String,
            AttributeData::Numeric(_) => AttributeValueKind::Numeric,
            AttributeData::Boolean(_) => AttributeValueKind::Boolean,
            AttributeData::DateTime(_) => AttributeValueKind::DateTime,
            AttributeData::Measurement(_) => AttributeValueKind::Measurement,
            AttributeData::Code(_) => AttributeValueKind::Code,
            AttributeData::Enum(_) => AttributeValueKind::Enum,
            AttributeData::Object(_) => AttributeValueKind::Object,
            AttributeData::List(_) => AttributeValueKind::List,
            AttributeData::Union(_) => AttributeValueKind::Union,
        }
    }

    /// Same data with the updated slot cleared.
    pub fn reverted(self) -> Self {
        match self {
            AttributeData::String(c) => AttributeData::String(c.with_updated(None)),
            AttributeData::Numeric(c) => AttributeData::Numeric(c.with_updated(None)),
            AttributeData::Boolean(c) => AttributeData::Boolean(c.with_updated(None)),
            AttributeData::DateTime(c) => AttributeData::DateTime(c.with_updated(None)),
            AttributeData::Measurement(c) => AttributeData::Measurement(c.with_updated(None)),
            AttributeData::Code(c) => AttributeData::Code(c.with_updated(None)),
            AttributeData::Enum(c) => AttributeData::Enum(c.with_updated(None)),
            AttributeData::Object(c) => AttributeData::Object(c.with_updated(None)),
            AttributeData::List(c) => AttributeData::List(c.with_updated(None)),
            AttributeData::Union(c) => AttributeData::Union(c.with_updated(None)),
        }
    }

    /// Data of `kind` with every slot empty.
    pub fn empty(kind: AttributeValueKind) -> Self {
        match kind {
            AttributeValueKind::String => AttributeData::String(Candidates::default()),
            AttributeValueKind::Numeric => AttributeData::Numeric(Candidates::default()),
            AttributeValueKind::Boolean => AttributeData::Boolean(Candidates::default()),
            AttributeValueKind::DateTime => AttributeData::DateTime(Candidates::default()),
            AttributeValueKind::Measurement => AttributeData::Measurement(Candidates::default()),
            AttributeValueKind::Code => AttributeData::Code(Candidates::default()),
            AttributeValueKind::Enum => AttributeData::Enum(Candidates::default()),
            AttributeValueKind::Object => AttributeData::Object(Candidates::default()),
            AttributeValueKind::List => AttributeData::List(Candidates::default()),
            AttributeValueKind::Union => AttributeData::Union(Candidates::default()),
        }
    }
}

/// An owned leaf value, used to edit and display leaf attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeafValue {
    String(String),
    Numeric(f64),
    Boolean(bool),
    #[serde(rename = "DATETIME")]
    DateTime(DateTime<Utc>),
    Measurement(Measurement),
    Code(Code),
    Enum(String),
}

impl LeafValue {
    pub fn kind(&self) -> AttributeValueKind {
        match self {
            LeafValue::String(_) => AttributeValueKind::String,
            LeafValue::Numeric(_) => AttributeValueKind::Numeric,
            LeafValue::Boolean(_) => AttributeValueKind::Boolean,
            LeafValue::DateTime(_) => AttributeValueKind::DateTime,
            LeafValue::Measurement(_) => AttributeValueKind::Measurement,
            LeafValue::Code(_) => AttributeValueKind::Code,
            LeafValue::Enum(_) => AttributeValueKind::Enum,
        }
    }

    /// Parse user input as a leaf value of `kind`.
    ///
    /// Measurements are written `<value> <unit>`, codes `<scheme>:<code>`,
    /// datetimes as RFC 3339. Returns `None` for composite kinds or input
    /// that does not parse. Numbers must be finite.
    pub fn parse(kind: AttributeValueKind, input: &str) -> Option<LeafValue> {
        let input = input.trim();
        match kind {
            AttributeValueKind::String => Some(LeafValue::String(input.to_string())),
            AttributeValueKind::Enum => Some(LeafValue::Enum(input.to_string())),
            AttributeValueKind::Numeric => parse_finite(input).map(LeafValue::Numeric),
            AttributeValueKind::Boolean => match input.to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Some(LeafValue::Boolean(true)),
                "false" | "no" | "0" => Some(LeafValue::Boolean(false)),
                _ => None,
            },
            AttributeValueKind::DateTime => DateTime::parse_from_rfc3339(input)
                .ok()
                .map(|dt| LeafValue::DateTime(dt.with_timezone(&Utc))),
            AttributeValueKind::Measurement => {
                let (value, unit) = input.split_once(char::is_whitespace)?;
                let value = parse_finite(value)?;
                Some(LeafValue::Measurement(Measurement::new(value, unit.trim())))
            }
            AttributeValueKind::Code => {
                let (scheme, code) = input.split_once(':')?;
                Some(LeafValue::Code(Code::new(code.trim(), scheme.trim())))
            }
            AttributeValueKind::Object | AttributeValueKind::List | AttributeValueKind::Union => {
                None
            }
        }
    }
}

fn parse_finite(input: &str) -> Option<f64> {
    input.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// A borrowed view of a resolved candidate value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueRef<'a> {
    String(&'a str),
    Numeric(f64),
    Boolean(bool),
    DateTime(&'a DateTime<Utc>),
    Measurement(&'a Measurement),
    Code(&'a Code),
    Enum(&'a str),
    Object(&'a ObjectValue),
    List(&'a [Attribute]),
    Union(&'a UnionValue),
}

impl<'a> ValueRef<'a> {
    pub fn kind(&self) -> AttributeValueKind {
        match self {
            ValueRef::String(_) => AttributeValueKind::String,
            ValueRef::Numeric(_) => AttributeValueKind::Numeric,
            ValueRef::Boolean(_) => AttributeValueKind::Boolean,
            ValueRef::DateTime(_) => AttributeValueKind::DateTime,
            ValueRef::Measurement(_) => AttributeValueKind::Measurement,
            ValueRef::Code(_) => AttributeValueKind::Code,
            ValueRef::Enum(_) => AttributeValueKind::Enum,
            ValueRef::Object(_) => AttributeValueKind::Object,
            ValueRef::List(_) => AttributeValueKind::List,
            ValueRef::Union(_) => AttributeValueKind::Union,
        }
    }

    pub fn to_leaf(&self) -> Option<LeafValue> {
        match *self {
            ValueRef::String(s) => Some(LeafValue::String(s.to_string())),
            ValueRef::Numeric(n) => Some(LeafValue::Numeric(n)),
            ValueRef::Boolean(b) => Some(LeafValue::Boolean(b)),
            ValueRef::DateTime(dt) => Some(LeafValue::DateTime(*dt)),
            ValueRef::Measurement(m) => Some(LeafValue::Measurement(m.clone())),
            ValueRef::Code(c) => Some(LeafValue::Code(c.clone())),
            ValueRef::Enum(s) => Some(LeafValue::Enum(s.to_string())),
            ValueRef::Object(_) | ValueRef::List(_) | ValueRef::Union(_) => None,
        }
    }
}

/// A schema-typed value on an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    pub uid: Uuid,
    pub schema_uid: Uuid,
    #[serde(flatten)]
    data: AttributeData,
    /// Raw external value that produced the mapped slot. Its presence makes
    /// the attribute mapping-eligible.
    #[serde(default)]
    pub mappable_value: Option<String>,
    #[serde(default)]
    pub mapping_item_uid: Option<Uuid>,
}

impl Attribute {
    pub fn new(schema_uid: Uuid, data: AttributeData) -> Self {
        Self {
            uid: Uuid::new_v4(),
            schema_uid,
            data,
            mappable_value: None,
            mapping_item_uid: None,
        }
    }

    /// A fresh attribute for `schema` with no values.
    ///
    /// OBJECT attributes are born with every declared child instantiated as
    /// their original value, so the child key set matches the schema.
    pub fn empty(schema: &AttributeSchema) -> Self {
        let data = match &schema.spec {
            SchemaSpec::Object { attributes } => {
                let children = attributes
                    .iter()
                    .map(|child| (child.tag.clone(), Attribute::empty(child)))
                    .collect();
                AttributeData::Object(Candidates::new(Some(children)))
            }
            spec => AttributeData::empty(spec.kind()),
        };
        Self::new(schema.uid, data)
    }

    /// A leaf attribute whose original value is `value`.
    pub fn leaf(schema: &AttributeSchema, value: LeafValue) -> Result<Self, IntegrityError> {
        Attribute::new(schema.uid, AttributeData::empty(schema.kind())).with_original_leaf(value)
    }

    /// An OBJECT attribute whose original value holds `children`, keyed by
    /// the tag of the declared child each one instantiates.
    pub fn object<I>(schema: &AttributeSchema, children: I) -> Result<Self, IntegrityError>
    where
        I: IntoIterator<Item = Attribute>,
    {
        let declared = schema.nested();
        let mut map = ObjectValue::new();
        for child in children {
            let tag = declared
                .iter()
                .find(|s| s.uid == child.schema_uid)
                .map(|s| s.tag.clone())
                .ok_or_else(|| IntegrityError::UnknownChild {
                    parent: schema.tag.clone(),
                    tag: child.schema_uid.to_string(),
                })?;
            map.insert(tag, child);
        }
        Ok(Self::new(
            schema.uid,
            AttributeData::Object(Candidates::new(Some(map))),
        ))
    }

    pub fn list(schema: &AttributeSchema, elements: Vec<Attribute>) -> Self {
        Self::new(schema.uid, AttributeData::List(Candidates::new(Some(elements))))
    }

    pub fn union(schema: &AttributeSchema, branch: Attribute) -> Self {
        let value = UnionValue {
            schema_uid: branch.schema_uid,
            attribute: Box::new(branch),
        };
        Self::new(schema.uid, AttributeData::Union(Candidates::new(Some(value))))
    }

    pub fn with_uid(mut self, uid: Uuid) -> Self {
        self.uid = uid;
        self
    }

    pub fn data(&self) -> &AttributeData {
        &self.data
    }

    pub fn value_kind(&self) -> AttributeValueKind {
        self.data.kind()
    }

    pub fn is_mappable(&self) -> bool {
        self.mappable_value.is_some()
    }

    /// Resolve the candidate surfaced for `mode`.
    pub fn resolve(&self, mode: ViewMode) -> Option<ValueRef<'_>> {
        let mappable = self.is_mappable();
        match &self.data {
            AttributeData::String(c) => c.resolve(mode, mappable).map(|v| ValueRef::String(v)),
            AttributeData::Numeric(c) => c.resolve(mode, mappable).map(|v| ValueRef::Numeric(*v)),
            AttributeData::Boolean(c) => c.resolve(mode, mappable).map(|v| ValueRef::Boolean(*v)),
            AttributeData::DateTime(c) => c.resolve(mode, mappable).map(ValueRef::DateTime),
            AttributeData::Measurement(c) => c.resolve(mode, mappable).map(ValueRef::Measurement),
            AttributeData::Code(c) => c.resolve(mode, mappable).map(ValueRef::Code),
            AttributeData::Enum(c) => c.resolve(mode, mappable).map(|v| ValueRef::Enum(v)),
            AttributeData::Object(c) => c.resolve(mode, mappable).map(ValueRef::Object),
            AttributeData::List(c) => c.resolve(mode, mappable).map(|v| ValueRef::List(v)),
            AttributeData::Union(c) => c.resolve(mode, mappable).map(ValueRef::Union),
        }
    }

    pub fn current(&self) -> Option<ValueRef<'_>> {
        self.resolve(ViewMode::Current)
    }

    /// This attribute is not of the `expected` kind.
    fn mismatch(&self, expected: AttributeValueKind) -> IntegrityError {
        IntegrityError::KindMismatch {
            uid: self.uid,
            schema_uid: self.schema_uid,
            expected,
            found: self.value_kind(),
        }
    }

    /// A value of kind `found` cannot be stored in this attribute.
    fn value_mismatch(&self, found: AttributeValueKind) -> IntegrityError {
        IntegrityError::KindMismatch {
            uid: self.uid,
            schema_uid: self.schema_uid,
            expected: self.value_kind(),
            found,
        }
    }

    fn with_original_leaf(mut self, value: LeafValue) -> Result<Self, IntegrityError> {
        self.data = match (self.data, value) {
            (AttributeData::String(_), LeafValue::String(v)) => {
                AttributeData::String(Candidates::new(Some(v)))
            }
            (AttributeData::Numeric(_), LeafValue::Numeric(v)) => {
                AttributeData::Numeric(Candidates::new(Some(v)))
            }
            (AttributeData::Boolean(_), LeafValue::Boolean(v)) => {
                AttributeData::Boolean(Candidates::new(Some(v)))
            }
            (AttributeData::DateTime(_), LeafValue::DateTime(v)) => {
                AttributeData::DateTime(Candidates::new(Some(v)))
            }
            (AttributeData::Measurement(_), LeafValue::Measurement(v)) => {
                AttributeData::Measurement(Candidates::new(Some(v)))
            }
            (AttributeData::Code(_), LeafValue::Code(v)) => {
                AttributeData::Code(Candidates::new(Some(v)))
            }
            (AttributeData::Enum(_), LeafValue::Enum(v)) => {
                AttributeData::Enum(Candidates::new(Some(v)))
            }
            (data, value) => {
                return Err(IntegrityError::KindMismatch {
                    uid: self.uid,
                    schema_uid: self.schema_uid,
                    expected: data.kind(),
                    found: value.kind(),
                })
            }
        };
        Ok(self)
    }

    /// Copy of this attribute with only the updated slot replaced.
    ///
    /// `None` reverts the attribute to its untouched state.
    pub fn with_updated_leaf(&self, value: Option<LeafValue>) -> Result<Self, IntegrityError> {
        let mut next = self.clone();
        next.data = match (&self.data, value) {
            (AttributeData::String(c), Some(LeafValue::String(v))) => {
                AttributeData::String(c.clone().with_updated(Some(v)))
            }
            (AttributeData::Numeric(c), Some(LeafValue::Numeric(v))) => {
                AttributeData::Numeric(c.clone().with_updated(Some(v)))
            }
            (AttributeData::Boolean(c), Some(LeafValue::Boolean(v))) => {
                AttributeData::Boolean(c.clone().with_updated(Some(v)))
            }
            (AttributeData::DateTime(c), Some(LeafValue::DateTime(v))) => {
                AttributeData::DateTime(c.clone().with_updated(Some(v)))
            }
            (AttributeData::Measurement(c), Some(LeafValue::Measurement(v))) => {
                AttributeData::Measurement(c.clone().with_updated(Some(v)))
            }
            (AttributeData::Code(c), Some(LeafValue::Code(v))) => {
                AttributeData::Code(c.clone().with_updated(Some(v)))
            }
            (AttributeData::Enum(c), Some(LeafValue::Enum(v))) => {
                AttributeData::Enum(c.clone().with_updated(Some(v)))
            }
            (data, None) => data.clone().reverted(),
            (_, Some(v)) => return Err(self.value_mismatch(v.kind())),
        };
        Ok(next)
    }

    /// Record the result of an external mapping rule on a leaf attribute.
    pub fn with_mapping(
        &self,
        mappable_value: impl Into<String>,
        mapped: LeafValue,
        mapping_item_uid: Option<Uuid>,
    ) -> Result<Self, IntegrityError> {
        let mut next = self.clone();
        next.data = match (&self.data, mapped) {
            (AttributeData::String(c), LeafValue::String(v)) => {
                AttributeData::String(c.clone().with_mapped(Some(v)))
            }
            (AttributeData::Numeric(c), LeafValue::Numeric(v)) => {
                AttributeData::Numeric(c.clone().with_mapped(Some(v)))
            }
            (AttributeData::Boolean(c), LeafValue::Boolean(v)) => {
                AttributeData::Boolean(c.clone().with_mapped(Some(v)))
            }
            (AttributeData::DateTime(c), LeafValue::DateTime(v)) => {
                AttributeData::DateTime(c.clone().with_mapped(Some(v)))
            }
            (AttributeData::Measurement(c), LeafValue::Measurement(v)) => {
                AttributeData::Measurement(c.clone().with_mapped(Some(v)))
            }
            (AttributeData::Code(c), LeafValue::Code(v)) => {
                AttributeData::Code(c.clone().with_mapped(Some(v)))
            }
            (AttributeData::Enum(c), LeafValue::Enum(v)) => {
                AttributeData::Enum(c.clone().with_mapped(Some(v)))
            }
            (_, value) => return Err(self.value_mismatch(value.kind())),
        };
        next.mappable_value = Some(mappable_value.into());
        next.mapping_item_uid = mapping_item_uid;
        Ok(next)
    }

    /// Copy with the updated slot of an OBJECT replaced.
    pub fn with_updated_object(&self, children: ObjectValue) -> Result<Self, IntegrityError> {
        match &self.data {
            AttributeData::Object(c) => {
                let mut next = self.clone();
                next.data = AttributeData::Object(c.clone().with_updated(Some(children)));
                Ok(next)
            }
            _ => Err(self.mismatch(AttributeValueKind::Object)),
        }
    }

    /// Copy with the updated slot of a LIST replaced.
    pub fn with_updated_list(&self, elements: Vec<Attribute>) -> Result<Self, IntegrityError> {
        match &self.data {
            AttributeData::List(c) => {
                let mut next = self.clone();
                next.data = AttributeData::List(c.clone().with_updated(Some(elements)));
                Ok(next)
            }
            _ => Err(self.mismatch(AttributeValueKind::List)),
        }
    }

    /// Copy with the updated slot of a UNION replaced.
    pub fn with_updated_union(&self, value: Option<UnionValue>) -> Result<Self, IntegrityError> {
        match &self.data {
            AttributeData::Union(c) => {
                let mut next = self.clone();
                next.data = AttributeData::Union(c.clone().with_updated(value));
                Ok(next)
            }
            _ => Err(self.mismatch(AttributeValueKind::Union)),
        }
    }
}
