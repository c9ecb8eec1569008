//! Attribute schemas.
//!
//! An [`AttributeSchema`] is the immutable, session-shared definition of one
//! attribute: its tag, its kind, and the constraints that apply to values of
//! that kind. Composite schemas own their nested schemas, so a whole item
//! shape is a tree of these.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The closed set of value kinds an attribute can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttributeValueKind {
    String,
    Numeric,
    Boolean,
    #[serde(rename = "DATETIME")]
    DateTime,
    Measurement,
    Code,
    Enum,
    Object,
    List,
    Union,
}

impl AttributeValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "STRING",
            Self::Numeric => "NUMERIC",
            Self::Boolean => "BOOLEAN",
            Self::DateTime => "DATETIME",
            Self::Measurement => "MEASUREMENT",
            Self::Code => "CODE",
            Self::Enum => "ENUM",
            Self::Object => "OBJECT",
            Self::List => "LIST",
            Self::Union => "UNION",
        }
    }

    /// Composite kinds contain nested attributes.
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Object | Self::List | Self::Union)
    }

    pub fn is_leaf(&self) -> bool {
        !self.is_composite()
    }
}

impl fmt::Display for AttributeValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific part of a schema.
///
/// The variant is the schema's kind; the fields are the constraints that
/// only make sense for that kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchemaSpec {
    String {
        #[serde(default)]
        multiline: bool,
    },
    Numeric {
        #[serde(default, rename = "minValue")]
        min_value: Option<f64>,
        #[serde(default, rename = "maxValue")]
        max_value: Option<f64>,
        #[serde(default, rename = "isInt")]
        is_int: bool,
    },
    Boolean,
    #[serde(rename = "DATETIME")]
    DateTime,
    Measurement {
        #[serde(default, rename = "allowedUnits")]
        allowed_units: Vec<String>,
    },
    Code {
        /// `None` accepts any coding scheme.
        #[serde(default, rename = "allowedSchemas")]
        allowed_schemas: Option<Vec<String>>,
    },
    Enum {
        #[serde(rename = "allowedValues")]
        allowed_values: Vec<String>,
    },
    /// Children in declaration order. Display order follows this vector,
    /// never the order of the attribute's own map.
    Object { attributes: Vec<AttributeSchema> },
    /// Element type shared by every element of the list.
    List { attribute: Box<AttributeSchema> },
    /// Branch types; a union value instantiates exactly one of them.
    Union { attributes: Vec<AttributeSchema> },
}

impl SchemaSpec {
    pub fn kind(&self) -> AttributeValueKind {
        match self {
            SchemaSpec::String { .. } => AttributeValueKind::String,
            SchemaSpec::Numeric { .. } => AttributeValueKind::Numeric,
            SchemaSpec::Boolean => AttributeValueKind::Boolean,
            SchemaSpec::DateTime => AttributeValueKind::DateTime,
            SchemaSpec::Measurement { .. } => AttributeValueKind::Measurement,
            SchemaSpec::Code { .. } => AttributeValueKind::Code,
            SchemaSpec::Enum { .. } => AttributeValueKind::Enum,
            SchemaSpec::Object { .. } => AttributeValueKind::Object,
            SchemaSpec::List { .. } => AttributeValueKind::List,
            SchemaSpec::Union { .. } => AttributeValueKind::Union,
        }
    }

    pub fn string() -> Self {
        SchemaSpec::String { multiline: false }
    }

    pub fn numeric(min_value: Option<f64>, max_value: Option<f64>, is_int: bool) -> Self {
        SchemaSpec::Numeric {
            min_value,
            max_value,
            is_int,
        }
    }

    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SchemaSpec::Enum {
            allowed_values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn object(attributes: Vec<AttributeSchema>) -> Self {
        SchemaSpec::Object { attributes }
    }

    pub fn list(element: AttributeSchema) -> Self {
        SchemaSpec::List {
            attribute: Box::new(element),
        }
    }

    pub fn union(branches: Vec<AttributeSchema>) -> Self {
        SchemaSpec::Union {
            attributes: branches,
        }
    }
}

/// Definition of a single attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeSchema {
    pub uid: Uuid,
    pub tag: String,
    pub display_name: String,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub read_only: bool,
    #[serde(flatten)]
    pub spec: SchemaSpec,
}

impl AttributeSchema {
    /// Create a required, editable schema with a fresh uid.
    /// The display name defaults to the tag.
    pub fn new(tag: impl Into<String>, spec: SchemaSpec) -> Self {
        let tag = tag.into();
        Self {
            uid: Uuid::new_v4(),
            display_name: tag.clone(),
            tag,
            optional: false,
            read_only: false,
            spec,
        }
    }

    pub fn named(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn kind(&self) -> AttributeValueKind {
        self.spec.kind()
    }

    /// Declared child of an OBJECT schema.
    pub fn child(&self, tag: &str) -> Option<&AttributeSchema> {
        match &self.spec {
            SchemaSpec::Object { attributes } => attributes.iter().find(|s| s.tag == tag),
            _ => None,
        }
    }

    /// Element schema of a LIST schema.
    pub fn element(&self) -> Option<&AttributeSchema> {
        match &self.spec {
            SchemaSpec::List { attribute } => Some(attribute),
            _ => None,
        }
    }

    /// Branch of a UNION schema, matched by uid.
    pub fn branch(&self, schema_uid: &Uuid) -> Option<&AttributeSchema> {
        match &self.spec {
            SchemaSpec::Union { attributes } => attributes.iter().find(|s| s.uid == *schema_uid),
            _ => None,
        }
    }

    /// Directly nested schemas, in declaration order.
    pub fn nested(&self) -> Vec<&AttributeSchema> {
        match &self.spec {
            SchemaSpec::Object { attributes } | SchemaSpec::Union { attributes } => {
                attributes.iter().collect()
            }
            SchemaSpec::List { attribute } => vec![attribute.as_ref()],
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_spec_variant() {
        assert_eq!(
            AttributeSchema::new("a", SchemaSpec::string()).kind(),
            AttributeValueKind::String
        );
        assert_eq!(
            AttributeSchema::new("a", SchemaSpec::DateTime).kind(),
            AttributeValueKind::DateTime
        );
        assert_eq!(
            AttributeSchema::new("a", SchemaSpec::object(vec![])).kind(),
            AttributeValueKind::Object
        );
    }

    #[test]
    fn composite_kinds() {
        assert!(AttributeValueKind::Object.is_composite());
        assert!(AttributeValueKind::List.is_composite());
        assert!(AttributeValueKind::Union.is_composite());
        assert!(AttributeValueKind::Measurement.is_leaf());
        assert!(AttributeValueKind::Code.is_leaf());
    }

    #[test]
    fn child_lookup_by_tag() {
        let schema = AttributeSchema::new(
            "specimen",
            SchemaSpec::object(vec![
                AttributeSchema::new("site", SchemaSpec::string()),
                AttributeSchema::new("weight", SchemaSpec::numeric(Some(0.0), None, false)),
            ]),
        );
        assert_eq!(schema.child("weight").unwrap().tag, "weight");
        assert!(schema.child("missing").is_none());
        assert!(schema.element().is_none());
    }

    #[test]
    fn branch_lookup_by_uid() {
        let a = AttributeSchema::new("a", SchemaSpec::string());
        let b = AttributeSchema::new("b", SchemaSpec::Boolean);
        let b_uid = b.uid;
        let schema = AttributeSchema::new("choice", SchemaSpec::union(vec![a, b]));
        assert_eq!(schema.branch(&b_uid).unwrap().tag, "b");
        assert!(schema.branch(&Uuid::new_v4()).is_none());
    }

    #[test]
    fn schema_json_uses_camel_case_and_kind_tag() {
        let schema = AttributeSchema::new("count", SchemaSpec::numeric(Some(0.0), Some(10.0), true))
            .named("Count")
            .optional();
        let json = serde_json::to_value(&schema).unwrap();
        assert_eq!(json["kind"], "NUMERIC");
        assert_eq!(json["displayName"], "Count");
        assert_eq!(json["isInt"], true);
        assert_eq!(json["maxValue"], 10.0);

        let loaded: AttributeSchema = serde_json::from_value(json).unwrap();
        assert_eq!(loaded, schema);
    }

    #[test]
    fn nested_list_schema_parses() {
        let json = serde_json::json!({
            "uid": Uuid::new_v4(),
            "tag": "images",
            "displayName": "Images",
            "kind": "LIST",
            "attribute": {
                "uid": Uuid::new_v4(),
                "tag": "image",
                "displayName": "Image",
                "kind": "CODE",
                "allowedSchemas": ["DICOM"]
            }
        });
        let schema: AttributeSchema = serde_json::from_value(json).unwrap();
        assert!(!schema.optional);
        let element = schema.element().unwrap();
        assert_eq!(element.kind(), AttributeValueKind::Code);
        assert_eq!(
            element.spec,
            SchemaSpec::Code {
                allowed_schemas: Some(vec!["DICOM".to_string()])
            }
        );
    }
}
