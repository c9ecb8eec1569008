use thiserror::Error;
use uuid::Uuid;

use crate::attributes::AttributeValueKind;
use crate::validity::Validity;

/// Defects in the attribute graph itself.
///
/// These never describe a user mistake: an attribute whose kind disagrees
/// with its schema, or an object missing a declared child, means the stored
/// graph is corrupt. Rendering and validation of the affected subtree stop
/// at the first one found.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntegrityError {
    #[error("attribute {uid} holds {found} but schema {schema_uid} declares {expected}")]
    KindMismatch {
        uid: Uuid,
        schema_uid: Uuid,
        expected: AttributeValueKind,
        found: AttributeValueKind,
    },

    #[error("object '{parent}' is missing required child '{tag}'")]
    MissingChild { parent: String, tag: String },

    #[error("object '{parent}' has child '{tag}' that its schema does not declare")]
    UnknownChild { parent: String, tag: String },

    #[error("schema {0} is not in the catalog")]
    UnknownSchema(Uuid),

    #[error("schema {0} is declared more than once in the catalog")]
    DuplicateSchema(Uuid),
}

#[derive(Error, Debug)]
pub enum CuratorError {
    #[error("Data integrity error: {0}")]
    DataIntegrity(#[from] IntegrityError),

    #[error("Item not found: {0}")]
    ItemNotFound(Uuid),

    #[error("Item has {} invalid field(s)", .0.offending().len())]
    ValidationFailed(Validity),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Not allowed: {0}")]
    PolicyViolation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CuratorError>;
