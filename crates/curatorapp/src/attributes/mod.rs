//! # Attribute Model
//!
//! Items carry their metadata as a map of tag → [`Attribute`]. Each attribute
//! is typed by an [`AttributeSchema`] and holds one of ten kinds of value:
//!
//! | Kind | Value | Notes |
//! |------|-------|-------|
//! | `STRING` | text | optionally multiline |
//! | `NUMERIC` | `f64` | optional bounds, optional integer constraint |
//! | `BOOLEAN` | `bool` | |
//! | `DATETIME` | UTC timestamp | |
//! | `MEASUREMENT` | value + unit | |
//! | `CODE` | code + scheme | scheme may be restricted |
//! | `ENUM` | text | closed set of allowed values |
//! | `OBJECT` | tag → attribute | children follow schema declaration order |
//! | `LIST` | ordered attributes | all elements share one schema |
//! | `UNION` | one selected attribute | plus the uid of the branch schema it instantiates |
//!
//! ## Candidate Values
//!
//! Every attribute keeps three candidate values side by side:
//!
//! - **original**: as first imported. Never changes after construction.
//! - **updated**: manual edits from the current session. `None` = untouched.
//! - **mapped**: assigned by an external mapping rule, alongside the raw
//!   `mappable_value` that produced it.
//!
//! Which one is shown depends on the [`ViewMode`]; see [`resolve`] for the
//! policy.

mod resolve;
mod spec;
mod value;

pub use resolve::{resolve, ViewMode};
pub use spec::{AttributeSchema, AttributeValueKind, SchemaSpec};
pub use value::{
    Attribute, AttributeData, Candidates, Code, LeafValue, Measurement, ObjectValue, UnionValue,
    ValueRef,
};
