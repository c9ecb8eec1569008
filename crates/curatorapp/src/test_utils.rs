//! Shared fixtures for unit and integration tests.
//!
//! The sample catalog declares one attribute of every kind:
//!
//! ```text
//! sample
//!   tissue:     STRING                       required
//!   notes:      STRING (multiline)           optional
//!   passage:    NUMERIC [0, 10], integer     required
//!   consented:  BOOLEAN                      optional
//!   collected:  DATETIME                     optional
//!   volume:     MEASUREMENT [ml, ul]         optional
//!   diagnosis:  CODE [ICD-10, SNOMED]        optional
//!   sex:        ENUM [female, male, unknown] required
//!   batch:      STRING                       optional, read-only
//!   specimen:   OBJECT                       required
//!     site:       STRING                     required
//!     aliquots:   LIST<aliquot OBJECT>       optional
//!       label:      STRING                   required
//!       volume:     NUMERIC >= 0             optional
//!   origin:     UNION [donor: STRING, line: STRING] optional
//!
//! project
//!   title:      STRING                       required
//! ```

use crate::attributes::{Attribute, AttributeSchema, LeafValue, SchemaSpec};
use crate::catalog::{ItemSchema, SchemaCatalog};
use crate::model::{Item, ItemKind};

pub fn sample_shape() -> ItemSchema {
    let aliquot = AttributeSchema::new(
        "aliquot",
        SchemaSpec::object(vec![
            AttributeSchema::new("label", SchemaSpec::string()).named("Label"),
            AttributeSchema::new("volume", SchemaSpec::numeric(Some(0.0), None, false))
                .named("Volume")
                .optional(),
        ]),
    )
    .named("Aliquot");

    let mut shape = ItemSchema::new(
        ItemKind::Sample,
        vec![
            AttributeSchema::new("tissue", SchemaSpec::string()).named("Tissue"),
            AttributeSchema::new("notes", SchemaSpec::String { multiline: true })
                .named("Notes")
                .optional(),
            AttributeSchema::new("passage", SchemaSpec::numeric(Some(0.0), Some(10.0), true))
                .named("Passage"),
            AttributeSchema::new("consented", SchemaSpec::Boolean)
                .named("Consented")
                .optional(),
            AttributeSchema::new("collected", SchemaSpec::DateTime)
                .named("Collected")
                .optional(),
            AttributeSchema::new(
                "volume",
                SchemaSpec::Measurement {
                    allowed_units: vec!["ml".into(), "ul".into()],
                },
            )
            .named("Volume")
            .optional(),
            AttributeSchema::new(
                "diagnosis",
                SchemaSpec::Code {
                    allowed_schemas: Some(vec!["ICD-10".into(), "SNOMED".into()]),
                },
            )
            .named("Diagnosis")
            .optional(),
            AttributeSchema::new(
                "sex",
                SchemaSpec::enumeration(["female", "male", "unknown"]),
            )
            .named("Sex"),
            AttributeSchema::new("batch", SchemaSpec::string())
                .named("Batch")
                .optional()
                .read_only(),
            AttributeSchema::new(
                "specimen",
                SchemaSpec::object(vec![
                    AttributeSchema::new("site", SchemaSpec::string()).named("Site"),
                    AttributeSchema::new("aliquots", SchemaSpec::list(aliquot))
                        .named("Aliquots")
                        .optional(),
                ]),
            )
            .named("Specimen"),
            AttributeSchema::new(
                "origin",
                SchemaSpec::union(vec![
                    AttributeSchema::new("donor", SchemaSpec::string()).named("Donor"),
                    AttributeSchema::new("line", SchemaSpec::string()).named("Cell line"),
                ]),
            )
            .named("Origin")
            .optional(),
        ],
    );
    shape.display_name = "Sample".to_string();
    shape
}

pub fn project_shape() -> ItemSchema {
    let mut shape = ItemSchema::new(
        ItemKind::Project,
        vec![AttributeSchema::new("title", SchemaSpec::string()).named("Title")],
    );
    shape.display_name = "Project".to_string();
    shape
}

pub fn sample_catalog() -> SchemaCatalog {
    SchemaCatalog::new(vec![sample_shape(), project_shape()]).unwrap()
}

/// A valid sample: every required attribute carries an original value.
pub fn sample_item(catalog: &SchemaCatalog, name: &str) -> Item {
    let shape = catalog.item_schema_for(ItemKind::Sample).unwrap();
    let mut item = Item::new(name, shape);

    for (tag, value) in [
        ("tissue", LeafValue::String("biopsy".into())),
        ("passage", LeafValue::Numeric(3.0)),
        ("sex", LeafValue::Enum("female".into())),
        ("batch", LeafValue::String("B-7".into())),
    ] {
        let schema = shape.attribute(tag).unwrap();
        item.attributes
            .insert(tag.to_string(), Attribute::leaf(schema, value).unwrap());
    }

    let specimen = shape.attribute("specimen").unwrap();
    let site = Attribute::leaf(
        specimen.child("site").unwrap(),
        LeafValue::String("lung".into()),
    )
    .unwrap();
    let aliquots = Attribute::empty(specimen.child("aliquots").unwrap());
    item.attributes.insert(
        "specimen".to_string(),
        Attribute::object(specimen, [site, aliquots]).unwrap(),
    );
    item
}

/// An empty project, invalid until its title is set.
pub fn project_item(catalog: &SchemaCatalog, name: &str) -> Item {
    let shape = catalog.item_schema_for(ItemKind::Project).unwrap();
    Item::new(name, shape)
}
