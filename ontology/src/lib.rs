//! SMART ontology encoded as typed Rust data.
//!
//! The `smart-ontology` crate holds the in-memory class graph that the code
//! generator walks: classes with object and data properties, REST calls,
//! example payloads and coded-value enumerations. Parsing the OWL source is
//! the job of an external parser; this crate reads that parser's JSON dump.
//!
//! # Entry Point
//!
//! ```
//! let ontology = smart_ontology::Ontology::from_json(r#"{
//!     "version": "0.5",
//!     "classes": [{"name": "Allergy", "uri": "http://smartplatforms.org/terms#Allergy"}]
//! }"#).unwrap();
//! assert_eq!(ontology.class_count(), 1);
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod loader;
pub mod model;

pub use loader::OntologyError;
pub use model::{
    ApiCall, CallCategory, ClassId, CodedValue, DataProperty, Enumeration, HttpMethod,
    ObjectProperty, OntologyClass,
};

/// A parsed ontology: every class in one arena, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Ontology {
    /// Ontology version as reported by the parser.
    pub version: String,
    /// All classes. [`ClassId`] values index into this vector.
    pub classes: Vec<OntologyClass>,
}

impl Ontology {
    /// Returns the class with the given arena id.
    #[must_use]
    pub fn class(&self, id: ClassId) -> Option<&OntologyClass> {
        self.classes.get(id.0)
    }

    /// Looks up a class by its full IRI. Returns `None` if not found.
    #[must_use]
    pub fn find_class(&self, uri: &str) -> Option<&OntologyClass> {
        self.classes.iter().find(|c| c.uri == uri)
    }

    /// Returns the arena id of the class with the given IRI.
    #[must_use]
    pub fn class_id(&self, uri: &str) -> Option<ClassId> {
        self.classes.iter().position(|c| c.uri == uri).map(ClassId)
    }

    /// Iterates over `(id, class)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (ClassId, &OntologyClass)> {
        self.classes
            .iter()
            .enumerate()
            .map(|(index, class)| (ClassId(index), class))
    }

    /// Returns the number of classes.
    #[must_use]
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Returns the number of object and data properties across all classes.
    #[must_use]
    pub fn property_count(&self) -> usize {
        self.classes
            .iter()
            .map(|c| c.object_properties.len() + c.data_properties.len())
            .sum()
    }

    /// Returns the number of API calls across all classes.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.classes.iter().map(|c| c.calls.len()).sum()
    }

    /// Appends a class and returns its id.
    pub fn push(&mut self, class: OntologyClass) -> ClassId {
        self.classes.push(class);
        ClassId(self.classes.len() - 1)
    }
}
