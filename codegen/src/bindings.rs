//! Typed binding records, one per template shape.
//!
//! Each record lists the keys its templates may use ([`TemplateShape::KEYS`])
//! and turns itself into a [`BindingMap`]. Templates are checked against
//! `KEYS` when loaded, so a misspelled placeholder surfaces before any
//! output is rendered.

use crate::template::BindingMap;

/// A set of values that fills one template shape.
pub trait TemplateShape {
    /// Every key this shape binds.
    const KEYS: &'static [&'static str];

    /// Returns the key → value mapping.
    fn bind(&self) -> BindingMap;
}

fn entry(key: &str, value: &str) -> (String, Option<String>) {
    (key.to_string(), Some(value.to_string()))
}

fn optional(key: &str, value: Option<&str>) -> (String, Option<String>) {
    (key.to_string(), value.map(str::to_string))
}

/// Metadata shared by every file-level template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileMetadata {
    /// Generator identification for the file header.
    pub author: String,
    /// Generation date, `YYYY-MM-DD`.
    pub date: String,
    /// Generation year.
    pub year: String,
    /// Name of the ontology source the output was generated from.
    pub ontology_path: String,
}

impl FileMetadata {
    fn entries(&self) -> [(String, Option<String>); 4] {
        [
            entry("AUTHOR", &self.author),
            entry("DATE", &self.date),
            entry("YEAR", &self.year),
            entry("ONTOLOGY_PATH", &self.ontology_path),
        ]
    }
}

/// Class declaration and definition files.
#[derive(Debug, Clone, Default)]
pub struct ClassBindings {
    /// Normalized class name.
    pub class_name: String,
    /// Superclass name.
    pub superclass: String,
    /// Rendered forward declaration, empty if there are no dependencies.
    pub forwards: String,
    /// Rendered property declarations.
    pub properties: String,
    /// Rendered accessor bodies.
    pub getters: String,
    /// Rendered base path accessor, if any.
    pub base_path: Option<String>,
    /// IRI of the ontology class.
    pub rdf_type: String,
    /// File metadata.
    pub meta: FileMetadata,
}

impl TemplateShape for ClassBindings {
    const KEYS: &'static [&'static str] = &[
        "CLASS_NAME",
        "CLASS_SUPERCLASS",
        "CLASS_FORWARDS",
        "CLASS_PROPERTIES",
        "CLASS_GETTERS",
        "CLASS_BASE_PATH",
        "RDF_TYPE",
        "AUTHOR",
        "DATE",
        "YEAR",
        "ONTOLOGY_PATH",
    ];

    fn bind(&self) -> BindingMap {
        let mut map: BindingMap = [
            entry("CLASS_NAME", &self.class_name),
            entry("CLASS_SUPERCLASS", &self.superclass),
            entry("CLASS_FORWARDS", &self.forwards),
            entry("CLASS_PROPERTIES", &self.properties),
            entry("CLASS_GETTERS", &self.getters),
            optional("CLASS_BASE_PATH", self.base_path.as_deref()),
            entry("RDF_TYPE", &self.rdf_type),
        ]
        .into_iter()
        .collect();
        map.extend(self.meta.entries());
        map
    }
}

/// Category (class extension) declaration and definition files.
#[derive(Debug, Clone, Default)]
pub struct CategoryBindings {
    /// Class being extended.
    pub class_name: String,
    /// Category name.
    pub category_name: String,
    /// Rendered forward declaration.
    pub forwards: String,
    /// Rendered method declarations.
    pub declarations: String,
    /// Rendered method bodies.
    pub methods: String,
    /// File metadata.
    pub meta: FileMetadata,
}

impl TemplateShape for CategoryBindings {
    const KEYS: &'static [&'static str] = &[
        "CATEGORY_CLASS",
        "CATEGORY_NAME",
        "CATEGORY_FORWARDS",
        "CATEGORY_DECLARATIONS",
        "CATEGORY_METHODS",
        "AUTHOR",
        "DATE",
        "YEAR",
        "ONTOLOGY_PATH",
    ];

    fn bind(&self) -> BindingMap {
        let mut map: BindingMap = [
            entry("CATEGORY_CLASS", &self.class_name),
            entry("CATEGORY_NAME", &self.category_name),
            entry("CATEGORY_FORWARDS", &self.forwards),
            entry("CATEGORY_DECLARATIONS", &self.declarations),
            entry("CATEGORY_METHODS", &self.methods),
        ]
        .into_iter()
        .collect();
        map.extend(self.meta.entries());
        map
    }
}

/// Combined unit-test files.
#[derive(Debug, Clone, Default)]
pub struct UnitTestFileBindings {
    /// Name of the test case class.
    pub test_class_name: String,
    /// Rendered import lines for every tested class.
    pub imports: String,
    /// Rendered test methods.
    pub methods: String,
    /// File metadata.
    pub meta: FileMetadata,
}

impl TemplateShape for UnitTestFileBindings {
    const KEYS: &'static [&'static str] = &[
        "TEST_CLASS_NAME",
        "TEST_IMPORTS",
        "TEST_METHODS",
        "AUTHOR",
        "DATE",
        "YEAR",
        "ONTOLOGY_PATH",
    ];

    fn bind(&self) -> BindingMap {
        let mut map: BindingMap = [
            entry("TEST_CLASS_NAME", &self.test_class_name),
            entry("TEST_IMPORTS", &self.imports),
            entry("TEST_METHODS", &self.methods),
        ]
        .into_iter()
        .collect();
        map.extend(self.meta.entries());
        map
    }
}

/// Import manifest.
#[derive(Debug, Clone, Default)]
pub struct ManifestBindings {
    /// Rendered import lines.
    pub imports: String,
    /// File metadata.
    pub meta: FileMetadata,
}

impl TemplateShape for ManifestBindings {
    const KEYS: &'static [&'static str] = &["IMPORTS", "AUTHOR", "DATE", "YEAR", "ONTOLOGY_PATH"];

    fn bind(&self) -> BindingMap {
        let mut map: BindingMap = [entry("IMPORTS", &self.imports)].into_iter().collect();
        map.extend(self.meta.entries());
        map
    }
}

/// Forward declaration of dependent classes.
#[derive(Debug, Clone, Default)]
pub struct ForwardBindings {
    /// Comma-separated, sorted class names.
    pub class_names: String,
}

impl TemplateShape for ForwardBindings {
    const KEYS: &'static [&'static str] = &["CLASS_NAMES"];

    fn bind(&self) -> BindingMap {
        [entry("CLASS_NAMES", &self.class_names)].into_iter().collect()
    }
}

/// One import line.
#[derive(Debug, Clone, Default)]
pub struct ImportBindings {
    /// Class whose declaration file is imported.
    pub class_name: String,
}

impl TemplateShape for ImportBindings {
    const KEYS: &'static [&'static str] = &["CLASS_NAME"];

    fn bind(&self) -> BindingMap {
        [entry("CLASS_NAME", &self.class_name)].into_iter().collect()
    }
}

/// Property declaration.
#[derive(Debug, Clone, Default)]
pub struct PropertyBindings {
    /// Normalized property name.
    pub name: String,
    /// Property IRI.
    pub uri: String,
    /// Declared type (collection type for multi-valued properties).
    pub use_type: String,
    /// Ownership qualifier.
    pub strength: String,
    /// Rendered coded-values comment, if any.
    pub comment: Option<String>,
}

impl TemplateShape for PropertyBindings {
    const KEYS: &'static [&'static str] = &[
        "PROPERTY_NAME",
        "PROPERTY_URI",
        "PROPERTY_TYPE",
        "PROPERTY_STRENGTH",
        "PROPERTY_COMMENT",
    ];

    fn bind(&self) -> BindingMap {
        [
            entry("PROPERTY_NAME", &self.name),
            entry("PROPERTY_URI", &self.uri),
            entry("PROPERTY_TYPE", &self.use_type),
            entry("PROPERTY_STRENGTH", &self.strength),
            optional("PROPERTY_COMMENT", self.comment.as_deref()),
        ]
        .into_iter()
        .collect()
    }
}

/// Property accessor body.
#[derive(Debug, Clone, Default)]
pub struct GetterBindings {
    /// Normalized property name.
    pub name: String,
    /// Property IRI.
    pub uri: String,
    /// Declared type.
    pub use_type: String,
    /// Type of one item.
    pub item_type: String,
}

impl TemplateShape for GetterBindings {
    const KEYS: &'static [&'static str] =
        &["PROPERTY_NAME", "PROPERTY_URI", "PROPERTY_TYPE", "ITEM_TYPE"];

    fn bind(&self) -> BindingMap {
        [
            entry("PROPERTY_NAME", &self.name),
            entry("PROPERTY_URI", &self.uri),
            entry("PROPERTY_TYPE", &self.use_type),
            entry("ITEM_TYPE", &self.item_type),
        ]
        .into_iter()
        .collect()
    }
}

/// Class-level base path accessor.
#[derive(Debug, Clone, Default)]
pub struct BasePathBindings {
    /// Normalized REST path template.
    pub base_path: String,
}

impl TemplateShape for BasePathBindings {
    const KEYS: &'static [&'static str] = &["BASE_PATH"];

    fn bind(&self) -> BindingMap {
        [entry("BASE_PATH", &self.base_path)].into_iter().collect()
    }
}

/// Comment listing the valid codes of a coded property.
#[derive(Debug, Clone, Default)]
pub struct CodedValuesBindings {
    /// IRI of the coded class the values belong to.
    pub value_set: String,
    /// One `code  (title)` line per valid value.
    pub values: String,
}

impl TemplateShape for CodedValuesBindings {
    const KEYS: &'static [&'static str] = &["VALUE_SET", "CODED_VALUES"];

    fn bind(&self) -> BindingMap {
        [
            entry("VALUE_SET", &self.value_set),
            entry("CODED_VALUES", &self.values),
        ]
        .into_iter()
        .collect()
    }
}

/// Record-level call method (declaration, getter or poster body).
#[derive(Debug, Clone, Default)]
pub struct RecordCallBindings {
    /// Method name.
    pub method_name: String,
    /// HTTP method token.
    pub http_method: String,
    /// Class of the returned items.
    pub item_type: String,
    /// Path with positional substitution markers.
    pub path: String,
    /// Call description.
    pub description: String,
}

impl TemplateShape for RecordCallBindings {
    const KEYS: &'static [&'static str] = &[
        "METHOD_NAME",
        "HTTP_METHOD",
        "ITEM_TYPE",
        "CALL_PATH",
        "CALL_DESCRIPTION",
    ];

    fn bind(&self) -> BindingMap {
        [
            entry("METHOD_NAME", &self.method_name),
            entry("HTTP_METHOD", &self.http_method),
            entry("ITEM_TYPE", &self.item_type),
            entry("CALL_PATH", &self.path),
            entry("CALL_DESCRIPTION", &self.description),
        ]
        .into_iter()
        .collect()
    }
}

/// One unit-test method exercising an example payload.
#[derive(Debug, Clone, Default)]
pub struct UnitTestMethodBindings {
    /// Class under test.
    pub class_name: String,
    /// File name of the example fixture.
    pub fixture_name: String,
    /// Rendered assertions.
    pub assertions: String,
}

impl TemplateShape for UnitTestMethodBindings {
    const KEYS: &'static [&'static str] = &["CLASS_NAME", "FIXTURE_NAME", "TEST_ASSERTIONS"];

    fn bind(&self) -> BindingMap {
        [
            entry("CLASS_NAME", &self.class_name),
            entry("FIXTURE_NAME", &self.fixture_name),
            entry("TEST_ASSERTIONS", &self.assertions),
        ]
        .into_iter()
        .collect()
    }
}

/// One unit-test assertion on a property's runtime type.
#[derive(Debug, Clone, Default)]
pub struct UnitTestAssertionBindings {
    /// Class under test.
    pub class_name: String,
    /// Normalized property name.
    pub property_name: String,
    /// Expected runtime type.
    pub use_type: String,
}

impl TemplateShape for UnitTestAssertionBindings {
    const KEYS: &'static [&'static str] = &["CLASS_NAME", "PROPERTY_NAME", "PROPERTY_TYPE"];

    fn bind(&self) -> BindingMap {
        [
            entry("CLASS_NAME", &self.class_name),
            entry("PROPERTY_NAME", &self.property_name),
            entry("PROPERTY_TYPE", &self.use_type),
        ]
        .into_iter()
        .collect()
    }
}
