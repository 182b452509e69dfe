//! Core ontology model types.
//!
//! These types represent a parsed SMART ontology as owned Rust data. Classes
//! live in a single arena ([`Ontology::classes`](crate::Ontology)) and refer to
//! each other through [`ClassId`] indices, so cyclic class references are
//! plain data rather than shared pointers.

use std::fmt;

/// Index of a class in the ontology arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassId(pub usize);

/// An ontology class: a domain entity type with properties and API calls.
#[derive(Debug, Clone)]
pub struct OntologyClass {
    /// Human-readable class name (e.g., `"Allergy"`).
    pub name: String,
    /// Full IRI (e.g., `"http://smartplatforms.org/terms#Allergy"`).
    pub uri: String,
    /// Properties whose values are instances of other classes.
    pub object_properties: Vec<ObjectProperty>,
    /// Properties whose values are literals.
    pub data_properties: Vec<DataProperty>,
    /// REST operations attached to this class.
    pub calls: Vec<ApiCall>,
    /// REST path template under which instances are addressable.
    pub base_path: Option<String>,
    /// Serialized example payload.
    pub example: Option<String>,
    /// Closed enumeration of coded values equivalent to this class.
    pub equivalent_classes: Option<Enumeration>,
}

impl OntologyClass {
    /// Returns a class with the given name and IRI and nothing else.
    pub fn new(name: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uri: uri.into(),
            object_properties: Vec::new(),
            data_properties: Vec::new(),
            calls: Vec::new(),
            base_path: None,
            example: None,
            equivalent_classes: None,
        }
    }

    /// Returns the example payload if it holds anything but whitespace.
    #[must_use]
    pub fn non_empty_example(&self) -> Option<&str> {
        self.example
            .as_deref()
            .filter(|example| !example.trim().is_empty())
    }
}

/// A property relating a class to another class.
#[derive(Debug, Clone)]
pub struct ObjectProperty {
    /// Property name as declared in the ontology.
    pub name: String,
    /// Full IRI.
    pub uri: String,
    /// Whether the property holds a collection rather than one value.
    pub multiple_cardinality: bool,
    /// Target class, or `None` if the target is not part of the ontology.
    pub to_class: Option<ClassId>,
}

/// A property relating a class to a literal.
#[derive(Debug, Clone)]
pub struct DataProperty {
    /// Property name as declared in the ontology.
    pub name: String,
    /// Full IRI.
    pub uri: String,
    /// Whether the property holds a collection rather than one value.
    pub multiple_cardinality: bool,
}

/// A closed set of coded values (`owl:oneOf`).
#[derive(Debug, Clone, Default)]
pub struct Enumeration {
    /// The enumerated members, in declaration order.
    pub one_of: Vec<CodedValue>,
}

/// One member of a coded-value enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodedValue {
    /// IRI of the code.
    pub uri: String,
    /// Human-readable title.
    pub title: String,
}

/// Scope of an API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallCategory {
    /// Operates on a single record (`/records/{record_id}/...`).
    Record,
    /// Operates across records or on the container.
    Container,
    /// Any other category string.
    Other(String),
}

impl CallCategory {
    /// Parses a category label. Only the prefix before `_` is significant
    /// (`"record_items"` is record-scoped).
    pub fn parse(label: &str) -> Self {
        let scope = label.split('_').next().unwrap_or(label);
        match scope.to_ascii_lowercase().as_str() {
            "record" => CallCategory::Record,
            "container" => CallCategory::Container,
            _ => CallCategory::Other(label.to_string()),
        }
    }
}

/// HTTP method of an API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
}

impl HttpMethod {
    /// Returns the upper-case method token.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Parses a method token case-insensitively.
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_uppercase().as_str() {
            "GET" => Some(HttpMethod::Get),
            "POST" => Some(HttpMethod::Post),
            "PUT" => Some(HttpMethod::Put),
            "DELETE" => Some(HttpMethod::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A REST operation attached to a class.
#[derive(Debug, Clone)]
pub struct ApiCall {
    /// Path template with `{placeholder}` tokens.
    pub path: String,
    /// Scope of the call.
    pub category: CallCategory,
    /// HTTP method.
    pub http_method: HttpMethod,
    /// Free-text description.
    pub description: String,
    /// Explicit call name, if the ontology declares one.
    pub name: Option<String>,
}

impl ApiCall {
    /// Returns the placeholder names in `path`, in order of appearance.
    pub fn placeholders(&self) -> Vec<&str> {
        self.path
            .split('{')
            .skip(1)
            .filter_map(|rest| rest.split_once('}').map(|(name, _)| name))
            .collect()
    }

    /// Derives a snake_case name for this call.
    ///
    /// Uses the declared name if there is one. Otherwise the name is the
    /// lower-cased HTTP method followed by the last literal path segment,
    /// singularised when the path ends in a placeholder:
    /// `GET /records/{record_id}/allergies/{allergy_id}` → `get_allergy`.
    pub fn guess_name(&self) -> String {
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            return name.to_string();
        }

        let segments: Vec<&str> = self.path.split('/').filter(|s| !s.is_empty()).collect();
        let ends_in_placeholder = segments.last().is_some_and(|s| s.starts_with('{'));
        let noun = segments
            .iter()
            .rev()
            .find(|s| !s.starts_with('{'))
            .map(|s| s.replace(['-', '.'], "_"))
            .unwrap_or_default();

        let noun = if ends_in_placeholder {
            singularize(&noun)
        } else {
            noun
        };
        let method = self.http_method.as_str().to_ascii_lowercase();
        if noun.is_empty() {
            method
        } else {
            format!("{method}_{noun}")
        }
    }
}

/// Strips a plural suffix: `allergies` → `allergy`, `problems` → `problem`.
fn singularize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies") {
        format!("{stem}y")
    } else if word.ends_with("ss") {
        word.to_string()
    } else if let Some(stem) = word.strip_suffix('s') {
        stem.to_string()
    } else {
        word.to_string()
    }
}

/// Standard IRI constants for the SMART vocabulary.
pub mod iris {
    /// SMART coded-value namespace.
    pub const SP_CODES: &str = "http://smartplatforms.org/terms/codes/";
    /// `sp:CodedValue`, the class every coded value collapses to.
    pub const SP_CODED_VALUE: &str = "http://smartplatforms.org/terms#CodedValue";
}
