//! JSON loader for ontology dumps produced by the external ontology parser.
//!
//! The dump lists classes with their properties and calls; object
//! properties name their target class by IRI. Loading resolves those IRIs
//! into [`ClassId`] indices of the arena.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::model::{
    ApiCall, CallCategory, ClassId, CodedValue, DataProperty, Enumeration, HttpMethod,
    ObjectProperty, OntologyClass,
};
use crate::Ontology;

/// Errors raised while loading an ontology dump.
#[derive(Debug, Error)]
pub enum OntologyError {
    /// The dump file could not be read.
    #[error("failed to read ontology dump {path}: {source}")]
    Read {
        /// Path of the dump.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The dump is not valid JSON or does not match the expected shape.
    #[error("malformed ontology dump: {0}")]
    Malformed(#[from] serde_json::Error),
    /// Two classes share an IRI.
    #[error("duplicate class IRI in ontology dump: {0}")]
    DuplicateClass(String),
    /// A call declares an HTTP method we do not know.
    #[error("unknown HTTP method {method:?} on call {path}")]
    UnknownMethod {
        /// The offending method token.
        method: String,
        /// Path of the call.
        path: String,
    },
}

#[derive(Debug, Deserialize)]
struct RawOntology {
    #[serde(default)]
    version: String,
    #[serde(default)]
    classes: Vec<RawClass>,
}

#[derive(Debug, Deserialize)]
struct RawClass {
    name: String,
    uri: String,
    #[serde(default)]
    object_properties: Vec<RawObjectProperty>,
    #[serde(default)]
    data_properties: Vec<RawDataProperty>,
    #[serde(default)]
    calls: Vec<RawCall>,
    #[serde(default)]
    base_path: Option<String>,
    #[serde(default)]
    example: Option<String>,
    #[serde(default)]
    equivalent_classes: Option<RawEnumeration>,
}

#[derive(Debug, Deserialize)]
struct RawObjectProperty {
    name: String,
    uri: String,
    #[serde(default)]
    multiple_cardinality: bool,
    to_class: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawDataProperty {
    name: String,
    uri: String,
    #[serde(default)]
    multiple_cardinality: bool,
}

#[derive(Debug, Deserialize)]
struct RawCall {
    path: String,
    #[serde(default)]
    category: String,
    #[serde(default = "default_method")]
    http_method: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawEnumeration {
    #[serde(default)]
    one_of: Vec<RawCodedValue>,
}

#[derive(Debug, Deserialize)]
struct RawCodedValue {
    uri: String,
    #[serde(default)]
    title: String,
}

fn default_method() -> String {
    "GET".to_string()
}

impl Ontology {
    /// Parses an ontology dump from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, a class IRI is declared
    /// twice, or a call uses an unknown HTTP method.
    pub fn from_json(json: &str) -> Result<Self, OntologyError> {
        let raw: RawOntology = serde_json::from_str(json)?;

        let mut ids: HashMap<String, ClassId> = HashMap::with_capacity(raw.classes.len());
        for (index, class) in raw.classes.iter().enumerate() {
            if ids.insert(class.uri.clone(), ClassId(index)).is_some() {
                return Err(OntologyError::DuplicateClass(class.uri.clone()));
            }
        }

        let mut classes = Vec::with_capacity(raw.classes.len());
        for class in raw.classes {
            classes.push(convert_class(class, &ids)?);
        }

        Ok(Ontology {
            version: raw.version,
            classes,
        })
    }

    /// Reads and parses an ontology dump from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails to parse.
    pub fn load(path: &Path) -> Result<Self, OntologyError> {
        let json = std::fs::read_to_string(path).map_err(|source| OntologyError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }
}

fn convert_class(
    raw: RawClass,
    ids: &HashMap<String, ClassId>,
) -> Result<OntologyClass, OntologyError> {
    let object_properties = raw
        .object_properties
        .into_iter()
        .map(|prop| {
            let to_class = prop.to_class.as_deref().and_then(|uri| {
                let id = ids.get(uri).copied();
                if id.is_none() {
                    warn!("{} references unknown class {uri}", prop.uri);
                }
                id
            });
            ObjectProperty {
                name: prop.name,
                uri: prop.uri,
                multiple_cardinality: prop.multiple_cardinality,
                to_class,
            }
        })
        .collect();

    let data_properties = raw
        .data_properties
        .into_iter()
        .map(|prop| DataProperty {
            name: prop.name,
            uri: prop.uri,
            multiple_cardinality: prop.multiple_cardinality,
        })
        .collect();

    let mut calls = Vec::with_capacity(raw.calls.len());
    for call in raw.calls {
        let http_method =
            HttpMethod::parse(&call.http_method).ok_or_else(|| OntologyError::UnknownMethod {
                method: call.http_method.clone(),
                path: call.path.clone(),
            })?;
        calls.push(ApiCall {
            category: CallCategory::parse(&call.category),
            http_method,
            path: call.path,
            description: call.description,
            name: call.name,
        });
    }

    let equivalent_classes = raw.equivalent_classes.map(|e| Enumeration {
        one_of: e
            .one_of
            .into_iter()
            .map(|v| CodedValue {
                uri: v.uri,
                title: v.title,
            })
            .collect(),
    });

    Ok(OntologyClass {
        name: raw.name,
        uri: raw.uri,
        object_properties,
        data_properties,
        calls,
        base_path: raw.base_path.filter(|p| !p.is_empty()),
        example: raw.example,
        equivalent_classes,
    })
}
