//! Generator configuration.
//!
//! Every field has a default matching the SMART Objective-C framework, so
//! a configuration file only needs to list what it changes:
//!
//! ```toml
//! class_prefix = "SM"
//! output_dir = "SMARTFramework/GeneratedClasses"
//! ignore_uris = ["http://smartplatforms.org/terms#Component"]
//! generated_on = "2012-10-01"
//! ```

use std::path::{Path, PathBuf};

use chrono::{Datelike, Local, NaiveDate};
use serde::Deserialize;
use smart_ontology::model::iris::{SP_CODES, SP_CODED_VALUE};

use crate::bindings::FileMetadata;
use crate::error::{CodegenError, Result};
use crate::naming::NamingPolicy;
use crate::template::UnboundPlaceholders;

/// Configuration for one generation run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Prefix prepended to every generated class name.
    pub class_prefix: String,
    /// Drop one-character name fragments when normalizing identifiers.
    pub drop_single_char_fragments: bool,
    /// Directory holding the templates.
    pub template_dir: PathBuf,
    /// Directory for class files, the record-calls category and the manifest.
    pub output_dir: PathBuf,
    /// Directory for example payload fixtures.
    pub fixtures_dir: PathBuf,
    /// Directory for the combined unit-test files.
    pub tests_dir: PathBuf,
    /// Rewrite files that already exist.
    pub overwrite: bool,
    /// Handling of template placeholders no binding supplies.
    pub unbound_placeholders: UnboundPlaceholders,
    /// Class IRIs never generated.
    pub ignore_uris: Vec<String>,
    /// Class names never generated. Deprecated: names collide across
    /// namespaces, prefer `ignore_uris`.
    pub ignore_names: Vec<String>,
    /// Namespace roots that are never classes themselves.
    pub reserved_namespaces: Vec<String>,
    /// Classes under this namespace collapse into the coded-value type.
    pub codes_namespace: String,
    /// IRI of the class every coded value collapses into.
    pub coded_value_class: String,
    /// Superclass of classes with a REST base path.
    pub document_superclass: String,
    /// Superclass of every other class.
    pub object_superclass: String,
    /// Type used for data properties.
    pub literal_type: String,
    /// Type used for multi-valued properties.
    pub collection_type: String,
    /// Class extended by the record-calls category.
    pub record_class: String,
    /// Name of the record-calls category.
    pub record_category: String,
    /// Ontology source named in file headers.
    pub ontology_path: String,
    /// Generator identification for file headers.
    pub author: String,
    /// Generation date (`YYYY-MM-DD`); today when unset. Pin it for
    /// byte-identical output across days.
    pub generated_on: Option<String>,
    /// Extension of example fixture files.
    pub fixture_extension: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            class_prefix: "SM".to_string(),
            drop_single_char_fragments: false,
            template_dir: PathBuf::from("SMARTFramework/Templates"),
            output_dir: PathBuf::from("SMARTFramework/GeneratedClasses"),
            fixtures_dir: PathBuf::from("SMARTFrameworkTests/Fixtures"),
            tests_dir: PathBuf::from("SMARTFrameworkTests"),
            overwrite: false,
            unbound_placeholders: UnboundPlaceholders::Reject,
            ignore_uris: Vec::new(),
            ignore_names: Vec::new(),
            reserved_namespaces: vec![SP_CODES.to_string()],
            codes_namespace: SP_CODES.to_string(),
            coded_value_class: SP_CODED_VALUE.to_string(),
            document_superclass: "SMDocument".to_string(),
            object_superclass: "SMObject".to_string(),
            literal_type: "NSString".to_string(),
            collection_type: "NSArray".to_string(),
            record_class: "SMRecord".to_string(),
            record_category: "Calls".to_string(),
            ontology_path: "smart.owl".to_string(),
            author: "smart-objc".to_string(),
            generated_on: None,
            fixture_extension: "rdf".to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or names unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails to parse.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| CodegenError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks values serde cannot check.
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError::ConfigValue`] for an empty class prefix or an
    /// unparsable `generated_on` date.
    pub fn validate(&self) -> Result<()> {
        if self.class_prefix.is_empty() {
            return Err(CodegenError::ConfigValue {
                key: "class_prefix",
                message: "must not be empty".to_string(),
            });
        }
        self.generation_date().map(|_| ())
    }

    /// The naming policy this configuration describes.
    #[must_use]
    pub fn naming(&self) -> NamingPolicy {
        NamingPolicy {
            prefix: self.class_prefix.clone(),
            drop_single_char_fragments: self.drop_single_char_fragments,
        }
    }

    /// The date stamped into generated files.
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError::ConfigValue`] if `generated_on` is not a
    /// `YYYY-MM-DD` date.
    pub fn generation_date(&self) -> Result<NaiveDate> {
        match &self.generated_on {
            Some(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|err| {
                CodegenError::ConfigValue {
                    key: "generated_on",
                    message: format!("{text:?}: {err}"),
                }
            }),
            None => Ok(Local::now().date_naive()),
        }
    }

    /// Header metadata for generated files.
    ///
    /// # Errors
    ///
    /// Returns an error if the generation date is invalid.
    pub fn file_metadata(&self) -> Result<FileMetadata> {
        let date = self.generation_date()?;
        Ok(FileMetadata {
            author: self.author.clone(),
            date: date.format("%Y-%m-%d").to_string(),
            year: date.year().to_string(),
            ontology_path: self.ontology_path.clone(),
        })
    }
}
