//! Template store and renderer.
//!
//! Templates are plain text files holding `{{ KEY }}` placeholders. Only
//! flat substitution is supported: no conditionals, loops or nesting.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::bindings::TemplateShape;

/// Key → value mapping substituted into a template. A `None` value renders
/// as the empty string.
pub type BindingMap = BTreeMap<String, Option<String>>;

/// Errors raised while loading or rendering templates.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The template file does not exist.
    #[error("template {name} not found at {}", path.display())]
    NotFound {
        /// Template file name.
        name: String,
        /// Resolved path.
        path: PathBuf,
    },
    /// The template file exists but could not be read.
    #[error("failed to read template {}: {source}", path.display())]
    Read {
        /// Resolved path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A template uses a placeholder its binding shape never supplies.
    #[error("template {template} uses unknown placeholder {{{{ {key} }}}}")]
    UnknownPlaceholder {
        /// Template file name.
        template: &'static str,
        /// The unknown key.
        key: String,
    },
    /// Rendering left placeholders without a binding.
    #[error("template {template} has unbound placeholders: {}", keys.join(", "))]
    Unbound {
        /// Template file name.
        template: &'static str,
        /// The unbound keys.
        keys: Vec<String>,
    },
}

/// What to do with placeholders that no binding supplies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnboundPlaceholders {
    /// Unknown placeholders fail the template load.
    #[default]
    Reject,
    /// Unknown placeholders are warned about once and stripped on render.
    Strip,
}

/// Every template the generator reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TemplateName {
    /// Class declaration file.
    ClassHeader,
    /// Class definition file.
    ClassImplementation,
    /// Category declaration file.
    CategoryHeader,
    /// Category definition file.
    CategoryImplementation,
    /// Combined unit-test declaration file.
    UnitTestHeader,
    /// Combined unit-test definition file.
    UnitTestImplementation,
    /// Import manifest.
    Manifest,
    /// Forward declaration of dependent classes.
    ForwardDeclaration,
    /// One import line of the manifest or unit tests.
    ImportLine,
    /// Property declaration.
    PropertyDeclaration,
    /// Getter for a single object value.
    GetterSingleObject,
    /// Getter for a collection of objects.
    GetterMultiObject,
    /// Getter for a single literal.
    GetterSingleLiteral,
    /// Getter for a collection of literals.
    GetterMultiLiteral,
    /// Class-level REST base path accessor.
    BasePathAccessor,
    /// Comment listing the valid codes of a coded property.
    CodedValuesComment,
    /// Declaration of a record-level call method.
    RecordGetterDeclaration,
    /// Body of a record-level GET call.
    RecordGetter,
    /// Body of a record-level POST call.
    RecordPoster,
    /// One unit-test method.
    UnitTestMethod,
    /// One unit-test assertion.
    UnitTestAssertion,
}

impl TemplateName {
    /// All templates, in load order.
    pub const ALL: [TemplateName; 21] = [
        TemplateName::ClassHeader,
        TemplateName::ClassImplementation,
        TemplateName::CategoryHeader,
        TemplateName::CategoryImplementation,
        TemplateName::UnitTestHeader,
        TemplateName::UnitTestImplementation,
        TemplateName::Manifest,
        TemplateName::ForwardDeclaration,
        TemplateName::ImportLine,
        TemplateName::PropertyDeclaration,
        TemplateName::GetterSingleObject,
        TemplateName::GetterMultiObject,
        TemplateName::GetterSingleLiteral,
        TemplateName::GetterMultiLiteral,
        TemplateName::BasePathAccessor,
        TemplateName::CodedValuesComment,
        TemplateName::RecordGetterDeclaration,
        TemplateName::RecordGetter,
        TemplateName::RecordPoster,
        TemplateName::UnitTestMethod,
        TemplateName::UnitTestAssertion,
    ];

    /// File name inside the template directory.
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            TemplateName::ClassHeader => "ClassTemplate.h",
            TemplateName::ClassImplementation => "ClassTemplate.m",
            TemplateName::CategoryHeader => "CategoryTemplate.h",
            TemplateName::CategoryImplementation => "CategoryTemplate.m",
            TemplateName::UnitTestHeader => "UnitTestTemplate.h",
            TemplateName::UnitTestImplementation => "UnitTestTemplate.m",
            TemplateName::Manifest => "Manifest.h",
            TemplateName::ForwardDeclaration => "ForwardDeclaration.txt",
            TemplateName::ImportLine => "ImportLine.txt",
            TemplateName::PropertyDeclaration => "PropertyDeclaration.txt",
            TemplateName::GetterSingleObject => "GetterSingleObject.txt",
            TemplateName::GetterMultiObject => "GetterMultiObject.txt",
            TemplateName::GetterSingleLiteral => "GetterSingleLiteral.txt",
            TemplateName::GetterMultiLiteral => "GetterMultiLiteral.txt",
            TemplateName::BasePathAccessor => "BasePathAccessor.txt",
            TemplateName::CodedValuesComment => "CodedValuesComment.txt",
            TemplateName::RecordGetterDeclaration => "RecordGetterDeclaration.txt",
            TemplateName::RecordGetter => "RecordGetter.txt",
            TemplateName::RecordPoster => "RecordPoster.txt",
            TemplateName::UnitTestMethod => "UnitTestMethod.txt",
            TemplateName::UnitTestAssertion => "UnitTestAssertion.txt",
        }
    }

    /// Keys the binding shape of this template supplies.
    #[must_use]
    pub fn keys(self) -> &'static [&'static str] {
        use crate::bindings::*;
        match self {
            TemplateName::ClassHeader | TemplateName::ClassImplementation => ClassBindings::KEYS,
            TemplateName::CategoryHeader | TemplateName::CategoryImplementation => {
                CategoryBindings::KEYS
            }
            TemplateName::UnitTestHeader | TemplateName::UnitTestImplementation => {
                UnitTestFileBindings::KEYS
            }
            TemplateName::Manifest => ManifestBindings::KEYS,
            TemplateName::ForwardDeclaration => ForwardBindings::KEYS,
            TemplateName::ImportLine => ImportBindings::KEYS,
            TemplateName::PropertyDeclaration => PropertyBindings::KEYS,
            TemplateName::GetterSingleObject
            | TemplateName::GetterMultiObject
            | TemplateName::GetterSingleLiteral
            | TemplateName::GetterMultiLiteral => GetterBindings::KEYS,
            TemplateName::BasePathAccessor => BasePathBindings::KEYS,
            TemplateName::CodedValuesComment => CodedValuesBindings::KEYS,
            TemplateName::RecordGetterDeclaration
            | TemplateName::RecordGetter
            | TemplateName::RecordPoster => RecordCallBindings::KEYS,
            TemplateName::UnitTestMethod => UnitTestMethodBindings::KEYS,
            TemplateName::UnitTestAssertion => UnitTestAssertionBindings::KEYS,
        }
    }
}

/// Loads templates from a directory.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    dir: PathBuf,
}

impl TemplateStore {
    /// Creates a store reading from `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Reads one template file.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::NotFound`] if the file does not exist, or
    /// [`TemplateError::Read`] if it cannot be read.
    pub fn load(&self, file_name: &str) -> Result<String, TemplateError> {
        let path = self.dir.join(file_name);
        if !path.is_file() {
            error!("The template {file_name} could not be found at {}", path.display());
            return Err(TemplateError::NotFound {
                name: file_name.to_string(),
                path,
            });
        }
        std::fs::read_to_string(&path).map_err(|source| TemplateError::Read { path, source })
    }

    /// Loads and checks every template the generator needs.
    ///
    /// # Errors
    ///
    /// Fails on the first missing template. With
    /// [`UnboundPlaceholders::Reject`], also fails when a template uses a
    /// placeholder its binding shape does not supply.
    pub fn load_all(&self, policy: UnboundPlaceholders) -> Result<TemplateSet, TemplateError> {
        let mut templates = BTreeMap::new();
        for name in TemplateName::ALL {
            let text = self.load(name.file_name())?;
            let template = Template { name, text };
            for key in template.unknown_placeholders() {
                match policy {
                    UnboundPlaceholders::Reject => {
                        return Err(TemplateError::UnknownPlaceholder {
                            template: name.file_name(),
                            key,
                        })
                    }
                    UnboundPlaceholders::Strip => {
                        warn!(
                            "{} uses unknown placeholder {{{{ {key} }}}}, it will render empty",
                            name.file_name()
                        );
                    }
                }
            }
            debug!("Loaded template {}", name.file_name());
            templates.insert(name, template);
        }
        Ok(TemplateSet { templates, policy })
    }
}

/// One loaded template.
#[derive(Debug, Clone)]
pub struct Template {
    /// Which template this is.
    pub name: TemplateName,
    /// Raw template text.
    pub text: String,
}

impl Template {
    /// Returns the placeholder keys used by this template.
    pub fn placeholders(&self) -> BTreeSet<String> {
        placeholders(&self.text)
    }

    /// Returns the placeholders that the template's binding shape does not supply.
    pub fn unknown_placeholders(&self) -> Vec<String> {
        let known = self.name.keys();
        self.placeholders()
            .into_iter()
            .filter(|key| !known.contains(&key.as_str()))
            .collect()
    }
}

/// The full, checked set of templates for one generation run.
#[derive(Debug, Clone)]
pub struct TemplateSet {
    templates: BTreeMap<TemplateName, Template>,
    policy: UnboundPlaceholders,
}

impl TemplateSet {
    /// Builds a set from in-memory texts. Missing names are simply absent
    /// and render as empty strings.
    pub fn from_texts(
        texts: impl IntoIterator<Item = (TemplateName, String)>,
        policy: UnboundPlaceholders,
    ) -> Self {
        let templates = texts
            .into_iter()
            .map(|(name, text)| (name, Template { name, text }))
            .collect();
        Self { templates, policy }
    }

    /// Returns the template with the given name.
    #[must_use]
    pub fn get(&self, name: TemplateName) -> Option<&Template> {
        self.templates.get(&name)
    }

    /// Renders template `name` with the bindings of `shape`.
    ///
    /// # Errors
    ///
    /// With [`UnboundPlaceholders::Reject`], returns
    /// [`TemplateError::Unbound`] if any placeholder is left unbound.
    pub fn render<S: TemplateShape>(
        &self,
        name: TemplateName,
        shape: &S,
    ) -> Result<String, TemplateError> {
        let Some(template) = self.templates.get(&name) else {
            return Ok(String::new());
        };
        let bindings = shape.bind();
        match self.policy {
            UnboundPlaceholders::Reject => render_strict(&template.text, &bindings).map_err(
                |keys| TemplateError::Unbound {
                    template: name.file_name(),
                    keys,
                },
            ),
            UnboundPlaceholders::Strip => Ok(render(&template.text, &bindings)),
        }
    }
}

#[allow(clippy::expect_used)]
fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    // Constant pattern; cannot fail to compile.
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\{\{\s*([^{}]*?)\s*\}\}").expect("valid placeholder regex")
    })
}

/// Returns every placeholder key in `text`.
pub fn placeholders(text: &str) -> BTreeSet<String> {
    placeholder_regex()
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Substitutes `bindings` into `template`.
///
/// Bound keys are replaced by their value (`None` renders empty); any
/// placeholder left without a binding is stripped. Substituted values are
/// not scanned again.
pub fn render(template: &str, bindings: &BindingMap) -> String {
    placeholder_regex()
        .replace_all(template, |caps: &Captures<'_>| {
            bindings
                .get(&caps[1])
                .and_then(|value| value.clone())
                .unwrap_or_default()
        })
        .into_owned()
}

/// Like [`render`], but fails with the unbound keys instead of stripping them.
///
/// # Errors
///
/// Returns the sorted list of placeholder keys that have no binding.
pub fn render_strict(template: &str, bindings: &BindingMap) -> Result<String, Vec<String>> {
    let unbound: Vec<String> = placeholders(template)
        .into_iter()
        .filter(|key| !bindings.contains_key(key))
        .collect();
    if unbound.is_empty() {
        Ok(render(template, bindings))
    } else {
        Err(unbound)
    }
}
