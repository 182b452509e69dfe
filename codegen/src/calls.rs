//! API call classification.
//!
//! Record-scoped calls are bucketed by the placeholders in their path:
//!
//! | Placeholders                        | Bucket               |
//! |-------------------------------------|----------------------|
//! | `{record_id}`                       | record-level getter  |
//! | `{record_id}`, `{<item>_id}`        | single-item getter   |
//! | anything else                       | other                |
//!
//! Only record-level getters are rendered (into the record-calls category).
//! Single-item getters and other calls are collected and counted but have
//! no output yet.

use smart_ontology::{ApiCall, CallCategory, HttpMethod};

use crate::bindings::RecordCallBindings;
use crate::naming::NamingPolicy;
use crate::template::{TemplateError, TemplateName, TemplateSet};

/// The placeholder every record-scoped path starts with.
pub const RECORD_ID: &str = "record_id";

/// Marker that replaces each path placeholder in rendered calls.
pub const POSITIONAL_MARKER: &str = "%@";

/// Rendering shape of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CallShape {
    /// Fetches items.
    Getter,
    /// Sends a document. Rendered as a stub until posting is supported.
    Poster,
}

impl CallShape {
    /// Chooses the shape for an HTTP method.
    #[must_use]
    pub fn for_method(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Post => CallShape::Poster,
            _ => CallShape::Getter,
        }
    }

    /// Template for the method body.
    #[must_use]
    pub fn template(self) -> TemplateName {
        match self {
            CallShape::Getter => TemplateName::RecordGetter,
            CallShape::Poster => TemplateName::RecordPoster,
        }
    }
}

/// A call parameterized only by the record id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RecordCall {
    /// Normalized method name, e.g. `getAllergies`.
    pub method_name: String,
    /// HTTP method.
    pub http_method: HttpMethod,
    /// Class of the returned items.
    pub item_type: String,
    /// Path with placeholders replaced by [`POSITIONAL_MARKER`].
    pub path: String,
    /// Call description.
    pub description: String,
}

impl RecordCall {
    /// Rendering shape of this call.
    #[must_use]
    pub fn shape(&self) -> CallShape {
        CallShape::for_method(self.http_method)
    }

    fn bindings(&self) -> RecordCallBindings {
        RecordCallBindings {
            method_name: self.method_name.clone(),
            http_method: self.http_method.as_str().to_string(),
            item_type: self.item_type.clone(),
            path: self.path.clone(),
            description: self.description.clone(),
        }
    }

    /// Renders the method declaration.
    ///
    /// # Errors
    ///
    /// Propagates template rendering errors.
    pub fn render_declaration(&self, templates: &TemplateSet) -> Result<String, TemplateError> {
        templates.render(TemplateName::RecordGetterDeclaration, &self.bindings())
    }

    /// Renders the method body with the template of its [`CallShape`].
    ///
    /// # Errors
    ///
    /// Propagates template rendering errors.
    pub fn render_body(&self, templates: &TemplateSet) -> Result<String, TemplateError> {
        templates.render(self.shape().template(), &self.bindings())
    }
}

/// A call fetching one item of a record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ItemCall {
    /// Normalized method name, e.g. `getAllergy`.
    pub method_name: String,
    /// HTTP method.
    pub http_method: HttpMethod,
    /// Class of the returned item.
    pub item_type: String,
    /// Name of the item id placeholder, e.g. `allergy_id`.
    pub id_placeholder: String,
    /// Path with placeholders replaced by [`POSITIONAL_MARKER`].
    pub path: String,
}

/// Any other record-scoped call, described as a method with named arguments.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct OtherCall {
    /// Normalized method name.
    pub method_name: String,
    /// HTTP method.
    pub http_method: HttpMethod,
    /// Class owning the call.
    pub owner_type: String,
    /// One string argument per non-`record_id` placeholder, normalized.
    pub arguments: Vec<String>,
    /// Original path template.
    pub path: String,
}

impl OtherCall {
    /// Method name with its arguments, e.g. `getResultWithPanelId:resultId:`.
    #[must_use]
    pub fn signature(&self) -> String {
        let mut signature = self.method_name.clone();
        for (index, argument) in self.arguments.iter().enumerate() {
            if index == 0 {
                signature.push_str("With");
                signature.push_str(&crate::naming::capitalize(argument));
            } else {
                signature.push_str(argument);
            }
            signature.push(':');
        }
        signature
    }
}

/// Where a call ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallBucket {
    /// Not record-scoped; no accessor is synthesized.
    Ignored,
    /// Exactly `{record_id}`.
    RecordGetter(RecordCall),
    /// `{record_id}` followed by the item's own id.
    SingleItemGetter(ItemCall),
    /// Any other record-scoped shape.
    Other(OtherCall),
}

/// Buckets one call of the class named `owner_class_name`.
pub fn classify(owner_class_name: &str, call: &ApiCall, naming: &NamingPolicy) -> CallBucket {
    if call.category != CallCategory::Record {
        return CallBucket::Ignored;
    }

    let placeholders = call.placeholders();
    let guessed = call.guess_name();
    let method_name = naming
        .normalize_property_name(&guessed)
        .unwrap_or_else(|| guessed.clone());

    match placeholders.as_slice() {
        [only] if *only == RECORD_ID => CallBucket::RecordGetter(RecordCall {
            method_name,
            http_method: call.http_method,
            item_type: owner_class_name.to_string(),
            path: positional_path(&call.path),
            description: call.description.clone(),
        }),
        [first, second] if *first == RECORD_ID && is_item_id(&guessed, second) => {
            CallBucket::SingleItemGetter(ItemCall {
                method_name,
                http_method: call.http_method,
                item_type: owner_class_name.to_string(),
                id_placeholder: (*second).to_string(),
                path: positional_path(&call.path),
            })
        }
        _ => CallBucket::Other(OtherCall {
            method_name,
            http_method: call.http_method,
            owner_type: owner_class_name.to_string(),
            arguments: placeholders
                .iter()
                .filter(|p| **p != RECORD_ID)
                .map(|p| naming.normalize_property_name(p).unwrap_or_else(|| p.to_string()))
                .collect(),
            path: call.path.clone(),
        }),
    }
}

/// `get_allergy` + `allergy_id` → true.
fn is_item_id(guessed_name: &str, placeholder: &str) -> bool {
    let item = guessed_name.strip_prefix("get_").unwrap_or(guessed_name);
    placeholder == format!("{item}_id")
}

/// Replaces every `{placeholder}` with [`POSITIONAL_MARKER`].
fn positional_path(path: &str) -> String {
    let mut result = String::with_capacity(path.len());
    let mut remaining = path;
    while let Some(start) = remaining.find('{') {
        result.push_str(&remaining[..start]);
        match remaining[start..].find('}') {
            Some(end) => {
                result.push_str(POSITIONAL_MARKER);
                remaining = &remaining[start + end + 1..];
            }
            None => {
                remaining = &remaining[start..];
                break;
            }
        }
    }
    result.push_str(remaining);
    result
}
