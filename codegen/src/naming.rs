//! Ontology → target-language identifier mapping.
//!
//! Deterministic conversions from ontology names to class and property
//! identifiers.

use std::sync::OnceLock;

use regex::Regex;

/// How ontology names become identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingPolicy {
    /// Prepended to every class name (e.g. `"SM"`).
    pub prefix: String,
    /// Drop one-character fragments after splitting. Off by default since
    /// it mangles names like `blood_pressure_d` or single-letter acronyms.
    pub drop_single_char_fragments: bool,
}

impl NamingPolicy {
    /// Creates a policy with the given class prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            drop_single_char_fragments: false,
        }
    }

    /// Converts an ontology class name into a prefixed class identifier.
    ///
    /// `"allergy_status"` → `"SMAllergyStatus"`. Returns `None` for empty
    /// input or input with no alphanumeric content.
    pub fn normalize_type_name(&self, raw: &str) -> Option<String> {
        if raw.is_empty() {
            return None;
        }
        let base = if raw.chars().count() <= 1 {
            raw.to_uppercase()
        } else {
            self.camel_fragments(raw)
        };
        if base.is_empty() {
            return None;
        }
        Some(format!("{}{base}", self.prefix))
    }

    /// Converts an ontology property name into a lower-camel-case identifier.
    ///
    /// `"allergy_status"` → `"allergyStatus"`.
    pub fn normalize_property_name(&self, raw: &str) -> Option<String> {
        if raw.is_empty() {
            return None;
        }
        if raw.chars().count() <= 1 {
            return Some(raw.to_lowercase());
        }
        let joined = self.camel_fragments(raw);
        let mut chars = joined.chars();
        let first = chars.next()?;
        Some(format!("{}{}", first.to_lowercase(), chars.as_str()))
    }

    /// Splits on non-alphanumeric runs and title-cases each surviving fragment.
    fn camel_fragments(&self, raw: &str) -> String {
        fragment_separator()
            .split(raw)
            .filter(|part| !part.is_empty())
            .filter(|part| !(self.drop_single_char_fragments && part.chars().count() == 1))
            .map(capitalize)
            .collect()
    }
}

impl Default for NamingPolicy {
    fn default() -> Self {
        Self::new("SM")
    }
}

#[allow(clippy::expect_used)]
fn fragment_separator() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    // Constant pattern; cannot fail to compile.
    SEPARATOR.get_or_init(|| Regex::new(r"[^A-Za-z0-9]+").expect("valid separator regex"))
}

/// Upper-cases the first character, leaving the rest unchanged.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => {
            let mut result = c.to_uppercase().to_string();
            result.push_str(chars.as_str());
            result
        }
    }
}

/// Extracts the local name from a full IRI (after the last `/` or `#`).
pub fn local_name(iri: &str) -> &str {
    let after_slash = iri.rsplit('/').next().unwrap_or(iri);
    after_slash.rsplit('#').next().unwrap_or(after_slash)
}
