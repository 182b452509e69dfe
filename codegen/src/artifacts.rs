//! Cross-class artifacts: record-calls category, combined unit tests and
//! the import manifest.
//!
//! These render text only; writing is left to the orchestrator.

use std::collections::{BTreeMap, BTreeSet};

use crate::bindings::{
    CategoryBindings, FileMetadata, ForwardBindings, ImportBindings, ManifestBindings,
    UnitTestFileBindings, UnitTestMethodBindings,
};
use crate::calls::RecordCall;
use crate::descriptor::ClassDescriptor;
use crate::template::{TemplateError, TemplateName, TemplateSet};

/// A rendered declaration/definition pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPair {
    /// Base file name without extension.
    pub stem: String,
    /// Declaration text.
    pub header: String,
    /// Definition text.
    pub implementation: String,
}

/// Unit-test methods collected per class, ordered by class name.
#[derive(Debug, Default)]
pub struct UnitTestSuite {
    methods: BTreeMap<String, String>,
}

impl UnitTestSuite {
    /// Creates an empty suite.
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders and stores the test method for `descriptor`'s example.
    /// Does nothing for classes without an example.
    ///
    /// # Errors
    ///
    /// Propagates template rendering errors.
    pub fn add(
        &mut self,
        descriptor: &ClassDescriptor,
        fixture_name: &str,
        templates: &TemplateSet,
    ) -> Result<(), TemplateError> {
        if descriptor.example_payload.is_none() {
            return Ok(());
        }
        let method = templates.render(
            TemplateName::UnitTestMethod,
            &UnitTestMethodBindings {
                class_name: descriptor.class_name.clone(),
                fixture_name: fixture_name.to_string(),
                assertions: descriptor.unit_test_assertions.join("\n"),
            },
        )?;
        self.methods.insert(descriptor.class_name.clone(), method);
        Ok(())
    }

    /// Number of test methods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Whether the suite has no test methods.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Renders the combined test case files.
    ///
    /// # Errors
    ///
    /// Propagates template rendering errors.
    pub fn render(
        &self,
        test_class_name: &str,
        templates: &TemplateSet,
        meta: &FileMetadata,
    ) -> Result<RenderedPair, TemplateError> {
        let imports = render_imports(self.methods.keys().map(String::as_str), templates)?;
        let bindings = UnitTestFileBindings {
            test_class_name: test_class_name.to_string(),
            imports,
            methods: self
                .methods
                .values()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join("\n"),
            meta: meta.clone(),
        };
        Ok(RenderedPair {
            stem: test_class_name.to_string(),
            header: templates.render(TemplateName::UnitTestHeader, &bindings)?,
            implementation: templates.render(TemplateName::UnitTestImplementation, &bindings)?,
        })
    }
}

/// Renders the category that adds record-level calls to `record_class`.
///
/// `calls` must already be sorted and unique by method name.
///
/// # Errors
///
/// Propagates template rendering errors.
pub fn render_record_calls(
    record_class: &str,
    category_name: &str,
    calls: &[RecordCall],
    templates: &TemplateSet,
    meta: &FileMetadata,
) -> Result<RenderedPair, TemplateError> {
    let item_types: BTreeSet<&str> = calls
        .iter()
        .map(|call| call.item_type.as_str())
        .filter(|item| *item != record_class)
        .collect();
    let forwards = if item_types.is_empty() {
        String::new()
    } else {
        templates.render(
            TemplateName::ForwardDeclaration,
            &ForwardBindings {
                class_names: item_types.into_iter().collect::<Vec<_>>().join(", "),
            },
        )?
    };

    let mut declarations = Vec::with_capacity(calls.len());
    let mut methods = Vec::with_capacity(calls.len());
    for call in calls {
        declarations.push(call.render_declaration(templates)?);
        methods.push(call.render_body(templates)?);
    }

    let bindings = CategoryBindings {
        class_name: record_class.to_string(),
        category_name: category_name.to_string(),
        forwards,
        declarations: declarations.join("\n"),
        methods: methods.join("\n"),
        meta: meta.clone(),
    };
    Ok(RenderedPair {
        stem: format!("{record_class}+{category_name}"),
        header: templates.render(TemplateName::CategoryHeader, &bindings)?,
        implementation: templates.render(TemplateName::CategoryImplementation, &bindings)?,
    })
}

/// Renders the manifest importing every name in `names` (sorted, unique).
///
/// # Errors
///
/// Propagates template rendering errors.
pub fn render_manifest<'n>(
    names: impl IntoIterator<Item = &'n str>,
    templates: &TemplateSet,
    meta: &FileMetadata,
) -> Result<String, TemplateError> {
    let imports = render_imports(names, templates)?;
    templates.render(
        TemplateName::Manifest,
        &ManifestBindings {
            imports,
            meta: meta.clone(),
        },
    )
}

fn render_imports<'n>(
    names: impl IntoIterator<Item = &'n str>,
    templates: &TemplateSet,
) -> Result<String, TemplateError> {
    let unique: BTreeSet<&str> = names.into_iter().collect();
    let lines = unique
        .into_iter()
        .map(|class_name| {
            templates.render(
                TemplateName::ImportLine,
                &ImportBindings {
                    class_name: class_name.to_string(),
                },
            )
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(lines.join("\n"))
}
