//! SMART ontology code generator.
//!
//! Walks a [`smart_ontology::Ontology`] and writes one Objective-C class per
//! ontology class, plus a category with every record-level API call, a
//! combined unit-test case for the example payloads and an import manifest.
//! All target-language text comes from templates; the crate itself only
//! decides names, types, ordering and which files to write.
//!
//! # Entry Point
//!
//! ```no_run
//! use smart_codegen::{generate, GeneratorConfig};
//!
//! let ontology = smart_ontology::Ontology::load("smart.json".as_ref())?;
//! let report = generate(&ontology, &GeneratorConfig::default())?;
//! println!("{} classes written", report.classes_written);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod artifacts;
pub mod bindings;
pub mod calls;
pub mod config;
pub mod descriptor;
pub mod emit;
pub mod error;
pub mod naming;
pub mod session;
pub mod template;

use std::path::{Path, PathBuf};

use smart_ontology::Ontology;
use tracing::{debug, info};

pub use config::GeneratorConfig;
pub use error::{CodegenError, Result};

use artifacts::{render_manifest, render_record_calls, RenderedPair, UnitTestSuite};
use bindings::FileMetadata;
use descriptor::{ClassDescriptor, DescriptorBuilder};
use emit::WriteOutcome;
use session::Session;
use template::{TemplateSet, TemplateStore};

/// Report of what was generated.
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Class descriptors built.
    pub class_count: usize,
    /// Class file pairs written.
    pub classes_written: usize,
    /// Class file pairs left untouched because they already existed.
    pub classes_skipped: usize,
    /// Record-level getters rendered into the record-calls category.
    pub record_getters: usize,
    /// Single-item getters classified (not rendered).
    pub single_item_getters: usize,
    /// Other record-scoped calls classified (not rendered).
    pub other_calls: usize,
    /// Example fixtures written.
    pub fixtures_written: usize,
    /// Test methods in the combined unit-test case.
    pub unit_tests: usize,
    /// Files written.
    pub files_written: Vec<PathBuf>,
    /// Files skipped because they already existed.
    pub files_skipped: Vec<PathBuf>,
}

impl GenerationReport {
    fn record(&mut self, outcome: WriteOutcome, paths: &[&Path]) {
        let target = match outcome {
            WriteOutcome::Written => &mut self.files_written,
            WriteOutcome::Skipped => &mut self.files_skipped,
        };
        target.extend(paths.iter().map(|path| path.to_path_buf()));
    }
}

/// Loads the templates named by `config` and runs [`generate_with`].
///
/// # Errors
///
/// Returns an error if a template is missing or inconsistent, an output
/// directory is not writable, or a file cannot be written.
pub fn generate(ontology: &Ontology, config: &GeneratorConfig) -> Result<GenerationReport> {
    let templates =
        TemplateStore::new(&config.template_dir).load_all(config.unbound_placeholders)?;
    generate_with(ontology, config, &templates)
}

/// Generates every output file for `ontology` using `templates`.
///
/// # Errors
///
/// Returns an error if an output directory is not writable, a file cannot
/// be written, or rendering fails under the strict placeholder policy.
pub fn generate_with(
    ontology: &Ontology,
    config: &GeneratorConfig,
    templates: &TemplateSet,
) -> Result<GenerationReport> {
    let meta = config.file_metadata()?;
    for dir in [&config.output_dir, &config.fixtures_dir, &config.tests_dir] {
        emit::ensure_writable_dir(dir)?;
    }

    let builder = DescriptorBuilder::new(ontology, config, templates);
    let mut session = Session::new();
    let mut suite = UnitTestSuite::new();
    let mut report = GenerationReport::default();

    // 1. Classes, including those first reached through a property
    for (id, _) in ontology.iter() {
        let mut built: Vec<ClassDescriptor> =
            builder.build(id, &mut session)?.into_iter().collect();
        built.extend(session.take_pending());
        for descriptor in &built {
            write_class(descriptor, config, templates, &meta, &mut suite, &mut report)?;
        }
    }

    // 2. Combined unit tests
    report.unit_tests = suite.len();
    if suite.is_empty() {
        info!("No class carries an example, the unit-test case has no methods");
    }
    let test_class_name = format!("{}GeneratedTests", config.class_prefix);
    let tests = suite.render(&test_class_name, templates, &meta)?;
    write_rendered_pair(&tests, &config.tests_dir, config.overwrite, &mut report)?;

    // 3. Record calls category
    let record_calls = session.drain_record_calls();
    report.record_getters = record_calls.len();
    report.single_item_getters = session.item_calls().len();
    report.other_calls = session.other_calls().len();
    debug!(
        "{} single-item getters and {} other calls classified, not rendered",
        report.single_item_getters, report.other_calls
    );
    let category = render_record_calls(
        &config.record_class,
        &config.record_category,
        &record_calls,
        templates,
        &meta,
    )?;
    write_rendered_pair(&category, &config.output_dir, config.overwrite, &mut report)?;

    // 4. Manifest
    let mut imported = session.class_names();
    imported.insert(category.stem.as_str());
    let manifest = render_manifest(imported, templates, &meta)?;
    let manifest_path = config
        .output_dir
        .join(format!("{}Objects.h", config.class_prefix));
    let outcome = emit::write_file(&manifest_path, &manifest, config.overwrite)?;
    report.record(outcome, &[manifest_path.as_path()]);

    info!("Done. {} classes written.", report.classes_written);
    Ok(report)
}

fn write_class(
    descriptor: &ClassDescriptor,
    config: &GeneratorConfig,
    templates: &TemplateSet,
    meta: &FileMetadata,
    suite: &mut UnitTestSuite,
    report: &mut GenerationReport,
) -> Result<()> {
    report.class_count += 1;
    let (header, implementation) = descriptor.render_files(templates, meta)?;
    let pair = RenderedPair {
        stem: descriptor.class_name.clone(),
        header,
        implementation,
    };
    match write_rendered_pair(&pair, &config.output_dir, config.overwrite, report)? {
        WriteOutcome::Written => report.classes_written += 1,
        WriteOutcome::Skipped => report.classes_skipped += 1,
    }

    if let Some(example) = &descriptor.example_payload {
        let fixture_name = format!("{}.{}", descriptor.class_name, config.fixture_extension);
        let fixture_path = config.fixtures_dir.join(&fixture_name);
        let outcome = emit::write_file(&fixture_path, example, config.overwrite)?;
        if outcome == WriteOutcome::Written {
            report.fixtures_written += 1;
        }
        report.record(outcome, &[fixture_path.as_path()]);
        suite.add(descriptor, &fixture_name, templates)?;
    }
    Ok(())
}

fn write_rendered_pair(
    pair: &RenderedPair,
    dir: &Path,
    overwrite: bool,
    report: &mut GenerationReport,
) -> Result<WriteOutcome> {
    let header_path = dir.join(format!("{}.h", pair.stem));
    let implementation_path = dir.join(format!("{}.m", pair.stem));
    let outcome = emit::write_pair(
        (header_path.as_path(), pair.header.as_str()),
        (implementation_path.as_path(), pair.implementation.as_str()),
        overwrite,
    )?;
    report.record(outcome, &[header_path.as_path(), implementation_path.as_path()]);
    Ok(outcome)
}
