//! `smart-objc`: generates the Objective-C classes of the SMART framework
//! from an ontology dump.
//!
//! **Outputs** (default locations, see `--config`):
//! - `SMARTFramework/GeneratedClasses/<Class>.{h,m}`: one pair per class
//! - `SMARTFramework/GeneratedClasses/SMRecord+Calls.{h,m}`: record calls
//! - `SMARTFramework/GeneratedClasses/SMObjects.h`: import manifest
//! - `SMARTFrameworkTests/Fixtures/<Class>.rdf`: example payloads
//! - `SMARTFrameworkTests/SMGeneratedTests.{h,m}`: unit tests
//!
//! **Usage:**
//! ```text
//! smart-objc [--ontology <json>] [--config <toml>] [-f] [-v] [--lenient]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fmt::{self, Write as _};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use smart_codegen::template::UnboundPlaceholders;
use smart_codegen::{generate, GeneratorConfig};
use smart_ontology::Ontology;
use tracing::{error, info, Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

/// Generate Objective-C classes from the SMART ontology.
#[derive(Parser, Debug)]
#[command(name = "smart-objc", about = "Generate Objective-C classes from the SMART ontology")]
struct Args {
    /// Ontology JSON dump produced by the OWL parser.
    #[arg(long, default_value = "smart.json")]
    ontology: PathBuf,

    /// Generator configuration (TOML). Flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Template directory.
    #[arg(long)]
    templates: Option<PathBuf>,

    /// Output directory for classes, the record-calls category and the manifest.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Output directory for example fixtures.
    #[arg(long)]
    fixtures: Option<PathBuf>,

    /// Output directory for the combined unit tests.
    #[arg(long)]
    tests: Option<PathBuf>,

    /// Overwrite existing files.
    #[arg(short, long)]
    force: bool,

    /// Log debug detail.
    #[arg(short, long)]
    verbose: bool,

    /// Strip template placeholders no binding supplies instead of failing.
    #[arg(long)]
    lenient: bool,
}

impl Args {
    /// Reads `--config` (or the defaults) and applies the command-line overrides.
    fn generator_config(&self) -> Result<GeneratorConfig> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::from_toml_file(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?,
            None => GeneratorConfig::default(),
        };
        if let Some(dir) = &self.templates {
            config.template_dir = dir.clone();
        }
        if let Some(dir) = &self.out {
            config.output_dir = dir.clone();
        }
        if let Some(dir) = &self.fixtures {
            config.fixtures_dir = dir.clone();
        }
        if let Some(dir) = &self.tests {
            config.tests_dir = dir.clone();
        }
        if self.force {
            config.overwrite = true;
        }
        if self.lenient {
            config.unbound_placeholders = UnboundPlaceholders::Strip;
        }
        Ok(config)
    }
}

/// Prefixes every line with `-->`, or `xx>` for warnings and errors.
struct PrefixFormat;

impl<S, N> FormatEvent<S, N> for PrefixFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let prefix = match *event.metadata().level() {
            Level::ERROR | Level::WARN => "xx>",
            _ => "-->",
        };
        write!(writer, "{prefix} ")?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .event_format(PrefixFormat)
        .init();
}

fn run(args: &Args) -> Result<()> {
    let config = args.generator_config()?;

    let ontology = Ontology::load(&args.ontology)
        .with_context(|| format!("Failed to load ontology {}", args.ontology.display()))?;
    info!(
        "SMART ontology v{}: {} classes, {} properties, {} calls",
        ontology.version,
        ontology.class_count(),
        ontology.property_count(),
        ontology.call_count()
    );

    let report = generate(&ontology, &config).context("Generation failed")?;
    info!(
        "{} record calls, {} fixtures; {} files written, {} left untouched",
        report.record_getters,
        report.fixtures_written,
        report.files_written.len(),
        report.files_skipped.len()
    );
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
