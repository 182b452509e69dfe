//! Error types for the code generator.

use std::path::PathBuf;

use thiserror::Error;

use crate::template::TemplateError;

/// Fatal generator errors. Per-class gaps are logged and skipped instead.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// A template is missing or inconsistent with its binding shape.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// An output directory cannot be created or written to.
    #[error("can't write to {}: {source}", path.display())]
    OutputNotWritable {
        /// The directory.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Writing an output file failed.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// The file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file could not be read.
    #[error("failed to read configuration {}: {source}", path.display())]
    ConfigRead {
        /// The file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid TOML or has the wrong shape.
    #[error("invalid configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A configuration value is invalid.
    #[error("invalid configuration value for {key}: {message}")]
    ConfigValue {
        /// The offending key.
        key: &'static str,
        /// What is wrong with it.
        message: String,
    },
}

/// Result alias for generator operations.
pub type Result<T> = std::result::Result<T, CodegenError>;
