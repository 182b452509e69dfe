//! Output file emission.
//!
//! Every file is written to a temporary sibling first and moved into place,
//! so an interrupted run never leaves a half-written file behind. Existing
//! files are left untouched unless overwriting is enabled.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::error::{CodegenError, Result};

/// What happened to one output path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The file was created or replaced.
    Written,
    /// The file existed and overwriting is off.
    Skipped,
}

/// Creates `dir` if needed and checks that files can be created in it.
///
/// # Errors
///
/// Returns [`CodegenError::OutputNotWritable`] if the directory cannot be
/// created or a probe file cannot be created inside it.
pub fn ensure_writable_dir(dir: &Path) -> Result<()> {
    let not_writable = |source| CodegenError::OutputNotWritable {
        path: dir.to_path_buf(),
        source,
    };
    if !dir.exists() {
        debug!("Creating {}", dir.display());
        std::fs::create_dir_all(dir).map_err(not_writable)?;
    }
    // Dropping the probe removes it.
    NamedTempFile::new_in(dir).map_err(not_writable)?;
    Ok(())
}

/// Writes `content` to `path` unless it exists and `overwrite` is false.
///
/// # Errors
///
/// Returns [`CodegenError::Write`] if the file cannot be written.
pub fn write_file(path: &Path, content: &str, overwrite: bool) -> Result<WriteOutcome> {
    if path.exists() && !overwrite {
        info!("{} already exists, not overwriting", path.display());
        return Ok(WriteOutcome::Skipped);
    }
    replace(path, content)?;
    info!("Wrote {}", path.display());
    Ok(WriteOutcome::Written)
}

/// Writes a declaration/definition pair as a unit.
///
/// Both files are written when `overwrite` is true or neither exists. If
/// exactly one exists and `overwrite` is false, neither is touched.
///
/// # Errors
///
/// Returns [`CodegenError::Write`] if either file cannot be written.
pub fn write_pair(
    first: (&Path, &str),
    second: (&Path, &str),
    overwrite: bool,
) -> Result<WriteOutcome> {
    let (first_path, first_content) = first;
    let (second_path, second_content) = second;
    if !overwrite {
        match (first_path.exists(), second_path.exists()) {
            (false, false) => {}
            (true, true) => {
                info!(
                    "{} and {} already exist, not overwriting",
                    first_path.display(),
                    second_path.display()
                );
                return Ok(WriteOutcome::Skipped);
            }
            (true, false) | (false, true) => {
                warn!(
                    "Only one of {} and {} exists, leaving both alone",
                    first_path.display(),
                    second_path.display()
                );
                return Ok(WriteOutcome::Skipped);
            }
        }
    }
    replace(first_path, first_content)?;
    replace(second_path, second_content)?;
    info!("Wrote {} and {}", first_path.display(), second_path.display());
    Ok(WriteOutcome::Written)
}

fn replace(path: &Path, content: &str) -> Result<()> {
    let write_error = |source| CodegenError::Write {
        path: path.to_path_buf(),
        source,
    };
    let dir = parent_dir(path);
    let mut staged = NamedTempFile::new_in(&dir).map_err(write_error)?;
    staged.write_all(content.as_bytes()).map_err(write_error)?;
    staged.flush().map_err(write_error)?;
    staged.persist(path).map_err(|err| write_error(err.error))?;
    Ok(())
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn existing_files_are_kept_without_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("SMAllergy.h");
        std::fs::write(&path, "hand edited").unwrap();

        assert_eq!(write_file(&path, "generated", false).unwrap(), WriteOutcome::Skipped);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hand edited");

        assert_eq!(write_file(&path, "generated", true).unwrap(), WriteOutcome::Written);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "generated");
    }

    #[test]
    fn half_present_pair_is_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let header = dir.path().join("SMAllergy.h");
        let body = dir.path().join("SMAllergy.m");
        std::fs::write(&header, "old header").unwrap();

        let outcome = write_pair(
            (header.as_path(), "new header"),
            (body.as_path(), "new body"),
            false,
        )
        .unwrap();
        assert_eq!(outcome, WriteOutcome::Skipped);
        assert_eq!(std::fs::read_to_string(&header).unwrap(), "old header");
        assert!(!body.exists());

        let outcome = write_pair(
            (header.as_path(), "new header"),
            (body.as_path(), "new body"),
            true,
        )
        .unwrap();
        assert_eq!(outcome, WriteOutcome::Written);
        assert_eq!(std::fs::read_to_string(&body).unwrap(), "new body");
    }

    #[test]
    fn fresh_pair_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let header = dir.path().join("SMName.h");
        let body = dir.path().join("SMName.m");
        let outcome = write_pair((header.as_path(), "h"), (body.as_path(), "m"), false).unwrap();
        assert_eq!(outcome, WriteOutcome::Written);
        assert_eq!(std::fs::read_to_string(&header).unwrap(), "h");
        assert_eq!(std::fs::read_to_string(&body).unwrap(), "m");
    }

    #[test]
    fn writable_dir_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        ensure_writable_dir(&nested).unwrap();
        assert!(nested.is_dir());
        assert_eq!(std::fs::read_dir(&nested).unwrap().count(), 0);
    }

    #[test]
    fn file_in_place_of_dir_is_not_writable() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        assert!(matches!(
            ensure_writable_dir(&blocker.join("out")),
            Err(CodegenError::OutputNotWritable { .. })
        ));
    }
}
