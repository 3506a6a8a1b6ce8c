//! Per-test output directory lifecycle
//!
//! ```text
//!   begin()          persist / discard()
//! ─────────► active ──────────────────────► inactive
//!   mkdir             (index.html kept)  or  (rm -r)
//! ```

use crate::result::{RecorderError, RecorderResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Prefix of every recording directory
pub const DIRECTORY_PREFIX: &str = "recorded";

/// Owns the output directory of the test being recorded
#[derive(Debug, Clone, Default)]
pub struct DirectoryLifecycle {
    current: Option<PathBuf>,
}

impl DirectoryLifecycle {
    /// Create an inactive lifecycle
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `recorded_{sanitized signature}_{seed}` under `output_dir`
    ///
    /// The lifecycle is left inactive when creation fails.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::DirectoryCreate`] if the directory cannot be
    /// created.
    pub fn begin(&mut self, output_dir: &Path, signature: &str, seed: i64) -> RecorderResult<&Path> {
        self.current = None;
        let dir = output_dir.join(directory_name(signature, seed));
        fs::create_dir_all(&dir).map_err(|source| RecorderError::DirectoryCreate {
            path: dir.clone(),
            source,
        })?;
        debug!(dir = %dir.display(), "recording directory created");
        let dir = self.current.insert(dir);
        Ok(dir.as_path())
    }

    /// Current directory, `None` when inactive
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.current.as_deref()
    }

    /// Check if a directory is held for the running test
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.current.is_some()
    }

    /// Release the directory without touching the disk (report persisted)
    pub fn release(&mut self) -> Option<PathBuf> {
        self.current.take()
    }

    /// Recursively delete the directory and release it
    ///
    /// Calling this when inactive, or when the directory is already gone,
    /// is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if an existing directory cannot be removed.
    pub fn discard(&mut self) -> RecorderResult<()> {
        let Some(dir) = self.current.take() else {
            return Ok(());
        };
        match fs::remove_dir_all(&dir) {
            Ok(()) => {
                debug!(dir = %dir.display(), "recording directory removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Directory name for a test signature and run seed
#[must_use]
pub fn directory_name(signature: &str, seed: i64) -> String {
    format!("{DIRECTORY_PREFIX}_{}_{seed}", sanitize_test_name(signature))
}

/// Make a fully qualified test name safe to use as a directory name
///
/// `::` becomes `.`, path separators are dropped, and characters that are
/// reserved on common filesystems become `_`.
#[must_use]
pub fn sanitize_test_name(name: &str) -> String {
    name.replace("::", ".")
        .chars()
        .filter(|c| !matches!(c, '/' | '\\'))
        .map(|c| match c {
            ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}
