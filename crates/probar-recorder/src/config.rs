//! Recorder Configuration
//!
//! Options supplied by the host's own configuration file. Every field has a
//! default, so an empty mapping is a valid configuration.
//!
//! ```yaml
//! delete_successful: false
//! module: WebDriver
//! output_dir: tests/_output
//! ```

use crate::result::{RecorderError, RecorderResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the capability module the recorder binds to by default
pub const DEFAULT_MODULE: &str = "WebDriver";

/// Default directory recordings are written under
pub const DEFAULT_OUTPUT_DIR: &str = "target/recordings";

/// Configuration for the step recorder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// Discard screenshots of passing tests
    pub delete_successful: bool,
    /// Capability module providing screenshots
    pub module: String,
    /// Page-shell template override
    pub template: Option<String>,
    /// Directory test recordings are created in
    pub output_dir: PathBuf,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            delete_successful: true,
            module: DEFAULT_MODULE.to_string(),
            template: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl RecorderConfig {
    /// Create a new config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from YAML
    ///
    /// # Errors
    ///
    /// Returns error if the YAML is malformed
    pub fn from_yaml(yaml: &str) -> RecorderResult<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Parse configuration from JSON
    ///
    /// # Errors
    ///
    /// Returns error if the JSON is malformed
    pub fn from_json(json: &str) -> RecorderResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load configuration from a `.yml`, `.yaml` or `.json` file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, has an unknown extension,
    /// or fails to parse
    pub fn load(path: impl AsRef<Path>) -> RecorderResult<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("yml" | "yaml") => Self::from_yaml(&std::fs::read_to_string(path)?),
            Some("json") => Self::from_json(&std::fs::read_to_string(path)?),
            _ => Err(RecorderError::Config {
                message: format!("unsupported config file: {}", path.display()),
            }),
        }
    }

    /// Keep or discard artifacts of passing tests
    #[must_use]
    pub fn with_delete_successful(mut self, delete: bool) -> Self {
        self.delete_successful = delete;
        self
    }

    /// Set the capability module name
    #[must_use]
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    /// Override the page-shell template
    #[must_use]
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Set the output directory
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }
}
