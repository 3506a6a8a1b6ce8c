//! Screenshot capability modules
//!
//! The recorder never talks to a browser itself. The host exposes its
//! automation drivers through a [`ModuleRegistry`], and the recorder looks up
//! the configured module once per suite.
//!
//! ```text
//! ┌──────────────────┐  has_module("WebDriver")  ┌──────────────────┐
//! │  Recorder        │ ────────────────────────► │  ModuleRegistry  │
//! │  (suite.before)  │ ◄──────────────────────── │  name → driver   │
//! └──────────────────┘   Option<Arc<dyn ..>>     └──────────────────┘
//! ```

use crate::result::{RecorderError, RecorderResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// A driver able to write the current viewport to an image file
pub trait ScreenshotDriver: Send + Sync {
    /// Write a screenshot of the current viewport to `destination`
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::Capture`] (or an I/O error) when no image
    /// could be written.
    fn save_screenshot(&self, destination: &Path) -> RecorderResult<()>;
}

/// Named capability modules exposed by the host
#[derive(Default, Clone)]
pub struct ModuleRegistry {
    modules: HashMap<String, Arc<dyn ScreenshotDriver>>,
}

impl std::fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.modules.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("ModuleRegistry")
            .field("modules", &names)
            .finish()
    }
}

impl ModuleRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module under `name`, replacing any previous one
    pub fn register(&mut self, name: impl Into<String>, driver: Arc<dyn ScreenshotDriver>) {
        self.modules.insert(name.into(), driver);
    }

    /// Builder form of [`register`](Self::register)
    #[must_use]
    pub fn with_module(mut self, name: impl Into<String>, driver: Arc<dyn ScreenshotDriver>) -> Self {
        self.register(name, driver);
        self
    }

    /// Check if a module is present
    #[must_use]
    pub fn has_module(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    /// Get a module by name
    #[must_use]
    pub fn module(&self, name: &str) -> Option<Arc<dyn ScreenshotDriver>> {
        self.modules.get(name).cloned()
    }

    /// Number of registered modules
    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Check if no modules are registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// Smallest valid PNG: one transparent pixel
pub const BLANK_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4,
    0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00,
    0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE,
    0x42, 0x60, 0x82,
];

/// Mock driver for unit testing
///
/// Writes a fixed image payload and keeps the destinations it was asked for.
#[derive(Debug)]
pub struct MockDriver {
    /// Bytes written for every screenshot
    pub image: Vec<u8>,
    failing: AtomicBool,
    call_history: Mutex<Vec<PathBuf>>,
}

impl Default for MockDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDriver {
    /// Create a mock driver writing [`BLANK_PNG`]
    #[must_use]
    pub fn new() -> Self {
        Self::with_image(BLANK_PNG.to_vec())
    }

    /// Create a mock driver writing custom bytes
    #[must_use]
    pub fn with_image(image: Vec<u8>) -> Self {
        Self {
            image,
            failing: AtomicBool::new(false),
            call_history: Mutex::new(Vec::new()),
        }
    }

    /// Make subsequent captures fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Destinations passed to `save_screenshot`, including failed ones
    #[must_use]
    pub fn history(&self) -> Vec<PathBuf> {
        self.call_history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of capture calls
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.call_history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl ScreenshotDriver for MockDriver {
    fn save_screenshot(&self, destination: &Path) -> RecorderResult<()> {
        self.call_history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(destination.to_path_buf());

        if self.failing.load(Ordering::SeqCst) {
            return Err(RecorderError::capture(destination, "mock capture failure"));
        }
        std::fs::write(destination, &self.image)?;
        Ok(())
    }
}
