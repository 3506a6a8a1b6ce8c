//! Screenshot file naming and capture.

use crate::driver::ScreenshotDriver;
use crate::result::RecorderResult;
use std::path::Path;

/// Extension of every captured screenshot
pub const SCREENSHOT_EXTENSION: &str = "png";

/// Hands out `000.png`, `001.png`, ... for the running test
#[derive(Debug, Clone, Default)]
pub struct ScreenshotSequencer {
    next: usize,
}

impl ScreenshotSequencer {
    /// Create a sequencer starting at 0
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restart numbering at 0 (test start)
    pub fn reset(&mut self) {
        self.next = 0;
    }

    /// Next file name; never repeats until [`reset`](Self::reset)
    pub fn next_filename(&mut self) -> String {
        let name = screenshot_filename(self.next);
        self.next += 1;
        name
    }

    /// Number of file names handed out since the last reset
    #[must_use]
    pub const fn issued(&self) -> usize {
        self.next
    }

    /// Ask the driver to write a screenshot to `path`
    ///
    /// # Errors
    ///
    /// Whatever the driver reports; nothing is swallowed here.
    pub fn capture(&self, driver: &dyn ScreenshotDriver, path: &Path) -> RecorderResult<()> {
        driver.save_screenshot(path)
    }

    /// Capture into `dir` under the next file name
    ///
    /// The name is only consumed when the capture succeeds, so files on disk
    /// stay contiguous.
    ///
    /// # Errors
    ///
    /// Whatever the driver reports.
    pub fn capture_next(
        &mut self,
        driver: &dyn ScreenshotDriver,
        dir: &Path,
    ) -> RecorderResult<String> {
        let name = screenshot_filename(self.next);
        self.capture(driver, &dir.join(&name))?;
        self.next += 1;
        Ok(name)
    }
}

/// File name for a sequence number, zero-padded to three digits
#[must_use]
pub fn screenshot_filename(sequence: usize) -> String {
    format!("{sequence:03}.{SCREENSHOT_EXTENSION}")
}
