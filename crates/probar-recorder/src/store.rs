//! Captured steps of the running test.

use serde::{Deserialize, Serialize};

/// One captured moment in a test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Position in the test, starting at 0
    pub sequence: usize,
    /// Screenshot file name relative to the test directory
    pub filename: String,
    /// Step description as reported by the runner
    pub caption: String,
    /// Whether the runner flagged this step as the failing one
    pub failed: bool,
}

impl Step {
    /// Check if the step was flagged as failed
    #[must_use]
    pub const fn has_failed(&self) -> bool {
        self.failed
    }
}

/// Append-only, ordered collection of the current test's steps
#[derive(Debug, Clone, Default)]
pub struct SlideStore {
    steps: Vec<Step>,
}

impl SlideStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every step (test start)
    pub fn reset(&mut self) {
        self.steps.clear();
    }

    /// Append a step, assigning it the next sequence number
    pub fn append(
        &mut self,
        filename: impl Into<String>,
        caption: impl Into<String>,
        failed: bool,
    ) -> &Step {
        let sequence = self.steps.len();
        self.steps.push(Step {
            sequence,
            filename: filename.into(),
            caption: caption.into(),
            failed,
        });
        &self.steps[sequence]
    }

    /// Steps in insertion order; call again to restart
    pub fn all(&self) -> std::slice::Iter<'_, Step> {
        self.steps.iter()
    }

    /// Number of steps
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if no steps were captured
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Steps as a slice
    #[must_use]
    pub fn as_slice(&self) -> &[Step] {
        &self.steps
    }
}
