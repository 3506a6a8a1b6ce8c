//! Test-runner lifecycle events and their dispatch
//!
//! The host owns an [`EventBus`] and fires the six lifecycle events at it.
//! Listeners declare up front which events they care about, the way a
//! runner extension declares its hook table.

use crate::driver::ModuleRegistry;
use crate::result::{RecorderError, RecorderResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::error;

/// Lifecycle events emitted by the test runner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecycleEvent {
    /// Suite is about to run
    SuiteBefore,
    /// Test is about to run
    TestBefore,
    /// A step of the running test completed
    StepAfter,
    /// Test passed
    TestSuccess,
    /// Test failed an assertion
    TestFail,
    /// Test raised an unexpected error
    TestError,
}

impl LifecycleEvent {
    /// All events, in lifecycle order
    pub const ALL: [Self; 6] = [
        Self::SuiteBefore,
        Self::TestBefore,
        Self::StepAfter,
        Self::TestSuccess,
        Self::TestFail,
        Self::TestError,
    ];

    /// Stable event name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SuiteBefore => "suite.before",
            Self::TestBefore => "test.before",
            Self::StepAfter => "step.after",
            Self::TestSuccess => "test.success",
            Self::TestFail => "test.fail",
            Self::TestError => "test.error",
        }
    }

    /// Check if the event ends a test
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::TestSuccess | Self::TestFail | Self::TestError)
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LifecycleEvent {
    type Err = RecorderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|event| event.as_str() == s)
            .ok_or_else(|| RecorderError::Config {
                message: format!("unknown lifecycle event: {s}"),
            })
    }
}

/// Suite-level context handed out at `suite.before`
#[derive(Debug, Clone, Default)]
pub struct SuiteContext {
    /// Suite name
    pub name: String,
    /// Capability modules enabled for the suite
    pub modules: ModuleRegistry,
}

impl SuiteContext {
    /// Create a suite context with no modules
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modules: ModuleRegistry::new(),
        }
    }

    /// Attach the suite's capability modules
    #[must_use]
    pub fn with_modules(mut self, modules: ModuleRegistry) -> Self {
        self.modules = modules;
        self
    }
}

/// Identity of a single test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestInfo {
    /// Fully qualified name, e.g. `checkout::guest_can_pay`
    pub signature: String,
    /// Human readable title shown in the report
    pub feature: String,
}

impl TestInfo {
    /// Create a test identity
    #[must_use]
    pub fn new(signature: impl Into<String>, feature: impl Into<String>) -> Self {
        Self {
            signature: signature.into(),
            feature: feature.into(),
        }
    }
}

/// Completed step as described by the driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepInfo {
    /// Step description, e.g. `I click "Login"`
    pub text: String,
    /// Whether the runner flagged this step as failing
    pub failed: bool,
}

impl StepInfo {
    /// A passing step
    #[must_use]
    pub fn passed(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            failed: false,
        }
    }

    /// A failing step
    #[must_use]
    pub fn failed(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            failed: true,
        }
    }
}

/// Payload of a lifecycle event
#[derive(Debug, Clone)]
pub enum Event {
    /// `suite.before`
    Suite(SuiteContext),
    /// `test.before` and `test.success`
    Test(TestInfo),
    /// `step.after`
    Step(StepInfo),
    /// `test.fail` and `test.error`
    TestFailed {
        /// Test that failed
        test: TestInfo,
        /// Failure message
        failure: String,
    },
}

impl Event {
    /// Test identity carried by the payload, if any
    #[must_use]
    pub fn test(&self) -> Option<&TestInfo> {
        match self {
            Self::Test(test) | Self::TestFailed { test, .. } => Some(test),
            Self::Suite(_) | Self::Step(_) => None,
        }
    }
}

/// Something the host's event bus can notify
pub trait LifecycleListener {
    /// Listener name for logging
    fn name(&self) -> &str;

    /// Events this listener wants
    fn subscriptions(&self) -> &'static [LifecycleEvent];

    /// Handle one event
    ///
    /// # Errors
    ///
    /// Any error is logged by the bus and never reaches the test runner.
    fn on_event(&mut self, kind: LifecycleEvent, event: &Event) -> RecorderResult<()>;
}

/// Dispatches lifecycle events to registered listeners, in registration order
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Box<dyn LifecycleListener>>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.listeners.iter().map(|l| l.name()).collect();
        f.debug_struct("EventBus")
            .field("listeners", &names)
            .finish()
    }
}

impl EventBus {
    /// Create a bus with no listeners
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener
    pub fn register(&mut self, listener: Box<dyn LifecycleListener>) {
        self.listeners.push(listener);
    }

    /// Number of registered listeners
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Deliver `event` to every listener subscribed to `kind`
    ///
    /// Listener errors are logged and returned; they never abort the
    /// dispatch or reach the runner.
    pub fn dispatch(&mut self, kind: LifecycleEvent, event: &Event) -> Vec<RecorderError> {
        let mut errors = Vec::new();
        for listener in &mut self.listeners {
            if !listener.subscriptions().contains(&kind) {
                continue;
            }
            if let Err(e) = listener.on_event(kind, event) {
                error!(listener = listener.name(), event = %kind, error = %e, "listener failed");
                errors.push(e);
            }
        }
        errors
    }
}
