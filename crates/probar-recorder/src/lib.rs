//! Probar Recorder: step-by-step screenshot timelines for browser tests
//!
//! Listens to a test runner's lifecycle events, saves a screenshot after
//! every step, and turns each failed test into a self-contained HTML
//! slideshow. Passing tests leave nothing behind unless asked to.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  EventBus ──► Recorder (state machine)                              │
//! │                 │                                                   │
//! │                 ├── DirectoryLifecycle   recorded_{test}_{seed}/    │
//! │                 ├── ScreenshotSequencer  000.png, 001.png, ...      │
//! │                 │     └── ScreenshotDriver (host capability module) │
//! │                 ├── SlideStore           ordered steps + captions   │
//! │                 └── ReportRenderer       index.html                 │
//! │                       └── Template       {{placeholder}} substitute │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use probar_recorder::prelude::*;
//! use std::sync::Arc;
//!
//! let out = tempfile::tempdir().unwrap();
//! let config = RecorderConfig::from_yaml("delete_successful: false").unwrap()
//!     .with_output_dir(out.path());
//!
//! let mut bus = EventBus::new();
//! bus.register(Box::new(Recorder::new(config).unwrap()));
//!
//! let modules = ModuleRegistry::new().with_module("WebDriver", Arc::new(MockDriver::new()));
//! let test = TestInfo::new("checkout::guest_can_pay", "guest can pay");
//!
//! bus.dispatch(LifecycleEvent::SuiteBefore, &Event::Suite(SuiteContext::new("acceptance").with_modules(modules)));
//! bus.dispatch(LifecycleEvent::TestBefore, &Event::Test(test.clone()));
//! bus.dispatch(LifecycleEvent::StepAfter, &Event::Step(StepInfo::passed("I click \"Pay\"")));
//! let errors = bus.dispatch(LifecycleEvent::TestSuccess, &Event::Test(test));
//! assert!(errors.is_empty());
//! ```

#![warn(missing_docs)]

mod config;
mod directory;
mod driver;
mod event;
mod recorder;
mod render;
mod result;
mod sequencer;
mod store;
mod template;

pub use config::{RecorderConfig, DEFAULT_MODULE, DEFAULT_OUTPUT_DIR};
pub use directory::{directory_name, sanitize_test_name, DirectoryLifecycle, DIRECTORY_PREFIX};
pub use driver::{MockDriver, ModuleRegistry, ScreenshotDriver, BLANK_PNG};
pub use event::{
    Event, EventBus, LifecycleEvent, LifecycleListener, StepInfo, SuiteContext, TestInfo,
};
pub use recorder::{Recorder, RecorderState, RunSeed, REPORT_FILE};
pub use render::{
    capitalize_first, escape_html, highlight_caption, ReportRenderer, ACCENT_COLOR,
    INDICATOR_TEMPLATE, PAGE_TEMPLATE, SLIDE_TEMPLATE,
};
pub use result::{RecorderError, RecorderResult};
pub use sequencer::{screenshot_filename, ScreenshotSequencer, SCREENSHOT_EXTENSION};
pub use store::{SlideStore, Step};
pub use template::{has_placeholder, substitute, Template};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::{
        Event, EventBus, LifecycleEvent, LifecycleListener, MockDriver, ModuleRegistry, Recorder,
        RecorderConfig, RecorderError, RecorderResult, RecorderState, ScreenshotDriver, StepInfo,
        SuiteContext, TestInfo,
    };
}
