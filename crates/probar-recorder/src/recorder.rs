//! Recorder - step-by-step screenshot timeline of a test run
//!
//! # State machine
//!
//! ```text
//!              suite.before                 test.before
//! ┌──────────┐ (module present) ┌─────────┐ ─────────────► ┌───────────┐
//! │ Inactive │ ───────────────► │  Armed  │                │ Recording │ ◄─┐ step.after
//! └──────────┘                  └─────────┘ ◄───────────── └───────────┘ ──┘
//!      ▲ module absent:               ▲       Concluding        │
//!      └─ every event is a no-op      └── discard or persist ◄──┘
//!                                         test.success / fail / error
//! ```
//!
//! A failing test always keeps its screenshots and gets an `index.html`.
//! A passing test is deleted unless `delete_successful` is off.
//!
//! Recording is auxiliary: nothing that goes wrong here changes the outcome
//! of the test being recorded.

use crate::config::RecorderConfig;
use crate::directory::DirectoryLifecycle;
use crate::driver::ScreenshotDriver;
use crate::event::{Event, LifecycleEvent, LifecycleListener, StepInfo, SuiteContext, TestInfo};
use crate::render::ReportRenderer;
use crate::result::RecorderResult;
use crate::sequencer::ScreenshotSequencer;
use crate::store::{SlideStore, Step};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// File name of the rendered report inside a test directory
pub const REPORT_FILE: &str = "index.html";

/// Suite-scoped value namespacing every test directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSeed(pub i64);

impl RunSeed {
    /// Seed from the current Unix time in seconds
    #[must_use]
    pub fn now() -> Self {
        Self(chrono::Utc::now().timestamp())
    }

    /// Raw seed value
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RunSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Recorder state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecorderState {
    /// Capability module absent (or suite not started); every event is ignored
    Inactive,
    /// Suite started with the module present, no test running
    Armed,
    /// A test is being recorded
    Recording,
    /// A terminal event is being handled
    Concluding,
}

/// Screenshot capability resolved at suite start
#[derive(Clone)]
struct Capability {
    driver: Arc<dyn ScreenshotDriver>,
    seed: RunSeed,
}

/// Records a screenshot after every step and turns failed tests into a
/// navigable HTML slideshow
///
/// # Example
///
/// ```
/// use probar_recorder::{
///     ModuleRegistry, MockDriver, Recorder, RecorderConfig, StepInfo, SuiteContext, TestInfo,
/// };
/// use std::sync::Arc;
///
/// let out = tempfile::tempdir().unwrap();
/// let config = RecorderConfig::default().with_output_dir(out.path());
/// let mut recorder = Recorder::new(config).unwrap();
///
/// let modules = ModuleRegistry::new().with_module("WebDriver", Arc::new(MockDriver::new()));
/// recorder.before_suite(&SuiteContext::new("acceptance").with_modules(modules)).unwrap();
///
/// let test = TestInfo::new("login::rejects_bad_password", "rejects bad password");
/// recorder.before_test(&test).unwrap();
/// recorder.after_step(&StepInfo::passed("I fill field \"password\"")).unwrap();
/// recorder.on_failure(&test, "still logged out").unwrap();
///
/// assert!(recorder.last_report().unwrap().ends_with("index.html"));
/// ```
pub struct Recorder {
    config: RecorderConfig,
    renderer: ReportRenderer,
    state: RecorderState,
    capability: Option<Capability>,
    store: SlideStore,
    sequencer: ScreenshotSequencer,
    directory: DirectoryLifecycle,
    last_report: Option<PathBuf>,
}

impl fmt::Debug for Recorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recorder")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("seed", &self.seed())
            .field("steps", &self.store.len())
            .field("directory", &self.directory.path())
            .field("last_report", &self.last_report)
            .finish()
    }
}

impl Recorder {
    /// Create an inactive recorder
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::Config`](crate::RecorderError::Config) if the
    /// configured template override is unusable.
    pub fn new(config: RecorderConfig) -> RecorderResult<Self> {
        let renderer = match &config.template {
            Some(template) => ReportRenderer::with_template(template.clone())?,
            None => ReportRenderer::new(),
        };
        Ok(Self {
            config,
            renderer,
            state: RecorderState::Inactive,
            capability: None,
            store: SlideStore::new(),
            sequencer: ScreenshotSequencer::new(),
            directory: DirectoryLifecycle::new(),
            last_report: None,
        })
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> RecorderState {
        self.state
    }

    /// Configuration in use
    #[must_use]
    pub const fn config(&self) -> &RecorderConfig {
        &self.config
    }

    /// Seed of the current suite, if armed
    #[must_use]
    pub fn seed(&self) -> Option<RunSeed> {
        self.capability.as_ref().map(|c| c.seed)
    }

    /// Check if the capability module was found at suite start
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.capability.is_some()
    }

    /// Steps captured for the running test
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        self.store.as_slice()
    }

    /// Directory of the running test
    #[must_use]
    pub fn current_dir(&self) -> Option<&Path> {
        self.directory.path()
    }

    /// Path of the most recently written report
    #[must_use]
    pub fn last_report(&self) -> Option<&Path> {
        self.last_report.as_deref()
    }

    /// `suite.before`: resolve the capability module and seed the run
    pub fn before_suite(&mut self, suite: &SuiteContext) -> RecorderResult<()> {
        self.capability = None;
        self.state = RecorderState::Inactive;
        self.directory.release();
        self.store.reset();

        let Some(driver) = suite.modules.module(&self.config.module) else {
            info!(
                suite = %suite.name,
                module = %self.config.module,
                "module not enabled, step recording disabled for this suite"
            );
            return Ok(());
        };

        let seed = RunSeed::now();
        self.capability = Some(Capability { driver, seed });
        self.state = RecorderState::Armed;
        info!(
            suite = %suite.name,
            output = %self.config.output_dir.display(),
            "⏺ Recording ⏺ step-by-step screenshots will be saved to the output directory"
        );
        info!(pattern = %format!("recorded_{{testname}}_{seed}"), "directory format");
        Ok(())
    }

    /// `test.before`: start a fresh recording
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::DirectoryCreate`](crate::RecorderError::DirectoryCreate);
    /// capture stays disabled until the next test.
    pub fn before_test(&mut self, test: &TestInfo) -> RecorderResult<()> {
        let Some(seed) = self.seed() else {
            return Ok(());
        };
        if let Some(abandoned) = self.directory.release() {
            warn!(dir = %abandoned.display(), "previous test never finished, leaving its recording");
        }

        self.store.reset();
        self.sequencer.reset();
        self.state = RecorderState::Recording;

        match self
            .directory
            .begin(&self.config.output_dir, &test.signature, seed.value())
        {
            Ok(dir) => {
                debug!(test = %test.signature, dir = %dir.display(), "recording test");
                Ok(())
            }
            Err(e) => {
                error!(test = %test.signature, error = %e, "recording disabled for this test");
                Err(e)
            }
        }
    }

    /// `step.after`: screenshot the step and remember its caption
    ///
    /// A failed capture is logged and the step is dropped; the next capture
    /// reuses its file name.
    pub fn after_step(&mut self, step: &StepInfo) -> RecorderResult<()> {
        let Some(capability) = &self.capability else {
            return Ok(());
        };
        let Some(dir) = self.directory.path() else {
            return Ok(());
        };

        let filename = match self.sequencer.capture_next(capability.driver.as_ref(), dir) {
            Ok(filename) => filename,
            Err(e) => {
                warn!(step = %step.text, error = %e, "screenshot skipped");
                return Ok(());
            }
        };

        let step = self.store.append(filename, step.text.clone(), step.failed);
        debug!(step = step.sequence, file = %step.filename, "step recorded");
        Ok(())
    }

    /// `test.success`: drop the recording, or persist it when passing tests
    /// are kept
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be removed or the report
    /// cannot be written.
    pub fn on_success(&mut self, test: &TestInfo) -> RecorderResult<()> {
        if !self.is_armed() || !self.directory.is_active() {
            self.finish();
            return Ok(());
        }
        if !self.config.delete_successful {
            return self.persist(test);
        }

        self.state = RecorderState::Concluding;
        let result = self.directory.discard();
        self.finish();
        debug!(test = %test.signature, "passing test recording discarded");
        result
    }

    /// `test.fail` / `test.error`: always persist the report
    ///
    /// # Errors
    ///
    /// Returns an error if the report cannot be rendered or written.
    pub fn on_failure(&mut self, test: &TestInfo, failure: &str) -> RecorderResult<()> {
        debug!(test = %test.signature, failure, "test failed");
        if !self.is_armed() || !self.directory.is_active() {
            self.finish();
            return Ok(());
        }
        self.persist(test)
    }

    fn persist(&mut self, test: &TestInfo) -> RecorderResult<()> {
        self.state = RecorderState::Concluding;
        let Some(dir) = self.directory.release() else {
            self.finish();
            return Ok(());
        };

        let result = self.write_report(&dir, test);
        self.finish();
        let report = result?;
        info!(test = %test.signature, report = %report.display(), "recording saved");
        self.last_report = Some(report);
        Ok(())
    }

    fn write_report(&self, dir: &Path, test: &TestInfo) -> RecorderResult<PathBuf> {
        let title = if test.feature.is_empty() {
            &test.signature
        } else {
            &test.feature
        };
        let html = self
            .renderer
            .render(title, self.store.as_slice())
            .map_err(|e| {
                error!(test = %test.signature, error = %e, "report template is broken");
                e
            })?;
        let path = dir.join(REPORT_FILE);
        std::fs::write(&path, html)?;
        Ok(path)
    }

    /// Back to `Armed` (or `Inactive` without a module) after a test
    fn finish(&mut self) {
        self.store.reset();
        self.directory.release();
        self.state = if self.is_armed() {
            RecorderState::Armed
        } else {
            RecorderState::Inactive
        };
    }
}

impl LifecycleListener for Recorder {
    fn name(&self) -> &str {
        "recorder"
    }

    fn subscriptions(&self) -> &'static [LifecycleEvent] {
        &LifecycleEvent::ALL
    }

    fn on_event(&mut self, kind: LifecycleEvent, event: &Event) -> RecorderResult<()> {
        match (kind, event) {
            (LifecycleEvent::SuiteBefore, Event::Suite(suite)) => self.before_suite(suite),
            (LifecycleEvent::StepAfter, Event::Step(step)) => self.after_step(step),
            (LifecycleEvent::TestBefore, Event::Test(test) | Event::TestFailed { test, .. }) => {
                self.before_test(test)
            }
            (LifecycleEvent::TestSuccess, Event::Test(test) | Event::TestFailed { test, .. }) => {
                self.on_success(test)
            }
            (
                LifecycleEvent::TestFail | LifecycleEvent::TestError,
                Event::TestFailed { test, failure },
            ) => self.on_failure(test, failure),
            (LifecycleEvent::TestFail | LifecycleEvent::TestError, Event::Test(test)) => {
                self.on_failure(test, "")
            }
            (kind, event) => {
                debug!(event = %kind, payload = ?event, "ignoring event with unexpected payload");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{MockDriver, ModuleRegistry};
    use crate::result::RecorderError;
    use tempfile::TempDir;

    fn suite_with(driver: &Arc<MockDriver>) -> SuiteContext {
        let driver: Arc<dyn ScreenshotDriver> = Arc::clone(driver) as Arc<dyn ScreenshotDriver>;
        SuiteContext::new("acceptance")
            .with_modules(ModuleRegistry::new().with_module("WebDriver", driver))
    }

    fn armed(config: RecorderConfig) -> (Recorder, Arc<MockDriver>) {
        let driver = Arc::new(MockDriver::new());
        let mut recorder = Recorder::new(config).unwrap();
        recorder.before_suite(&suite_with(&driver)).unwrap();
        (recorder, driver)
    }

    fn config(out: &TempDir) -> RecorderConfig {
        RecorderConfig::default().with_output_dir(out.path())
    }

    fn login() -> TestInfo {
        TestInfo::new("acceptance::login::signs_in", "signs in")
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    mod state_tests {
        use super::*;

        #[test]
        fn test_new_is_inactive() {
            let recorder = Recorder::new(RecorderConfig::default()).unwrap();
            assert_eq!(recorder.state(), RecorderState::Inactive);
            assert!(!recorder.is_armed());
            assert!(recorder.seed().is_none());
        }

        #[test]
        fn test_bad_template_rejected() {
            let config = RecorderConfig::default().with_template("<html></html>");
            assert!(matches!(
                Recorder::new(config).unwrap_err(),
                RecorderError::Config { .. }
            ));
        }

        #[test]
        fn test_armed_when_module_present() {
            let out = TempDir::new().unwrap();
            let (recorder, _) = armed(config(&out));
            assert_eq!(recorder.state(), RecorderState::Armed);
            assert!(recorder.seed().is_some());
        }

        #[test]
        fn test_module_absent_stays_inactive() {
            let out = TempDir::new().unwrap();
            let mut recorder = Recorder::new(config(&out)).unwrap();
            recorder.before_suite(&SuiteContext::new("unit")).unwrap();
            assert_eq!(recorder.state(), RecorderState::Inactive);

            let test = login();
            recorder.before_test(&test).unwrap();
            recorder.after_step(&StepInfo::passed("I click \"Go\"")).unwrap();
            recorder.on_failure(&test, "boom").unwrap();
            recorder.on_success(&test).unwrap();

            assert!(entries(out.path()).is_empty());
            assert!(recorder.last_report().is_none());
            assert_eq!(recorder.state(), RecorderState::Inactive);
        }

        #[test]
        fn test_other_module_name() {
            let out = TempDir::new().unwrap();
            let driver = Arc::new(MockDriver::new());
            let mut recorder = Recorder::new(config(&out).with_module("Chromium")).unwrap();
            recorder.before_suite(&suite_with(&driver)).unwrap();
            assert!(!recorder.is_armed());
        }

        #[test]
        fn test_recording_state_and_back() {
            let out = TempDir::new().unwrap();
            let (mut recorder, _) = armed(config(&out));
            recorder.before_test(&login()).unwrap();
            assert_eq!(recorder.state(), RecorderState::Recording);
            recorder.on_success(&login()).unwrap();
            assert_eq!(recorder.state(), RecorderState::Armed);
        }

        #[test]
        fn test_suite_rearm_without_module() {
            let out = TempDir::new().unwrap();
            let (mut recorder, _) = armed(config(&out));
            recorder.before_suite(&SuiteContext::new("unit")).unwrap();
            assert_eq!(recorder.state(), RecorderState::Inactive);
            recorder.before_test(&login()).unwrap();
            assert!(entries(out.path()).is_empty());
        }
    }

    mod sequencing_tests {
        use super::*;

        #[test]
        fn test_steps_numbered_in_order() {
            let out = TempDir::new().unwrap();
            let (mut recorder, driver) = armed(config(&out));
            recorder.before_test(&login()).unwrap();
            for text in ["a", "b", "c", "d"] {
                recorder.after_step(&StepInfo::passed(text)).unwrap();
            }

            let steps = recorder.steps();
            assert_eq!(steps.len(), 4);
            for (i, step) in steps.iter().enumerate() {
                assert_eq!(step.sequence, i);
                assert_eq!(step.filename, format!("{i:03}.png"));
            }
            let dir = recorder.current_dir().unwrap().to_path_buf();
            assert_eq!(entries(&dir), vec!["000.png", "001.png", "002.png", "003.png"]);
            assert_eq!(driver.call_count(), 4);
        }

        #[test]
        fn test_directory_name_uses_seed() {
            let out = TempDir::new().unwrap();
            let (mut recorder, _) = armed(config(&out));
            let seed = recorder.seed().unwrap();
            recorder.before_test(&login()).unwrap();
            assert_eq!(
                recorder.current_dir().unwrap(),
                out.path()
                    .join(format!("recorded_acceptance.login.signs_in_{seed}"))
            );
        }

        #[test]
        fn test_next_test_restarts_numbering() {
            let out = TempDir::new().unwrap();
            let (mut recorder, _) = armed(config(&out).with_delete_successful(false));
            recorder.before_test(&login()).unwrap();
            recorder.after_step(&StepInfo::passed("a")).unwrap();
            recorder.on_success(&login()).unwrap();

            let other = TestInfo::new("acceptance::logout", "logout");
            recorder.before_test(&other).unwrap();
            assert!(recorder.steps().is_empty());
            recorder.after_step(&StepInfo::passed("b")).unwrap();
            assert_eq!(recorder.steps()[0].filename, "000.png");
        }

        #[test]
        fn test_capture_failure_drops_step_without_gap() {
            let out = TempDir::new().unwrap();
            let (mut recorder, driver) = armed(config(&out));
            recorder.before_test(&login()).unwrap();
            recorder.after_step(&StepInfo::passed("a")).unwrap();
            driver.set_failing(true);
            recorder.after_step(&StepInfo::passed("b")).unwrap();
            driver.set_failing(false);
            recorder.after_step(&StepInfo::passed("c")).unwrap();

            let dir = recorder.current_dir().unwrap().to_path_buf();
            let captions: Vec<&str> = recorder.steps().iter().map(|s| s.caption.as_str()).collect();
            assert_eq!(captions, vec!["a", "c"]);
            assert_eq!(recorder.steps()[1].filename, "001.png");
            assert_eq!(entries(&dir), vec!["000.png", "001.png"]);

            recorder.on_failure(&login(), "boom").unwrap();
            let html = std::fs::read_to_string(recorder.last_report().unwrap()).unwrap();
            assert_eq!(html.matches("<img src=").count(), 2);
            for file in ["000.png", "001.png"] {
                assert!(html.contains(&format!("<img src=\"{file}\">")));
                assert!(dir.join(file).exists());
            }
            assert!(!html.contains("002.png"));
        }

        #[test]
        fn test_failed_flag_recorded() {
            let out = TempDir::new().unwrap();
            let (mut recorder, _) = armed(config(&out));
            recorder.before_test(&login()).unwrap();
            recorder.after_step(&StepInfo::passed("a")).unwrap();
            recorder.after_step(&StepInfo::failed("b")).unwrap();
            let flags: Vec<bool> = recorder.steps().iter().map(|s| s.failed).collect();
            assert_eq!(flags, vec![false, true]);
        }

        #[test]
        fn test_step_before_any_test_ignored() {
            let out = TempDir::new().unwrap();
            let (mut recorder, driver) = armed(config(&out));
            recorder.after_step(&StepInfo::passed("a")).unwrap();
            assert_eq!(driver.call_count(), 0);
            assert!(recorder.steps().is_empty());
        }
    }

    mod policy_tests {
        use super::*;

        #[test]
        fn test_success_deleted_by_default() {
            let out = TempDir::new().unwrap();
            let (mut recorder, _) = armed(config(&out));
            recorder.before_test(&login()).unwrap();
            for text in ["a", "b", "c"] {
                recorder.after_step(&StepInfo::passed(text)).unwrap();
            }
            let dir = recorder.current_dir().unwrap().to_path_buf();

            recorder.on_success(&login()).unwrap();
            assert!(!dir.exists());
            assert!(entries(out.path()).is_empty());
            assert!(recorder.last_report().is_none());
        }

        #[test]
        fn test_success_kept_when_configured() {
            let out = TempDir::new().unwrap();
            let (mut recorder, _) = armed(config(&out).with_delete_successful(false));
            recorder.before_test(&login()).unwrap();
            recorder.after_step(&StepInfo::passed("I am on page \"/\"")).unwrap();
            recorder.after_step(&StepInfo::passed("I see \"Welcome\"")).unwrap();
            recorder.on_success(&login()).unwrap();

            let report = recorder.last_report().unwrap().to_path_buf();
            let html = std::fs::read_to_string(&report).unwrap();
            assert!(html.contains("<img src=\"000.png\">"));
            assert!(html.contains("<img src=\"001.png\">"));
            assert_eq!(html.matches("<div class=\"item active\">").count(), 1);
            assert!(!html.contains("carousel-caption error"));
            assert!(html.contains("Signs in"));
            assert_eq!(
                entries(report.parent().unwrap()),
                vec!["000.png", "001.png", "index.html"]
            );
        }

        #[test]
        fn test_failure_always_persisted() {
            for delete_successful in [true, false] {
                let out = TempDir::new().unwrap();
                let (mut recorder, _) =
                    armed(config(&out).with_delete_successful(delete_successful));
                recorder.before_test(&login()).unwrap();
                for i in 0..4 {
                    recorder
                        .after_step(&StepInfo::passed(format!("step {i}")))
                        .unwrap();
                }
                recorder.on_failure(&login(), "assertion failed").unwrap();

                let html = std::fs::read_to_string(recorder.last_report().unwrap()).unwrap();
                assert_eq!(html.matches("<div class=\"item").count(), 4);
                assert_eq!(recorder.state(), RecorderState::Armed);
                assert!(recorder.current_dir().is_none());
            }
        }

        #[test]
        fn test_zero_steps_failure() {
            let out = TempDir::new().unwrap();
            let (mut recorder, _) = armed(config(&out));
            recorder.before_test(&login()).unwrap();
            recorder.on_failure(&login(), "exploded in setup").unwrap();

            let html = std::fs::read_to_string(recorder.last_report().unwrap()).unwrap();
            assert!(html.contains("<nav class=\"navbar\">Signs in</nav>"));
            assert!(!html.contains("<img"));
        }

        #[test]
        fn test_title_falls_back_to_signature() {
            let out = TempDir::new().unwrap();
            let (mut recorder, _) = armed(config(&out));
            let test = TestInfo::new("checkout::pays", "");
            recorder.before_test(&test).unwrap();
            recorder.on_failure(&test, "boom").unwrap();
            let html = std::fs::read_to_string(recorder.last_report().unwrap()).unwrap();
            assert!(html.contains(">Checkout::pays</nav>"));
        }

        #[test]
        fn test_padded_template_placeholders_accepted() {
            let out = TempDir::new().unwrap();
            let template = "<ol>{{ indicators }}</ol>{{ slides }}";
            let (mut recorder, _) = armed(config(&out).with_template(template));
            recorder.before_test(&login()).unwrap();
            recorder.after_step(&StepInfo::passed("a")).unwrap();
            recorder.on_failure(&login(), "boom").unwrap();

            let html = std::fs::read_to_string(recorder.last_report().unwrap()).unwrap();
            assert!(html.contains("<img src=\"000.png\">"));
        }

        #[test]
        fn test_broken_template_surfaces_render_error() {
            let out = TempDir::new().unwrap();
            let template = "{{indicators}}{{slides}}{{footer}}";
            let (mut recorder, _) = armed(config(&out).with_template(template));
            recorder.before_test(&login()).unwrap();
            let err = recorder.on_failure(&login(), "boom").unwrap_err();
            assert!(matches!(err, RecorderError::Render { .. }));
            assert_eq!(recorder.state(), RecorderState::Armed);
        }
    }

    mod directory_failure_tests {
        use super::*;

        #[test]
        fn test_directory_error_disables_capture_for_one_test() {
            let out = TempDir::new().unwrap();
            let blocker = out.path().join("not-a-dir");
            std::fs::write(&blocker, b"x").unwrap();

            let (mut recorder, driver) = armed(RecorderConfig::default().with_output_dir(&blocker));
            let err = recorder.before_test(&login()).unwrap_err();
            assert!(matches!(err, RecorderError::DirectoryCreate { .. }));
            assert_eq!(recorder.state(), RecorderState::Recording);
            assert!(recorder.current_dir().is_none());

            recorder.after_step(&StepInfo::passed("a")).unwrap();
            assert_eq!(driver.call_count(), 0);
            recorder.on_failure(&login(), "boom").unwrap();
            assert!(recorder.last_report().is_none());
            assert_eq!(recorder.state(), RecorderState::Armed);
        }

        #[test]
        fn test_unfinished_test_left_on_disk() {
            let out = TempDir::new().unwrap();
            let (mut recorder, _) = armed(config(&out));
            recorder.before_test(&login()).unwrap();
            recorder.after_step(&StepInfo::passed("a")).unwrap();
            let abandoned = recorder.current_dir().unwrap().to_path_buf();

            recorder
                .before_test(&TestInfo::new("acceptance::next", "next"))
                .unwrap();
            assert!(abandoned.join("000.png").exists());
            assert!(recorder.steps().is_empty());
        }
    }

    mod listener_tests {
        use super::*;

        #[test]
        fn test_events_routed() {
            let out = TempDir::new().unwrap();
            let driver = Arc::new(MockDriver::new());
            let mut recorder = Recorder::new(config(&out)).unwrap();
            let test = login();

            recorder
                .on_event(LifecycleEvent::SuiteBefore, &Event::Suite(suite_with(&driver)))
                .unwrap();
            recorder
                .on_event(LifecycleEvent::TestBefore, &Event::Test(test.clone()))
                .unwrap();
            recorder
                .on_event(LifecycleEvent::StepAfter, &Event::Step(StepInfo::passed("a")))
                .unwrap();
            recorder
                .on_event(
                    LifecycleEvent::TestError,
                    &Event::TestFailed {
                        test,
                        failure: "panic".to_string(),
                    },
                )
                .unwrap();
            assert!(recorder.last_report().is_some());
        }

        #[test]
        fn test_mismatched_payload_ignored() {
            let mut recorder = Recorder::new(RecorderConfig::default()).unwrap();
            recorder
                .on_event(LifecycleEvent::StepAfter, &Event::Test(login()))
                .unwrap();
            assert_eq!(recorder.state(), RecorderState::Inactive);
        }

        #[test]
        fn test_subscribes_to_all_events() {
            let recorder = Recorder::new(RecorderConfig::default()).unwrap();
            assert_eq!(recorder.subscriptions().len(), 6);
            assert_eq!(recorder.name(), "recorder");
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(32))]

            #[test]
            fn prop_n_steps_give_n_files(flags in prop::collection::vec(any::<bool>(), 0..25)) {
                let out = TempDir::new().unwrap();
                let (mut recorder, _) = armed(config(&out));
                recorder.before_test(&login()).unwrap();
                for (i, failed) in flags.iter().enumerate() {
                    let step = StepInfo { text: format!("step {i}"), failed: *failed };
                    recorder.after_step(&step).unwrap();
                }

                let steps = recorder.steps();
                prop_assert_eq!(steps.len(), flags.len());
                for (i, step) in steps.iter().enumerate() {
                    prop_assert_eq!(step.sequence, i);
                    prop_assert_eq!(&step.filename, &format!("{i:03}.png"));
                    prop_assert_eq!(step.failed, flags[i]);
                }
                let dir = recorder.current_dir().unwrap().to_path_buf();
                prop_assert_eq!(entries(&dir).len(), flags.len());
            }
        }
    }
}
