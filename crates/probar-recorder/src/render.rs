//! Report Renderer - step slideshow as a single HTML page
//!
//! # Layout
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  navbar: {{test}}                                            │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ◄   <img src="000.png">                                  ►  │
//! │      ┌──────────────────────────────────────────────┐        │
//! │      │ caption (red when the step failed)           │        │
//! │      └──────────────────────────────────────────────┘        │
//! │                    ● ○ ○ ○   (indicators)                    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Styling and navigation script are inlined, so the report only depends on
//! the screenshots sitting next to it.

use crate::result::{RecorderError, RecorderResult};
use crate::store::Step;
use crate::template::{has_placeholder, Template};
use regex::Regex;
use std::sync::OnceLock;

/// Accent colour of the highlighted caption fragment
pub const ACCENT_COLOR: &str = "#3498db";

/// Default page shell; placeholders `{{test}}`, `{{indicators}}`, `{{slides}}`
pub const PAGE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Recorder Result: {{test}}</title>
    <style>
        html, body { height: 100%; margin: 0; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: #222; }
        .navbar { position: fixed; top: 0; left: 0; right: 0; z-index: 10; height: 50px; line-height: 50px; padding: 0 20px; background: #222; color: #9d9d9d; font-size: 18px; }
        .carousel, .carousel-inner, .item { height: 100%; }
        .carousel { position: relative; }
        .item { display: none; }
        .item.active { display: block; }
        .fill { width: 100%; height: 100%; text-align: center; overflow-y: scroll; padding-top: 50px; box-sizing: border-box; }
        .fill img { max-width: 100%; }
        .carousel-caption { position: absolute; left: 15%; right: 15%; bottom: 40px; padding: 10px 20px; color: #fff; text-align: center; background: rgba(0, 0, 0, 0.8); }
        .carousel-caption h2 { margin: 0 0 5px; font-size: 22px; }
        .carousel-caption.error { background: #c0392b; }
        .carousel-indicators { position: absolute; bottom: 10px; left: 0; right: 0; margin: 0; padding: 0; list-style: none; text-align: center; }
        .carousel-indicators li { display: inline-block; width: 10px; height: 10px; margin: 1px; border: 1px solid #fff; border-radius: 10px; cursor: pointer; }
        .carousel-indicators li.active { background: #fff; }
        .carousel-control { position: absolute; top: 50px; bottom: 0; width: 10%; color: #fff; font-size: 40px; text-decoration: none; display: flex; align-items: center; justify-content: center; opacity: 0.5; }
        .carousel-control:hover { opacity: 0.9; }
        .carousel-control.left { left: 0; }
        .carousel-control.right { right: 0; }
    </style>
</head>
<body>
    <nav class="navbar">{{test}}</nav>
    <header id="steps" class="carousel">
        <ol class="carousel-indicators">
            {{indicators}}
        </ol>
        <div class="carousel-inner">
            {{slides}}
        </div>
        <a class="left carousel-control" href="#steps" data-slide="prev">&lsaquo;</a>
        <a class="right carousel-control" href="#steps" data-slide="next">&rsaquo;</a>
    </header>
    <script>
    (function () {
        var slides = document.querySelectorAll('#steps .item');
        var dots = document.querySelectorAll('#steps .carousel-indicators li');
        var current = 0;
        function show(index) {
            if (index < 0 || index >= slides.length) { return; }
            slides[current].classList.remove('active');
            dots[current].classList.remove('active');
            current = index;
            slides[current].classList.add('active');
            dots[current].classList.add('active');
        }
        dots.forEach(function (dot) {
            dot.addEventListener('click', function () { show(Number(dot.dataset.slideTo)); });
        });
        document.querySelectorAll('#steps [data-slide]').forEach(function (control) {
            control.addEventListener('click', function (event) {
                event.preventDefault();
                show(current + (control.dataset.slide === 'next' ? 1 : -1));
            });
        });
        document.addEventListener('keydown', function (event) {
            if (event.key === 'ArrowRight') { show(current + 1); }
            if (event.key === 'ArrowLeft') { show(current - 1); }
        });
    })();
    </script>
</body>
</html>
"##;

/// Indicator fragment; placeholders `{{step}}`, `{{isActive}}`
pub const INDICATOR_TEMPLATE: &str =
    r##"<li data-target="#steps" data-slide-to="{{step}}" {{isActive}}></li>"##;

/// Slide fragment; placeholders `{{isActive}}`, `{{image}}`, `{{isError}}`, `{{caption}}`
pub const SLIDE_TEMPLATE: &str = r#"<div class="item {{isActive}}">
    <div class="fill">
        <img src="{{image}}">
    </div>
    <div class="carousel-caption {{isError}}">
        <h2>{{caption}}</h2>
        <small>scroll up and down to see the full page</small>
    </div>
</div>
"#;

/// Renders captured steps into a standalone HTML document
#[derive(Debug, Clone)]
pub struct ReportRenderer {
    page_template: String,
}

impl Default for ReportRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportRenderer {
    /// Create a renderer with the built-in page shell
    #[must_use]
    pub fn new() -> Self {
        Self {
            page_template: PAGE_TEMPLATE.to_string(),
        }
    }

    /// Create a renderer with a custom page shell
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::Config`] if the shell lacks `{{indicators}}`
    /// or `{{slides}}`.
    pub fn with_template(template: impl Into<String>) -> RecorderResult<Self> {
        let page_template = template.into();
        for required in ["indicators", "slides"] {
            if !has_placeholder(&page_template, required) {
                return Err(RecorderError::Config {
                    message: format!("report template is missing {{{{{required}}}}}"),
                });
            }
        }
        Ok(Self { page_template })
    }

    /// Page shell in use
    #[must_use]
    pub fn page_template(&self) -> &str {
        &self.page_template
    }

    /// Render the report for `title` and its steps
    ///
    /// Zero steps render a valid page with empty indicator and slide blocks.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::Render`] if the page shell references a
    /// placeholder the renderer does not provide.
    pub fn render(&self, title: &str, steps: &[Step]) -> RecorderResult<String> {
        let mut indicators = String::new();
        let mut slides = String::new();

        for (i, step) in steps.iter().enumerate() {
            let first = i == 0;
            indicators.push_str(
                &Template::new(INDICATOR_TEMPLATE)
                    .place("step", i)
                    .place("isActive", if first { r#"class="active""# } else { "" })
                    .produce()?,
            );
            slides.push_str(
                &Template::new(SLIDE_TEMPLATE)
                    .place("image", escape_html(&step.filename))
                    .place("caption", highlight_caption(&step.caption))
                    .place("isActive", if first { "active" } else { "" })
                    .place("isError", if step.failed { "error" } else { "" })
                    .produce()?,
            );
        }

        Template::new(&self.page_template)
            .place("test", escape_html(&capitalize_first(title)))
            .place("indicators", indicators)
            .place("slides", slides)
            .produce()
    }
}

/// Uppercase the first character, leave the rest alone
#[must_use]
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Escape a caption and colourise its first quoted argument
///
/// `I click "Login"` becomes
/// `I click <span style="color: #3498db">&quot;Login&quot;</span>`.
#[must_use]
pub fn highlight_caption(caption: &str) -> String {
    static QUOTED: OnceLock<Regex> = OnceLock::new();
    let quoted = QUOTED.get_or_init(|| Regex::new(r#""[^"]*""#).expect("valid highlight pattern"));

    match quoted.find(caption) {
        Some(m) => format!(
            r#"{}<span style="color: {ACCENT_COLOR}">{}</span>{}"#,
            escape_html(&caption[..m.start()]),
            escape_html(m.as_str()),
            escape_html(&caption[m.end()..]),
        ),
        None => escape_html(caption),
    }
}

/// Escape HTML special characters
#[must_use]
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
