//! Flat `{{name}}` placeholder substitution
//!
//! The template language has no conditionals or loops. Callers compute every
//! value up front and the template stays purely textual.

use crate::result::{RecorderError, RecorderResult};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Replace every `{{name}}` in `template` with its value from `values`
///
/// Substituted values are not scanned again, so a caption containing
/// `{{slides}}` is emitted verbatim. Brace pairs whose content is not a
/// plain identifier (letters, digits, `_`) are left untouched, as is an
/// unclosed `{{`.
///
/// # Errors
///
/// Returns [`RecorderError::Render`] for an identifier placeholder with no
/// value.
pub fn substitute(template: &str, values: &[(&str, &str)]) -> RecorderResult<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(token) = next_token(rest) {
        out.push_str(&rest[..token.start]);
        if is_placeholder_name(token.name) {
            let value = values
                .iter()
                .find(|(key, _)| *key == token.name)
                .map(|(_, value)| *value)
                .ok_or_else(|| RecorderError::Render {
                    placeholder: token.name.to_string(),
                })?;
            out.push_str(value);
        } else {
            out.push_str(&rest[token.start..token.end]);
        }
        rest = &rest[token.end..];
    }

    out.push_str(rest);
    Ok(out)
}

/// Check if a template mentions `{{name}}`
///
/// Uses the same rules as [`substitute`], so `{{ name }}` counts.
#[must_use]
pub fn has_placeholder(template: &str, name: &str) -> bool {
    let mut rest = template;
    while let Some(token) = next_token(rest) {
        if token.name == name && is_placeholder_name(name) {
            return true;
        }
        rest = &rest[token.end..];
    }
    false
}

/// A `{{...}}` pair; offsets are byte positions in the scanned slice
struct Token<'t> {
    start: usize,
    end: usize,
    name: &'t str,
}

fn next_token(text: &str) -> Option<Token<'_>> {
    let start = text.find(OPEN)?;
    let inner = start + OPEN.len();
    let len = text[inner..].find(CLOSE)?;
    Some(Token {
        start,
        end: inner + len + CLOSE.len(),
        name: text[inner..inner + len].trim(),
    })
}

fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Template with values placed one at a time
///
/// ```
/// use probar_recorder::Template;
///
/// let html = Template::new("<li data-slide-to=\"{{step}}\" {{isActive}}></li>")
///     .place("step", 0)
///     .place("isActive", "class=\"active\"")
///     .produce()
///     .unwrap();
/// assert_eq!(html, "<li data-slide-to=\"0\" class=\"active\"></li>");
/// ```
#[derive(Debug, Clone)]
pub struct Template<'a> {
    body: &'a str,
    values: Vec<(&'static str, String)>,
}

impl<'a> Template<'a> {
    /// Create a template over `body`
    #[must_use]
    pub fn new(body: &'a str) -> Self {
        Self {
            body,
            values: Vec::new(),
        }
    }

    /// Set the value of `{{name}}`
    #[must_use]
    pub fn place(mut self, name: &'static str, value: impl ToString) -> Self {
        self.values.push((name, value.to_string()));
        self
    }

    /// Substitute all placed values
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::Render`] if the body references a value that
    /// was never placed.
    pub fn produce(&self) -> RecorderResult<String> {
        let values: Vec<(&str, &str)> = self
            .values
            .iter()
            .rev()
            .map(|(name, value)| (*name, value.as_str()))
            .collect();
        substitute(self.body, &values)
    }
}
