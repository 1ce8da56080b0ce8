//! Endpoint path templates
//!
//! Handles `{{ variable }}` interpolation in API paths such as
//! `subscribers/{{ id }}.xml`. Substituted values must be a single, plain
//! path segment.

use crate::error::{Error, Result};
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::sync::LazyLock;

/// Regex for matching template variables: {{ variable }}
static TEMPLATE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([a-zA-Z_][a-zA-Z0-9_]*)\s*\}\}").unwrap());

/// Variables available to a path template
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    vars: BTreeMap<String, String>,
}

impl TemplateContext {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Display) -> Self {
        self.set(name, value);
        self
    }

    /// Set a variable
    pub fn set(&mut self, name: impl Into<String>, value: impl Display) -> &mut Self {
        self.vars.insert(name.into(), value.to_string());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }
}

/// Render a path template with the given context
pub fn render(template: &str, ctx: &TemplateContext) -> Result<String> {
    let mut result = template.to_string();
    let mut undefined = Vec::new();

    for cap in TEMPLATE_REGEX.captures_iter(template) {
        let (full_match, [name]) = cap.extract();

        match ctx.get(name) {
            Some(value) => {
                check_segment(name, value)?;
                result = result.replace(full_match, value);
            }
            None => undefined.push(name.to_string()),
        }
    }

    if undefined.is_empty() {
        Ok(result)
    } else {
        Err(Error::template(format!(
            "Undefined variable in template: {}",
            undefined.join(", ")
        )))
    }
}

/// Check if a string contains template variables
pub fn has_templates(s: &str) -> bool {
    TEMPLATE_REGEX.is_match(s)
}

fn check_segment(name: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::template(format!("Variable '{name}' is empty")));
    }
    if value
        .chars()
        .any(|c| matches!(c, '/' | '\\' | '?' | '#' | '%') || c.is_whitespace() || c.is_control())
        || value == "."
        || value == ".."
    {
        return Err(Error::template(format!(
            "Variable '{name}' is not a plain path segment: {value:?}"
        )));
    }
    Ok(())
}
