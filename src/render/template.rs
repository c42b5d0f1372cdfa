// src/render/template.rs
use std::collections::HashMap;
use anyhow::{Context, Result};
use tracing::debug;

pub const PAGE_TEMPLATE: &str = "page";

const OPEN: &str = "{{ ";
const CLOSE: &str = " }}";

/// A simple `{{ name }}` substitution engine for the page shell
pub struct TemplateEngine {
    templates: HashMap<String, String>,
}

impl TemplateEngine {
    /// Create an engine with no templates
    pub fn new() -> Self {
        Self {
            templates: HashMap::new(),
        }
    }

    /// Create an engine with the built-in page template registered
    pub fn with_defaults() -> Self {
        let mut engine = Self::new();
        engine.register_template(PAGE_TEMPLATE, get_default_page_template());
        engine
    }

    /// Register a template with a name
    pub fn register_template(&mut self, name: &str, template: &str) {
        self.templates.insert(name.to_string(), template.to_string());
        debug!("Registered template: {}", name);
    }

    /// Render a template with the provided variables
    pub fn render(&self, template_name: &str, variables: &HashMap<String, String>) -> Result<String> {
        let template = self.templates.get(template_name)
            .context(format!("Template not found: {}", template_name))?;

        // Single left-to-right pass; substituted values are never rescanned
        let mut result = String::with_capacity(template.len());
        let mut rest = template.as_str();

        while let Some(start) = rest.find(OPEN) {
            result.push_str(&rest[..start]);
            let after = &rest[start + OPEN.len()..];
            let Some(end) = after.find(CLOSE) else {
                rest = &rest[start..];
                break;
            };

            let placeholder_len = OPEN.len() + end + CLOSE.len();
            match variables.get(&after[..end]) {
                Some(value) => result.push_str(value),
                None => result.push_str(&rest[start..start + placeholder_len]),
            }
            rest = &rest[start + placeholder_len..];
        }
        result.push_str(rest);

        Ok(result)
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

pub fn get_default_page_template() -> &'static str {
    include_str!("../../templates/page.html")
}
