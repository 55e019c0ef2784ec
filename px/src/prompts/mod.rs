//! Prompt loading and rendering
//!
//! Loads prompt templates from an override directory or falls back to
//! embedded defaults, and renders them with Handlebars.

pub mod embedded;

use std::path::{Path, PathBuf};

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

/// Default override directory, relative to the working directory
const OVERRIDE_DIR: &str = ".planexec/prompts";

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// User override directory (e.g. `.planexec/prompts/`)
    override_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a loader that checks the working directory for overrides
    pub fn from_cwd() -> Self {
        let dir = PathBuf::from(OVERRIDE_DIR);
        Self {
            hbs: Handlebars::new(),
            override_dir: if dir.exists() { Some(dir) } else { None },
        }
    }

    /// Create a loader with an explicit override directory
    pub fn with_override_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref().to_path_buf();
        Self {
            hbs: Handlebars::new(),
            override_dir: if dir.exists() { Some(dir) } else { None },
        }
    }

    /// Create a loader that only uses embedded prompts (for testing)
    pub fn embedded_only() -> Self {
        Self {
            hbs: Handlebars::new(),
            override_dir: None,
        }
    }

    /// Load a template by name
    ///
    /// Checks the override directory (`{name}.pmt`) first, then the
    /// embedded defaults.
    pub fn load_template(&self, name: &str) -> Result<String> {
        if let Some(ref dir) = self.override_dir {
            let path = dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!("Loading prompt from override: {:?}", path);
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read prompt {}: {}", path.display(), e));
            }
        }

        if let Some(content) = embedded::get_embedded(name) {
            return Ok(content.to_string());
        }

        Err(eyre!("Prompt template not found: {}", name))
    }

    /// Render a template with the given context
    pub fn render<T: Serialize>(&self, template_name: &str, context: &T) -> Result<String> {
        let template = self.load_template(template_name)?;
        self.hbs
            .render_template(&template, context)
            .map_err(|e| eyre!("Failed to render template {}: {}", template_name, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_load_embedded_plan() {
        let loader = PromptLoader::embedded_only();
        let plan = loader.load_template("plan").unwrap();
        assert!(plan.contains("step by step plan"));
    }

    #[test]
    fn test_unknown_template_errors() {
        let loader = PromptLoader::embedded_only();
        assert!(loader.load_template("nonexistent").is_err());
    }

    #[test]
    fn test_render_execute_step() {
        let loader = PromptLoader::embedded_only();
        let rendered = loader
            .render(
                "execute-step",
                &json!({"plan": "1. Compute 2+2", "task": "Compute 2+2"}),
            )
            .unwrap();

        assert!(rendered.contains("1. Compute 2+2"));
        assert!(rendered.contains("executing step 1, Compute 2+2"));
    }

    #[test]
    fn test_render_does_not_escape_quotes() {
        let loader = PromptLoader::embedded_only();
        let rendered = loader
            .render("execute-step", &json!({"plan": "1. Ask \"why\"", "task": "Ask \"why\""}))
            .unwrap();

        assert!(rendered.contains("Ask \"why\""));
        assert!(!rendered.contains("&quot;"));
    }

    #[test]
    fn test_override_directory_wins() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(temp.path().join("plan.pmt"), "custom planner prompt").unwrap();

        let loader = PromptLoader::with_override_dir(temp.path());
        assert_eq!(loader.load_template("plan").unwrap(), "custom planner prompt");

        // Non-overridden names still fall back to embedded
        assert!(loader.load_template("replan").unwrap().contains("submit_action"));
    }
}
