use serde::Deserialize;

use crate::error::{MagicError, Result};

/// How workflow content is rendered into an adapter's destination. A closed
/// set selected once from the adapter definition, never sniffed from file
/// content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdapterFormat {
    /// Verbatim copy of the workflow body.
    Plain,
    /// Wrap the body in a `description`/`prompt = """…"""` TOML command.
    Toml,
    /// Prepend a `description`/`globs` front-matter block.
    Mdc,
}

/// A named environment-adapter rule set. Static configuration, loaded once
/// from the embedded `adapters.json` and never mutated at runtime.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AdapterDef {
    /// Path whose existence in a project implies this adapter is in use.
    pub marker: Option<String>,
    /// Destination directory, relative to the project root.
    pub dest: String,
    /// Output file extension, replacing the source workflow extension.
    pub ext: String,
    pub format: AdapterFormat,
    pub description: String,
}

impl AdapterDef {
    pub fn validate(&self, name: &str) -> Result<()> {
        if self.dest.is_empty() {
            return Err(MagicError::Config(format!(
                "adapter '{name}' has an empty dest"
            )));
        }
        if !self.ext.starts_with('.') {
            return Err(MagicError::Config(format!(
                "adapter '{name}' ext must start with '.', got '{}'",
                self.ext
            )));
        }
        Ok(())
    }
}
