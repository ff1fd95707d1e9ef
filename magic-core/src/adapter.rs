//! Environment-adapter installation: renaming workflow files and rendering
//! their content into the target tool's expected format.

use std::path::Path;

use magic_common::config::InstallerConfig;
use magic_common::error::Result;
use magic_common::model::adapter::{AdapterDef, AdapterFormat};
use tracing::debug;

use crate::copy::{copy_tree, Action};

/// Placeholder expanded during adapter rendering. Markdown-flavored outputs
/// use the `$ARGUMENTS` convention, TOML command files use `{{args}}`.
const ARGS_PLACEHOLDER: &str = "{ARGUMENTS}";

/// A content transform from workflow body to installed file body. One closed
/// set of variants, selected once from the adapter definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowTransform {
    /// Plain markdown output; only the arguments placeholder is expanded.
    Verbatim,
    /// TOML command envelope: `description` plus a triple-quoted `prompt`
    /// carrying the escaped body.
    TomlPrompt { description: String },
    /// Rules front matter (`description` + empty `globs`) prepended to the
    /// unmodified body.
    McRules { description: String },
}

impl WorkflowTransform {
    pub fn for_adapter(format: AdapterFormat, description: &str) -> Self {
        match format {
            AdapterFormat::Plain => WorkflowTransform::Verbatim,
            AdapterFormat::Toml => WorkflowTransform::TomlPrompt {
                description: description.to_string(),
            },
            AdapterFormat::Mdc => WorkflowTransform::McRules {
                description: description.to_string(),
            },
        }
    }

    pub fn apply(&self, content: &str) -> String {
        match self {
            WorkflowTransform::Verbatim => content.replace(ARGS_PLACEHOLDER, "$ARGUMENTS"),
            WorkflowTransform::TomlPrompt { description } => {
                let body = content.replace(ARGS_PLACEHOLDER, "{{args}}");
                format!(
                    "description = \"{}\"\n\nprompt = \"\"\"\n{}\n\"\"\"\n",
                    escape_toml_string(description),
                    escape_toml_block(&body)
                )
            }
            WorkflowTransform::McRules { description } => {
                format!(
                    "---\ndescription: {description}\nglobs:\n---\n{}",
                    content.replace(ARGS_PLACEHOLDER, "$ARGUMENTS")
                )
            }
        }
    }
}

/// Escape a body for inclusion between `"""` delimiters: backslashes first,
/// then any literal triple-quote sequence.
fn escape_toml_block(content: &str) -> String {
    content.replace('\\', "\\\\").replace("\"\"\"", "\\\"\"\"")
}

fn escape_toml_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Install the named adapter by transforming every workflow file under
/// `workflows_src` into the adapter's destination directory. Returns the
/// number of files installed; a missing source directory installs zero
/// files (the caller reports the warning).
pub fn install_adapter(
    project_root: &Path,
    workflows_src: &Path,
    name: &str,
    def: &AdapterDef,
    config: &InstallerConfig,
) -> Result<usize> {
    if !workflows_src.is_dir() {
        debug!(
            "Workflow source {} missing; adapter '{}' installs nothing",
            workflows_src.display(),
            name
        );
        return Ok(0);
    }

    let dest = project_root.join(&def.dest);
    copy_tree(workflows_src, &dest, |rel| {
        let file_name = match rel.file_name() {
            Some(n) => n.to_string_lossy().into_owned(),
            None => return Action::Skip,
        };
        if file_name == ".gitkeep" {
            return Action::Skip;
        }
        let Some(stem) = file_name.strip_suffix(config.default_ext.as_str()) else {
            return Action::Skip;
        };

        let mut dest_name = format!("{stem}{}", def.ext);
        if let Some(prefix) = &config.remove_prefix {
            if let Some(stripped) = dest_name.strip_prefix(prefix.as_str()) {
                dest_name = stripped.to_string();
            }
        }
        let description = dest_name
            .strip_suffix(def.ext.as_str())
            .unwrap_or(&dest_name)
            .to_string();

        Action::Render {
            dest_rel: rel.with_file_name(&dest_name),
            transform: WorkflowTransform::for_adapter(
                def.format,
                &format!("Run the {description} workflow"),
            ),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use magic_common::InstallerConfig;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> (InstallerConfig, TempDir, TempDir) {
        let config = InstallerConfig::load().unwrap();
        (config, TempDir::new().unwrap(), TempDir::new().unwrap())
    }

    #[test]
    fn renames_and_strips_prefix() -> Result<()> {
        let (config, src, project) = fixture();
        fs::write(src.path().join("magic.plan.md"), "plan body")?;
        let def = config.adapter("gemini").unwrap().clone();

        let count = install_adapter(project.path(), src.path(), "gemini", &def, &config)?;
        assert_eq!(count, 1);
        let installed = project.path().join(".gemini/commands/plan.toml");
        assert!(installed.is_file());
        Ok(())
    }

    #[test]
    fn toml_prompt_escapes_backslashes_and_triple_quotes() {
        let transform = WorkflowTransform::TomlPrompt {
            description: "Run the plan workflow".to_string(),
        };
        let rendered = transform.apply("a \\ b\nquote: \"\"\" done");
        assert!(rendered.starts_with("description = \"Run the plan workflow\"\n"));
        assert!(rendered.contains("prompt = \"\"\"\n"));
        assert!(rendered.contains("a \\\\ b"));
        assert!(rendered.contains("quote: \\\"\"\" done"));
        assert!(rendered.trim_end().ends_with("\"\"\""));
    }

    #[test]
    fn mdc_prepends_front_matter_and_keeps_body() {
        let transform = WorkflowTransform::McRules {
            description: "Run the spec workflow".to_string(),
        };
        let rendered = transform.apply("body line\n");
        assert_eq!(
            rendered,
            "---\ndescription: Run the spec workflow\nglobs:\n---\nbody line\n"
        );
    }

    #[test]
    fn arguments_placeholder_follows_output_flavor() {
        assert_eq!(
            WorkflowTransform::Verbatim.apply("use {ARGUMENTS} here"),
            "use $ARGUMENTS here"
        );
        let toml = WorkflowTransform::TomlPrompt {
            description: String::new(),
        }
        .apply("use {ARGUMENTS} here");
        assert!(toml.contains("use {{args}} here"));
    }

    #[test]
    fn gitkeep_and_foreign_extensions_are_skipped() -> Result<()> {
        let (config, src, project) = fixture();
        fs::write(src.path().join(".gitkeep"), "")?;
        fs::write(src.path().join("notes.txt"), "not a workflow")?;
        fs::write(src.path().join("magic.spec.md"), "spec body")?;
        let def = config.adapter("cursor").unwrap().clone();

        let count = install_adapter(project.path(), src.path(), "cursor", &def, &config)?;
        assert_eq!(count, 1);
        assert!(project.path().join(".cursor/rules/spec.mdc").is_file());
        Ok(())
    }

    #[test]
    fn missing_source_directory_installs_zero_files() -> Result<()> {
        let (config, src, project) = fixture();
        let def = config.adapter("cursor").unwrap().clone();
        let missing = src.path().join("nope");
        let count = install_adapter(project.path(), &missing, "cursor", &def, &config)?;
        assert_eq!(count, 0);
        Ok(())
    }
}
