// magic-common/src/config.rs
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{MagicError, Result};
use crate::model::adapter::AdapterDef;

/// Installer settings shipped with the binary. Parsed once at start-up and
/// passed by reference into every component; nothing reads ambient process
/// state after this point.
const CONFIG_JSON: &str = include_str!("../assets/config.json");
const ADAPTERS_JSON: &str = include_str!("../assets/adapters.json");

/// Name of the checksum manifest file under the engine root.
pub const MANIFEST_FILE: &str = ".checksums";
/// Name of the version marker file under the engine root.
pub const VERSION_FILE: &str = ".version";
/// Installation record at the project root.
pub const PROJECT_CONFIG_FILE: &str = ".magicrc.json";
/// Sentinel adapter name meaning "no adapter, plain default tree".
pub const DEFAULT_ENV: &str = "default";
/// Suffix appended to a directory name to form its backup sibling.
pub const BACKUP_SUFFIX: &str = ".bak";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DownloadConfig {
    pub timeout_ms: u64,
    pub temp_prefix: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EjectConfig {
    pub targets: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawConfig {
    github_repo: String,
    package_name: String,
    engine_dir: String,
    agent_dir: String,
    workflows_dir: String,
    default_ext: String,
    remove_prefix: Option<String>,
    download: DownloadConfig,
    user_agent: String,
    eject: EjectConfig,
}

#[derive(Debug, Clone)]
pub struct InstallerConfig {
    pub github_repo: String,
    pub package_name: String,
    pub engine_dir: String,
    pub agent_dir: String,
    pub workflows_dir: String,
    pub default_ext: String,
    pub remove_prefix: Option<String>,
    pub download: DownloadConfig,
    pub user_agent: String,
    pub eject: EjectConfig,
    pub adapters: BTreeMap<String, AdapterDef>,
}

impl InstallerConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading embedded installer configuration");
        let raw: RawConfig = serde_json::from_str(CONFIG_JSON)
            .map_err(|e| MagicError::Config(format!("Invalid embedded config.json: {e}")))?;
        let adapters: BTreeMap<String, AdapterDef> = serde_json::from_str(ADAPTERS_JSON)
            .map_err(|e| MagicError::Config(format!("Invalid embedded adapters.json: {e}")))?;
        Self::from_parts(raw, adapters)
    }

    fn from_parts(raw: RawConfig, adapters: BTreeMap<String, AdapterDef>) -> Result<Self> {
        if !raw.github_repo.contains('/') {
            return Err(MagicError::Config(format!(
                "githubRepo must be an '<owner>/<name>' slug, got '{}'",
                raw.github_repo
            )));
        }
        if raw.engine_dir.is_empty() || raw.agent_dir.is_empty() {
            return Err(MagicError::Config(
                "engineDir and agentDir must not be empty".to_string(),
            ));
        }
        if !raw.default_ext.starts_with('.') {
            return Err(MagicError::Config(format!(
                "defaultExt must start with '.', got '{}'",
                raw.default_ext
            )));
        }
        if adapters.is_empty() {
            return Err(MagicError::Config(
                "adapters.json defines no adapters".to_string(),
            ));
        }
        for (name, def) in &adapters {
            if name == DEFAULT_ENV {
                return Err(MagicError::Config(format!(
                    "adapter name '{DEFAULT_ENV}' is reserved"
                )));
            }
            def.validate(name)?;
        }

        Ok(Self {
            github_repo: raw.github_repo,
            package_name: raw.package_name,
            engine_dir: raw.engine_dir,
            agent_dir: raw.agent_dir,
            workflows_dir: raw.workflows_dir,
            default_ext: raw.default_ext,
            remove_prefix: raw.remove_prefix,
            download: raw.download,
            user_agent: raw.user_agent,
            eject: raw.eject,
            adapters,
        })
    }

    pub fn engine_root(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.engine_dir)
    }

    pub fn agent_root(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.agent_dir)
    }

    pub fn version_file(&self, project_root: &Path) -> PathBuf {
        self.engine_root(project_root).join(VERSION_FILE)
    }

    pub fn project_config_file(&self, project_root: &Path) -> PathBuf {
        project_root.join(PROJECT_CONFIG_FILE)
    }

    pub fn scripts_dir(&self, project_root: &Path) -> PathBuf {
        self.engine_root(project_root).join("scripts")
    }

    /// Workflow sources inside a payload tree (`<payload>/.agent/workflows`).
    pub fn workflows_src(&self, payload_root: &Path) -> PathBuf {
        payload_root.join(&self.agent_dir).join(&self.workflows_dir)
    }

    pub fn adapter(&self, name: &str) -> Option<&AdapterDef> {
        self.adapters.get(name)
    }

    pub fn adapter_names(&self) -> Vec<&str> {
        self.adapters.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_config_parses() -> Result<()> {
        let config = InstallerConfig::load()?;
        assert!(config.github_repo.contains('/'));
        assert_eq!(config.engine_dir, ".magic");
        assert_eq!(config.agent_dir, ".agent");
        assert!(config.adapters.contains_key("cursor"));
        Ok(())
    }

    #[test]
    fn malformed_config_is_a_named_error() {
        let raw = serde_json::from_str::<RawConfig>("{\"githubRepo\": 42}");
        assert!(raw.is_err());
    }

    #[test]
    fn bad_repo_slug_rejected() {
        let mut raw: RawConfig = serde_json::from_str(CONFIG_JSON).unwrap();
        raw.github_repo = "no-slash".to_string();
        let adapters: BTreeMap<String, AdapterDef> = serde_json::from_str(ADAPTERS_JSON).unwrap();
        let err = InstallerConfig::from_parts(raw, adapters).unwrap_err();
        assert!(matches!(err, MagicError::Config(_)));
    }
}
