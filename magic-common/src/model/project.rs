use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_ENV;

/// The installation record persisted as `.magicrc.json` at the project
/// root. Written at the end of every install or update; read at the start
/// of an update to resolve the effective adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Selected environment-adapter name, or `"default"`.
    pub env: String,
    /// Last-installed engine version.
    pub version: String,
}

impl ProjectConfig {
    pub fn new(env: Option<&str>, version: &str) -> Self {
        Self {
            env: env.unwrap_or(DEFAULT_ENV).to_string(),
            version: version.to_string(),
        }
    }

    pub fn is_default_env(&self) -> bool {
        self.env == DEFAULT_ENV
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json() {
        let rc = ProjectConfig::new(Some("cursor"), "0.6.0");
        let json = serde_json::to_string(&rc).unwrap();
        let back: ProjectConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.env, "cursor");
        assert_eq!(back.version, "0.6.0");
    }

    #[test]
    fn no_env_means_default_sentinel() {
        let rc = ProjectConfig::new(None, "0.6.0");
        assert!(rc.is_default_env());
    }
}
