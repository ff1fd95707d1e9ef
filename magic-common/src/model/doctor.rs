use serde::Deserialize;
use serde_json::Value;

use crate::error::{MagicError, Result};

/// One artifact line from the prerequisite-check script.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactStatus {
    pub exists: bool,
    #[serde(default)]
    pub path: Option<String>,
}

/// Spec-counter block the check script may report alongside artifacts.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SpecCounts {
    pub stable: u64,
}

/// Typed view of the prerequisite-check JSON contract:
/// `{ artifacts: { "<Name>": { exists, path? }, ..., specs?: { stable } },
///    warnings?: [string] }`.
///
/// The `specs` key lives inside the `artifacts` object with a different
/// shape than its siblings, so the report is assembled field-by-field from
/// a `serde_json::Value` rather than derived in one shot.
#[derive(Debug, Clone)]
pub struct DoctorReport {
    pub artifacts: Vec<(String, ArtifactStatus)>,
    pub specs: Option<SpecCounts>,
    pub warnings: Vec<String>,
}

impl DoctorReport {
    pub fn from_json(value: &Value) -> Result<Self> {
        let root = value.as_object().ok_or_else(|| {
            MagicError::Generic("prerequisite check did not emit a JSON object".to_string())
        })?;

        let mut artifacts = Vec::new();
        let mut specs = None;
        if let Some(artifact_map) = root.get("artifacts") {
            let artifact_map = artifact_map.as_object().ok_or_else(|| {
                MagicError::Generic("'artifacts' is not a JSON object".to_string())
            })?;
            for (name, entry) in artifact_map {
                if name == "specs" {
                    specs = Some(serde_json::from_value::<SpecCounts>(entry.clone())?);
                    continue;
                }
                let status: ArtifactStatus =
                    serde_json::from_value(entry.clone()).map_err(|e| {
                        MagicError::Generic(format!("malformed artifact entry '{name}': {e}"))
                    })?;
                artifacts.push((name.clone(), status));
            }
        }

        let warnings = match root.get("warnings") {
            Some(w) => serde_json::from_value::<Vec<String>>(w.clone())
                .map_err(|e| MagicError::Generic(format!("malformed 'warnings' array: {e}")))?,
            None => Vec::new(),
        };

        Ok(Self {
            artifacts,
            specs,
            warnings,
        })
    }
}
