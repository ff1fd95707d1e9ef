//! Prerequisite checks via the engine's check script.

use std::path::Path;

use magic_common::config::InstallerConfig;
use magic_common::error::{MagicError, Result};
use magic_common::model::doctor::DoctorReport;
use serde_json::Value;
use tracing::debug;

use crate::script::{os_command, script_path};

/// Pull the outermost `{…}` span out of subprocess output that may carry
/// extraneous text before or after the JSON object.
pub fn extract_json_object(output: &str) -> Option<&str> {
    let start = output.find('{')?;
    let end = output.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&output[start..=end])
}

/// Run the prerequisite-check script with its JSON flag and parse the one
/// object it emits on stdout. A missing script, a non-zero exit or
/// unparsable output is fatal for the doctor mode.
pub fn run_doctor(project_root: &Path, config: &InstallerConfig) -> Result<DoctorReport> {
    let script = script_path(&config.scripts_dir(project_root), "check-prerequisites");
    if !script.exists() {
        return Err(MagicError::NotFound(format!(
            "prerequisite check script {} not found (is {} installed here?)",
            script.display(),
            config.package_name
        )));
    }

    let output = os_command(&script).arg("--json").output().map_err(|e| {
        MagicError::CommandExecError(format!("Failed to start {}: {}", script.display(), e))
    })?;
    if !output.status.success() {
        return Err(MagicError::CommandExecError(format!(
            "prerequisite check exited with code {}",
            output.status.code().unwrap_or(-1)
        )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    debug!("Prerequisite check emitted {} byte(s)", stdout.len());
    let json = extract_json_object(&stdout).ok_or_else(|| {
        MagicError::Generic("prerequisite check emitted no JSON object".to_string())
    })?;
    let value: Value = serde_json::from_str(json)
        .map_err(|e| MagicError::Generic(format!("unparsable prerequisite check output: {e}")))?;
    DoctorReport::from_json(&value)
}
