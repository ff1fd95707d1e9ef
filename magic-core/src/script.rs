//! OS-selected engine script subprocesses.

use std::path::{Path, PathBuf};
use std::process::Command;

use magic_common::config::InstallerConfig;
use magic_common::error::{MagicError, Result};
use tracing::debug;

/// Path of a named engine script with the host OS's extension.
pub fn script_path(scripts_dir: &Path, name: &str) -> PathBuf {
    let ext = if cfg!(windows) { "ps1" } else { "sh" };
    scripts_dir.join(format!("{name}.{ext}"))
}

/// Build the host-appropriate command for a script: the PowerShell host on
/// Windows, bash elsewhere.
pub(crate) fn os_command(script: &Path) -> Command {
    if cfg!(windows) {
        let mut cmd = Command::new("powershell.exe");
        cmd.args(["-ExecutionPolicy", "Bypass", "-File"]).arg(script);
        cmd
    } else {
        let mut cmd = Command::new("bash");
        cmd.arg(script);
        cmd
    }
}

/// Run the initialization script with inherited standard I/O. Returns
/// `false` when no script is present (a silent no-op); a non-zero exit is
/// an installation error citing the code.
pub fn run_init_script(project_root: &Path, config: &InstallerConfig) -> Result<bool> {
    let script = script_path(&config.scripts_dir(project_root), "init");
    if !script.exists() {
        debug!("No initialization script at {}", script.display());
        return Ok(false);
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))?;
    }

    let status = os_command(&script).status().map_err(|e| {
        MagicError::CommandExecError(format!("Failed to start {}: {}", script.display(), e))
    })?;
    if !status.success() {
        return Err(MagicError::InstallError(format!(
            "initialization script exited with code {}",
            status.code().unwrap_or(-1)
        )));
    }
    Ok(true)
}
