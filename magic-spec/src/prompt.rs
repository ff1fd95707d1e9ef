//! Interactive confirmations, all bypassable for scripted runs.

use std::io::IsTerminal;

use colored::Colorize;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Select};
use magic_common::error::{MagicError, Result};
use magic_core::conflict::ConflictChoice;

/// Ask a yes/no question. `--yes` pre-authorizes; a non-interactive session
/// without it declines the gated step (a skip, never a failure).
pub fn confirm(message: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        println!(
            "{} Non-interactive session, skipping: {message} (pass --yes to pre-authorize)",
            "⚠".yellow()
        );
        return Ok(false);
    }
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| MagicError::Generic(format!("Confirmation prompt failed: {e}")))
}

/// The three-way conflict decision. A preset from `--on-conflict` wins;
/// otherwise an interactive choice is required, and a non-interactive
/// session aborts rather than guessing about local edits.
pub fn conflict_choice(preset: Option<ConflictChoice>) -> Result<ConflictChoice> {
    if let Some(choice) = preset {
        return Ok(choice);
    }
    if !std::io::stdin().is_terminal() {
        return Err(MagicError::Aborted(
            "locally modified files present and no --on-conflict choice given in a \
             non-interactive session"
                .to_string(),
        ));
    }

    let items = [
        "Overwrite all (discard local changes)",
        "Skip conflicting files (keep local changes)",
        "Abort update",
    ];
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("How should the modified files be handled?")
        .items(&items)
        .default(2)
        .interact()
        .map_err(|e| MagicError::Generic(format!("Conflict prompt failed: {e}")))?;

    Ok(match selection {
        0 => ConflictChoice::Overwrite,
        1 => ConflictChoice::Skip,
        _ => ConflictChoice::Abort,
    })
}
