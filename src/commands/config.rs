//! Configuration file editor command.
//!
//! Opens `siriwave.toml` in the user's editor and checks that the edited file
//! still loads, so mistakes show up before the next `listen`.

use crate::config::{get_config_path, SiriwaveConfig};
use std::process::Command;

/// Fallback editors, tried in order when `$EDITOR` is unset.
const FALLBACK_EDITORS: [&str; 2] = ["nano", "vi"];

/// Opens the configuration file in `$EDITOR`, nano or vi.
///
/// Writes the default config first if none exists yet.
///
/// # Errors
/// - If no editor can be found or executed
/// - If the editor exits with an error
/// - If the edited file no longer parses
pub fn handle_config() -> anyhow::Result<()> {
    let config_path = get_config_path()?;
    crate::setup::check_and_run_setup(&config_path)?;

    let editor = find_editor(std::env::var("EDITOR").ok(), is_editor_available)?;
    tracing::info!("Opening config file {} with {}", config_path.display(), editor);

    let status = Command::new(&editor)
        .arg(&config_path)
        .status()
        .map_err(|e| anyhow::anyhow!("Failed to open editor '{editor}': {e}"))?;

    if !status.success() {
        return Err(anyhow::anyhow!(
            "Editor exited with error code: {}",
            status.code().unwrap_or(-1)
        ));
    }

    match SiriwaveConfig::load_from(&config_path) {
        Ok(_) => {
            tracing::info!("Config file edited successfully");
            Ok(())
        }
        Err(e) => {
            tracing::warn!("Edited config does not load: {e:#}");
            Err(anyhow::anyhow!(
                "{e:#}\n\nRun 'siriwave config' again to fix the file."
            ))
        }
    }
}

/// Picks `$EDITOR` when set, otherwise the first available fallback.
fn find_editor(
    env_editor: Option<String>,
    is_available: impl Fn(&str) -> bool,
) -> anyhow::Result<String> {
    if let Some(editor) = env_editor.filter(|editor| !editor.trim().is_empty()) {
        return Ok(editor);
    }

    FALLBACK_EDITORS
        .iter()
        .find(|editor| is_available(editor))
        .map(|editor| editor.to_string())
        .ok_or_else(|| anyhow::anyhow!("No editor found. Please set the $EDITOR environment variable."))
}

/// Checks if an editor is available in the system PATH.
fn is_editor_available(editor: &str) -> bool {
    Command::new("which")
        .arg(editor)
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}
