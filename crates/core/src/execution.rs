//! Dependency preflight and command execution.

use std::env;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use itertools::Itertools;
use log::{debug, warn};

use crate::environment::Environment;
use crate::error::{Error, Result};

fn find_on_path(program: &str) -> Option<PathBuf> {
    let path = Path::new(program);
    if path.components().count() > 1 {
        return path.is_file().then(|| path.to_path_buf());
    }

    let search_path = env::var_os("PATH")?;
    env::split_paths(&search_path)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}

/// Verifies that a required external program is available.
///
/// # Errors
///
/// Returns [`Error::MissingDependency`] when `program` is neither an existing
/// path nor findable on `$PATH`. Called before any side effects.
pub fn ensure_dependency(program: &str) -> Result<()> {
    match find_on_path(program) {
        Some(found) => {
            debug!("Dependency `{}` resolved to `{}`", program, found.display());
            Ok(())
        }
        None => Err(Error::MissingDependency(program.to_string())),
    }
}

/// Runs the substituted command line through the shell.
///
/// The effective environment (shadow variables included) is overlaid on the
/// inherited process environment and stdio is inherited. A non-zero exit
/// status of the child is logged but deliberately not surfaced as a failure:
/// restoration must proceed either way.
///
/// # Errors
///
/// Returns an error only if the shell process cannot be spawned or awaited.
pub fn execute_command_line(
    shell: &str,
    command_line: &str,
    environment: &Environment,
) -> Result<()> {
    debug!(
        "Executing with environment: {}",
        environment
            .iter()
            .sorted()
            .map(|(key, value)| format!("{key}={value}"))
            .join(", ")
    );

    let status = Command::new(shell)
        .args(["-c", command_line])
        .envs(environment.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()?
        .wait()?;

    if !status.success() {
        warn!("Command exited with status {status}; continuing to restore");
    }

    Ok(())
}

/// Captures the current cluster context for the info banner.
///
/// Returns `None` when `kubectl` fails or prints nothing; the banner line is
/// simply omitted in that case.
pub fn current_cluster_context() -> Option<String> {
    let output = Command::new("kubectl")
        .args(["config", "current-context"])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let context = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!context.is_empty()).then_some(context)
}
