//! Run options resolved from the process environment.
//!
//! All recognized configuration comes in through environment variables. This
//! module collects them into an explicit [`Options`] value once, at startup,
//! so the rest of the code never reads ambient environment state.

use std::env;

/// Default path for the optional pre-layer environment file
const DEFAULT_ENV_PATH: &str = "default.env";
/// Default path for the optional post-layer (functions) environment file
const DEFAULT_FUNCTIONS_ENV_PATH: &str = "functions.env";

/// Default shell to use for command execution
pub const DEFAULT_SHELL: &str = "/bin/sh";

/// Resolved run options.
///
/// Built once from the process environment via [`Options::from_env`] and
/// passed explicitly to the components that need it.
#[derive(Debug, Clone)]
pub struct Options {
    /// Path to the defaults layer, loaded before the primary file if present.
    pub default_env_path: String,
    /// Path to the functions layer, loaded after the primary file if present.
    pub functions_env_path: String,
    /// Skip the confirmation prompt when `AUTO_APPROVE=yes`.
    pub auto_approve: bool,
    /// Include the current cluster context in the info banner when
    /// `PRINT_CLUSTER_CONTEXT=yes`.
    pub print_cluster_context: bool,
}

impl Options {
    /// Reads the recognized option variables from the process environment.
    ///
    /// Path options are tilde-expanded. Boolean options are enabled only by
    /// the exact value `yes`.
    pub fn from_env() -> Self {
        Self {
            default_env_path: env_path("DEFAULT_ENV_PATH", DEFAULT_ENV_PATH),
            functions_env_path: env_path("FUNCTIONS_ENV_PATH", DEFAULT_FUNCTIONS_ENV_PATH),
            auto_approve: env_flag("AUTO_APPROVE"),
            print_cluster_context: env_flag("PRINT_CLUSTER_CONTEXT"),
        }
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            default_env_path: DEFAULT_ENV_PATH.to_string(),
            functions_env_path: DEFAULT_FUNCTIONS_ENV_PATH.to_string(),
            auto_approve: false,
            print_cluster_context: false,
        }
    }
}

fn env_path(name: &str, default: &str) -> String {
    let path = env::var(name).unwrap_or_else(|_| default.to_string());
    shellexpand::tilde(&path).to_string()
}

fn env_flag(name: &str) -> bool {
    env::var(name).is_ok_and(|value| value == "yes")
}

/// Tilde-expands a user-supplied path.
pub fn expand_path(path: &str) -> String {
    shellexpand::tilde(path).to_string()
}

/// Resolves the shell to execute the final command with.
///
/// Uses `$SHELL` when set, falling back to [`DEFAULT_SHELL`].
pub fn get_shell() -> String {
    env::var("SHELL").unwrap_or_else(|_| DEFAULT_SHELL.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = Options::default();
        assert_eq!(options.default_env_path, "default.env");
        assert_eq!(options.functions_env_path, "functions.env");
        assert!(!options.auto_approve);
        assert!(!options.print_cluster_context);
    }

    #[test]
    fn test_env_flag_requires_exact_yes() {
        // Flags other than `yes` (including `true`/`1`) stay off.
        std::env::set_var("ENVSUB_TEST_FLAG_ON", "yes");
        std::env::set_var("ENVSUB_TEST_FLAG_OFF", "true");
        assert!(env_flag("ENVSUB_TEST_FLAG_ON"));
        assert!(!env_flag("ENVSUB_TEST_FLAG_OFF"));
        assert!(!env_flag("ENVSUB_TEST_FLAG_UNSET"));
        std::env::remove_var("ENVSUB_TEST_FLAG_ON");
        std::env::remove_var("ENVSUB_TEST_FLAG_OFF");
    }

    #[test]
    fn test_env_path_expands_tilde() {
        std::env::set_var("ENVSUB_TEST_PATH", "~/layers/base.env");
        let expanded = env_path("ENVSUB_TEST_PATH", "default.env");
        assert!(!expanded.starts_with('~'));
        assert!(expanded.ends_with("layers/base.env"));
        std::env::remove_var("ENVSUB_TEST_PATH");
    }

    #[test]
    fn test_env_path_default() {
        assert_eq!(env_path("ENVSUB_TEST_PATH_UNSET", "default.env"), "default.env");
    }

    #[test]
    fn test_default_shell_constant() {
        assert_eq!(DEFAULT_SHELL, "/bin/sh");
    }
}
