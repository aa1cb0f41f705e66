//! Command-line argument parsing.
//!
//! The surface is deliberately small: `envsub <env_file> <command>
//! [args...]`. Everything else is configured through environment variables
//! (see [`envsub_core::config::Options`]). Incomplete invocations and the
//! literal word `help` print usage and exit 0 rather than failing.

use clap::Parser;

/// Command-line arguments for the `envsub` binary.
///
/// # Examples
///
/// ```bash
/// # Substitute deploy.env into the manifest, confirm, apply, restore
/// envsub deploy.env kubectl apply -f=manifest.yml
///
/// # Skip the confirmation prompt
/// AUTO_APPROVE=yes envsub deploy.env ./release.sh "${VERSION}"
/// ```
#[derive(Parser, Debug)]
#[command(name = "envsub", term_width = 0)]
pub struct Args {
    /// Path to the primary environment file.
    ///
    /// Required for a run; loaded between the optional defaults layer
    /// (`DEFAULT_ENV_PATH`) and functions layer (`FUNCTIONS_ENV_PATH`).
    /// Passing the literal word `help` prints usage instead.
    #[arg(num_args(1))]
    pub env_file: Option<String>,

    /// The command to execute and its arguments.
    ///
    /// Each argument is substituted against the effective environment; the
    /// substituted line is executed through the shell after any referenced
    /// files have been templated.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

impl Args {
    /// True when the invocation asks for usage text: `help`, no env file, or
    /// no command.
    pub fn wants_usage(&self) -> bool {
        match &self.env_file {
            None => true,
            Some(word) if word == "help" => true,
            Some(_) => self.command.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_args_full_invocation() {
        let args = Args::parse_from(["envsub", "deploy.env", "kubectl", "apply", "-f=spec.yml"]);

        assert_eq!(args.env_file, Some("deploy.env".to_string()));
        assert_eq!(args.command, vec!["kubectl", "apply", "-f=spec.yml"]);
        assert!(!args.wants_usage());
    }

    #[test]
    fn test_args_hyphen_arguments_pass_through() {
        let args = Args::parse_from(["envsub", "deploy.env", "grep", "--count", "-v=x"]);
        assert_eq!(args.command, vec!["grep", "--count", "-v=x"]);
    }

    #[test]
    fn test_args_no_env_file_wants_usage() {
        let args = Args::parse_from(["envsub"]);
        assert!(args.wants_usage());
    }

    #[test]
    fn test_args_no_command_wants_usage() {
        let args = Args::parse_from(["envsub", "deploy.env"]);
        assert!(args.wants_usage());
    }

    #[test]
    fn test_args_help_word_wants_usage() {
        let args = Args::parse_from(["envsub", "help"]);
        assert!(args.wants_usage());

        // `help` followed by a command is still a usage request.
        let args = Args::parse_from(["envsub", "help", "echo"]);
        assert!(args.wants_usage());
    }
}
