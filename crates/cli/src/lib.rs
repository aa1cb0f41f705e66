//! Envsub CLI Library
//!
//! Command-line interface for envsub, the environment-variable templating
//! runner. It parses the `envsub <env_file> <command> [args...]` surface,
//! prints the file and info audit sections, prompts for confirmation, and
//! orchestrates the core layering/templating/execution/restoration flow.
//!
//! # Modules
//!
//! - [`cli_args`]: Command-line argument parsing
//! - [`prompt`]: Audit output sections and the confirmation prompt

pub mod cli_args;
pub mod prompt;
