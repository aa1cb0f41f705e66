//! Envsub Core Library
//!
//! This crate provides the core functionality for envsub, an
//! environment-variable templating runner: it merges layered `KEY=value`
//! environment files, derives base64 shadow variables, substitutes `${NAME}`
//! placeholders into command arguments and referenced files, and executes the
//! resulting command with guaranteed restoration of every templated file.
//!
//! # Key Features
//!
//! - **Environment Layering**: Merge defaults, primary, and functions layers
//!   in fixed precedence order
//! - **Shadow Variables**: Derive a base64-encoded companion for every
//!   variable
//! - **Placeholder Substitution**: Flat `${NAME}` substitution that never
//!   mangles other `$` characters
//! - **Recoverable File Templating**: Rename-based backups restored on every
//!   exit path, including SIGINT/SIGTERM
//! - **Error Handling**: Comprehensive error types for all failure modes
//!
//! # Examples
//!
//! Substituting a command argument against a loaded environment:
//!
//! ```
//! use envsub_core::environment::Environment;
//! use envsub_core::interpolation::interpolate;
//!
//! let mut env = Environment::new();
//! env.insert("NAME".to_string(), "world".to_string());
//! assert_eq!(interpolate("hello-${NAME}", &env), "hello-world");
//! ```

pub mod arguments;
pub mod config;
pub mod environment;
pub mod error;
pub mod execution;
pub mod interpolation;
pub mod shadow;
pub mod templating;
