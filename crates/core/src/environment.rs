//! Environment layer loading and merging.
//!
//! An environment file is a plain `KEY=value` file: one assignment per line,
//! an optional `export ` prefix, `#` comments and blank lines ignored, and an
//! optional pair of matching surrounding quotes stripped from the value.
//! Layers are merged in a fixed precedence order (defaults, then the
//! required primary file, then functions), later assignments winning.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use log::{debug, warn};

use crate::config::Options;
use crate::error::{Error, Result};

/// The effective variable set: name to value, deterministic iteration order.
pub type Environment = IndexMap<String, String>;

/// Returns true if `name` is safe as an environment identifier:
/// non-empty, alphanumeric/underscore only, and not starting with a digit.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn strip_quotes(value: &str) -> &str {
    if value.len() >= 2 {
        let bytes = value.as_bytes();
        if (bytes[0] == b'"' && bytes[value.len() - 1] == b'"')
            || (bytes[0] == b'\'' && bytes[value.len() - 1] == b'\'')
        {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Parses one layer's content into an ordered variable map.
///
/// Malformed lines (no `=`, or a key that is not a legal identifier) are
/// skipped with a warning rather than failing the layer; `path` is only used
/// for those log messages.
pub fn parse_layer(content: &str, path: &str) -> Environment {
    let mut variables = Environment::new();

    for (line_number, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let assignment = line.strip_prefix("export ").unwrap_or(line).trim_start();

        let Some((key, value)) = assignment.split_once('=') else {
            warn!(
                "Skipping line {} of `{}`: no `=` in assignment",
                line_number + 1,
                path
            );
            continue;
        };

        let key = key.trim();
        if !is_identifier(key) {
            warn!(
                "Skipping line {} of `{}`: `{}` is not a legal variable name",
                line_number + 1,
                path,
                key
            );
            continue;
        }

        variables.insert(key.to_string(), strip_quotes(value).to_string());
    }

    variables
}

/// Loads an optional layer, returning `None` when the file does not exist.
fn load_optional_layer(file_description: &str, path: &str) -> Result<Option<Environment>> {
    if !Path::new(path).exists() {
        debug!("Optional {file_description} layer `{path}` not present, skipping");
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| Error::io_error(file_description, path, e))?;
    Ok(Some(parse_layer(&content, path)))
}

/// Loads the required primary layer.
///
/// # Errors
///
/// Returns [`Error::PrimaryEnvFile`] if the file is missing or unreadable;
/// this aborts the run before any file mutation.
pub fn load_primary_layer(path: &str) -> Result<Environment> {
    let content = fs::read_to_string(path).map_err(|e| Error::primary_env_file(path, e))?;
    Ok(parse_layer(&content, path))
}

/// Builds the effective environment from the three layers.
///
/// Order: defaults layer (optional), primary layer (required), functions
/// layer (optional). Later layers override earlier ones with the same name.
///
/// # Errors
///
/// Returns an error if the primary layer is unreadable, or if an optional
/// layer exists but cannot be read.
pub fn load_layers(options: &Options, primary_path: &str) -> Result<Environment> {
    let mut effective = Environment::new();

    if let Some(defaults) = load_optional_layer("defaults", &options.default_env_path)? {
        debug!("Loaded {} variables from defaults layer", defaults.len());
        effective.extend(defaults);
    }

    let primary = load_primary_layer(primary_path)?;
    debug!("Loaded {} variables from `{}`", primary.len(), primary_path);
    effective.extend(primary);

    if let Some(functions) = load_optional_layer("functions", &options.functions_env_path)? {
        debug!("Loaded {} variables from functions layer", functions.len());
        effective.extend(functions);
    }

    Ok(effective)
}
