//! Base64 shadow variable derivation.
//!
//! For every eligible variable `NAME` in the effective environment a
//! companion `NAME_B64` is added, holding the standard base64 encoding of the
//! value. Shadow variables never shadow each other, and regeneration over the
//! same input is idempotent.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use log::debug;

use crate::environment::{is_identifier, Environment};

/// Suffix appended to a variable name to form its shadow's name.
pub const SHADOW_SUFFIX: &str = "_B64";

fn is_eligible(name: &str, value: &str) -> bool {
    is_identifier(name)
        && !name.ends_with(SHADOW_SUFFIX)
        && !value.is_empty()
        && !value.contains('\n')
}

/// Adds a `NAME_B64` base64 shadow for every eligible variable.
///
/// Eligible means: the name is a legal identifier not already carrying the
/// shadow suffix, and the value is non-empty and single-line. Existing shadow
/// entries are overwritten with the freshly derived value, so running this
/// twice over the same environment is a no-op the second time.
pub fn add_shadow_variables(environment: &mut Environment) {
    let shadows: Vec<(String, String)> = environment
        .iter()
        .filter(|(name, value)| is_eligible(name, value))
        .map(|(name, value)| {
            let shadow_name = format!("{name}{SHADOW_SUFFIX}");
            (shadow_name, STANDARD.encode(value.as_bytes()))
        })
        .collect();

    debug!("Derived {} shadow variables", shadows.len());

    for (name, value) in shadows {
        environment.insert(name, value);
    }
}
