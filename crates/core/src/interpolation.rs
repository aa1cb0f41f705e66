//! `${NAME}` placeholder substitution.
//!
//! Only the exact `${NAME}` syntax is a placeholder. A `$` that is not
//! followed by a complete `{...}` group passes through verbatim, so shell
//! style `$NAME` references and stray dollars in file content are never
//! mangled. Undefined names substitute to the empty string. Substitution is
//! non-recursive: substituted values are not re-scanned.

use crate::environment::Environment;

/// Substitutes every `${NAME}` in `input` against `environment`.
pub fn interpolate(input: &str, environment: &Environment) -> String {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(dollar) = rest.find('$') {
        output.push_str(&rest[..dollar]);
        let after = &rest[dollar + 1..];

        if let Some(after_brace) = after.strip_prefix('{') {
            if let Some(close) = after_brace.find('}') {
                let name = &after_brace[..close];
                if let Some(value) = environment.get(name) {
                    output.push_str(value);
                }
                rest = &after_brace[close + 1..];
                continue;
            }
        }

        // Not a complete placeholder: the dollar itself is literal.
        output.push('$');
        rest = after;
    }

    output.push_str(rest);
    output
}

/// Substitutes each argument independently, preserving order.
pub fn interpolate_arguments(arguments: &[String], environment: &Environment) -> Vec<String> {
    arguments
        .iter()
        .map(|argument| interpolate(argument, environment))
        .collect()
}

/// Joins substituted arguments into the single command line handed to the
/// shell. The shell re-splits this on whitespace, so substituted values
/// containing spaces become multiple words downstream.
pub fn join_command_line(arguments: &[String]) -> String {
    arguments.join(" ")
}
