//! Audit output and the confirmation prompt.

use std::io::{stdin, stdout, Write};

use envsub_core::error::{Error, Result};
use envsub_core::templating::TemplatedFile;

/// Prints one `--------- FILE:` section per templated file, full content
/// included, so the operator can audit exactly what will be used.
pub fn print_file_sections(files: &[TemplatedFile]) {
    for file in files {
        println!("--------- FILE: {}", file.path.display());
        println!("{}", file.content);
    }
}

/// Prints the `--------- INFO:` banner shown before the prompt.
pub fn print_info_banner(cluster_context: Option<&str>, env_file: &str, command_line: &str) {
    println!("--------- INFO:");
    if let Some(context) = cluster_context {
        println!("Cluster context: {context}");
    }
    println!("Env file: {env_file}");
    println!("Command: {command_line}");
}

/// Blocks for one line of operator input.
///
/// Any input, including an empty line, proceeds; aborting is done with
/// Ctrl-C, which the restore handler turns into a clean exit.
///
/// # Errors
///
/// Returns an error if stdout cannot be flushed or stdin cannot be read.
pub fn confirm_run() -> Result<()> {
    print!("Press Enter to run, Ctrl-C to abort: ");
    stdout().flush().map_err(Error::Stdio)?;

    let mut input = String::new();
    stdin().read_line(&mut input).map_err(Error::Stdio)?;
    Ok(())
}
