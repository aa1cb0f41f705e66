use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use log::{debug, info};

use envsub_core::error::{Error, Result};
use envsub_core::templating::{BackupRegistry, RestoreGuard};
use envsub_core::{arguments, config, environment, execution, interpolation, shadow, templating};

use envsub_cli::cli_args::Args;
use envsub_cli::prompt;

fn print_usage() -> Result<()> {
    Args::command().print_help().map_err(Error::Stdio)
}

fn execute() -> Result<()> {
    let args = Args::parse();

    if args.wants_usage() {
        return print_usage();
    }

    // wants_usage() returned false, so the env file is present.
    let Some(env_file) = args.env_file.as_deref() else {
        return print_usage();
    };
    let env_file = config::expand_path(env_file);

    let options = config::Options::from_env();
    let shell = config::get_shell();

    // Preflight before any side effects.
    execution::ensure_dependency(&shell)?;
    if options.print_cluster_context {
        execution::ensure_dependency("kubectl")?;
    }

    let mut effective = environment::load_layers(&options, &env_file)?;
    shadow::add_shadow_variables(&mut effective);
    debug!("Effective environment has {} variables", effective.len());

    let substituted = interpolation::interpolate_arguments(&args.command, &effective);
    let command_line = interpolation::join_command_line(&substituted);
    let references = arguments::extract_file_references(&command_line);

    let registry = BackupRegistry::new();
    // The handler must be live before the first backup so an interruption at
    // any later point restores everything and exits 0.
    templating::install_restore_handler(&registry)?;
    let _guard = RestoreGuard::new(registry.clone());

    let templated = templating::template_files(&registry, &references, &effective)?;
    prompt::print_file_sections(&templated);

    let cluster_context = if options.print_cluster_context {
        execution::current_cluster_context()
    } else {
        None
    };
    prompt::print_info_banner(cluster_context.as_deref(), &env_file, &command_line);

    if !options.auto_approve {
        prompt::confirm_run()?;
    }

    execution::execute_command_line(&shell, &command_line, &effective)?;

    let restored = registry.restore_all();
    if restored > 0 {
        info!("Restored {restored} templated file(s)");
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    match execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
