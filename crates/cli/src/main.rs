use std::{env, path::PathBuf, str::FromStr};

use clap::Parser;
use exdeploy_core::{load_env_from_project_path, setup_info_logger};

use crate::{
    cli_interface::{Cli, Commands},
    commands::{account, deploy, init, networks, verify},
    error::CliError,
    project_location::ProjectLocation,
};

mod cli_interface;
mod commands;
mod console;
mod error;
mod project_location;

pub use console::{print_error_message, print_success_message, print_warn_message};

fn resolve_path(override_path: &Option<String>) -> Result<PathBuf, String> {
    let path = match override_path {
        Some(path) => {
            PathBuf::from_str(path).map_err(|_| format!("Invalid path provided: '{}'", path))?
        }
        None => env::current_dir().map_err(|_| "Failed to get current directory.".to_string())?,
    };

    path.canonicalize().map_err(|e| format!("Failed to resolve path '{}': {}", path.display(), e))
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    setup_info_logger();

    match &cli.command {
        Commands::Init { path } => {
            let resolved_path = resolve_path(path).inspect_err(|e| print_error_message(e))?;
            load_env_from_project_path(&resolved_path);

            init::handle_init(&resolved_path).await?;
        }
        Commands::Deploy { path, network } => {
            let resolved_path = resolve_path(path).inspect_err(|e| print_error_message(e))?;
            load_env_from_project_path(&resolved_path);

            let project_location = ProjectLocation::new(resolved_path);

            deploy::handle_deploy(network, &project_location).await?;
        }
        Commands::Verify { path, network, address } => {
            let resolved_path = resolve_path(path).inspect_err(|e| print_error_message(e))?;
            load_env_from_project_path(&resolved_path);

            let project_location = ProjectLocation::new(resolved_path);

            verify::handle_verify(network, address, &project_location).await?;
        }
        Commands::Account { path, network } => {
            let resolved_path = resolve_path(path).inspect_err(|e| print_error_message(e))?;
            load_env_from_project_path(&resolved_path);

            let project_location = ProjectLocation::new(resolved_path);

            account::handle_account(network, &project_location).await?;
        }
        Commands::Networks { path } => {
            let resolved_path = resolve_path(path).inspect_err(|e| print_error_message(e))?;
            load_env_from_project_path(&resolved_path);

            let project_location = ProjectLocation::new(resolved_path);

            networks::handle_networks(&project_location)?;
        }
    }

    Ok(())
}
