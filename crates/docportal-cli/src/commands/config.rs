//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use docportal_core::config::AppConfig;
use docportal_core::error::AppError;

use super::Cli;
use crate::output;

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration with secrets masked
    Show,
    /// Validate the configuration
    Validate,
}

/// Execute config commands
pub async fn execute(args: &ConfigArgs, cli: &Cli) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let config = cli.load_config()?;
            output::print_item(&masked(config), cli.format);
        }
        ConfigCommand::Validate => match cli.load_config() {
            Ok(config) => {
                output::print_success(&format!("Configuration '{}' is valid", cli.config));
                output::print_kv(
                    "Server",
                    &format!("{}:{}", config.server.host, config.server.port),
                );
                output::print_kv("Storage", &config.storage.provider);
                output::print_kv("Documents", &config.storage.document_container);
                output::print_kv("Short URLs", &config.storage.short_url_container);
                output::print_kv("Collision mode", &config.upload.collision_mode.to_string());
            }
            Err(e) => {
                output::print_error(&format!("Configuration invalid: {e}"));
                return Err(e);
            }
        },
    }

    Ok(())
}

/// Replaces secrets so the configuration can be printed.
fn masked(mut config: AppConfig) -> AppConfig {
    for secret in [
        &mut config.auth.jwt_secret,
        &mut config.storage.signing_secret,
        &mut config.storage.s3.secret_key,
    ] {
        if !secret.is_empty() {
            *secret = "****".to_string();
        }
    }
    config
}
