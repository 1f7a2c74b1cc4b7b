//! CLI command definitions and dispatch.

pub mod config;
pub mod serve;
pub mod sweep;
pub mod token;
pub mod versions;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use docportal_core::config::AppConfig;
use docportal_core::error::AppError;
use docportal_core::traits::clock::SystemClock;
use docportal_storage::StorageManager;

use crate::output::OutputFormat;

/// DocPortal: document storage, versioning, and short links
#[derive(Debug, Parser)]
#[command(name = "docportal", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Environment overlay loaded next to the configuration file
    #[arg(short, long, env = "DOCPORTAL_ENV", default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the DocPortal server
    Serve(serve::ServeArgs),
    /// Mint a development session token
    Token(token::TokenArgs),
    /// Delete expired short URLs
    Sweep,
    /// Print the version chain of a document
    Versions(versions::VersionsArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Serve(args) => serve::execute(args, self).await,
            Commands::Token(args) => token::execute(args, self).await,
            Commands::Sweep => sweep::execute(self).await,
            Commands::Versions(args) => versions::execute(args, self).await,
            Commands::Config(args) => config::execute(args, self).await,
        }
    }

    /// Load configuration from the selected file and environment.
    pub fn load_config(&self) -> Result<AppConfig, AppError> {
        AppConfig::load_file(&self.config, &self.env)
    }
}

/// Helper: open the configured storage containers
pub async fn open_storage(config: &AppConfig) -> Result<Arc<StorageManager>, AppError> {
    let base_url = docportal_api::state::link_base_url(config);
    let manager = StorageManager::from_config(&config.storage, &base_url, Arc::new(SystemClock)).await?;
    Ok(Arc::new(manager))
}
