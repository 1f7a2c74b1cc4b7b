//! Start the DocPortal server.

use clap::Args;

use docportal_core::error::AppError;

use super::Cli;

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the server host
    #[arg(long)]
    pub host: Option<String>,

    /// Override the short URL sweep interval in seconds (0 disables it)
    #[arg(long)]
    pub sweep_interval: Option<u64>,
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, cli: &Cli) -> Result<(), AppError> {
    let mut config = cli.load_config()?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }
    if let Some(interval) = args.sweep_interval {
        config.short_url.sweep_interval_seconds = interval;
    }

    println!("Starting DocPortal server...");
    println!("  Host: {}", config.server.host);
    println!("  Port: {}", config.server.port);
    println!("  Storage: {}", config.storage.provider);

    docportal_api::run_server(config).await
}
