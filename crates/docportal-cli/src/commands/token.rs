//! Mint a session token signed with the configured secret.

use chrono::Duration;
use clap::Args;
use serde::Serialize;

use docportal_auth::JwtEncoder;
use docportal_core::error::AppError;

use super::Cli;
use crate::output::{self, OutputFormat};

/// Arguments for the token command
#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Token subject
    #[arg(short, long, default_value = "dev")]
    pub subject: String,

    /// Display name carried in the token
    #[arg(short, long)]
    pub name: Option<String>,

    /// Lifetime in minutes (defaults to `auth.dev_token_ttl_minutes`)
    #[arg(long)]
    pub ttl_minutes: Option<u64>,
}

#[derive(Debug, Serialize)]
struct IssuedToken {
    subject: String,
    expires_in_minutes: u64,
    token: String,
}

/// Execute the token command
pub async fn execute(args: &TokenArgs, cli: &Cli) -> Result<(), AppError> {
    let config = cli.load_config()?;
    let ttl_minutes = args.ttl_minutes.unwrap_or(config.auth.dev_token_ttl_minutes);
    if ttl_minutes == 0 {
        return Err(AppError::validation("Token lifetime must be at least one minute"));
    }

    let encoder = JwtEncoder::new(&config.auth);
    let token = encoder.issue(
        &args.subject,
        args.name.as_deref(),
        Duration::minutes(ttl_minutes as i64),
    )?;

    match cli.format {
        OutputFormat::Json => output::print_item(
            &IssuedToken {
                subject: args.subject.clone(),
                expires_in_minutes: ttl_minutes,
                token,
            },
            OutputFormat::Json,
        ),
        OutputFormat::Table => println!("{token}"),
    }

    Ok(())
}
