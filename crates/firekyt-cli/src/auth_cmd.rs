//! Auth subcommands: login, logout, status.
//!
//! User-facing output uses writeln! to stdout (this is a CLI binary, not debug output).

use std::io::{self, Write};

use firekyt_client::{HttpConfig, HttpPublishingApi, PublishingApi};

use crate::config::CliConfig;
use crate::context::Settings;

/// Auth subcommand actions.
#[derive(clap::Subcommand, Debug)]
pub enum AuthAction {
    /// Store a session token issued by the FireKyt web app.
    Login {
        /// Bearer token.
        #[arg(short, long)]
        token: String,
        /// Save without checking the token against the API.
        #[arg(long)]
        skip_verify: bool,
    },
    /// Forget the stored token.
    Logout,
    /// Show current auth status.
    Status,
}

/// Execute an auth subcommand.
pub async fn run(
    action: AuthAction,
    config: &mut CliConfig,
    settings: &Settings,
) -> anyhow::Result<()> {
    match action {
        AuthAction::Login { token, skip_verify } => {
            login(config, settings, token, skip_verify).await
        }
        AuthAction::Logout => logout(config),
        AuthAction::Status => status(config, settings),
    }
}

async fn login(
    config: &mut CliConfig,
    settings: &Settings,
    token: String,
    skip_verify: bool,
) -> anyhow::Result<()> {
    let token = token.trim().to_string();
    if token.is_empty() {
        anyhow::bail!("Token must not be empty");
    }
    let base_url = settings.api_url(config);

    let mut out = io::stdout();
    if !skip_verify {
        let api = HttpPublishingApi::new(&HttpConfig {
            base_url: base_url.clone(),
            token: token.clone(),
            timeout: settings.config.api.timeout(),
        })?;
        let connections = api
            .list_connections()
            .await
            .map_err(|e| anyhow::anyhow!("Login failed: {}", e.notice()))?;
        writeln!(
            out,
            "Token verified ({} platform connection(s))",
            connections.len()
        )?;
    }

    config.access_token = Some(token);
    if settings.api_url_flag.is_some() {
        config.api_url = Some(base_url.clone());
    }
    config.save()?;
    writeln!(out, "Logged in to {base_url}")?;
    Ok(())
}

fn logout(config: &mut CliConfig) -> anyhow::Result<()> {
    config.clear_auth();
    config.save()?;
    let mut out = io::stdout();
    writeln!(out, "Logged out")?;
    Ok(())
}

fn status(config: &CliConfig, settings: &Settings) -> anyhow::Result<()> {
    let mut out = io::stdout();
    if config.is_logged_in() {
        writeln!(out, "Logged in")?;
    } else {
        writeln!(out, "Not logged in")?;
    }
    writeln!(out, "API: {}", settings.api_url(config))?;
    Ok(())
}
