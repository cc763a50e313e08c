//! Connection subcommands: list, add, update, remove, validate-all, test.
//!
//! User-facing output uses writeln! to stdout (this is a CLI binary, not debug output).

use std::io::{self, Write};

use firekyt_client::PublishingService;
use firekyt_core::ConnectionDraft;
use firekyt_core::model::ConnectionId;

use crate::context::report;
use crate::fmt::{
    write_check, write_connection_detail, write_connection_header, write_connection_row,
};

/// Connection subcommand actions.
#[derive(clap::Subcommand, Debug)]
pub enum ConnectionsAction {
    /// List platform connections.
    List,
    /// Connect a new publishing platform.
    Add(ConnectionArgs),
    /// Replace the credentials of an existing connection.
    Update {
        /// Connection ID.
        id: ConnectionId,
        #[command(flatten)]
        args: ConnectionArgs,
    },
    /// Remove a connection.
    Remove {
        /// Connection ID.
        id: ConnectionId,
    },
    /// Re-validate every stored token.
    ValidateAll,
    /// Live-test a single connection.
    Test {
        /// Connection ID.
        id: ConnectionId,
    },
}

/// Connection form fields. Validation happens before any request.
#[derive(clap::Args, Debug, Default)]
pub struct ConnectionArgs {
    /// Platform: wordpress, ghost, custom, medium, shopify, linkedin, pinterest, instagram.
    #[arg(short, long, default_value = "")]
    pub platform: String,
    /// Platform access token or application password.
    #[arg(short, long, default_value = "")]
    pub token: String,
    /// Blog URL (required for wordpress, ghost and custom).
    #[arg(long)]
    pub blog_url: Option<String>,
    /// Platform username.
    #[arg(long)]
    pub username: Option<String>,
    /// Platform user ID.
    #[arg(long)]
    pub user_id: Option<String>,
    /// Custom API endpoint.
    #[arg(long)]
    pub api_endpoint: Option<String>,
}

impl ConnectionArgs {
    pub fn into_draft(self) -> ConnectionDraft {
        ConnectionDraft {
            platform: self.platform,
            access_token: self.token,
            platform_username: self.username,
            platform_user_id: self.user_id,
            blog_url: self.blog_url,
            api_endpoint: self.api_endpoint,
        }
    }
}

/// Execute a connections subcommand.
pub async fn run(service: &PublishingService, action: ConnectionsAction) -> anyhow::Result<()> {
    let mut out = io::stdout();
    match action {
        ConnectionsAction::List => {
            let connections = service.connections().await.map_err(report)?;
            if connections.is_empty() {
                writeln!(out, "No platform connections.")?;
            } else {
                write_connection_header(&mut out)?;
                for c in &connections {
                    write_connection_row(&mut out, c)?;
                }
                let inactive = connections.iter().filter(|c| !c.is_active).count();
                writeln!(
                    out,
                    "\n{} connection(s), {} inactive",
                    connections.len(),
                    inactive
                )?;
            }
        }
        ConnectionsAction::Add(args) => {
            let outcome = service
                .create_connection(&args.into_draft())
                .await
                .map_err(report)?;
            writeln!(out, "Connection created")?;
            write_connection_detail(&mut out, &outcome.connection, &outcome.state)?;
        }
        ConnectionsAction::Update { id, args } => {
            let outcome = service
                .update_connection(id, &args.into_draft())
                .await
                .map_err(report)?;
            writeln!(out, "Connection updated")?;
            write_connection_detail(&mut out, &outcome.connection, &outcome.state)?;
        }
        ConnectionsAction::Remove { id } => {
            service.remove_connection(id).await.map_err(report)?;
            writeln!(out, "Connection {id} removed")?;
        }
        ConnectionsAction::ValidateAll => {
            let (validation, checks) = service.validate_all().await.map_err(report)?;
            if checks.is_empty() {
                writeln!(out, "No platform connections to validate.")?;
            } else {
                for check in &checks {
                    write_check(&mut out, check)?;
                }
                writeln!(
                    out,
                    "\n{} checked, {} invalid",
                    checks.len(),
                    validation.invalid().count()
                )?;
            }
        }
        ConnectionsAction::Test { id } => {
            let check = service.test_connection(id).await.map_err(report)?;
            write_check(&mut out, &check)?;
        }
    }
    Ok(())
}
