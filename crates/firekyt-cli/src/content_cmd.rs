//! Content subcommands.
//!
//! User-facing output uses writeln! to stdout (this is a CLI binary, not debug output).

use std::io::{self, Write};

use firekyt_client::PublishingService;

use crate::context::report;
use crate::fmt::truncate;

/// Content subcommand actions.
#[derive(clap::Subcommand, Debug)]
pub enum ContentAction {
    /// List content items that can be published.
    List,
}

/// Execute a content subcommand.
pub async fn run(service: &PublishingService, action: ContentAction) -> anyhow::Result<()> {
    let mut out = io::stdout();
    match action {
        ContentAction::List => {
            let items = service.content().await.map_err(report)?;
            if items.is_empty() {
                writeln!(out, "No content found.")?;
            } else {
                writeln!(out, "{:<8} {:<50} {:<10}", "ID", "TITLE", "STATUS")?;
                for item in &items {
                    writeln!(
                        out,
                        "{:<8} {:<50} {:<10}",
                        item.id,
                        truncate(&item.title, 50),
                        item.status.as_deref().unwrap_or("-"),
                    )?;
                }
                writeln!(out, "\n{} item(s)", items.len())?;
            }
        }
    }
    Ok(())
}
