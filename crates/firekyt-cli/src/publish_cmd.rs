//! Immediate publishing.
//!
//! User-facing output uses writeln! to stdout (this is a CLI binary, not debug output).

use std::io::{self, Write};

use firekyt_client::PublishingService;
use firekyt_core::PublishSettings;
use firekyt_core::model::{ConnectionId, ContentId};

use crate::context::report;
use crate::fmt::write_record;

/// Optional per-publication overrides.
#[derive(clap::Args, Debug, Default, Clone)]
pub struct SettingsArgs {
    /// Title override.
    #[arg(long)]
    pub title: Option<String>,
    /// Excerpt override.
    #[arg(long)]
    pub excerpt: Option<String>,
    /// Tag (repeatable).
    #[arg(long = "tag")]
    pub tags: Vec<String>,
}

impl SettingsArgs {
    pub fn into_settings(self) -> Option<PublishSettings> {
        let settings = PublishSettings {
            title: self.title.filter(|t| !t.trim().is_empty()),
            excerpt: self.excerpt.filter(|e| !e.trim().is_empty()),
            tags: self
                .tags
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
        };
        (!settings.is_empty()).then_some(settings)
    }
}

#[derive(clap::Args, Debug)]
pub struct PublishArgs {
    /// Content item ID.
    #[arg(long)]
    pub content: ContentId,
    /// Platform connection ID.
    #[arg(long)]
    pub connection: ConnectionId,
    /// Treat the network as unavailable.
    #[arg(long)]
    pub offline: bool,
    #[command(flatten)]
    pub settings: SettingsArgs,
}

pub async fn run(service: &PublishingService, args: PublishArgs) -> anyhow::Result<()> {
    let record = service
        .publish_now(args.content, args.connection, args.settings.into_settings())
        .await
        .map_err(report)?;
    let mut out = io::stdout();
    writeln!(out, "Published")?;
    write_record(&mut out, &record)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn blank_settings_become_none() {
        let args = SettingsArgs {
            title: Some("  ".into()),
            excerpt: None,
            tags: vec![String::new()],
        };
        assert_eq!(args.into_settings(), None);
    }

    #[test]
    fn settings_are_trimmed() {
        let args = SettingsArgs {
            title: Some("Best budget headphones".into()),
            excerpt: None,
            tags: vec![" audio ".into(), "reviews".into()],
        };
        let settings = args.into_settings().unwrap();
        assert_eq!(settings.title.as_deref(), Some("Best budget headphones"));
        assert_eq!(settings.tags, vec!["audio", "reviews"]);
    }
}
