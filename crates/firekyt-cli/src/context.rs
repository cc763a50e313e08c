//! Resolved settings and service construction shared by the subcommands.

use std::sync::Arc;

use firekyt_client::{
    HttpConfig, HttpPublishingApi, NetworkStatus, PublishError, PublishingService, QueryCache,
};
use firekyt_core::Config;

use crate::config::CliConfig;
use crate::fmt::write_notice;

/// Settings file/env configuration plus the command-line override.
#[derive(Debug, Clone)]
pub struct Settings {
    pub config: Config,
    /// `--api-url` / `FIREKYT_API_URL`.
    pub api_url_flag: Option<String>,
}

impl Settings {
    /// Flag, then the URL saved at login, then the settings files.
    pub fn api_url(&self, cli: &CliConfig) -> String {
        self.api_url_flag
            .clone()
            .or_else(|| cli.api_url.clone())
            .unwrap_or_else(|| self.config.api.base_url.clone())
    }

    /// Build a service for an authenticated command.
    pub fn service(&self, cli: &CliConfig, online: bool) -> anyhow::Result<PublishingService> {
        let token = cli.access_token.clone().ok_or_else(|| {
            anyhow::anyhow!("Not logged in. Run `firekyt auth login --token <TOKEN>` first")
        })?;
        let api = HttpPublishingApi::new(&HttpConfig {
            base_url: self.api_url(cli),
            token,
            timeout: self.config.api.timeout(),
        })?;
        Ok(PublishingService::new(
            Arc::new(api),
            QueryCache::new(),
            NetworkStatus::new(online),
        ))
    }
}

/// Print the user-facing notice for a workflow error and turn it into a
/// short process error.
pub fn report(err: PublishError) -> anyhow::Error {
    let notice = err.notice();
    let mut stderr = std::io::stderr();
    if write_notice(&mut stderr, &notice, &err).is_err() {
        return anyhow::Error::new(err);
    }
    if notice.retry_recommended {
        anyhow::anyhow!("{} (retrying may help)", notice.title)
    } else {
        anyhow::anyhow!("{}", notice.title)
    }
}
