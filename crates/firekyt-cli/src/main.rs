//! `FireKyt` CLI
//!
//! Manage publishing connections, schedule and publish content, and inspect
//! publication history from the terminal.

use clap::{Parser, Subcommand};
use tracing::debug;

use firekyt_cli::auth_cmd::{self, AuthAction};
use firekyt_cli::config::CliConfig;
use firekyt_cli::connections_cmd::{self, ConnectionsAction};
use firekyt_cli::content_cmd::{self, ContentAction};
use firekyt_cli::context::Settings;
use firekyt_cli::history_cmd::{self, HistoryArgs};
use firekyt_cli::publish_cmd::{self, PublishArgs};
use firekyt_cli::schedule_cmd::{self, ScheduleAction};
use firekyt_core::config::load_config;
use firekyt_core::tracing_init::init_tracing;

#[derive(Parser, Debug)]
#[command(name = "firekyt")]
#[command(version, about = "FireKyt publishing client", long_about = None)]
struct Cli {
    /// Publishing API base URL
    #[arg(long, global = true, env = "FIREKYT_API_URL")]
    api_url: Option<String>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Store or clear the session token
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// Manage platform connections
    Connections {
        #[command(subcommand)]
        action: ConnectionsAction,
    },
    /// Browse publishable content
    Content {
        #[command(subcommand)]
        action: ContentAction,
    },
    /// Schedule deferred publications
    Schedule {
        #[command(subcommand)]
        action: ScheduleAction,
    },
    /// Publish content immediately
    Publish(PublishArgs),
    /// Show publication history
    History(HistoryArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let project_dir = std::env::current_dir().ok();
    let config = load_config(project_dir.as_deref())?;
    init_tracing(&config.logging, cli.log_json);

    let settings = Settings {
        config,
        api_url_flag: cli.api_url,
    };
    let mut cli_config = CliConfig::load();
    debug!(api_url = %settings.api_url(&cli_config), "Resolved configuration");

    match cli.command {
        Commands::Auth { action } => auth_cmd::run(action, &mut cli_config, &settings).await,
        Commands::Connections { action } => {
            let service = settings.service(&cli_config, true)?;
            connections_cmd::run(&service, action).await
        }
        Commands::Content { action } => {
            let service = settings.service(&cli_config, true)?;
            content_cmd::run(&service, action).await
        }
        Commands::Schedule {
            action: ScheduleAction::Floor { watch },
        } => schedule_cmd::floor(watch, settings.config.scheduling.floor_refresh()).await,
        Commands::Schedule { action } => {
            let service = settings.service(&cli_config, true)?;
            let refresh = settings.config.scheduling.floor_refresh();
            schedule_cmd::run(&service, action, refresh).await
        }
        Commands::Publish(args) => {
            let service = settings.service(&cli_config, !args.offline)?;
            publish_cmd::run(&service, args).await
        }
        Commands::History(args) => {
            let service = settings.service(&cli_config, true)?;
            history_cmd::run(&service, args).await
        }
    }
}
