mod config;
mod debounce;
mod error;
mod logging;
mod plain;
mod search;
mod tui;
mod widget;

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Result;
use clap::{ArgAction, Parser};
use dotenvy::dotenv;
use tokio::sync::Mutex;
use tracing::info;

use crate::config::AppConfig;
use crate::search::{RepoSearch, SearchClient};
use crate::tui::{Theme, TuiApp};
use crate::widget::{SearchWidget, autocomplete_trigger};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "repo-finder",
    version,
    about = "Search GitHub repositories as you type and keep a short list"
)]
struct Cli {
    /// Use plain line mode (disable TUI)
    #[arg(long, action = ArgAction::SetTrue)]
    no_tui: bool,

    /// Search API base URL
    #[arg(long)]
    api_url: Option<String>,

    /// Quiet period before a search fires, in milliseconds
    #[arg(long)]
    debounce_ms: Option<u64>,

    /// Color theme (dark, light)
    #[arg(long)]
    theme: Option<String>,

    /// Log level (error,warn,info,debug,trace)
    #[arg(long)]
    log_level: Option<String>,

    /// Log file path
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    let cfg = AppConfig::from_cli(cli)?;
    logging::init_logging(&cfg.log_level, &cfg.log_file)?;
    cfg.log_load_events();
    info!(?cfg, "app config");

    let widget = Arc::new(Mutex::new(SearchWidget::new(cfg.saved_capacity)));
    let search: Arc<dyn RepoSearch> = Arc::new(SearchClient::new(&cfg.api_base_url, &cfg.http)?);
    let trigger = autocomplete_trigger(
        widget.clone(),
        search,
        Duration::from_millis(cfg.debounce_ms),
    );

    if cfg.no_tui {
        plain::run_plain(widget, trigger).await
    } else {
        let mut app = TuiApp::new("repo-finder", widget, trigger, Theme::from_name(&cfg.theme));
        app.run().await
    }
}
