use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::sync::Arc;

use skycast::core::config::{self, CliOverrides};
use skycast::core::session::SessionStore;

#[derive(Parser)]
#[command(name = "skycast", about = "Terminal weather client")]
struct Args {
    /// Backend base URL (overrides config and SKYCAST_BASE_URL)
    #[arg(short, long)]
    base_url: Option<String>,

    /// Screen to open first, e.g. /login or /weather/Berlin
    #[arg(short, long)]
    route: Option<String>,

    /// Quiet period before a search is sent, in milliseconds
    #[arg(long)]
    debounce_ms: Option<u64>,

    /// Forget the saved session before starting
    #[arg(long)]
    logout: bool,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to skycast.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("skycast.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("{}; falling back to defaults", e);
        config::SkycastConfig::default()
    });
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            base_url: args.base_url,
            debounce_ms: args.debounce_ms,
            route: args.route,
        },
    );

    log::info!(
        "Skycast starting up against {} (debounce {:?})",
        resolved.base_url,
        resolved.debounce
    );

    let session = match &resolved.session_file {
        Some(path) => SessionStore::open_or_empty(path),
        None => SessionStore::in_memory(),
    };
    if args.logout && let Err(e) = session.clear() {
        log::warn!("Could not clear session: {}", e);
    }

    skycast::tui::run(resolved, Arc::new(session))
}
