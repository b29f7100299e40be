//! docsearch: serves a documentation site and answers its search form
//!
//! This is the main entry point for the application.

use anyhow::Result;
use clap::Parser;
use docsearch::{
    config::{self, Settings},
    engine::PagefindSource,
    network::HttpClient,
    page::FormBinder,
    web::{create_router, AppState},
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "docsearch", version, about = "Search for static documentation sites")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory holding the generated site
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Server port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut settings = config::load(cli.config.as_deref())?;
    if let Some(root) = cli.root {
        settings.site.root = root;
    }
    if let Some(port) = cli.port {
        settings.server.port = port;
    }

    init_logging(&settings);
    info!("Starting docsearch v{}", docsearch::VERSION);

    // Engine source; nothing is fetched until the first search
    let client = HttpClient::with_settings(&settings.outgoing)?;
    let source = PagefindSource::new(client, &settings.engine.bundle_url)?;
    info!("Search bundle: {}", source.bundle_url());

    let binding = bind_form(&settings).await?;

    // Create application state
    let state = AppState::new(settings.clone(), Arc::new(source), binding)?;
    let app = create_router(state);

    // Bind address
    let addr = SocketAddr::new(settings.server.bind_address.parse()?, settings.server.port);
    info!("Serving {} on http://{}", settings.site.root.display(), addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

fn init_logging(settings: &Settings) {
    let default_level = if settings.general.debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Bind the search form of the configured page; `None` disables search
async fn bind_form(settings: &Settings) -> Result<Option<docsearch::page::SearchBinding>> {
    let binder = FormBinder::new(&settings.site)?;
    let path = settings.page_path();

    let html = match tokio::fs::read_to_string(&path).await {
        Ok(html) => html,
        Err(e) => {
            warn!("Cannot read {}: {}; search disabled", path.display(), e);
            return Ok(None);
        }
    };

    let binding = binder.bind(&html);
    if let Some(ref binding) = binding {
        let action = binding.form_action.as_deref().unwrap_or_default();
        if !action.is_empty() && action != settings.server.search_path {
            warn!(
                "Search form submits to '{}' but search is served at '{}'",
                action, settings.server.search_path
            );
        }
        info!("Search form bound from {}", path.display());
    }

    Ok(binding)
}
