use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::Context;
use cb_dataset::config::BrowserConfig;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod app;
mod error;
mod page;
mod routes;
mod utils;

#[derive(Parser, Debug)]
#[command(
	name = "caption-browser",
	about = "Browse generated image captions next to human reference captions"
)]
struct Args {
	/// JSON config naming the COCO captions file and every system's output
	#[arg(long, env = "CAPTION_BROWSER_CONFIG", default_value = "caption-browser.json")]
	config: PathBuf,

	/// Address to bind the HTTP server to (host:port)
	#[arg(long, env = "CAPTION_BROWSER_BIND", default_value = "127.0.0.1:5000")]
	bind: SocketAddr,

	/// Override the image cache directory from the config file
	#[arg(long)]
	asset_dir: Option<PathBuf>,

	/// Log at debug level unless RUST_LOG says otherwise
	#[arg(long)]
	debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let args = Args::parse();

	let default_level = if args.debug { "debug" } else { "info" };
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
		)
		.init();

	let mut config = BrowserConfig::load(&args.config)
		.with_context(|| format!("Unable to load config from {:?}", args.config))?;
	if let Some(asset_dir) = args.asset_dir {
		config.asset_dir = asset_dir;
	}

	let state = tokio::task::spawn_blocking(move || app::AppState::load(&config))
		.await
		.context("Dataset loader panicked")?
		.context("Unable to load the caption dataset")?;

	let listener = TcpListener::bind(args.bind)
		.await
		.with_context(|| format!("Unable to bind {}", args.bind))?;
	info!("Listening on http://{}", listener.local_addr()?);

	axum::serve(listener, app::router(Arc::new(state)))
		.with_graceful_shutdown(utils::axum_shutdown_signal())
		.await
		.context("Error with HTTP server!")
}
