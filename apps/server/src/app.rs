use std::sync::Arc;

use axum::{routing::get, Router};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use cb_dataset::{
	assets::{AssetCache, HttpFetcher},
	config::BrowserConfig,
	Dataset, ImageId,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::routes;

/// URL prefix the image cache directory is served under.
pub const STATIC_IMAGES: &str = "/static/images";

pub struct AppState {
	pub dataset: Dataset,
	pub assets: AssetCache,
}

impl AppState {
	pub fn load(config: &BrowserConfig) -> cb_dataset::Result<Self> {
		let dataset = Dataset::load(config)?;
		let fetcher = HttpFetcher::new(config.download_timeout())?;

		Ok(Self {
			dataset,
			assets: AssetCache::new(&config.asset_dir, Arc::new(fetcher)),
		})
	}
}

/// Everything but RFC 3986 unreserved characters, so an id always stays one path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
	.remove(b'-')
	.remove(b'.')
	.remove(b'_')
	.remove(b'~');

pub fn item_path(id: &ImageId) -> String {
	format!("/item/{}", utf8_percent_encode(id.as_str(), PATH_SEGMENT))
}

pub fn router(state: Arc<AppState>) -> Router {
	let images = ServeDir::new(state.assets.dir());

	Router::new()
		.route("/", get(routes::index))
		.route("/health", get(|| async { "OK" }))
		.route("/item/:imgid", get(routes::item))
		.nest_service(STATIC_IMAGES, images)
		.fallback(routes::fallback)
		.layer(TraceLayer::new_for_http())
		.with_state(state)
}
