use std::sync::Arc;

use axum::{
	extract::{Path, State},
	http::Uri,
	response::{Html, Redirect},
};
use cb_dataset::{assets::AssetStatus, ImageId};
use tracing::{debug, warn};

use crate::{
	app::{item_path, AppState},
	error::ServerError,
	page::{self, Asset},
};

/// The root has nothing to show itself, it sends the browser to the first image.
pub async fn index(State(state): State<Arc<AppState>>) -> Result<Redirect, ServerError> {
	let first = state.dataset.first().ok_or(ServerError::EmptyDataset)?;

	Ok(Redirect::to(&item_path(first)))
}

pub async fn item(
	State(state): State<Arc<AppState>>,
	Path(imgid): Path<String>,
) -> Result<Html<String>, ServerError> {
	let id = ImageId::new(imgid);

	let Some(view) = state.dataset.item(&id) else {
		warn!("Requested unknown image {id}");
		return Err(ServerError::UnknownImage(id));
	};

	let asset = match state.assets.resolve(view.record).await {
		Ok(status) => {
			if status == AssetStatus::Downloaded {
				debug!("Fetched image for {id} on first view");
			}
			Asset::available(&view.record.filename)
		}
		Err(e) => {
			warn!("Image for {id} is unavailable: {e}");
			Asset::Unavailable
		}
	};

	Ok(Html(page::item(&view, &asset)))
}

pub async fn fallback(uri: Uri) -> ServerError {
	ServerError::NoRoute(uri.path().to_owned())
}
