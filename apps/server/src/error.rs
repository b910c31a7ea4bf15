use axum::{
	http::StatusCode,
	response::{Html, IntoResponse, Response},
};
use cb_dataset::ImageId;

use crate::page;

#[derive(thiserror::Error, Debug)]
pub enum ServerError {
	#[error("no image with id `{0}`")]
	UnknownImage(ImageId),
	#[error("no images are loaded")]
	EmptyDataset,
	#[error("no page at `{0}`")]
	NoRoute(String),
}

impl IntoResponse for ServerError {
	fn into_response(self) -> Response {
		(StatusCode::NOT_FOUND, Html(page::not_found(&self.to_string()))).into_response()
	}
}
