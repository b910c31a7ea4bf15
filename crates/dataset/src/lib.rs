//! Data side of the caption browser.
//!
//! Loads human reference captions and image locations from a COCO captions file,
//! joins them with the output of every registered captioning system, and keeps a
//! fixed browsing order over the images. Images themselves are cached on disk on
//! first view through [`assets::AssetCache`].

use std::{fs, path::Path};

use serde::de::DeserializeOwned;

pub mod assets;
pub mod config;
mod dataset;
mod error;
mod id;
pub mod images;
pub mod navigator;
pub mod references;
pub mod systems;

pub use dataset::{Dataset, ItemView};
pub use error::{Error, Result};
pub use id::ImageId;

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
	let bytes = fs::read(path).map_err(Error::io(path))?;
	serde_json::from_slice(&bytes).map_err(Error::json(path))
}
