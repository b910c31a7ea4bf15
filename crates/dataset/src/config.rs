//! Browser configuration

use std::{
	path::{Path, PathBuf},
	time::Duration,
};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{read_json, Result};

const DEFAULT_ASSET_DIR: &str = "static/COCO-images";
const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 30;

/// A registered captioning system and the file holding its output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemEntry {
	/// Display name, also the key captions are grouped under
	pub name: String,
	pub path: PathBuf,
}

impl SystemEntry {
	pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
		Self {
			name: name.into(),
			path: path.into(),
		}
	}
}

/// Everything needed to load a [`crate::Dataset`] and cache its images.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
	/// COCO captions file holding the human `annotations`
	pub annotations: PathBuf,

	/// COCO file holding the `images` listing, defaults to `annotations`
	#[serde(default)]
	pub images: Option<PathBuf>,

	/// Where downloaded images are cached and served from
	#[serde(default = "default_asset_dir")]
	pub asset_dir: PathBuf,

	#[serde(default = "default_download_timeout_secs")]
	pub download_timeout_secs: u64,

	/// Captioning systems, in display order
	#[serde(default)]
	pub systems: Vec<SystemEntry>,
}

fn default_asset_dir() -> PathBuf {
	PathBuf::from(DEFAULT_ASSET_DIR)
}

fn default_download_timeout_secs() -> u64 {
	DEFAULT_DOWNLOAD_TIMEOUT_SECS
}

impl BrowserConfig {
	pub fn new(annotations: impl Into<PathBuf>) -> Self {
		Self {
			annotations: annotations.into(),
			images: None,
			asset_dir: default_asset_dir(),
			download_timeout_secs: DEFAULT_DOWNLOAD_TIMEOUT_SECS,
			systems: Vec::new(),
		}
	}

	/// Load a config file. Relative paths inside it are taken relative to the file itself.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		info!("Loading config from {path:?}");

		let config: Self = read_json(path)?;
		let base = path.parent().unwrap_or_else(|| Path::new(""));

		Ok(config.relative_to(base))
	}

	fn relative_to(mut self, base: &Path) -> Self {
		let resolve = |path: &mut PathBuf| {
			if path.is_relative() {
				*path = base.join(&*path);
			}
		};

		resolve(&mut self.annotations);
		if let Some(images) = self.images.as_mut() {
			resolve(images);
		}
		resolve(&mut self.asset_dir);
		for system in &mut self.systems {
			resolve(&mut system.path);
		}

		self
	}

	pub fn images_path(&self) -> &Path {
		self.images.as_deref().unwrap_or(self.annotations.as_path())
	}

	pub fn download_timeout(&self) -> Duration {
		Duration::from_secs(self.download_timeout_secs)
	}
}
