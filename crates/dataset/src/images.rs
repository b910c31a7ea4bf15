//! Image locations from the `images` section of a COCO captions file.

use std::path::Path;

use indexmap::{map::Entry, IndexMap};
use serde::Deserialize;
use tracing::{info, warn};

use crate::{read_json, ImageId, Result};

#[derive(Deserialize)]
struct ImagesDocument {
	images: Vec<ImageEntry>,
}

#[derive(Deserialize)]
pub(crate) struct ImageEntry {
	id: ImageId,
	coco_url: String,
}

/// Where an image lives remotely and the name it is cached under locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
	pub url: String,
	pub filename: String,
}

impl ImageRecord {
	pub fn new(url: impl Into<String>) -> Self {
		let url = url.into();
		let filename = derive_filename(&url).to_owned();
		Self { url, filename }
	}
}

/// Local filename for an image URL: everything after the last `_`.
///
/// COCO names its files `COCO_val2014_000000391895.jpg`, so this keeps the
/// numeric part. It is not a basename: a URL without `_` comes back whole.
pub fn derive_filename(url: &str) -> &str {
	url.rsplit('_').next().unwrap_or(url)
}

/// Image records keyed by id, iterated in the order they first appear in the file.
#[derive(Debug, Default, Clone)]
pub struct ImageIndex {
	records: IndexMap<ImageId, ImageRecord>,
}

impl ImageIndex {
	pub fn get(&self, id: &ImageId) -> Option<&ImageRecord> {
		self.records.get(id)
	}

	pub fn get_key_value(&self, id: &ImageId) -> Option<(&ImageId, &ImageRecord)> {
		self.records.get_key_value(id)
	}

	pub fn first(&self) -> Option<&ImageId> {
		self.records.keys().next()
	}

	/// Browsing order of every known image.
	pub fn order(&self) -> impl Iterator<Item = &ImageId> {
		self.records.keys()
	}

	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}
}

impl FromIterator<(ImageId, ImageRecord)> for ImageIndex {
	fn from_iter<T: IntoIterator<Item = (ImageId, ImageRecord)>>(iter: T) -> Self {
		let mut records = IndexMap::new();
		for (id, record) in iter {
			// A repeated id keeps its first position but takes the later record.
			match records.entry(id) {
				Entry::Occupied(mut entry) => {
					warn!("Image {} is listed more than once", entry.key());
					entry.insert(record);
				}
				Entry::Vacant(entry) => {
					entry.insert(record);
				}
			}
		}
		Self { records }
	}
}

pub fn load_images(path: impl AsRef<Path>) -> Result<ImageIndex> {
	let path = path.as_ref();
	let document: ImagesDocument = read_json(path)?;

	Ok(from_entries(document.images, path))
}

pub(crate) fn from_entries(entries: Vec<ImageEntry>, path: &Path) -> ImageIndex {
	let index = entries
		.into_iter()
		.map(|image| (image.id, ImageRecord::new(image.coco_url)))
		.collect::<ImageIndex>();

	info!("Loaded {} images from {path:?}", index.len());

	index
}
