//! Human reference captions from the `annotations` section of a COCO captions file.

use std::{collections::HashMap, path::Path};

use serde::Deserialize;
use tracing::info;

use crate::{read_json, ImageId, Result};

#[derive(Deserialize)]
struct AnnotationsDocument {
	annotations: Vec<Annotation>,
}

#[derive(Deserialize)]
pub(crate) struct Annotation {
	image_id: ImageId,
	caption: String,
}

/// Reference captions bucketed per image, in file order.
#[derive(Debug, Default, Clone)]
pub struct References {
	by_image: HashMap<ImageId, Vec<String>>,
}

impl References {
	/// Captions for `id`. An image nobody annotated has an empty list.
	pub fn get(&self, id: &ImageId) -> &[String] {
		self.by_image.get(id).map(Vec::as_slice).unwrap_or_default()
	}

	/// Number of images with at least one caption.
	pub fn len(&self) -> usize {
		self.by_image.len()
	}

	pub fn is_empty(&self) -> bool {
		self.by_image.is_empty()
	}
}

impl FromIterator<(ImageId, String)> for References {
	fn from_iter<T: IntoIterator<Item = (ImageId, String)>>(iter: T) -> Self {
		let mut by_image = HashMap::<_, Vec<_>>::new();
		for (id, caption) in iter {
			by_image.entry(id).or_default().push(caption);
		}
		Self { by_image }
	}
}

pub fn load_references(path: impl AsRef<Path>) -> Result<References> {
	let path = path.as_ref();
	let document: AnnotationsDocument = read_json(path)?;

	Ok(from_annotations(document.annotations, path))
}

pub(crate) fn from_annotations(annotations: Vec<Annotation>, path: &Path) -> References {
	let total = annotations.len();

	let references = annotations
		.into_iter()
		.map(|annotation| (annotation.image_id, annotation.caption))
		.collect::<References>();

	info!(
		"Loaded {total} reference captions for {} images from {path:?}",
		references.len()
	);

	references
}
