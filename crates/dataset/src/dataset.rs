use serde::Deserialize;
use tracing::info;

use crate::{
	config::BrowserConfig,
	images::{self, ImageEntry, ImageIndex, ImageRecord},
	navigator::Navigator,
	read_json,
	references::{self, Annotation, References},
	systems::{self, SystemCaptionMap, SystemCaptions},
	ImageId, Result,
};

/// A COCO captions file carrying both sections, parsed in one pass.
#[derive(Deserialize)]
struct CaptionsDocument {
	annotations: Vec<Annotation>,
	images: Vec<ImageEntry>,
}

/// All loaded captions and image locations. Immutable once loaded.
#[derive(Debug, Default, Clone)]
pub struct Dataset {
	references: References,
	images: ImageIndex,
	systems: SystemCaptions,
	navigator: Navigator,
}

/// Everything shown for a single image.
#[derive(Debug, Clone, Copy)]
pub struct ItemView<'a> {
	pub id: &'a ImageId,
	pub record: &'a ImageRecord,
	pub references: &'a [String],
	pub systems: &'a SystemCaptionMap,
	pub previous: Option<&'a ImageId>,
	pub next: Option<&'a ImageId>,
}

impl Dataset {
	pub fn new(references: References, images: ImageIndex, systems: SystemCaptions) -> Self {
		let navigator = Navigator::new(images.order().cloned());

		Self {
			references,
			images,
			systems,
			navigator,
		}
	}

	/// Load every file named by `config`. Any failure is fatal: there is no partial dataset.
	pub fn load(config: &BrowserConfig) -> Result<Self> {
		let (references, images) = load_captions(config)?;
		let systems = systems::load_all(&config.systems)?;

		info!(
			"Dataset ready: {} images, {} with reference captions, {} with system captions",
			images.len(),
			references.len(),
			systems.len()
		);

		Ok(Self::new(references, images, systems))
	}

	pub fn first(&self) -> Option<&ImageId> {
		self.navigator.first()
	}

	pub fn len(&self) -> usize {
		self.navigator.len()
	}

	pub fn is_empty(&self) -> bool {
		self.navigator.is_empty()
	}

	/// Look up one image. `None` when the id is not part of the browsing order.
	pub fn item(&self, id: &ImageId) -> Option<ItemView<'_>> {
		let (id, record) = self.images.get_key_value(id)?;
		let neighbours = self.navigator.neighbours(id)?;

		Some(ItemView {
			id,
			record,
			references: self.references.get(id),
			systems: self.systems.get(id),
			previous: neighbours
				.previous
				.and_then(|previous| self.images.get_key_value(&previous))
				.map(|(id, _)| id),
			next: neighbours
				.next
				.and_then(|next| self.images.get_key_value(&next))
				.map(|(id, _)| id),
		})
	}
}

fn load_captions(config: &BrowserConfig) -> Result<(References, ImageIndex)> {
	let annotations = config.annotations.as_path();

	if config.images_path() != annotations {
		return Ok((
			references::load_references(annotations)?,
			images::load_images(config.images_path())?,
		));
	}

	let document: CaptionsDocument = read_json(annotations)?;

	Ok((
		references::from_annotations(document.annotations, annotations),
		images::from_entries(document.images, annotations),
	))
}
