//! Captions produced by the registered captioning systems.

use std::{collections::HashMap, path::Path};

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::info;

use crate::{config::SystemEntry, read_json, Error, ImageId, Result};

#[derive(Deserialize)]
struct SystemCaption {
	image_id: ImageId,
	caption: String,
}

/// Caption per system for one image, in registry order.
pub type SystemCaptionMap = IndexMap<String, String>;

/// Load one system's results file (`[{"image_id": .., "caption": ..}, ..]`).
pub fn load_system_output(path: impl AsRef<Path>) -> Result<HashMap<ImageId, String>> {
	let captions: Vec<SystemCaption> = read_json(path.as_ref())?;

	Ok(captions
		.into_iter()
		.map(|SystemCaption { image_id, caption }| (image_id, caption))
		.collect())
}

/// Every system's captions regrouped by image.
#[derive(Debug, Default, Clone)]
pub struct SystemCaptions {
	by_image: HashMap<ImageId, SystemCaptionMap>,
	empty: SystemCaptionMap,
}

impl SystemCaptions {
	/// Captions for `id`; systems with no output for this image are simply absent.
	pub fn get(&self, id: &ImageId) -> &SystemCaptionMap {
		self.by_image.get(id).unwrap_or(&self.empty)
	}

	pub fn len(&self) -> usize {
		self.by_image.len()
	}

	pub fn is_empty(&self) -> bool {
		self.by_image.is_empty()
	}
}

/// Join per-system outputs into one map keyed by image.
pub fn aggregate<I>(outputs: I) -> SystemCaptions
where
	I: IntoIterator<Item = (String, HashMap<ImageId, String>)>,
{
	let mut by_image = HashMap::<ImageId, SystemCaptionMap>::new();

	for (system, captions) in outputs {
		for (id, caption) in captions {
			by_image.entry(id).or_default().insert(system.clone(), caption);
		}
	}

	SystemCaptions {
		by_image,
		empty: SystemCaptionMap::new(),
	}
}

/// Load every registered system and aggregate them. Any unreadable file fails the whole load.
pub fn load_all(registry: &[SystemEntry]) -> Result<SystemCaptions> {
	let mut outputs = Vec::with_capacity(registry.len());

	for SystemEntry { name, path } in registry {
		if outputs.iter().any(|(seen, _)| seen == name) {
			return Err(Error::DuplicateSystem(name.clone()));
		}

		let captions = load_system_output(path)?;
		info!("Loaded {} captions for system `{name}` from {path:?}", captions.len());
		outputs.push((name.clone(), captions));
	}

	Ok(aggregate(outputs))
}

#[cfg(test)]
mod tests {
	use std::{fs, path::PathBuf};

	use tempfile::TempDir;

	use super::*;

	fn output(pairs: &[(u64, &str)]) -> HashMap<ImageId, String> {
		pairs
			.iter()
			.map(|(id, caption)| (ImageId::from(*id), caption.to_string()))
			.collect()
	}

	fn write_system(dir: &TempDir, name: &str, body: &str) -> PathBuf {
		let path = dir.path().join(name);
		fs::write(&path, body).unwrap();
		path
	}

	#[test]
	fn loads_one_caption_per_image() {
		let dir = tempfile::tempdir().unwrap();
		let path = write_system(
			&dir,
			"results.json",
			r#"[{"image_id": 1, "caption": "a man riding a horse"}, {"image_id": "2", "caption": "a bowl of fruit"}]"#,
		);

		let captions = load_system_output(path).unwrap();

		assert_eq!(captions.len(), 2);
		assert_eq!(captions[&ImageId::from(1)], "a man riding a horse");
		assert_eq!(captions[&ImageId::from(2)], "a bowl of fruit");
	}

	#[test]
	fn absent_images_have_no_entry_for_that_system() {
		let captions = aggregate([
			("alpha".to_string(), output(&[(1, "a1"), (2, "a2")])),
			("beta".to_string(), output(&[(2, "b2")])),
			("gamma".to_string(), output(&[(3, "c3")])),
		]);

		let first = captions.get(&ImageId::from(1));
		assert_eq!(first.len(), 1);
		assert_eq!(first.get("alpha").map(String::as_str), Some("a1"));
		assert!(!first.contains_key("beta"));
		assert!(!first.contains_key("gamma"));

		let second = captions.get(&ImageId::from(2));
		assert_eq!(second.keys().collect::<Vec<_>>(), ["alpha", "beta"]);

		assert!(captions.get(&ImageId::from(99)).is_empty());
	}

	#[test]
	fn registry_order_is_kept_per_image() {
		let captions = aggregate([
			("zeta".to_string(), output(&[(1, "z")])),
			("alpha".to_string(), output(&[(1, "a")])),
		]);

		assert_eq!(
			captions.get(&ImageId::from(1)).keys().collect::<Vec<_>>(),
			["zeta", "alpha"]
		);
	}

	#[test]
	fn missing_system_file_aborts_loading() {
		let dir = tempfile::tempdir().unwrap();
		let present = write_system(&dir, "a.json", r#"[{"image_id": 1, "caption": "x"}]"#);

		let registry = [
			SystemEntry::new("A", present),
			SystemEntry::new("B", dir.path().join("missing.json")),
		];

		assert!(matches!(load_all(&registry), Err(Error::Io { .. })));
	}

	#[test]
	fn duplicate_system_names_are_rejected() {
		let dir = tempfile::tempdir().unwrap();
		let path = write_system(&dir, "a.json", "[]");

		let registry = [
			SystemEntry::new("A", path.clone()),
			SystemEntry::new("A", path),
		];

		assert!(matches!(load_all(&registry), Err(Error::DuplicateSystem(name)) if name == "A"));
	}
}
