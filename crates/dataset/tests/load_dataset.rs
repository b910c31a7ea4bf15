//! Loads a small dataset from disk the same way the server does at startup.

use std::{fs, path::Path};

use cb_dataset::{
	config::{BrowserConfig, SystemEntry},
	Dataset, Error, ImageId,
};
use tempfile::tempdir;

fn write(dir: &Path, name: &str, contents: &str) {
	fs::write(dir.join(name), contents).unwrap();
}

fn fixture(dir: &Path) -> BrowserConfig {
	write(
		dir,
		"captions_val2014.json",
		r#"{
			"info": {"description": "test"},
			"images": [
				{"id": 391895, "file_name": "COCO_val2014_000000391895.jpg", "coco_url": "http://images.cocodataset.org/val2014/COCO_val2014_000000391895.jpg"},
				{"id": 522418, "file_name": "COCO_val2014_000000522418.jpg", "coco_url": "http://images.cocodataset.org/val2014/COCO_val2014_000000522418.jpg"},
				{"id": 184613, "file_name": "COCO_val2014_000000184613.jpg", "coco_url": "http://images.cocodataset.org/val2014/COCO_val2014_000000184613.jpg"}
			],
			"annotations": [
				{"image_id": 391895, "id": 1, "caption": "A man with a red helmet on a small moped on a dirt road."},
				{"image_id": 522418, "id": 2, "caption": "A woman wearing a net on her head cutting a cake."},
				{"image_id": 391895, "id": 3, "caption": "Man riding a motor bike on a dirt road on the countryside."}
			]
		}"#,
	);
	write(
		dir,
		"vinyals.json",
		r#"[{"image_id": 391895, "caption": "a man riding a motorcycle down a dirt road"}]"#,
	);
	write(
		dir,
		"zhou.json",
		r#"[
			{"image_id": 391895, "caption": "a person riding a motorcycle"},
			{"image_id": 184613, "caption": "a group of cows in a field"}
		]"#,
	);

	let mut config = BrowserConfig::new(dir.join("captions_val2014.json"));
	config.asset_dir = dir.join("images");
	config.systems = vec![
		SystemEntry::new("Vinyals et al. 2017", dir.join("vinyals.json")),
		SystemEntry::new("Zhou et al. 2017", dir.join("zhou.json")),
	];
	config
}

#[test]
fn loads_and_joins_every_source() {
	let dir = tempdir().unwrap();
	let dataset = Dataset::load(&fixture(dir.path())).unwrap();

	assert_eq!(dataset.len(), 3);
	assert_eq!(dataset.first(), Some(&ImageId::from(391895)));

	let item = dataset.item(&ImageId::from(391895)).unwrap();
	assert_eq!(item.references.len(), 2);
	assert_eq!(item.systems.len(), 2);
	assert_eq!(item.record.filename, "000000391895.jpg");
	assert_eq!(item.next, Some(&ImageId::from(522418)));

	let item = dataset.item(&ImageId::from(522418)).unwrap();
	assert_eq!(item.references.len(), 1);
	assert!(item.systems.is_empty());

	let item = dataset.item(&ImageId::from(184613)).unwrap();
	assert!(item.references.is_empty());
	assert_eq!(
		item.systems.keys().collect::<Vec<_>>(),
		["Zhou et al. 2017"]
	);
	assert_eq!(item.next, None);
}

#[test]
fn any_unreadable_file_aborts_loading() {
	let dir = tempdir().unwrap();
	let config = fixture(dir.path());
	write(dir.path(), "zhou.json", "{ not json");

	assert!(matches!(Dataset::load(&config), Err(Error::Json { .. })));

	fs::remove_file(dir.path().join("vinyals.json")).unwrap();
	assert!(matches!(Dataset::load(&config), Err(Error::Io { .. })));
}

#[test]
fn images_may_come_from_a_separate_file() {
	let dir = tempdir().unwrap();
	let combined = Dataset::load(&fixture(dir.path())).unwrap();

	let document: serde_json::Value =
		serde_json::from_str(&fs::read_to_string(dir.path().join("captions_val2014.json")).unwrap())
			.unwrap();
	write(
		dir.path(),
		"annotations_only.json",
		&serde_json::json!({ "annotations": document["annotations"] }).to_string(),
	);
	write(
		dir.path(),
		"images_only.json",
		&serde_json::json!({ "images": document["images"] }).to_string(),
	);

	let mut config = fixture(dir.path());
	config.annotations = dir.path().join("annotations_only.json");
	config.images = Some(dir.path().join("images_only.json"));
	let split = Dataset::load(&config).unwrap();

	assert_eq!(split.len(), combined.len());
	for id in [391895u64, 522418, 184613].map(ImageId::from) {
		let (a, b) = (split.item(&id).unwrap(), combined.item(&id).unwrap());
		assert_eq!(a.references, b.references);
		assert_eq!(a.record, b.record);
		assert_eq!(a.next, b.next);
	}
}

#[test]
fn combined_file_needs_both_sections() {
	let dir = tempdir().unwrap();
	let mut config = fixture(dir.path());
	write(dir.path(), "captions_val2014.json", r#"{"annotations": []}"#);
	assert!(matches!(Dataset::load(&config), Err(Error::Json { .. })));

	// Pointing `images` at the same file takes the single-pass path too.
	write(dir.path(), "captions_val2014.json", r#"{"images": []}"#);
	config.images = Some(config.annotations.clone());
	assert!(matches!(Dataset::load(&config), Err(Error::Json { .. })));
}
