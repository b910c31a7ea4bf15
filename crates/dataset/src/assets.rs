//! Local image cache, filled on demand from each image's remote URL.
//!
//! Resolution is an explicit step that returns an [`AssetStatus`], so callers
//! decide how a failed download is presented. Downloads for the same filename are
//! serialised and land through a rename, so a half-written image is never served.

use std::{
	collections::HashMap,
	path::{Path, PathBuf},
	sync::Arc,
	time::Duration,
};

use async_trait::async_trait;
use tokio::{fs, sync::Mutex};
use tracing::{debug, error, info, warn};

use crate::{images::ImageRecord, Error, Result};

/// Network side of the cache.
#[async_trait]
pub trait Fetch: Send + Sync {
	async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// [`Fetch`] over HTTP with a bounded per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
	client: reqwest::Client,
}

impl HttpFetcher {
	pub fn new(timeout: Duration) -> Result<Self> {
		let client = reqwest::Client::builder()
			.timeout(timeout)
			.build()
			.map_err(Error::Client)?;

		Ok(Self { client })
	}
}

#[async_trait]
impl Fetch for HttpFetcher {
	async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
		let download_error = |source| Error::Download {
			url: url.to_owned(),
			source,
		};

		let response = self.client.get(url).send().await.map_err(download_error)?;

		let status = response.status();
		if !status.is_success() {
			return Err(Error::DownloadStatus {
				url: url.to_owned(),
				status: status.as_u16(),
			});
		}

		let body = response.bytes().await.map_err(download_error)?;

		Ok(body.to_vec())
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetStatus {
	/// Already on disk, nothing was fetched
	Cached,
	/// Fetched during this call
	Downloaded,
}

pub struct AssetCache {
	dir: PathBuf,
	fetcher: Arc<dyn Fetch>,
	in_flight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl AssetCache {
	pub fn new(dir: impl Into<PathBuf>, fetcher: Arc<dyn Fetch>) -> Self {
		Self {
			dir: dir.into(),
			fetcher,
			in_flight: Mutex::default(),
		}
	}

	pub fn dir(&self) -> &Path {
		&self.dir
	}

	pub fn path_for(&self, record: &ImageRecord) -> PathBuf {
		self.dir.join(&record.filename)
	}

	/// Make sure the image behind `record` is on disk, downloading it if needed.
	pub async fn resolve(&self, record: &ImageRecord) -> Result<AssetStatus> {
		if !is_safe_filename(&record.filename) {
			error!("Invalid asset filename derived from {}", record.url);
			return Err(Error::UnsafeFilename(record.filename.clone()));
		}

		let path = self.path_for(record);
		if is_file(&path).await {
			debug!("Asset {path:?} already cached");
			return Ok(AssetStatus::Cached);
		}

		let lock = self.lock_for(&record.filename).await;
		let status = {
			let _guard = lock.lock().await;
			self.download(record, &path).await
		};
		self.release(&record.filename, lock).await;

		status
	}

	async fn download(&self, record: &ImageRecord, path: &Path) -> Result<AssetStatus> {
		// Someone else may have finished the download while we waited.
		if is_file(path).await {
			return Ok(AssetStatus::Cached);
		}

		info!("Downloading {} to {path:?}", record.url);
		let bytes = self.fetcher.fetch(&record.url).await?;
		self.store(&record.filename, path, &bytes).await?;
		info!("Downloaded {} ({} bytes)", record.url, bytes.len());

		Ok(AssetStatus::Downloaded)
	}

	async fn lock_for(&self, filename: &str) -> Arc<Mutex<()>> {
		self.in_flight
			.lock()
			.await
			.entry(filename.to_owned())
			.or_default()
			.clone()
	}

	/// Drops the lock for `filename` once nobody else holds or waits on it.
	async fn release(&self, filename: &str, lock: Arc<Mutex<()>>) {
		let mut in_flight = self.in_flight.lock().await;
		// One reference in the table, one in `lock`. Dropped under the table lock
		// so the last waiter always sees the count fall to two.
		let idle = Arc::strong_count(&lock) == 2;
		drop(lock);
		if idle {
			in_flight.remove(filename);
		}
	}

	async fn store(&self, filename: &str, path: &Path, bytes: &[u8]) -> Result<()> {
		let write_error = |source| Error::AssetWrite {
			path: path.to_path_buf(),
			source,
		};

		fs::create_dir_all(&self.dir).await.map_err(write_error)?;

		let partial = self.dir.join(format!(".{filename}.part"));
		let written = match fs::write(&partial, bytes).await {
			Ok(()) => fs::rename(&partial, path).await,
			Err(e) => Err(e),
		};

		if let Err(e) = written {
			if let Err(cleanup) = fs::remove_file(&partial).await {
				if cleanup.kind() != std::io::ErrorKind::NotFound {
					warn!("Failed to remove partial download {partial:?}: {cleanup}");
				}
			}
			return Err(write_error(e));
		}

		Ok(())
	}

	#[cfg(test)]
	async fn in_flight_len(&self) -> usize {
		self.in_flight.lock().await.len()
	}
}

async fn is_file(path: &Path) -> bool {
	fs::metadata(path)
		.await
		.map(|metadata| metadata.is_file())
		.unwrap_or(false)
}

/// Rejects names that would escape the cache directory once joined onto it.
fn is_safe_filename(filename: &str) -> bool {
	!filename.is_empty()
		&& !filename.contains("..")
		&& !filename.contains('/')
		&& !filename.contains('\\')
		&& !filename.contains('\0')
}
