use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
	#[error("failed to read {path:?}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("failed to parse {path:?}: {source}")]
	Json {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},
	#[error("system `{0}` is registered more than once")]
	DuplicateSystem(String),
	#[error("refusing to cache asset under unsafe filename {0:?}")]
	UnsafeFilename(String),
	#[error("failed to build the http client: {0}")]
	Client(#[source] reqwest::Error),
	#[error("failed to download {url}: {source}")]
	Download {
		url: String,
		#[source]
		source: reqwest::Error,
	},
	#[error("download of {url} answered with status {status}")]
	DownloadStatus { url: String, status: u16 },
	#[error("failed to write asset {path:?}: {source}")]
	AssetWrite {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
}

impl Error {
	pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
		let path = path.into();
		move |source| Self::Io { path, source }
	}

	pub(crate) fn json(path: impl Into<PathBuf>) -> impl FnOnce(serde_json::Error) -> Self {
		let path = path.into();
		move |source| Self::Json { path, source }
	}

	/// Whether this error happened while fetching or storing an image asset.
	pub fn is_download(&self) -> bool {
		matches!(
			self,
			Self::Download { .. }
				| Self::DownloadStatus { .. }
				| Self::AssetWrite { .. }
				| Self::UnsafeFilename(_)
		)
	}
}
