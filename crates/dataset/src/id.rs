use std::{borrow::Borrow, fmt};

use serde::{Deserialize, Deserializer, Serialize};

/// Key shared by the annotation, image metadata and system output files.
///
/// The source files disagree on whether ids are JSON numbers or strings, so both
/// are accepted and the stringified form is what gets stored and compared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ImageId(String);

impl ImageId {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for ImageId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl Borrow<str> for ImageId {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl From<u64> for ImageId {
	fn from(id: u64) -> Self {
		Self(id.to_string())
	}
}

impl From<&str> for ImageId {
	fn from(id: &str) -> Self {
		Self(id.to_owned())
	}
}

impl<'de> Deserialize<'de> for ImageId {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		#[derive(Deserialize)]
		#[serde(untagged)]
		enum Raw {
			Unsigned(u64),
			Signed(i64),
			Text(String),
		}

		Ok(match Raw::deserialize(deserializer)? {
			Raw::Unsigned(id) => Self(id.to_string()),
			Raw::Signed(id) => Self(id.to_string()),
			Raw::Text(id) => Self(id),
		})
	}
}
