use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// How a reference was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefKind {
	/// A documented symbol present in the corpus.
	Api,
	/// A name from the current document's own parameter-like sections.
	Local,
	/// A token that could not be matched against anything.
	Unknown,
}

impl RefKind {
	/// Lower-case name used in markup classes and debug output.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Api => "api",
			Self::Local => "local",
			Self::Unknown => "unknown",
		}
	}
}

impl fmt::Display for RefKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Canonical identity of a documented symbol.
///
/// Two values with identical fields are interchangeable. Ordering compares `path` first so
/// that sorted listings read in dotted-name order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RefInfo {
	/// Top-level package the symbol belongs to (e.g. `numpy`).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub module: Option<String>,
	/// Version of the package the symbol was ingested from.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub version: Option<String>,
	/// Resolution outcome.
	pub kind: RefKind,
	/// Dotted path, unique within module and version.
	pub path: String,
}

/// Marker used for module and version of navigation placeholders.
pub const PLACEHOLDER: &str = "?";

impl RefInfo {
	/// A corpus symbol.
	pub fn api(module: impl Into<String>, version: impl Into<String>, path: impl Into<String>) -> Self {
		Self {
			module: Some(module.into()),
			version: Some(version.into()),
			kind: RefKind::Api,
			path: path.into(),
		}
	}

	/// A name local to the document being processed.
	pub fn local(path: impl Into<String>) -> Self {
		Self {
			module: None,
			version: None,
			kind: RefKind::Local,
			path: path.into(),
		}
	}

	/// An unresolved token.
	pub fn unknown(path: impl Into<String>) -> Self {
		Self {
			module: None,
			version: None,
			kind: RefKind::Unknown,
			path: path.into(),
		}
	}

	/// Stand-in for a namespace entry the corpus has no document for.
	pub fn placeholder(path: impl Into<String>) -> Self {
		Self {
			module: Some(PLACEHOLDER.to_string()),
			version: Some(PLACEHOLDER.to_string()),
			kind: RefKind::Unknown,
			path: path.into(),
		}
	}

	/// Last dotted segment of the path.
	pub fn name(&self) -> &str {
		self.path.rsplit('.').next().unwrap_or(&self.path)
	}

	/// Site URL for api references, `None` for anything that cannot be navigated to.
	pub fn url(&self) -> Option<String> {
		match (self.kind, &self.module, &self.version) {
			(RefKind::Api, Some(module), Some(version)) => {
				Some(format!("/p/{module}/{version}/api/{}", self.path))
			}
			_ => None,
		}
	}
}

impl PartialOrd for RefInfo {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for RefInfo {
	fn cmp(&self, other: &Self) -> Ordering {
		self.path
			.cmp(&other.path)
			.then_with(|| self.module.cmp(&other.module))
			.then_with(|| self.version.cmp(&other.version))
			.then_with(|| self.kind.cmp(&other.kind))
	}
}

impl fmt::Display for RefInfo {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match (&self.module, &self.version) {
			(Some(module), Some(version)) => {
				write!(f, "{}:{module}@{version}:{}", self.kind, self.path)
			}
			_ => write!(f, "{}:{}", self.kind, self.path),
		}
	}
}
