use std::fmt;

use serde_json::Error as SerdeError;

/// Aggregate errors produced by the quire API.
///
/// Unresolved references are not errors: they travel as [`crate::model::RefKind::Unknown`]
/// data and render as broken links.
#[derive(Debug)]
pub enum QuireError {
	/// A document is structurally unusable (missing section, malformed token...).
	MalformedDocument {
		/// Qualified name of the offending document.
		qa: String,
		/// What is wrong with it.
		reason: String,
	},
	/// The requested qualified name is not part of the corpus.
	NotFound {
		/// Requested qualified name.
		qa: String,
		/// Requested version, if one was given.
		version: Option<String>,
	},
	/// The corpus snapshot could not be built; fatal to a whole batch.
	Snapshot(String),
	/// Failed to encode or decode JSON.
	Serialization(SerdeError),
	/// Failed to perform IO operations.
	Io(std::io::Error),
	/// Another error, annotated with the document it happened in.
	Context {
		/// Qualified name being processed.
		qa: String,
		/// Underlying error.
		source: Box<QuireError>,
	},
}

impl QuireError {
	/// Build a [`QuireError::MalformedDocument`].
	pub fn malformed(qa: impl Into<String>, reason: impl Into<String>) -> Self {
		Self::MalformedDocument {
			qa: qa.into(),
			reason: reason.into(),
		}
	}

	/// Annotate the error with the qualified name being processed.
	///
	/// Errors that already name a document are returned unchanged.
	pub fn context(self, qa: impl Into<String>) -> Self {
		match self {
			Self::MalformedDocument { .. } | Self::NotFound { .. } | Self::Context { .. } => self,
			other => Self::Context {
				qa: qa.into(),
				source: Box::new(other),
			},
		}
	}

	/// Whether this error (or the error it wraps) means "no such document".
	pub fn is_not_found(&self) -> bool {
		match self {
			Self::NotFound { .. } => true,
			Self::Context { source, .. } => source.is_not_found(),
			_ => false,
		}
	}
}

impl fmt::Display for QuireError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::MalformedDocument { qa, reason } => write!(f, "malformed document {qa}: {reason}"),
			Self::NotFound { qa, version: Some(version) } => {
				write!(f, "{qa} (version {version}) not found")
			}
			Self::NotFound { qa, version: None } => write!(f, "{qa} not found"),
			Self::Snapshot(message) => write!(f, "unable to build corpus snapshot: {message}"),
			Self::Serialization(err) => write!(f, "{err}"),
			Self::Io(err) => write!(f, "{err}"),
			Self::Context { qa, source } => write!(f, "error in {qa}: {source}"),
		}
	}
}

impl std::error::Error for QuireError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Self::Serialization(err) => Some(err),
			Self::Io(err) => Some(err),
			Self::Context { source, .. } => Some(source.as_ref()),
			Self::MalformedDocument { .. } | Self::NotFound { .. } | Self::Snapshot(_) => None,
		}
	}
}

impl From<SerdeError> for QuireError {
	fn from(err: SerdeError) -> Self {
		Self::Serialization(err)
	}
}

impl From<std::io::Error> for QuireError {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

/// Result type returned by the quire library.
pub type Result<T> = std::result::Result<T, QuireError>;
