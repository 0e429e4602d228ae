//! Corpus access: the provider interface and the read-only snapshot built from it.
//!
//! A [`CorpusSnapshot`] is constructed once per run, before any document is processed, and
//! is only ever shared immutably afterwards. Nothing in the crate mutates it.

/// Filesystem-backed corpus provider.
pub mod store;
/// Prefix tree over dotted names.
pub mod tree;

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

pub use self::store::FsStore;
pub use self::tree::{NamespaceTree, dotted_push};
use crate::core_api::error::{QuireError, Result};
use crate::model::{DocumentTree, RefInfo};

/// Version recorded for references whose version is not known.
pub const ANY_VERSION: &str = "*";

/// Source of ingested documents.
pub trait CorpusProvider {
	/// Every document in the corpus as an api reference (module, version, qualified name).
	fn entries(&self) -> Result<Vec<RefInfo>>;

	/// Load the raw document for `qa`, picking the newest version when `version` is `None`.
	///
	/// Absent documents are reported as [`QuireError::NotFound`].
	fn load(&self, qa: &str, version: Option<&str>) -> Result<DocumentTree>;

	/// Names of documents referencing `qa` even though `qa` itself was never ingested.
	fn phantom_backrefs(&self, _qa: &str) -> Result<Vec<String>> {
		Ok(Vec::new())
	}

	/// Asset files (figures) of one module version.
	fn assets(&self, _module: &str, _version: &str) -> Result<Vec<PathBuf>> {
		Ok(Vec::new())
	}
}

/// Read-only view of the corpus used for cross-referencing and navigation.
#[derive(Debug, Clone, Default)]
pub struct CorpusSnapshot {
	known_refs: HashSet<String>,
	ref_family: Vec<RefInfo>,
	ref_map: HashMap<String, RefInfo>,
	namespace_tree: NamespaceTree,
}

impl CorpusSnapshot {
	/// Build a snapshot from every document a provider knows about.
	///
	/// Failure here is fatal to a whole batch run, hence the dedicated error variant.
	pub fn build(provider: &dyn CorpusProvider) -> Result<Self> {
		let entries = provider
			.entries()
			.map_err(|err| QuireError::Snapshot(err.to_string()))?;
		let snapshot = Self::from_refs(entries);
		log::info!(
			"corpus snapshot: {} documents, {} distinct names",
			snapshot.ref_family.len(),
			snapshot.known_refs.len()
		);
		Ok(snapshot)
	}

	/// Build a snapshot from explicit references.
	///
	/// When the same path exists in several versions, the newest one becomes canonical.
	pub fn from_refs(refs: impl IntoIterator<Item = RefInfo>) -> Self {
		let mut ref_family: Vec<RefInfo> = refs.into_iter().collect();
		ref_family.sort();
		ref_family.dedup();

		let mut ref_map: HashMap<String, RefInfo> = HashMap::new();
		for info in &ref_family {
			let newer = match ref_map.get(&info.path) {
				Some(current) => {
					compare_versions(
						info.version.as_deref().unwrap_or(ANY_VERSION),
						current.version.as_deref().unwrap_or(ANY_VERSION),
					) == Ordering::Greater
				}
				None => true,
			};
			if newer {
				ref_map.insert(info.path.clone(), info.clone());
			}
		}

		let known_refs: HashSet<String> = ref_map.keys().cloned().collect();
		let namespace_tree = NamespaceTree::build(&known_refs);
		Self {
			known_refs,
			ref_family,
			ref_map,
			namespace_tree,
		}
	}

	/// Snapshot over bare qualified names; module is the first segment, version unknown.
	pub fn from_names<I, S>(names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		Self::from_refs(names.into_iter().map(|name| {
			let name = name.as_ref();
			let module = name.split('.').next().unwrap_or(name);
			RefInfo::api(module, ANY_VERSION, name)
		}))
	}

	/// Every qualified name present in the corpus.
	pub fn known_refs(&self) -> &HashSet<String> {
		&self.known_refs
	}

	/// Every document reference, sorted by path.
	pub fn ref_family(&self) -> &[RefInfo] {
		&self.ref_family
	}

	/// Canonical reference per dotted path.
	pub fn ref_map(&self) -> &HashMap<String, RefInfo> {
		&self.ref_map
	}

	/// Prefix tree over all known names.
	pub fn namespace_tree(&self) -> &NamespaceTree {
		&self.namespace_tree
	}

	/// Whether `qa` names a document of the corpus.
	pub fn contains(&self, qa: &str) -> bool {
		self.known_refs.contains(qa)
	}

	/// Canonical reference for a dotted path.
	pub fn ref_info(&self, path: &str) -> Option<&RefInfo> {
		self.ref_map.get(path)
	}
}

/// Order two version strings, semantically when both look like versions.
///
/// Missing minor/patch components are treated as zero (`1.20` == `1.20.0`). Version-like
/// strings sort after anything else; the rest compare lexically.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
	match (parse_version(a), parse_version(b)) {
		(Some(a), Some(b)) => a.cmp(&b),
		(Some(_), None) => Ordering::Greater,
		(None, Some(_)) => Ordering::Less,
		(None, None) => a.cmp(b),
	}
}

fn parse_version(raw: &str) -> Option<semver::Version> {
	if let Ok(version) = semver::Version::parse(raw) {
		return Some(version);
	}
	let dots = raw.matches('.').count();
	if dots >= 2 {
		return None;
	}
	let padded = format!("{raw}{}", ".0".repeat(2 - dots));
	semver::Version::parse(&padded).ok()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::RefKind;

	#[test]
	fn from_names_indexes_every_name() {
		let snapshot = CorpusSnapshot::from_names(["numpy.geomspace", "numpy.linspace"]);
		assert!(snapshot.contains("numpy.linspace"));
		assert!(!snapshot.contains("linspace"));
		let info = snapshot.ref_info("numpy.geomspace").unwrap();
		assert_eq!(info.kind, RefKind::Api);
		assert_eq!(info.module.as_deref(), Some("numpy"));
		let numpy = snapshot.namespace_tree().child("numpy").unwrap();
		assert!(numpy.child("geomspace").is_some_and(NamespaceTree::is_leaf));
	}

	#[test]
	fn newest_version_is_canonical() {
		let snapshot = CorpusSnapshot::from_refs([
			RefInfo::api("numpy", "1.9.0", "numpy.sum"),
			RefInfo::api("numpy", "1.19.4", "numpy.sum"),
			RefInfo::api("numpy", "1.10", "numpy.sum"),
		]);
		assert_eq!(snapshot.ref_family().len(), 3);
		assert_eq!(
			snapshot.ref_info("numpy.sum").unwrap().version.as_deref(),
			Some("1.19.4")
		);
	}

	#[test]
	fn versions_compare_semantically() {
		assert_eq!(compare_versions("1.10", "1.9.1"), Ordering::Greater);
		assert_eq!(compare_versions("1.20", "1.20.0"), Ordering::Equal);
		assert_eq!(compare_versions("dev", "0.1"), Ordering::Less);
		assert_eq!(compare_versions("alpha", "beta"), Ordering::Less);
	}

	struct FailingProvider;

	impl CorpusProvider for FailingProvider {
		fn entries(&self) -> Result<Vec<RefInfo>> {
			Err(std::io::Error::new(std::io::ErrorKind::NotFound, "no ingest dir").into())
		}

		fn load(&self, qa: &str, version: Option<&str>) -> Result<DocumentTree> {
			Err(QuireError::NotFound {
				qa: qa.to_string(),
				version: version.map(str::to_string),
			})
		}
	}

	#[test]
	fn enumeration_failure_is_a_snapshot_error() {
		let err = CorpusSnapshot::build(&FailingProvider).unwrap_err();
		assert!(matches!(err, QuireError::Snapshot(ref msg) if msg.contains("no ingest dir")));
	}
}
