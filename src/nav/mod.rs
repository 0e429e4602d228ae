//! Breadcrumb navigation over the dotted-name namespace.
//!
//! For `IPython.lib.display` the breadcrumb shows, at each depth, the siblings of the
//! segment at that depth (`IPython` next to `numpy`, `scipy`...; `lib` next to `core`,
//! `terminal`...), followed by a trailing `+` level listing the children of the full path.

/// Grouping of incoming references.
pub mod backrefs;

use std::collections::HashMap;

pub use self::backrefs::{AggregatedBackrefs, DEFAULT_THRESHOLD, aggregate};
use crate::corpus::{CorpusSnapshot, NamespaceTree, dotted_push};
use crate::model::RefInfo;

/// Synthetic segment standing for "children of the full path".
pub const TRAILING_SEGMENT: &str = "+";

/// One sibling shown in a breadcrumb level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
	/// Reference the entry links to; a placeholder when the corpus has no such document.
	pub reference: RefInfo,
	/// Last segment of the entry's path.
	pub label: String,
}

/// Siblings at one namespace depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLevel {
	/// Segment of the current name at this depth, or [`TRAILING_SEGMENT`].
	pub segment: String,
	/// Dotted path up to and including `segment` (the full name for the trailing level).
	pub link: String,
	/// Siblings, ordered by full path.
	pub entries: Vec<NavEntry>,
}

/// Breadcrumb of one document, outermost level first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Siblings {
	/// Levels in namespace order.
	pub levels: Vec<NavLevel>,
}

impl Siblings {
	/// Level for a segment, if it was produced.
	pub fn level(&self, segment: &str) -> Option<&NavLevel> {
		self.levels.iter().find(|level| level.segment == segment)
	}

	/// Whether the trailing "children" level is present.
	pub fn has_descendants(&self) -> bool {
		self.levels
			.last()
			.is_some_and(|level| level.segment == TRAILING_SEGMENT)
	}

	/// Whether no level was produced.
	pub fn is_empty(&self) -> bool {
		self.levels.is_empty()
	}
}

/// Compute the breadcrumb siblings of `qa`.
///
/// Walks the segments of `qa` plus the trailing segment, listing the children of the tree
/// node reached so far. The walk stops at the first node without children, so leaves get
/// no trailing level. Names missing from `ref_map` get placeholder references instead of
/// failing.
pub fn siblings(qa: &str, tree: &NamespaceTree, ref_map: &HashMap<String, RefInfo>) -> Siblings {
	let mut levels = Vec::new();
	let mut cpath = String::new();
	let mut branch = Some(tree);

	for part in qa.split('.').chain([TRAILING_SEGMENT]) {
		let Some(node) = branch.filter(|node| !node.is_leaf()) else {
			break;
		};
		let entries: Vec<NavEntry> = node
			.children()
			.filter(|(key, _)| *key != TRAILING_SEGMENT)
			.map(|(key, _)| {
				let path = dotted_push(&cpath, key);
				let reference = ref_map
					.get(&path)
					.cloned()
					.unwrap_or_else(|| RefInfo::placeholder(path));
				NavEntry {
					reference,
					label: key.to_string(),
				}
			})
			.collect();

		let link = if part == TRAILING_SEGMENT {
			qa.to_string()
		} else {
			dotted_push(&cpath, part)
		};
		levels.push(NavLevel {
			segment: part.to_string(),
			link,
			entries,
		});

		branch = node.child(part);
		cpath = dotted_push(&cpath, part);
	}

	Siblings { levels }
}

/// What to show instead of a document that does not exist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Nearby {
	/// Requested name.
	pub qa: String,
	/// Top-level module of the requested name.
	pub module: String,
	/// Breadcrumb over the part of the name that does exist.
	pub siblings: Siblings,
	/// Documents of the same module whose name starts with `qa`.
	pub matches: Vec<RefInfo>,
	/// Documents referencing `qa` although it was never ingested.
	pub backrefs: Vec<String>,
}

/// Collect browsing suggestions for a name missing from the corpus.
pub fn nearby(qa: &str, snapshot: &CorpusSnapshot, mut phantom_backrefs: Vec<String>) -> Nearby {
	let module = qa.split('.').next().unwrap_or(qa).to_string();
	let module_prefix = format!("{module}.");
	let mut matches: Vec<RefInfo> = snapshot
		.ref_map()
		.values()
		.filter(|info| {
			info.path.starts_with(qa)
				&& (info.path == module || info.path.starts_with(&module_prefix))
		})
		.cloned()
		.collect();
	matches.sort();
	phantom_backrefs.sort();
	phantom_backrefs.dedup();

	Nearby {
		qa: qa.to_string(),
		siblings: siblings(qa, snapshot.namespace_tree(), snapshot.ref_map()),
		module,
		matches,
		backrefs: phantom_backrefs,
	}
}
