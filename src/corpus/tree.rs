//! Prefix tree over the dotted names of a corpus.

use std::collections::BTreeMap;

/// A node of the namespace prefix tree.
///
/// Children are keyed by a single dotted segment and kept sorted, so walking a node's
/// children yields full paths in lexicographic order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceTree {
	children: BTreeMap<String, NamespaceTree>,
}

impl NamespaceTree {
	/// Create an empty tree.
	pub fn new() -> Self {
		Self::default()
	}

	/// Build a tree from a list of qualified names.
	pub fn build<I, S>(names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut tree = Self::new();
		for name in names {
			tree.insert(name.as_ref());
		}
		tree
	}

	/// Insert one qualified name, creating intermediate nodes as needed.
	pub fn insert(&mut self, name: &str) {
		if name.is_empty() {
			return;
		}
		let mut node = self;
		for segment in name.split('.') {
			node = node.children.entry(segment.to_string()).or_default();
		}
	}

	/// Direct child for a segment.
	pub fn child(&self, segment: &str) -> Option<&NamespaceTree> {
		self.children.get(segment)
	}

	/// Direct children in segment order.
	pub fn children(&self) -> impl Iterator<Item = (&str, &NamespaceTree)> {
		self.children.iter().map(|(key, node)| (key.as_str(), node))
	}

	/// Whether the node has no children.
	pub fn is_leaf(&self) -> bool {
		self.children.is_empty()
	}
}

/// Append `name` to a dotted path prefix.
pub fn dotted_push(prefix: &str, name: &str) -> String {
	if prefix.is_empty() {
		name.to_string()
	} else {
		format!("{prefix}.{name}")
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn sample() -> NamespaceTree {
		NamespaceTree::build([
			"numpy.linspace",
			"numpy.geomspace",
			"numpy.linalg.norm",
			"numpy",
			"scipy.fft",
		])
	}

	#[test]
	fn children_are_sorted() {
		let tree = sample();
		let numpy = tree.child("numpy").unwrap();
		let keys: Vec<&str> = numpy.children().map(|(key, _)| key).collect();
		assert_eq!(keys, ["geomspace", "linalg", "linspace"]);
	}

	#[test]
	fn documented_modules_keep_their_children() {
		let tree = sample();
		let numpy = tree.child("numpy").unwrap();
		assert!(!numpy.is_leaf());
		let linalg = numpy.child("linalg").unwrap();
		assert!(linalg.child("norm").unwrap().is_leaf());
		assert!(numpy.child("missing").is_none());
	}

	#[test]
	fn dotted_push_joins_segments() {
		assert_eq!(dotted_push("", "numpy"), "numpy");
		assert_eq!(dotted_push("numpy", "sum"), "numpy.sum");
	}
}
