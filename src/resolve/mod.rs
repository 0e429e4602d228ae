//! Reference resolution.
//!
//! Resolution is exact-match only: a token resolves to a local name, then to a corpus
//! name, and otherwise is marked unknown. No suffix, alias or case-insensitive matching
//! is attempted.

/// Document rewriting that turns reference tokens into links.
pub mod rewrite;

use std::collections::BTreeSet;

pub use self::rewrite::rewrite;
use crate::corpus::CorpusSnapshot;
use crate::model::{DocumentTree, Node, PARAM_SECTIONS, RefInfo};

/// Names defined by a document's own parameter-like sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalRefs {
	names: BTreeSet<String>,
}

impl LocalRefs {
	/// Collect the parameter names of `doc`.
	pub fn from_document(doc: &DocumentTree) -> Self {
		let names = PARAM_SECTIONS
			.iter()
			.filter_map(|section| doc.content.get(*section))
			.flat_map(|section| section.children.iter())
			.filter_map(|node| match node {
				Node::Param(param) if !param.param.is_empty() => Some(param.param.clone()),
				_ => None,
			})
			.collect();
		Self { names }
	}

	/// Whether `token` is one of the local names.
	pub fn contains(&self, token: &str) -> bool {
		self.names.contains(token)
	}

	/// Number of local names.
	pub fn len(&self) -> usize {
		self.names.len()
	}

	/// Whether there are no local names.
	pub fn is_empty(&self) -> bool {
		self.names.is_empty()
	}
}

impl<S: Into<String>> FromIterator<S> for LocalRefs {
	fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
		Self {
			names: iter.into_iter().map(Into::into).collect(),
		}
	}
}

/// Resolve one reference token found in document `qa`.
///
/// Local names win over corpus names; anything else is unknown.
pub fn resolve(qa: &str, snapshot: &CorpusSnapshot, local_refs: &LocalRefs, token: &str) -> RefInfo {
	if local_refs.contains(token) {
		return RefInfo::local(token);
	}
	if snapshot.contains(token)
		&& let Some(info) = snapshot.ref_info(token)
	{
		return info.clone();
	}
	log::debug!("{qa}: unresolved reference `{token}`");
	RefInfo::unknown(token)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::{Param, RefKind, Section};

	fn snapshot() -> CorpusSnapshot {
		CorpusSnapshot::from_names(["numpy.geomspace", "numpy.linspace", "num"])
	}

	#[test]
	fn local_names_take_precedence() {
		let locals: LocalRefs = ["num", "endpoint"].into_iter().collect();
		let info = resolve("numpy.geomspace", &snapshot(), &locals, "num");
		assert_eq!(info, RefInfo::local("num"));
	}

	#[test]
	fn corpus_names_resolve_to_api() {
		let info = resolve("numpy.geomspace", &snapshot(), &LocalRefs::default(), "numpy.linspace");
		assert_eq!(info.kind, RefKind::Api);
		assert_eq!(info.module.as_deref(), Some("numpy"));
		assert_eq!(info.path, "numpy.linspace");
	}

	#[test]
	fn partial_names_stay_unknown() {
		for token in ["linspace", "numpy.lin", "NUMPY.LINSPACE", ""] {
			let info = resolve("numpy.geomspace", &snapshot(), &LocalRefs::default(), token);
			assert_eq!(info, RefInfo::unknown(token), "token {token:?}");
		}
	}

	#[test]
	fn local_refs_come_from_param_sections_only() {
		let param = |name: &str| {
			Node::Param(Param {
				param: name.to_string(),
				type_: "int".to_string(),
				desc: Vec::new(),
			})
		};
		let doc = DocumentTree::new("numpy.geomspace")
			.with_section("Parameters", Section::new(vec![param("start"), param("stop")]))
			.with_section("Returns", Section::new(vec![param("samples"), param("")]))
			.with_section("Notes", Section::new(vec![param("not_a_param")]));

		let locals = LocalRefs::from_document(&doc);
		assert_eq!(locals.len(), 3);
		assert!(locals.contains("samples"));
		assert!(!locals.contains("not_a_param"));
	}
}
