use std::collections::BTreeMap;

/// Number of back-references above which they are grouped by top-level module.
pub const DEFAULT_THRESHOLD: usize = 30;

/// Back-references of a document, either as-is or grouped by module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregatedBackrefs {
	/// Few enough references to list them in order.
	Flat(Vec<String>),
	/// Top-level module to the qualified names referencing from it.
	Grouped(BTreeMap<String, Vec<String>>),
}

impl AggregatedBackrefs {
	/// Total number of references, whichever way they are held.
	pub fn len(&self) -> usize {
		match self {
			Self::Flat(names) => names.len(),
			Self::Grouped(groups) => groups.values().map(Vec::len).sum(),
		}
	}

	/// Whether there are no references at all.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl Default for AggregatedBackrefs {
	fn default() -> Self {
		Self::Flat(Vec::new())
	}
}

/// Group `backrefs` by their first dotted segment once there are more than `threshold`.
pub fn aggregate(backrefs: &[String], threshold: usize) -> AggregatedBackrefs {
	if backrefs.len() <= threshold {
		return AggregatedBackrefs::Flat(backrefs.to_vec());
	}
	let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
	for name in backrefs {
		let module = name.split('.').next().unwrap_or(name);
		groups.entry(module.to_string()).or_default().push(name.clone());
	}
	AggregatedBackrefs::Grouped(groups)
}
