use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::node::{Link, SeeAlsoItem, Section};

/// Sections holding parameter-like entries; their names seed the local references.
pub const PARAM_SECTIONS: &[&str] = &[
	"Parameters",
	"Returns",
	"Raises",
	"Yields",
	"Attributes",
	"Other Parameters",
];

/// Sections every document must carry, in display order.
pub const REQUIRED_SECTIONS: &[&str] = &[
	"Summary",
	"Extended Summary",
	"Parameters",
	"Returns",
	"Yields",
	"Raises",
	"Attributes",
	"Other Parameters",
	"Notes",
];

/// Sections rendered without a heading.
pub const UNTITLED_SECTIONS: &[&str] = &["Summary", "Extended Summary"];

/// Parsed representation of one documentation unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentTree {
	/// Qualified name; filled in by the loader when absent from the JSON.
	#[serde(default)]
	pub qa: String,
	/// Version the document was ingested from.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub version: Option<String>,
	/// Call signature, if the documented object has one.
	#[serde(default)]
	pub signature: Option<String>,
	/// Section name to section body.
	#[serde(default)]
	pub content: BTreeMap<String, Section>,
	/// "See Also" entries.
	#[serde(default)]
	pub see_also: Vec<SeeAlsoItem>,
	/// Examples: prose mixed with executed code and figures.
	#[serde(default)]
	pub example_section_data: Section,
	/// Raw reference tokens collected by the parser.
	#[serde(default)]
	pub refs: Vec<String>,
	/// Resolution of `refs`, filled in by the rewriter.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub ref_links: Vec<Link>,
	/// Qualified names of documents referencing this one.
	#[serde(default)]
	pub backrefs: Vec<String>,
}

impl DocumentTree {
	/// A document with every required section present and empty.
	pub fn new(qa: impl Into<String>) -> Self {
		let content = REQUIRED_SECTIONS
			.iter()
			.map(|name| ((*name).to_string(), Section::default()))
			.collect();
		Self {
			qa: qa.into(),
			content,
			..Self::default()
		}
	}

	/// Replace the body of one section.
	pub fn with_section(mut self, name: &str, section: Section) -> Self {
		self.content.insert(name.to_string(), section);
		self
	}

	/// Top-level package name, i.e. the first dotted segment of `qa`.
	pub fn module(&self) -> &str {
		self.qa.split('.').next().unwrap_or(&self.qa)
	}

	/// Sections in display order: required sections first, then extras alphabetically.
	pub fn sections(&self) -> impl Iterator<Item = (&str, &Section)> {
		let required = REQUIRED_SECTIONS
			.iter()
			.filter_map(|name| self.content.get_key_value(*name));
		let extra = self
			.content
			.iter()
			.filter(|(name, _)| !REQUIRED_SECTIONS.contains(&name.as_str()));
		required
			.chain(extra)
			.map(|(name, section)| (name.as_str(), section))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::node::Node;

	#[test]
	fn sections_follow_display_order() {
		let doc = DocumentTree::new("numpy.geomspace")
			.with_section("Notes", Section::new(vec![Node::words("n")]))
			.with_section("Aaa Custom", Section::default());
		let names: Vec<&str> = doc.sections().map(|(name, _)| name).collect();
		assert_eq!(names[0], "Summary");
		assert_eq!(names[8], "Notes");
		assert_eq!(names[9], "Aaa Custom");
	}

	#[test]
	fn module_is_first_segment() {
		assert_eq!(DocumentTree::new("numpy.linalg.norm").module(), "numpy");
	}

	#[test]
	fn json_without_optional_fields_loads() {
		let doc: DocumentTree = serde_json::from_str(
			r#"{"content": {"Summary": {"children": [{"type": "Words", "value": "Hi"}]}}}"#,
		)
		.unwrap();
		assert_eq!(doc.content["Summary"].children.len(), 1);
		assert!(doc.refs.is_empty());
	}
}
