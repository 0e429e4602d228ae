use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use super::reference::RefInfo;

/// A node of a parsed documentation tree.
///
/// The JSON form is internally tagged by `"type"`. Tags this model does not know are kept as
/// [`Node::Unsupported`] so that documents produced by a newer parser still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self", tag = "type")]
pub enum Node {
	/// Plain text run.
	Words(Words),
	/// Raw reference token, replaced by a [`Link`] during rewriting.
	Directive(Directive),
	/// Resolved reference.
	Link(Link),
	/// Sequence of inline nodes.
	Paragraph(Paragraph),
	/// Sequence of block nodes.
	Section(Section),
	/// `.. name:: args` block with optional body.
	BlockDirective(BlockDirective),
	/// Definition list.
	DefList(DefList),
	/// Single term/definition pair.
	DefListItem(DefListItem),
	/// Entry of a "See Also" block.
	SeeAlsoItem(SeeAlsoItem),
	/// Literal text.
	Verbatim(Verbatim),
	/// Highlighted code block.
	Code(Code),
	/// Executed example with captured output.
	Example(Code),
	/// Parameter description.
	Param(Param),
	/// Figure placeholder.
	Fig(Fig),
	/// Variant this model has no representation for.
	#[serde(skip)]
	Unsupported(Unsupported),
}

/// Every tag [`Node`] knows how to deserialize.
pub const KNOWN_TAGS: &[&str] = &[
	"Words",
	"Directive",
	"Link",
	"Paragraph",
	"Section",
	"BlockDirective",
	"DefList",
	"DefListItem",
	"SeeAlsoItem",
	"Verbatim",
	"Code",
	"Example",
	"Param",
	"Fig",
];

impl Serialize for Node {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			Self::Unsupported(node) => {
				let mut map = serializer.serialize_map(Some(1))?;
				map.serialize_entry("type", &node.tag)?;
				map.end()
			}
			_ => Node::serialize(self, serializer),
		}
	}
}

impl<'de> Deserialize<'de> for Node {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let value = serde_json::Value::deserialize(deserializer)?;
		let tag = value
			.get("type")
			.and_then(serde_json::Value::as_str)
			.ok_or_else(|| <D::Error as de::Error>::missing_field("type"))?;
		if !KNOWN_TAGS.contains(&tag) {
			log::debug!("keeping unsupported node variant `{tag}`");
			return Ok(Self::Unsupported(Unsupported {
				tag: tag.to_string(),
			}));
		}
		Node::deserialize(value).map_err(de::Error::custom)
	}
}

impl Node {
	/// Variant name, as used in the JSON `"type"` tag.
	pub fn tag(&self) -> &str {
		match self {
			Self::Words(_) => "Words",
			Self::Directive(_) => "Directive",
			Self::Link(_) => "Link",
			Self::Paragraph(_) => "Paragraph",
			Self::Section(_) => "Section",
			Self::BlockDirective(_) => "BlockDirective",
			Self::DefList(_) => "DefList",
			Self::DefListItem(_) => "DefListItem",
			Self::SeeAlsoItem(_) => "SeeAlsoItem",
			Self::Verbatim(_) => "Verbatim",
			Self::Code(_) => "Code",
			Self::Example(_) => "Example",
			Self::Param(_) => "Param",
			Self::Fig(_) => "Fig",
			Self::Unsupported(node) => &node.tag,
		}
	}

	/// Shorthand for a [`Words`] node.
	pub fn words(value: impl Into<String>) -> Self {
		Self::Words(Words {
			value: value.into(),
		})
	}

	/// Shorthand for an unqualified reference token.
	pub fn directive(value: impl Into<String>) -> Self {
		Self::Directive(Directive {
			value: value.into(),
			domain: None,
			role: None,
		})
	}

	/// Shorthand for a [`Paragraph`] node.
	pub fn paragraph(children: Vec<Node>) -> Self {
		Self::Paragraph(Paragraph { children })
	}
}

/// Plain text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Words {
	/// Text content.
	pub value: String,
}

/// Raw reference token such as `` :func:`numpy.linspace` `` or `` `linspace` ``.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directive {
	/// Referenced name, as written.
	pub value: String,
	/// Sphinx domain, e.g. `py`.
	#[serde(default)]
	pub domain: Option<String>,
	/// Sphinx role, e.g. `func` or `math`.
	#[serde(default)]
	pub role: Option<String>,
}

/// Resolved reference plus display text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
	/// Text shown for the link.
	pub value: String,
	/// Resolution result.
	pub reference: RefInfo,
}

/// Inline container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
	/// Inline children.
	#[serde(default)]
	pub children: Vec<Node>,
}

/// Block container; also the root of every document section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
	/// Block children.
	#[serde(default)]
	pub children: Vec<Node>,
	/// Optional heading.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
}

impl Section {
	/// Create an untitled section.
	pub fn new(children: Vec<Node>) -> Self {
		Self {
			children,
			title: None,
		}
	}

	/// Whether the section has nothing to render.
	pub fn is_empty(&self) -> bool {
		self.children.is_empty()
	}
}

/// `.. name:: args` block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockDirective {
	/// Directive name, e.g. `versionadded`.
	pub name: String,
	/// Positional arguments following `::`.
	#[serde(default)]
	pub args0: Vec<String>,
	/// Indented body.
	#[serde(default)]
	pub inner: Option<Box<Node>>,
}

/// Definition list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefList {
	/// Term/definition pairs.
	#[serde(default)]
	pub children: Vec<DefListItem>,
}

/// Term/definition pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefListItem {
	/// Term.
	pub dt: Box<Node>,
	/// Definition blocks.
	#[serde(default)]
	pub dd: Vec<Node>,
}

/// Entry of a "See Also" block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeeAlsoItem {
	/// Referenced name, as written.
	pub name: String,
	/// Resolution of `name`, filled in by the rewriter.
	#[serde(default)]
	pub reference: Option<RefInfo>,
	/// Description paragraphs.
	#[serde(default)]
	pub descriptions: Vec<Node>,
	/// Optional type annotation. Written as `type_` so it cannot shadow the node tag.
	#[serde(default, rename = "type_", alias = "type", skip_serializing_if = "Option::is_none")]
	pub type_: Option<String>,
}

impl SeeAlsoItem {
	/// An unresolved entry.
	pub fn new(name: impl Into<String>, descriptions: Vec<Node>) -> Self {
		Self {
			name: name.into(),
			reference: None,
			descriptions,
			type_: None,
		}
	}
}

/// Literal text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verbatim {
	/// Text content.
	pub value: String,
}

/// Code block made of highlighted tokens.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Code {
	/// Token stream; a `"\n"` entry separates source lines.
	#[serde(default)]
	pub entries: Vec<CodeEntry>,
	/// Captured output.
	#[serde(default)]
	pub out: String,
	/// Execution status reported by the example runner.
	#[serde(default)]
	pub ce_status: Option<String>,
}

/// One highlighted code token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeEntry {
	/// Source text of the token.
	pub text: String,
	/// Name the token refers to, if the highlighter found one.
	#[serde(default)]
	pub token: Option<String>,
	/// Resolution of `token`, when it names something local or known.
	#[serde(default)]
	pub reference: Option<RefInfo>,
	/// Highlighting class (pygments short name such as `nb` or `mi`).
	#[serde(default)]
	pub css: Option<String>,
}

impl CodeEntry {
	/// A token without reference.
	pub fn new(text: impl Into<String>, css: Option<&str>) -> Self {
		Self {
			text: text.into(),
			token: None,
			reference: None,
			css: css.map(str::to_string),
		}
	}

	/// Whether this entry is a line break.
	pub fn is_newline(&self) -> bool {
		self.text == "\n"
	}
}

/// Parameter, return value or exception description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
	/// Parameter name; may be empty for unnamed return values.
	pub param: String,
	/// Type annotation as written.
	#[serde(default)]
	pub type_: String,
	/// Description blocks.
	#[serde(default)]
	pub desc: Vec<Node>,
}

/// Figure placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fig {
	/// Asset file name.
	pub value: String,
}

/// A node whose variant tag is not part of this model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unsupported {
	/// Variant tag as found in the input.
	pub tag: String,
}
