//! Rendering of document trees onto output surfaces.
//!
//! Each surface implements [`Surface`], one `render_<variant>` method per node variant.
//! [`render`] is the single dispatch point: it matches the node exhaustively and hands it to
//! the surface. Variants a surface does not handle, and variants the model itself does not
//! know, degrade to the surface's [`Surface::render_unknown`] marker instead of failing.
//!
//! Whole pages are assembled by [`render_document`], shared by every surface so that links,
//! breadcrumbs and back-references agree across outputs.

/// Plain text surface.
pub mod ascii;
/// Markup tree surface and the escaping sink.
pub mod html;
/// Interactive link-focus session over the terminal surface.
pub mod session;
/// Styled terminal surface.
pub mod term;
/// Text layout helpers.
pub mod utils;

use std::collections::HashMap;

pub use self::ascii::AsciiSurface;
pub use self::html::{HtmlSink, HtmlSurface, Markup};
pub use self::session::{BrowserSession, FocusMove};
pub use self::term::{LinkTarget, Span, Style, TermDocument, TermLine, TermOutput, TermSurface};
use crate::model::{
	BlockDirective, Code, DefList, DefListItem, Directive, DocumentTree, Fig, Link, Node, Paragraph,
	Param, RefInfo, SeeAlsoItem, Section, UNTITLED_SECTIONS, Verbatim, Words,
};
use crate::nav::{AggregatedBackrefs, Nearby, Siblings};

/// Output format for a single rendered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderFormat {
	/// Plain text.
	#[default]
	Ascii,
	/// Standalone HTML page.
	Html,
	/// Text styled with terminal escape codes.
	Term,
}

/// An output surface with one handler per node variant.
///
/// Handlers default to the unknown-node marker, so a surface only needs to implement the
/// variants it knows how to draw.
#[allow(unused_variables)]
pub trait Surface {
	/// What a rendered node becomes on this surface.
	type Output;

	/// Marker drawn for a variant without handler, carrying its tag name.
	fn render_unknown(&mut self, tag: &str) -> Self::Output;

	/// Log the missing handler and draw the unknown marker.
	fn unhandled(&mut self, tag: &str) -> Self::Output {
		log::warn!("no handler for node variant `{tag}`, rendering placeholder");
		self.render_unknown(tag)
	}

	/// Plain text run.
	fn render_words(&mut self, words: &Words) -> Self::Output {
		self.unhandled("Words")
	}

	/// Reference token left unresolved in the tree.
	fn render_directive(&mut self, directive: &Directive) -> Self::Output {
		self.unhandled("Directive")
	}

	/// Resolved reference.
	fn render_link(&mut self, link: &Link) -> Self::Output {
		self.unhandled("Link")
	}

	/// Inline run of children.
	fn render_paragraph(&mut self, paragraph: &Paragraph) -> Self::Output {
		self.unhandled("Paragraph")
	}

	/// Block of children followed by a spacer.
	fn render_section(&mut self, section: &Section) -> Self::Output {
		self.unhandled("Section")
	}

	/// `.. name:: args` header with an indented body.
	fn render_block_directive(&mut self, directive: &BlockDirective) -> Self::Output {
		self.unhandled("BlockDirective")
	}

	/// Definition list.
	fn render_def_list(&mut self, list: &DefList) -> Self::Output {
		self.unhandled("DefList")
	}

	/// Term followed by its indented definition.
	fn render_def_list_item(&mut self, item: &DefListItem) -> Self::Output {
		self.unhandled("DefListItem")
	}

	/// "See Also" target with indented descriptions.
	fn render_see_also(&mut self, item: &SeeAlsoItem) -> Self::Output {
		self.unhandled("SeeAlsoItem")
	}

	/// Literal text.
	fn render_verbatim(&mut self, verbatim: &Verbatim) -> Self::Output {
		self.unhandled("Verbatim")
	}

	/// Code block with prompts.
	fn render_code(&mut self, code: &Code) -> Self::Output {
		self.unhandled("Code")
	}

	/// Example code block.
	fn render_example(&mut self, code: &Code) -> Self::Output {
		self.unhandled("Example")
	}

	/// Parameter name, type and indented description.
	fn render_param(&mut self, param: &Param) -> Self::Output {
		self.unhandled("Param")
	}

	/// Figure.
	fn render_fig(&mut self, fig: &Fig) -> Self::Output {
		self.unhandled("Fig")
	}
}

/// Render one node on `surface`.
pub fn render<S: Surface + ?Sized>(surface: &mut S, node: &Node) -> S::Output {
	match node {
		Node::Words(words) => surface.render_words(words),
		Node::Directive(directive) => surface.render_directive(directive),
		Node::Link(link) => surface.render_link(link),
		Node::Paragraph(paragraph) => surface.render_paragraph(paragraph),
		Node::Section(section) => surface.render_section(section),
		Node::BlockDirective(directive) => surface.render_block_directive(directive),
		Node::DefList(list) => surface.render_def_list(list),
		Node::DefListItem(item) => surface.render_def_list_item(item),
		Node::SeeAlsoItem(item) => surface.render_see_also(item),
		Node::Verbatim(verbatim) => surface.render_verbatim(verbatim),
		Node::Code(code) => surface.render_code(code),
		Node::Example(code) => surface.render_example(code),
		Node::Param(param) => surface.render_param(param),
		Node::Fig(fig) => surface.render_fig(fig),
		Node::Unsupported(unsupported) => surface.unhandled(&unsupported.tag),
	}
}

/// Render a sequence of nodes in order.
pub fn render_nodes<S: Surface + ?Sized>(surface: &mut S, nodes: &[Node]) -> Vec<S::Output> {
	nodes.iter().map(|node| render(surface, node)).collect()
}

/// Page-level hooks a surface provides on top of node rendering.
pub trait PageSurface: Surface {
	/// Breadcrumb navigation.
	fn breadcrumbs(&mut self, siblings: &Siblings) -> Self::Output;
	/// Page title for a qualified name.
	fn title(&mut self, qa: &str) -> Self::Output;
	/// Call signature of the documented object.
	fn signature(&mut self, qa: &str, signature: &str) -> Self::Output;
	/// Heading introducing a section.
	fn heading(&mut self, title: &str) -> Self::Output;
	/// Assemble the page from its parts, in order.
	fn compose(&mut self, parts: Vec<Self::Output>) -> Self::Output;
}

/// Everything needed to render one document page.
#[derive(Debug, Clone, Copy)]
pub struct Page<'a> {
	/// Rewritten document.
	pub doc: &'a DocumentTree,
	/// Breadcrumb of the document.
	pub siblings: &'a Siblings,
	/// Incoming references, flat or grouped.
	pub backrefs: &'a AggregatedBackrefs,
	/// Canonical references used to link back-references.
	pub ref_map: &'a HashMap<String, RefInfo>,
}

/// Heading of the "See Also" block.
pub const SEE_ALSO_HEADING: &str = "See Also";
/// Heading of the example block.
pub const EXAMPLES_HEADING: &str = "Examples";
/// Heading of the back-reference block.
pub const BACKREFS_HEADING: &str = "Back References";

/// Compose a full document page on `surface`.
///
/// Order: breadcrumbs, title, signature, non-empty sections in canonical order (headed
/// except for the summaries), See Also, Examples, back-references.
pub fn render_document<S: PageSurface + ?Sized>(surface: &mut S, page: &Page<'_>) -> S::Output {
	let doc = page.doc;
	let mut parts = Vec::new();

	if !page.siblings.is_empty() {
		parts.push(surface.breadcrumbs(page.siblings));
	}
	parts.push(surface.title(&doc.qa));
	if let Some(signature) = doc.signature.as_deref()
		&& !signature.is_empty()
	{
		parts.push(surface.signature(&doc.qa, signature));
	}

	for (name, section) in doc.sections() {
		if section.is_empty() {
			continue;
		}
		if !UNTITLED_SECTIONS.contains(&name) {
			parts.push(surface.heading(name));
		}
		parts.push(surface.render_section(section));
	}

	if !doc.see_also.is_empty() {
		parts.push(surface.heading(SEE_ALSO_HEADING));
		for item in &doc.see_also {
			parts.push(surface.render_see_also(item));
		}
	}

	if !doc.example_section_data.is_empty() {
		parts.push(surface.heading(EXAMPLES_HEADING));
		parts.push(surface.render_section(&doc.example_section_data));
	}

	if !page.backrefs.is_empty() {
		parts.push(surface.heading(BACKREFS_HEADING));
		parts.push(surface.render_section(&backref_section(page.backrefs, page.ref_map)));
	}

	surface.compose(parts)
}

/// Compose the page shown for a name missing from the corpus.
///
/// `ref_map` links the phantom back-references to their documents.
pub fn render_not_found<S: PageSurface + ?Sized>(
	surface: &mut S,
	nearby: &Nearby,
	ref_map: &HashMap<String, RefInfo>,
) -> S::Output {
	let mut parts = Vec::new();
	if !nearby.siblings.is_empty() {
		parts.push(surface.breadcrumbs(&nearby.siblings));
	}
	parts.push(surface.title(&nearby.qa));
	parts.push(surface.render_paragraph(&Paragraph {
		children: vec![Node::words(format!(
			"No documentation for `{}` in module `{}`.",
			nearby.qa, nearby.module
		))],
	}));

	if !nearby.matches.is_empty() {
		parts.push(surface.heading(&format!("Documented under {}", nearby.qa)));
		let children = nearby
			.matches
			.iter()
			.map(|info| {
				Node::paragraph(vec![Node::Link(Link {
					value: info.path.clone(),
					reference: info.clone(),
				})])
			})
			.collect();
		parts.push(surface.render_section(&Section::new(children)));
	}

	if !nearby.backrefs.is_empty() {
		parts.push(surface.heading(BACKREFS_HEADING));
		let flat = AggregatedBackrefs::Flat(nearby.backrefs.clone());
		parts.push(surface.render_section(&backref_section(&flat, ref_map)));
	}

	surface.compose(parts)
}

/// Express back-references as ordinary nodes: one linked paragraph when flat, a definition
/// list keyed by module when grouped.
fn backref_section(backrefs: &AggregatedBackrefs, ref_map: &HashMap<String, RefInfo>) -> Section {
	let links = |names: &[String]| {
		let mut children = Vec::with_capacity(names.len() * 2);
		for (i, name) in names.iter().enumerate() {
			if i > 0 {
				children.push(Node::words(", "));
			}
			let reference = ref_map
				.get(name)
				.cloned()
				.unwrap_or_else(|| RefInfo::unknown(name.as_str()));
			children.push(Node::Link(Link {
				value: name.clone(),
				reference,
			}));
		}
		Node::paragraph(children)
	};

	match backrefs {
		AggregatedBackrefs::Flat(names) => Section::new(vec![links(names)]),
		AggregatedBackrefs::Grouped(groups) => Section::new(vec![Node::DefList(DefList {
			children: groups
				.iter()
				.map(|(module, names)| DefListItem {
					dt: Box::new(Node::paragraph(vec![Node::words(module.as_str())])),
					dd: vec![links(names)],
				})
				.collect(),
		})]),
	}
}
