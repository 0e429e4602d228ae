//! HTML rendering.
//!
//! The surface only builds a [`Markup`] tree; turning it into text, and escaping, is the job
//! of [`HtmlSink`]. Text and attribute values held by the tree are always raw.

use super::utils::{CONTINUATION, PROMPT};
use super::{PageSurface, Surface, render, render_nodes};
use crate::model::{
	BlockDirective, Code, DefList, DefListItem, Directive, Fig, Link, Node, Paragraph, Param,
	RefInfo, RefKind, SeeAlsoItem, Section, Verbatim, Words,
};
use crate::nav::{Siblings, TRAILING_SEGMENT};

/// Elements serialized without closing tag.
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "link", "meta"];

/// Element tree produced by the HTML surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Markup {
	/// Raw text, escaped on output.
	Text(String),
	/// Element with attributes and children.
	Element {
		/// Tag name.
		tag: &'static str,
		/// Attribute names and raw values, in output order.
		attrs: Vec<(&'static str, String)>,
		/// Child nodes.
		children: Vec<Markup>,
	},
	/// Sequence of nodes without wrapper.
	Fragment(Vec<Markup>),
}

impl Markup {
	/// Text node.
	pub fn text(text: impl Into<String>) -> Self {
		Self::Text(text.into())
	}

	/// Empty element.
	pub fn element(tag: &'static str) -> Self {
		Self::Element {
			tag,
			attrs: Vec::new(),
			children: Vec::new(),
		}
	}

	/// Sequence of nodes.
	pub fn fragment(children: impl IntoIterator<Item = Markup>) -> Self {
		Self::Fragment(children.into_iter().collect())
	}

	/// Add an attribute; no-op on text and fragments.
	pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
		if let Self::Element { attrs, .. } = &mut self {
			attrs.push((name, value.into()));
		}
		self
	}

	/// Shorthand for the `class` attribute.
	pub fn class(self, class: &str) -> Self {
		self.attr("class", class)
	}

	/// Append a child; fragments grow, text is left unchanged.
	pub fn child(mut self, child: Markup) -> Self {
		match &mut self {
			Self::Element { children, .. } | Self::Fragment(children) => children.push(child),
			Self::Text(_) => {}
		}
		self
	}

	/// Append several children.
	pub fn children(self, children: impl IntoIterator<Item = Markup>) -> Self {
		children.into_iter().fold(self, Self::child)
	}
}

/// Serializer for [`Markup`]; the only place where text gets escaped.
#[derive(Debug, Default)]
pub struct HtmlSink {
	out: String,
}

impl HtmlSink {
	/// Empty sink.
	pub fn new() -> Self {
		Self::default()
	}

	/// Serialize a fragment.
	pub fn to_html(markup: &Markup) -> String {
		let mut sink = Self::new();
		sink.write(markup);
		sink.finish()
	}

	/// Serialize a full page, with doctype.
	pub fn to_document(markup: &Markup) -> String {
		let mut sink = Self::new();
		sink.out.push_str("<!DOCTYPE html>\n");
		sink.write(markup);
		sink.out.push('\n');
		sink.finish()
	}

	/// Append a node.
	pub fn write(&mut self, markup: &Markup) {
		match markup {
			Markup::Text(text) => escape_into(&mut self.out, text, false),
			Markup::Fragment(children) => {
				for child in children {
					self.write(child);
				}
			}
			Markup::Element {
				tag,
				attrs,
				children,
			} => {
				self.out.push('<');
				self.out.push_str(tag);
				for (name, value) in attrs {
					self.out.push(' ');
					self.out.push_str(name);
					self.out.push_str("=\"");
					escape_into(&mut self.out, value, true);
					self.out.push('"');
				}
				if VOID_ELEMENTS.contains(tag) {
					self.out.push_str(" />");
					return;
				}
				self.out.push('>');
				for child in children {
					self.write(child);
				}
				self.out.push_str("</");
				self.out.push_str(tag);
				self.out.push('>');
			}
		}
	}

	/// Serialized output.
	pub fn finish(self) -> String {
		self.out
	}
}

fn escape_into(out: &mut String, text: &str, attribute: bool) {
	for c in text.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' if attribute => out.push_str("&quot;"),
			_ => out.push(c),
		}
	}
}

/// Wrap a rendered body into a standalone page.
pub fn page(qa: &str, body: Markup) -> Markup {
	Markup::element("html").attr("lang", "en").children([
		Markup::element("head").children([
			Markup::element("meta").attr("charset", "utf-8"),
			Markup::element("title").child(Markup::text(qa)),
		]),
		Markup::element("body").child(body),
	])
}

/// Surface producing a [`Markup`] tree.
#[derive(Debug, Clone, Default)]
pub struct HtmlSurface {
	link_extension: String,
}

impl HtmlSurface {
	/// Surface emitting extension-less links, as served by a live site.
	pub fn new() -> Self {
		Self::default()
	}

	/// Append `extension` (e.g. `.html`) to every link, for static output.
	pub fn with_link_extension(mut self, extension: impl Into<String>) -> Self {
		self.link_extension = extension.into();
		self
	}

	fn href(&self, reference: &RefInfo) -> Option<String> {
		reference
			.url()
			.map(|url| format!("{url}{}", self.link_extension))
	}

	fn anchor(&self, text: &str, reference: &RefInfo) -> Markup {
		match self.href(reference) {
			Some(href) => Markup::element("a").attr("href", href).child(Markup::text(text)),
			None => Markup::element("span").class("unresolved").child(Markup::text(text)),
		}
	}

	fn blocks(&mut self, nodes: &[Node]) -> Vec<Markup> {
		render_nodes(self, nodes)
	}
}

impl Surface for HtmlSurface {
	type Output = Markup;

	fn render_unknown(&mut self, tag: &str) -> Markup {
		Markup::element("span")
			.class("unknown")
			.child(Markup::text(format!("<{tag}>")))
	}

	fn render_words(&mut self, words: &Words) -> Markup {
		Markup::text(words.value.as_str())
	}

	fn render_directive(&mut self, directive: &Directive) -> Markup {
		Markup::element("code")
			.class("directive")
			.child(Markup::text(directive.value.as_str()))
	}

	fn render_link(&mut self, link: &Link) -> Markup {
		match link.reference.kind {
			RefKind::Local => Markup::element("code")
				.class("local")
				.child(Markup::text(link.value.as_str())),
			RefKind::Api => self.anchor(&link.value, &link.reference),
			RefKind::Unknown => Markup::element("span")
				.class("unresolved")
				.attr("title", format!("unresolved reference {}", link.reference.path))
				.child(Markup::text(link.value.as_str())),
		}
	}

	fn render_paragraph(&mut self, paragraph: &Paragraph) -> Markup {
		Markup::element("p").children(self.blocks(&paragraph.children))
	}

	fn render_section(&mut self, section: &Section) -> Markup {
		let mut out = Markup::element("section");
		if let Some(title) = &section.title {
			out = out.child(Markup::element("h3").child(Markup::text(title.as_str())));
		}
		out.children(self.blocks(&section.children))
			.child(Markup::element("div").class("spacer"))
	}

	fn render_block_directive(&mut self, directive: &BlockDirective) -> Markup {
		let mut head = format!(".. {}::", directive.name);
		for arg in &directive.args0 {
			head.push(' ');
			head.push_str(arg);
		}
		let mut out = Markup::element("div").class("directive").child(
			Markup::element("p")
				.class("directive-head")
				.child(Markup::text(head)),
		);
		if let Some(inner) = &directive.inner {
			out = out.child(Markup::element("div").class("indent").child(render(self, inner)));
		}
		out
	}

	fn render_def_list(&mut self, list: &DefList) -> Markup {
		let items: Vec<Markup> = list
			.children
			.iter()
			.map(|item| self.render_def_list_item(item))
			.collect();
		Markup::element("dl").children(items)
	}

	fn render_def_list_item(&mut self, item: &DefListItem) -> Markup {
		Markup::fragment([
			Markup::element("dt").child(render(self, &item.dt)),
			Markup::element("dd").children(self.blocks(&item.dd)),
		])
	}

	fn render_see_also(&mut self, item: &SeeAlsoItem) -> Markup {
		let target = match &item.reference {
			Some(reference) => self.render_link(&Link {
				value: item.name.clone(),
				reference: reference.clone(),
			}),
			None => Markup::text(item.name.as_str()),
		};
		Markup::element("div").class("see-also").children([
			Markup::element("div").class("see-also-name").child(target),
			Markup::element("div")
				.class("indent")
				.children(self.blocks(&item.descriptions)),
		])
	}

	fn render_verbatim(&mut self, verbatim: &Verbatim) -> Markup {
		Markup::element("code").child(Markup::text(verbatim.value.as_str()))
	}

	fn render_code(&mut self, code: &Code) -> Markup {
		let prompt = |text: &str| Markup::element("span").class("gp").child(Markup::text(text));
		let mut source = Markup::element("code").child(prompt(PROMPT));
		for entry in &code.entries {
			if entry.is_newline() {
				source = source.child(Markup::text("\n")).child(prompt(CONTINUATION));
				continue;
			}
			let token = match &entry.reference {
				Some(reference) if reference.kind == RefKind::Api => {
					self.anchor(&entry.text, reference)
				}
				_ => Markup::element("span").child(Markup::text(entry.text.as_str())),
			};
			source = source.child(match &entry.css {
				Some(css) => token.class(css),
				None => token,
			});
		}
		let mut out = Markup::element("div")
			.class("code")
			.child(Markup::element("pre").class("highlight").child(source));
		if !code.out.is_empty() {
			out = out.child(
				Markup::element("pre")
					.class("output")
					.child(Markup::text(code.out.as_str())),
			);
		}
		out
	}

	fn render_example(&mut self, code: &Code) -> Markup {
		self.render_code(code)
	}

	fn render_param(&mut self, param: &Param) -> Markup {
		let mut head = Markup::element("dt").child(
			Markup::element("span")
				.class("param-name")
				.child(Markup::text(param.param.as_str())),
		);
		if !param.type_.is_empty() {
			head = head.child(Markup::text(" : ")).child(
				Markup::element("span")
					.class("param-type")
					.child(Markup::text(param.type_.as_str())),
			);
		}
		Markup::element("dl").class("param").children([
			head,
			Markup::element("dd").children(self.blocks(&param.desc)),
		])
	}

	fn render_fig(&mut self, fig: &Fig) -> Markup {
		Markup::element("figure").child(
			Markup::element("img")
				.attr("src", format!("../img/{}", fig.value))
				.attr("alt", fig.value.as_str()),
		)
	}
}

impl PageSurface for HtmlSurface {
	fn breadcrumbs(&mut self, siblings: &Siblings) -> Markup {
		let crumbs = siblings.levels.iter().map(|level| {
			let label = if level.segment == TRAILING_SEGMENT {
				Markup::text(TRAILING_SEGMENT)
			} else {
				match level
					.entries
					.iter()
					.find(|entry| entry.reference.path == level.link)
				{
					Some(entry) => self.anchor(&level.segment, &entry.reference),
					None => Markup::text(level.segment.as_str()),
				}
			};
			let entries = level.entries.iter().map(|entry| {
				Markup::element("li").child(self.anchor(&entry.label, &entry.reference))
			});
			Markup::element("li")
				.class("crumb")
				.child(label)
				.child(Markup::element("ul").class("siblings").children(entries))
		});
		Markup::element("nav")
			.class("breadcrumbs")
			.child(Markup::element("ul").children(crumbs))
	}

	fn title(&mut self, qa: &str) -> Markup {
		Markup::element("h1").child(Markup::text(qa))
	}

	fn signature(&mut self, qa: &str, signature: &str) -> Markup {
		Markup::element("pre")
			.class("signature")
			.child(Markup::text(format!("{qa}{signature}")))
	}

	fn heading(&mut self, title: &str) -> Markup {
		Markup::element("h2").child(Markup::text(title))
	}

	fn compose(&mut self, parts: Vec<Markup>) -> Markup {
		Markup::element("main").children(parts)
	}
}
