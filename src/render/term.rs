//! Styled terminal rendering.
//!
//! Nodes become styled [`Span`]s laid out in indented [`TermLine`]s. Every navigable link
//! is numbered in reading order, so an interactive session can move a focus over them.
//! Escape codes are only produced at the very end by [`TermDocument::paint`].

use owo_colors::{OwoColorize, Style as Paint};

use super::utils::{CONTINUATION, INDENT, PROMPT};
use super::{PageSurface, Surface, render, render_nodes};
use crate::model::{
	BlockDirective, Code, DefList, DefListItem, Directive, Fig, Link, Node, Paragraph, Param,
	RefInfo, RefKind, SeeAlsoItem, Section, Verbatim, Words,
};
use crate::nav::{Siblings, TRAILING_SEGMENT};

/// Visual role of a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
	/// Unstyled text.
	Plain,
	/// Navigable link to a corpus document.
	Link,
	/// Link whose target could not be resolved.
	Broken,
	/// Reference to a name local to the document; not navigable.
	Local,
	/// Literal text and code.
	Verbatim,
	/// Code prompt.
	Prompt,
	/// Parameter name.
	Param,
	/// Parameter type.
	Type,
	/// Section heading.
	Section,
	/// Page title and signature.
	Signature,
	/// Marker for a node variant without handler.
	Unknown,
}

impl Style {
	fn paint(self) -> Paint {
		match self {
			Self::Plain => Paint::new(),
			Self::Link => Paint::new().green().bold(),
			Self::Broken => Paint::new().red().underline(),
			Self::Local => Paint::new().cyan(),
			Self::Verbatim | Self::Prompt => Paint::new().yellow(),
			Self::Param => Paint::new().blue().bold(),
			Self::Type => Paint::new().cyan().bold(),
			Self::Section => Paint::new().magenta().bold(),
			Self::Signature => Paint::new().cyan().bold(),
			Self::Unknown => Paint::new().white().on_red().bold(),
		}
	}
}

/// A run of text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
	/// Text content, without newlines.
	pub text: String,
	/// Visual role.
	pub style: Style,
	/// Index of the link this span belongs to, for navigable spans.
	pub link: Option<usize>,
}

impl Span {
	/// A span without link.
	pub fn new(text: impl Into<String>, style: Style) -> Self {
		Self {
			text: text.into(),
			style,
			link: None,
		}
	}

	/// Unstyled text.
	pub fn plain(text: impl Into<String>) -> Self {
		Self::new(text, Style::Plain)
	}
}

/// One output line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermLine {
	/// Indentation level.
	pub indent: usize,
	/// Content.
	pub spans: Vec<Span>,
}

impl TermLine {
	/// A line at indentation zero.
	pub fn new(spans: Vec<Span>) -> Self {
		Self { indent: 0, spans }
	}

	/// An empty spacer line.
	pub fn blank() -> Self {
		Self::default()
	}
}

/// What a node becomes on the terminal surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermOutput {
	/// Spans flowing into the surrounding line.
	Inline(Vec<Span>),
	/// Complete lines.
	Block(Vec<TermLine>),
}

impl TermOutput {
	/// Lines of this output; inline content becomes a single line.
	pub fn into_lines(self) -> Vec<TermLine> {
		match self {
			Self::Inline(spans) => vec![TermLine::new(spans)],
			Self::Block(lines) => lines,
		}
	}

	fn indented(self, levels: usize) -> Vec<TermLine> {
		self.into_lines()
			.into_iter()
			.map(|mut line| {
				line.indent += levels;
				line
			})
			.collect()
	}
}

/// What activating a numbered link leads to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
	/// Another page; unknown references lead to the "browse nearby" page.
	Reference(RefInfo),
	/// A figure of the current page, by asset file name.
	Figure(String),
}

impl LinkTarget {
	/// The referenced document, unless the link points at a figure.
	pub fn reference(&self) -> Option<&RefInfo> {
		match self {
			Self::Reference(reference) => Some(reference),
			Self::Figure(_) => None,
		}
	}

	/// Dotted path of a reference, or file name of a figure.
	pub fn path(&self) -> &str {
		match self {
			Self::Reference(reference) => &reference.path,
			Self::Figure(name) => name,
		}
	}
}

/// A rendered page with the targets of its numbered links.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermDocument {
	/// Lines in display order.
	pub lines: Vec<TermLine>,
	/// Link targets, indexed by [`Span::link`].
	pub links: Vec<LinkTarget>,
}

impl TermDocument {
	/// Text with escape codes when `color` is set; the link numbered `focus` is highlighted.
	pub fn paint(&self, color: bool, focus: Option<usize>) -> String {
		let mut out = String::new();
		for line in &self.lines {
			if !line.spans.is_empty() {
				out.push_str(&INDENT.repeat(line.indent));
			}
			for span in &line.spans {
				let focused = focus.is_some() && span.link == focus;
				if !color {
					if focused {
						out.push('[');
						out.push_str(&span.text);
						out.push(']');
					} else {
						out.push_str(&span.text);
					}
					continue;
				}
				let mut paint = span.style.paint();
				if focused {
					paint = paint.reversed();
				}
				out.push_str(&span.text.style(paint).to_string());
			}
			out.push('\n');
		}
		out
	}

	/// Text without any styling.
	pub fn plain_text(&self) -> String {
		self.paint(false, None)
	}
}

/// Surface producing styled lines for a terminal.
#[derive(Debug, Clone, Default)]
pub struct TermSurface {
	links: Vec<LinkTarget>,
}

impl TermSurface {
	/// Create a surface with no links numbered yet.
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of navigable links produced so far.
	pub fn link_count(&self) -> usize {
		self.links.len()
	}

	/// Turn the top-level output into a document owning the numbered links.
	pub fn finish(self, output: TermOutput) -> TermDocument {
		TermDocument {
			lines: output.into_lines(),
			links: self.links,
		}
	}

	fn link_span(&mut self, text: &str, target: LinkTarget, style: Style) -> Span {
		let index = self.links.len();
		self.links.push(target);
		Span {
			text: text.to_string(),
			style,
			link: Some(index),
		}
	}

	fn blocks(&mut self, nodes: &[Node]) -> Vec<TermLine> {
		render_nodes(self, nodes)
			.into_iter()
			.flat_map(TermOutput::into_lines)
			.collect()
	}
}

/// Flow outputs into lines: inline spans join the current line, blocks break it.
fn flow(outputs: Vec<TermOutput>) -> Vec<TermLine> {
	let mut lines = Vec::new();
	let mut current = Vec::new();
	for output in outputs {
		match output {
			TermOutput::Inline(spans) => current.extend(spans),
			TermOutput::Block(block) => {
				if !current.is_empty() {
					lines.push(TermLine::new(std::mem::take(&mut current)));
				}
				lines.extend(block);
			}
		}
	}
	if !current.is_empty() {
		lines.push(TermLine::new(current));
	}
	lines
}

impl Surface for TermSurface {
	type Output = TermOutput;

	fn render_unknown(&mut self, tag: &str) -> TermOutput {
		TermOutput::Inline(vec![Span::new(format!("<{tag}>"), Style::Unknown)])
	}

	fn render_words(&mut self, words: &Words) -> TermOutput {
		TermOutput::Inline(vec![Span::plain(words.value.as_str())])
	}

	fn render_directive(&mut self, directive: &Directive) -> TermOutput {
		TermOutput::Inline(vec![Span::new(directive.value.as_str(), Style::Verbatim)])
	}

	fn render_link(&mut self, link: &Link) -> TermOutput {
		let span = match link.reference.kind {
			RefKind::Local => Span::new(link.value.as_str(), Style::Local),
			RefKind::Api => {
				self.link_span(&link.value, LinkTarget::Reference(link.reference.clone()), Style::Link)
			}
			RefKind::Unknown => self.link_span(
				&link.value,
				LinkTarget::Reference(link.reference.clone()),
				Style::Broken,
			),
		};
		TermOutput::Inline(vec![span])
	}

	fn render_paragraph(&mut self, paragraph: &Paragraph) -> TermOutput {
		let outputs = render_nodes(self, &paragraph.children);
		TermOutput::Block(flow(outputs))
	}

	fn render_section(&mut self, section: &Section) -> TermOutput {
		let mut lines = Vec::new();
		if let Some(title) = &section.title {
			lines.push(TermLine::new(vec![Span::new(title.as_str(), Style::Section)]));
		}
		lines.extend(flow(render_nodes(self, &section.children)));
		lines.push(TermLine::blank());
		TermOutput::Block(lines)
	}

	fn render_block_directive(&mut self, directive: &BlockDirective) -> TermOutput {
		let mut head = vec![Span::new(format!(".. {}::", directive.name), Style::Param)];
		for arg in &directive.args0 {
			head.push(Span::plain(format!(" {arg}")));
		}
		let mut lines = vec![TermLine::blank(), TermLine::new(head)];
		if let Some(inner) = &directive.inner {
			lines.extend(render(self, inner).indented(1));
		}
		TermOutput::Block(lines)
	}

	fn render_def_list(&mut self, list: &DefList) -> TermOutput {
		let mut lines = vec![TermLine::blank()];
		for item in &list.children {
			lines.extend(self.render_def_list_item(item).into_lines());
		}
		TermOutput::Block(lines)
	}

	fn render_def_list_item(&mut self, item: &DefListItem) -> TermOutput {
		let mut lines = render(self, &item.dt).into_lines();
		lines.extend(TermOutput::Block(self.blocks(&item.dd)).indented(1));
		lines.push(TermLine::blank());
		TermOutput::Block(lines)
	}

	fn render_see_also(&mut self, item: &SeeAlsoItem) -> TermOutput {
		let target = match &item.reference {
			Some(reference) => self.render_link(&Link {
				value: item.name.clone(),
				reference: reference.clone(),
			}),
			None => TermOutput::Inline(vec![Span::plain(item.name.as_str())]),
		};
		let mut lines = target.into_lines();
		lines.extend(TermOutput::Block(self.blocks(&item.descriptions)).indented(1));
		TermOutput::Block(lines)
	}

	fn render_verbatim(&mut self, verbatim: &Verbatim) -> TermOutput {
		TermOutput::Inline(vec![Span::new(verbatim.value.as_str(), Style::Verbatim)])
	}

	fn render_code(&mut self, code: &Code) -> TermOutput {
		let mut lines = vec![TermLine::blank()];
		let mut current = vec![Span::new(PROMPT, Style::Prompt)];
		for entry in &code.entries {
			if entry.is_newline() {
				lines.push(TermLine::new(std::mem::take(&mut current)));
				current.push(Span::new(CONTINUATION, Style::Prompt));
				continue;
			}
			let span = match &entry.reference {
				Some(reference) if reference.kind == RefKind::Api => {
					self.link_span(&entry.text, LinkTarget::Reference(reference.clone()), Style::Link)
				}
				_ => Span::new(entry.text.as_str(), Style::Verbatim),
			};
			current.push(span);
		}
		lines.push(TermLine::new(current));
		lines.extend(code.out.lines().map(|line| TermLine::new(vec![Span::plain(line)])));
		lines.push(TermLine::blank());
		TermOutput::Block(TermOutput::Block(lines).indented(2))
	}

	fn render_example(&mut self, code: &Code) -> TermOutput {
		self.render_code(code)
	}

	fn render_param(&mut self, param: &Param) -> TermOutput {
		let mut head = vec![Span::new(param.param.as_str(), Style::Param)];
		if !param.type_.is_empty() {
			head.push(Span::plain(" : "));
			head.push(Span::new(param.type_.as_str(), Style::Type));
		}
		let mut lines = vec![TermLine::new(head)];
		lines.extend(TermOutput::Block(self.blocks(&param.desc)).indented(1));
		TermOutput::Block(lines)
	}

	fn render_fig(&mut self, fig: &Fig) -> TermOutput {
		let open = self.link_span(&fig.value, LinkTarget::Figure(fig.value.clone()), Style::Verbatim);
		TermOutput::Block(vec![TermLine::new(vec![
			Span::plain("Figure not available in terminal: "),
			open,
		])])
	}
}

impl PageSurface for TermSurface {
	fn breadcrumbs(&mut self, siblings: &Siblings) -> TermOutput {
		let mut spans = Vec::new();
		for level in &siblings.levels {
			if level.segment == TRAILING_SEGMENT {
				continue;
			}
			if !spans.is_empty() {
				spans.push(Span::plain(" > "));
			}
			let target = level
				.entries
				.iter()
				.find(|entry| entry.reference.path == level.link)
				.map(|entry| entry.reference.clone());
			match target {
				Some(reference) if reference.kind == RefKind::Api => {
					spans.push(self.link_span(&level.segment, LinkTarget::Reference(reference), Style::Link));
				}
				_ => spans.push(Span::plain(level.segment.as_str())),
			}
		}
		let mut lines = vec![TermLine::new(spans)];
		if let Some(children) = siblings.level(TRAILING_SEGMENT) {
			let mut spans = vec![Span::plain(format!("{TRAILING_SEGMENT} "))];
			for (i, entry) in children.entries.iter().enumerate() {
				if i > 0 {
					spans.push(Span::plain(", "));
				}
				if entry.reference.kind == RefKind::Api {
					let target = LinkTarget::Reference(entry.reference.clone());
					spans.push(self.link_span(&entry.label, target, Style::Link));
				} else {
					spans.push(Span::plain(entry.label.as_str()));
				}
			}
			lines.push(TermLine::new(spans));
		}
		lines.push(TermLine::blank());
		TermOutput::Block(lines)
	}

	fn title(&mut self, qa: &str) -> TermOutput {
		TermOutput::Block(vec![
			TermLine::new(vec![Span::new(qa, Style::Signature)]),
			TermLine::blank(),
		])
	}

	fn signature(&mut self, qa: &str, signature: &str) -> TermOutput {
		TermOutput::Block(vec![
			TermLine::new(vec![Span::new(format!("{qa}{signature}"), Style::Signature)]),
			TermLine::blank(),
		])
	}

	fn heading(&mut self, title: &str) -> TermOutput {
		TermOutput::Block(vec![TermLine::new(vec![Span::new(title, Style::Section)])])
	}

	fn compose(&mut self, parts: Vec<TermOutput>) -> TermOutput {
		TermOutput::Block(flow(parts))
	}
}
