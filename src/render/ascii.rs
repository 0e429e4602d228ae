//! Plain text rendering.
//!
//! Inline nodes produce bare text; block nodes produce text ending with a newline. Nesting
//! is expressed with two-space indentation.

use super::utils::{CONTINUATION, PROMPT, ensure_block, indent, underline};
use super::{PageSurface, Surface, render, render_nodes};
use crate::model::{
	BlockDirective, Code, DefList, DefListItem, Directive, Fig, Link, Node, Paragraph, Param,
	RefKind, SeeAlsoItem, Section, Verbatim, Words,
};
use crate::nav::{Siblings, TRAILING_SEGMENT};

/// Marker appended to links whose target could not be resolved.
pub const UNRESOLVED_MARKER: &str = "(?)";

/// Surface producing plain text.
#[derive(Debug, Clone, Copy, Default)]
pub struct AsciiSurface;

impl AsciiSurface {
	/// Create the surface.
	pub fn new() -> Self {
		Self
	}

	fn blocks(&mut self, nodes: &[Node]) -> String {
		render_nodes(self, nodes).into_iter().map(ensure_block).collect()
	}
}

impl Surface for AsciiSurface {
	type Output = String;

	fn render_unknown(&mut self, tag: &str) -> String {
		format!("<{tag}>")
	}

	fn render_words(&mut self, words: &Words) -> String {
		words.value.clone()
	}

	fn render_directive(&mut self, directive: &Directive) -> String {
		format!("`{}`", directive.value)
	}

	fn render_link(&mut self, link: &Link) -> String {
		match link.reference.kind {
			RefKind::Local | RefKind::Api => link.value.clone(),
			RefKind::Unknown => format!("{}{UNRESOLVED_MARKER}", link.value),
		}
	}

	fn render_paragraph(&mut self, paragraph: &Paragraph) -> String {
		let mut out: String = render_nodes(self, &paragraph.children).concat();
		out.push('\n');
		out
	}

	fn render_section(&mut self, section: &Section) -> String {
		let mut out = String::new();
		if let Some(title) = &section.title {
			out.push_str(&underline(title, '~'));
		}
		out.push_str(&self.blocks(&section.children));
		out.push('\n');
		out
	}

	fn render_block_directive(&mut self, directive: &BlockDirective) -> String {
		let mut head = format!(".. {}::", directive.name);
		for arg in &directive.args0 {
			head.push(' ');
			head.push_str(arg);
		}
		let mut out = format!("\n{head}\n");
		if let Some(inner) = &directive.inner {
			let body = ensure_block(render(self, inner));
			out.push_str(&indent(&body, 1));
		}
		out
	}

	fn render_def_list(&mut self, list: &DefList) -> String {
		let mut out = String::from("\n");
		for item in &list.children {
			out.push_str(&self.render_def_list_item(item));
		}
		out
	}

	fn render_def_list_item(&mut self, item: &DefListItem) -> String {
		let mut out = ensure_block(render(self, &item.dt));
		out.push_str(&indent(&self.blocks(&item.dd), 1));
		out.push('\n');
		out
	}

	fn render_see_also(&mut self, item: &SeeAlsoItem) -> String {
		let target = match &item.reference {
			Some(reference) => self.render_link(&Link {
				value: item.name.clone(),
				reference: reference.clone(),
			}),
			None => item.name.clone(),
		};
		let mut out = ensure_block(target);
		out.push_str(&indent(&self.blocks(&item.descriptions), 1));
		out
	}

	fn render_verbatim(&mut self, verbatim: &Verbatim) -> String {
		verbatim.value.clone()
	}

	fn render_code(&mut self, code: &Code) -> String {
		let mut source = String::from(PROMPT);
		for entry in &code.entries {
			if entry.is_newline() {
				source.push('\n');
				source.push_str(CONTINUATION);
			} else {
				source.push_str(&entry.text);
			}
		}
		let mut out = ensure_block(source);
		if !code.out.is_empty() {
			out.push_str(&ensure_block(code.out.clone()));
		}
		format!("\n{}\n", indent(&out, 2))
	}

	fn render_example(&mut self, code: &Code) -> String {
		self.render_code(code)
	}

	fn render_param(&mut self, param: &Param) -> String {
		let mut out = if param.type_.is_empty() {
			format!("{}\n", param.param)
		} else {
			format!("{} : {}\n", param.param, param.type_)
		};
		out.push_str(&indent(&self.blocks(&param.desc), 1));
		out
	}

	fn render_fig(&mut self, fig: &Fig) -> String {
		format!("[figure: {}]\n", fig.value)
	}
}

impl PageSurface for AsciiSurface {
	fn breadcrumbs(&mut self, siblings: &Siblings) -> String {
		let crumbs: Vec<&str> = siblings
			.levels
			.iter()
			.map(|level| level.segment.as_str())
			.filter(|segment| *segment != TRAILING_SEGMENT)
			.collect();
		let mut out = format!("{}\n", crumbs.join(" > "));
		if let Some(children) = siblings.level(TRAILING_SEGMENT) {
			let labels: Vec<&str> = children.entries.iter().map(|e| e.label.as_str()).collect();
			out.push_str(&format!("{TRAILING_SEGMENT} {}\n", labels.join(", ")));
		}
		out.push('\n');
		out
	}

	fn title(&mut self, qa: &str) -> String {
		format!("{}\n", underline(qa, '='))
	}

	fn signature(&mut self, qa: &str, signature: &str) -> String {
		format!("{qa}{signature}\n\n")
	}

	fn heading(&mut self, title: &str) -> String {
		underline(title, '-')
	}

	fn compose(&mut self, parts: Vec<String>) -> String {
		parts.into_iter().map(ensure_block).collect()
	}
}
