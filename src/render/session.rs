use super::term::{LinkTarget, TermDocument};

/// Outcome of a focus movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusMove {
	/// Focus now rests on this link.
	Moved(usize),
	/// Focus was already on the first link (or there are none); the caller may scroll up.
	AtStart,
	/// Focus was already on the last link (or there are none); the caller may scroll down.
	AtEnd,
}

/// One interactive view of a rendered page.
///
/// Owns the only mutable state of the terminal surface: which link is focused. The index is
/// kept within `[0, link_count)` on every update.
#[derive(Debug, Clone)]
pub struct BrowserSession {
	qa: String,
	document: TermDocument,
	focus: usize,
}

impl BrowserSession {
	/// Start browsing `document`, focused on its first link.
	pub fn new(qa: impl Into<String>, document: TermDocument) -> Self {
		Self {
			qa: qa.into(),
			document,
			focus: 0,
		}
	}

	/// Qualified name of the page being browsed.
	pub fn qa(&self) -> &str {
		&self.qa
	}

	/// Rendered page.
	pub fn document(&self) -> &TermDocument {
		&self.document
	}

	/// Number of navigable links on the page.
	pub fn link_count(&self) -> usize {
		self.document.links.len()
	}

	/// Index of the focused link, `None` when the page has no links.
	pub fn focus(&self) -> Option<usize> {
		(self.link_count() > 0).then_some(self.focus)
	}

	/// Target of the focused link.
	pub fn focused(&self) -> Option<&LinkTarget> {
		self.focus().and_then(|index| self.document.links.get(index))
	}

	/// Move focus to the next link.
	pub fn focus_next(&mut self) -> FocusMove {
		if self.focus + 1 >= self.link_count() {
			return FocusMove::AtEnd;
		}
		self.focus += 1;
		FocusMove::Moved(self.focus)
	}

	/// Move focus to the previous link.
	pub fn focus_prev(&mut self) -> FocusMove {
		if self.focus == 0 || self.link_count() == 0 {
			return FocusMove::AtStart;
		}
		self.focus -= 1;
		FocusMove::Moved(self.focus)
	}

	/// Focus a link by index, clamped to the available links.
	pub fn set_focus(&mut self, index: usize) -> Option<usize> {
		self.focus = index.min(self.link_count().saturating_sub(1));
		self.focus()
	}

	/// Follow the focused link: its target, if the page has links.
	pub fn activate(&self) -> Option<&LinkTarget> {
		let target = self.focused();
		if let Some(target) = target {
			log::debug!("{}: following link to {}", self.qa, target.path());
		}
		target
	}

	/// The page as text, with the focused link highlighted.
	pub fn paint(&self, color: bool) -> String {
		self.document.paint(color, self.focus())
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::model::RefInfo;

	fn session(links: usize) -> BrowserSession {
		let document = TermDocument {
			lines: Vec::new(),
			links: (0..links)
				.map(|i| LinkTarget::Reference(RefInfo::api("m", "1", format!("m.f{i}"))))
				.collect(),
		};
		BrowserSession::new("m", document)
	}

	#[test]
	fn focus_moves_within_bounds() {
		let mut session = session(3);
		assert_eq!(session.focus(), Some(0));
		assert_eq!(session.focus_prev(), FocusMove::AtStart);
		assert_eq!(session.focus_next(), FocusMove::Moved(1));
		assert_eq!(session.focus_next(), FocusMove::Moved(2));
		assert_eq!(session.focus_next(), FocusMove::AtEnd);
		assert_eq!(session.focus(), Some(2));
		assert_eq!(session.activate().map(LinkTarget::path), Some("m.f2"));
	}

	#[test]
	fn set_focus_clamps() {
		let mut session = session(2);
		assert_eq!(session.set_focus(10), Some(1));
		assert_eq!(session.set_focus(0), Some(0));
	}

	#[test]
	fn page_without_links_has_no_focus() {
		let mut session = session(0);
		assert_eq!(session.focus(), None);
		assert_eq!(session.focus_next(), FocusMove::AtEnd);
		assert_eq!(session.focus_prev(), FocusMove::AtStart);
		assert_eq!(session.set_focus(3), None);
		assert!(session.activate().is_none());
	}
}
