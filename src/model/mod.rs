//! Document model shared by every stage: reference identity, node tree and document unit.

/// Parsed documentation units.
pub mod document;
/// Tagged node variants of a document tree.
pub mod node;
/// Canonical reference identity.
pub mod reference;

pub use document::{DocumentTree, PARAM_SECTIONS, REQUIRED_SECTIONS, UNTITLED_SECTIONS};
pub use node::{
	BlockDirective, Code, CodeEntry, DefList, DefListItem, Directive, Fig, Link, Node, Paragraph,
	Param, SeeAlsoItem, Section, Unsupported, Verbatim, Words,
};
pub use reference::{RefInfo, RefKind};
