//! Core library for quire, rendering cross-linked numpy-style API documentation.
//!
//! Documents are loaded from an ingested corpus, their reference tokens resolved against a
//! read-only snapshot of that corpus, and the result drawn on one of three surfaces: plain
//! text, HTML, or a styled terminal with navigable links. The high-level [`Quire`] API is
//! UI-agnostic; the `quire` binary is one front-end.

/// Core API for quire operations.
pub mod core_api;

/// Corpus providers and the shared snapshot.
pub mod corpus;

/// Document tree, nodes and reference identities.
pub mod model;

/// Breadcrumbs, "browse nearby" listings and back-reference aggregation.
pub mod nav;

/// Surfaces and the shared page composition.
pub mod render;

/// Reference resolution and document rewriting.
pub mod resolve;

pub use crate::core_api::{BatchReport, PreparedDoc, Quire, QuireError, Result, Surfaces};
pub use crate::corpus::{CorpusProvider, CorpusSnapshot, FsStore};
pub use crate::model::{DocumentTree, Node, RefInfo, RefKind};
pub use crate::nav::{aggregate, siblings};
pub use crate::render::RenderFormat;
pub use crate::resolve::{resolve, rewrite};
