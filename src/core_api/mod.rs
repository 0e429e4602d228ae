//! High-level API tying the corpus, resolution, navigation and rendering together.
//!
//! [`Quire`] is UI-agnostic: the CLI is one front-end, a web server or an editor plugin could
//! be another.

/// Whole-corpus rendering.
pub mod batch;
/// Error helpers for the core API.
pub mod error;

use std::path::PathBuf;
use std::sync::Arc;

use once_cell::sync::OnceCell;

pub use self::batch::{BatchFailure, BatchReport, RenderedPage, Surfaces};
pub use self::error::{QuireError, Result};
use crate::corpus::{CorpusProvider, CorpusSnapshot, FsStore};
use crate::model::DocumentTree;
use crate::nav::{AggregatedBackrefs, DEFAULT_THRESHOLD, Nearby, Siblings, aggregate, nearby, siblings};
use crate::render::html::page;
use crate::render::{
	AsciiSurface, BrowserSession, HtmlSink, HtmlSurface, Page, RenderFormat, TermSurface,
	render_document, render_not_found,
};
use crate::resolve::rewrite;

/// A document ready for rendering: rewritten, with its navigation computed.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedDoc {
	/// Document with every reference token resolved.
	pub doc: DocumentTree,
	/// Breadcrumb levels.
	pub siblings: Siblings,
	/// Incoming references, grouped when numerous.
	pub backrefs: AggregatedBackrefs,
}

/// Quire renders cross-linked API documentation from an ingested corpus.
///
/// The corpus snapshot is built once, on first use, and shared read-only by every
/// operation afterwards.
#[derive(Clone)]
pub struct Quire {
	/// Where documents come from.
	provider: Arc<dyn CorpusProvider + Send + Sync>,

	/// Back-reference count above which back-references are grouped by module.
	backref_threshold: usize,

	/// Whether terminal output carries escape codes.
	color: bool,

	/// Extension appended to HTML links (`.html` for static sites).
	link_extension: String,

	/// Snapshot of the corpus, built lazily.
	snapshot: Arc<OnceCell<CorpusSnapshot>>,
}

impl Quire {
	/// Create an instance over any corpus provider.
	pub fn new(provider: impl CorpusProvider + Send + Sync + 'static) -> Self {
		Self {
			provider: Arc::new(provider),
			backref_threshold: DEFAULT_THRESHOLD,
			color: false,
			link_extension: String::new(),
			snapshot: Arc::new(OnceCell::new()),
		}
	}

	/// Create an instance over the default ingest directory.
	///
	/// The directory comes from `QUIRE_INGEST_DIR`, falling back to `~/.quire/ingest`.
	pub fn from_env() -> Result<Self> {
		Ok(Self::new(FsStore::new(FsStore::default_root()?)))
	}

	/// Sets the number of back-references above which they are grouped by module.
	pub fn with_backref_threshold(mut self, threshold: usize) -> Self {
		self.backref_threshold = threshold;
		self
	}

	/// Enables or disables escape codes in terminal output.
	pub fn with_color(mut self, color: bool) -> Self {
		self.color = color;
		self
	}

	/// Sets the extension appended to HTML links.
	pub fn with_link_extension(mut self, extension: impl Into<String>) -> Self {
		self.link_extension = extension.into();
		self
	}

	/// Use an already built snapshot instead of enumerating the provider.
	pub fn with_snapshot(self, snapshot: CorpusSnapshot) -> Self {
		Self {
			snapshot: Arc::new(OnceCell::with_value(snapshot)),
			..self
		}
	}

	/// Returns the back-reference grouping threshold.
	pub fn backref_threshold(&self) -> usize {
		self.backref_threshold
	}

	/// Returns whether terminal output is colored.
	pub fn color(&self) -> bool {
		self.color
	}

	/// The corpus provider.
	pub fn provider(&self) -> &dyn CorpusProvider {
		self.provider.as_ref()
	}

	/// The corpus snapshot, built on first call.
	pub fn snapshot(&self) -> Result<&CorpusSnapshot> {
		self.snapshot
			.get_or_try_init(|| CorpusSnapshot::build(self.provider.as_ref()))
	}

	/// Load `qa`, resolve its references and compute its navigation.
	///
	/// A missing document is reported as [`QuireError::NotFound`]; every other failure names
	/// the document it happened in.
	pub fn prepare(&self, qa: &str, version: Option<&str>) -> Result<PreparedDoc> {
		let snapshot = self.snapshot()?;
		let raw = self
			.provider
			.load(qa, version)
			.map_err(|err| err.context(qa))?;
		let doc = rewrite(raw, qa, snapshot)?;
		let siblings = siblings(qa, snapshot.namespace_tree(), snapshot.ref_map());
		let backrefs = aggregate(&doc.backrefs, self.backref_threshold);
		log::debug!(
			"prepared {qa}: {} breadcrumb levels, {} back-references",
			siblings.levels.len(),
			backrefs.len()
		);
		Ok(PreparedDoc {
			doc,
			siblings,
			backrefs,
		})
	}

	/// Render a prepared document in the requested format.
	pub fn render_prepared(&self, prepared: &PreparedDoc, format: RenderFormat) -> Result<String> {
		let snapshot = self.snapshot()?;
		let page_data = Page {
			doc: &prepared.doc,
			siblings: &prepared.siblings,
			backrefs: &prepared.backrefs,
			ref_map: snapshot.ref_map(),
		};
		Ok(match format {
			RenderFormat::Ascii => render_document(&mut AsciiSurface::new(), &page_data),
			RenderFormat::Html => {
				let mut surface = self.html_surface();
				let body = render_document(&mut surface, &page_data);
				HtmlSink::to_document(&page(&prepared.doc.qa, body))
			}
			RenderFormat::Term => {
				let mut surface = TermSurface::new();
				let output = render_document(&mut surface, &page_data);
				surface.finish(output).paint(self.color, None)
			}
		})
	}

	/// Load, prepare and render `qa`.
	pub fn render_page(&self, qa: &str, version: Option<&str>, format: RenderFormat) -> Result<String> {
		let prepared = self.prepare(qa, version)?;
		self.render_prepared(&prepared, format)
	}

	/// Location of figure `name` among the assets of the module version `qa` belongs to.
	///
	/// Uses the canonical version of `qa`; names missing from the corpus have no figures.
	pub fn figure_path(&self, qa: &str, name: &str) -> Result<Option<PathBuf>> {
		let Some(info) = self.snapshot()?.ref_info(qa) else {
			return Ok(None);
		};
		let (Some(module), Some(version)) = (&info.module, &info.version) else {
			return Ok(None);
		};
		let assets = self.provider.assets(module, version)?;
		Ok(assets
			.into_iter()
			.find(|path| path.file_name().is_some_and(|file| file == name)))
	}

	/// Suggestions for a name that is not in the corpus.
	pub fn nearby(&self, qa: &str) -> Result<Nearby> {
		let snapshot = self.snapshot()?;
		let phantoms = self
			.provider
			.phantom_backrefs(qa)
			.map_err(|err| err.context(qa))?;
		Ok(nearby(qa, snapshot, phantoms))
	}

	/// Render the "browse nearby" page for a name that is not in the corpus.
	pub fn render_not_found(&self, qa: &str, format: RenderFormat) -> Result<String> {
		let nearby = self.nearby(qa)?;
		let ref_map = self.snapshot()?.ref_map();
		Ok(match format {
			RenderFormat::Ascii => render_not_found(&mut AsciiSurface::new(), &nearby, ref_map),
			RenderFormat::Html => {
				let mut surface = self.html_surface();
				let body = render_not_found(&mut surface, &nearby, ref_map);
				HtmlSink::to_document(&page(qa, body))
			}
			RenderFormat::Term => {
				let mut surface = TermSurface::new();
				let output = render_not_found(&mut surface, &nearby, ref_map);
				surface.finish(output).paint(self.color, None)
			}
		})
	}

	/// Open an interactive session on `qa`.
	///
	/// Names missing from the corpus open their "browse nearby" page instead.
	pub fn browse(&self, qa: &str, version: Option<&str>) -> Result<BrowserSession> {
		let mut surface = TermSurface::new();
		let output = match self.prepare(qa, version) {
			Ok(prepared) => {
				let snapshot = self.snapshot()?;
				let page_data = Page {
					doc: &prepared.doc,
					siblings: &prepared.siblings,
					backrefs: &prepared.backrefs,
					ref_map: snapshot.ref_map(),
				};
				render_document(&mut surface, &page_data)
			}
			Err(err) if err.is_not_found() => {
				let nearby = self.nearby(qa)?;
				render_not_found(&mut surface, &nearby, self.snapshot()?.ref_map())
			}
			Err(err) => return Err(err),
		};
		Ok(BrowserSession::new(qa, surface.finish(output)))
	}

	fn html_surface(&self) -> HtmlSurface {
		HtmlSurface::new().with_link_extension(self.link_extension.as_str())
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;

	use pretty_assertions::assert_eq;

	use super::*;
	use crate::model::{Node, RefInfo, RefKind, SeeAlsoItem, Section};
	use crate::render::LinkTarget;

	struct MemoryProvider {
		docs: HashMap<String, DocumentTree>,
		phantoms: HashMap<String, Vec<String>>,
	}

	impl CorpusProvider for MemoryProvider {
		fn entries(&self) -> Result<Vec<RefInfo>> {
			Ok(self
				.docs
				.keys()
				.map(|qa| RefInfo::api("numpy", "1.20.0", qa.as_str()))
				.collect())
		}

		fn load(&self, qa: &str, version: Option<&str>) -> Result<DocumentTree> {
			self.docs.get(qa).cloned().ok_or_else(|| QuireError::NotFound {
				qa: qa.to_string(),
				version: version.map(str::to_string),
			})
		}

		fn phantom_backrefs(&self, qa: &str) -> Result<Vec<String>> {
			Ok(self.phantoms.get(qa).cloned().unwrap_or_default())
		}

		fn assets(&self, module: &str, version: &str) -> Result<Vec<PathBuf>> {
			Ok(vec![PathBuf::from(format!("/{module}/{version}/assets/fig-1.png"))])
		}
	}

	fn quire() -> Quire {
		let mut geomspace = DocumentTree::new("numpy.geomspace").with_section(
			"Summary",
			Section::new(vec![Node::paragraph(vec![
				Node::words("See "),
				Node::directive("numpy.linspace"),
			])]),
		);
		geomspace.see_also = vec![SeeAlsoItem::new("linspace", Vec::new())];
		geomspace.backrefs = (0..40).map(|i| format!("scipy.f{i}")).collect();
		let linspace = DocumentTree::new("numpy.linspace");

		let provider = MemoryProvider {
			docs: [
				("numpy.geomspace".to_string(), geomspace),
				("numpy.linspace".to_string(), linspace),
			]
			.into_iter()
			.collect(),
			phantoms: [("numpy.nope".to_string(), vec!["numpy.geomspace".to_string()])]
				.into_iter()
				.collect(),
		};
		Quire::new(provider)
	}

	#[test]
	fn prepare_resolves_and_aggregates() {
		let prepared = quire().prepare("numpy.geomspace", None).unwrap();
		assert_eq!(prepared.doc.see_also[0].reference, Some(RefInfo::unknown("linspace")));
		assert!(matches!(prepared.backrefs, AggregatedBackrefs::Grouped(_)));
		assert_eq!(prepared.backrefs.len(), 40);
		assert_eq!(prepared.siblings.levels.len(), 2);

		let flat = quire()
			.with_backref_threshold(100)
			.prepare("numpy.geomspace", None)
			.unwrap();
		assert!(matches!(flat.backrefs, AggregatedBackrefs::Flat(_)));
	}

	#[test]
	fn missing_names_stay_not_found() {
		let err = quire().prepare("numpy.nope", None).unwrap_err();
		assert!(err.is_not_found());
		let page = quire().render_not_found("numpy.nope", RenderFormat::Ascii).unwrap();
		assert!(page.contains("Back References\n---------------\nnumpy.geomspace\n"));
	}

	#[test]
	fn rendered_formats_agree_on_links() {
		let quire = quire().with_link_extension(".html");
		let ascii = quire.render_page("numpy.geomspace", None, RenderFormat::Ascii).unwrap();
		assert!(ascii.contains("See numpy.linspace\n"));
		assert!(ascii.contains("linspace(?)\n"));

		let html = quire.render_page("numpy.geomspace", None, RenderFormat::Html).unwrap();
		assert!(html.contains("href=\"/p/numpy/1.20.0/api/numpy.linspace.html\""));
		assert!(html.contains("<title>numpy.geomspace</title>"));

		let term = quire.render_page("numpy.geomspace", None, RenderFormat::Term).unwrap();
		assert!(!term.contains('\u{1b}'));
	}

	#[test]
	fn browse_follows_links() {
		let quire = quire();
		let mut session = quire.browse("numpy.geomspace", None).unwrap();
		let targets: Vec<(String, RefKind)> = session
			.document()
			.links
			.iter()
			.filter_map(LinkTarget::reference)
			.map(|r| (r.path.clone(), r.kind))
			.collect();
		assert_eq!(targets[0], ("numpy.geomspace".to_string(), RefKind::Api));
		assert!(targets.contains(&("numpy.linspace".to_string(), RefKind::Api)));

		session.set_focus(1);
		let next = session.activate().unwrap().path().to_string();
		let session = quire.browse(&next, None).unwrap();
		assert_eq!(session.qa(), next);

		let missing = quire.browse("numpy.nope", None).unwrap();
		assert!(missing.document().plain_text().contains("No documentation for `numpy.nope`"));
	}

	#[test]
	fn figures_resolve_within_the_document_version() {
		let quire = quire();
		assert_eq!(
			quire.figure_path("numpy.geomspace", "fig-1.png").unwrap(),
			Some(PathBuf::from("/numpy/1.20.0/assets/fig-1.png"))
		);
		assert_eq!(quire.figure_path("numpy.geomspace", "fig-2.png").unwrap(), None);
		assert_eq!(quire.figure_path("numpy.nope", "fig-1.png").unwrap(), None);
	}

	#[test]
	fn injected_snapshot_replaces_enumeration() {
		let snapshot = CorpusSnapshot::from_refs([
			RefInfo::api("numpy", "2.0.0", "numpy.geomspace"),
			RefInfo::api("numpy", "2.0.0", "numpy.linspace"),
			RefInfo::api("numpy", "2.0.0", "numpy.logspace"),
		]);
		let quire = quire().with_snapshot(snapshot);
		assert_eq!(quire.snapshot().unwrap().ref_family().len(), 3);

		let prepared = quire.prepare("numpy.geomspace", None).unwrap();
		let Node::Paragraph(paragraph) = &prepared.doc.content["Summary"].children[0] else {
			panic!("expected the summary paragraph");
		};
		let Node::Link(link) = &paragraph.children[1] else {
			panic!("expected a resolved link");
		};
		assert_eq!(link.reference, RefInfo::api("numpy", "2.0.0", "numpy.linspace"));
	}
}
