use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use bitflags::bitflags;
use rayon::prelude::*;

use super::error::{QuireError, Result};
use super::Quire;
use crate::corpus::ANY_VERSION;
use crate::model::RefInfo;
use crate::render::RenderFormat;

bitflags! {
	/// Outputs produced by a batch run.
	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	pub struct Surfaces: u8 {
		/// Plain text pages.
		const ASCII = 1 << 0;
		/// Static HTML pages.
		const HTML = 1 << 1;
	}
}

impl Default for Surfaces {
	fn default() -> Self {
		Self::HTML
	}
}

impl Surfaces {
	/// Page formats selected by these flags, in a stable order.
	pub fn formats(self) -> Vec<RenderFormat> {
		let mut formats = Vec::new();
		if self.contains(Self::ASCII) {
			formats.push(RenderFormat::Ascii);
		}
		if self.contains(Self::HTML) {
			formats.push(RenderFormat::Html);
		}
		formats
	}
}

/// One rendered page of a batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
	/// Document the page was rendered from.
	pub reference: RefInfo,
	/// Format of `content`.
	pub format: RenderFormat,
	/// Rendered text.
	pub content: String,
}

impl RenderedPage {
	/// Location of the page below an output directory: `p/<module>/<version>/api/<qa>.<ext>`.
	pub fn relative_path(&self) -> PathBuf {
		let extension = match self.format {
			RenderFormat::Html => "html",
			RenderFormat::Ascii | RenderFormat::Term => "txt",
		};
		Path::new("p")
			.join(self.reference.module.as_deref().unwrap_or(ANY_VERSION))
			.join(self.reference.version.as_deref().unwrap_or(ANY_VERSION))
			.join("api")
			.join(format!("{}.{extension}", self.reference.path))
	}
}

/// A document that could not be rendered.
#[derive(Debug)]
pub struct BatchFailure {
	/// Document that failed.
	pub reference: RefInfo,
	/// Why it failed.
	pub error: QuireError,
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
	/// Successfully rendered pages, in corpus order.
	pub pages: Vec<RenderedPage>,
	/// Documents that failed, in corpus order.
	pub failures: Vec<BatchFailure>,
}

impl BatchReport {
	/// Whether every document rendered.
	pub fn is_success(&self) -> bool {
		self.failures.is_empty()
	}

	/// Write every page below `out_dir`, returning how many files were written.
	pub fn write_to(&self, out_dir: &Path) -> Result<usize> {
		for page in &self.pages {
			let path = out_dir.join(page.relative_path());
			if let Some(parent) = path.parent() {
				fs::create_dir_all(parent)?;
			}
			fs::write(&path, &page.content)?;
		}
		Ok(self.pages.len())
	}
}

impl Quire {
	/// Render every document of the corpus in parallel.
	///
	/// The snapshot is built before any worker starts; failing to build it is the only
	/// error. Documents that fail are collected in the report and do not stop the others.
	pub fn render_all(&self, surfaces: Surfaces) -> Result<BatchReport> {
		let snapshot = self.snapshot()?;
		let formats = surfaces.formats();
		log::info!(
			"rendering {} documents on {} threads",
			snapshot.ref_family().len(),
			rayon::current_num_threads()
		);

		let outcomes: Vec<(RefInfo, Result<Vec<RenderedPage>>)> = snapshot
			.ref_family()
			.par_iter()
			.map(|reference| (reference.clone(), self.render_entry(reference, &formats)))
			.collect();

		let mut report = BatchReport::default();
		for (reference, outcome) in outcomes {
			match outcome {
				Ok(pages) => report.pages.extend(pages),
				Err(error) => {
					log::warn!("{}: {error}", reference.path);
					report.failures.push(BatchFailure { reference, error });
				}
			}
		}
		log::info!(
			"rendered {} pages, {} failures",
			report.pages.len(),
			report.failures.len()
		);
		Ok(report)
	}

	/// Copy figure assets of every module version into `<out_dir>/p/<module>/<version>/img`.
	pub fn copy_assets(&self, out_dir: &Path) -> Result<usize> {
		let snapshot = self.snapshot()?;
		let mut seen = BTreeSet::new();
		let mut copied = 0;
		for reference in snapshot.ref_family() {
			let (Some(module), Some(version)) = (&reference.module, &reference.version) else {
				continue;
			};
			if !seen.insert((module.as_str(), version.as_str())) {
				continue;
			}
			let assets = self.provider.assets(module, version)?;
			if assets.is_empty() {
				continue;
			}
			let target = out_dir.join("p").join(module).join(version).join("img");
			fs::create_dir_all(&target)?;
			for asset in assets {
				if let Some(name) = asset.file_name() {
					fs::copy(&asset, target.join(name))?;
					copied += 1;
				}
			}
		}
		log::info!("copied {copied} assets");
		Ok(copied)
	}

	fn render_entry(&self, reference: &RefInfo, formats: &[RenderFormat]) -> Result<Vec<RenderedPage>> {
		let prepared = self.prepare(&reference.path, reference.version.as_deref())?;
		formats
			.iter()
			.map(|format| {
				Ok(RenderedPage {
					reference: reference.clone(),
					format: *format,
					content: self.render_prepared(&prepared, *format)?,
				})
			})
			.collect()
	}
}
