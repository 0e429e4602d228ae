//! Whole-corpus rendering.
mod utils;

use std::fs;

use pretty_assertions::assert_eq;
use quire::{FsStore, Quire, QuireError, Surfaces};
use serde_json::json;
use tempfile::TempDir;
use utils::*;

fn corpus() -> Result<TempDir, Box<dyn std::error::Error>> {
	let temp_dir = TempDir::new()?;
	let root = temp_dir.path();
	write_doc(
		root,
		"1.0.0",
		"numpy.a",
		&document(
			"A.",
			vec![("Notes", section(vec![words("See "), directive("numpy.b")]))],
		),
	)?;
	write_doc(root, "1.0.0", "numpy.b", &document("B.", Vec::new()))?;
	write_doc(root, "1.0.0", "numpy.bad", &json!({ "content": {} }))?;
	Ok(temp_dir)
}

#[test]
fn one_malformed_document_does_not_abort_the_batch() -> TestResult {
	let corpus = corpus()?;
	let quire = Quire::new(FsStore::new(corpus.path())).with_link_extension(".html");

	let report = quire.render_all(Surfaces::ASCII | Surfaces::HTML)?;
	assert!(!report.is_success());
	assert_eq!(report.pages.len(), 4);
	assert_eq!(report.failures.len(), 1);
	assert_eq!(report.failures[0].reference.path, "numpy.bad");
	assert_eq!(
		report.failures[0].error.to_string(),
		"malformed document numpy.bad: missing section `Summary`"
	);
	Ok(())
}

#[test]
fn pages_are_written_under_the_site_layout() -> TestResult {
	let corpus = corpus()?;
	let out = TempDir::new()?;
	let quire = Quire::new(FsStore::new(corpus.path())).with_link_extension(".html");

	let report = quire.render_all(Surfaces::HTML)?;
	assert_eq!(report.write_to(out.path())?, 2);

	let page = fs::read_to_string(out.path().join("p/numpy/1.0.0/api/numpy.a.html"))?;
	assert!(page.contains("<a href=\"/p/numpy/1.0.0/api/numpy.b.html\">numpy.b</a>"));
	assert!(out.path().join("p/numpy/1.0.0/api/numpy.b.html").is_file());
	assert!(!out.path().join("p/numpy/1.0.0/api/numpy.bad.html").exists());
	Ok(())
}

#[test]
fn assets_are_copied_next_to_pages() -> TestResult {
	let corpus = corpus()?;
	let assets = corpus.path().join("numpy/1.0.0/assets");
	fs::create_dir_all(&assets)?;
	fs::write(assets.join("fig-1.png"), b"png")?;

	let out = TempDir::new()?;
	let quire = Quire::new(FsStore::new(corpus.path()));
	let copied = quire.copy_assets(out.path())?;
	assert_eq!(copied, 1);
	assert_eq!(fs::read(out.path().join("p/numpy/1.0.0/img/fig-1.png"))?, b"png");
	Ok(())
}

#[test]
fn unreadable_corpus_fails_the_whole_batch() {
	let temp_dir = TempDir::new().expect("temp dir");
	let quire = Quire::new(FsStore::new(temp_dir.path().join("missing")));
	let result = quire.render_all(Surfaces::default());
	assert!(matches!(result, Err(QuireError::Snapshot(_))));
}

#[test]
fn figures_resolve_to_ingested_assets() -> TestResult {
	let corpus = corpus()?;
	let assets = corpus.path().join("numpy/1.0.0/assets");
	fs::create_dir_all(&assets)?;
	fs::write(assets.join("fig-1.png"), b"png")?;

	let quire = Quire::new(FsStore::new(corpus.path()));
	assert_eq!(quire.figure_path("numpy.a", "fig-1.png")?, Some(assets.join("fig-1.png")));
	assert_eq!(quire.figure_path("numpy.a", "fig-9.png")?, None);
	Ok(())
}
