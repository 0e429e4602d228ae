//! Integration tests for the filesystem corpus provider.
mod utils;

use std::fs;

use pretty_assertions::assert_eq;
use quire::{CorpusProvider, CorpusSnapshot, FsStore, RefInfo};
use serde_json::json;
use tempfile::TempDir;
use utils::*;

#[test]
fn versions_sort_numerically() -> TestResult {
	let temp_dir = TempDir::new()?;
	write_doc(temp_dir.path(), "1.9.0", "numpy.sum", &document("Old.", Vec::new()))?;
	write_doc(temp_dir.path(), "1.10.0", "numpy.sum", &document("New.", Vec::new()))?;

	let store = FsStore::new(temp_dir.path());
	assert_eq!(store.versions("numpy")?, ["1.9.0", "1.10.0"]);
	assert!(store.versions("scipy")?.is_empty());

	let doc = store.load("numpy.sum", None)?;
	assert_eq!(doc.version.as_deref(), Some("1.10.0"));
	assert_eq!(doc.qa, "numpy.sum");

	let pinned = store.load("numpy.sum", Some("1.9.0"))?;
	assert_eq!(pinned.version.as_deref(), Some("1.9.0"));
	Ok(())
}

#[test]
fn newest_version_becomes_canonical() -> TestResult {
	let temp_dir = TempDir::new()?;
	write_doc(temp_dir.path(), "1.9.0", "numpy.sum", &document("Old.", Vec::new()))?;
	write_doc(temp_dir.path(), "1.10.0", "numpy.sum", &document("New.", Vec::new()))?;

	let snapshot = CorpusSnapshot::build(&FsStore::new(temp_dir.path()))?;
	assert_eq!(snapshot.ref_family().len(), 2);
	assert_eq!(
		snapshot.ref_info("numpy.sum"),
		Some(&RefInfo::api("numpy", "1.10.0", "numpy.sum"))
	);
	Ok(())
}

#[test]
fn backref_file_is_merged_without_duplicates() -> TestResult {
	let temp_dir = TempDir::new()?;
	let mut doc = document("Sum.", Vec::new());
	doc["backrefs"] = json!(["numpy.mean"]);
	write_doc(temp_dir.path(), "1.0.0", "numpy.sum", &doc)?;
	write_backrefs(temp_dir.path(), "1.0.0", "numpy.sum", &["numpy.mean", "scipy.stats"])?;

	let loaded = FsStore::new(temp_dir.path()).load("numpy.sum", None)?;
	assert_eq!(loaded.backrefs, ["numpy.mean", "scipy.stats"]);
	Ok(())
}

#[test]
fn phantom_backrefs_are_sorted_and_deduplicated() -> TestResult {
	let temp_dir = TempDir::new()?;
	let phantom_dir = temp_dir.path().join("__phantom__");
	fs::create_dir_all(&phantom_dir)?;
	fs::write(
		phantom_dir.join("numpy.gone.json"),
		json!(["scipy.b", "scipy.a", "scipy.a"]).to_string(),
	)?;
	write_doc(temp_dir.path(), "1.0.0", "numpy.sum", &document("Sum.", Vec::new()))?;

	let store = FsStore::new(temp_dir.path());
	assert_eq!(store.phantom_backrefs("numpy.gone")?, ["scipy.a", "scipy.b"]);
	assert!(store.phantom_backrefs("numpy.sum")?.is_empty());

	let entries = store.entries()?;
	assert_eq!(entries, [RefInfo::api("numpy", "1.0.0", "numpy.sum")]);
	Ok(())
}

#[test]
fn files_without_qualified_name_are_skipped() -> TestResult {
	let temp_dir = TempDir::new()?;
	let path = write_doc(temp_dir.path(), "1.0.0", "numpy.sum", &document("Sum.", Vec::new()))?;
	let dir = path.parent().ok_or("document without parent directory")?;
	fs::write(dir.join("not-a-name.json"), "{}")?;
	fs::write(dir.join("README.txt"), "notes")?;

	let entries = FsStore::new(temp_dir.path()).entries()?;
	let names: Vec<&str> = entries.iter().map(|entry| entry.path.as_str()).collect();
	assert_eq!(names, ["numpy.sum"]);
	Ok(())
}

#[test]
fn missing_documents_are_not_found() -> TestResult {
	let temp_dir = TempDir::new()?;
	write_doc(temp_dir.path(), "1.0.0", "numpy.sum", &document("Sum.", Vec::new()))?;
	let store = FsStore::new(temp_dir.path());

	assert!(store.load("numpy.missing", None).is_err_and(|err| err.is_not_found()));
	assert!(store.load("scipy.stats", None).is_err_and(|err| err.is_not_found()));
	assert!(store.load("numpy.sum", Some("2.0.0")).is_err_and(|err| err.is_not_found()));
	Ok(())
}

#[test]
fn assets_are_listed_per_version() -> TestResult {
	let temp_dir = TempDir::new()?;
	let assets = temp_dir.path().join("numpy").join("1.0.0").join("assets");
	fs::create_dir_all(&assets)?;
	fs::write(assets.join("fig-1.png"), b"png")?;

	let store = FsStore::new(temp_dir.path());
	assert_eq!(store.assets("numpy", "1.0.0")?, [assets.join("fig-1.png")]);
	assert!(store.assets("numpy", "2.0.0")?.is_empty());
	Ok(())
}
