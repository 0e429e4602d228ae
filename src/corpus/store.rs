//! Filesystem corpus laid out as `<root>/<module>/<version>/module/<qa>.json`.
//!
//! Back-references live next to each document in `<qa>.br` (a JSON list of names).
//! References to names that were never ingested are collected under
//! `<root>/__phantom__/<qa>.json`.

use std::path::{Path, PathBuf};
use std::{env, fs};

use once_cell::sync::Lazy;
use regex::Regex;

use super::{CorpusProvider, compare_versions};
use crate::core_api::error::{QuireError, Result};
use crate::model::{DocumentTree, RefInfo};

/// Directory holding phantom back-references.
const PHANTOM_DIR: &str = "__phantom__";

static QUALIFIED_NAME: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z0-9_]+)*$").expect("valid qualified-name pattern"));

/// Corpus provider reading ingested JSON documents from disk.
#[derive(Debug, Clone)]
pub struct FsStore {
	root: PathBuf,
}

impl FsStore {
	/// Create a store over an ingest directory.
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	/// Ingest directory from `QUIRE_INGEST_DIR`, falling back to `~/.quire/ingest`.
	pub fn default_root() -> Result<PathBuf> {
		if let Ok(dir) = env::var("QUIRE_INGEST_DIR") {
			return Ok(PathBuf::from(dir));
		}
		let home = dirs::home_dir().ok_or_else(|| {
			QuireError::Snapshot("could not determine the home directory".to_string())
		})?;
		Ok(home.join(".quire").join("ingest"))
	}

	/// Root of the ingest directory.
	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Versions available for a module, oldest first.
	pub fn versions(&self, module: &str) -> Result<Vec<String>> {
		let dir = self.root.join(module);
		if !dir.is_dir() {
			return Ok(Vec::new());
		}
		let mut versions = subdirectories(&dir)?;
		versions.sort_by(|a, b| compare_versions(a, b));
		Ok(versions)
	}

	fn document_path(&self, module: &str, version: &str, qa: &str) -> PathBuf {
		self.root
			.join(module)
			.join(version)
			.join("module")
			.join(format!("{qa}.json"))
	}

	fn read_backrefs(path: &Path) -> Result<Vec<String>> {
		if !path.exists() {
			return Ok(Vec::new());
		}
		let raw = fs::read_to_string(path)?;
		Ok(serde_json::from_str(&raw)?)
	}
}

impl CorpusProvider for FsStore {
	fn entries(&self) -> Result<Vec<RefInfo>> {
		let mut entries = Vec::new();
		for module in subdirectories(&self.root)? {
			if module == PHANTOM_DIR {
				continue;
			}
			for version in self.versions(&module)? {
				let dir = self.root.join(&module).join(&version).join("module");
				if !dir.is_dir() {
					continue;
				}
				for entry in fs::read_dir(&dir)? {
					let path = entry?.path();
					if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
						continue;
					}
					let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
						continue;
					};
					if !QUALIFIED_NAME.is_match(stem) {
						log::warn!("skipping {}: not a qualified name", path.display());
						continue;
					}
					entries.push(RefInfo::api(module.as_str(), version.as_str(), stem));
				}
			}
		}
		entries.sort();
		Ok(entries)
	}

	fn load(&self, qa: &str, version: Option<&str>) -> Result<DocumentTree> {
		let module = qa.split('.').next().unwrap_or(qa);
		let not_found = || QuireError::NotFound {
			qa: qa.to_string(),
			version: version.map(str::to_string),
		};

		let version = match version {
			Some(version) => version.to_string(),
			None => self
				.versions(module)?
				.into_iter()
				.rev()
				.find(|candidate| self.document_path(module, candidate, qa).exists())
				.ok_or_else(not_found)?,
		};

		let path = self.document_path(module, &version, qa);
		if !path.exists() {
			return Err(not_found());
		}

		let raw = fs::read_to_string(&path).map_err(|err| QuireError::from(err).context(qa))?;
		let mut doc: DocumentTree =
			serde_json::from_str(&raw).map_err(|err| QuireError::from(err).context(qa))?;
		doc.qa = qa.to_string();
		doc.version = Some(version);

		let mut backrefs = Self::read_backrefs(&path.with_extension("br"))
			.map_err(|err| err.context(qa))?;
		backrefs.retain(|name| !doc.backrefs.contains(name));
		doc.backrefs.extend(backrefs);
		Ok(doc)
	}

	fn phantom_backrefs(&self, qa: &str) -> Result<Vec<String>> {
		let path = self.root.join(PHANTOM_DIR).join(format!("{qa}.json"));
		let mut names = Self::read_backrefs(&path)?;
		names.sort();
		names.dedup();
		Ok(names)
	}

	fn assets(&self, module: &str, version: &str) -> Result<Vec<PathBuf>> {
		let dir = self.root.join(module).join(version).join("assets");
		if !dir.is_dir() {
			return Ok(Vec::new());
		}
		let mut assets = Vec::new();
		for entry in fs::read_dir(&dir)? {
			let path = entry?.path();
			if path.is_file() {
				assets.push(path);
			}
		}
		assets.sort();
		Ok(assets)
	}
}

fn subdirectories(dir: &Path) -> Result<Vec<String>> {
	let mut names = Vec::new();
	for entry in fs::read_dir(dir)? {
		let entry = entry?;
		if entry.file_type()?.is_dir()
			&& let Some(name) = entry.file_name().to_str()
		{
			names.push(name.to_string());
		}
	}
	names.sort();
	Ok(names)
}
