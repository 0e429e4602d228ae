//! Helpers for building on-disk corpora in integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use quire::model::REQUIRED_SECTIONS;
use serde_json::{Value, json};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Paragraph section holding `children`.
pub fn section(children: Vec<Value>) -> Value {
	json!({ "children": [{ "type": "Paragraph", "children": children }] })
}

pub fn words(value: &str) -> Value {
	json!({ "type": "Words", "value": value })
}

pub fn directive(value: &str) -> Value {
	json!({ "type": "Directive", "value": value })
}

pub fn param(name: &str, type_: &str) -> Value {
	json!({ "type": "Param", "param": name, "type_": type_, "desc": [] })
}

/// Document JSON carrying every required section, with `overrides` replacing some of them.
pub fn document(summary: &str, overrides: Vec<(&str, Value)>) -> Value {
	let mut content = serde_json::Map::new();
	for name in REQUIRED_SECTIONS {
		content.insert(name.to_string(), json!({ "children": [] }));
	}
	content.insert("Summary".to_string(), section(vec![words(summary)]));
	for (name, value) in overrides {
		content.insert(name.to_string(), value);
	}
	json!({ "content": content })
}

/// Write `doc` as `<root>/<module>/<version>/module/<qa>.json`.
pub fn write_doc(root: &Path, version: &str, qa: &str, doc: &Value) -> std::io::Result<PathBuf> {
	let module = qa.split('.').next().unwrap_or(qa);
	let dir = root.join(module).join(version).join("module");
	fs::create_dir_all(&dir)?;
	let path = dir.join(format!("{qa}.json"));
	fs::write(&path, doc.to_string())?;
	Ok(path)
}

/// Write the back-reference file next to a document.
pub fn write_backrefs(root: &Path, version: &str, qa: &str, names: &[&str]) -> std::io::Result<()> {
	let module = qa.split('.').next().unwrap_or(qa);
	let path = root
		.join(module)
		.join(version)
		.join("module")
		.join(format!("{qa}.br"));
	fs::write(path, json!(names).to_string())
}
