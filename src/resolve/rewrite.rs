use std::collections::BTreeMap;

use super::{LocalRefs, resolve};
use crate::core_api::error::{QuireError, Result};
use crate::corpus::CorpusSnapshot;
use crate::model::{
	BlockDirective, Code, DefList, DefListItem, Directive, DocumentTree, Link, Node, Paragraph,
	Param, REQUIRED_SECTIONS, RefInfo, RefKind, SeeAlsoItem, Section, Verbatim,
};

/// Roles whose directives hold literal content rather than a reference.
const LITERAL_ROLES: &[&str] = &["math"];

/// Replace every reference token of `doc` with a resolved [`Link`].
///
/// Walks all sections, the "See Also" entries and the example data once. Running it again
/// on its own output yields the same tree: links are never re-tokenized and resolution is
/// deterministic for a given snapshot.
pub fn rewrite(doc: DocumentTree, qa: &str, snapshot: &CorpusSnapshot) -> Result<DocumentTree> {
	if let Some(missing) = REQUIRED_SECTIONS
		.iter()
		.find(|name| !doc.content.contains_key(**name))
	{
		return Err(QuireError::malformed(qa, format!("missing section `{missing}`")));
	}

	let locals = LocalRefs::from_document(&doc);
	let rewriter = Rewriter {
		qa,
		snapshot,
		locals: &locals,
	};

	let DocumentTree {
		qa: doc_qa,
		version,
		signature,
		content,
		see_also,
		example_section_data,
		refs,
		ref_links: _,
		backrefs,
	} = doc;

	let content: BTreeMap<String, Section> = content
		.into_iter()
		.map(|(name, section)| Ok((name, rewriter.section(section)?)))
		.collect::<Result<_>>()?;
	let see_also: Vec<SeeAlsoItem> = see_also
		.into_iter()
		.map(|item| rewriter.see_also(item))
		.collect::<Result<_>>()?;
	let example_section_data = rewriter.section(example_section_data)?;
	let ref_links = refs
		.iter()
		.map(|token| Link {
			value: token.clone(),
			reference: rewriter.resolve(token),
		})
		.collect();

	Ok(DocumentTree {
		qa: doc_qa,
		version,
		signature,
		content,
		see_also,
		example_section_data,
		refs,
		ref_links,
		backrefs,
	})
}

struct Rewriter<'a> {
	qa: &'a str,
	snapshot: &'a CorpusSnapshot,
	locals: &'a LocalRefs,
}

impl Rewriter<'_> {
	fn resolve(&self, token: &str) -> RefInfo {
		resolve(self.qa, self.snapshot, self.locals, token)
	}

	fn nodes(&self, nodes: Vec<Node>) -> Result<Vec<Node>> {
		nodes.into_iter().map(|node| self.node(node)).collect()
	}

	fn section(&self, section: Section) -> Result<Section> {
		Ok(Section {
			children: self.nodes(section.children)?,
			title: section.title,
		})
	}

	fn node(&self, node: Node) -> Result<Node> {
		Ok(match node {
			Node::Directive(directive) => self.directive(directive)?,
			Node::Paragraph(paragraph) => Node::Paragraph(Paragraph {
				children: self.nodes(paragraph.children)?,
			}),
			Node::Section(section) => Node::Section(self.section(section)?),
			Node::BlockDirective(block) => Node::BlockDirective(BlockDirective {
				inner: match block.inner {
					Some(inner) => Some(Box::new(self.node(*inner)?)),
					None => None,
				},
				..block
			}),
			Node::DefList(list) => Node::DefList(DefList {
				children: list
					.children
					.into_iter()
					.map(|item| self.def_list_item(item))
					.collect::<Result<_>>()?,
			}),
			Node::DefListItem(item) => Node::DefListItem(self.def_list_item(item)?),
			Node::SeeAlsoItem(item) => Node::SeeAlsoItem(self.see_also(item)?),
			Node::Param(param) => Node::Param(Param {
				desc: self.nodes(param.desc)?,
				..param
			}),
			Node::Code(code) => Node::Code(self.code(code)),
			Node::Example(code) => Node::Example(self.code(code)),
			leaf @ (Node::Words(_)
			| Node::Link(_)
			| Node::Verbatim(_)
			| Node::Fig(_)
			| Node::Unsupported(_)) => leaf,
		})
	}

	fn directive(&self, directive: Directive) -> Result<Node> {
		if directive
			.role
			.as_deref()
			.is_some_and(|role| LITERAL_ROLES.contains(&role))
		{
			return Ok(Node::Verbatim(Verbatim {
				value: directive.value,
			}));
		}
		let token = directive.value.trim();
		if token.is_empty() {
			return Err(QuireError::malformed(self.qa, "empty reference token"));
		}
		let reference = self.resolve(token);
		Ok(Node::Link(Link {
			value: directive.value,
			reference,
		}))
	}

	fn def_list_item(&self, item: DefListItem) -> Result<DefListItem> {
		Ok(DefListItem {
			dt: Box::new(self.node(*item.dt)?),
			dd: self.nodes(item.dd)?,
		})
	}

	fn see_also(&self, item: SeeAlsoItem) -> Result<SeeAlsoItem> {
		let reference = match item.reference {
			Some(reference) => reference,
			None => self.resolve(&item.name),
		};
		Ok(SeeAlsoItem {
			reference: Some(reference),
			descriptions: self.nodes(item.descriptions)?,
			..item
		})
	}

	/// Code tokens only become links when they resolve; unknown names stay plain code.
	fn code(&self, mut code: Code) -> Code {
		for entry in &mut code.entries {
			if entry.reference.is_some() {
				continue;
			}
			if let Some(token) = &entry.token {
				let info = self.resolve(token);
				if info.kind != RefKind::Unknown {
					entry.reference = Some(info);
				}
			}
		}
		code
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::model::{CodeEntry, Unsupported, Words};

	fn snapshot() -> CorpusSnapshot {
		CorpusSnapshot::from_names(["numpy.geomspace", "numpy.linspace", "numpy.logspace"])
	}

	fn param(name: &str, desc: Vec<Node>) -> Node {
		Node::Param(Param {
			param: name.to_string(),
			type_: "array_like".to_string(),
			desc,
		})
	}

	fn sample() -> DocumentTree {
		let mut doc = DocumentTree::new("numpy.geomspace")
			.with_section(
				"Summary",
				Section::new(vec![Node::paragraph(vec![
					Node::words("Like "),
					Node::directive("numpy.logspace"),
					Node::words(" but with "),
					Node::directive("start"),
				])]),
			)
			.with_section(
				"Parameters",
				Section::new(vec![param(
					"start",
					vec![Node::paragraph(vec![Node::directive("stop")])],
				)]),
			)
			.with_section(
				"Notes",
				Section::new(vec![Node::BlockDirective(BlockDirective {
					name: "math".to_string(),
					args0: Vec::new(),
					inner: Some(Box::new(Node::paragraph(vec![Node::Directive(Directive {
						value: "a^n".to_string(),
						domain: None,
						role: Some("math".to_string()),
					})]))),
				})]),
			);
		doc.see_also = vec![SeeAlsoItem::new(
			"linspace",
			vec![Node::paragraph(vec![Node::directive("numpy.linspace")])],
		)];
		doc.example_section_data = Section::new(vec![Node::Example(Code {
			entries: vec![
				CodeEntry {
					token: Some("numpy.geomspace".to_string()),
					..CodeEntry::new("np.geomspace", Some("n"))
				},
				CodeEntry {
					token: Some("np".to_string()),
					..CodeEntry::new("np", Some("n"))
				},
			],
			out: "array([1., 10.])".to_string(),
			ce_status: None,
		})]);
		doc.refs = vec!["numpy.linspace".to_string(), "nope".to_string()];
		doc
	}

	fn summary_links(doc: &DocumentTree) -> Vec<RefInfo> {
		let Node::Paragraph(paragraph) = &doc.content["Summary"].children[0] else {
			panic!("expected a paragraph");
		};
		paragraph
			.children
			.iter()
			.filter_map(|node| match node {
				Node::Link(link) => Some(link.reference.clone()),
				_ => None,
			})
			.collect()
	}

	#[test]
	fn tokens_become_links() {
		let doc = rewrite(sample(), "numpy.geomspace", &snapshot()).unwrap();
		let links = summary_links(&doc);
		assert_eq!(links[0].kind, RefKind::Api);
		assert_eq!(links[0].path, "numpy.logspace");
		assert_eq!(links[1], RefInfo::local("start"));
	}

	#[test]
	fn nested_tokens_are_resolved() {
		let doc = rewrite(sample(), "numpy.geomspace", &snapshot()).unwrap();
		let Node::Param(param) = &doc.content["Parameters"].children[0] else {
			panic!("expected a param");
		};
		let Node::Paragraph(paragraph) = &param.desc[0] else {
			panic!("expected a paragraph");
		};
		assert_eq!(
			paragraph.children[0],
			Node::Link(Link {
				value: "stop".to_string(),
				reference: RefInfo::unknown("stop"),
			})
		);
	}

	#[test]
	fn math_role_stays_literal() {
		let doc = rewrite(sample(), "numpy.geomspace", &snapshot()).unwrap();
		let Node::BlockDirective(block) = &doc.content["Notes"].children[0] else {
			panic!("expected a block directive");
		};
		let Some(inner) = block.inner.as_deref() else {
			panic!("expected a body");
		};
		assert_eq!(
			*inner,
			Node::paragraph(vec![Node::Verbatim(Verbatim {
				value: "a^n".to_string()
			})])
		);
	}

	#[test]
	fn see_also_and_examples_are_resolved() {
		let doc = rewrite(sample(), "numpy.geomspace", &snapshot()).unwrap();
		assert_eq!(doc.see_also[0].reference, Some(RefInfo::unknown("linspace")));
		assert!(matches!(
			&doc.see_also[0].descriptions[0],
			Node::Paragraph(p) if matches!(&p.children[0], Node::Link(l) if l.reference.kind == RefKind::Api)
		));

		let Node::Example(code) = &doc.example_section_data.children[0] else {
			panic!("expected an example");
		};
		assert_eq!(code.entries[0].reference.as_ref().map(|r| r.kind), Some(RefKind::Api));
		assert_eq!(code.entries[1].reference, None);

		let kinds: Vec<RefKind> = doc.ref_links.iter().map(|l| l.reference.kind).collect();
		assert_eq!(kinds, [RefKind::Api, RefKind::Unknown]);
	}

	#[test]
	fn rewrite_is_idempotent() {
		let once = rewrite(sample(), "numpy.geomspace", &snapshot()).unwrap();
		let twice = rewrite(once.clone(), "numpy.geomspace", &snapshot()).unwrap();
		assert_eq!(once, twice);
	}

	#[test]
	fn missing_section_is_malformed() {
		let mut doc = sample();
		doc.content.remove("Yields");
		let err = rewrite(doc, "numpy.geomspace", &snapshot()).unwrap_err();
		assert_eq!(
			err.to_string(),
			"malformed document numpy.geomspace: missing section `Yields`"
		);
	}

	#[test]
	fn empty_token_is_malformed() {
		let doc = DocumentTree::new("numpy.geomspace").with_section(
			"Summary",
			Section::new(vec![Node::paragraph(vec![Node::directive("  ")])]),
		);
		let err = rewrite(doc, "numpy.geomspace", &snapshot()).unwrap_err();
		assert!(matches!(err, QuireError::MalformedDocument { .. }));
	}

	#[test]
	fn unsupported_nodes_pass_through() {
		let odd = Node::Unsupported(Unsupported {
			tag: "Math".to_string(),
		});
		let words = Node::Words(Words {
			value: "x".to_string(),
		});
		let doc = DocumentTree::new("numpy.geomspace")
			.with_section("Notes", Section::new(vec![odd.clone(), words]));
		let doc = rewrite(doc, "numpy.geomspace", &snapshot()).unwrap();
		assert_eq!(doc.content["Notes"].children[0], odd);
	}
}
