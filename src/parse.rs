//! Template markup parsing.
//!
//! Markup is parsed by [html5ever](https://docs.rs/html5ever) the way a
//! [***template***](https://developer.mozilla.org/en-US/docs/Web/HTML/Element/template) element's `innerHTML` would be,
//! so implied end tags and character references behave as in browsers.
//! Anything the tree builder or tokenizer flags as a parse error is reported as a [`TemplateError`] instead.

use crate::{dom::Node, error::TemplateError};
use core::ops::Range;
use html5ever::{
	parse_fragment as parse_html_fragment,
	tendril::TendrilSink,
	tokenizer::TokenizerOpts,
	tree_builder::TreeBuilderOpts,
	LocalName, Namespace, ParseOpts, QualName,
};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use tracing::{instrument, trace};

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Parses `markup` into a new [***DocumentFragment***](https://developer.mozilla.org/en-US/docs/Web/API/DocumentFragment).
///
/// `{{ … }}` placeholders aren't interpreted here and remain part of the text and attribute values.
///
/// # Errors
///
/// Iff html5ever reports any parse error for `markup`.
#[instrument(skip(markup), fields(markup_len = markup.len()))]
pub fn parse_fragment(markup: &str) -> Result<Node, TemplateError> {
	// Exact messages quote the offending tokens.
	let exact_errors = cfg!(feature = "dangerous-logging");
	let opts = ParseOpts {
		tokenizer: TokenizerOpts {
			exact_errors,
			..TokenizerOpts::default()
		},
		tree_builder: TreeBuilderOpts {
			exact_errors,
			..TreeBuilderOpts::default()
		},
	};
	let context = QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from("template"));
	let dom: RcDom = parse_html_fragment(RcDom::default(), opts, context, Vec::new()).one(markup);

	if !dom.errors.is_empty() {
		return Err(TemplateError::Malformed {
			errors: dom.errors.iter().map(ToString::to_string).collect(),
		});
	}

	let fragment = Node::fragment();
	// The fragment parser puts everything under a synthetic `<html>` root.
	let root = dom.document.children.borrow().first().cloned();
	if let Some(root) = root {
		append_converted_children(&fragment, &root);
	}
	trace!(children = fragment.child_nodes().len(), "Parsed fragment.");
	Ok(fragment)
}

fn append_converted_children(parent: &Node, handle: &Handle) {
	for child in handle.children.borrow().iter() {
		if let Some(node) = convert(child) {
			parent.append_child(&node)
		}
	}
}

fn convert(handle: &Handle) -> Option<Node> {
	match &handle.data {
		NodeData::Element {
			name,
			attrs,
			template_contents,
			..
		} => {
			let element = Node::element(&name.local);
			for attribute in attrs.borrow().iter() {
				element.set_attribute(&attribute.name.local, &attribute.value);
			}
			// Nested templates keep their content in a separate fragment.
			match template_contents.borrow().as_ref() {
				Some(contents) => append_converted_children(&element, contents),
				None => append_converted_children(&element, handle),
			}
			Some(element)
		}
		NodeData::Text { contents } => Some(Node::text(&**contents.borrow())),
		NodeData::Comment { contents } => Some(Node::comment(&**contents)),
		NodeData::Document | NodeData::Doctype { .. } | NodeData::ProcessingInstruction { .. } => None,
	}
}

/// A piece of text or attribute value, split on `{{ expression }}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
	Static { text: &'a str, range: Range<usize> },
	Placeholder { expression: &'a str, range: Range<usize> },
}

impl Token<'_> {
	#[must_use]
	pub fn range(&self) -> Range<usize> {
		match self {
			Token::Static { range, .. } | Token::Placeholder { range, .. } => range.clone(),
		}
	}
}

/// Splits `text` into static runs and `{{ expression }}` placeholders, trimming whitespace around expressions.
///
/// An unterminated `{{` is static text. Extra braces around a placeholder (`{{{ 0 }}}`) are static text too.
#[must_use]
pub fn parse_placeholders(text: &str) -> Vec<Token<'_>> {
	let mut tokens = Vec::new();
	let mut static_start = 0;
	while let Some(mut open) = text[static_start..].find("{{").map(|i| static_start + i) {
		// In a longer run of braces, the last two open the placeholder.
		while text[open + 2..].starts_with('{') {
			open += 1;
		}
		let close = match text[open + 2..].find("}}") {
			Some(i) => open + 2 + i,
			None => break,
		};
		if open > static_start {
			tokens.push(Token::Static {
				text: &text[static_start..open],
				range: static_start..open,
			})
		}
		tokens.push(Token::Placeholder {
			expression: text[open + 2..close].trim(),
			range: open..close + 2,
		});
		static_start = close + 2;
	}
	if static_start < text.len() {
		tokens.push(Token::Static {
			text: &text[static_start..],
			range: static_start..text.len(),
		})
	}
	tokens
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn placeholders_split_text() {
		assert_eq!(
			parse_placeholders("a {{ 0 }}b{{x}}"),
			vec![
				Token::Static { text: "a ", range: 0..2 },
				Token::Placeholder { expression: "0", range: 2..9 },
				Token::Static { text: "b", range: 9..10 },
				Token::Placeholder { expression: "x", range: 10..15 },
			]
		);
	}

	#[test]
	fn unterminated_placeholder_is_static() {
		assert_eq!(
			parse_placeholders("{{ 0 }} {{ 1"),
			vec![
				Token::Placeholder { expression: "0", range: 0..7 },
				Token::Static { text: " {{ 1", range: 7..12 },
			]
		);
	}

	#[test]
	fn surrounding_braces_stay_static() {
		assert_eq!(
			parse_placeholders("{{{ 0 }}}"),
			vec![
				Token::Static { text: "{", range: 0..1 },
				Token::Placeholder { expression: "0", range: 1..8 },
				Token::Static { text: "}", range: 8..9 },
			]
		);
	}
}
