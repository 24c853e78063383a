//! Template instantiation: cloning a parsed template, locating its parts and handing them to a [`Processor`].

use crate::{
	dom::{Node, NodeType},
	error::TemplateError,
	parse::{parse_fragment, parse_placeholders, Token},
	part::{attribute_parts, NodePart, Part},
	value::Value,
};
use core::{
	fmt::{self, Debug, Formatter},
	hash::BuildHasher,
};
use hashbrown::HashMap;
use std::rc::Rc;
use tracing::{debug, instrument, trace};

/// A parsed template. Its content still contains the raw `{{ expression }}` placeholders.
#[derive(Debug)]
pub struct Template {
	content: Node,
}

impl Template {
	/// Wraps an existing fragment.
	#[must_use]
	pub fn new(content: Node) -> Self {
		Self { content }
	}

	/// # Errors
	///
	/// Iff `markup` is malformed.
	pub fn parse(markup: &str) -> Result<Self, TemplateError> {
		parse_fragment(markup).map(Self::new)
	}

	#[must_use]
	pub fn content(&self) -> &Node {
		&self.content
	}
}

/// Looks up the value for a part's expression.
pub trait ValueSource {
	fn value(&self, expression: &str) -> Option<&Value>;
}

fn positional<'a>(values: &'a [Value], expression: &str) -> Option<&'a Value> {
	expression.parse::<usize>().ok().and_then(|index| values.get(index))
}

impl ValueSource for &[Value] {
	fn value(&self, expression: &str) -> Option<&Value> {
		positional(self, expression)
	}
}

impl ValueSource for Vec<Value> {
	fn value(&self, expression: &str) -> Option<&Value> {
		positional(self, expression)
	}
}

impl ValueSource for Rc<[Value]> {
	fn value(&self, expression: &str) -> Option<&Value> {
		positional(self, expression)
	}
}

impl<S: BuildHasher> ValueSource for HashMap<String, Value, S> {
	fn value(&self, expression: &str) -> Option<&Value> {
		self.get(expression)
	}
}

/// Hooks a [`TemplateInstance`] calls with its parts.
pub trait Processor {
	/// Called once, right after the parts were located.
	///
	/// # Errors
	///
	/// Aborts instantiation.
	fn create_callback(&self, _instance: &TemplateInstance, _values: &dyn ValueSource) -> Result<(), TemplateError> {
		Ok(())
	}

	/// Called after [`Processor::create_callback`] and on each [`TemplateInstance::update`].
	///
	/// # Errors
	///
	/// Passed through to the caller of [`TemplateInstance::new`] or [`TemplateInstance::update`].
	fn process_callback(&self, instance: &TemplateInstance, values: &dyn ValueSource) -> Result<(), TemplateError>;
}

type ProcessPart = dyn Fn(&Part, &Value) -> Result<(), TemplateError>;

/// A [`Processor`] that applies a function to each part that has a value.
pub struct PartProcessor(Box<ProcessPart>);

impl Processor for PartProcessor {
	fn process_callback(&self, instance: &TemplateInstance, values: &dyn ValueSource) -> Result<(), TemplateError> {
		for part in instance.parts() {
			match values.value(part.expression()) {
				Some(value) => (self.0)(part, value)?,
				None => trace!(expression = part.expression(), "No value for part."),
			}
		}
		Ok(())
	}
}

impl Debug for PartProcessor {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str("PartProcessor")
	}
}

/// Creates a [`Processor`] that calls `process` for each part, with the part's value.
///
/// Parts whose expression has no value are skipped.
pub fn create_processor(process: impl Fn(&Part, &Value) -> Result<(), TemplateError> + 'static) -> Rc<dyn Processor> {
	Rc::new(PartProcessor(Box::new(process)))
}

/// A live copy of a [`Template`] with its parts.
///
/// The instance's nodes start out in [`TemplateInstance::fragment`] and are moved into place by the caller.
/// Parts keep tracking them after that.
pub struct TemplateInstance {
	fragment: Node,
	parts: Vec<Part>,
	processor: Rc<dyn Processor>,
}

impl TemplateInstance {
	/// Clones `template`'s content, locates its parts in document order and runs both processor hooks.
	///
	/// # Errors
	///
	/// Iff a processor hook fails.
	#[instrument(skip(template, values, processor))]
	pub fn new(template: &Template, values: &dyn ValueSource, processor: Rc<dyn Processor>) -> Result<Self, TemplateError> {
		let fragment = template.content().deep_clone();
		let mut parts = Vec::new();
		collect_parts(&fragment, &mut parts);
		debug!(parts = parts.len(), "Instantiated template.");

		let instance = Self {
			fragment,
			parts,
			processor: Rc::clone(&processor),
		};
		processor.create_callback(&instance, values)?;
		processor.process_callback(&instance, values)?;
		Ok(instance)
	}

	/// Runs the processor again with new values.
	///
	/// # Errors
	///
	/// Iff the processor fails.
	pub fn update(&self, values: &dyn ValueSource) -> Result<(), TemplateError> {
		trace!(parts = self.parts.len(), "Updating template instance.");
		self.processor.process_callback(self, values)
	}

	#[must_use]
	pub fn parts(&self) -> &[Part] {
		&self.parts
	}

	#[must_use]
	pub fn fragment(&self) -> &Node {
		&self.fragment
	}
}

impl Debug for TemplateInstance {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("TemplateInstance").field("parts", &self.parts).finish_non_exhaustive()
	}
}

fn collect_parts(parent: &Node, parts: &mut Vec<Part>) {
	let mut current = parent.first_child();
	while let Some(node) = current {
		match node.node_type() {
			NodeType::Element => {
				for (name, value) in node.attributes() {
					if value.contains("{{") {
						let tokens = parse_placeholders(&value);
						parts.extend(attribute_parts(&node, &name, &tokens).into_iter().map(Part::Attribute))
					}
				}
				collect_parts(&node, parts)
			}
			NodeType::Text => {
				let text = node.text_content();
				if let Some(token) = parse_placeholders(&text).into_iter().next() {
					// The remainder becomes the next sibling and is visited next.
					let end = token.range().end;
					if end < text.len() {
						node.split_text(end);
					}
					if let Token::Placeholder { expression, .. } = token {
						parts.push(Part::Node(NodePart::new(node.clone(), expression)))
					}
				}
			}
			NodeType::Comment | NodeType::DocumentFragment => (),
		}
		current = node.next_sibling();
	}
}
