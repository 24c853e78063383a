//! Template parts: the places in an instantiated template that accept dynamic values.
//!
//! A [`NodePart`] owns a run of sibling nodes. An [`AttributePart`] owns one placeholder slot of an attribute value,
//! which may contain several slots and static text between them.

use crate::{
	dom::{Node, SideTable},
	parse::Token,
};
use core::{
	cell::{Cell, RefCell},
	fmt::{self, Debug, Formatter},
};
use std::rc::Rc;
use tracing::{trace, warn};

/// A part that renders as a run of sibling nodes.
///
/// The run is bounded by two empty text nodes owned by the part: the cleared placeholder and an end marker after it.
/// Nested parts at the edges of the run therefore can't move the part's own position.
#[derive(Clone)]
pub struct NodePart(Rc<NodePartData>);

struct NodePartData {
	expression: String,
	start: Node,
	end: Node,
	version: Cell<u64>,
	slots: SideTable,
}

impl NodePart {
	/// Turns a placeholder text node into a part, clearing its text and inserting the end marker after it.
	pub(crate) fn new(placeholder: Node, expression: &str) -> Self {
		placeholder.set_text_content("");
		let end = Node::text("");
		if let Some(parent) = placeholder.parent_node() {
			parent.insert_before(&end, placeholder.next_sibling().as_ref())
		}
		Self(Rc::new(NodePartData {
			expression: expression.to_owned(),
			start: placeholder,
			end,
			version: Cell::new(0),
			slots: SideTable::default(),
		}))
	}

	#[must_use]
	pub fn expression(&self) -> &str {
		&self.0.expression
	}

	/// The nodes currently making up this part, in order.
	#[must_use]
	pub fn nodes(&self) -> Vec<Node> {
		self.parent_node()
			.map_or_else(Vec::new, |parent| parent.children_between(&self.0.start, &self.0.end))
	}

	#[must_use]
	pub fn parent_node(&self) -> Option<Node> {
		self.0.start.parent_node()
	}

	/// The concatenated text content of this part's nodes.
	#[must_use]
	pub fn value(&self) -> String {
		self.nodes().iter().map(Node::text_content).collect()
	}

	/// Replaces the content with a single text node.
	pub fn set_value(&self, text: &str) {
		self.replace(vec![Node::text(text)])
	}

	/// Replaces this part's nodes with `nodes`.
	///
	/// [***DocumentFragment***](https://developer.mozilla.org/en-US/docs/Web/API/DocumentFragment)s among `nodes` contribute their children.
	pub fn replace(&self, nodes: Vec<Node>) {
		let parent = match self.parent_node() {
			Some(parent) => parent,
			None => return warn!(expression = self.expression(), "Can't replace the content of a detached node part."),
		};

		let old = parent.replace_between(&self.0.start, &self.0.end, &nodes);

		self.0.version.set(self.0.version.get() + 1);
		trace!(expression = self.expression(), old = old.len(), new = nodes.len(), "Replaced node part content.");
	}

	/// Increases with every [`NodePart::replace`].
	pub(crate) fn version(&self) -> u64 {
		self.0.version.get()
	}

	pub(crate) fn slot<T: 'static>(&self, init: impl FnOnce() -> T) -> Rc<T> {
		self.0.slots.get_or_insert_with(init)
	}

	#[must_use]
	pub fn ptr_eq(&self, other: &NodePart) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}
}

impl Debug for NodePart {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("NodePart")
			.field("expression", &self.0.expression)
			.field("version", &self.0.version.get())
			.finish()
	}
}

enum Segment {
	Static(String),
	Dynamic(usize),
}

/// Owns one attribute of one element and rewrites it from its segments whenever a slot changes.
struct AttributeValueSetter {
	element: Node,
	name: String,
	segments: Vec<Segment>,
	values: RefCell<Vec<String>>,
}

impl AttributeValueSetter {
	fn update_element(&self) {
		let values = self.values.borrow();
		let value: String = self
			.segments
			.iter()
			.map(|segment| match segment {
				Segment::Static(text) => text.as_str(),
				Segment::Dynamic(slot) => values[*slot].as_str(),
			})
			.collect();
		self.element.set_attribute(&self.name, &value)
	}

	fn is_fully_templatized(&self) -> bool {
		matches!(self.segments.as_slice(), [Segment::Dynamic(_)])
	}
}

/// One placeholder inside an attribute value.
#[derive(Clone)]
pub struct AttributePart(Rc<AttributePartData>);

struct AttributePartData {
	expression: String,
	setter: Rc<AttributeValueSetter>,
	slot: usize,
	slots: SideTable,
}

/// Creates the parts for an attribute value split into `tokens`, rewriting the attribute without its placeholders.
///
/// Returns no parts (and leaves the attribute alone) if there are no placeholders.
pub(crate) fn attribute_parts(element: &Node, name: &str, tokens: &[Token<'_>]) -> Vec<AttributePart> {
	let mut segments = Vec::with_capacity(tokens.len());
	let mut expressions = Vec::new();
	for token in tokens {
		match token {
			Token::Static { text, .. } => segments.push(Segment::Static((*text).to_owned())),
			Token::Placeholder { expression, .. } => {
				segments.push(Segment::Dynamic(expressions.len()));
				expressions.push(*expression);
			}
		}
	}
	if expressions.is_empty() {
		return Vec::new();
	}

	let setter = Rc::new(AttributeValueSetter {
		element: element.clone(),
		name: name.to_owned(),
		segments,
		values: RefCell::new(vec![String::new(); expressions.len()]),
	});
	setter.update_element();

	expressions
		.into_iter()
		.enumerate()
		.map(|(slot, expression)| {
			AttributePart(Rc::new(AttributePartData {
				expression: expression.to_owned(),
				setter: Rc::clone(&setter),
				slot,
				slots: SideTable::default(),
			}))
		})
		.collect()
}

impl AttributePart {
	#[must_use]
	pub fn expression(&self) -> &str {
		&self.0.expression
	}

	#[must_use]
	pub fn element(&self) -> &Node {
		&self.0.setter.element
	}

	#[must_use]
	pub fn attribute_name(&self) -> &str {
		&self.0.setter.name
	}

	/// This slot's current value (not the whole attribute's).
	#[must_use]
	pub fn value(&self) -> String {
		self.0.setter.values.borrow()[self.0.slot].clone()
	}

	/// Sets this slot's value and rewrites the attribute.
	pub fn set_value(&self, value: &str) {
		value.clone_into(&mut self.0.setter.values.borrow_mut()[self.0.slot]);
		self.0.setter.update_element()
	}

	/// Whether the attribute consists of this part alone, without static text or other parts.
	#[must_use]
	pub fn is_fully_templatized(&self) -> bool {
		self.0.setter.is_fully_templatized()
	}

	#[must_use]
	pub fn boolean_value(&self) -> bool {
		self.element().has_attribute(self.attribute_name())
	}

	/// Makes the attribute present (with an empty value) or absent.
	///
	/// Only possible for fully templatized attributes. Otherwise this logs a warning and changes nothing.
	pub fn set_boolean_value(&self, value: bool) {
		if !self.is_fully_templatized() {
			return warn!(
				attribute = self.attribute_name(),
				"Can't toggle an attribute that isn't fully templatized."
			);
		}
		self.0.setter.values.borrow_mut()[self.0.slot].clear();
		if value {
			self.element().set_attribute(self.attribute_name(), "")
		} else {
			self.element().remove_attribute(self.attribute_name())
		}
	}

	pub(crate) fn slot<T: 'static>(&self, init: impl FnOnce() -> T) -> Rc<T> {
		self.0.slots.get_or_insert_with(init)
	}

	#[must_use]
	pub fn ptr_eq(&self, other: &AttributePart) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}
}

impl Debug for AttributePart {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("AttributePart")
			.field("expression", &self.0.expression)
			.field("element", self.element())
			.field("attribute", &self.attribute_name())
			.finish()
	}
}

/// Either kind of part. Compares by identity.
#[derive(Debug, Clone)]
pub enum Part {
	Node(NodePart),
	Attribute(AttributePart),
}

impl PartialEq for Part {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Part::Node(a), Part::Node(b)) => a.ptr_eq(b),
			(Part::Attribute(a), Part::Attribute(b)) => a.ptr_eq(b),
			_ => false,
		}
	}
}
impl Eq for Part {}

impl Part {
	/// The trimmed expression between the placeholder's braces.
	#[must_use]
	pub fn expression(&self) -> &str {
		match self {
			Part::Node(part) => part.expression(),
			Part::Attribute(part) => part.expression(),
		}
	}

	#[must_use]
	pub fn value(&self) -> String {
		match self {
			Part::Node(part) => part.value(),
			Part::Attribute(part) => part.value(),
		}
	}

	pub fn set_value(&self, value: &str) {
		match self {
			Part::Node(part) => part.set_value(value),
			Part::Attribute(part) => part.set_value(value),
		}
	}

	/// Per-part state of type `T` that lives as long as the part, created with `init` on first access.
	///
	/// Directives use this to remember things across renders of the same part.
	pub fn state<T: 'static>(&self, init: impl FnOnce() -> T) -> Rc<T> {
		match self {
			Part::Node(part) => part.slot(init),
			Part::Attribute(part) => part.slot(init),
		}
	}

	#[must_use]
	pub fn as_node(&self) -> Option<&NodePart> {
		match self {
			Part::Node(part) => Some(part),
			Part::Attribute(_) => None,
		}
	}

	#[must_use]
	pub fn as_attribute(&self) -> Option<&AttributePart> {
		match self {
			Part::Attribute(part) => Some(part),
			Part::Node(_) => None,
		}
	}
}

impl From<NodePart> for Part {
	fn from(part: NodePart) -> Self {
		Part::Node(part)
	}
}

impl From<AttributePart> for Part {
	fn from(part: AttributePart) -> Self {
		Part::Attribute(part)
	}
}
