//! A small single-threaded in-memory DOM.
//!
//! Only the surface that template instantiation and part updates need is modelled:
//! [***Element***](https://developer.mozilla.org/en-US/docs/Web/API/Element)s with ordered attributes,
//! [***Text***](https://developer.mozilla.org/en-US/docs/Web/API/Text) and [***Comment***](https://developer.mozilla.org/en-US/docs/Web/API/Comment) nodes,
//! [***DocumentFragment***](https://developer.mozilla.org/en-US/docs/Web/API/DocumentFragment)s and
//! [***EventTarget***](https://developer.mozilla.org/en-US/docs/Web/API/EventTarget) listener registration.
//!
//! Parents own their children. The parent link is weak, so dropping the last handle to a root drops its whole subtree.

use core::{
	any::{Any, TypeId},
	cell::{Cell, RefCell},
	fmt::{self, Debug, Formatter},
	hash::{Hash, Hasher},
	ops::Range,
};
use hashbrown::{HashMap, HashSet};
use std::rc::{Rc, Weak};
use tracing::{error, trace, trace_span};

/// Elements that never have content and are serialized without an end tag.
pub const VOID_ELEMENTS: &[&str] = &[
	"area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track", "wbr",
];

#[must_use]
pub fn is_void_element(tag: &str) -> bool {
	VOID_ELEMENTS.contains(&tag)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
	Element,
	Text,
	Comment,
	DocumentFragment,
}

enum NodeKind {
	Element { tag: String, attributes: RefCell<Vec<(String, String)>> },
	Text(RefCell<String>),
	Comment(RefCell<String>),
	DocumentFragment,
}

struct NodeData {
	kind: NodeKind,
	parent: RefCell<Weak<NodeData>>,
	children: RefCell<Vec<Node>>,
	listeners: RefCell<Vec<(String, Rc<dyn EventListener>)>>,
	slots: SideTable,
}

/// A handle to a DOM node.
///
/// Handles are cheap to clone and compare by identity, never by content.
#[derive(Clone)]
pub struct Node(Rc<NodeData>);

impl PartialEq for Node {
	fn eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}
}
impl Eq for Node {}
impl Hash for Node {
	fn hash<H: Hasher>(&self, state: &mut H) {
		Rc::as_ptr(&self.0).hash(state)
	}
}

/// A non-owning [`Node`] handle.
#[derive(Clone)]
pub struct WeakNode(Weak<NodeData>);

impl WeakNode {
	#[must_use]
	pub fn upgrade(&self) -> Option<Node> {
		self.0.upgrade().map(Node)
	}
}

impl Debug for WeakNode {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self.upgrade() {
			Some(node) => write!(f, "WeakNode({:?})", node),
			None => f.write_str("WeakNode(dropped)"),
		}
	}
}

impl Debug for Node {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match &self.0.kind {
			NodeKind::Element { tag, .. } => write!(f, "Element(<{}>)", tag),
			NodeKind::Text(data) => {
				if cfg!(feature = "dangerous-logging") {
					write!(f, "Text({:?})", data.borrow())
				} else {
					write!(f, "Text(len = {})", data.borrow().len())
				}
			}
			NodeKind::Comment(_) => f.write_str("Comment"),
			NodeKind::DocumentFragment => write!(f, "DocumentFragment(children = {})", self.0.children.borrow().len()),
		}
	}
}

impl Node {
	fn new(kind: NodeKind) -> Self {
		Self(Rc::new(NodeData {
			kind,
			parent: RefCell::new(Weak::new()),
			children: RefCell::new(Vec::new()),
			listeners: RefCell::new(Vec::new()),
			slots: SideTable::default(),
		}))
	}

	/// Creates a detached element. The tag name is ASCII-lowercased.
	#[must_use]
	pub fn element(tag: &str) -> Self {
		Self::new(NodeKind::Element {
			tag: tag.to_ascii_lowercase(),
			attributes: RefCell::default(),
		})
	}

	#[must_use]
	pub fn text(data: impl Into<String>) -> Self {
		Self::new(NodeKind::Text(RefCell::new(data.into())))
	}

	#[must_use]
	pub fn comment(data: impl Into<String>) -> Self {
		Self::new(NodeKind::Comment(RefCell::new(data.into())))
	}

	#[must_use]
	pub fn fragment() -> Self {
		Self::new(NodeKind::DocumentFragment)
	}

	#[must_use]
	pub fn downgrade(&self) -> WeakNode {
		WeakNode(Rc::downgrade(&self.0))
	}

	#[must_use]
	pub fn node_type(&self) -> NodeType {
		match self.0.kind {
			NodeKind::Element { .. } => NodeType::Element,
			NodeKind::Text(_) => NodeType::Text,
			NodeKind::Comment(_) => NodeType::Comment,
			NodeKind::DocumentFragment => NodeType::DocumentFragment,
		}
	}

	#[must_use]
	pub fn is_fragment(&self) -> bool {
		self.node_type() == NodeType::DocumentFragment
	}

	#[must_use]
	pub fn is_element(&self) -> bool {
		self.node_type() == NodeType::Element
	}

	/// The lowercase tag name, for elements.
	#[must_use]
	pub fn tag_name(&self) -> Option<&str> {
		match &self.0.kind {
			NodeKind::Element { tag, .. } => Some(tag),
			_ => None,
		}
	}

	#[must_use]
	pub fn parent_node(&self) -> Option<Node> {
		self.0.parent.borrow().upgrade().map(Node)
	}

	#[must_use]
	pub fn child_nodes(&self) -> Vec<Node> {
		self.0.children.borrow().clone()
	}

	#[must_use]
	pub fn has_child_nodes(&self) -> bool {
		!self.0.children.borrow().is_empty()
	}

	#[must_use]
	pub fn first_child(&self) -> Option<Node> {
		self.0.children.borrow().first().cloned()
	}

	#[must_use]
	pub fn next_sibling(&self) -> Option<Node> {
		let parent = self.parent_node()?;
		let siblings = parent.0.children.borrow();
		let index = siblings.iter().position(|sibling| sibling == self)?;
		siblings.get(index + 1).cloned()
	}

	/// Element children only.
	#[must_use]
	pub fn children(&self) -> Vec<Node> {
		self.0.children.borrow().iter().filter(|child| child.is_element()).cloned().collect()
	}

	fn is_inclusive_ancestor_of(&self, node: &Node) -> bool {
		let mut current = Some(node.clone());
		while let Some(node) = current {
			if &node == self {
				return true;
			}
			current = node.parent_node();
		}
		false
	}

	/// Appends `child`, moving it out of its current parent first.
	///
	/// Appending a [`NodeType::DocumentFragment`] moves its children instead, leaving it empty.
	pub fn append_child(&self, child: &Node) {
		self.insert_before(child, None)
	}

	/// Inserts `node` before `reference`, or at the end if `reference` is [`None`].
	///
	/// Invalid insertions (a node into its own subtree, or before a node that isn't a child) are logged and skipped.
	pub fn insert_before(&self, node: &Node, reference: Option<&Node>) {
		if node.is_fragment() {
			for child in node.child_nodes() {
				self.insert_before(&child, reference)
			}
			return;
		}

		if node.is_inclusive_ancestor_of(self) {
			return error!("Refusing to insert {:?} into its own subtree.", node);
		}
		if let Some(reference) = reference {
			if reference == node {
				return;
			}
		}

		node.remove();

		let mut children = self.0.children.borrow_mut();
		let index = match reference {
			None => children.len(),
			Some(reference) => match children.iter().position(|child| child == reference) {
				Some(index) => index,
				None => {
					error!("Reference node {:?} is not a child of {:?}. Appending instead.", reference, self);
					children.len()
				}
			},
		};
		children.insert(index, node.clone());
		*node.0.parent.borrow_mut() = Rc::downgrade(&self.0);
	}

	/// Detaches this node from its parent, if any.
	pub fn remove(&self) {
		let parent = match self.parent_node() {
			Some(parent) => parent,
			None => return,
		};
		parent.0.children.borrow_mut().retain(|child| child != self);
		*self.0.parent.borrow_mut() = Weak::new();
	}

	/// The index range strictly between the children `start` and `end`.
	///
	/// A missing `end` extends the range to the last child.
	fn range_between(children: &[Node], start: &Node, end: &Node) -> Option<Range<usize>> {
		let from = children.iter().position(|child| child == start)? + 1;
		let to = children[from..].iter().position(|child| child == end).map_or(children.len(), |i| from + i);
		Some(from..to)
	}

	/// The children strictly between `start` and `end`, in order.
	pub(crate) fn children_between(&self, start: &Node, end: &Node) -> Vec<Node> {
		let children = self.0.children.borrow();
		Self::range_between(&children, start, end).map_or_else(Vec::new, |range| children[range].to_vec())
	}

	/// Replaces the children strictly between `start` and `end` with `nodes` and returns the removed ones.
	///
	/// Fragments among `nodes` contribute their children, like with [`Node::insert_before`].
	/// The child list is scanned a fixed number of times regardless of how many nodes move.
	pub(crate) fn replace_between(&self, start: &Node, end: &Node, nodes: &[Node]) -> Vec<Node> {
		let old = {
			let mut children = self.0.children.borrow_mut();
			match Self::range_between(&children, start, end) {
				Some(range) => children.drain(range).collect::<Vec<_>>(),
				None => {
					error!("Start marker {:?} is not a child of {:?}.", start, self);
					return Vec::new();
				}
			}
		};
		for node in &old {
			*node.0.parent.borrow_mut() = Weak::new();
		}

		let mut incoming = Vec::with_capacity(nodes.len());
		let mut seen = HashSet::new();
		for node in nodes {
			if node.is_fragment() {
				incoming.append(&mut node.0.children.borrow_mut());
			} else if node.is_inclusive_ancestor_of(self) {
				error!("Refusing to insert {:?} into its own subtree.", node);
			} else if node != start && node != end && seen.insert(node.clone()) {
				node.remove();
				incoming.push(node.clone());
			}
		}

		let mut children = self.0.children.borrow_mut();
		let at = children.iter().position(|child| child == end).unwrap_or(children.len());
		for node in &incoming {
			*node.0.parent.borrow_mut() = Rc::downgrade(&self.0);
		}
		children.splice(at..at, incoming);
		old
	}

	/// Removes all current children, then appends `nodes` in order.
	pub fn replace_children(&self, nodes: &[Node]) {
		for child in self.child_nodes() {
			child.remove()
		}
		for node in nodes {
			self.append_child(node)
		}
	}

	/// Equivalent to [***cloneNode(true)***](https://developer.mozilla.org/en-US/docs/Web/API/Node/cloneNode).
	///
	/// Event listeners and side-table slots are not copied.
	#[must_use]
	pub fn deep_clone(&self) -> Node {
		let clone = Self::new(match &self.0.kind {
			NodeKind::Element { tag, attributes } => NodeKind::Element {
				tag: tag.clone(),
				attributes: RefCell::new(attributes.borrow().clone()),
			},
			NodeKind::Text(data) => NodeKind::Text(RefCell::new(data.borrow().clone())),
			NodeKind::Comment(data) => NodeKind::Comment(RefCell::new(data.borrow().clone())),
			NodeKind::DocumentFragment => NodeKind::DocumentFragment,
		});
		for child in self.0.children.borrow().iter() {
			clone.append_child(&child.deep_clone())
		}
		clone
	}

	/// [***Node.textContent***](https://developer.mozilla.org/en-US/docs/Web/API/Node/textContent): character data for text and comments,
	/// the concatenated descendant text otherwise.
	#[must_use]
	pub fn text_content(&self) -> String {
		match &self.0.kind {
			NodeKind::Text(data) | NodeKind::Comment(data) => data.borrow().clone(),
			NodeKind::Element { .. } | NodeKind::DocumentFragment => {
				let mut text = String::new();
				self.collect_text(&mut text);
				text
			}
		}
	}

	fn collect_text(&self, text: &mut String) {
		for child in self.0.children.borrow().iter() {
			match &child.0.kind {
				NodeKind::Text(data) => text.push_str(&data.borrow()),
				NodeKind::Comment(_) => (),
				NodeKind::Element { .. } | NodeKind::DocumentFragment => child.collect_text(text),
			}
		}
	}

	pub fn set_text_content(&self, text: &str) {
		match &self.0.kind {
			NodeKind::Text(data) | NodeKind::Comment(data) => *data.borrow_mut() = text.to_owned(),
			NodeKind::Element { .. } | NodeKind::DocumentFragment => {
				if text.is_empty() {
					self.replace_children(&[])
				} else {
					self.replace_children(&[Node::text(text)])
				}
			}
		}
	}

	/// Splits a text node at byte `offset`, inserting the remainder as a new next sibling and returning it.
	///
	/// Returns [`None`] for other node types or if `offset` isn't a character boundary.
	pub fn split_text(&self, offset: usize) -> Option<Node> {
		let data = match &self.0.kind {
			NodeKind::Text(data) => data,
			_ => return None,
		};
		let tail = {
			let mut data = data.borrow_mut();
			if !data.is_char_boundary(offset) {
				return None;
			}
			data.split_off(offset)
		};
		let tail = Node::text(tail);
		if let Some(parent) = self.parent_node() {
			parent.insert_before(&tail, self.next_sibling().as_ref())
		}
		Some(tail)
	}

	#[must_use]
	pub fn get_attribute(&self, name: &str) -> Option<String> {
		match &self.0.kind {
			NodeKind::Element { attributes, .. } => {
				attributes.borrow().iter().find(|(n, _)| n == name).map(|(_, value)| value.clone())
			}
			_ => None,
		}
	}

	#[must_use]
	pub fn has_attribute(&self, name: &str) -> bool {
		match &self.0.kind {
			NodeKind::Element { attributes, .. } => attributes.borrow().iter().any(|(n, _)| n == name),
			_ => false,
		}
	}

	/// Name-value pairs in insertion order.
	#[must_use]
	pub fn attributes(&self) -> Vec<(String, String)> {
		match &self.0.kind {
			NodeKind::Element { attributes, .. } => attributes.borrow().clone(),
			_ => Vec::new(),
		}
	}

	/// Sets an attribute, keeping its position if it already exists. No-op on non-elements.
	pub fn set_attribute(&self, name: &str, value: &str) {
		if let NodeKind::Element { attributes, .. } = &self.0.kind {
			let mut attributes = attributes.borrow_mut();
			match attributes.iter_mut().find(|(n, _)| n == name) {
				Some((_, existing)) => value.clone_into(existing),
				None => attributes.push((name.to_owned(), value.to_owned())),
			}
		}
	}

	pub fn remove_attribute(&self, name: &str) {
		if let NodeKind::Element { attributes, .. } = &self.0.kind {
			attributes.borrow_mut().retain(|(n, _)| n != name)
		}
	}

	/// The first descendant element with the given tag name, in document order.
	#[must_use]
	pub fn query_selector(&self, tag: &str) -> Option<Node> {
		for child in self.0.children.borrow().iter() {
			if child.tag_name().map_or(false, |t| t.eq_ignore_ascii_case(tag)) {
				return Some(child.clone());
			}
			if let Some(found) = child.query_selector(tag) {
				return Some(found);
			}
		}
		None
	}

	/// Serialized children, like [***Element.innerHTML***](https://developer.mozilla.org/en-US/docs/Web/API/Element/innerHTML).
	#[must_use]
	pub fn inner_html(&self) -> String {
		let mut html = String::new();
		for child in self.0.children.borrow().iter() {
			child.write_html(&mut html)
		}
		html
	}

	#[must_use]
	pub fn outer_html(&self) -> String {
		let mut html = String::new();
		self.write_html(&mut html);
		html
	}

	fn write_html(&self, html: &mut String) {
		match &self.0.kind {
			NodeKind::Element { tag, attributes } => {
				html.push('<');
				html.push_str(tag);
				for (name, value) in attributes.borrow().iter() {
					html.push(' ');
					html.push_str(name);
					html.push_str("=\"");
					escape_into(html, value, true);
					html.push('"');
				}
				html.push('>');
				if is_void_element(tag) {
					return;
				}
				for child in self.0.children.borrow().iter() {
					child.write_html(html)
				}
				html.push_str("</");
				html.push_str(tag);
				html.push('>');
			}
			NodeKind::Text(data) => escape_into(html, &data.borrow(), false),
			NodeKind::Comment(data) => {
				html.push_str("<!--");
				html.push_str(&data.borrow());
				html.push_str("-->");
			}
			NodeKind::DocumentFragment => {
				for child in self.0.children.borrow().iter() {
					child.write_html(html)
				}
			}
		}
	}

	/// Registers `listener` for `event_type`.
	///
	/// Like the DOM, registering the same listener (by identity) for the same type twice has no effect.
	pub fn add_event_listener(&self, event_type: &str, listener: Rc<dyn EventListener>) {
		let mut listeners = self.0.listeners.borrow_mut();
		if listeners.iter().any(|(t, l)| t == event_type && same_listener(l, &listener)) {
			return;
		}
		trace!(event_type, node = ?self, "Adding event listener.");
		listeners.push((event_type.to_owned(), listener))
	}

	pub fn remove_event_listener(&self, event_type: &str, listener: &Rc<dyn EventListener>) {
		trace!(event_type, node = ?self, "Removing event listener.");
		self.0.listeners.borrow_mut().retain(|(t, l)| !(t == event_type && same_listener(l, listener)))
	}

	/// How many listeners are currently registered for `event_type` on this node.
	#[must_use]
	pub fn event_listener_count(&self, event_type: &str) -> usize {
		self.0.listeners.borrow().iter().filter(|(t, _)| t == event_type).count()
	}

	/// Dispatches `event` at this node, then along its ancestors if the event bubbles.
	///
	/// The listener list of each node is snapshotted before invocation, so listeners are free to (re)render.
	pub fn dispatch_event(&self, event: &Event) {
		let span = trace_span!("dispatch_event", event_type = event.event_type(), target = ?self);
		let _enter = span.enter();

		*event.target.borrow_mut() = Some(self.clone());
		let mut current = Some(self.clone());
		while let Some(node) = current {
			*event.current_target.borrow_mut() = Some(node.clone());
			let listeners: Vec<_> = node
				.0
				.listeners
				.borrow()
				.iter()
				.filter(|(t, _)| t == event.event_type())
				.map(|(_, l)| Rc::clone(l))
				.collect();
			for listener in listeners {
				listener.handle_event(event)
			}
			if !event.bubbles() || event.propagation_stopped.get() {
				break;
			}
			current = node.parent_node();
		}
		*event.current_target.borrow_mut() = None;
	}

	/// Dispatches a bubbling `click` event.
	pub fn click(&self) {
		self.dispatch_event(&Event::new("click").bubbling())
	}

	/// This node's side-table slot of type `T`, created with `init` on first access.
	pub(crate) fn slot<T: 'static>(&self, init: impl FnOnce() -> T) -> Rc<T> {
		self.0.slots.get_or_insert_with(init)
	}

	pub(crate) fn existing_slot<T: 'static>(&self) -> Option<Rc<T>> {
		self.0.slots.get()
	}
}

fn same_listener(a: &Rc<dyn EventListener>, b: &Rc<dyn EventListener>) -> bool {
	Rc::as_ptr(a).cast::<()>() == Rc::as_ptr(b).cast::<()>()
}

fn escape_into(html: &mut String, text: &str, attribute: bool) {
	for c in text.chars() {
		match c {
			'&' => html.push_str("&amp;"),
			'"' if attribute => html.push_str("&quot;"),
			'<' if !attribute => html.push_str("&lt;"),
			'>' if !attribute => html.push_str("&gt;"),
			'\u{a0}' => html.push_str("&nbsp;"),
			c => html.push(c),
		}
	}
}

/// Something that can receive dispatched [`Event`]s, like a
/// [***handleEvent***](https://developer.mozilla.org/en-US/docs/Web/API/EventTarget/addEventListener#the_event_listener_callback) object.
pub trait EventListener {
	fn handle_event(&self, event: &Event);
}

impl<F: Fn(&Event)> EventListener for F {
	fn handle_event(&self, event: &Event) {
		self(event)
	}
}

/// A dispatched event. Non-bubbling unless created with [`Event::bubbling`].
#[derive(Debug)]
pub struct Event {
	event_type: String,
	bubbles: bool,
	target: RefCell<Option<Node>>,
	current_target: RefCell<Option<Node>>,
	propagation_stopped: Cell<bool>,
}

impl Event {
	#[must_use]
	pub fn new(event_type: impl Into<String>) -> Self {
		Self {
			event_type: event_type.into(),
			bubbles: false,
			target: RefCell::new(None),
			current_target: RefCell::new(None),
			propagation_stopped: Cell::new(false),
		}
	}

	#[must_use]
	pub fn bubbling(mut self) -> Self {
		self.bubbles = true;
		self
	}

	#[must_use]
	pub fn event_type(&self) -> &str {
		&self.event_type
	}

	#[must_use]
	pub fn bubbles(&self) -> bool {
		self.bubbles
	}

	/// The node the event was dispatched at.
	#[must_use]
	pub fn target(&self) -> Option<Node> {
		self.target.borrow().clone()
	}

	/// The node whose listeners are currently being invoked.
	#[must_use]
	pub fn current_target(&self) -> Option<Node> {
		self.current_target.borrow().clone()
	}

	pub fn stop_propagation(&self) {
		self.propagation_stopped.set(true)
	}
}

/// Type-keyed storage attached to an owner (a node or a part), dropped together with it.
#[derive(Default)]
pub(crate) struct SideTable(RefCell<HashMap<TypeId, Rc<dyn Any>>>);

impl SideTable {
	pub(crate) fn get<T: 'static>(&self) -> Option<Rc<T>> {
		let existing = self.0.borrow().get(&TypeId::of::<T>()).cloned()?;
		existing.downcast::<T>().ok()
	}

	pub(crate) fn get_or_insert_with<T: 'static>(&self, init: impl FnOnce() -> T) -> Rc<T> {
		if let Some(existing) = self.get() {
			return existing;
		}
		let fresh = Rc::new(init());
		self.0.borrow_mut().insert(TypeId::of::<T>(), Rc::clone(&fresh) as Rc<dyn Any>);
		fresh
	}
}
