//! `on*` attribute parts as event listener bindings.
//!
//! Each element gets at most one [`EventBinding`] per event type. The binding is registered with the element once,
//! and later values only swap its delegate, so rebinding never touches the element's listener list.

use crate::{
	dom::{Event, EventListener, Node, WeakNode},
	part::{AttributePart, Part},
	value::{Function, Value},
};
use core::{
	cell::RefCell,
	fmt::{self, Debug, Formatter},
};
use hashbrown::HashMap;
use std::rc::Rc;
use tracing::{debug, trace};

#[derive(Clone)]
enum Delegate {
	Function(Function),
	Handler(Rc<dyn EventListener>),
}

/// The listener registered on an element for one event type.
pub struct EventBinding {
	element: WeakNode,
	event_type: String,
	delegate: RefCell<Option<Delegate>>,
}

/// Per-element bindings, by event type.
#[derive(Default)]
struct ElementBindings(RefCell<HashMap<String, Rc<EventBinding>>>);

impl EventBinding {
	/// The binding for `part`'s element and event type, registering a new one if needed.
	fn for_part(part: &AttributePart) -> Rc<Self> {
		let element = part.element();
		let event_type = event_type(part.attribute_name());
		let bindings = element.slot(ElementBindings::default);

		let existing = bindings.0.borrow().get(&event_type).cloned();
		if let Some(existing) = existing {
			return existing;
		}

		debug!(%event_type, ?element, "Binding event.");
		let binding = Rc::new(Self {
			element: element.downgrade(),
			event_type: event_type.clone(),
			delegate: RefCell::new(None),
		});
		element.add_event_listener(&event_type, Rc::clone(&binding) as Rc<dyn EventListener>);
		bindings.0.borrow_mut().insert(event_type, Rc::clone(&binding));
		binding
	}

	#[must_use]
	pub fn event_type(&self) -> &str {
		&self.event_type
	}

	/// Swaps the delegate, or unbinds entirely if `value` is neither a function nor a handler object.
	fn set(self: &Rc<Self>, value: &Value) {
		let delegate = match value {
			Value::Function(function) => Delegate::Function(function.clone()),
			Value::Handler(handler) => Delegate::Handler(Rc::clone(handler)),
			_ => return self.unbind(),
		};
		*self.delegate.borrow_mut() = Some(delegate);
	}

	fn unbind(self: &Rc<Self>) {
		self.delegate.borrow_mut().take();
		let element = match self.element.upgrade() {
			Some(element) => element,
			None => return,
		};
		debug!(event_type = %self.event_type, ?element, "Unbinding event.");
		let listener: Rc<dyn EventListener> = Rc::clone(self) as Rc<dyn EventListener>;
		element.remove_event_listener(&self.event_type, &listener);
		if let Some(bindings) = element.existing_slot::<ElementBindings>() {
			bindings.0.borrow_mut().remove(&self.event_type);
		}
	}
}

impl EventListener for EventBinding {
	fn handle_event(&self, event: &Event) {
		// Cloned out so the delegate may rebind this very event while running.
		let delegate = self.delegate.borrow().clone();
		match delegate {
			Some(Delegate::Function(function)) => function.call(event),
			Some(Delegate::Handler(handler)) => handler.handle_event(event),
			None => trace!(event_type = %self.event_type, "No delegate bound."),
		}
	}
}

impl Debug for EventBinding {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("EventBinding")
			.field("element", &self.element)
			.field("event_type", &self.event_type)
			.field("bound", &self.delegate.borrow().is_some())
			.finish()
	}
}

/// `onclick` → `click`.
fn event_type(attribute_name: &str) -> String {
	attribute_name.get(2..).unwrap_or_default().to_ascii_lowercase()
}

/// The event binding currently registered on `element` for `event_type`, if any.
#[must_use]
pub fn event_binding(element: &Node, event_type: &str) -> Option<Rc<EventBinding>> {
	element.existing_slot::<ElementBindings>()?.0.borrow().get(event_type).cloned()
}

/// Binds `value` as listener if `part` is an attribute part whose name starts with `on`.
///
/// The attribute itself is removed. Returns whether `part` was handled.
pub fn process_event(part: &Part, value: &Value) -> bool {
	let part = match part {
		Part::Attribute(part) if part.attribute_name().starts_with("on") => part,
		_ => return false,
	};
	match value {
		Value::Function(_) | Value::Handler(_) => EventBinding::for_part(part).set(value),
		_ => {
			if let Some(binding) = event_binding(part.element(), &event_type(part.attribute_name())) {
				binding.unbind()
			}
		}
	}
	part.element().remove_attribute(part.attribute_name());
	true
}
