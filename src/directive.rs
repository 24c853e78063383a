//! Directive registration.
//!
//! A directive is a [`PartCallback`] that takes over rendering for the part it's bound to.
//! Callbacks only count as directives if they were created through a factory wrapped with [`directive`],
//! other callbacks are ordinary values and are stringified like any other.
//!
//! The registry holds callback ids only, so it never keeps a callback alive.

use crate::{part::Part, value::Value};
use core::{
	cell::{Cell, RefCell},
	fmt::{self, Debug, Formatter},
};
use hashbrown::HashSet;
use std::rc::Rc;
use tracing::trace;

thread_local! {
	static NEXT_ID: Cell<u64> = Cell::new(0);
	static DIRECTIVES: RefCell<HashSet<u64>> = RefCell::default();
}

struct Callback {
	id: u64,
	callback: Box<dyn Fn(&Part)>,
}

impl Drop for Callback {
	fn drop(&mut self) {
		// The registry may already be gone during thread teardown.
		let _ = DIRECTIVES.try_with(|directives| directives.borrow_mut().remove(&self.id));
	}
}

/// A callback that receives a [`Part`].
#[derive(Clone)]
pub struct PartCallback(Rc<Callback>);

impl PartCallback {
	/// Creates an untagged callback. See [`directive`] for one the resolver will run.
	pub fn new(callback: impl Fn(&Part) + 'static) -> Self {
		let id = NEXT_ID.with(|next_id| {
			let id = next_id.get();
			next_id.set(id + 1);
			id
		});
		Self(Rc::new(Callback {
			id,
			callback: Box::new(callback),
		}))
	}

	pub fn call(&self, part: &Part) {
		(self.0.callback)(part)
	}

	#[must_use]
	pub fn ptr_eq(&self, other: &PartCallback) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}

	#[must_use]
	pub fn is_directive(&self) -> bool {
		DIRECTIVES.with(|directives| directives.borrow().contains(&self.0.id))
	}

	fn tag(self) -> Self {
		DIRECTIVES.with(|directives| directives.borrow_mut().insert(self.0.id));
		self
	}
}

impl Debug for PartCallback {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("PartCallback")
			.field("id", &self.0.id)
			.field("directive", &self.is_directive())
			.finish()
	}
}

/// Wraps a directive factory so that each callback it creates is tagged as a directive.
///
/// The factory's own behaviour is unchanged. Multiple arguments can be passed as a tuple.
///
/// ```
/// use html_parts::{directive::directive, html, render, dom::Node};
///
/// let shout = directive(|text: &'static str| move |part: &html_parts::part::Part| part.set_value(&text.to_uppercase()));
///
/// let div = Node::element("div");
/// render(&html!("<p>{}</p>", shout("hello")), &div).unwrap();
/// assert_eq!(div.inner_html(), "<p>HELLO</p>");
/// ```
pub fn directive<A, C>(factory: impl Fn(A) -> C) -> impl Fn(A) -> PartCallback
where
	C: Fn(&Part) + 'static,
{
	move |arguments| PartCallback::new(factory(arguments)).tag()
}

/// Whether `value` is a tagged directive callback.
#[must_use]
pub fn is_directive(value: &Value) -> bool {
	matches!(value, Value::Callback(callback) if callback.is_directive())
}

/// Runs `value` against `part` if it's a directive.
///
/// Returns whether it did.
pub fn process_directive(part: &Part, value: &Value) -> bool {
	match value {
		Value::Callback(callback) if callback.is_directive() => {
			trace!(expression = part.expression(), ?callback, "Running directive.");
			callback.call(part);
			true
		}
		_ => false,
	}
}
