//! Renders the highest-priority value of several, as each becomes available.

use crate::{
	directive::{directive, PartCallback},
	part::Part,
	processor::process_part,
	value::Value,
};
use core::cell::Cell;
use std::rc::Rc;
use tracing::{error, trace};

/// Per part: the index of the best value accepted so far. Lower is better.
struct UntilState {
	accepted: Cell<usize>,
}

/// A directive that renders the first of `values` it can, replacing it with earlier ones as they resolve.
///
/// Values are listed in priority order, highest first. Pending values are waited for,
/// anything else is available immediately. A value is only rendered if nothing before it in the list was rendered yet,
/// so a late resolution never replaces a higher-priority value already showing.
///
/// The priority watermark is kept per part, across renders. On a part's first render it starts after the last value.
///
/// ```
/// use html_parts::{dom::Node, html, render, task::{run_microtasks, Promise}, until::until};
///
/// let (content, resolver) = Promise::new();
/// let div = Node::element("div");
/// render(&html!("<p>{}</p>", until(vec![content.into(), "Loading…".into()])), &div).unwrap();
/// assert_eq!(div.inner_html(), "<p>Loading…</p>");
///
/// resolver.resolve("Done");
/// run_microtasks();
/// assert_eq!(div.inner_html(), "<p>Done</p>");
/// ```
pub fn until(values: impl IntoIterator<Item = Value>) -> PartCallback {
	directive(until_callback)(values.into_iter().collect())
}

fn until_callback(values: Vec<Value>) -> impl Fn(&Part) + 'static {
	move |part: &Part| {
		let state = part.state(|| UntilState {
			accepted: Cell::new(values.len()),
		});

		for (index, value) in values.iter().enumerate() {
			match value {
				Value::Pending(promise) => {
					let part = part.clone();
					let state = Rc::clone(&state);
					promise.then(move |value| {
						if index < state.accepted.get() {
							state.accepted.set(index);
							accept(&part, index, &value)
						}
					})
				}
				value if index <= state.accepted.get() => {
					state.accepted.set(index);
					accept(part, index, value)
				}
				_ => (),
			}
		}
	}
}

fn accept(part: &Part, index: usize, value: &Value) {
	trace!(expression = part.expression(), index, "Rendering value.");
	if let Err(error) = process_part(part, value) {
		error!(%error, expression = part.expression(), "Failed to render value.")
	}
}
