//! The part resolver: picks the first applicable strategy for each part and value.

use crate::{
	boolean::process_boolean_attribute,
	directive::process_directive,
	error::TemplateError,
	event::process_event,
	instance::{create_processor, Processor},
	iterable::process_iterable,
	nested::{process_document_fragment, process_sub_template},
	part::Part,
	value::Value,
};
use std::rc::Rc;
use tracing::trace_span;

/// Applies `value` to `part`.
///
/// Strategies are tried in a fixed order and the first that applies wins:
/// directives, boolean attributes, event bindings, sub-templates, document fragments, iterables.
/// If none applies, the value is assigned as is ([`process_property_identity`]).
///
/// # Errors
///
/// Iff a nested template fails to parse or render.
pub fn process_part(part: &Part, value: &Value) -> Result<(), TemplateError> {
	let span = trace_span!("process_part", expression = part.expression());
	let _enter = span.enter();

	if process_directive(part, value)
		|| process_boolean_attribute(part, value)
		|| process_event(part, value)
		|| process_sub_template(part, value)?
		|| process_document_fragment(part, value)
		|| process_iterable(part, value)?
	{
		return Ok(());
	}
	process_property_identity(part, value);
	Ok(())
}

/// Assigns `value` directly.
///
/// A [`Value::Node`] replaces a node part's content. Everything else is stringified, with [`Value::Null`] as empty text.
pub fn process_property_identity(part: &Part, value: &Value) {
	match (part, value) {
		(Part::Node(part), Value::Node(node)) => part.replace(vec![node.clone()]),
		(part, value) => part.set_value(&value.to_string()),
	}
}

thread_local! {
	static DEFAULT_PROCESSOR: Rc<dyn Processor> = create_processor(process_part);
}

/// The shared processor running [`process_part`] on every part.
#[must_use]
pub fn default_processor() -> Rc<dyn Processor> {
	DEFAULT_PROCESSOR.with(Rc::clone)
}
