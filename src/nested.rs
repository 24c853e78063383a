//! Nested content for node parts: sub-templates and document fragments.

use crate::{error::TemplateError, part::Part, value::Value};
use tracing::trace;

/// Renders a [`Value::Template`] into a node part, reusing the part's previous instance where possible.
///
/// Returns whether `part` was handled.
///
/// # Errors
///
/// Iff the nested template fails to parse or render.
pub fn process_sub_template(part: &Part, value: &Value) -> Result<bool, TemplateError> {
	match (part, value) {
		(Part::Node(part), Value::Template(result)) => {
			result.render_into(part)?;
			Ok(true)
		}
		_ => Ok(false),
	}
}

/// Moves a non-empty [`Value::Fragment`]'s children into a node part.
///
/// An empty fragment is claimed but leaves the part unchanged, which is also what happens when a fragment is
/// rendered a second time after its children were moved out.
pub fn process_document_fragment(part: &Part, value: &Value) -> bool {
	match (part, value) {
		(Part::Node(part), Value::Fragment(fragment)) => {
			if fragment.has_child_nodes() {
				part.replace(fragment.child_nodes())
			} else {
				trace!(expression = part.expression(), "Skipping empty fragment.");
			}
			true
		}
		_ => false,
	}
}
