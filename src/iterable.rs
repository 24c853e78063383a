use crate::{dom::Node, error::TemplateError, part::Part, value::Value};
use tracing::trace;

/// Renders a [`Value::List`].
///
/// Into a node part, each item contributes nodes in order: templates are rendered, fragments give up their children
/// and anything else becomes one text node. A list that contributes no nodes leaves the part unchanged.
///
/// Into an attribute part, the items' string forms are joined with single spaces.
///
/// Returns whether `part` was handled.
///
/// # Errors
///
/// Iff a nested template fails to parse or render.
pub fn process_iterable(part: &Part, value: &Value) -> Result<bool, TemplateError> {
	let items = match value {
		Value::List(items) => items,
		_ => return Ok(false),
	};

	match part {
		Part::Node(part) => {
			let mut nodes = Vec::new();
			for item in items.iter() {
				match item {
					Value::Template(result) => {
						let scratch = Node::fragment();
						result.render_into(&scratch)?;
						nodes.extend(scratch.child_nodes())
					}
					Value::Fragment(fragment) => nodes.extend(fragment.child_nodes()),
					item => nodes.push(Node::text(item.to_string())),
				}
			}
			trace!(expression = part.expression(), items = items.len(), nodes = nodes.len(), "Rendering iterable.");
			if !nodes.is_empty() {
				part.replace(nodes)
			}
		}
		Part::Attribute(part) => {
			let joined = items.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ");
			part.set_value(&joined)
		}
	}
	Ok(true)
}
