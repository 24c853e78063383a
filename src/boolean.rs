//! Boolean attributes: present when `true`, absent when `false`.

use crate::{part::Part, value::Value};
use tracing::trace;

/// Boolean attributes valid on every element.
const GLOBAL: &[&str] = &["autofocus", "draggable", "hidden", "inert", "spellcheck", "translate"];

/// Boolean attributes and the elements they're boolean on.
const BY_ELEMENT: &[(&str, &[&str])] = &[
	("async", &["script"]),
	("autoplay", &["audio", "video"]),
	("checked", &["input"]),
	("controls", &["audio", "video"]),
	("default", &["track"]),
	("defer", &["script"]),
	(
		"disabled",
		&["button", "fieldset", "input", "link", "optgroup", "option", "select", "textarea"],
	),
	("loop", &["audio", "video"]),
	("multiple", &["input", "select"]),
	("muted", &["audio", "video"]),
	("open", &["details", "dialog"]),
	("required", &["input", "select", "textarea"]),
	("reversed", &["ol"]),
	("selected", &["option"]),
];

/// Whether `attribute` is a boolean property of `tag` elements. Both names are matched ASCII-case-insensitively.
#[must_use]
pub fn is_boolean_attribute(tag: &str, attribute: &str) -> bool {
	let attribute = attribute.to_ascii_lowercase();
	let tag = tag.to_ascii_lowercase();
	GLOBAL.contains(&attribute.as_str())
		|| BY_ELEMENT
			.iter()
			.any(|(name, tags)| *name == attribute && tags.contains(&tag.as_str()))
}

/// Toggles the attribute if `part` is a fully templatized boolean attribute and `value` is a [`Value::Bool`].
///
/// Returns whether `part` was handled.
pub fn process_boolean_attribute(part: &Part, value: &Value) -> bool {
	let (part, value) = match (part, value) {
		(Part::Attribute(part), Value::Bool(value)) => (part, *value),
		_ => return false,
	};
	let tag = part.element().tag_name().unwrap_or_default();
	if !is_boolean_attribute(tag, part.attribute_name()) || !part.is_fully_templatized() {
		return false;
	}
	trace!(attribute = part.attribute_name(), value, "Toggling boolean attribute.");
	part.set_boolean_value(value);
	true
}
