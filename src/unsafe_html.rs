use crate::{
	directive::{directive, PartCallback},
	parse::parse_fragment,
	part::Part,
	trusted_types,
};
use tracing::{error, warn};

/// A directive that renders `markup` as HTML, without escaping.
///
/// The markup passes through the trusted types policy first, if one is installed.
/// Only node parts accept it. In attributes it's ignored, and malformed markup is logged and leaves the part unchanged.
///
/// ```
/// use html_parts::{dom::Node, html, render, unsafe_html::unsafe_html};
///
/// let div = Node::element("div");
/// render(&html!("<div>{}</div>", unsafe_html("<b>bold</b>")), &div).unwrap();
/// assert_eq!(div.inner_html(), "<div><b>bold</b></div>");
/// ```
pub fn unsafe_html(markup: impl Into<String>) -> PartCallback {
	directive(unsafe_html_callback)(markup.into())
}

fn unsafe_html_callback(markup: String) -> impl Fn(&Part) + 'static {
	move |part: &Part| {
		let part = match part {
			Part::Node(part) => part,
			Part::Attribute(part) => {
				return warn!(attribute = part.attribute_name(), "Raw HTML can only be rendered into node positions.");
			}
		};
		match parse_fragment(&trusted_types::create_html(markup.clone())) {
			Ok(fragment) => part.replace(vec![fragment]),
			Err(error) => error!(%error, expression = part.expression(), "Failed to parse raw HTML."),
		}
	}
}
