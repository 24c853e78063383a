use html_parts::{html, render, trusted_types::set_trusted_types_policy, unsafe_html::unsafe_html};
use std::{cell::Cell, rc::Rc};

use common_::{surface, PolicyGuard};

#[test]
fn renders_basic_text() {
	common_::init();
	let surface = surface();
	render(&html!("<div>{}</div>", unsafe_html("Hello World")), &surface).unwrap();
	assert_eq!(surface.inner_html(), "<div>Hello World</div>");
}

#[test]
fn is_ignored_inside_attributes() {
	common_::init();
	let surface = surface();
	render(&html!("<div style=\"{}\"></div>", unsafe_html("Hello World")), &surface).unwrap();
	assert_eq!(surface.inner_html(), "<div style=\"\"></div>");
}

#[test]
fn renders_the_given_value_as_html() {
	common_::init();
	let surface = surface();
	render(&html!("<div>{}</div>", unsafe_html("<span>Hello World</span>")), &surface).unwrap();
	assert_eq!(surface.inner_html(), "<div><span>Hello World</span></div>");
}

#[test]
fn renders_multiple_children() {
	common_::init();
	let surface = surface();
	render(&html!("<div>{}</div>", unsafe_html("<span>Hello</span><span>World</span>")), &surface).unwrap();
	assert_eq!(surface.inner_html(), "<div><span>Hello</span><span>World</span></div>");
}

#[test]
fn updates_correctly() {
	common_::init();
	let main = |name: &str| html!("<div>{}</div>", unsafe_html(format!("<span>Hello</span><span>{}</span>", name)));
	let surface = surface();

	render(&main("World"), &surface).unwrap();
	assert_eq!(surface.inner_html(), "<div><span>Hello</span><span>World</span></div>");
	let div = surface.query_selector("div");

	render(&main("Universe"), &surface).unwrap();
	render(&main("<a href=\"\">Universe</a>"), &surface).unwrap();
	assert_eq!(
		surface.inner_html(),
		"<div><span>Hello</span><span><a href=\"\">Universe</a></span></div>"
	);
	assert_eq!(surface.query_selector("div"), div);
}

#[test]
fn respects_trusted_types() {
	common_::init();
	let _guard = PolicyGuard;
	let called = Rc::new(Cell::new(false));
	let rewritten = "<div id=\"bar\">This has been rewritten by Trusted Types.</div>";
	set_trusted_types_policy(Some(Rc::new({
		let called = Rc::clone(&called);
		move |_: &str| {
			called.set(true);
			rewritten.to_owned()
		}
	})));

	let surface = surface();
	render(&html!("<div>{}</div>", unsafe_html("<span>Hello</span><span>World</span>")), &surface).unwrap();
	assert_eq!(surface.inner_html(), rewritten);
	assert!(called.get());
}

#[test]
fn the_policy_applies_on_every_render() {
	common_::init();
	let main = |markup: &str| html!("<p>{}</p>", unsafe_html(markup));
	let surface = surface();
	render(&main("<i>a</i>"), &surface).unwrap();

	let _guard = PolicyGuard;
	set_trusted_types_policy(Some(Rc::new(|html: &str| html.replace("i>", "b>"))));
	render(&main("<i>b</i>"), &surface).unwrap();
	assert_eq!(surface.inner_html(), "<p><b>b</b></p>");
}

#[test]
fn malformed_markup_leaves_the_part_unchanged() {
	common_::init();
	let main = |markup: &str| html!("<div>{}</div>", unsafe_html(markup));
	let surface = surface();

	render(&main("<em>ok</em>"), &surface).unwrap();
	render(&main("<em>broken</span>"), &surface).unwrap();
	assert_eq!(surface.inner_html(), "<div><em>ok</em></div>");
}
