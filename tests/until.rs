use html_parts::{
	html, render,
	task::{run_microtasks, Promise},
	until::until,
	Value,
};

use common_::surface;

#[test]
fn renders_a_promise_when_it_resolves() {
	common_::init();
	let (promise, resolver) = Promise::new();
	let surface = surface();

	render(&html!("<div>{}</div>", until(vec![promise.into()])), &surface).unwrap();
	assert_eq!(surface.inner_html(), "<div></div>");

	resolver.resolve("foo");
	assert_eq!(surface.inner_html(), "<div></div>");
	run_microtasks();
	assert_eq!(surface.inner_html(), "<div>foo</div>");
}

#[test]
fn renders_immediate_values_until_promises_have_resolved() {
	common_::init();
	let (promise, resolver) = Promise::new();
	let surface = surface();

	render(&html!("<div>{}</div>", until(vec![promise.into(), "loading...".into()])), &surface).unwrap();
	assert_eq!(surface.inner_html(), "<div>loading...</div>");

	resolver.resolve("foo");
	run_microtasks();
	assert_eq!(surface.inner_html(), "<div>foo</div>");
}

#[test]
fn renders_values_only_once() {
	common_::init();
	let (promise, resolver) = Promise::new();
	let surface = surface();
	let exec = || {
		render(
			&html!("<div>{}</div>", until(vec![promise.clone().into(), "loading...".into()])),
			&surface,
		)
		.unwrap()
	};

	exec();
	assert_eq!(surface.inner_html(), "<div>loading...</div>");
	resolver.resolve("foo");
	run_microtasks();

	exec();
	assert_eq!(surface.inner_html(), "<div>foo</div>");
	run_microtasks();
	exec();
	assert_eq!(surface.inner_html(), "<div>foo</div>");
}

#[test]
fn can_rerender_content_as_it_changes() {
	common_::init();
	let (promise, resolver) = Promise::new();
	let surface = surface();
	let exec = |placeholder: &str| {
		render(
			&html!("<div>{}</div>", until(vec![promise.clone().into(), placeholder.into()])),
			&surface,
		)
		.unwrap()
	};

	exec("loading...");
	assert_eq!(surface.inner_html(), "<div>loading...</div>");
	exec("still loading...");
	assert_eq!(surface.inner_html(), "<div>still loading...</div>");
	exec("taking forever...");
	assert_eq!(surface.inner_html(), "<div>taking forever...</div>");

	resolver.resolve("foo");
	run_microtasks();
	assert_eq!(surface.inner_html(), "<div>foo</div>");
}

#[test]
fn will_not_render_promises_behind_already_resolved_ones() {
	common_::init();
	let (foo, resolve_foo) = Promise::new();
	let (bar, resolve_bar) = Promise::new();
	let surface = surface();

	render(&html!("<div>{}</div>", until(vec![foo.into(), bar.into()])), &surface).unwrap();
	assert_eq!(surface.inner_html(), "<div></div>");

	resolve_foo.resolve("foo");
	run_microtasks();
	assert_eq!(surface.inner_html(), "<div>foo</div>");

	resolve_bar.resolve("bar");
	run_microtasks();
	assert_eq!(surface.inner_html(), "<div>foo</div>");
}

#[test]
fn earlier_promises_replace_later_ones() {
	common_::init();
	let (foo, resolve_foo) = Promise::new();
	let (bar, resolve_bar) = Promise::new();
	let surface = surface();

	render(&html!("<div>{}</div>", until(vec![foo.into(), bar.into(), "…".into()])), &surface).unwrap();
	assert_eq!(surface.inner_html(), "<div>…</div>");

	resolve_bar.resolve("bar");
	run_microtasks();
	assert_eq!(surface.inner_html(), "<div>bar</div>");

	resolve_foo.resolve("foo");
	run_microtasks();
	assert_eq!(surface.inner_html(), "<div>foo</div>");
}

#[test]
fn supports_boolean_attributes() {
	common_::init();
	let (promise, resolver) = Promise::new();
	let surface = surface();
	let exec = |hidden: bool| {
		render(
			&html!("<div hidden=\"{}\"></div>", until(vec![promise.clone().into(), hidden.into()])),
			&surface,
		)
		.unwrap()
	};

	exec(false);
	assert_eq!(surface.inner_html(), "<div></div>");
	exec(true);
	assert_eq!(surface.inner_html(), "<div hidden=\"\"></div>");
	exec(false);
	assert_eq!(surface.inner_html(), "<div></div>");

	assert!(resolver.resolve(true));
	run_microtasks();
	assert_eq!(surface.inner_html(), "<div hidden=\"\"></div>");

	assert!(!resolver.resolve(false));
	run_microtasks();
	assert_eq!(surface.inner_html(), "<div hidden=\"\"></div>");
}

#[test]
fn resolved_values_go_through_the_resolver() {
	common_::init();
	let (promise, resolver) = Promise::new();
	let surface = surface();

	render(&html!("<ul>{}</ul>", until(vec![promise.into(), Value::Null])), &surface).unwrap();
	resolver.resolve(vec![html!("<li>{}</li>", 1), html!("<li>{}</li>", 2)]);
	run_microtasks();
	assert_eq!(surface.inner_html(), "<ul><li>1</li><li>2</li></ul>");
}
