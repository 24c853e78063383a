use html_parts::{dom::Node, html, render, Value};

use common_::surface;

fn text_fragment(text: &str) -> Node {
	let fragment = Node::fragment();
	fragment.append_child(&Node::text(text));
	fragment
}

#[test]
fn supports_lists_of_strings_in_nodes() {
	common_::init();
	let main = |list: Vec<&str>| html!("<div>{}</div>", list);
	let surface = surface();

	render(&main(vec!["one", "two", "three"]), &surface).unwrap();
	assert_eq!(surface.inner_html(), "<div>onetwothree</div>");
	render(&main(vec!["four", "five", "six"]), &surface).unwrap();
	assert_eq!(surface.inner_html(), "<div>fourfivesix</div>");
}

#[test]
fn supports_lists_of_sub_templates_with_text_nodes() {
	common_::init();
	let main = |list: Value| html!("<div>{}</div>", list);
	let item = |text: &str| html!("{}", text);
	let surface = surface();

	render(&main(["one", "two", "three"].iter().map(|text| item(text)).collect()), &surface).unwrap();
	assert_eq!(surface.inner_html(), "<div>onetwothree</div>");
	render(&main(["four", "five", "six"].iter().map(|text| item(text)).collect()), &surface).unwrap();
	assert_eq!(surface.inner_html(), "<div>fourfivesix</div>");
}

#[test]
fn supports_lists_of_fragments_with_text_nodes() {
	common_::init();
	let main = |list: Value| html!("<div>{}</div>", list);
	let surface = surface();

	render(&main(["one", "two", "three"].iter().map(|text| text_fragment(text)).collect()), &surface).unwrap();
	assert_eq!(surface.inner_html(), "<div>onetwothree</div>");
	render(&main(["four", "five", "six"].iter().map(|text| text_fragment(text)).collect()), &surface).unwrap();
	assert_eq!(surface.inner_html(), "<div>fourfivesix</div>");
}

#[test]
fn supports_other_iterators_in_nodes() {
	common_::init();
	let main = |list: Value| html!("<div>{}</div>", list);
	let surface = surface();

	render(&main((1..=3).map(|i| i * 2).collect()), &surface).unwrap();
	assert_eq!(surface.inner_html(), "<div>246</div>");

	let names = ["four", "five", "six"];
	render(&main((0..names.len()).map(|i| names[i]).collect()), &surface).unwrap();
	assert_eq!(surface.inner_html(), "<div>fourfivesix</div>");
}

#[test]
fn supports_lists_of_strings_in_attributes() {
	common_::init();
	let main = |list: Value| html!("<div class=\"{}\"></div>", list);
	let surface = surface();

	render(&main(vec!["one", "two", "three"].into()), &surface).unwrap();
	assert_eq!(surface.inner_html(), "<div class=\"one two three\"></div>");
	render(&main(["four", "five", "six"].iter().copied().collect()), &surface).unwrap();
	assert_eq!(surface.inner_html(), "<div class=\"four five six\"></div>");
}

#[test]
fn supports_lists_of_fragments_with_elements() {
	common_::init();
	let main = |list: Vec<Node>| html!("<ul>{}</ul>", list);
	let surface = surface();

	let items = ["One", "Two"]
		.iter()
		.map(|text| {
			let fragment = Node::fragment();
			let li = Node::element("li");
			li.set_text_content(text);
			fragment.append_child(&li);
			fragment
		})
		.collect();
	render(&main(items), &surface).unwrap();
	assert_eq!(surface.inner_html(), "<ul><li>One</li><li>Two</li></ul>");
}

#[test]
fn supports_lists_of_templates() {
	common_::init();
	let child = |name: &str| html!("<li>{}</li>", name);
	let main = |names: &[&str]| html!("<ul>{}</ul>", names.iter().map(|name| child(name)).collect::<Value>());
	let surface = surface();

	render(&main(&["One", "Two", "Three"]), &surface).unwrap();
	assert_eq!(surface.inner_html(), "<ul><li>One</li><li>Two</li><li>Three</li></ul>");
	render(&main(&["Two", "Three", "Four"]), &surface).unwrap();
	assert_eq!(surface.inner_html(), "<ul><li>Two</li><li>Three</li><li>Four</li></ul>");
}

#[test]
fn empty_lists_keep_the_current_content() {
	common_::init();
	let main = |list: Vec<&str>| html!("<p>{}</p><p class=\"{}\"></p>", list.clone(), list);
	let surface = surface();

	render(&main(vec!["a", "b"]), &surface).unwrap();
	assert_eq!(surface.inner_html(), "<p>ab</p><p class=\"a b\"></p>");

	render(&main(vec![]), &surface).unwrap();
	assert_eq!(surface.inner_html(), "<p>ab</p><p class=\"\"></p>");
}

#[test]
fn mixes_item_kinds() {
	common_::init();
	let surface = surface();
	let list: Vec<Value> = vec![
		"a".into(),
		1_i32.into(),
		html!("<b>{}</b>", "c").into(),
		text_fragment("d").into(),
		vec!["e", "f"].into(),
	];

	render(&html!("<p>{}</p>", list), &surface).unwrap();
	assert_eq!(surface.inner_html(), "<p>a1<b>c</b>de,f</p>");
}

#[test]
fn long_lists_replace_in_place() {
	common_::init();
	let main = |list: Value| html!("<p>a</p>{}<p>b</p>", list);
	let surface = surface();

	render(&main((0..2000).collect()), &surface).unwrap();
	render(&main((2000..4000).collect()), &surface).unwrap();

	let html = surface.inner_html();
	assert!(html.starts_with("<p>a</p>20002001"));
	assert!(html.ends_with("39983999<p>b</p>"));
	assert!(!html.contains("1999"));
}
