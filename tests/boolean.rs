use html_parts::{boolean::is_boolean_attribute, html, render};

use common_::surface;

#[test]
fn toggles_boolean_attributes() {
	common_::init();
	let main = |checked: bool| html!("<input type=\"checkbox\" checked=\"{}\">", checked);
	let surface = surface();

	render(&main(true), &surface).unwrap();
	assert_eq!(surface.inner_html(), "<input type=\"checkbox\" checked=\"\">");
	render(&main(false), &surface).unwrap();
	assert_eq!(surface.inner_html(), "<input type=\"checkbox\">");
	render(&main(true), &surface).unwrap();
	assert_eq!(surface.inner_html(), "<input type=\"checkbox\" checked=\"\">");
}

#[test]
fn global_boolean_attributes_work_on_any_element() {
	common_::init();
	let surface = surface();
	render(&html!("<div hidden=\"{}\"></div><p hidden=\"{}\"></p>", true, false), &surface).unwrap();
	assert_eq!(surface.inner_html(), "<div hidden=\"\"></div><p></p>");
}

#[test]
fn other_attributes_are_stringified() {
	common_::init();
	let surface = surface();
	render(&html!("<input value=\"{}\"><div checked=\"{}\"></div>", true, true), &surface).unwrap();
	assert_eq!(surface.inner_html(), "<input value=\"true\"><div checked=\"true\"></div>");
}

#[test]
fn partially_templatized_attributes_are_stringified() {
	common_::init();
	let surface = surface();
	render(&html!("<input disabled=\"x{}\">", true), &surface).unwrap();
	assert_eq!(surface.inner_html(), "<input disabled=\"xtrue\">");
}

#[test]
fn lookup_ignores_case() {
	assert!(is_boolean_attribute("INPUT", "Disabled"));
	assert!(is_boolean_attribute("section", "HIDDEN"));
	assert!(!is_boolean_attribute("div", "disabled"));
	assert!(!is_boolean_attribute("input", "value"));
}
