use html_parts::{
	html, render,
	trusted_types::{set_trusted_types_policy, trusted_types_policy, TrustedTypesPolicy},
	TemplateResult,
};
use std::rc::Rc;

use common_::{surface, PolicyGuard};

#[test]
fn can_set_a_policy() {
	common_::init();
	let _guard = PolicyGuard;
	assert!(trusted_types_policy().is_none());

	let policy: Rc<dyn TrustedTypesPolicy> = Rc::new(|html: &str| html.to_owned());
	TemplateResult::set_trusted_types_policy(Some(Rc::clone(&policy)));
	assert!(trusted_types_policy().map_or(false, |current| Rc::ptr_eq(&current, &policy)));

	set_trusted_types_policy(None);
	assert!(trusted_types_policy().is_none());
}

#[test]
fn the_policy_rewrites_new_templates() {
	common_::init();
	let _guard = PolicyGuard;
	set_trusted_types_policy(Some(Rc::new(|html: &str| html.replace("<b>", "<i>").replace("</b>", "</i>"))));

	let surface = surface();
	render(&html!("<b>{}</b>", "x"), &surface).unwrap();
	assert_eq!(surface.inner_html(), "<i>x</i>");

	set_trusted_types_policy(None);
	render(&html!("<b>{}</b>", "y"), &surface).unwrap();
	assert_eq!(surface.inner_html(), "<b>y</b>");
}

#[test]
fn parsed_templates_are_not_affected() {
	common_::init();
	let main = |x: &str| html!("<b>{}</b>", x);
	let surface = surface();
	render(&main("x"), &surface).unwrap();

	let _guard = PolicyGuard;
	set_trusted_types_policy(Some(Rc::new(|_: &str| "<hr>".to_owned())));
	let other = common_::surface();
	render(&main("y"), &other).unwrap();
	assert_eq!(other.inner_html(), "<b>y</b>");
	assert_eq!(surface.inner_html(), "<b>x</b>");
}
