//! An optional sanitization hook markup passes through before it is parsed.
//!
//! The policy is applied to template markup when a template is first parsed, and to [`unsafe_html`](`crate::unsafe_html::unsafe_html`) markup on every render.
//! Templates that were already parsed are not affected by a later policy change.

use core::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

/// A [***TrustedTypePolicy***](https://developer.mozilla.org/en-US/docs/Web/API/TrustedTypePolicy) reduced to its `createHTML` method.
pub trait TrustedTypesPolicy {
	fn create_html(&self, html: &str) -> String;
}

impl<F: Fn(&str) -> String> TrustedTypesPolicy for F {
	fn create_html(&self, html: &str) -> String {
		self(html)
	}
}

thread_local! {
	static POLICY: RefCell<Option<Rc<dyn TrustedTypesPolicy>>> = RefCell::new(None);
}

/// Installs `policy`, or removes the current one with [`None`].
pub fn set_trusted_types_policy(policy: Option<Rc<dyn TrustedTypesPolicy>>) {
	debug!(installed = policy.is_some(), "Setting trusted types policy.");
	POLICY.with(|current| *current.borrow_mut() = policy)
}

#[must_use]
pub fn trusted_types_policy() -> Option<Rc<dyn TrustedTypesPolicy>> {
	POLICY.with(|current| current.borrow().clone())
}

/// Passes `markup` through the current policy, if any.
pub(crate) fn create_html(markup: String) -> String {
	match trusted_types_policy() {
		Some(policy) => policy.create_html(&markup),
		None => markup,
	}
}
