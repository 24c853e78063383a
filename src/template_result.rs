//! Template results and rendering.
//!
//! A [`TemplateResult`] pairs a call site's static markup with that call's values. The markup is parsed once per call site,
//! and each render target remembers which template it shows so that re-rendering the same call site only updates values.

use crate::{
	dom::Node,
	error::TemplateError,
	instance::{Processor, Template, TemplateInstance},
	part::NodePart,
	processor::default_processor,
	trusted_types::{self, TrustedTypesPolicy},
	value::Value,
};
use core::{
	cell::RefCell,
	fmt::{self, Debug, Formatter},
};
use hashbrown::HashMap;
use std::rc::Rc;
use tracing::{debug, instrument, trace};

/// The static markup of one [`html!`](`crate::html`) call site.
///
/// Uses [`format!`]-style holes: `{}` marks a value, `{{` and `}}` are literal braces.
/// Identity is by address, so each call site must own exactly one `static` instance.
pub struct TemplateStrings {
	source: &'static str,
}

impl TemplateStrings {
	#[must_use]
	pub const fn new(source: &'static str) -> Self {
		Self { source }
	}

	#[must_use]
	pub fn source(&self) -> &'static str {
		self.source
	}

	/// The static pieces between holes, with escapes resolved. There is always one more piece than holes.
	#[must_use]
	pub fn strings(&self) -> Vec<String> {
		let mut strings = vec![String::new()];
		let mut chars = self.source.chars().peekable();
		while let Some(c) = chars.next() {
			match (c, chars.peek()) {
				('{', Some('{')) | ('}', Some('}')) => {
					chars.next();
				}
				('{', Some('}')) => {
					chars.next();
					strings.push(String::new());
					continue;
				}
				_ => (),
			}
			if let Some(last) = strings.last_mut() {
				last.push(c)
			}
		}
		strings
	}

	/// The template markup, with `{{ i }}` placeholders at the holes.
	#[must_use]
	pub fn markup(&self) -> String {
		let mut markup = String::with_capacity(self.source.len());
		for (i, string) in self.strings().iter().enumerate() {
			if i > 0 {
				markup.push_str(&format!("{{{{ {} }}}}", i - 1));
			}
			markup.push_str(string)
		}
		markup
	}

	fn key(&'static self) -> usize {
		self as *const Self as usize
	}
}

impl Debug for TemplateStrings {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "TemplateStrings({:p})", self)
	}
}

thread_local! {
	static TEMPLATES: RefCell<HashMap<usize, Rc<Template>>> = RefCell::default();
}

/// Where a [`TemplateResult`] is rendered to.
#[derive(Debug, Clone, Copy)]
pub enum RenderTarget<'a> {
	/// Replaces all children of a node.
	Node(&'a Node),
	/// Replaces the content of a node part.
	Part(&'a NodePart),
}

impl<'a> From<&'a Node> for RenderTarget<'a> {
	fn from(node: &'a Node) -> Self {
		RenderTarget::Node(node)
	}
}

impl<'a> From<&'a NodePart> for RenderTarget<'a> {
	fn from(part: &'a NodePart) -> Self {
		RenderTarget::Part(part)
	}
}

struct Rendered {
	template: Rc<Template>,
	instance: Rc<TemplateInstance>,
	/// The part version right after the instance was inserted. Any later replacement invalidates the memo.
	version: Option<u64>,
}

/// What a render target currently shows.
#[derive(Default)]
struct RenderedSlot(RefCell<Option<Rendered>>);

impl RenderTarget<'_> {
	fn rendered(&self) -> Rc<RenderedSlot> {
		match self {
			RenderTarget::Node(node) => node.slot(RenderedSlot::default),
			RenderTarget::Part(part) => part.slot(RenderedSlot::default),
		}
	}

	fn version(&self) -> Option<u64> {
		match self {
			RenderTarget::Node(_) => None,
			RenderTarget::Part(part) => Some(part.version()),
		}
	}
}

/// A call site's markup together with one call's values.
#[derive(Clone)]
pub struct TemplateResult {
	strings: &'static TemplateStrings,
	values: Rc<[Value]>,
	processor: Rc<dyn Processor>,
}

impl TemplateResult {
	/// Uses the [`default_processor`].
	///
	/// # Panics
	///
	/// In debug builds, iff the number of values doesn't match the number of `{}` holes in `strings`.
	#[must_use]
	pub fn new(strings: &'static TemplateStrings, values: Vec<Value>) -> Self {
		debug_assert_eq!(
			strings.strings().len() - 1,
			values.len(),
			"template holes and values don't match up"
		);
		Self {
			strings,
			values: values.into(),
			processor: default_processor(),
		}
	}

	#[must_use]
	pub fn with_processor(mut self, processor: Rc<dyn Processor>) -> Self {
		self.processor = processor;
		self
	}

	#[must_use]
	pub fn strings(&self) -> &'static TemplateStrings {
		self.strings
	}

	#[must_use]
	pub fn values(&self) -> &[Value] {
		&self.values
	}

	#[must_use]
	pub fn processor(&self) -> &Rc<dyn Processor> {
		&self.processor
	}

	/// Installs (or with [`None`] removes) the policy applied to markup before parsing.
	pub fn set_trusted_types_policy(policy: Option<Rc<dyn TrustedTypesPolicy>>) {
		trusted_types::set_trusted_types_policy(policy)
	}

	/// The parsed template for this call site, parsing it on first use.
	///
	/// # Errors
	///
	/// Iff the markup (after the trusted types policy) is malformed. Failures aren't cached.
	pub fn template(&self) -> Result<Rc<Template>, TemplateError> {
		let key = self.strings.key();
		if let Some(template) = TEMPLATES.with(|templates| templates.borrow().get(&key).cloned()) {
			return Ok(template);
		}

		let markup = trusted_types::create_html(self.strings.markup());
		let template = Rc::new(Template::parse(&markup)?);
		debug!(strings = ?self.strings, "Parsed new template.");
		TEMPLATES.with(|templates| templates.borrow_mut().insert(key, Rc::clone(&template)));
		Ok(template)
	}

	/// Renders into `target`.
	///
	/// If `target` already shows this call site's template, its instance is updated with the new values in place.
	/// Otherwise a fresh instance replaces the target's content.
	///
	/// # Errors
	///
	/// Iff this or a nested template fails to parse.
	#[instrument(skip(self, target), fields(strings = ?self.strings))]
	pub fn render_into<'a>(&self, target: impl Into<RenderTarget<'a>>) -> Result<(), TemplateError> {
		let target = target.into();
		let template = self.template()?;
		let rendered = target.rendered();

		let current = rendered
			.0
			.borrow()
			.as_ref()
			.filter(|current| Rc::ptr_eq(&current.template, &template) && current.version == target.version())
			.map(|current| Rc::clone(&current.instance));
		if let Some(instance) = current {
			trace!("Updating rendered instance.");
			return instance.update(&self.values);
		}

		let instance = Rc::new(TemplateInstance::new(&template, &self.values, Rc::clone(&self.processor))?);
		let nodes = instance.fragment().child_nodes();
		match target {
			RenderTarget::Node(node) => node.replace_children(&nodes),
			RenderTarget::Part(part) => part.replace(nodes),
		}
		*rendered.0.borrow_mut() = Some(Rendered {
			template,
			instance,
			version: target.version(),
		});
		Ok(())
	}
}

impl Debug for TemplateResult {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("TemplateResult")
			.field("strings", &self.strings)
			.field("values", &self.values)
			.finish_non_exhaustive()
	}
}

/// Renders `result` into `target`. See [`TemplateResult::render_into`].
///
/// # Errors
///
/// Iff a template fails to parse.
pub fn render<'a>(result: &TemplateResult, target: impl Into<RenderTarget<'a>>) -> Result<(), TemplateError> {
	result.render_into(target)
}

/// Creates a [`TemplateResult`] from a string literal with [`format!`]-style `{}` holes and one value per hole.
///
/// Values are converted with [`Value::from`](`crate::value::Value`). Each macro invocation is its own call site,
/// so rendering the same invocation again only updates values.
///
/// ```
/// use html_parts::{dom::Node, html, render};
///
/// let greet = |name: &str| html!("<p class=\"greeting\">Hello, {}!</p>", name);
///
/// let body = Node::element("body");
/// render(&greet("World"), &body).unwrap();
/// let paragraph = body.query_selector("p");
///
/// render(&greet("Rust"), &body).unwrap();
/// assert_eq!(body.inner_html(), "<p class=\"greeting\">Hello, Rust!</p>");
/// assert_eq!(body.query_selector("p"), paragraph);
/// ```
#[macro_export]
macro_rules! html {
	($markup:literal $(, $value:expr)* $(,)?) => {{
		static STRINGS: $crate::template_result::TemplateStrings = $crate::template_result::TemplateStrings::new($markup);
		$crate::template_result::TemplateResult::new(&STRINGS, ::std::vec![$($crate::value::Value::from($value)),*])
	}};
}
