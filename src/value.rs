use crate::{
	directive::PartCallback,
	dom::{Event, EventListener, Node},
	task::Promise,
	template_result::TemplateResult,
};
use core::{
	fmt::{self, Debug, Display, Formatter},
	iter::FromIterator,
};
use std::rc::Rc;

/// A dynamic value bound to a part.
///
/// This is the closed set of shapes the resolver recognises. Anything else has to be converted into one of them first.
#[derive(Clone)]
pub enum Value {
	/// Absent value. Unbinds event listeners, renders as empty text otherwise.
	Null,
	Bool(bool),
	Number(f64),
	Str(Rc<str>),
	/// A directly callable event listener.
	Function(Function),
	/// An object that handles events through [`EventListener::handle_event`].
	Handler(Rc<dyn EventListener>),
	/// A part callback. Only callbacks tagged through [`directive`](`crate::directive::directive`) are run as directives.
	Callback(PartCallback),
	Template(TemplateResult),
	Fragment(Node),
	Node(Node),
	/// An iterable, walked once per resolution.
	List(Rc<[Value]>),
	Pending(Promise),
}

impl Value {
	/// Wraps a closure as [`Value::Function`].
	pub fn function(f: impl Fn(&Event) + 'static) -> Self {
		Value::Function(Function::new(f))
	}

	pub fn handler(handler: Rc<dyn EventListener>) -> Self {
		Value::Handler(handler)
	}

	#[must_use]
	pub fn is_null(&self) -> bool {
		matches!(self, Value::Null)
	}
}

/// A directly callable event listener.
///
/// When dispatched through an event binding, [`Event::current_target`] is the bound element.
#[derive(Clone)]
pub struct Function(Rc<dyn Fn(&Event)>);

impl Function {
	pub fn new(f: impl Fn(&Event) + 'static) -> Self {
		Self(Rc::new(f))
	}

	pub fn call(&self, event: &Event) {
		(self.0)(event)
	}
}

impl Debug for Function {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "Function({:p})", Rc::as_ptr(&self.0).cast::<()>())
	}
}

impl Debug for Value {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Value::Null => f.write_str("Null"),
			Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
			Value::Number(n) => f.debug_tuple("Number").field(n).finish(),
			Value::Str(s) => {
				if cfg!(feature = "dangerous-logging") {
					f.debug_tuple("Str").field(s).finish()
				} else {
					write!(f, "Str(len = {})", s.len())
				}
			}
			Value::Function(function) => function.fmt(f),
			Value::Handler(_) => f.write_str("Handler"),
			Value::Callback(callback) => callback.fmt(f),
			Value::Template(template) => template.fmt(f),
			Value::Fragment(node) => f.debug_tuple("Fragment").field(node).finish(),
			Value::Node(node) => f.debug_tuple("Node").field(node).finish(),
			Value::List(items) => write!(f, "List(len = {})", items.len()),
			Value::Pending(promise) => promise.fmt(f),
		}
	}
}

/// The string form used for text content and attribute values.
impl Display for Value {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Value::Null => Ok(()),
			Value::Bool(b) => Display::fmt(b, f),
			Value::Number(n) => format_number(*n, f),
			Value::Str(s) => f.write_str(s),
			Value::Function(_) | Value::Callback(_) => f.write_str("[function]"),
			Value::Handler(_) => f.write_str("[object]"),
			Value::Template(_) => f.write_str("[template]"),
			Value::Fragment(node) | Value::Node(node) => f.write_str(&node.text_content()),
			Value::List(items) => {
				for (i, item) in items.iter().enumerate() {
					if i > 0 {
						f.write_str(",")?
					}
					Display::fmt(item, f)?
				}
				Ok(())
			}
			Value::Pending(_) => f.write_str("[promise]"),
		}
	}
}

fn format_number(n: f64, f: &mut Formatter<'_>) -> fmt::Result {
	if n.is_nan() {
		f.write_str("NaN")
	} else if n.is_infinite() {
		f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" })
	} else if n == 0.0 {
		// Also `-0`.
		f.write_str("0")
	} else {
		// Switches to exponent notation at the same magnitudes as JavaScript.
		f.write_str(ryu_js::Buffer::new().format_finite(n))
	}
}

impl From<bool> for Value {
	fn from(b: bool) -> Self {
		Value::Bool(b)
	}
}

macro_rules! number_from {
	($($ty:ty),*) => {$(
		impl From<$ty> for Value {
			#[allow(clippy::cast_lossless, clippy::cast_precision_loss)]
			fn from(n: $ty) -> Self {
				Value::Number(n as f64)
			}
		}
	)*};
}

number_from!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl From<&str> for Value {
	fn from(s: &str) -> Self {
		Value::Str(s.into())
	}
}

impl From<String> for Value {
	fn from(s: String) -> Self {
		Value::Str(s.into())
	}
}

impl From<&String> for Value {
	fn from(s: &String) -> Self {
		Value::Str(s.as_str().into())
	}
}

impl From<Function> for Value {
	fn from(function: Function) -> Self {
		Value::Function(function)
	}
}

impl From<PartCallback> for Value {
	fn from(callback: PartCallback) -> Self {
		Value::Callback(callback)
	}
}

impl From<TemplateResult> for Value {
	fn from(template: TemplateResult) -> Self {
		Value::Template(template)
	}
}

impl From<Promise> for Value {
	fn from(promise: Promise) -> Self {
		Value::Pending(promise)
	}
}

/// [***DocumentFragment***](https://developer.mozilla.org/en-US/docs/Web/API/DocumentFragment)s become [`Value::Fragment`], all other nodes [`Value::Node`].
impl From<Node> for Value {
	fn from(node: Node) -> Self {
		if node.is_fragment() {
			Value::Fragment(node)
		} else {
			Value::Node(node)
		}
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(value: Option<T>) -> Self {
		value.map_or(Value::Null, Into::into)
	}
}

impl<T: Into<Value>> From<Vec<T>> for Value {
	fn from(items: Vec<T>) -> Self {
		items.into_iter().collect()
	}
}

impl<T: Into<Value>> FromIterator<T> for Value {
	fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
		Value::List(iter.into_iter().map(Into::into).collect())
	}
}

#[cfg(test)]
mod tests {
	use super::Value;

	#[test]
	fn numbers_format_like_javascript() {
		for (n, expected) in [
			(2.0, "2"),
			(1.5, "1.5"),
			(-0.0, "0"),
			(0.1 + 0.2, "0.30000000000000004"),
			(1e20, "100000000000000000000"),
			(1e21, "1e+21"),
			(1.5e300, "1.5e+300"),
			(0.000_001, "0.000001"),
			(1e-7, "1e-7"),
			(f64::NAN, "NaN"),
			(f64::NEG_INFINITY, "-Infinity"),
		] {
			assert_eq!(Value::from(n).to_string(), expected);
		}
	}
}
