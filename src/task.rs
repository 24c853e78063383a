//! The host's asynchronous plumbing: a microtask queue and single-assignment promises.
//!
//! Nothing here runs on its own. Whoever drives the host calls [`run_microtasks`] when the current synchronous work is done,
//! the same point at which a browser would drain its microtask queue.

use crate::value::Value;
use core::{
	cell::RefCell,
	fmt::{self, Debug, Formatter},
	mem,
};
use std::{collections::VecDeque, rc::Rc};
use tracing::{trace, warn};

thread_local! {
	static MICROTASKS: RefCell<VecDeque<Box<dyn FnOnce()>>> = RefCell::new(VecDeque::new());
}

pub fn queue_microtask(task: impl FnOnce() + 'static) {
	MICROTASKS.with(|microtasks| microtasks.borrow_mut().push_back(Box::new(task)))
}

/// Runs queued microtasks until the queue is empty, including ones queued meanwhile.
///
/// Returns how many ran.
pub fn run_microtasks() -> usize {
	let mut count = 0;
	while let Some(task) = MICROTASKS.with(|microtasks| microtasks.borrow_mut().pop_front()) {
		task();
		count += 1;
	}
	trace!(count, "Drained microtask queue.");
	count
}

enum State {
	Pending(Vec<Box<dyn FnOnce(Value)>>),
	Fulfilled(Value),
}

/// A value that may not be available yet.
///
/// Reactions registered with [`Promise::then`] always run as microtasks, even if the promise is already fulfilled.
#[derive(Clone)]
pub struct Promise(Rc<RefCell<State>>);

/// The settling side of a [`Promise`].
#[derive(Clone)]
pub struct Resolver(Rc<RefCell<State>>);

impl Promise {
	#[allow(clippy::new_ret_no_self)]
	#[must_use]
	pub fn new() -> (Promise, Resolver) {
		let state = Rc::new(RefCell::new(State::Pending(Vec::new())));
		(Promise(Rc::clone(&state)), Resolver(state))
	}

	pub fn resolved(value: impl Into<Value>) -> Promise {
		Promise(Rc::new(RefCell::new(State::Fulfilled(value.into()))))
	}

	#[must_use]
	pub fn is_settled(&self) -> bool {
		matches!(*self.0.borrow(), State::Fulfilled(_))
	}

	pub fn then(&self, reaction: impl FnOnce(Value) + 'static) {
		let mut state = self.0.borrow_mut();
		match &mut *state {
			State::Pending(reactions) => reactions.push(Box::new(reaction)),
			State::Fulfilled(value) => {
				let value = value.clone();
				queue_microtask(move || reaction(value))
			}
		}
	}

	#[must_use]
	pub fn ptr_eq(&self, other: &Promise) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}
}

impl Debug for Promise {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match *self.0.borrow() {
			State::Pending(ref reactions) => write!(f, "Promise(pending, reactions = {})", reactions.len()),
			State::Fulfilled(_) => f.write_str("Promise(fulfilled)"),
		}
	}
}

impl Resolver {
	/// Fulfills the promise and queues its reactions.
	///
	/// Resolving with a [`Value::Pending`] adopts that promise's eventual value instead.
	/// Returns `false` (and changes nothing) if the promise was already fulfilled.
	pub fn resolve(&self, value: impl Into<Value>) -> bool {
		let value = value.into();
		if let Value::Pending(inner) = value {
			let resolver = self.clone();
			inner.then(move |value| {
				resolver.resolve(value);
			});
			return true;
		}

		let reactions = {
			let mut state = self.0.borrow_mut();
			match &mut *state {
				State::Fulfilled(_) => {
					warn!("Ignoring repeated resolution of a fulfilled promise.");
					return false;
				}
				State::Pending(reactions) => {
					let reactions = mem::take(reactions);
					*state = State::Fulfilled(value.clone());
					reactions
				}
			}
		};

		trace!(reactions = reactions.len(), "Resolved promise.");
		for reaction in reactions {
			let value = value.clone();
			queue_microtask(move || reaction(value))
		}
		true
	}
}
