use std::sync::Arc;

use weft_primitives::{Outcome, Value};

use crate::Weaver;

/// Object whose methods can be invoked by name with positional arguments.
pub trait Dispatchable {
	/// Fully qualified class name rules are matched against.
	fn class_name(&self) -> &str;

	/// Invokes `method` with `arguments`.
	fn dispatch(&self, method: &str, arguments: &[Value]) -> Outcome;
}

impl<T: Dispatchable + ?Sized> Dispatchable for Arc<T> {
	fn class_name(&self) -> &str {
		(**self).class_name()
	}

	fn dispatch(&self, method: &str, arguments: &[Value]) -> Outcome {
		(**self).dispatch(method, arguments)
	}
}

/// Wraps a [`Dispatchable`] so every dispatch is woven through a [`Weaver`].
///
/// The bound invoker owns the target reference and the method name; aspects
/// only ever see the join point's arguments.
#[derive(Debug, Clone)]
pub struct Proxy<T> {
	target: T,
	weaver: Arc<Weaver>,
}

impl<T: Dispatchable> Proxy<T> {
	pub fn new(target: T, weaver: Arc<Weaver>) -> Self {
		Self { target, weaver }
	}

	pub fn target(&self) -> &T {
		&self.target
	}

	pub fn weaver(&self) -> &Weaver {
		&self.weaver
	}

	pub fn into_inner(self) -> T {
		self.target
	}

	/// Dispatches `method`, taking ownership of the argument list.
	pub fn call(&self, method: &str, arguments: Vec<Value>) -> Outcome {
		let original = |arguments: &[Value]| self.target.dispatch(method, arguments);
		self.weaver.call(self.target.class_name(), method, arguments, &original)
	}
}

impl<T: Dispatchable> Dispatchable for Proxy<T> {
	fn class_name(&self) -> &str {
		self.target.class_name()
	}

	fn dispatch(&self, method: &str, arguments: &[Value]) -> Outcome {
		self.call(method, arguments.to_vec())
	}
}
