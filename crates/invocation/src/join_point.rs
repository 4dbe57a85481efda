use std::fmt;

use indexmap::IndexMap;
use weft_primitives::{ConfigError, Outcome, Value};

use crate::metadata::{Annotation, Signature};

/// Callable bound to the real method body of one call site.
///
/// The call site owns the target reference and method identifier; the
/// invoker borrows that closure for the duration of the call and hands it the
/// join point's current arguments each time it runs.
#[derive(Clone, Copy)]
pub struct Invoker<'a> {
	call: &'a (dyn Fn(&[Value]) -> Outcome + 'a),
}

impl<'a> Invoker<'a> {
	pub fn new(call: &'a (dyn Fn(&[Value]) -> Outcome + 'a)) -> Self {
		Self { call }
	}

	/// Runs the real method with `arguments`.
	#[inline]
	pub fn invoke(&self, arguments: &[Value]) -> Outcome {
		(self.call)(arguments)
	}
}

impl fmt::Debug for Invoker<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("Invoker(..)")
	}
}

/// Metadata known about the intercepted method, borrowed from the metadata provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct Target<'a> {
	/// Declared signature, `None` when the method cannot be introspected.
	pub signature: Option<&'a Signature>,
	pub class_annotations: &'a [Annotation],
	pub method_annotations: &'a [Annotation],
}

/// Context of one intercepted call.
///
/// Created fresh per call and dropped when the call returns. Only the
/// arguments are mutable; the bound invoker is fixed at construction.
#[derive(Debug)]
pub struct JoinPoint<'a> {
	class_name: &'a str,
	method_name: &'a str,
	arguments: Vec<Value>,
	invoker: Invoker<'a>,
	target: Target<'a>,
}

impl<'a> JoinPoint<'a> {
	pub fn new(class_name: &'a str, method_name: &'a str, arguments: Vec<Value>, invoker: Invoker<'a>) -> Self {
		Self {
			class_name,
			method_name,
			arguments,
			invoker,
			target: Target::default(),
		}
	}

	/// Attaches signature and annotation metadata for the target method.
	pub fn with_target(mut self, target: Target<'a>) -> Self {
		self.target = target;
		self
	}

	pub fn class_name(&self) -> &'a str {
		self.class_name
	}

	pub fn method_name(&self) -> &'a str {
		self.method_name
	}

	pub fn arguments(&self) -> &[Value] {
		&self.arguments
	}

	/// Mutable access for aspects that rewrite arguments before proceeding.
	pub fn arguments_mut(&mut self) -> &mut Vec<Value> {
		&mut self.arguments
	}

	/// Replaces the argument at `index`, padding with `null` if it is past the end.
	pub fn set_argument(&mut self, index: usize, value: Value) {
		if index >= self.arguments.len() {
			self.arguments.resize(index + 1, Value::Null);
		}
		self.arguments[index] = value;
	}

	pub fn target(&self) -> &Target<'a> {
		&self.target
	}

	/// Class-level annotations followed by method-level ones.
	pub fn annotations(&self) -> impl Iterator<Item = &'a Annotation> {
		self.target.class_annotations.iter().chain(self.target.method_annotations)
	}

	/// First annotation named `name`, method level taking precedence over class level.
	pub fn annotation(&self, name: &str) -> Option<&'a Annotation> {
		let by_name = |a: &&Annotation| &*a.name == name;
		self.target
			.method_annotations
			.iter()
			.find(by_name)
			.or_else(|| self.target.class_annotations.iter().find(by_name))
	}

	/// Runs the original method with the current arguments.
	///
	/// Every call re-executes the method; nothing is cached. Failures come
	/// back exactly as the method raised them.
	pub fn proceed(&self) -> Outcome {
		self.invoker.invoke(&self.arguments)
	}

	/// Maps declared parameter names to argument values.
	///
	/// Parameters not supplied positionally take their declared default.
	/// Surplus positional arguments are ignored.
	///
	/// # Errors
	///
	/// - [`ConfigError::UnknownMethod`] when no signature is known for the method.
	/// - [`ConfigError::MissingArgument`] when an omitted parameter has no default.
	pub fn parameter_map(&self) -> Result<ParamMap<'a>, ConfigError> {
		let Some(signature) = self.target.signature else {
			return Err(ConfigError::UnknownMethod {
				class: self.class_name.to_owned(),
				method: self.method_name.to_owned(),
			});
		};

		let mut values = IndexMap::with_capacity(signature.len());
		for (index, parameter) in signature.parameters().iter().enumerate() {
			let value = match (self.arguments.get(index), &parameter.default) {
				(Some(arg), _) => arg.clone(),
				(None, Some(default)) => default.clone(),
				(None, None) => {
					return Err(ConfigError::MissingArgument {
						class: self.class_name.to_owned(),
						method: self.method_name.to_owned(),
						parameter: parameter.name.to_string(),
					});
				}
			};
			values.insert(&*parameter.name, value);
		}

		Ok(ParamMap { values })
	}
}

/// Parameter name to value mapping, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamMap<'a> {
	values: IndexMap<&'a str, Value>,
}

impl<'a> ParamMap<'a> {
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.values.get(name)
	}

	/// Parameter names in declaration order.
	pub fn names(&self) -> impl Iterator<Item = &'a str> {
		self.values.keys().copied()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&'a str, &Value)> {
		self.values.iter().map(|(k, v)| (*k, v))
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	/// Converts into a JSON object keyed by parameter name.
	pub fn into_value(self) -> Value {
		Value::Object(self.values.into_iter().map(|(k, v)| (k.to_owned(), v)).collect())
	}
}

#[cfg(test)]
mod tests {
	use std::cell::Cell;

	use pretty_assertions::assert_eq;
	use serde_json::json;

	use super::*;
	use crate::metadata::Parameter;

	fn echo(args: &[Value]) -> Outcome {
		Ok(Value::Array(args.to_vec()))
	}

	#[test]
	fn parameter_map_fills_defaults_in_order() {
		let sig = Signature::new([Parameter::required("a"), Parameter::optional("b", json!(5))]);
		let jp = JoinPoint::new("Foo", "bar", vec![json!(10)], Invoker::new(&echo)).with_target(Target {
			signature: Some(&sig),
			..Target::default()
		});

		let map = jp.parameter_map().unwrap();
		assert_eq!(map.names().collect::<Vec<_>>(), ["a", "b"]);
		assert_eq!(map.get("a"), Some(&json!(10)));
		assert_eq!(map.get("b"), Some(&json!(5)));
		assert_eq!(map.into_value(), json!({ "a": 10, "b": 5 }));
	}

	#[test]
	fn parameter_map_ignores_surplus_arguments() {
		let sig = Signature::new([Parameter::required("a")]);
		let jp = JoinPoint::new("Foo", "bar", vec![json!(1), json!(2)], Invoker::new(&echo)).with_target(Target {
			signature: Some(&sig),
			..Target::default()
		});
		assert_eq!(jp.parameter_map().unwrap().len(), 1);
	}

	#[test]
	fn parameter_map_fails_for_unknown_method() {
		let jp = JoinPoint::new("Foo", "missing", vec![], Invoker::new(&echo));
		assert_eq!(
			jp.parameter_map(),
			Err(ConfigError::UnknownMethod {
				class: "Foo".into(),
				method: "missing".into(),
			})
		);
	}

	#[test]
	fn parameter_map_fails_for_omitted_required_parameter() {
		let sig = Signature::new([Parameter::required("a"), Parameter::required("b")]);
		let jp = JoinPoint::new("Foo", "bar", vec![json!(1)], Invoker::new(&echo)).with_target(Target {
			signature: Some(&sig),
			..Target::default()
		});
		assert!(matches!(
			jp.parameter_map(),
			Err(ConfigError::MissingArgument { parameter, .. }) if parameter == "b"
		));
	}

	#[test]
	fn proceed_reruns_the_method_each_time() {
		let runs = Cell::new(0);
		let body = |_: &[Value]| -> Outcome {
			runs.set(runs.get() + 1);
			Ok(json!(runs.get()))
		};
		let jp = JoinPoint::new("Foo", "bar", vec![], Invoker::new(&body));

		assert_eq!(jp.proceed().unwrap(), json!(1));
		assert_eq!(jp.proceed().unwrap(), json!(2));
		assert_eq!(runs.get(), 2);
	}

	#[test]
	fn proceed_sees_rewritten_arguments() {
		let mut jp = JoinPoint::new("Foo", "bar", vec![json!(1)], Invoker::new(&echo));
		jp.set_argument(0, json!("x"));
		jp.set_argument(2, json!(true));
		assert_eq!(jp.proceed().unwrap(), json!(["x", null, true]));

		jp.arguments_mut().clear();
		assert_eq!(jp.proceed().unwrap(), json!([]));
	}

	#[test]
	fn annotation_lookup_prefers_method_level() {
		let class = [Annotation::with_value("Cacheable", json!({ "ttl": 10 })), Annotation::new("Logged")];
		let method = [Annotation::with_value("Cacheable", json!({ "ttl": 60 }))];
		let jp = JoinPoint::new("Foo", "bar", vec![], Invoker::new(&echo)).with_target(Target {
			signature: None,
			class_annotations: &class,
			method_annotations: &method,
		});

		assert_eq!(jp.annotation("Cacheable").map(|a| &a.value), Some(&json!({ "ttl": 60 })));
		assert!(jp.annotation("Logged").is_some());
		assert!(jp.annotation("Missing").is_none());
		assert_eq!(jp.annotations().count(), 3);
	}
}
