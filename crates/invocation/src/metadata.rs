use serde::{Deserialize, Serialize};
use weft_primitives::Value;

/// Marker attached to a class or method, with its attribute payload.
///
/// Rules match on [`Annotation::name`] only; the payload is for aspects that
/// read their own configuration off the marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
	pub name: Box<str>,
	#[serde(default)]
	pub value: Value,
}

impl Annotation {
	/// Creates a marker with no attributes.
	pub fn new(name: impl Into<Box<str>>) -> Self {
		Self {
			name: name.into(),
			value: Value::Null,
		}
	}

	/// Creates a marker carrying `value` as its attributes.
	pub fn with_value(name: impl Into<Box<str>>, value: Value) -> Self {
		Self { name: name.into(), value }
	}
}

/// One declared method parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
	pub name: Box<str>,
	/// Value used when the caller omits this positional argument.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub default: Option<Value>,
}

impl Parameter {
	/// A parameter that must be supplied positionally.
	pub fn required(name: impl Into<Box<str>>) -> Self {
		Self {
			name: name.into(),
			default: None,
		}
	}

	/// A parameter that falls back to `default` when omitted.
	pub fn optional(name: impl Into<Box<str>>, default: Value) -> Self {
		Self {
			name: name.into(),
			default: Some(default),
		}
	}
}

/// Declared parameter list of a method, in positional order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature {
	parameters: Vec<Parameter>,
}

impl Signature {
	pub fn new(parameters: impl IntoIterator<Item = Parameter>) -> Self {
		Self {
			parameters: parameters.into_iter().collect(),
		}
	}

	pub fn parameters(&self) -> &[Parameter] {
		&self.parameters
	}

	/// Parameter names in declaration order.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.parameters.iter().map(|p| &*p.name)
	}

	pub fn len(&self) -> usize {
		self.parameters.len()
	}

	pub fn is_empty(&self) -> bool {
		self.parameters.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use serde_json::json;

	use super::*;

	#[test]
	fn signature_deserializes_from_parameter_list() {
		let sig: Signature = serde_json::from_value(json!([
			{ "name": "a" },
			{ "name": "b", "default": 5 },
		]))
		.unwrap();

		assert_eq!(sig, Signature::new([Parameter::required("a"), Parameter::optional("b", json!(5))]));
		assert_eq!(sig.names().collect::<Vec<_>>(), ["a", "b"]);
	}

	#[test]
	fn annotation_value_defaults_to_null() {
		let ann: Annotation = serde_json::from_value(json!({ "name": "Cacheable" })).unwrap();
		assert_eq!(ann, Annotation::new("Cacheable"));
	}
}
