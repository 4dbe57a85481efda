use thiserror::Error as ThisError;

/// Wiring problems between rules, aspects, and the methods they target.
///
/// These are never retried by the engine and surface to the caller of the
/// proxy entry point as soon as they are detected.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum ConfigError {
	/// No signature is known for the target method.
	#[error("cannot introspect {class}::{method}: method is unknown")]
	UnknownMethod { class: String, method: String },
	/// A rule references an aspect id the provider cannot resolve to an instance.
	#[error("aspect {aspect:?} is not registered with the aspect provider")]
	UnknownAspect { aspect: String },
	/// A positional argument is absent and its parameter declares no default.
	#[error("{class}::{method}: missing argument for parameter {parameter:?} with no default")]
	MissingArgument {
		class: String,
		method: String,
		parameter: String,
	},
}

/// A rule pattern that cannot be turned into a matcher.
#[derive(Debug, Clone, ThisError)]
pub enum PatternError {
	/// The pattern, or one component of a `Class::method` pattern, is empty.
	#[error("empty pattern in rule {pattern:?}")]
	Empty { pattern: String },
	/// The wildcard expansion was rejected by the regex engine.
	#[error("wildcard pattern {:?} failed to compile: {reason}", abbreviate(.pattern))]
	Compile { pattern: String, reason: String },
}

/// Longest pattern prefix, in chars, rendered in error messages.
const PATTERN_PREVIEW: usize = 64;

fn abbreviate(pattern: &str) -> String {
	match pattern.char_indices().nth(PATTERN_PREVIEW) {
		Some((end, _)) => format!("{}... ({} bytes)", &pattern[..end], pattern.len()),
		None => pattern.to_owned(),
	}
}

/// Top-level error for a proxied call.
#[derive(Debug, ThisError)]
pub enum Error {
	#[error(transparent)]
	Config(#[from] ConfigError),
	#[error(transparent)]
	Pattern(#[from] PatternError),
	/// Failure raised by the original method or by an aspect.
	///
	/// The engine moves this value through the chain without inspecting,
	/// wrapping, or logging it.
	#[error(transparent)]
	Failed(#[from] anyhow::Error),
}

impl Error {
	/// Wraps an arbitrary failure raised by a method body or an aspect.
	pub fn failed<E>(error: E) -> Self
	where
		E: std::error::Error + Send + Sync + 'static,
	{
		Self::Failed(anyhow::Error::new(error))
	}

	/// Builds a failure from a plain message.
	pub fn msg(message: impl std::fmt::Display + std::fmt::Debug + Send + Sync + 'static) -> Self {
		Self::Failed(anyhow::Error::msg(message))
	}

	/// Returns the configuration error, if this is one.
	pub fn as_config(&self) -> Option<&ConfigError> {
		match self {
			Self::Config(err) => Some(err),
			_ => None,
		}
	}

	/// Attempts to view a propagated failure as a concrete error type.
	pub fn downcast_ref<E>(&self) -> Option<&E>
	where
		E: std::fmt::Display + std::fmt::Debug + Send + Sync + 'static,
	{
		match self {
			Self::Failed(err) => err.downcast_ref::<E>(),
			_ => None,
		}
	}
}
