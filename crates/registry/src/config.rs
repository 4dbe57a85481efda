//! Declarative registry documents.
//!
//! A document lists aspects with their rule patterns and classes with their
//! annotation markers and method signatures:
//!
//! ```toml
//! [[aspect]]
//! id = "audit"
//! classes = ["App.Service.*", "App.Repo::save"]
//! annotations = ["Audited"]
//!
//! [[class]]
//! name = "App.Service.UserService"
//! annotations = [{ name = "Logged" }]
//!
//! [[class.method]]
//! name = "find"
//! annotations = [{ name = "Cacheable", value = { ttl = 60 } }]
//! parameters = [{ name = "id" }, { name = "fresh", default = false }]
//! ```
//!
//! Documents are read at boot only. [`RegistryConfig::apply`] feeds them into
//! the builders in document order, so aspect order in the file is the
//! resolution order.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use weft_invocation::{Annotation, Signature};

use crate::{AnnotationIndexBuilder, RegistryBuilder};

/// Failure to read or parse a registry document.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
	#[error("failed to read {}: {source}", .path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("invalid registry document: {0}")]
	Parse(#[from] toml::de::Error),
}

/// Parsed registry document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
	#[serde(default, rename = "aspect")]
	pub aspects: Vec<AspectSpec>,
	#[serde(default, rename = "class")]
	pub classes: Vec<ClassSpec>,
}

/// Rule patterns declared for one aspect.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AspectSpec {
	pub id: String,
	#[serde(default)]
	pub classes: Vec<String>,
	#[serde(default)]
	pub annotations: Vec<String>,
}

/// Metadata declared for one class.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassSpec {
	pub name: String,
	#[serde(default)]
	pub annotations: Vec<Annotation>,
	#[serde(default, rename = "method")]
	pub methods: Vec<MethodSpec>,
}

/// Metadata declared for one method.
///
/// Omitting `parameters` leaves the method without a signature, which makes
/// parameter mapping fail for it; `parameters = []` declares a nullary method.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MethodSpec {
	pub name: String,
	#[serde(default)]
	pub annotations: Vec<Annotation>,
	#[serde(default)]
	pub parameters: Option<Signature>,
}

impl FromStr for RegistryConfig {
	type Err = LoadError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(toml::from_str(s)?)
	}
}

impl RegistryConfig {
	/// Reads and parses the document at `path`.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		let config = content.parse::<Self>()?;
		tracing::debug!(
			path = %path.display(),
			aspects = config.aspects.len(),
			classes = config.classes.len(),
			"weft.registry.config"
		);
		Ok(config)
	}

	/// Feeds rules into `rules` and metadata into `metadata`, in document order.
	pub fn apply(&self, rules: &mut RegistryBuilder, metadata: &mut AnnotationIndexBuilder) {
		for aspect in &self.aspects {
			if !aspect.classes.is_empty() {
				rules.classes(&aspect.id, &aspect.classes);
			}
			if !aspect.annotations.is_empty() {
				rules.annotations(&aspect.id, &aspect.annotations);
			}
		}

		for class in &self.classes {
			for annotation in &class.annotations {
				metadata.annotate_class(&class.name, annotation.clone());
			}
			for method in &class.methods {
				for annotation in &method.annotations {
					metadata.annotate_method(&class.name, &method.name, annotation.clone());
				}
				if let Some(signature) = &method.parameters {
					metadata.method(&class.name, &method.name, signature.clone());
				}
			}
		}
	}
}
