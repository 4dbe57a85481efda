use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap as HashMap;

use crate::Aspect;

/// Resolves aspect ids to concrete aspect instances.
///
/// Implement this to source aspects from an existing service container;
/// [`AspectContainer`] is the stock map-backed provider.
pub trait AspectProvider: Send + Sync {
	fn aspect(&self, id: &str) -> Option<Arc<dyn Aspect>>;
}

/// Aspect instances keyed by id, filled once at boot.
#[derive(Default, Clone)]
pub struct AspectContainer {
	aspects: HashMap<Box<str>, Arc<dyn Aspect>>,
}

impl AspectContainer {
	pub fn new() -> Self {
		Self::default()
	}

	/// Binds `id` to `aspect`, returning the instance it replaces.
	pub fn insert(&mut self, id: &str, aspect: Arc<dyn Aspect>) -> Option<Arc<dyn Aspect>> {
		let replaced = self.aspects.insert(Box::from(id), aspect);
		if replaced.is_some() {
			tracing::debug!(aspect = id, "aspect instance replaced");
		}
		replaced
	}

	pub fn contains(&self, id: &str) -> bool {
		self.aspects.contains_key(id)
	}

	pub fn len(&self) -> usize {
		self.aspects.len()
	}

	pub fn is_empty(&self) -> bool {
		self.aspects.is_empty()
	}
}

impl AspectProvider for AspectContainer {
	fn aspect(&self, id: &str) -> Option<Arc<dyn Aspect>> {
		self.aspects.get(id).cloned()
	}
}

impl fmt::Debug for AspectContainer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut ids: Vec<&str> = self.aspects.keys().map(|id| &**id).collect();
		ids.sort_unstable();
		f.debug_struct("AspectContainer").field("aspects", &ids).finish()
	}
}
