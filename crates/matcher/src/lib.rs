//! Aspect resolution for a single call target.
//!
//! [`AspectMatcher::resolve`] answers "which aspects wrap `Class::method`,
//! and in what order" using the two rule tables of a [`RuleRegistry`] and
//! the annotations reported by a [`MetadataProvider`].
//!
//! # Algorithm
//!
//! 1. **Class pass:** each aspect in the `classes` table is tested rule by
//!    rule in registration order. The first matching rule adds the aspect and
//!    ends the scan for that aspect.
//! 2. **Annotation pass:** the annotation names present on the class and on
//!    the method are gathered. When there are none the pass is skipped.
//!    Otherwise every (aspect, rule, annotation) triple is tested and each
//!    hit adds the aspect, so this intermediate list may repeat ids.
//! 3. **Merge:** ordered-set union. The class matches come first, then every
//!    annotation match not already present, keeping first-seen order.
//!
//! An empty result is the common case. It is returned without touching the
//! heap.

use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;
use weft_registry::{MetadataProvider, RuleRegistry};

/// Aspect ids resolved for one call, borrowed from the registry.
pub type Resolved<'r> = SmallVec<[&'r str; 4]>;

/// Resolves ordered, duplicate-free aspect lists.
#[derive(Clone)]
pub struct AspectMatcher {
	registry: Arc<RuleRegistry>,
	metadata: Arc<dyn MetadataProvider>,
}

impl fmt::Debug for AspectMatcher {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AspectMatcher")
			.field("class_aspects", &self.registry.classes().len())
			.field("annotation_aspects", &self.registry.annotations().len())
			.finish_non_exhaustive()
	}
}

impl AspectMatcher {
	pub fn new(registry: Arc<RuleRegistry>, metadata: Arc<dyn MetadataProvider>) -> Self {
		Self { registry, metadata }
	}

	pub fn registry(&self) -> &RuleRegistry {
		&self.registry
	}

	pub fn metadata(&self) -> &dyn MetadataProvider {
		&*self.metadata
	}

	/// Aspects wrapping `class_name::method_name`, in application order.
	pub fn resolve(&self, class_name: &str, method_name: &str) -> Resolved<'_> {
		let class_matches = self.class_matches(class_name, method_name);
		let annotation_matches = self.annotation_matches(class_name, method_name);
		let resolved = merge(class_matches, &annotation_matches);
		tracing::trace!(
			class = class_name,
			method = method_name,
			aspects = resolved.len(),
			"weft.matcher.resolve"
		);
		resolved
	}

	/// Class pass: aspects whose class rules hit the target, at most once each.
	pub fn class_matches(&self, class_name: &str, method_name: &str) -> Resolved<'_> {
		self.registry
			.classes()
			.iter()
			.filter(|(_, rules)| rules.iter().any(|rule| rule.matches_target(class_name, method_name)))
			.map(|(aspect, _)| aspect)
			.collect()
	}

	/// Annotation pass: one entry per matching (rule, annotation) pair.
	pub fn annotation_matches(&self, class_name: &str, method_name: &str) -> Resolved<'_> {
		let mut matches = Resolved::new();
		let table = self.registry.annotations();
		if table.is_empty() {
			return matches;
		}

		let present = self.present_annotations(class_name, method_name);
		if present.is_empty() {
			return matches;
		}

		for (aspect, rules) in table.iter() {
			for rule in rules {
				for name in &present {
					if rule.matches_name(name) {
						matches.push(aspect);
					}
				}
			}
		}
		matches
	}

	/// Union of class-level and method-level annotation names.
	fn present_annotations(&self, class_name: &str, method_name: &str) -> SmallVec<[&str; 8]> {
		let class_level = self.metadata.class_annotations(class_name);
		let method_level = self.metadata.method_annotations(class_name, method_name);

		let mut names: SmallVec<[&str; 8]> = SmallVec::new();
		for annotation in class_level.iter().chain(method_level) {
			let name = &*annotation.name;
			if !names.contains(&name) {
				names.push(name);
			}
		}
		names
	}
}

/// Ordered-set union: `first` as-is, then each id of `rest` not yet present.
pub fn merge<'r>(mut first: Resolved<'r>, rest: &[&'r str]) -> Resolved<'r> {
	for &aspect in rest {
		if !first.contains(&aspect) {
			first.push(aspect);
		}
	}
	first
}
