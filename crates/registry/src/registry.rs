use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use weft_primitives::PatternError;

use crate::pattern::Rule;
use crate::statics::AspectRules;
use crate::Category;

/// Aspect id to ordered rule list for one [`Category`].
///
/// Iteration follows the order in which aspect ids were first registered.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
	aspects: IndexMap<Box<str>, Vec<Rule>, FxBuildHasher>,
}

impl RuleTable {
	/// Aspects and their rules, in registration order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &[Rule])> {
		self.aspects.iter().map(|(id, rules)| (&**id, rules.as_slice()))
	}

	pub fn get(&self, aspect: &str) -> Option<&[Rule]> {
		self.aspects.get(aspect).map(Vec::as_slice)
	}

	pub fn contains(&self, aspect: &str) -> bool {
		self.aspects.contains_key(aspect)
	}

	/// Number of aspects with an entry in this table.
	pub fn len(&self) -> usize {
		self.aspects.len()
	}

	pub fn is_empty(&self) -> bool {
		self.aspects.is_empty()
	}

	/// Total number of rules across all aspects.
	pub fn rule_count(&self) -> usize {
		self.aspects.values().map(Vec::len).sum()
	}
}

/// Immutable rule tables, one per [`Category`].
///
/// Built once through [`RegistryBuilder`] and shared read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
	tables: [RuleTable; 2],
}

impl RuleRegistry {
	pub fn builder() -> RegistryBuilder {
		RegistryBuilder::new()
	}

	/// Table for `category`; empty when nothing was registered under it.
	#[inline]
	pub fn get(&self, category: Category) -> &RuleTable {
		&self.tables[category.index()]
	}

	pub fn classes(&self) -> &RuleTable {
		self.get(Category::Classes)
	}

	pub fn annotations(&self) -> &RuleTable {
		self.get(Category::Annotations)
	}

	/// Returns `true` when no aspect has a rule in either category.
	pub fn is_empty(&self) -> bool {
		self.tables.iter().all(RuleTable::is_empty)
	}
}

type Pending = IndexMap<Box<str>, Vec<Box<str>>, FxBuildHasher>;

/// Collects raw pattern strings and compiles them into a [`RuleRegistry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
	pending: [Pending; 2],
}

impl RegistryBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends `patterns` to `aspect`'s rules under `category`.
	///
	/// An aspect registered again keeps its original position; the new
	/// patterns are appended after the ones already recorded.
	pub fn register<I, P>(&mut self, category: Category, aspect: &str, patterns: I) -> &mut Self
	where
		I: IntoIterator<Item = P>,
		P: AsRef<str>,
	{
		let rules = self.pending[category.index()].entry(Box::from(aspect)).or_default();
		rules.extend(patterns.into_iter().map(|p| Box::from(p.as_ref())));
		self
	}

	/// Shorthand for [`Category::Classes`] registration.
	pub fn classes<I, P>(&mut self, aspect: &str, patterns: I) -> &mut Self
	where
		I: IntoIterator<Item = P>,
		P: AsRef<str>,
	{
		self.register(Category::Classes, aspect, patterns)
	}

	/// Shorthand for [`Category::Annotations`] registration.
	pub fn annotations<I, P>(&mut self, aspect: &str, patterns: I) -> &mut Self
	where
		I: IntoIterator<Item = P>,
		P: AsRef<str>,
	{
		self.register(Category::Annotations, aspect, patterns)
	}

	/// Registers one static declaration.
	pub fn declare(&mut self, rules: &AspectRules) -> &mut Self {
		if !rules.classes.is_empty() {
			self.classes(rules.aspect, rules.classes);
		}
		if !rules.annotations.is_empty() {
			self.annotations(rules.aspect, rules.annotations);
		}
		self
	}

	/// Registers every declaration submitted with [`aspect_rules!`](crate::aspect_rules).
	///
	/// Link order is not stable, so declarations are ingested sorted by
	/// aspect id (ties keep collection order).
	pub fn with_inventory(&mut self) -> &mut Self {
		let mut declared: Vec<&AspectRules> = inventory::iter::<AspectRules>.into_iter().collect();
		declared.sort_by_key(|rules| rules.aspect);
		tracing::debug!(declarations = declared.len(), "weft.registry.inventory");
		for rules in declared {
			tracing::trace!(aspect = rules.aspect, crate_name = rules.crate_name, "weft.registry.inventory.declare");
			self.declare(rules);
		}
		self
	}

	/// Compiles every pattern.
	///
	/// # Errors
	///
	/// Fails with the first [`PatternError`] encountered; no partial registry
	/// is produced.
	pub fn build(self) -> Result<RuleRegistry, PatternError> {
		let mut registry = RuleRegistry::default();
		for category in Category::ALL {
			let table = &mut registry.tables[category.index()];
			for (aspect, patterns) in &self.pending[category.index()] {
				let rules = patterns
					.iter()
					.map(|pattern| Rule::compile(category, pattern))
					.collect::<Result<Vec<_>, _>>()?;
				table.aspects.insert(aspect.clone(), rules);
			}
		}

		tracing::debug!(
			class_aspects = registry.classes().len(),
			class_rules = registry.classes().rule_count(),
			annotation_aspects = registry.annotations().len(),
			annotation_rules = registry.annotations().rule_count(),
			"weft.registry.build"
		);
		Ok(registry)
	}
}
