use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;
use weft_invocation::{Invoker, JoinPoint};
use weft_matcher::{AspectMatcher, Resolved};
use weft_pipeline::Pipeline;
use weft_primitives::{ConfigError, Outcome, PatternError, Value};
use weft_registry::{AnnotationIndexBuilder, MetadataProvider, RegistryBuilder, RegistryConfig};

use crate::{Aspect, AspectContainer, AspectProvider, Proceed};

/// Capability every aspect stage is driven through.
pub const CAPABILITY: &str = "process";

type Stages = SmallVec<[Arc<dyn Aspect>; 4]>;

fn process_aspect<'a>(aspect: &Arc<dyn Aspect>, join_point: &mut JoinPoint<'a>, next: Proceed<'_, 'a>) -> Outcome {
	aspect.process(join_point, next)
}

/// Proxy entry point: weaves matched aspects around a call to the original method.
///
/// Cheap to clone and safe to share; every call builds its own join point and
/// pipeline and leaves no state behind.
#[derive(Clone)]
pub struct Weaver {
	matcher: AspectMatcher,
	aspects: Arc<dyn AspectProvider>,
}

impl fmt::Debug for Weaver {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Weaver").field("matcher", &self.matcher).finish_non_exhaustive()
	}
}

impl Weaver {
	pub fn new(matcher: AspectMatcher, aspects: Arc<dyn AspectProvider>) -> Self {
		Self { matcher, aspects }
	}

	pub fn builder() -> WeaverBuilder {
		WeaverBuilder::new()
	}

	pub fn matcher(&self) -> &AspectMatcher {
		&self.matcher
	}

	/// Aspect ids that would wrap `class_name::method_name`, in application order.
	pub fn aspects_for(&self, class_name: &str, method_name: &str) -> Resolved<'_> {
		self.matcher.resolve(class_name, method_name)
	}

	/// Calls `original` with `arguments`, threaded through every matched aspect.
	///
	/// With no matching aspect the original runs directly. Otherwise every
	/// aspect instance is looked up first, so a missing one fails before any
	/// aspect or the original runs. Failures raised by aspects or by the
	/// original come back unchanged.
	///
	/// # Errors
	///
	/// - [`ConfigError::UnknownAspect`] when a matched id has no instance.
	/// - Whatever an aspect or the original method returns.
	pub fn call(&self, class_name: &str, method_name: &str, arguments: Vec<Value>, original: &dyn Fn(&[Value]) -> Outcome) -> Outcome {
		let join_point = JoinPoint::new(class_name, method_name, arguments, Invoker::new(original));
		let resolved = self.matcher.resolve(class_name, method_name);
		if resolved.is_empty() {
			tracing::trace!(class = class_name, method = method_name, "weft.proxy.fast_path");
			return join_point.proceed();
		}

		let stages = self.stages(&resolved)?;
		let join_point = join_point.with_target(self.matcher.metadata().target(class_name, method_name));
		tracing::trace!(
			class = class_name,
			method = method_name,
			aspects = stages.len(),
			"weft.proxy.woven"
		);

		Pipeline::<Arc<dyn Aspect>, JoinPoint<'_>, Outcome>::with_capability(CAPABILITY, process_aspect)
			.through(stages)
			.send(join_point)
			.then(|join_point| join_point.proceed())
	}

	fn stages(&self, resolved: &[&str]) -> Result<Stages, ConfigError> {
		resolved
			.iter()
			.map(|&id| self.aspects.aspect(id).ok_or_else(|| ConfigError::UnknownAspect { aspect: id.to_owned() }))
			.collect()
	}
}

/// Assembles rules, metadata, and aspect instances into a [`Weaver`].
#[derive(Default)]
pub struct WeaverBuilder {
	rules: RegistryBuilder,
	metadata: AnnotationIndexBuilder,
	provider: Option<Arc<dyn MetadataProvider>>,
	aspects: AspectContainer,
}

impl fmt::Debug for WeaverBuilder {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("WeaverBuilder")
			.field("rules", &self.rules)
			.field("external_metadata", &self.provider.is_some())
			.field("aspects", &self.aspects)
			.finish_non_exhaustive()
	}
}

impl WeaverBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Binds an aspect instance to `id` and registers the rules it declares.
	pub fn aspect(&mut self, id: &str, aspect: Arc<dyn Aspect>) -> &mut Self {
		let classes = aspect.classes();
		if !classes.is_empty() {
			self.rules.classes(id, classes);
		}
		let annotations = aspect.annotations();
		if !annotations.is_empty() {
			self.rules.annotations(id, annotations);
		}
		self.aspects.insert(id, aspect);
		self
	}

	/// Rule registration beyond what aspects declare for themselves.
	pub fn rules(&mut self) -> &mut RegistryBuilder {
		&mut self.rules
	}

	/// Annotation and signature metadata for the stock index.
	pub fn metadata(&mut self) -> &mut AnnotationIndexBuilder {
		&mut self.metadata
	}

	/// Uses `provider` instead of the index assembled through [`Self::metadata`].
	pub fn metadata_provider(&mut self, provider: Arc<dyn MetadataProvider>) -> &mut Self {
		self.provider = Some(provider);
		self
	}

	/// Ingests every [`aspect_rules!`](weft_registry::aspect_rules) declaration.
	pub fn with_inventory(&mut self) -> &mut Self {
		self.rules.with_inventory();
		self
	}

	/// Applies a registry document's rules and metadata.
	pub fn config(&mut self, config: &RegistryConfig) -> &mut Self {
		config.apply(&mut self.rules, &mut self.metadata);
		self
	}

	/// Compiles every rule and freezes the weaver.
	///
	/// Aspect ids referenced by rules but never bound are not an error here;
	/// they surface as [`ConfigError::UnknownAspect`] on the first call they match.
	pub fn build(self) -> Result<Weaver, PatternError> {
		let Self {
			rules,
			metadata,
			provider,
			aspects,
		} = self;
		let registry = rules.build()?;
		let metadata = match provider {
			Some(provider) => provider,
			None => Arc::new(metadata.build()),
		};

		let unbound = registry
			.classes()
			.iter()
			.chain(registry.annotations().iter())
			.filter(|(id, _)| !aspects.contains(id))
			.count();
		if unbound > 0 {
			tracing::warn!(unbound, "rules reference aspects with no bound instance");
		}
		tracing::debug!(aspects = aspects.len(), "weft.proxy.build");

		Ok(Weaver::new(AspectMatcher::new(Arc::new(registry), metadata), Arc::new(aspects)))
	}
}
