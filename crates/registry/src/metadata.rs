use rustc_hash::FxHashMap as HashMap;
use weft_invocation::{Annotation, Signature, Target};

/// Read-only lookup of annotation markers and method signatures.
///
/// Populated once at boot by whatever scanner the host uses; the matcher
/// and the proxy entry point only read from it, possibly from many threads.
pub trait MetadataProvider: Send + Sync {
	/// Annotations present on the class itself.
	fn class_annotations(&self, class_name: &str) -> &[Annotation];

	/// Annotations present on one method of the class.
	fn method_annotations(&self, class_name: &str, method_name: &str) -> &[Annotation];

	/// Declared signature, or `None` when the method is unknown.
	fn signature(&self, class_name: &str, method_name: &str) -> Option<&Signature>;

	/// Everything known about one call target.
	fn target(&self, class_name: &str, method_name: &str) -> Target<'_> {
		Target {
			signature: self.signature(class_name, method_name),
			class_annotations: self.class_annotations(class_name),
			method_annotations: self.method_annotations(class_name, method_name),
		}
	}
}

#[derive(Debug, Default)]
struct MethodEntry {
	annotations: Vec<Annotation>,
	signature: Option<Signature>,
}

#[derive(Debug, Default)]
struct ClassEntry {
	annotations: Vec<Annotation>,
	methods: HashMap<Box<str>, MethodEntry>,
}

/// Boot-time index of annotations and signatures, keyed by class then method.
#[derive(Debug, Default)]
pub struct AnnotationIndex {
	classes: HashMap<Box<str>, ClassEntry>,
}

impl AnnotationIndex {
	pub fn builder() -> AnnotationIndexBuilder {
		AnnotationIndexBuilder::default()
	}

	/// Number of classes with any recorded metadata.
	pub fn len(&self) -> usize {
		self.classes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.classes.is_empty()
	}

	fn method(&self, class_name: &str, method_name: &str) -> Option<&MethodEntry> {
		self.classes.get(class_name)?.methods.get(method_name)
	}
}

impl MetadataProvider for AnnotationIndex {
	fn class_annotations(&self, class_name: &str) -> &[Annotation] {
		self.classes.get(class_name).map(|c| c.annotations.as_slice()).unwrap_or_default()
	}

	fn method_annotations(&self, class_name: &str, method_name: &str) -> &[Annotation] {
		self.method(class_name, method_name).map(|m| m.annotations.as_slice()).unwrap_or_default()
	}

	fn signature(&self, class_name: &str, method_name: &str) -> Option<&Signature> {
		self.method(class_name, method_name)?.signature.as_ref()
	}
}

/// Mutable staging area for an [`AnnotationIndex`].
#[derive(Debug, Default)]
pub struct AnnotationIndexBuilder {
	index: AnnotationIndex,
}

impl AnnotationIndexBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	fn class_entry(&mut self, class_name: &str) -> &mut ClassEntry {
		self.index.classes.entry(Box::from(class_name)).or_default()
	}

	fn method_entry(&mut self, class_name: &str, method_name: &str) -> &mut MethodEntry {
		self.class_entry(class_name).methods.entry(Box::from(method_name)).or_default()
	}

	/// Records a class-level annotation. A repeated name keeps the first entry.
	pub fn annotate_class(&mut self, class_name: &str, annotation: Annotation) -> &mut Self {
		push_unique(&mut self.class_entry(class_name).annotations, annotation, class_name);
		self
	}

	/// Records a method-level annotation. A repeated name keeps the first entry.
	pub fn annotate_method(&mut self, class_name: &str, method_name: &str, annotation: Annotation) -> &mut Self {
		push_unique(&mut self.method_entry(class_name, method_name).annotations, annotation, class_name);
		self
	}

	/// Declares a method and its signature.
	pub fn method(&mut self, class_name: &str, method_name: &str, signature: Signature) -> &mut Self {
		self.method_entry(class_name, method_name).signature = Some(signature);
		self
	}

	pub fn build(self) -> AnnotationIndex {
		tracing::debug!(classes = self.index.len(), "weft.registry.metadata");
		self.index
	}
}

fn push_unique(annotations: &mut Vec<Annotation>, annotation: Annotation, class_name: &str) {
	if annotations.iter().any(|a| a.name == annotation.name) {
		tracing::debug!(class = class_name, annotation = &*annotation.name, "duplicate annotation ignored");
		return;
	}
	annotations.push(annotation);
}
