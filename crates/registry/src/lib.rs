//! Boot-time aspect rule tables and annotation metadata.
//!
//! # Purpose
//!
//! This crate holds everything the aspect matcher reads: which aspects target
//! which classes and methods, and which annotations sit on which classes and
//! methods. Both are populated once at startup and are read-only afterwards.
//!
//! # Mental Model
//!
//! 1. **Collect:** a scanner (static [`aspect_rules!`] declarations, a
//!    [`RegistryConfig`] document, or explicit [`RegistryBuilder::register`]
//!    calls) feeds raw pattern strings into a [`RegistryBuilder`], and
//!    annotation markers into an [`AnnotationIndexBuilder`].
//! 2. **Compile:** [`RegistryBuilder::build`] compiles every pattern. A
//!    malformed pattern fails the build; it never degrades into a silent
//!    non-match.
//! 3. **Read:** the resulting [`RuleRegistry`] and [`AnnotationIndex`] are
//!    shared by reference and read concurrently without synchronization.
//!
//! # Key Types
//!
//! | Type | Role |
//! |------|------|
//! | [`RuleRegistry`] | Immutable rule tables, one per [`Category`]. |
//! | [`RuleTable`] | Aspect id to ordered rule list, in registration order. |
//! | [`Rule`] | One compiled pattern. |
//! | [`MetadataProvider`] | Read-only annotation and signature lookup. |
//! | [`AnnotationIndex`] | Stock [`MetadataProvider`] built at boot. |
//!
//! # Invariants
//!
//! - Aspect order inside a table is first-registration order; it drives the
//!   order of resolved aspects.
//! - Rule order inside an aspect is registration order.
//! - Tables are never mutated after [`RegistryBuilder::build`].

mod category;
/// Declarative TOML registry documents.
pub mod config;
mod metadata;
mod pattern;
mod registry;
mod statics;

pub use category::{Category, UnknownCategory};
pub use config::{AspectSpec, ClassSpec, LoadError, MethodSpec, RegistryConfig};
#[doc(hidden)]
pub use inventory;
pub use metadata::{AnnotationIndex, AnnotationIndexBuilder, MetadataProvider};
pub use pattern::{Rule, RuleKind};
pub use registry::{RegistryBuilder, RuleRegistry, RuleTable};
pub use statics::AspectRules;
