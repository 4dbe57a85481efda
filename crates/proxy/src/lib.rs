//! Proxy entry point for aspect weaving.
//!
//! # Purpose
//!
//! Turns a plain method call into a woven one. The generated or hand-written
//! proxy for a class hands [`Weaver::call`] the class name, method name,
//! arguments, and a callable bound to the real method body; the weaver decides
//! which aspects apply and runs them around that body.
//!
//! # Mental Model
//!
//! ```text
//! call(class, method, args, original)
//!   -> JoinPoint { class, method, args, invoker = original }
//!   -> AspectMatcher::resolve(class, method)      ordered aspect ids
//!   -> AspectProvider::aspect(id) for every id    fails fast on unknown ids
//!   -> Pipeline(stages).send(join_point).then(|jp| jp.proceed())
//! ```
//!
//! When nothing matches, the original runs directly with the arguments and no
//! pipeline is built.
//!
//! # Key Types
//!
//! | Type | Role |
//! |------|------|
//! | [`Aspect`] | Behavior woven around matched calls. |
//! | [`AspectProvider`] | Resolves aspect ids to instances. |
//! | [`Weaver`] | The call-in point; immutable and shareable. |
//! | [`WeaverBuilder`] | Boot-time assembly of rules, metadata, and aspects. |
//! | [`Proxy`] | Wraps a [`Dispatchable`] target so its calls are woven. |
//!
//! # Invariants
//!
//! - Aspects run in resolution order; the original runs only when the last
//!   aspect delegates.
//! - Failures from aspects or the original reach the caller unchanged.
//! - No per-call state outlives the call.

mod aspect;
mod container;
mod dispatch;
mod weaver;

pub use aspect::{Aspect, FnAspect, Proceed, aspect_fn};
pub use container::{AspectContainer, AspectProvider};
pub use dispatch::{Dispatchable, Proxy};
pub use weaver::{CAPABILITY, Weaver, WeaverBuilder};
pub use weft_invocation::{Annotation, JoinPoint, ParamMap, Parameter, Signature};
pub use weft_primitives::{ConfigError, Error, Outcome, PatternError, Value};
pub use weft_registry::{RegistryConfig, aspect_rules};
