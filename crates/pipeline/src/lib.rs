//! Ordered chain-of-responsibility executor.
//!
//! A [`Pipeline`] runs a payload through a sequence of stages before it
//! reaches a destination handler. Each stage receives the payload together
//! with a [`Next`] continuation that runs the remainder of the chain.
//!
//! # Mental Model
//!
//! The continuation chain is composed from the last stage inward: the
//! destination is wrapped by the last stage, which is wrapped by the one
//! before it, and so on. Running the pipeline calls the first stage.
//!
//! A stage controls the rest of the chain through its continuation:
//!
//! | Calls to `next` | Effect |
//! |-----------------|--------|
//! | zero | short-circuit; later stages and the destination never run |
//! | one | plain before/after/around behavior |
//! | many | the remainder of the chain, destination included, reruns each time |
//!
//! With no stages the destination is invoked directly with the payload.
//!
//! # Example
//!
//! ```
//! use weft_pipeline::{Next, Pipeline, Stage};
//!
//! struct Double;
//!
//! impl Stage<i64, i64> for Double {
//! 	fn process(&self, payload: &mut i64, next: Next<'_, i64, i64>) -> i64 {
//! 		next.run(payload) * 2
//! 	}
//! }
//!
//! let result = Pipeline::new().through([Double, Double]).send(5).then(|n: &mut i64| *n + 1);
//! assert_eq!(result, 24);
//! ```

use std::rc::Rc;
use std::sync::Arc;

/// Capability label used when no explicit one is given.
pub const DEFAULT_CAPABILITY: &str = "process";

/// Continuation handed to a stage: runs every later stage and the destination.
///
/// A `Next` may be run any number of times while the stage holds it.
pub struct Next<'a, P, R> {
	chain: &'a dyn Fn(&mut P) -> R,
}

impl<P, R> Clone for Next<'_, P, R> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<P, R> Copy for Next<'_, P, R> {}

impl<'a, P, R> Next<'a, P, R> {
	/// Wraps a borrowed continuation.
	pub fn new(chain: &'a dyn Fn(&mut P) -> R) -> Self {
		Self { chain }
	}

	/// Runs the rest of the chain with `payload`.
	#[inline]
	pub fn run(&self, payload: &mut P) -> R {
		(self.chain)(payload)
	}
}

/// Single-operation capability every stage exposes.
pub trait Stage<P, R> {
	/// Handles `payload`, optionally delegating to `next`.
	fn process(&self, payload: &mut P, next: Next<'_, P, R>) -> R;
}

impl<P, R, T> Stage<P, R> for &T
where
	T: Stage<P, R> + ?Sized,
{
	fn process(&self, payload: &mut P, next: Next<'_, P, R>) -> R {
		(**self).process(payload, next)
	}
}

impl<P, R, T> Stage<P, R> for Box<T>
where
	T: Stage<P, R> + ?Sized,
{
	fn process(&self, payload: &mut P, next: Next<'_, P, R>) -> R {
		(**self).process(payload, next)
	}
}

impl<P, R, T> Stage<P, R> for Rc<T>
where
	T: Stage<P, R> + ?Sized,
{
	fn process(&self, payload: &mut P, next: Next<'_, P, R>) -> R {
		(**self).process(payload, next)
	}
}

impl<P, R, T> Stage<P, R> for Arc<T>
where
	T: Stage<P, R> + ?Sized,
{
	fn process(&self, payload: &mut P, next: Next<'_, P, R>) -> R {
		(**self).process(payload, next)
	}
}

/// Operation invoked on each stage.
///
/// Selecting it through [`Pipeline::via`] lets stage types that do not
/// implement [`Stage`] take part in a pipeline.
pub type Via<S, P, R> = fn(&S, &mut P, Next<'_, P, R>) -> R;

type Chain<'c, P, R> = Box<dyn Fn(&mut P) -> R + 'c>;

fn process_stage<S, P, R>(stage: &S, payload: &mut P, next: Next<'_, P, R>) -> R
where
	S: Stage<P, R>,
{
	stage.process(payload, next)
}

/// Pipeline under construction: capability and stages, no payload yet.
pub struct Pipeline<S, P, R> {
	capability: &'static str,
	via: Via<S, P, R>,
	stages: Vec<S>,
}

impl<S, P, R> Default for Pipeline<S, P, R>
where
	S: Stage<P, R>,
{
	fn default() -> Self {
		Self::new()
	}
}

impl<S, P, R> Pipeline<S, P, R>
where
	S: Stage<P, R>,
{
	/// Creates an empty pipeline calling [`Stage::process`] on each stage.
	pub fn new() -> Self {
		Self::with_capability(DEFAULT_CAPABILITY, process_stage::<S, P, R>)
	}
}

impl<S, P, R> Pipeline<S, P, R> {
	/// Creates an empty pipeline calling `via` on each stage.
	pub fn with_capability(capability: &'static str, via: Via<S, P, R>) -> Self {
		Self {
			capability,
			via,
			stages: Vec::new(),
		}
	}

	/// Declares the capability every stage is driven through.
	pub fn via(mut self, capability: &'static str, via: Via<S, P, R>) -> Self {
		self.capability = capability;
		self.via = via;
		self
	}

	/// Appends stages, preserving their order.
	pub fn through<I>(mut self, stages: I) -> Self
	where
		I: IntoIterator<Item = S>,
	{
		self.stages.extend(stages);
		self
	}

	/// Capability label declared for this pipeline.
	pub fn capability(&self) -> &'static str {
		self.capability
	}

	/// Number of stages.
	pub fn len(&self) -> usize {
		self.stages.len()
	}

	/// Returns `true` when the pipeline degenerates to a direct call.
	pub fn is_empty(&self) -> bool {
		self.stages.is_empty()
	}

	/// Supplies the payload, yielding a pipeline ready to run.
	pub fn send(self, payload: P) -> Loaded<S, P, R> {
		Loaded { pipeline: self, payload }
	}
}

/// Pipeline with a payload, waiting for its destination.
pub struct Loaded<S, P, R> {
	pipeline: Pipeline<S, P, R>,
	payload: P,
}

impl<S, P, R> Loaded<S, P, R> {
	/// Runs the pipeline, ending at `destination` once every stage has delegated.
	pub fn then<F>(self, destination: F) -> R
	where
		F: Fn(&mut P) -> R,
	{
		let Self { pipeline, mut payload } = self;
		let Pipeline { capability, via, stages } = pipeline;

		if stages.is_empty() {
			return destination(&mut payload);
		}

		tracing::trace!(capability, stages = stages.len(), "weft.pipeline.run");

		let destination: Chain<'_, P, R> = Box::new(destination);
		let chain = stages.iter().rev().fold(destination, |next, stage| {
			Box::new(move |payload: &mut P| via(stage, payload, Next::new(&*next)))
		});
		chain(&mut payload)
	}

	/// Borrows the payload before running.
	pub fn payload(&self) -> &P {
		&self.payload
	}
}

#[cfg(test)]
mod tests;
