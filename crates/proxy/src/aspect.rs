use weft_invocation::JoinPoint;
use weft_pipeline::Next;
use weft_primitives::Outcome;

/// Continuation handed to an aspect: the remaining aspects, then the original method.
pub type Proceed<'n, 'a> = Next<'n, JoinPoint<'a>, Outcome>;

/// Cross-cutting behavior woven around matched method calls.
///
/// An aspect may inspect or rewrite the join point, decide whether to call
/// `next` (zero, one, or many times), and transform or replace the outcome.
/// Aspect instances are shared across threads and calls; keep per-call state
/// on the stack.
pub trait Aspect: Send + Sync {
	fn process<'a>(&self, join_point: &mut JoinPoint<'a>, next: Proceed<'_, 'a>) -> Outcome;

	/// Class or `Class::method` patterns this aspect declares for itself.
	fn classes(&self) -> &[&str] {
		&[]
	}

	/// Annotation name patterns this aspect declares for itself.
	fn annotations(&self) -> &[&str] {
		&[]
	}
}

/// Aspect backed by a closure. See [`aspect_fn`].
#[derive(Clone, Copy)]
pub struct FnAspect<F> {
	f: F,
}

/// Wraps a closure as an [`Aspect`] with no declared rules.
///
/// ```
/// use weft_proxy::{aspect_fn, Aspect};
///
/// let passthrough = aspect_fn(|join_point, next| next.run(join_point));
/// assert!(passthrough.classes().is_empty());
/// ```
pub fn aspect_fn<F>(f: F) -> FnAspect<F>
where
	F: for<'a, 'n, 'j> Fn(&'j mut JoinPoint<'a>, Proceed<'n, 'a>) -> Outcome + Send + Sync,
{
	FnAspect { f }
}

impl<F> Aspect for FnAspect<F>
where
	F: for<'a, 'n, 'j> Fn(&'j mut JoinPoint<'a>, Proceed<'n, 'a>) -> Outcome + Send + Sync,
{
	fn process<'a>(&self, join_point: &mut JoinPoint<'a>, next: Proceed<'_, 'a>) -> Outcome {
		(self.f)(join_point, next)
	}
}

impl<F> std::fmt::Debug for FnAspect<F> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str("FnAspect(..)")
	}
}
