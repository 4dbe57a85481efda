//! Invocation context for intercepted method calls.
//!
//! A [`JoinPoint`] captures one call: the target class and method, the
//! positional arguments, and an [`Invoker`] bound to the real method body.
//! Aspects receive the join point, may rewrite its arguments, and call
//! [`JoinPoint::proceed`] as many times as they need.

/// Join point and bound invoker.
pub mod join_point;
/// Method signatures and annotation markers supplied by the metadata layer.
pub mod metadata;

pub use join_point::{Invoker, JoinPoint, ParamMap, Target};
pub use metadata::{Annotation, Parameter, Signature};
