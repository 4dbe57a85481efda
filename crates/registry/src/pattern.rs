//! Rule pattern compilation and matching.
//!
//! Pattern grammar, for the `classes` category:
//!
//! | Pattern | Matches |
//! |---------|---------|
//! | `App.Service.UserService` | that exact class, any method |
//! | `App.Service.UserService::find` | that exact class and method |
//! | `App.Service.*` | any class the wildcard matches, any method |
//! | `App.*::find*` | class and method each matched by their own wildcard |
//!
//! A plain wildcard rule only ever constrains the class name. Any pattern
//! containing `::` is split first, so `Foo*::bar` is a qualified rule that
//! also pins the method, which is an extension over class wildcards.
//!
//! In the `annotations` category a pattern is either an exact annotation name
//! or a wildcard; `::` carries no meaning there.
//!
//! `*` stands for any substring. Everything else is literal, and every
//! wildcard is anchored at both ends.

use std::fmt;

use regex::Regex;
use weft_primitives::PatternError;

use crate::Category;

const SEPARATOR: &str = "::";

/// Shape of a compiled rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
	Exact,
	Qualified,
	Wildcard,
}

#[derive(Clone)]
enum Segment {
	Exact,
	Wildcard(Regex),
}

#[derive(Clone)]
enum Compiled {
	Exact,
	Qualified {
		class: Box<str>,
		class_matcher: Segment,
		method: Box<str>,
		method_matcher: Segment,
	},
	Wildcard(Regex),
}

/// One compiled rule pattern.
#[derive(Clone)]
pub struct Rule {
	source: Box<str>,
	compiled: Compiled,
}

impl fmt::Debug for Rule {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Rule")
			.field("pattern", &self.source)
			.field("kind", &self.kind())
			.finish()
	}
}

impl Rule {
	/// Compiles `pattern` under the grammar of `category`.
	///
	/// # Errors
	///
	/// Returns [`PatternError`] when the pattern (or a `Class::method`
	/// component) is empty, or when a wildcard cannot be compiled.
	pub fn compile(category: Category, pattern: &str) -> Result<Self, PatternError> {
		if pattern.is_empty() {
			return Err(PatternError::Empty { pattern: pattern.to_owned() });
		}

		let compiled = match category {
			Category::Classes => match pattern.split_once(SEPARATOR) {
				Some((class, method)) => {
					if class.is_empty() || method.is_empty() {
						return Err(PatternError::Empty { pattern: pattern.to_owned() });
					}
					Compiled::Qualified {
						class: class.into(),
						class_matcher: segment(pattern, class)?,
						method: method.into(),
						method_matcher: segment(pattern, method)?,
					}
				}
				None if is_wildcard(pattern) => Compiled::Wildcard(wildcard(pattern, pattern)?),
				None => Compiled::Exact,
			},
			Category::Annotations if is_wildcard(pattern) => Compiled::Wildcard(wildcard(pattern, pattern)?),
			Category::Annotations => Compiled::Exact,
		};

		Ok(Self {
			source: pattern.into(),
			compiled,
		})
	}

	/// The pattern as registered.
	pub fn pattern(&self) -> &str {
		&self.source
	}

	pub fn kind(&self) -> RuleKind {
		match self.compiled {
			Compiled::Exact => RuleKind::Exact,
			Compiled::Qualified { .. } => RuleKind::Qualified,
			Compiled::Wildcard(_) => RuleKind::Wildcard,
		}
	}

	/// Tests a class rule against a call target.
	///
	/// Exact and wildcard rules only look at the class name.
	pub fn matches_target(&self, class_name: &str, method_name: &str) -> bool {
		match &self.compiled {
			Compiled::Exact => &*self.source == class_name,
			Compiled::Qualified {
				class,
				class_matcher,
				method,
				method_matcher,
			} => segment_matches(class, class_matcher, class_name) && segment_matches(method, method_matcher, method_name),
			Compiled::Wildcard(re) => re.is_match(class_name),
		}
	}

	/// Tests an annotation rule against one annotation name.
	pub fn matches_name(&self, name: &str) -> bool {
		match &self.compiled {
			Compiled::Wildcard(re) => re.is_match(name),
			_ => &*self.source == name,
		}
	}
}

fn is_wildcard(pattern: &str) -> bool {
	pattern.contains('*')
}

fn segment(pattern: &str, part: &str) -> Result<Segment, PatternError> {
	if is_wildcard(part) {
		wildcard(pattern, part).map(Segment::Wildcard)
	} else {
		Ok(Segment::Exact)
	}
}

fn segment_matches(literal: &str, matcher: &Segment, candidate: &str) -> bool {
	match matcher {
		Segment::Exact => literal == candidate,
		Segment::Wildcard(re) => re.is_match(candidate),
	}
}

/// Compiles `part` into an anchored regex with `*` as "any substring".
fn wildcard(pattern: &str, part: &str) -> Result<Regex, PatternError> {
	let body = part.split('*').map(regex::escape).collect::<Vec<_>>().join(".*");
	Regex::new(&format!("^(?s:{body})$")).map_err(|err| PatternError::Compile {
		pattern: pattern.to_owned(),
		reason: err.to_string(),
	})
}
