use std::fmt;
use std::str::FromStr;

/// Kind of rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
	/// Rules matched against the class name (and optionally the method name).
	Classes,
	/// Rules matched against annotation names on the class or method.
	Annotations,
}

impl Category {
	pub const ALL: [Category; 2] = [Category::Classes, Category::Annotations];

	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Classes => "classes",
			Self::Annotations => "annotations",
		}
	}

	pub(crate) const fn index(self) -> usize {
		match self {
			Self::Classes => 0,
			Self::Annotations => 1,
		}
	}
}

impl fmt::Display for Category {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A category name other than `classes` or `annotations`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown rule category {0:?}, expected \"classes\" or \"annotations\"")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
	type Err = UnknownCategory;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"classes" => Ok(Self::Classes),
			"annotations" => Ok(Self::Annotations),
			other => Err(UnknownCategory(other.to_owned())),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn names_round_trip() {
		for category in Category::ALL {
			assert_eq!(category.as_str().parse::<Category>(), Ok(category));
		}
		assert_eq!("aspects".parse::<Category>(), Err(UnknownCategory("aspects".into())));
	}
}
