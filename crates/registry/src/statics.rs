//! Static rule declarations collected via `inventory`.

/// Rules for one aspect, declared at compile time.
#[derive(Debug)]
pub struct AspectRules {
	pub aspect: &'static str,
	pub classes: &'static [&'static str],
	pub annotations: &'static [&'static str],
	/// Crate that declared the rules.
	pub crate_name: &'static str,
}

inventory::collect!(AspectRules);

/// Declares aspect rules for [`RegistryBuilder::with_inventory`](crate::RegistryBuilder::with_inventory).
///
/// ```ignore
/// weft_registry::aspect_rules!("audit", classes = ["App.Service.*"], annotations = ["Audited"]);
/// ```
#[macro_export]
macro_rules! aspect_rules {
	(
		$aspect:literal
		$(, classes = [$($class:literal),* $(,)?])?
		$(, annotations = [$($annotation:literal),* $(,)?])?
		$(,)?
	) => {
		$crate::inventory::submit! {
			$crate::AspectRules {
				aspect: $aspect,
				classes: &[$($($class),*)?],
				annotations: &[$($($annotation),*)?],
				crate_name: env!("CARGO_PKG_NAME"),
			}
		}
	};
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use crate::RegistryBuilder;

	crate::aspect_rules!("zz.static.trace", classes = ["Static.Service.*"]);
	crate::aspect_rules!("zz.static.cache", annotations = ["Static.Cacheable"]);
	crate::aspect_rules!("zz.static.audit", classes = ["Static.Repo::save"], annotations = ["Static.Audited"],);

	#[test]
	fn inventory_declarations_are_ingested_sorted() {
		let mut builder = RegistryBuilder::new();
		builder.with_inventory();
		let registry = builder.build().unwrap();

		let classes: Vec<&str> = registry.classes().iter().map(|(id, _)| id).filter(|id| id.starts_with("zz.static.")).collect();
		assert_eq!(classes, ["zz.static.audit", "zz.static.trace"]);

		let annotations: Vec<&str> = registry
			.annotations()
			.iter()
			.map(|(id, _)| id)
			.filter(|id| id.starts_with("zz.static."))
			.collect();
		assert_eq!(annotations, ["zz.static.audit", "zz.static.cache"]);
	}

	#[test]
	fn declarations_record_their_crate() {
		let declared: Vec<_> = inventory::iter::<crate::AspectRules>
			.into_iter()
			.filter(|rules| rules.aspect.starts_with("zz.static."))
			.collect();
		assert_eq!(declared.len(), 3);
		assert!(declared.iter().all(|rules| rules.crate_name == "weft-registry"));
	}
}
