use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;
use weft_proxy::{Aspect, JoinPoint, Outcome, Proceed, RegistryConfig, Value, Weaver};

const DOC: &str = r#"
[[aspect]]
id = "cache"
annotations = ["Cacheable"]

[[aspect]]
id = "audit"
classes = ["App.Service.*::save*"]

[[class]]
name = "App.Service.UserService"

[[class.method]]
name = "find"
annotations = [{ name = "Cacheable", value = { key = "user" } }]
parameters = [{ name = "id" }, { name = "fresh", default = false }]
"#;

/// Answers from the annotation value without running the method.
struct Cache;

impl Aspect for Cache {
	fn process<'a>(&self, join_point: &mut JoinPoint<'a>, next: Proceed<'_, 'a>) -> Outcome {
		let Some(cacheable) = join_point.annotation("Cacheable") else {
			return next.run(join_point);
		};
		let params = join_point.parameter_map()?;
		Ok(json!({ "cached": cacheable.value["key"], "params": params.into_value() }))
	}
}

struct Audit;

impl Aspect for Audit {
	fn process<'a>(&self, join_point: &mut JoinPoint<'a>, next: Proceed<'_, 'a>) -> Outcome {
		let outcome = next.run(join_point)?;
		Ok(json!({ "audited": join_point.method_name(), "result": outcome }))
	}
}

fn weaver() -> Weaver {
	let config: RegistryConfig = DOC.parse().unwrap();
	let mut builder = Weaver::builder();
	builder
		.config(&config)
		.aspect("cache", Arc::new(Cache))
		.aspect("audit", Arc::new(Audit));
	builder.build().unwrap()
}

fn original(arguments: &[Value]) -> Outcome {
	Ok(Value::Array(arguments.to_vec()))
}

#[test]
fn document_rules_and_metadata_drive_weaving() {
	let weaver = weaver();

	assert_eq!(
		weaver.call("App.Service.UserService", "find", vec![json!(42)], &original).unwrap(),
		json!({ "cached": "user", "params": { "id": 42, "fresh": false } })
	);
	assert_eq!(
		weaver.call("App.Service.UserService", "saveAll", vec![json!(1)], &original).unwrap(),
		json!({ "audited": "saveAll", "result": [1] })
	);
	assert_eq!(weaver.call("App.Service.UserService", "delete", vec![json!(1)], &original).unwrap(), json!([1]));
	assert!(weaver.aspects_for("App.Other.UserService", "save").is_empty());
}
