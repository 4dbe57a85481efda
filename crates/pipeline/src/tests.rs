use std::cell::{Cell, RefCell};

use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;

/// Records entry and exit around its continuation.
struct Trace<'a> {
	name: &'static str,
	log: &'a RefCell<Vec<String>>,
}

impl Stage<Vec<&'static str>, usize> for Trace<'_> {
	fn process(&self, payload: &mut Vec<&'static str>, next: Next<'_, Vec<&'static str>, usize>) -> usize {
		self.log.borrow_mut().push(format!("{}:before", self.name));
		payload.push(self.name);
		let result = next.run(payload);
		self.log.borrow_mut().push(format!("{}:after", self.name));
		result
	}
}

/// Returns its own value without delegating.
struct Halt(usize);

impl<P> Stage<P, usize> for Halt {
	fn process(&self, _payload: &mut P, _next: Next<'_, P, usize>) -> usize {
		self.0
	}
}

/// Runs the continuation `times` times and returns the last result.
struct Repeat(usize);

impl Stage<u32, u32> for Repeat {
	fn process(&self, payload: &mut u32, next: Next<'_, u32, u32>) -> u32 {
		let mut last = 0;
		for _ in 0..self.0 {
			last = next.run(payload);
		}
		last
	}
}

#[test]
fn stages_wrap_destination_in_order() {
	let log = RefCell::new(Vec::new());
	let stages = vec![Trace { name: "s1", log: &log }, Trace { name: "s2", log: &log }];

	let result = Pipeline::new().through(stages).send(Vec::new()).then(|seen: &mut Vec<&'static str>| {
		log.borrow_mut().push("destination".to_string());
		assert_eq!(seen.as_slice(), ["s1", "s2"]);
		seen.len()
	});

	assert_eq!(result, 2);
	assert_eq!(log.into_inner(), ["s1:before", "s2:before", "destination", "s2:after", "s1:after"]);
}

#[test]
fn zero_stages_call_destination_directly() {
	let pipeline: Pipeline<Halt, u32, usize> = Pipeline::new();
	assert!(pipeline.is_empty());
	let result = pipeline.send(41).then(|n: &mut u32| *n as usize + 1);
	assert_eq!(result, 42);
}

#[test]
fn short_circuit_skips_remaining_stages_and_destination() {
	let log = RefCell::new(Vec::new());
	let called = Cell::new(false);
	let stages: Vec<Box<dyn Stage<Vec<&'static str>, usize> + '_>> =
		vec![Box::new(Halt(7)), Box::new(Trace { name: "s2", log: &log })];

	let result = Pipeline::new().through(stages).send(Vec::new()).then(|_: &mut Vec<&'static str>| -> usize {
		called.set(true);
		0
	});

	assert_eq!(result, 7);
	assert!(log.borrow().is_empty());
	assert!(!called.get());
}

#[rstest]
#[case(1, 1)]
#[case(2, 2)]
#[case(3, 3)]
fn repeated_continuation_reruns_destination(#[case] times: usize, #[case] expected_calls: u32) {
	let calls = Cell::new(0u32);
	let result = Pipeline::new().through([Repeat(times)]).send(10).then(|n: &mut u32| {
		calls.set(calls.get() + 1);
		*n + calls.get()
	});

	assert_eq!(calls.get(), expected_calls);
	assert_eq!(result, 10 + expected_calls);
}

#[test]
fn nested_repeats_multiply_destination_runs() {
	let calls = Cell::new(0u32);
	Pipeline::new().through([Repeat(2), Repeat(3)]).send(0).then(|_: &mut u32| {
		calls.set(calls.get() + 1);
		0
	});
	assert_eq!(calls.get(), 6);
}

#[test]
fn payload_mutations_are_visible_downstream() {
	struct Bump;

	impl Stage<u32, u32> for Bump {
		fn process(&self, payload: &mut u32, next: Next<'_, u32, u32>) -> u32 {
			*payload += 10;
			next.run(payload)
		}
	}

	let result = Pipeline::new().through([Bump, Bump]).send(1).then(|n: &mut u32| *n);
	assert_eq!(result, 21);
}

#[test]
fn via_drives_stages_without_stage_impl() {
	struct Tagger(&'static str);

	fn tag(stage: &Tagger, payload: &mut String, next: Next<'_, String, String>) -> String {
		payload.push_str(stage.0);
		next.run(payload)
	}

	let pipeline = Pipeline::with_capability("tag", tag).through([Tagger("a"), Tagger("b")]);
	assert_eq!(pipeline.capability(), "tag");
	assert_eq!(pipeline.len(), 2);

	let result = pipeline.send(String::new()).then(|s: &mut String| s.clone());
	assert_eq!(result, "ab");
}

#[test]
fn via_replaces_default_capability() {
	fn skip(_: &Repeat, payload: &mut u32, next: Next<'_, u32, u32>) -> u32 {
		next.run(payload)
	}

	let calls = Cell::new(0u32);
	let pipeline = Pipeline::new().via("skip", skip).through([Repeat(5)]);
	assert_eq!(pipeline.capability(), "skip");
	pipeline.send(0).then(|_: &mut u32| {
		calls.set(calls.get() + 1);
		0
	});
	assert_eq!(calls.get(), 1);
}

#[test]
fn shared_stages_run_through_arc() {
	let stage: Arc<dyn Stage<u32, u32>> = Arc::new(Repeat(2));
	let calls = Cell::new(0u32);
	let loaded = Pipeline::new().through([stage.clone(), stage]).send(3);
	assert_eq!(*loaded.payload(), 3);
	loaded.then(|n: &mut u32| {
		calls.set(calls.get() + 1);
		*n
	});
	assert_eq!(calls.get(), 4);
}
