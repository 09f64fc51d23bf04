//! Property tests for flattening, parameter typing and the write guard.

use std::collections::HashMap;
use std::rc::Rc;

use proptest::prelude::*;
use waymark_router::{
	Branch, Endpoint, MemoryHistory, NavigationEngine, ParamKind, RejectionReason, RouteNode, RouteTree,
	Router, flatten,
	param, parse_raw,
};

fn block_on<F: std::future::Future>(future: F) -> F::Output {
	tokio::runtime::Builder::new_current_thread()
		.build()
		.unwrap()
		.block_on(future)
}

/// Builds `root -> s0 -> :p0 -> s1 -> :p1 ...` from a list of requiredness flags.
fn chain(required: &[bool]) -> RouteTree {
	let mut node: RouteNode = Branch::new().into();
	for (i, req) in required.iter().enumerate().rev() {
		let p = param(format!("p{}", i), |b| b.number(*req)).then(node);
		node = Branch::new().route(format!("s{}", i), p).into();
	}
	RouteTree::new(node).unwrap()
}

proptest! {
	#[test]
	fn prop_parameter_endpoints_follow_requiredness(required in proptest::collection::vec(any::<bool>(), 1..5)) {
		let tree = chain(&required);
		let endpoints: Vec<String> = flatten(&tree).iter().map(ToString::to_string).collect();

		let mut prefix = String::new();
		for (i, req) in required.iter().enumerate() {
			prefix.push_str(&format!("/s{}", i));
			let before = endpoints.contains(&prefix);
			prop_assert_eq!(before, !req, "endpoint {} for required={}", prefix, req);
			prefix.push_str(&format!("/:p{}", i));
			prop_assert!(endpoints.contains(&prefix), "missing {}", prefix);
		}
	}

	#[test]
	fn prop_flatten_has_no_duplicates(required in proptest::collection::vec(any::<bool>(), 0..5)) {
		let endpoints = flatten(&chain(&required));
		let unique: std::collections::HashSet<&Endpoint> = endpoints.iter().collect();
		prop_assert_eq!(unique.len(), endpoints.len());
		prop_assert_eq!(endpoints[0].to_string(), "/");
	}

	#[test]
	fn prop_number_round_trips_through_url(v in any::<f64>().prop_filter("finite", |v| v.is_finite())) {
		let tree = RouteTree::new(Branch::new().route("n", param("v", |b| b.number(true)))).unwrap();
		let history = Rc::new(MemoryHistory::new("/n/0"));
		let router = Router::builder(tree).engine(Rc::clone(&history)).build().unwrap();
		block_on(router.start()).unwrap();

		let state = router.state().child("n").unwrap();
		state.set("v", v).unwrap();

		let path = history.current_path().unwrap();
		let raw = path.rsplit('/').next().unwrap();
		let decoded = urlencoding::decode(raw).unwrap();
		let parsed = router.param_map().setter("v").unwrap()(Some(&*decoded));

		prop_assert_eq!(parsed, parse_raw(ParamKind::Number, Some(&v.to_string())));
		prop_assert_eq!(state.get::<f64>("v"), Some(v));
	}

	#[test]
	fn prop_inactive_writes_never_stick(value in "[a-z0-9]{1,8}") {
		let tree = RouteTree::new(
			Branch::new()
				.route("a", param("x", |b| b.string(false)))
				.route("b", param("y", |b| b.string(false))),
		)
		.unwrap();
		let router = Router::builder(tree)
			.engine(Rc::new(MemoryHistory::new("/a/start")))
			.build()
			.unwrap();
		block_on(router.start()).unwrap();

		let b = router.state().child("b").unwrap();
		let err = b.set("y", value.as_str()).unwrap_err();
		prop_assert_eq!(err.rejection(), Some(RejectionReason::NotActive));
		prop_assert_eq!(b.value("y"), None);

		let a = router.state().child("a").unwrap();
		a.set("x", value.as_str()).unwrap();
		prop_assert_eq!(a.get::<String>("x"), Some(value.clone()));
		let active = router.active_params();
		prop_assert_eq!(active["x"].as_str(), value.as_str());
	}

	#[test]
	fn prop_resolve_then_match_recovers_values(a in "[^/]{1,12}", b in any::<u32>()) {
		let endpoint = Endpoint::parse("/x/:a/y/:b");
		let params = HashMap::from([
			("a".to_string(), a.clone()),
			("b".to_string(), b.to_string()),
		]);
		let path = endpoint.resolve(&params).unwrap();
		let matched = waymark_router::PathPattern::new(&endpoint).unwrap().matches(&path).unwrap();
		prop_assert_eq!(matched, params);
	}
}
