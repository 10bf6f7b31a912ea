//! Integration tests for reference resolution, typed access and prefix views
//! working together.

#![allow(unsafe_code)] // For env var manipulation in tests

use proptest::prelude::*;
use std::collections::HashMap;
use std::time::Duration;
use xref_config::prelude::*;

fn named(sources: Vec<(&str, Store)>) -> HashMap<String, Store> {
    sources
        .into_iter()
        .map(|(name, store)| (name.to_string(), store))
        .collect()
}

#[test]
fn test_single_hop_resolution() {
    let config = Config::new(
        Store::new().with("a", "${other:b}"),
        named(vec![("other", Store::new().with("b", "42"))]),
    )
    .unwrap();

    assert_eq!(config.get_string("a").unwrap(), "42");
    assert_eq!(config.get_int("a").unwrap(), 42);
}

#[test]
fn test_transitive_resolution() {
    let config = Config::new(
        Store::new().with("a", "${x:k1}"),
        named(vec![
            ("x", Store::new().with("k1", "${y:k2}")),
            ("y", Store::new().with("k2", "final")),
        ]),
    )
    .unwrap();

    assert_eq!(config.get("a").unwrap().into_string().unwrap(), "final");
}

#[test]
fn test_missing_source_is_fatal() {
    let result = Config::new(Store::new().with("a", "${typo:b}"), HashMap::new());
    match result {
        Err(ConfigError::SourceNotFound { source_name, .. }) => assert_eq!(source_name, "typo"),
        other => panic!("expected SourceNotFound, got {other:?}"),
    }
}

#[test]
fn test_missing_key_is_fatal() {
    let result = Config::new(
        Store::new().with("a", "${other:absent}"),
        named(vec![("other", Store::new().with("present", 1))]),
    );
    assert!(matches!(
        result,
        Err(ConfigError::ReferenceKeyNotFound { ref key, .. }) if key == "absent"
    ));
}

#[test]
fn test_circular_chain_is_fatal() {
    let result = Config::new(
        Store::new().with("a", "${x:loop}"),
        named(vec![
            ("x", Store::new().with("loop", "${y:loop}")),
            ("y", Store::new().with("loop", "${x:loop}")),
        ]),
    );
    assert!(matches!(result, Err(ConfigError::CircularReference { .. })));
}

#[test]
fn test_environment_binding() {
    unsafe {
        std::env::set_var("XREF_IT_FOO", "bar");
    }
    let config = Config::new(Store::new().with("foo", "${env:XREF_IT_FOO}"), HashMap::new()).unwrap();
    assert_eq!(config.get_string("foo").unwrap(), "bar");
}

#[test]
fn test_missing_environment_variable_is_fatal() {
    let result = Config::new(
        Store::new().with("foo", "${env:XREF_IT_SURELY_NOT_SET}"),
        HashMap::new(),
    );
    assert!(matches!(result, Err(ConfigError::ReferenceKeyNotFound { .. })));
}

#[test]
fn test_caller_cannot_shadow_reserved_sources() {
    let config = Config::new(
        Store::new().with("a", "${this:b}").with("b", "primary"),
        named(vec![("this", Store::new().with("b", "imposter"))]),
    )
    .unwrap();

    assert_eq!(config.get_string("a").unwrap(), "primary");
}

#[test]
fn test_literals_pass_through() {
    let config = Config::new(
        Store::new()
            .with("embedded", "jdbc:${other:b}")
            .with("dollar", "$5")
            .with("braces", "${}")
            .with("number", 7),
        named(vec![("other", Store::new().with("b", "x"))]),
    )
    .unwrap();

    assert_eq!(config.get_string("embedded").unwrap(), "jdbc:${other:b}");
    assert_eq!(config.get_string("dollar").unwrap(), "$5");
    assert_eq!(config.get_string("braces").unwrap(), "${}");
    assert_eq!(config.get_int("number").unwrap(), 7);
}

#[test]
fn test_server_style_defaults_through_view() {
    let config = Config::new(
        Store::new().with("server.readtimeout", "${ops:timeouts.read}"),
        named(vec![("ops", Store::new().with("timeouts.read", "30s"))]),
    )
    .unwrap();

    let server = config.of("server");
    server.set_default("bodylimit", 4 * 1024 * 1024);
    server.set_default("readtimeout", "10s");
    server.set_default("healthcheck.endpoints.liveness", "/__monitor/live");

    assert_eq!(server.get_int("bodylimit").unwrap(), 4 * 1024 * 1024);
    assert_eq!(server.get_duration("readtimeout").unwrap(), Duration::from_secs(30));
    assert_eq!(
        config
            .get_string("server.healthcheck.endpoints.liveness")
            .unwrap(),
        "/__monitor/live"
    );
}

#[test]
fn test_client_style_base_url_from_reference() {
    let config = Config::new(
        Store::new().with("clients.orders.baseurl", "${this:hosts.orders}")
            .with("hosts.orders", "http://orders.internal"),
        HashMap::new(),
    )
    .unwrap();

    let client = config.of("clients").of("orders");
    assert_eq!(client.get_string("baseurl").unwrap(), "http://orders.internal");
}

#[test]
fn test_views_are_shared_not_copied() {
    let config = Config::new(Store::new(), HashMap::new()).unwrap();
    let view = config.of("feature");

    view.set("enabled", true);
    assert!(config.get_bool("feature.enabled").unwrap());

    config.set("feature.enabled", false);
    assert!(!view.get_bool("enabled").unwrap());
}

#[test]
fn test_config_is_shareable_across_threads() {
    let config = Config::new(Store::new().with("workers", 4), HashMap::new()).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let config = config.clone();
            std::thread::spawn(move || {
                config.set(&format!("worker.{i}"), i);
                config.get_int("workers").unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 4);
    }
    assert_eq!(config.of("worker").keys().len(), 4);
}

proptest! {
    #[test]
    fn prop_prefix_equivalence(
        prefix in "[a-z]{1,6}(\\.[a-z]{1,6}){0,2}",
        key in "[a-z]{1,6}(\\.[a-z]{1,6}){0,2}",
        value in "[ -~]{0,24}",
    ) {
        let config = Config::new(Store::new(), HashMap::new()).unwrap();
        config.set(&format!("{prefix}.{key}"), value.clone());

        prop_assert_eq!(
            config.get_string(&format!("{prefix}.{key}")).unwrap(),
            config.of(&prefix).get_string(&key).unwrap()
        );
        prop_assert_eq!(config.of(&prefix).get_string(&key).unwrap(), value);
    }

    #[test]
    fn prop_non_reference_strings_are_untouched(value in "[^$]{0,32}") {
        let config = Config::new(Store::new().with("k", value.clone()), HashMap::new()).unwrap();
        prop_assert_eq!(config.get_string("k").unwrap(), value);
    }
}
