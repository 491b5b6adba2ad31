//! Golden tests: generate clients for the catalog fixture and compare them
//! with the checked-in Java sources.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use jaxgen_core::{
    BindingPolicy, ClientGenerator, DescriptorBundle, GenerateError, GeneratorOptions,
    TypeIntrospect,
};

const CATALOG: &str = include_str!("fixtures/catalog.json");

fn bundle() -> DescriptorBundle {
    serde_json::from_str(CATALOG).expect("catalog fixture parses")
}

fn generate(name: &str, options: GeneratorOptions) -> (String, String) {
    let bundle = bundle();
    let resource = bundle
        .resources()
        .find(|ty| ty.qualified_name() == name)
        .expect("resource present");
    let file = ClientGenerator::new(options)
        .generate(resource, &bundle)
        .unwrap();
    (
        file.relative_path().to_string_lossy().replace('\\', "/"),
        file.to_source(),
    )
}

fn assert_golden(actual: &str, expected: &str) {
    assert_eq!(actual.trim_end(), expected.trim_end());
}

#[test]
fn test_only_rooted_types_are_resources() {
    let bundle = bundle();
    let names: Vec<_> = bundle.resources().map(|ty| ty.qualified_name()).collect();
    assert_eq!(
        names,
        vec!["com.acme.catalog.ItemEndpoint", "com.acme.catalog.StockEndpoint"]
    );
}

#[test]
fn test_interface_client() {
    let (path, source) = generate("com.acme.catalog.ItemEndpoint", GeneratorOptions::default());
    assert_eq!(path, "com/acme/catalog/ItemEndpointClient.java");
    assert_golden(&source, include_str!("expected/ItemEndpointClient.java"));
}

#[test]
fn test_interface_client_ignores_async_mode() {
    let options = GeneratorOptions {
        async_mode: true,
        ..GeneratorOptions::default()
    };
    let (path, source) = generate("com.acme.catalog.ItemEndpoint", options);
    assert_eq!(path, "com/acme/catalog/ItemEndpointClient.java");
    assert_golden(&source, include_str!("expected/ItemEndpointClient.java"));
}

#[test]
fn test_class_client() {
    let (path, source) = generate("com.acme.catalog.StockEndpoint", GeneratorOptions::default());
    assert_eq!(path, "com/acme/catalog/StockEndpointClient.java");
    assert_golden(&source, include_str!("expected/StockEndpointClient.java"));
}

#[test]
fn test_async_class_client() {
    let options = GeneratorOptions {
        async_mode: true,
        ..GeneratorOptions::default()
    };
    let (path, source) = generate("com.acme.catalog.StockEndpoint", options);
    assert_eq!(path, "com/acme/catalog/StockEndpointAsyncClient.java");
    assert_golden(&source, include_str!("expected/StockEndpointAsyncClient.java"));
}

#[test]
fn test_strict_policy_rejects_unreadable_bean_member() {
    let bundle = bundle();
    let generator = ClientGenerator::new(GeneratorOptions {
        async_mode: false,
        policy: BindingPolicy::Strict,
    });

    let mut resources = bundle.resources();
    let items = resources.next().unwrap();
    let err = generator.generate(items, &bundle).unwrap_err();
    assert_eq!(
        err,
        GenerateError::InaccessibleBeanMember {
            bean: "com.acme.catalog.ItemFilter".into(),
            member: "internal".into(),
        }
    );

    // the class resource has nothing ambiguous, strict output is identical
    let stock = resources.next().unwrap();
    let source = generator.generate_source(stock, &bundle).unwrap();
    assert_golden(&source, include_str!("expected/StockEndpointClient.java"));
}

#[test]
fn test_missing_bean_type_is_fatal() {
    let mut bundle = bundle();
    bundle
        .types
        .retain(|ty| ty.name != "com.acme.catalog.ItemFilter");
    let err = ClientGenerator::default()
        .generate(&bundle.types[0], &bundle)
        .unwrap_err();
    assert_eq!(
        err,
        GenerateError::UnknownBeanType("com.acme.catalog.ItemFilter".into())
    );
}
