//! End-to-end runs of the batch driver against temporary descriptor trees.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use clap::Parser;
use jaxgen_cli::{Cli, Outcome, execute};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const ORDERS_YAML: &str = r#"
types:
  - name: com.acme.shop.OrderEndpoint
    interface: true
    annotations:
      - path: orders
      - produces: [application/json]
    methods:
      - name: search
        returns: java.util.List<com.acme.shop.Order>
        annotations: [GET]
        params:
          - type: com.acme.shop.OrderQuery
            annotations: [bean_param]
"#;

const QUERY_JSON: &str = r#"{
  "types": [{
    "name": "com.acme.shop.OrderQuery",
    "fields": [{"name": "status", "type": "String", "annotations": [{"query_param": "status"}]}]
  }]
}"#;

const BROKEN_JSON: &str = r#"{
  "types": [{
    "name": "com.acme.shop.BrokenEndpoint",
    "annotations": [{"path": "broken"}],
    "methods": [{"name": "find", "annotations": ["GET", {"path": "{id}"}]}]
  }]
}"#;

const CART_JSON: &str = r#"{
  "types": [{
    "name": "com.acme.shop.CartEndpoint",
    "annotations": [{"path": "carts"}],
    "methods": [{"name": "checkout", "annotations": ["POST", {"path": "checkout"}]}]
  }]
}"#;

const ORDER_CLIENT: &str = r#"package com.acme.shop;

import java.util.List;
import javax.ws.rs.client.Client;
import javax.ws.rs.client.WebTarget;
import javax.ws.rs.core.GenericType;

public class OrderEndpointClient implements OrderEndpoint {
    private final WebTarget base;

    public OrderEndpointClient(Client client, String endpointUrl) {
        base = client.target(endpointUrl);
    }

    @Override
    public List<Order> search(OrderQuery beanParam) {
        return base.path("orders")
                .queryParam("status", beanParam.status)
                .request("application/json")
                .get(new GenericType<List<Order>>(){});
    }
}
"#;

const ORDER_CLIENT_PATH: &str = "out/com/acme/shop/OrderEndpointClient.java";

fn workspace(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    for (rel, contents) in files {
        let path = dir.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }
    dir
}

fn run_in(dir: &Path, args: &[&str]) -> Outcome {
    let cli = Cli::try_parse_from(std::iter::once("jaxgen").chain(args.iter().copied())).unwrap();
    execute(&cli, dir).unwrap()
}

#[test]
fn test_generates_clients_across_descriptor_files() {
    let dir = workspace(&[
        ("api/orders.yaml", ORDERS_YAML),
        ("api/model/query.json", QUERY_JSON),
        ("api/notes.json", "{ not json"),
    ]);

    let outcome = run_in(dir.path(), &["--out", "out", "api"]);
    assert_eq!(
        outcome,
        Outcome {
            generated: 1,
            failed: 0,
            changed: 0,
        }
    );
    let source = fs::read_to_string(dir.path().join(ORDER_CLIENT_PATH)).unwrap();
    assert_eq!(source, ORDER_CLIENT);
}

#[test]
fn test_failed_resource_does_not_stop_the_batch() {
    let dir = workspace(&[
        ("api/broken.json", BROKEN_JSON),
        ("api/orders.yaml", ORDERS_YAML),
        ("api/query.json", QUERY_JSON),
    ]);

    let outcome = run_in(dir.path(), &["-o", "out", "api"]);
    assert_eq!(outcome.generated, 1);
    assert_eq!(outcome.failed, 1);
    assert_eq!(outcome.exit_code(), 1);
    assert!(dir.path().join(ORDER_CLIENT_PATH).is_file());
    assert!(!dir.path().join("out/com/acme/shop/BrokenEndpointClient.java").exists());
}

#[test]
fn test_check_mode_writes_nothing_and_reports_stale_clients() {
    let dir = workspace(&[
        ("api/orders.yaml", ORDERS_YAML),
        ("api/query.json", QUERY_JSON),
    ]);

    let outcome = run_in(dir.path(), &["--check", "--out", "out", "api"]);
    assert_eq!(outcome.changed, 1);
    assert_eq!(outcome.exit_code(), 1);
    assert!(!dir.path().join("out").exists());

    run_in(dir.path(), &["--out", "out", "api"]);
    let outcome = run_in(dir.path(), &["--check", "--out", "out", "api"]);
    assert_eq!(outcome.changed, 0);
    assert_eq!(outcome.exit_code(), 0);

    fs::write(dir.path().join(ORDER_CLIENT_PATH), "stale\n").unwrap();
    let outcome = run_in(dir.path(), &["--check", "--out", "out", "api"]);
    assert_eq!(outcome.changed, 1);
}

#[test]
fn test_stdout_mode_writes_nothing() {
    let dir = workspace(&[
        ("api/orders.yaml", ORDERS_YAML),
        ("api/query.json", QUERY_JSON),
    ]);

    let outcome = run_in(dir.path(), &["--stdout", "--out", "out", "api"]);
    assert_eq!(outcome.generated, 1);
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_config_file_enables_async_clients() {
    let dir = workspace(&[
        ("cart.json", CART_JSON),
        (
            "jaxgen.toml",
            "[generator]\nasync = true\n\n[output]\ndir = \"gen\"\n",
        ),
    ]);

    let outcome = run_in(dir.path(), &["cart.json"]);
    assert_eq!(outcome.generated, 1);
    let source =
        fs::read_to_string(dir.path().join("gen/com/acme/shop/CartEndpointAsyncClient.java"))
            .unwrap();
    assert!(source.contains("import java.util.concurrent.Future;"));
    assert!(source.contains("public Future<Response> checkout() {"));
    assert!(source.contains(".async()\n                .post(Entity.entity(null, \"*/*\"));"));
}

#[test]
fn test_missing_input_is_an_error() {
    let dir = workspace(&[]);
    let cli = Cli::try_parse_from(["jaxgen", "absent.json"]).unwrap();
    let err = execute(&cli, dir.path()).unwrap_err();
    assert!(err.starts_with("Input not found"), "{err}");
}
