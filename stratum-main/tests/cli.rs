use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

fn fixture(path: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join(path)
        .to_string_lossy()
        .to_string()
}

fn stratum(args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("stratum-main").unwrap();
    cmd.env_remove("STRATUM_TEST_MAIN_URI").env_remove("RUST_LOG");
    cmd.args(args);
    cmd
}

#[test]
fn test_compile_prints_sql() {
    stratum(&[
        "compile",
        "-c",
        &fixture("confs/orders.json"),
        "-d",
        "snowflake",
        "-r",
        &fixture("requests/shipped.json"),
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains(
        r#"SELECT CAST("orders"."id" AS VARCHAR) AS "id", CAST("orders"."total" AS VARCHAR) AS "total" FROM "orders" WHERE "orders"."status" = 'shipped' LIMIT 10"#,
    ))
    .stdout(predicate::str::contains("-- rows"))
    .stdout(predicate::str::contains("-- aggregates").not());
}

#[test]
fn test_compile_reads_request_from_stdin() {
    let request = std::fs::read_to_string(fixture("requests/by_status.json")).unwrap();

    stratum(&[
        "compile",
        "-c",
        &fixture("confs/orders.json"),
        "-d",
        "redshift",
    ])
    .write_stdin(request)
    .assert()
    .success()
    .stdout(predicate::str::contains("-- aggregates"))
    .stdout(predicate::str::contains(
        r#"WITH "_vars" AS (SELECT 'open' AS "_var_status", 0 AS "_idx" UNION ALL SELECT 'shipped' AS "_var_status", 1 AS "_idx")"#,
    ));
}

#[test]
fn test_compile_not_supported() {
    stratum(&[
        "compile",
        "-c",
        &fixture("confs/orders.json"),
        "-d",
        "phoenix",
        "-r",
        &fixture("requests/by_status.json"),
    ])
    .assert()
    .failure()
    .code(1)
    .stdout(predicate::str::contains(r#""kind": "not_supported""#))
    .stdout(predicate::str::contains("queries with variables on phoenix"));
}

#[test]
fn test_compile_malformed_request() {
    stratum(&[
        "compile",
        "-c",
        &fixture("confs/orders.json"),
        "-d",
        "athena",
    ])
    .write_stdin("{\"collection\": 1}")
    .assert()
    .failure()
    .stdout(predicate::str::contains(r#""kind": "bad_request""#));
}

#[test]
fn test_schema() {
    stratum(&[
        "schema",
        "-c",
        &fixture("confs/orders.json"),
        "-d",
        "bigquery",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains(r#""collections""#))
    .stdout(predicate::str::contains(r#""orders_pkey""#));
}

#[test]
fn test_explain() {
    stratum(&[
        "explain",
        "-c",
        &fixture("confs/orders.json"),
        "-d",
        "databricks",
        "-r",
        &fixture("requests/shipped.json"),
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains(
        "<query plan explanation is not implemented>",
    ));
}

#[test]
fn test_query_not_executable() {
    stratum(&[
        "query",
        "-c",
        &fixture("confs/orders.json"),
        "-d",
        "snowflake",
        "-r",
        &fixture("requests/shipped.json"),
    ])
    .assert()
    .failure()
    .stdout(predicate::str::contains("executing queries on snowflake"));
}

#[test]
fn test_query_unresolved_connection_uri() {
    stratum(&[
        "query",
        "-c",
        &fixture("confs/orders.json"),
        "-d",
        "postgres",
        "-r",
        &fixture("requests/shipped.json"),
    ])
    .assert()
    .failure()
    .stdout(predicate::str::contains(r#""kind": "internal_server_error""#))
    .stdout(predicate::str::contains("STRATUM_TEST_MAIN_URI"));
}

#[test]
fn test_missing_config_is_fatal() {
    stratum(&[
        "schema",
        "-c",
        &fixture("confs/missing.json"),
        "-d",
        "snowflake",
    ])
    .assert()
    .failure()
    .code(2)
    .stderr(predicate::str::contains("Failed to load configuration"));
}

#[test]
fn test_unknown_dialect() {
    stratum(&[
        "schema",
        "-c",
        &fixture("confs/orders.json"),
        "-d",
        "oracle",
    ])
    .assert()
    .failure()
    .stderr(predicate::str::contains("unknown dialect"));
}
