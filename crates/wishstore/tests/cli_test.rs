//! Integration tests for the `wishstore` CLI binary.
//!
//! Offline tests cover argument parsing, help output, completions and the
//! route table. Server-bound tests run the binary against a wiremock server.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `wishstore` binary with env isolation.
///
/// Clears all `WISHSTORE_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn wishstore_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("wishstore");
    cmd.env("HOME", "/tmp/wishstore-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/wishstore-cli-test-nonexistent")
        .env_remove("WISHSTORE_PROFILE")
        .env_remove("WISHSTORE_URL")
        .env_remove("WISHSTORE_TOKEN")
        .env_remove("WISHSTORE_USERNAME")
        .env_remove("WISHSTORE_PASSWORD")
        .env_remove("WISHSTORE_APP_NAME")
        .env_remove("WISHSTORE_OUTPUT")
        .env_remove("WISHSTORE_INSECURE")
        .env_remove("WISHSTORE_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// `wishstore_cmd()` pointed at `server` with a pre-issued token.
fn connected_cmd(server: &MockServer) -> assert_cmd::Command {
    let mut cmd = wishstore_cmd();
    cmd.args(["--url", &server.uri(), "--token", "jwt-1", "--color", "never"]);
    cmd
}

/// Start a server that accepts `jwt-1` for `ROLE_USER`.
fn start_server(rt: &tokio::runtime::Runtime) -> MockServer {
    rt.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/account"))
            .and(header("Authorization", "Bearer jwt-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "login": "user", "authorities": ["ROLE_USER"]
            })))
            .mount(&server)
            .await;
        server
    })
}

fn mount(rt: &tokio::runtime::Runtime, server: &MockServer, mock: Mock) {
    rt.block_on(mock.mount(server));
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Runtime::new().unwrap()
}

fn books() -> serde_json::Value {
    json!({"id": 1, "name": "Books", "creationDate": "2016-11-09", "hidden": false, "user": null})
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = wishstore_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = String::from_utf8_lossy(&output.stderr);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    wishstore_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("wishlists")
            .and(predicate::str::contains("wishes"))
            .and(predicate::str::contains("routes")),
    );
}

#[test]
fn test_completions_zsh() {
    wishstore_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_wishlists_subcommands_exist() {
    wishstore_cmd()
        .args(["wishlists", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("list")
                .and(predicate::str::contains("get"))
                .and(predicate::str::contains("create"))
                .and(predicate::str::contains("update"))
                .and(predicate::str::contains("delete")),
        );
}

#[test]
fn test_invalid_output_format() {
    wishstore_cmd()
        .args(["--output", "invalid", "wishlists", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("possible values"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_list_without_server_reports_missing_config() {
    wishstore_cmd()
        .args(["wishlists", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No server configured"));
}

#[test]
fn test_unknown_profile_is_reported() {
    wishstore_cmd()
        .args(["--profile", "nope", "wishlists", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Profile 'nope' not found"));
}

#[test]
fn test_config_show_no_config() {
    wishstore_cmd()
        .args(["config", "show", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"default_profile\": \"default\""));
}

#[test]
fn test_config_path_points_into_config_dir() {
    wishstore_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

// ── Routes (offline) ────────────────────────────────────────────────

#[test]
fn test_routes_list_plain() {
    wishstore_cmd()
        .args(["routes", "list", "-o", "plain"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("wishlist-detail.edit")
                .and(predicate::str::contains("wish.delete")),
        );
}

#[test]
fn test_routes_match_deep_link() {
    wishstore_cmd()
        .args(["routes", "match", "/wishlist/3/edit", "-o", "json-compact"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\"state\":\"wishlist.edit\"")
                .and(predicate::str::contains("\"id\":3")),
        );
}

#[test]
fn test_routes_match_unknown_url() {
    let output = wishstore_cmd()
        .args(["routes", "match", "/nowhere"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_routes_href_detail() {
    wishstore_cmd()
        .args(["routes", "href", "wishlist-detail", "--id", "5"])
        .assert()
        .success()
        .stdout("/wishlist/wishlist/5\n");
}

#[test]
fn test_routes_href_missing_id_is_usage_error() {
    let output = wishstore_cmd()
        .args(["routes", "href", "wish.edit"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Server-bound ────────────────────────────────────────────────────

#[test]
fn test_wishlists_list_json() {
    let rt = runtime();
    let server = start_server(&rt);
    mount(
        &rt,
        &server,
        Mock::given(method("GET"))
            .and(path("/api/wishlists"))
            .and(query_param("page", "0"))
            .and(query_param("size", "20"))
            .and(query_param("sort", "id,asc"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("X-Total-Count", "1")
                    .set_body_json(json!([books()])),
            ),
    );

    connected_cmd(&server)
        .args(["-o", "json-compact", "wishlists", "list"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\"name\":\"Books\"")
                .and(predicate::str::contains("\"creationDate\":\"2016-11-09\"")),
        );
}

#[test]
fn test_wishlist_get_missing_exits_not_found() {
    let rt = runtime();
    let server = start_server(&rt);
    mount(
        &rt,
        &server,
        Mock::given(method("GET"))
            .and(path("/api/wishlists/77"))
            .respond_with(ResponseTemplate::new(404)),
    );

    let output = connected_cmd(&server)
        .args(["wishlists", "get", "77"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_wishlist_create_posts_and_prints_alert() {
    let rt = runtime();
    let server = start_server(&rt);
    mount(
        &rt,
        &server,
        Mock::given(method("POST"))
            .and(path("/api/wishlists"))
            .and(body_json(json!({
                "id": null, "name": "Books", "creationDate": "2024-01-31",
                "hidden": false, "user": null
            })))
            .respond_with(
                ResponseTemplate::new(201)
                    .insert_header("X-storeApp-alert", "storeApp.wishlist.created")
                    .insert_header("X-storeApp-params", "21")
                    .set_body_json(json!({
                        "id": 21, "name": "Books", "creationDate": "2024-01-31",
                        "hidden": false, "user": null
                    })),
            )
            .expect(1),
    );

    connected_cmd(&server)
        .args([
            "-o",
            "plain",
            "wishlists",
            "create",
            "--name",
            "Books",
            "--creation-date",
            "2024-01-31",
        ])
        .assert()
        .success()
        .stdout("21\n")
        .stderr(predicate::str::contains(
            "A new Wishlist is created with identifier 21",
        ));
}

#[test]
fn test_wish_create_rejects_negative_price_without_posting() {
    let rt = runtime();
    let server = start_server(&rt);
    mount(
        &rt,
        &server,
        Mock::given(method("POST"))
            .and(path("/api/wishes"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0),
    );

    let output = connected_cmd(&server)
        .args(["wishes", "create", "--product-id", "3", "--price=-1"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("price"));
}

#[test]
fn test_wishlist_update_keeps_unchanged_fields() {
    let rt = runtime();
    let server = start_server(&rt);
    mount(
        &rt,
        &server,
        Mock::given(method("GET"))
            .and(path("/api/wishlists/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(books())),
    );
    mount(
        &rt,
        &server,
        Mock::given(method("PUT"))
            .and(path("/api/wishlists"))
            .and(body_json(json!({
                "id": 1, "name": "Novels", "creationDate": "2016-11-09",
                "hidden": false, "user": null
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 1, "name": "Novels", "creationDate": "2016-11-09",
                "hidden": false, "user": null
            })))
            .expect(1),
    );

    connected_cmd(&server)
        .args(["-o", "json-compact", "wishlists", "update", "1", "--name", "Novels"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\":\"Novels\""));
}

#[test]
fn test_delete_requires_yes_when_not_interactive() {
    let rt = runtime();
    let server = start_server(&rt);
    mount(
        &rt,
        &server,
        Mock::given(method("GET"))
            .and(path("/api/wishlists/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(books())),
    );
    mount(
        &rt,
        &server,
        Mock::given(method("DELETE"))
            .and(path("/api/wishlists/1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0),
    );

    connected_cmd(&server)
        .args(["wishlists", "delete", "1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("requires confirmation"));
}

#[test]
fn test_delete_with_yes() {
    let rt = runtime();
    let server = start_server(&rt);
    mount(
        &rt,
        &server,
        Mock::given(method("GET"))
            .and(path("/api/wishlists/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(books())),
    );
    mount(
        &rt,
        &server,
        Mock::given(method("DELETE"))
            .and(path("/api/wishlists/1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("X-storeApp-alert", "storeApp.wishlist.deleted")
                    .insert_header("X-storeApp-params", "1"),
            )
            .expect(1),
    );

    connected_cmd(&server)
        .args(["--yes", "wishlists", "delete", "1"])
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "A Wishlist is deleted with identifier 1",
        ));
}

#[test]
fn test_rejected_token_exits_auth() {
    let rt = runtime();
    let server = rt.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/account"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        server
    });

    let output = connected_cmd(&server)
        .args(["wishlists", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_profile_from_config_file() {
    let rt = runtime();
    let server = start_server(&rt);
    mount(
        &rt,
        &server,
        Mock::given(method("GET"))
            .and(path("/api/wishlists"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([books()]))),
    );

    let home = tempfile::tempdir().unwrap();
    let config_dir = home.path().join("wishstore");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        format!(
            "[profiles.local]\nurl = \"{}\"\nauth_mode = \"token\"\ntoken_env = \"WISHSTORE_CLI_TEST_JWT\"\n",
            server.uri()
        ),
    )
    .unwrap();

    wishstore_cmd()
        .env("XDG_CONFIG_HOME", home.path())
        .env("WISHSTORE_CLI_TEST_JWT", "jwt-1")
        .args(["-p", "local", "-o", "json-compact", "wishlists", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\":\"Books\""));
}
