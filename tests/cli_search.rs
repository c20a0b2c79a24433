use assert_cmd::Command;
use clap::{CommandFactory, Parser};
use predicates::prelude::*;
use predicates::str::contains;
use serde_json::Value;
use tempfile::TempDir;

use vibeflicks::Cli;

mod util;
use util::fixture_catalog;

/// Binary with an isolated config dir and no VIBEFLICKS_* overrides.
fn base_cmd() -> (Command, TempDir) {
    let home = TempDir::new().expect("temp home");
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("vibeflicks"));
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env_remove("VIBEFLICKS_CATALOG")
        .env_remove("VIBEFLICKS_THEME")
        .env_remove("VIBEFLICKS_LOG")
        .env_remove("RUST_LOG");
    (cmd, home)
}

#[test]
fn clap_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn title_search_prints_table() {
    let (mut cmd, _home) = base_cmd();
    cmd.arg("--catalog")
        .arg(fixture_catalog())
        .args(["search", "--title", "inception"]);
    cmd.assert()
        .success()
        .stdout(contains("Title"))
        .stdout(contains("Release Date"))
        .stdout(contains("Inception"))
        .stdout(contains("2010-07-15"));
}

#[test]
fn json_output_has_display_columns() {
    let (mut cmd, _home) = base_cmd();
    cmd.arg("--catalog")
        .arg(fixture_catalog())
        .args(["search", "--title", "inception", "--json", "--scores"]);
    let output = cmd.assert().success().get_output().clone();
    let rows: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    let rows = rows.as_array().expect("array of rows");
    assert!(!rows.is_empty());
    assert_eq!(rows[0]["title"], "Inception");
    assert_eq!(rows[0]["vote_average"], 8.4);
    assert_eq!(rows[0]["release_date"], "2010-07-15");
    assert!(rows[0]["score"].as_f64().unwrap() > 0.15);
}

#[test]
fn language_browse_respects_limit() {
    let (mut cmd, _home) = base_cmd();
    cmd.arg("--catalog")
        .arg(fixture_catalog())
        .args(["search", "--language", "en", "--json", "--limit", "2"]);
    let output = cmd.assert().success().get_output().clone();
    let rows: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    let titles: Vec<&str> = rows
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Inception", "Interstellar"]);
}

#[test]
fn limit_outside_range_is_rejected() {
    for limit in ["0", "1001"] {
        let (mut cmd, _home) = base_cmd();
        cmd.arg("--catalog")
            .arg(fixture_catalog())
            .args(["search", "--title", "inception", "--limit", limit]);
        cmd.assert()
            .failure()
            .stdout(contains("No results").not())
            .stderr(contains("--limit"));
    }

    let parsed = Cli::try_parse_from(["vibeflicks", "search", "--title", "x", "--limit", "1000"]);
    assert!(parsed.is_ok());
}

#[test]
fn no_match_prints_message() {
    let (mut cmd, _home) = base_cmd();
    cmd.arg("--catalog")
        .arg(fixture_catalog())
        .args(["search", "--title", "zzzqqqnotamovie"]);
    cmd.assert().success().stdout(contains("No results"));
}

#[test]
fn blank_query_is_rejected() {
    let (mut cmd, _home) = base_cmd();
    cmd.arg("--catalog")
        .arg(fixture_catalog())
        .args(["search", "--title", "   "]);
    cmd.assert()
        .failure()
        .stderr(contains("please enter at least one search field"));
}

#[test]
fn missing_catalog_fails() {
    let (mut cmd, home) = base_cmd();
    cmd.arg("--catalog")
        .arg(home.path().join("nope.csv"))
        .args(["search", "--title", "inception"]);
    cmd.assert()
        .failure()
        .stderr(contains("loading catalog"));
}

#[test]
fn catalog_env_var_is_honored() {
    let (mut cmd, _home) = base_cmd();
    cmd.env("VIBEFLICKS_CATALOG", fixture_catalog())
        .args(["search", "--language", "ko"]);
    cmd.assert().success().stdout(contains("Parasite"));
}

#[test]
fn stats_reports_counts() {
    let (mut cmd, _home) = base_cmd();
    cmd.arg("--catalog")
        .arg(fixture_catalog())
        .args(["stats", "--json"]);
    let output = cmd.assert().success().get_output().clone();
    let stats: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(stats["records"], 11);
    assert!(stats["vocabulary"].as_u64().unwrap() > 0);
}

#[test]
fn completions_emit_script() {
    let (mut cmd, _home) = base_cmd();
    cmd.args(["completions", "bash"]);
    cmd.assert()
        .success()
        .stdout(contains("vibeflicks").and(contains("complete")));
}

#[test]
fn man_page_renders() {
    let (mut cmd, _home) = base_cmd();
    cmd.arg("man");
    cmd.assert().success().stdout(contains(".TH"));
}
