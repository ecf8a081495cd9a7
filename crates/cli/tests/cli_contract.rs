// End-to-end tests for the `paceline` binary: exit codes, the --json stdout
// contract, and best-effort warnings on stderr.
//
// Run with: cargo test -p paceline-cli --test cli_contract -- --nocapture

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const EXIT_USAGE: i32 = 2;
const EXIT_UNKNOWN_PROVIDER: i32 = 60;
const EXIT_FETCH_FAILED: i32 = 61;
const EXIT_INVALID_CONFIG: i32 = 62;
const EXIT_NO_RESULTS: i32 = 63;

fn fixtures(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../sources/tests/fixtures")
        .join(name)
        .to_string_lossy()
        .into_owned()
}

/// Binary isolated from any config under the real home directory.
fn paceline(home: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_paceline"));
    cmd.env_remove("PACELINE_CONFIG")
        .env_remove("RUST_LOG")
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"));
    cmd
}

fn run(args: &[&str]) -> Output {
    let home = TempDir::new().unwrap();
    paceline(&home).args(args).output().expect("spawn paceline")
}

fn both_sources() -> Vec<String> {
    vec![
        "--fixtures".into(),
        fixtures("athletic_net"),
        "--fixtures".into(),
        fixtures("milesplit"),
    ]
}

fn args<'a>(head: &[&'a str], tail: &'a [String]) -> Vec<&'a str> {
    head.iter().copied().chain(tail.iter().map(String::as_str)).collect()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

/// Stdout must be exactly one JSON value.
fn single_json(out: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&out.stdout);
    let trimmed = stdout.trim();
    assert!(!trimmed.is_empty(), "stdout should not be empty\nstderr: {}", stderr(out));
    serde_json::from_str(trimmed)
        .unwrap_or_else(|e| panic!("stdout must be valid JSON.\nParse error: {e}\nstdout:\n{trimmed}"))
}

fn write(dir: &Path, relative: &str, contents: &str) -> PathBuf {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, contents).unwrap();
    path
}

// ===========================================================================
// paceline reconcile
// ===========================================================================

#[test]
fn reconcile_json_has_merged_timeline() {
    let sources = both_sources();
    let out = run(&args(
        &["reconcile", "--select", "19161256@athletic_net", "--select", "8841@milesplit", "--json"],
        &sources,
    ));
    assert!(out.status.success(), "exit: {:?}\nstderr: {}", out.status, stderr(&out));

    let val = single_json(&out);
    assert_eq!(val["full_name"], "Ana Ruiz");
    assert_eq!(val["gender"], "F");
    assert_eq!(val["pfp_url"], "https://milesplit.com/pfp/8841.jpg");
    assert_eq!(val["urls"].as_array().unwrap().len(), 3);
    assert!(val.get("warnings").is_none(), "no warnings key when nothing failed");

    let times = val["times"].as_array().expect("times must be array");
    let events: Vec<&str> = times.iter().map(|t| t["event"].as_str().unwrap()).collect();
    assert_eq!(events, ["5000 meter", "800 meter", "1600 meter", "3200 meter", "1 mile"]);

    let xc = &times[0];
    assert_eq!(xc["date"], "2023-10-14");
    assert_eq!(xc["meters"], 5000.0);
    assert_eq!(xc["time"], "17:45.10");
    assert!((xc["time_seconds"].as_f64().unwrap() - 1065.1).abs() < 1e-9);
    assert_eq!(xc["sources"].as_array().unwrap().len(), 2);
}

#[test]
fn reconcile_report_is_human_readable() {
    let sources = both_sources();
    let out = run(&args(
        &["reconcile", "--select", "19161256@athletic_net", "--select", "8841@milesplit"],
        &sources,
    ));
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.starts_with("Ana Ruiz (F)\n"));
    assert!(stdout.contains("DATE"));
    assert!(stdout.contains("17:45.10"));
    assert!(stdout.contains("athletic_net, milesplit"));
    assert!(stdout.ends_with("5 result(s)\n"));
}

#[test]
fn reconcile_by_query_uses_top_hits() {
    let sources = both_sources();
    let out = run(&args(&["reconcile", "--query", "ana ruiz", "--json"], &sources));
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let val = single_json(&out);
    assert_eq!(val["times"].as_array().unwrap().len(), 5);
}

#[test]
fn output_file_gets_the_json() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("ana.json");
    let sources = both_sources();
    let target_str = target.to_string_lossy().into_owned();
    let out = run(&args(
        &["reconcile", "--select", "8841@milesplit", "--output", &target_str],
        &sources,
    ));
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stderr(&out).contains("wrote "));

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&target).unwrap()).unwrap();
    assert_eq!(written["times"].as_array().unwrap().len(), 4);
    // Report still goes to stdout without --json.
    assert!(String::from_utf8_lossy(&out.stdout).starts_with("Ana Ruiz (F)"));
}

#[test]
fn unknown_provider_exit_code() {
    let sources = both_sources();
    let out = run(&args(&["reconcile", "--select", "1@runnerspace"], &sources));
    assert_eq!(out.status.code(), Some(EXIT_UNKNOWN_PROVIDER));
    assert!(stderr(&out).contains("provider 'runnerspace' not found"));
    assert!(stderr(&out).contains("hint:"));
}

#[test]
fn failed_load_exit_code() {
    let sources = both_sources();
    let out = run(&args(
        &["reconcile", "--select", "8841@milesplit", "--select", "404@athletic_net"],
        &sources,
    ));
    assert_eq!(out.status.code(), Some(EXIT_FETCH_FAILED));
    assert!(out.stdout.is_empty());
    assert!(stderr(&out).contains("--best-effort"));
}

#[test]
fn best_effort_keeps_the_good_sources() {
    let sources = both_sources();
    let out = run(&args(
        &["reconcile", "--select", "8841@milesplit", "--select", "404@athletic_net", "--best-effort", "--json"],
        &sources,
    ));
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stderr(&out).contains("warning: 404@athletic_net:"));

    let val = single_json(&out);
    assert_eq!(val["times"].as_array().unwrap().len(), 4);
    let warnings = val["warnings"].as_array().expect("warnings must be array");
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0]["provider"], "athletic_net");
    assert_eq!(warnings[0]["external_id"], "404");
}

#[test]
fn best_effort_with_nothing_loaded_fails() {
    let sources = both_sources();
    let out = run(&args(&["reconcile", "--select", "404@milesplit", "--best-effort"], &sources));
    assert_eq!(out.status.code(), Some(EXIT_FETCH_FAILED));
    assert!(stderr(&out).contains("all 1 athlete load(s) failed"));
}

#[test]
fn no_search_results_exit_code() {
    let sources = both_sources();
    let out = run(&args(&["reconcile", "--query", "nobody here"], &sources));
    assert_eq!(out.status.code(), Some(EXIT_NO_RESULTS));
}

#[test]
fn select_and_query_conflict() {
    let sources = both_sources();
    let out = run(&args(&["reconcile", "--select", "8841@milesplit", "--query", "ana"], &sources));
    assert_eq!(out.status.code(), Some(EXIT_USAGE));
}

#[test]
fn malformed_selection_is_usage_error() {
    let sources = both_sources();
    let out = run(&args(&["reconcile", "--select", "8841"], &sources));
    assert_eq!(out.status.code(), Some(EXIT_USAGE));
    assert!(stderr(&out).contains("EXTERNAL_ID@PROVIDER"));
}

#[test]
fn missing_dump_directory_is_usage_error() {
    let dir = TempDir::new().unwrap();
    let empty = dir.path().to_string_lossy().into_owned();
    let out = run(&["reconcile", "--select", "1@x", "--fixtures", &empty]);
    assert_eq!(out.status.code(), Some(EXIT_USAGE));
}

// ===========================================================================
// paceline search
// ===========================================================================

#[test]
fn search_json_lists_every_provider() {
    let sources = both_sources();
    let out = run(&args(&["search", "ana", "--json"], &sources));
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let val = single_json(&out);
    assert_eq!(val["query"], "ana");
    let providers = val["providers"].as_array().unwrap();
    assert_eq!(providers.len(), 2);
    assert_eq!(providers[0]["provider"], "athletic_net");
    assert_eq!(providers[0]["results"].as_array().unwrap().len(), 2);
    assert_eq!(providers[1]["provider"], "milesplit");
    assert_eq!(providers[1]["results"][0]["external_id"], "8841");
}

#[test]
fn search_limit_from_config() {
    let dir = TempDir::new().unwrap();
    let config = write(dir.path(), "paceline.toml", "default_max_search_results = 1\n");
    let sources = both_sources();
    let config_str = config.to_string_lossy().into_owned();
    let out = run(&args(&["search", "ana", "--json", "--config", &config_str], &sources));
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let val = single_json(&out);
    assert_eq!(val["providers"][0]["results"].as_array().unwrap().len(), 1);
}

#[test]
fn search_config_from_env() {
    let home = TempDir::new().unwrap();
    let config = write(
        home.path(),
        "paceline.toml",
        "[providers.athletic_net]\nenabled = false\n",
    );
    let sources = both_sources();
    let out = paceline(&home)
        .env("PACELINE_CONFIG", &config)
        .args(args(&["search", "ana", "--json"], &sources))
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let val = single_json(&out);
    let providers = val["providers"].as_array().unwrap();
    assert_eq!(providers.len(), 1);
    assert_eq!(providers[0]["provider"], "milesplit");
}

#[test]
fn search_with_broken_dump_still_succeeds() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "provider.toml", "id = \"broken\"\n");
    write(dir.path(), "search.json", "[{ not json");
    let broken = dir.path().to_string_lossy().into_owned();
    let milesplit = fixtures("milesplit");
    let out = run(&["search", "ana", "--fixtures", &broken, "--fixtures", &milesplit]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("broken (broken): 0 result(s)\n  error: "));
    assert!(stdout.contains("8841@milesplit"));
    assert!(stderr(&out).contains("1 of 2 provider(s) failed to search"));
}

// ===========================================================================
// paceline validate
// ===========================================================================

#[test]
fn validate_accepts_good_config() {
    let dir = TempDir::new().unwrap();
    let config = write(
        dir.path(),
        "paceline.toml",
        "load_policy = \"best_effort\"\n\n[providers.milesplit]\nmax_search_results = 5\n",
    );
    let config_str = config.to_string_lossy().into_owned();
    let milesplit = fixtures("milesplit");
    let out = run(&["validate", &config_str, "--fixtures", &milesplit]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stderr(&out).contains("valid: load_policy best_effort, 1 provider section(s)"));
}

#[test]
fn validate_rejects_unknown_keys() {
    let dir = TempDir::new().unwrap();
    let config = write(dir.path(), "paceline.toml", "load_polcy = \"best_effort\"\n");
    let config_str = config.to_string_lossy().into_owned();
    let out = run(&["validate", &config_str]);
    assert_eq!(out.status.code(), Some(EXIT_INVALID_CONFIG));
    assert!(stderr(&out).contains("config parse error"));
}

#[test]
fn validate_rejects_unregistered_provider_section() {
    let dir = TempDir::new().unwrap();
    let config = write(dir.path(), "paceline.toml", "[providers.runnerspace]\nenabled = true\n");
    let config_str = config.to_string_lossy().into_owned();
    let milesplit = fixtures("milesplit");
    let out = run(&["validate", &config_str, "--fixtures", &milesplit]);
    assert_eq!(out.status.code(), Some(EXIT_INVALID_CONFIG));
    assert!(stderr(&out).contains("runnerspace"));
}

#[test]
fn validate_missing_file_is_usage_error() {
    let out = run(&["validate", "/nonexistent/paceline.toml"]);
    assert_eq!(out.status.code(), Some(EXIT_USAGE));
    assert!(stderr(&out).contains("PACELINE_CONFIG"));
}
