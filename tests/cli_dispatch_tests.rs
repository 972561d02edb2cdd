use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_lineup")
}

fn data_path(file: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("data")
        .join(file)
        .to_string_lossy()
        .into_owned()
}

fn unique_temp_path(name: &str, extension: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("lineup-{name}-{stamp}.{extension}"))
}

#[test]
fn assault_command_emits_json_report() {
    let output = Command::new(bin())
        .args(["assault", "--bosses", "hydra,wyrm,golem", "--limit", "3"])
        .args(["--units", &data_path("units.json")])
        .args(["--bosses-file", &data_path("bosses.json")])
        .output()
        .expect("assault should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let payload: serde_json::Value =
        serde_json::from_str(&stdout).expect("assault should emit json");
    assert_eq!(payload["bosses"].as_array().map(Vec::len), Some(3));
    assert!(payload["combinations"].as_array().is_some_and(|c| c.len() <= 3));
    assert!(payload["total_found"].is_number());
}

#[test]
fn assault_command_reads_yaml_config() {
    let path = unique_temp_path("assault", "yaml");
    fs::write(&path, "bosses: [colossus, leviathan, hydra]\nlimit: 2\nflex: [Lumi]\n")
        .expect("write config");

    let output = Command::new(bin())
        .args(["assault", "--config", path.to_string_lossy().as_ref()])
        .args(["--units", &data_path("units.json")])
        .args(["--bosses-file", &data_path("bosses.json")])
        .output()
        .expect("assault should run");
    let _ = fs::remove_file(&path);

    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("assault should emit json");
    assert_eq!(payload["bosses"][0]["boss"], "Void Colossus");
}

#[test]
fn assault_with_unknown_boss_fails() {
    let output = Command::new(bin())
        .args(["assault", "--bosses", "hydra,wyrm,kraken"])
        .args(["--units", &data_path("units.json")])
        .args(["--bosses-file", &data_path("bosses.json")])
        .output()
        .expect("assault should run");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown boss 'kraken'"));
}

#[test]
fn assault_with_two_bosses_fails() {
    let output = Command::new(bin())
        .args(["assault", "--bosses", "hydra,wyrm"])
        .args(["--units", &data_path("units.json")])
        .args(["--bosses-file", &data_path("bosses.json")])
        .output()
        .expect("assault should run");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("expected exactly 3 bosses"));
}

#[test]
fn score_command_prints_trace() {
    let output = Command::new(bin())
        .args(["score", "--boss", "hydra", "--team", "Blaze,Tempest,Lumi"])
        .args(["--units", &data_path("units.json")])
        .args(["--bosses-file", &data_path("bosses.json")])
        .output()
        .expect("score should run");

    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("score should emit json");
    assert!(payload["score"]["kind"].is_string());
    assert!(payload["trace"].as_array().is_some_and(|trace| !trace.is_empty()));
}

#[test]
fn build_command_respects_limit() {
    let output = Command::new(bin())
        .args(["build", "--limit", "4", "--units", &data_path("units.json")])
        .output()
        .expect("build should run");

    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("build should emit json");
    assert!(payload["teams"].as_array().is_some_and(|teams| teams.len() <= 4));
}

#[test]
fn validate_command_passes_bundled_dataset() {
    let output = Command::new(bin())
        .args(["validate", "--units", &data_path("units.json")])
        .output()
        .expect("validate should run");

    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("validation passed"));
}

#[test]
fn validate_command_fails_on_broken_dataset() {
    let path = unique_temp_path("units", "json");
    fs::write(
        &path,
        r#"{ "units": [ { "id": "x", "name": "X", "rank": "S", "tier": 1.0, "tags": ["attack", "stun"] } ] }"#,
    )
    .expect("write dataset");

    let output = Command::new(bin())
        .args(["validate", "--units", path.to_string_lossy().as_ref()])
        .output()
        .expect("validate should run");
    let _ = fs::remove_file(&path);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("2 role tags"));
}

#[test]
fn unknown_command_is_a_usage_error() {
    let output = Command::new(bin())
        .arg("simulate")
        .output()
        .expect("binary should run");

    assert_eq!(output.status.code(), Some(2));
}
