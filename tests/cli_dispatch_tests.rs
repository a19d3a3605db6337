use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_dicecloud-import")
}

fn fixture(parts: &[&str]) -> PathBuf {
    parts.iter().fold(
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures"),
        |path, part| path.join(part),
    )
}

fn unique_temp_path(name: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("dicecloud-import-{name}-{stamp}.json"))
}

fn command() -> Command {
    let mut command = Command::new(bin());
    command.env_remove("DICECLOUD_IMPORT_CONFIG");
    command
}

#[test]
fn unknown_command_prints_usage() {
    let output = command().arg("serve").output().expect("binary should run");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage: dicecloud-import"));
}

#[test]
fn translate_command_emits_actor_json() {
    let export = fixture(&["characters", "sample_character.json"]);
    let output = command()
        .args(["translate", export.to_string_lossy().as_ref()])
        .output()
        .expect("translate should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let payload: serde_json::Value =
        serde_json::from_str(&stdout).expect("translate should emit json");
    assert_eq!(payload["name"], "Aria Stormborn");
    assert_eq!(payload["type"], "character");
    assert_eq!(payload["data"]["abilities"]["str"]["value"], 14.0);
    assert_eq!(payload["flags"]["dicecloud-import"]["sourceId"], "c1");
}

#[test]
fn translate_command_returns_usage_without_path() {
    let output = command().arg("translate").output().expect("translate should run");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage: dicecloud-import translate"));
}

#[test]
fn translate_command_fails_on_malformed_export() {
    let path = unique_temp_path("malformed");
    fs::write(&path, "{\"character\": [").expect("fixture should be written");

    let output = command()
        .args(["translate", path.to_string_lossy().as_ref()])
        .output()
        .expect("translate should run");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("translate failed"));

    let _ = fs::remove_file(path);
}

#[test]
fn import_command_creates_then_reports_existing_actor() {
    let world = unique_temp_path("world");
    let export = fixture(&["characters", "sample_character.json"]);
    let libraries = fixture(&["libraries"]);
    let args = [
        "import".to_string(),
        export.to_string_lossy().into_owned(),
        "--world".to_string(),
        world.to_string_lossy().into_owned(),
        "--libraries".to_string(),
        libraries.to_string_lossy().into_owned(),
    ];

    let created = command().args(&args).output().expect("import should run");
    assert_eq!(created.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&created.stdout).contains("Imported Aria Stormborn"));

    let saved: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(&world).expect("world file should be written"),
    )
    .expect("world file should be json");
    assert_eq!(saved["actors"].as_array().map(Vec::len), Some(1));
    assert_eq!(saved["actors"][0]["items"].as_array().map(Vec::len), Some(11));

    let repeated = command().args(&args).output().expect("import should run");
    assert_eq!(repeated.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&repeated.stdout).contains("already exists"));

    let updated = command()
        .args(&args)
        .arg("--update")
        .output()
        .expect("import should run");
    assert_eq!(updated.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&updated.stdout).contains("Updated Aria Stormborn"));

    let _ = fs::remove_file(world);
}

#[test]
fn import_command_rejects_unknown_flag() {
    let output = command()
        .args(["import", "export.json", "--force"])
        .output()
        .expect("import should run");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage: dicecloud-import import"));
}

#[test]
fn check_config_reports_invalid_yaml() {
    let path = unique_temp_path("config");
    fs::write(&path, "aliases: [not, a, table]\n").expect("fixture should be written");

    let output = command()
        .args(["check-config", path.to_string_lossy().as_ref()])
        .output()
        .expect("check-config should run");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("config invalid"));

    let _ = fs::remove_file(path);
}

#[test]
fn check_config_summarizes_defaults() {
    let output = command()
        .arg("check-config")
        .output()
        .expect("check-config should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("source='built-in defaults'"));
    assert!(stdout.contains("currencies=5"));
}
