use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn vidmeta(temp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("vidmeta").unwrap();
    cmd.current_dir(temp.path())
        .env_remove("RUST_LOG")
        .env("VIDMETA_TEMP_DIR", temp.path().join("store"))
        .env("VIDMETA_PROBER", "ffprobe");
    cmd
}

#[test]
fn test_probers_lists_compiled_variants() {
    let temp = TempDir::new().unwrap();
    vidmeta(&temp)
        .arg("probers")
        .assert()
        .success()
        .stdout(predicate::str::contains("ffprobe"))
        .stdout(predicate::str::contains("ReportedOnly"));
}

#[test]
fn test_inspect_missing_file_fails() {
    let temp = TempDir::new().unwrap();
    vidmeta(&temp)
        .args(["inspect", "--input", "does_not_exist.mp4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read input file"));
}

#[test]
fn test_inspect_without_extension_fails() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("noext"), b"data").unwrap();

    vidmeta(&temp)
        .args(["inspect", "--input", "noext"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--extension"));
}

#[test]
fn test_inspect_rejects_unknown_prober() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("clip.mp4"), b"data").unwrap();

    vidmeta(&temp)
        .args(["inspect", "--input", "clip.mp4", "--prober", "gstreamer"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown prober"));
}

#[test]
fn test_invalid_config_file_fails() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("vidmeta.toml"), "[vidmeta]\nprobe_timeout_secs = \"soon\"\n").unwrap();

    vidmeta(&temp)
        .arg("probers")
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration"));
}

#[test]
fn test_serve_answers_each_line() {
    let temp = TempDir::new().unwrap();
    let input = concat!(
        r#"{"id":1,"method":"getMetadata","args":{"videoBytes":[1,2,3]}}"#,
        "\n",
        r#"{"id":2,"method":"getPlatformVersion"}"#,
        "\n",
        r#"{"id":3,"method":"unknown"}"#,
        "\n",
    );

    let output = vidmeta(&temp)
        .args(["--log-level", "error", "serve"])
        .write_stdin(input)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let responses: Vec<serde_json::Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(responses.len(), 3);

    let by_id = |id: i64| {
        responses
            .iter()
            .find(|r| r["id"] == serde_json::json!(id))
            .unwrap()
    };
    assert_eq!(by_id(1)["error"]["code"], "InvalidArgument");
    assert_eq!(by_id(1)["error"]["message"], "Missing extension");
    assert!(by_id(2)["ok"].as_str().unwrap().starts_with("vidmeta "));
    assert_eq!(by_id(3)["error"]["code"], "NotImplemented");
}

#[test]
fn test_inspect_garbage_reports_media_error() {
    let temp = TempDir::new().unwrap();
    let ffprobe_present = std::process::Command::new("ffprobe")
        .arg("-version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false);
    if !ffprobe_present {
        println!("Skipping garbage inspect test - ffprobe not found");
        return;
    }

    std::fs::write(temp.path().join("garbage.mp4"), b"this is not a video at all").unwrap();

    vidmeta(&temp)
        .args(["inspect", "--input", "garbage.mp4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("MediaError"));

    let store = temp.path().join("store");
    let leftovers = std::fs::read_dir(&store).map(|d| d.count()).unwrap_or(0);
    assert_eq!(leftovers, 0);
}
