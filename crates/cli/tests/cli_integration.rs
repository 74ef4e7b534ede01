use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn make_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before UNIX_EPOCH")
        .as_nanos();
    let pid = std::process::id();
    let dir = std::env::temp_dir().join(format!("cmdtree-integ-{prefix}-{pid}-{nanos}"));
    fs::create_dir_all(&dir).expect("failed to create temp dir");
    dir
}

fn cmdtree() -> Command {
    Command::new(env!("CARGO_BIN_EXE_cmdtree"))
}

fn init_in(dir: &Path) -> PathBuf {
    let out = cmdtree()
        .arg("init")
        .arg(dir)
        .output()
        .expect("failed to run cmdtree init");
    assert_success(&out, "cmdtree init");
    dir.join("cmdtree.json")
}

fn assert_success(out: &Output, what: &str) {
    assert!(
        out.status.success(),
        "{what} failed:\nstatus: {}\nstdout:\n{}\nstderr:\n{}",
        out.status,
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr),
    );
}

#[test]
fn help_works() {
    let out = cmdtree()
        .arg("--help")
        .output()
        .expect("failed to run cmdtree --help");
    assert_success(&out, "cmdtree --help");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.contains("init") && stdout.contains("parse") && stdout.contains("check"),
        "unexpected help output:\n{stdout}"
    );
}

#[test]
fn init_writes_starter_tree_once() {
    let dir = make_temp_dir("init");
    let tree = init_in(&dir);

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&tree).expect("tree not written"))
            .expect("tree is not JSON");
    assert_eq!(json["format-version"], 1);
    assert_eq!(json["commands"][0]["name"], "root");

    let again = cmdtree()
        .arg("init")
        .arg(&dir)
        .output()
        .expect("failed to run cmdtree init");
    assert!(!again.status.success(), "second init should refuse to overwrite");
    assert!(String::from_utf8_lossy(&again.stderr).contains("--force"));

    let forced = cmdtree()
        .arg("init")
        .arg(&dir)
        .arg("--force")
        .output()
        .expect("failed to run cmdtree init --force");
    assert_success(&forced, "cmdtree init --force");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn parse_prints_consolidated_json() {
    let dir = make_temp_dir("parse-json");
    let tree = init_in(&dir);

    let out = cmdtree()
        .arg("parse")
        .arg("--tree")
        .arg(&tree)
        .arg("--json")
        .args(["--", "root", "--count=3", "build", "-v", "--", "-x"])
        .output()
        .expect("failed to run cmdtree parse");
    assert_success(&out, "cmdtree parse");

    let json: serde_json::Value =
        serde_json::from_slice(&out.stdout).expect("parse output is not JSON");
    assert_eq!(json["commands"], serde_json::json!(["root", "build"]));
    assert_eq!(json["options"]["count"]["value"], 3);
    assert_eq!(json["options"]["count"]["invoked-as"], "--count");
    assert_eq!(json["options"]["verbose"]["value"], true);
    assert_eq!(json["positional"], serde_json::json!(["-x"]));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn parse_uses_tree_in_working_directory() {
    let dir = make_temp_dir("parse-cwd");
    init_in(&dir);

    let out = cmdtree()
        .current_dir(&dir)
        .args(["parse", "--", "RT", "extra", "args"])
        .output()
        .expect("failed to run cmdtree parse");
    assert_success(&out, "cmdtree parse");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("commands: root"), "{stdout}");
    assert!(stdout.contains("extra"), "{stdout}");
    assert!(!stdout.contains("set by"), "{stdout}");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn parse_help_renders_usage() {
    let dir = make_temp_dir("parse-help");
    let tree = init_in(&dir);

    let out = cmdtree()
        .arg("parse")
        .arg("--tree")
        .arg(&tree)
        .args(["--", "root", "build", "--help"])
        .output()
        .expect("failed to run cmdtree parse");
    assert_success(&out, "cmdtree parse --help");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Usage: root build"), "{stdout}");
    assert!(stdout.contains("--count"), "{stdout}");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn parse_errors_exit_with_two() {
    let dir = make_temp_dir("parse-error");
    let tree = init_in(&dir);

    let out = cmdtree()
        .arg("parse")
        .arg("--tree")
        .arg(&tree)
        .args(["--", "root", "--unknown=5"])
        .output()
        .expect("failed to run cmdtree parse");
    assert_eq!(out.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("error: unknown option '--unknown'"), "{stderr}");

    let out = cmdtree()
        .arg("parse")
        .arg("--tree")
        .arg(&tree)
        .args(["--", "root", "--count=notanumber"])
        .output()
        .expect("failed to run cmdtree parse");
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("notanumber"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn help_subcommand_resolves_paths() {
    let dir = make_temp_dir("help");
    let tree = init_in(&dir);

    let out = cmdtree()
        .arg("help")
        .arg("--tree")
        .arg(&tree)
        .args(["rt", "build"])
        .output()
        .expect("failed to run cmdtree help");
    assert_success(&out, "cmdtree help");
    assert!(String::from_utf8_lossy(&out.stdout).starts_with("root build - "));

    let out = cmdtree()
        .arg("help")
        .arg("--tree")
        .arg(&tree)
        .args(["root", "deploy"])
        .output()
        .expect("failed to run cmdtree help");
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("no command at 'root deploy'"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn check_reports_outline_and_collisions() {
    let dir = make_temp_dir("check");
    let tree = init_in(&dir);

    let out = cmdtree()
        .arg("check")
        .arg("--tree")
        .arg(&tree)
        .output()
        .expect("failed to run cmdtree check");
    assert_success(&out, "cmdtree check");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("root (rt) [--count --verbose]"), "{stdout}");
    assert!(stdout.contains("    build"), "{stdout}");
    assert!(String::from_utf8_lossy(&out.stderr).contains("OK: 2 command(s), 2 option(s)"));

    let bad = dir.join("bad.json");
    fs::write(
        &bad,
        r#"{
  "format-version": 1,
  "commands": [
    {
      "name": "root",
      "options": [{ "name": "count", "short": "c", "default": 1 }],
      "subcommands": [
        { "name": "build", "options": [{ "name": "cap", "short": "c", "default": 0 }] }
      ]
    }
  ]
}"#,
    )
    .expect("failed to write bad tree");
    let out = cmdtree()
        .arg("check")
        .arg("--tree")
        .arg(&bad)
        .output()
        .expect("failed to run cmdtree check");
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("invalid tree definition"), "{stderr}");
    assert!(stderr.contains("collides on -c"), "{stderr}");

    let _ = fs::remove_dir_all(&dir);
}
