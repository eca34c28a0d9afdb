use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

const BIN: &str = env!("CARGO_BIN_EXE_routine-import");

/// Minimal catalog for resolution tests.
fn write_catalog(dir: &Path) -> PathBuf {
    let json = serde_json::json!({
        "ex1": {"title": "Bench Press"},
        "ex2": {"title": "Squat"},
        "ex3": {"title": "Lat Pulldown"},
        "ex4": {"title": "Incline Bench Press"}
    });
    let path = dir.join("catalog.json");
    fs::write(&path, serde_json::to_string_pretty(&json).unwrap())
        .expect("failed to write catalog");
    path
}

fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("failed to write input");
    path
}

fn run(args: &[&str]) -> Output {
    Command::new(BIN).args(args).output().expect("failed to run binary")
}

fn run_with_stdin(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(BIN)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn binary");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    child.wait_with_output().expect("failed to wait for binary")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

// ---------------------------------------------------------------------------
// parse
// ---------------------------------------------------------------------------

#[test]
fn parse_text_file_resolves_against_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = write_catalog(dir.path());
    let input = write_file(
        dir.path(),
        "legs.txt",
        "Workout: Legs\n- Squat: 4x6-8 @ 100kg - 90s descanso\n",
    );

    let output = run(&[
        "parse",
        input.to_str().unwrap(),
        "--catalog",
        catalog.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let json = stdout_json(&output);
    assert_eq!(json["title"], "Legs");
    let squat = &json["exercises"][0];
    assert_eq!(squat["template_id"], "ex2");
    assert_eq!(squat["rest_seconds"], 90);
    assert_eq!(squat["sets"].as_array().unwrap().len(), 4);
    assert_eq!(squat["sets"][0]["rep_range_start"], 6);
    assert_eq!(squat["sets"][0]["weight_kg"], 100.0);
}

#[test]
fn parse_stdin_preview() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = write_catalog(dir.path());

    let output = run_with_stdin(
        &["parse", "--catalog", catalog.to_str().unwrap(), "--format", "preview"],
        r#"{"title": "Push Day", "exercises": [
            {"name": "Bench Press", "sets": 3, "reps": 10, "rest_seconds": 90},
            {"name": "Cable Fly", "sets": 3, "rep_range": {"start": 8, "end": 12}}
        ]}"#,
    );
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("**Push Day**\n\n"));
    assert!(stdout.contains("1. ✅ **Bench Press** - 3x10 (90s rest)"));
    assert!(stdout.contains("2. ⚠️ **Cable Fly** - 3x8-12 (60s rest)"));
}

#[test]
fn parse_wire_format_is_enveloped() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = write_catalog(dir.path());
    let input = write_file(dir.path(), "bench.md", "* **Bench Press**: 3x10\n");

    let output = run(&[
        "parse",
        input.to_str().unwrap(),
        "--catalog",
        catalog.to_str().unwrap(),
        "--format",
        "wire",
    ]);
    assert!(output.status.success());

    let json = stdout_json(&output);
    let exercise = &json["routine"]["exercises"][0];
    assert_eq!(exercise["exercise_template_id"], "ex1");
    assert_eq!(exercise["sets"][0]["rep_range"]["start"], 8);
    assert_eq!(exercise["sets"][0]["rep_range"]["end"], 12);
}

#[test]
fn parse_with_report_outputs_both() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_file(
        dir.path(),
        "reply.md",
        "Here you go:\n```json\n{\"title\": \"Pull\", \"exercises\": [{\"name\": \"Lat Pulldown\", \"sets\": 3}]}\n```\n",
    );

    let output = run(&["parse", input.to_str().unwrap(), "--with-report"]);
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["routine"]["title"], "Pull");
    assert_eq!(json["report"]["detected_format"], "fenced_json");
    assert_eq!(json["report"]["strategy"], "fenced-json");
    assert_eq!(json["report"]["unresolved"][0], "Lat Pulldown");
    assert_eq!(json["report"]["submission_ready"], false);
}

#[test]
fn parse_non_routine_fails() {
    let output = run_with_stdin(&["parse"], "não é json nem treino");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error: No routine found"), "stderr: {stderr}");
}

#[test]
fn parse_strict_exits_with_two_on_problems() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = write_catalog(dir.path());

    let output = run_with_stdin(
        &["parse", "--catalog", catalog.to_str().unwrap(), "--strict"],
        "- Exercício Inventado XYZ: 3x12\n",
    );
    assert_eq!(output.status.code(), Some(2));
    // The routine is still printed
    assert_eq!(stdout_json(&output)["exercises"][0]["template_id"], serde_json::Value::Null);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Exercício Inventado XYZ"));

    let output = run_with_stdin(
        &["parse", "--catalog", catalog.to_str().unwrap(), "--strict"],
        "- Squat: 5x5\n",
    );
    assert!(output.status.success());
}

#[test]
fn parse_applies_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_file(
        dir.path(),
        "parser.yml",
        "default_title: Do Chat\ndefault_rest_seconds: 75\nfolder_id: \"12\"\n",
    );

    let output = run_with_stdin(
        &["parse", "--config", config.to_str().unwrap()],
        "- Squat: 5x5\n",
    );
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["title"], "Do Chat");
    assert_eq!(json["folder_id"], "12");
    assert_eq!(json["exercises"][0]["rest_seconds"], 75);
}

#[test]
fn parse_missing_catalog_reports_error() {
    let output = run_with_stdin(&["parse", "--catalog", "/nonexistent/catalog.json"], "- Squat: 5x5");
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to load catalog"));
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

#[test]
fn validate_ready_and_broken_routines() {
    let dir = tempfile::tempdir().unwrap();

    let ready = write_file(
        dir.path(),
        "ready.json",
        r#"{"title": "Legs", "exercises": [
            {"name": "Squat", "template_id": "ex2", "sets": [{"reps": 5}, {"reps": 5}]}
        ]}"#,
    );
    let output = run(&["validate", ready.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("is ready: 1 exercise(s), 2 set(s)"));

    let broken = write_file(
        dir.path(),
        "broken.yaml",
        "title: ''\nexercises:\n  - name: Mystery\n",
    );
    let output = run(&["validate", broken.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("- routine title is required"));
    assert!(stdout.contains("- exercise 'Mystery' has no sets configured"));
    assert!(stdout.contains("exercises not found in the catalog: Mystery"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("3 problem(s)"));
}

// ---------------------------------------------------------------------------
// resolve
// ---------------------------------------------------------------------------

#[test]
fn resolve_prints_tiers() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = write_catalog(dir.path());

    let output = run(&[
        "resolve",
        "bench press",
        "Wide Grip Pulldown",
        "Exercício Inventado XYZ",
        "--catalog",
        catalog.to_str().unwrap(),
    ]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "bench press\tex1\texact\tBench Press");
    assert_eq!(lines[1], "Wide Grip Pulldown\tex3\ttoken_overlap\tLat Pulldown");
    assert_eq!(lines[2], "Exercício Inventado XYZ\t-\tunresolved\t-");
}

#[test]
fn resolve_json_output() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = write_catalog(dir.path());

    let output = run(&[
        "resolve",
        "Bench",
        "--catalog",
        catalog.to_str().unwrap(),
        "--json",
    ]);
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json[0]["query"], "Bench");
    assert_eq!(json[0]["template_id"], "ex1");
    assert_eq!(json[0]["tier"], "substring");
}

// ---------------------------------------------------------------------------
// batch
// ---------------------------------------------------------------------------

#[test]
fn batch_parses_directory_in_parallel() {
    let inputs = tempfile::tempdir().unwrap();
    let output_dir = tempfile::tempdir().unwrap();
    let catalog = write_catalog(output_dir.path());

    write_file(inputs.path(), "legs.txt", "- Squat: 5x5 @ 120kg\n");
    write_file(
        inputs.path(),
        "push.json",
        r#"{"title": "Push", "exercises": [{"name": "Bench Press", "sets": 3, "reps": 8}]}"#,
    );
    write_file(inputs.path(), "chatter.md", "Drink water and sleep well.\n");
    write_file(inputs.path(), "ignored.pdf", "- Squat: 5x5\n");

    let out = output_dir.path().join("routines");
    let output = run(&[
        "batch",
        inputs.path().to_str().unwrap(),
        "--catalog",
        catalog.to_str().unwrap(),
        "--output",
        out.to_str().unwrap(),
        "--jobs",
        "2",
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Parsed 2/3 input(s), 2 ready"));

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("batch-report.json")).unwrap()).unwrap();
    assert_eq!(report["total"], 3);
    assert_eq!(report["parsed"], 2);
    assert!(report["generated_at"].as_str().is_some_and(|ts| ts.contains('T')));

    let entries = report["entries"].as_array().unwrap();
    assert!(entries[0]["input"].as_str().unwrap().ends_with("chatter.md"));
    assert_eq!(entries[0]["error"], "no routine found");
    assert!(entries[1]["input"].as_str().unwrap().ends_with("legs.txt"));

    let legs: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("legs.json")).unwrap()).unwrap();
    assert_eq!(legs["exercises"][0]["template_id"], "ex2");
    assert!(out.join("push.json").exists());
}

#[test]
fn batch_wire_output() {
    let inputs = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let input = write_file(inputs.path(), "legs.txt", "- Squat: 5x5\n");

    let output = run(&[
        "batch",
        input.to_str().unwrap(),
        "--output",
        out.path().to_str().unwrap(),
        "--wire",
    ]);
    assert!(output.status.success());

    let body: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.path().join("legs.json")).unwrap()).unwrap();
    assert_eq!(body["routine"]["exercises"][0]["sets"][0]["rep_range"]["start"], 3);
}

// ---------------------------------------------------------------------------
// detect
// ---------------------------------------------------------------------------

#[test]
fn detect_reports_format_and_heuristic() {
    let output = run_with_stdin(&["detect"], "Try this:\n```\n{\"exercises\": []}\n```\nwith bench press 3x10");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("format: fenced_json"));
    assert!(stdout.contains("looks_like_routine: true"));

    let output = run_with_stdin(&["detect", "-"], "hello there");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("format: text"));
    assert!(stdout.contains("looks_like_routine: false"));
}

// ---------------------------------------------------------------------------
// init-config
// ---------------------------------------------------------------------------

#[test]
fn init_config_writes_loadable_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("parser.yml");

    let output = run(&["init-config", config.to_str().unwrap(), "--folder", "home-gym"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let written = fs::read_to_string(&config).unwrap();
    assert!(written.contains("default_title: Imported Routine"));
    assert!(written.contains("folder_id: home-gym"));

    let output = run_with_stdin(
        &["parse", "--config", config.to_str().unwrap()],
        r#"{"exercises": [{"name": "Squat", "sets": 3}]}"#,
    );
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["folder_id"], "home-gym");
}

#[test]
fn init_config_refuses_to_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_file(dir.path(), "parser.yml", "default_reps: 8\n");

    let output = run(&["init-config", config.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("already exists"));
    assert_eq!(fs::read_to_string(&config).unwrap(), "default_reps: 8\n");

    let output = run(&["init-config", config.to_str().unwrap(), "--force"]);
    assert!(output.status.success());
    assert!(fs::read_to_string(&config).unwrap().contains("default_reps: 10"));
}
