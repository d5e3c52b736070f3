use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_hist2root"))
}

fn tmp_path(name: &str) -> PathBuf {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    let mut p = std::env::temp_dir();
    p.push(format!("hist2root_cli_{}_{}_{}", std::process::id(), nanos, name));
    p
}

fn run(args: &[&str]) -> Output {
    Command::new(bin_path())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to run {:?} {:?}: {}", bin_path(), args, e))
}

fn run_with_stdin(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(bin_path())
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap_or_else(|e| panic!("failed to spawn {:?}: {}", bin_path(), e));
    child.stdin.take().unwrap().write_all(stdin.as_bytes()).unwrap();
    child.wait_with_output().unwrap()
}

const INPUT: &str = "\
### Finalize: groups 2, events 100 (binned 90) [trials 120]
# BEGIN HISTOGRAM /ANA/pt
AidaPath=/ANA/pt
Title=pT
0 2 10 1 3
2 6 4 1 1
# END HISTOGRAM

# BEGIN HISTOGRAM /ANA/sub/eta
AidaPath=/ANA/sub/eta
Title=eta
-1 1 7
# END HISTOGRAM
";

fn write_input(name: &str, text: &str) -> PathBuf {
    let p = tmp_path(name);
    std::fs::write(&p, text).unwrap();
    p
}

fn child<'a>(dir: &'a Value, name: &str) -> &'a Value {
    dir["children"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["name"] == name)
        .unwrap_or_else(|| panic!("no child '{}' in {}", name, dir))
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn converts_file_to_json_tree() {
    let input = write_input("in.yoda", INPUT);
    let output = tmp_path("out.json");

    let out = run(&["-i", input.to_str().unwrap(), "-o", output.to_str().unwrap()]);
    assert!(out.status.success(), "stderr={}", String::from_utf8_lossy(&out.stderr));

    let root = read_json(&output);
    let ana = child(&root, "ANA");
    assert_eq!(ana["kind"], "directory");
    let pt = child(ana, "pt");
    assert_eq!(pt["kind"], "histogram");
    assert_eq!(pt["title"], "pT");
    assert_eq!(pt["bin_edges"], serde_json::json!([0.0, 2.0, 6.0]));
    assert_eq!(pt["bin_content"], serde_json::json!([0.0, 10.0, 4.0, 0.0]));
    assert_eq!(pt["sumw2"], serde_json::json!([0.0, 4.0, 1.0, 0.0]));

    let eta = child(child(ana, "sub"), "eta");
    assert_eq!(eta["bin_content"], serde_json::json!([0.0, 7.0, 0.0]));

    // The finalize line is an ordinary comment without -w.
    assert!(root["children"].as_array().unwrap().iter().all(|c| c["name"] != "N"));

    let _ = std::fs::remove_file(&input);
    let _ = std::fs::remove_file(&output);
}

#[test]
fn normalizes_with_w_flag() {
    let input = write_input("norm.yoda", INPUT);
    let output = tmp_path("norm.json");

    let out = run(&["-i", input.to_str().unwrap(), "-o", output.to_str().unwrap(), "-w"]);
    assert!(out.status.success(), "stderr={}", String::from_utf8_lossy(&out.stderr));

    let root = read_json(&output);
    let pt = child(child(&root, "ANA"), "pt");
    assert_eq!(pt["bin_content"], serde_json::json!([0.0, 0.2, 0.16, 0.0]));
    assert!(pt.get("sumw2").is_none());

    let n = child(&root, "N");
    assert_eq!(n["bin_edges"], serde_json::json!([0.0, 1.0]));
    assert_eq!(n["bin_content"][1], 100.0);

    let _ = std::fs::remove_file(&input);
    let _ = std::fs::remove_file(&output);
}

#[test]
fn legacy_positional_form() {
    let input = write_input("legacy.yoda", INPUT);
    let output = tmp_path("legacy.json");

    let out = run(&[input.to_str().unwrap(), output.to_str().unwrap(), "toweights"]);
    assert!(out.status.success(), "stderr={}", String::from_utf8_lossy(&out.stderr));
    let root = read_json(&output);
    assert_eq!(child(&root, "N")["bin_content"][1], 100.0);

    let _ = std::fs::remove_file(&input);
    let _ = std::fs::remove_file(&output);
}

#[test]
fn reads_stdin_by_default() {
    let output = tmp_path("stdin.json");
    let out = run_with_stdin(&["-o", output.to_str().unwrap()], INPUT);
    assert!(out.status.success(), "stderr={}", String::from_utf8_lossy(&out.stderr));
    let root = read_json(&output);
    child(child(&root, "ANA"), "pt");
    let _ = std::fs::remove_file(&output);
}

#[test]
fn directory_format_writes_tree() {
    let input = write_input("dir.yoda", INPUT);
    let output = tmp_path("dir_out");

    let out = run(&[
        "-i",
        input.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
        "--format",
        "dir",
    ]);
    assert!(out.status.success(), "stderr={}", String::from_utf8_lossy(&out.stderr));
    assert!(output.join("ANA/pt.json").is_file());
    assert!(output.join("ANA/sub/eta.json").is_file());

    let _ = std::fs::remove_file(&input);
    let _ = std::fs::remove_dir_all(&output);
}

#[test]
fn missing_output_exits_1() {
    let out = run(&["-i", "whatever.yoda"]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("missing output"), "stderr={stderr}");
}

#[test]
fn missing_input_exits_1() {
    let output = tmp_path("noinput.json");
    let missing = tmp_path("does_not_exist.yoda");
    let out = run(&["-i", missing.to_str().unwrap(), "-o", output.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    let _ = std::fs::remove_file(&output);
}

#[test]
fn uncreatable_output_exits_1() {
    let input = write_input("uncreatable.yoda", INPUT);
    let output = tmp_path("no_such_dir").join("out.json");
    let out = run(&["-i", input.to_str().unwrap(), "-o", output.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    let _ = std::fs::remove_file(&input);
}

#[test]
fn format_error_reports_line_and_exits_1() {
    let input = write_input("bad.yoda", "# header\n\nnot a record\n");
    let output = tmp_path("bad.json");

    let out = run(&["-i", input.to_str().unwrap(), "-o", output.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Line 3: not a record"), "stderr={stderr}");
    assert!(stderr.contains("# BEGIN HISTOGRAM"), "stderr={stderr}");

    let _ = std::fs::remove_file(&input);
    let _ = std::fs::remove_file(&output);
}

#[test]
fn strict_rejects_truncated_record() {
    let text = "# BEGIN HISTOGRAM /h\nAidaPath=/h\n0 1 1\n";
    let input = write_input("trunc.yoda", text);
    let output = tmp_path("trunc.json");

    let out = run(&["-i", input.to_str().unwrap(), "-o", output.to_str().unwrap()]);
    assert!(out.status.success(), "stderr={}", String::from_utf8_lossy(&out.stderr));
    let root = read_json(&output);
    assert!(root["children"].as_array().unwrap().is_empty());

    let out = run(&["-i", input.to_str().unwrap(), "-o", output.to_str().unwrap(), "--strict"]);
    assert_eq!(out.status.code(), Some(1));

    let _ = std::fs::remove_file(&input);
    let _ = std::fs::remove_file(&output);
}

#[test]
fn compact_flag_writes_single_line() {
    let input = write_input("compact.yoda", INPUT);
    let output = tmp_path("compact.json");

    let out = run(&["-i", input.to_str().unwrap(), "-o", output.to_str().unwrap(), "--compact"]);
    assert!(out.status.success(), "stderr={}", String::from_utf8_lossy(&out.stderr));

    let text = std::fs::read_to_string(&output).unwrap();
    assert_eq!(text.lines().count(), 1);
    let root: Value = serde_json::from_str(&text).unwrap();
    let pt = child(child(&root, "ANA"), "pt");
    assert_eq!(pt["bin_content"], serde_json::json!([0.0, 10.0, 4.0, 0.0]));

    let _ = std::fs::remove_file(&input);
    let _ = std::fs::remove_file(&output);
}

#[test]
fn empty_directory_name_is_not_the_root() {
    let text = "\
# BEGIN HISTOGRAM
AidaPath=//h
0 1 2
# END HISTOGRAM
# BEGIN HISTOGRAM
AidaPath=/h
0 1 5
# END HISTOGRAM
";
    let input = write_input("empty_dir.yoda", text);
    let output = tmp_path("empty_dir.json");

    let out = run(&["-i", input.to_str().unwrap(), "-o", output.to_str().unwrap()]);
    assert!(out.status.success(), "stderr={}", String::from_utf8_lossy(&out.stderr));

    let root = read_json(&output);
    assert_eq!(child(&root, "h")["bin_content"], serde_json::json!([0.0, 5.0, 0.0]));
    let nested = child(child(&root, ""), "h");
    assert_eq!(nested["bin_content"], serde_json::json!([0.0, 2.0, 0.0]));

    let _ = std::fs::remove_file(&input);
    let _ = std::fs::remove_file(&output);
}
