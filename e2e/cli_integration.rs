// e2e/cli_integration.rs: CLI integration tests
//
// Tests the `lzip` binary as a black-box tool using std::process::Command.
// Covers compress/decompress round trips, stdin/stdout piping, output naming,
// leftover policies, sweep output, and exit codes.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tempfile::TempDir;

/// Locate the `lzip` binary produced by Cargo.
fn lzip_bin() -> PathBuf {
    if let Ok(p) = std::env::var("CARGO_BIN_EXE_lzip") {
        return PathBuf::from(p);
    }
    let mut p = std::env::current_exe().unwrap();
    p.pop();
    if p.ends_with("deps") {
        p.pop();
    }
    p.push("lzip");
    p
}

/// Create a TempDir containing a text file with ~4 KB of content.
fn make_temp_input() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let input_path = dir.path().join("input.txt");
    let content = "Hello, lzip!\n".repeat(315);
    fs::write(&input_path, content).unwrap();
    (dir, input_path)
}

// ── 1. Compress / decompress round trip ──────────────────────────────────────

#[test]
fn test_cli_compress_decompress_roundtrip() {
    let (dir, input) = make_temp_input();
    let original = fs::read(&input).unwrap();
    let compressed = dir.path().join("output.lz");
    let roundtrip = dir.path().join("roundtrip.txt");

    let status = Command::new(lzip_bin())
        .args(["compress", input.to_str().unwrap(), "-o", compressed.to_str().unwrap()])
        .status()
        .expect("failed to run lzip compress");
    assert!(status.success(), "compress step should exit 0");
    assert!(fs::read(&compressed).unwrap().starts_with(b"LZIP"));

    let status = Command::new(lzip_bin())
        .args(["decompress", compressed.to_str().unwrap(), "-o", roundtrip.to_str().unwrap()])
        .status()
        .expect("failed to run lzip decompress");
    assert!(status.success(), "decompress step should exit 0");
    assert_eq!(fs::read(&roundtrip).unwrap(), original);
}

// ── 2. Default output names ──────────────────────────────────────────────────

#[test]
fn test_cli_default_output_names() {
    let (dir, input) = make_temp_input();
    let original = fs::read(&input).unwrap();

    let status = Command::new(lzip_bin())
        .args(["-q", "compress", "input.txt"])
        .current_dir(dir.path())
        .status()
        .unwrap();
    assert!(status.success());
    assert!(dir.path().join("input.txt.lz").exists());

    fs::remove_file(&input).unwrap();
    let status = Command::new(lzip_bin())
        .args(["-q", "decompress", "input.txt.lz"])
        .current_dir(dir.path())
        .status()
        .unwrap();
    assert!(status.success());
    assert_eq!(fs::read(&input).unwrap(), original);
}

// ── 3. stdin → stdout piping ─────────────────────────────────────────────────

fn pipe(args: &[&str], input: &[u8]) -> std::process::Output {
    let mut child = Command::new(lzip_bin())
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    let mut stdin = child.stdin.take().unwrap();
    let input = input.to_vec();
    let writer = std::thread::spawn(move || {
        stdin.write_all(&input).unwrap();
    });
    let output = child.wait_with_output().unwrap();
    writer.join().unwrap();
    output
}

#[test]
fn test_cli_stdin_stdout_pipeline() {
    let data: Vec<u8> = (0..50_000u32).map(|i| (i % 253) as u8).collect();
    let compressed = pipe(&["compress", "-", "-l", "1"], &data);
    assert!(compressed.status.success());
    assert!(compressed.stdout.starts_with(b"LZIP"));

    let decompressed = pipe(&["decompress", "-"], &compressed.stdout);
    assert!(decompressed.status.success());
    assert_eq!(decompressed.stdout, data);
}

// ── 4. Leftover policy ───────────────────────────────────────────────────────

#[test]
fn test_cli_leftover_error_exit_code() {
    let compressed = pipe(&["compress", "-"], b"0123456789");
    let strict = pipe(&["decompress", "-", "-w", "4"], &compressed.stdout);
    assert_eq!(strict.status.code(), Some(1));
    assert_eq!(strict.stdout, b"01234567");
    let stderr = String::from_utf8_lossy(&strict.stderr);
    assert!(stderr.contains("not a multiple of 4"), "{stderr}");

    let appended = pipe(&["decompress", "-", "-w", "4", "--leftover", "append"], &compressed.stdout);
    assert!(appended.status.success());
    assert_eq!(appended.stdout, b"0123456789");
}

// ── 5. Errors ────────────────────────────────────────────────────────────────

#[test]
fn test_cli_missing_input_fails() {
    let dir = TempDir::new().unwrap();
    let output = Command::new(lzip_bin())
        .args(["compress", "does-not-exist.bin"])
        .current_dir(dir.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(!dir.path().join("does-not-exist.bin.lz").exists());
}

#[test]
fn test_cli_refuses_overwrite_without_force() {
    let (dir, input) = make_temp_input();
    let target = dir.path().join("input.txt.lz");
    fs::write(&target, b"keep me").unwrap();

    let status = Command::new(lzip_bin())
        .args(["-q", "compress", input.to_str().unwrap()])
        .status()
        .unwrap();
    assert!(!status.success());
    assert_eq!(fs::read(&target).unwrap(), b"keep me");

    let status = Command::new(lzip_bin())
        .args(["-q", "compress", input.to_str().unwrap(), "-f"])
        .status()
        .unwrap();
    assert!(status.success());
}

#[test]
fn test_cli_invalid_level_fails() {
    let output = pipe(&["compress", "-", "-l", "10"], b"abc");
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("level 10"));
}

#[test]
fn test_cli_corrupt_input_fails() {
    let output = pipe(&["decompress", "-"], b"this is not an lzip stream");
    assert_eq!(output.status.code(), Some(1));
}

// ── 6. Sweep ─────────────────────────────────────────────────────────────────

#[test]
fn test_cli_sweep_reports_best() {
    let (_dir, input) = make_temp_input();
    let output = Command::new(lzip_bin())
        .args([
            "-q",
            "sweep",
            input.to_str().unwrap(),
            "-T",
            "2",
            "--dictionary-sizes",
            "4096,65536",
            "--match-len-limits",
            "5,36",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 1 + 4 + 1, "{stdout}");
    let best = stdout.lines().last().unwrap();
    assert!(best.starts_with("best encoding: dictionary_size="), "{best}");
    assert!(best.ends_with(":1 compression ratio)"), "{best}");
}

// ── 7. Version ───────────────────────────────────────────────────────────────

#[test]
fn test_cli_version() {
    let output = Command::new(lzip_bin()).arg("--version").output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains(env!("CARGO_PKG_VERSION")));
}
