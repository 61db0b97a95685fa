// Integration tests for src/cli/mod.rs and src/cli/ops.rs: dispatch through
// `lzip::cli::run` without spawning the binary.
//
// Coverage:
//   - compress then decompress with default output names
//   - existing outputs are kept unless -f is given
//   - --leftover append / discard / error on a misaligned payload
//   - decompress of a file:// URL with an explicit output
//   - output naming rules for compress

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use lzip::cli::args::{Cli, Command};
use lzip::cli::ops::{compress_output, Output};
use tempfile::TempDir;

fn run(args: &[&str]) -> anyhow::Result<()> {
    let cli = Cli::try_parse_from(std::iter::once("lzip").chain(args.iter().copied()))?;
    lzip::cli::run(&cli)
}

fn write_input(dir: &TempDir, name: &str, data: &[u8]) -> String {
    let path = dir.path().join(name);
    fs::write(&path, data).unwrap();
    path.to_str().unwrap().to_owned()
}

#[test]
fn default_names_round_trip() {
    let dir = TempDir::new().unwrap();
    let data = b"dispatch round trip\n".repeat(300);
    let input = write_input(&dir, "notes.txt", &data);

    run(&["-q", "compress", input.as_str()]).unwrap();
    let compressed = format!("{input}.lz");
    assert!(fs::metadata(&compressed).unwrap().len() > 0);

    fs::remove_file(&input).unwrap();
    run(&["-q", "decompress", compressed.as_str()]).unwrap();
    assert_eq!(fs::read(&input).unwrap(), data);
}

#[test]
fn existing_output_needs_force() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "a.bin", b"abc");
    let output = write_input(&dir, "a.bin.lz", b"occupied");

    assert!(run(&["-q", "compress", input.as_str()]).is_err());
    assert_eq!(fs::read(&output).unwrap(), b"occupied");

    run(&["-q", "compress", input.as_str(), "-f"]).unwrap();
    assert!(fs::read(&output).unwrap().starts_with(b"LZIP"));
}

#[test]
fn leftover_policies() {
    let dir = TempDir::new().unwrap();
    let data: Vec<u8> = (0..10u8).collect();
    let input = write_input(&dir, "ten.bin", &data);
    run(&["-q", "compress", input.as_str()]).unwrap();
    let compressed = format!("{input}.lz");

    let appended = dir.path().join("appended");
    run(&[
        "-q",
        "decompress",
        compressed.as_str(),
        "-w",
        "4",
        "--leftover",
        "append",
        "-o",
        appended.to_str().unwrap(),
    ]).unwrap();
    assert_eq!(fs::read(&appended).unwrap(), data);

    let discarded = dir.path().join("discarded");
    run(&[
        "-q",
        "decompress",
        compressed.as_str(),
        "-w",
        "4",
        "--leftover",
        "discard",
        "-o",
        discarded.to_str().unwrap(),
    ]).unwrap();
    assert_eq!(fs::read(&discarded).unwrap(), &data[..8]);

    let strict = dir.path().join("strict");
    let err = run(&[
        "-q",
        "decompress",
        compressed.as_str(),
        "-w",
        "4",
        "-o",
        strict.to_str().unwrap(),
    ]).unwrap_err();
    let root = err.downcast_ref::<lzip::Error>().unwrap();
    assert_eq!(root.remaining_bytes().unwrap().len(), 2);
    assert_eq!(fs::read(&strict).unwrap(), &data[..8]);
}

#[test]
fn decompress_file_url() {
    let dir = TempDir::new().unwrap();
    let data = b"served over a file url".to_vec();
    let input = write_input(&dir, "u.txt", &data);
    run(&["-q", "compress", input.as_str()]).unwrap();

    let url = url::Url::from_file_path(format!("{input}.lz")).unwrap().to_string();
    let out = dir.path().join("from_url");
    run(&["-q", "decompress", url.as_str(), "-o", out.to_str().unwrap()]).unwrap();
    assert_eq!(fs::read(&out).unwrap(), data);
}

#[test]
fn compress_output_naming() {
    let parse = |args: &[&str]| match Cli::try_parse_from(
        ["lzip", "compress"].into_iter().chain(args.iter().copied()),
    )
    .unwrap()
    .command
    {
        Command::Compress(args) => compress_output(&args),
        _ => unreachable!(),
    };
    assert_eq!(parse(&["data"]), Output::File(PathBuf::from("data.lz")));
    assert_eq!(parse(&["data", "-c"]), Output::Stdout);
    assert_eq!(parse(&["-"]), Output::Stdout);
    assert_eq!(parse(&["data", "-o", "x"]), Output::File(PathBuf::from("x")));
}
