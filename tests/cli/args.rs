// Integration tests for src/cli/args.rs: clap definition and option mapping.
//
// Coverage:
//   - global -q / -v counts are accepted before and after the subcommand
//   - compress without level or pair falls back to level 6
//   - --dictionary-size without --match-len-limit is a usage error
//   - -o and -c are mutually exclusive
//   - --leftover only accepts error|append|discard
//   - sweep -T and grid overrides

use clap::Parser;
use lzip::cli::args::{Cli, Command, LeftoverPolicy};
use lzip::Level;

fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
    Cli::try_parse_from(std::iter::once("lzip").chain(args.iter().copied()))
}

#[test]
fn verbosity_flags_are_global() {
    let cli = parse(&["-vv", "compress", "f", "-q"]).unwrap();
    assert_eq!((cli.quiet, cli.verbose), (1, 2));
}

#[test]
fn compress_level_default() {
    let cli = parse(&["compress", "f"]).unwrap();
    let Command::Compress(args) = cli.command else {
        panic!("expected compress");
    };
    assert_eq!(args.level(), Level::Index(6));
}

#[test]
fn compress_level_flag() {
    let cli = parse(&["compress", "f", "-l", "9"]).unwrap();
    let Command::Compress(args) = cli.command else {
        panic!("expected compress");
    };
    assert_eq!(args.level(), Level::Index(9));
}

#[test]
fn incomplete_pair_is_usage_error() {
    assert!(parse(&["compress", "f", "--dictionary-size", "65536"]).is_err());
    assert!(parse(&["compress", "f", "--match-len-limit", "32"]).is_err());
}

#[test]
fn output_and_stdout_conflict() {
    assert!(parse(&["compress", "f", "-o", "x.lz", "-c"]).is_err());
    assert!(parse(&["decompress", "f.lz", "-o", "x", "-c"]).is_err());
}

#[test]
fn leftover_policy_values() {
    for (text, policy) in [
        ("error", LeftoverPolicy::Error),
        ("append", LeftoverPolicy::Append),
        ("discard", LeftoverPolicy::Discard),
    ] {
        let cli = parse(&["decompress", "f.lz", "--leftover", text]).unwrap();
        let Command::Decompress(args) = cli.command else {
            panic!("expected decompress");
        };
        assert_eq!(args.leftover, policy);
    }
    assert!(parse(&["decompress", "f.lz", "--leftover", "keep"]).is_err());
}

#[test]
fn sweep_threads_and_grid() {
    let cli = parse(&[
        "sweep",
        "corpus.bin",
        "-T",
        "3",
        "--dictionary-sizes",
        "4096",
        "--match-len-limits",
        "5,273",
    ])
    .unwrap();
    let Command::Sweep(args) = cli.command else {
        panic!("expected sweep");
    };
    assert_eq!(args.threads(), 3);
    assert_eq!(args.grid(), vec![(4096, 5), (4096, 273)]);
}
