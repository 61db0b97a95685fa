// Integration tests for src/cli/sweep.rs: parallel preset sweep.
//
// Coverage:
//   - run_sweep over a file reports one trial per grid point, in grid order
//   - the best trial is the smallest compressed size
//   - a missing file is an error

use clap::Parser;
use lzip::cli::args::{Cli, Command};
use lzip::cli::sweep::run_sweep;
use tempfile::TempDir;

fn sweep_args(args: &[&str]) -> lzip::cli::args::SweepArgs {
    let cli = Cli::try_parse_from(["lzip", "-q", "sweep"].into_iter().chain(args.iter().copied()))
        .unwrap();
    match cli.command {
        Command::Sweep(args) => args,
        _ => unreachable!(),
    }
}

#[test]
fn sweep_reports_grid_in_order() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("corpus.txt");
    std::fs::write(&path, "the quick brown fox jumps over the lazy dog\n".repeat(400)).unwrap();

    let args = sweep_args(&[
        path.to_str().unwrap(),
        "-T",
        "2",
        "--chunk-size",
        "1024",
        "--dictionary-sizes",
        "4096,65536",
        "--match-len-limits",
        "5,64",
    ]);
    let report = run_sweep(&args).unwrap();
    assert_eq!(report.original_size, 44 * 400);

    let points: Vec<(u32, u32)> = report
        .trials
        .iter()
        .map(|t| (t.preset.dictionary_size(), t.preset.match_len_limit()))
        .collect();
    assert_eq!(points, vec![(4096, 5), (4096, 64), (65536, 5), (65536, 64)]);

    let best = report.best().unwrap();
    let smallest = report.trials.iter().map(|t| t.compressed_size).min().unwrap();
    assert_eq!(best.compressed_size, smallest);
}

#[test]
fn sweep_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.bin");
    let args = sweep_args(&[missing.to_str().unwrap(), "--dictionary-sizes", "4096"]);
    assert!(run_sweep(&args).is_err());
}
