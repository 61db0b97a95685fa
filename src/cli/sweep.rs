//! `sweep` subcommand: compress one file with a grid of presets in parallel.
//!
//! The file is read once into memory. Each `(dictionary_size,
//! match_len_limit)` pair gets its own [`EncoderSession`], fed the same
//! chunks in order; only the compressed sizes are kept. Work is spread over a
//! dedicated rayon pool so `-T` bounds both threads and live encoders.

use std::fs;

use anyhow::Context;
use rayon::prelude::*;

use crate::config::MEMBER_SIZE_DEFAULT;
use crate::error::Result;
use crate::preset::Preset;
use crate::session::EncoderSession;
use crate::{displaylevel, displayout};

use super::args::SweepArgs;

/// Outcome of one grid point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trial {
    pub preset: Preset,
    pub compressed_size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepReport {
    pub original_size: u64,
    /// In grid order.
    pub trials: Vec<Trial>,
}

/// `original / compressed`, printed as `N:1`. Zero for an empty output.
pub fn compression_ratio(original: u64, compressed: u64) -> f64 {
    if compressed == 0 {
        0.0
    } else {
        original as f64 / compressed as f64
    }
}

impl SweepReport {
    /// Smallest output, i.e. highest ratio; ties go to the earlier grid point.
    pub fn best(&self) -> Option<&Trial> {
        self.trials
            .iter()
            .reduce(|best, t| if t.compressed_size < best.compressed_size { t } else { best })
    }
}

/// Compress `data` with `preset`, feeding `chunk_size` bytes at a time.
pub fn run_trial(data: &[u8], preset: Preset, chunk_size: usize) -> Result<Trial> {
    let mut session = EncoderSession::open(preset, MEMBER_SIZE_DEFAULT)?;
    let mut compressed_size = 0u64;
    for chunk in data.chunks(chunk_size.max(1)) {
        compressed_size += session.compress(chunk)?.len() as u64;
    }
    compressed_size += session.finish()?.len() as u64;
    displaylevel!(
        3,
        "  ({:>9}, {:>3}) -> {}\n",
        preset.dictionary_size(),
        preset.match_len_limit(),
        compressed_size
    );
    Ok(Trial {
        preset,
        compressed_size,
    })
}

/// Run every point of `grid` over `data` on a pool of `threads` workers.
pub fn sweep(
    data: &[u8],
    grid: &[(u32, u32)],
    chunk_size: usize,
    threads: usize,
) -> anyhow::Result<SweepReport> {
    let presets = grid
        .iter()
        .map(|&(d, m)| Preset::new(d, m).map_err(crate::Error::from))
        .collect::<Result<Vec<_>>>()?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .context("cannot start worker pool")?;
    tracing::debug!(points = presets.len(), threads, "sweep started");

    let trials = pool.install(|| {
        presets
            .par_iter()
            .map(|&preset| run_trial(data, preset, chunk_size))
            .collect::<Result<Vec<_>>>()
    })?;

    Ok(SweepReport {
        original_size: data.len() as u64,
        trials,
    })
}

pub fn run_sweep(args: &SweepArgs) -> anyhow::Result<SweepReport> {
    let data = fs::read(&args.file)
        .with_context(|| format!("cannot read {}", args.file.display()))?;
    displaylevel!(
        2,
        "{}: {} bytes, {} presets on {} threads\n",
        args.file.display(),
        data.len(),
        args.grid().len(),
        args.threads()
    );
    let report = sweep(&data, &args.grid(), args.chunk_size, args.threads())?;

    displayout!("{:>12} {:>5} {:>12} {:>9}\n", "dictionary", "match", "compressed", "ratio");
    for trial in &report.trials {
        displayout!(
            "{:>12} {:>5} {:>12} {:>7.2}:1\n",
            trial.preset.dictionary_size(),
            trial.preset.match_len_limit(),
            trial.compressed_size,
            compression_ratio(report.original_size, trial.compressed_size)
        );
    }
    if let Some(best) = report.best() {
        displayout!(
            "best encoding: dictionary_size={}, match_len_limit={} ({:.2}:1 compression ratio)\n",
            best.preset.dictionary_size(),
            best.preset.match_len_limit(),
            compression_ratio(report.original_size, best.compressed_size)
        );
    }
    Ok(report)
}
