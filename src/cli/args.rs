//! Command-line definition.
//!
//! Every flag maps onto one field of [`EncodeOptions`], [`DecodeOptions`] or
//! [`UrlOptions`]; range checks are left to the library so the CLI reports
//! the same errors a library caller would get.

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::config::{CHUNK_SIZE_DEFAULT, LEVEL_DEFAULT, MEMBER_SIZE_DEFAULT, WORD_SIZE_DEFAULT};
use crate::io::{DecodeOptions, EncodeOptions};
use crate::preset::Level;
use crate::source::UrlOptions;

use super::constants::{SWEEP_DICTIONARY_SIZES, SWEEP_MATCH_LEN_LIMITS};

#[derive(Debug, Parser)]
#[command(name = "lzip", version, about = "Streaming lzip compressor and decompressor")]
pub struct Cli {
    /// Decrease verbosity (repeatable).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub quiet: u8,

    /// Increase verbosity (repeatable).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compress a file or standard input.
    Compress(CompressArgs),
    /// Decompress a file, standard input, or a URL.
    Decompress(DecompressArgs),
    /// Compress one file with a grid of presets and report the ratios.
    Sweep(SweepArgs),
}

// ── compress ──────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompressArgs {
    /// Input file, or `-` for standard input.
    pub input: String,

    /// Output file (default: INPUT.lz).
    #[arg(short, long, conflicts_with = "stdout")]
    pub output: Option<PathBuf>,

    /// Write to standard output.
    #[arg(short = 'c', long)]
    pub stdout: bool,

    /// Preset level, 0..=9.
    #[arg(short, long, allow_negative_numbers = true, conflicts_with_all = ["dictionary_size", "match_len_limit"])]
    pub level: Option<i32>,

    /// Explicit dictionary size in bytes.
    #[arg(long, requires = "match_len_limit")]
    pub dictionary_size: Option<u32>,

    /// Explicit match length limit.
    #[arg(long, requires = "dictionary_size")]
    pub match_len_limit: Option<u32>,

    /// Uncompressed bytes per member.
    #[arg(short = 'b', long, default_value_t = MEMBER_SIZE_DEFAULT)]
    pub member_size: u64,

    /// Overwrite an existing output file.
    #[arg(short, long)]
    pub force: bool,
}

impl CompressArgs {
    pub fn level(&self) -> Level {
        match (self.dictionary_size, self.match_len_limit, self.level) {
            (Some(dictionary_size), Some(match_len_limit), _) => Level::Custom {
                dictionary_size,
                match_len_limit,
            },
            (_, _, Some(level)) => Level::Index(level),
            _ => Level::Index(LEVEL_DEFAULT),
        }
    }

    pub fn encode_options(&self) -> EncodeOptions {
        EncodeOptions::new()
            .level(self.level())
            .member_size(self.member_size)
    }
}

// ── decompress ────────────────────────────────────────────────────────────────

/// What to do with decoded bytes that do not fill a whole word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LeftoverPolicy {
    /// Fail after writing the aligned output.
    Error,
    /// Write the leftover bytes at the end of the output.
    Append,
    /// Drop the leftover bytes with a warning.
    Discard,
}

#[derive(Debug, Args)]
pub struct DecompressArgs {
    /// Input file, `-` for standard input, or a file/http/https URL.
    pub input: String,

    /// Output file (default: INPUT without its .lz suffix).
    #[arg(short, long, conflicts_with = "stdout")]
    pub output: Option<PathBuf>,

    /// Write to standard output.
    #[arg(short = 'c', long)]
    pub stdout: bool,

    /// Decoded length must be a multiple of this many bytes.
    #[arg(short, long, default_value_t = WORD_SIZE_DEFAULT)]
    pub word_size: usize,

    /// Bytes read from the input per step.
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Network timeout in seconds for URL inputs.
    #[arg(long)]
    pub timeout: Option<u64>,

    #[arg(long, value_enum, default_value_t = LeftoverPolicy::Error)]
    pub leftover: LeftoverPolicy,

    /// Overwrite an existing output file.
    #[arg(short, long)]
    pub force: bool,
}

impl DecompressArgs {
    pub fn decode_options(&self) -> DecodeOptions {
        let options = DecodeOptions::new().word_size(self.word_size);
        match self.chunk_size {
            Some(chunk_size) => options.chunk_size(chunk_size),
            None => options,
        }
    }

    pub fn url_options(&self) -> UrlOptions {
        let options = UrlOptions::default();
        match self.timeout {
            Some(secs) => options.timeout(Duration::from_secs(secs)),
            None => options,
        }
    }
}

// ── sweep ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SweepArgs {
    /// File to compress.
    pub file: PathBuf,

    /// Bytes fed to each encoder per step.
    #[arg(long, default_value_t = CHUNK_SIZE_DEFAULT)]
    pub chunk_size: usize,

    /// Worker threads (default: number of CPUs).
    #[arg(short = 'T', long)]
    pub threads: Option<usize>,

    /// Comma-separated dictionary sizes to try.
    #[arg(long, value_delimiter = ',')]
    pub dictionary_sizes: Vec<u32>,

    /// Comma-separated match length limits to try.
    #[arg(long, value_delimiter = ',')]
    pub match_len_limits: Vec<u32>,
}

impl SweepArgs {
    /// Every `(dictionary_size, match_len_limit)` pair to try, in grid order.
    pub fn grid(&self) -> Vec<(u32, u32)> {
        let dictionary_sizes = if self.dictionary_sizes.is_empty() {
            SWEEP_DICTIONARY_SIZES.to_vec()
        } else {
            self.dictionary_sizes.clone()
        };
        let match_len_limits = if self.match_len_limits.is_empty() {
            SWEEP_MATCH_LEN_LIMITS.to_vec()
        } else {
            self.match_len_limits.clone()
        };
        dictionary_sizes
            .iter()
            .flat_map(|&d| match_len_limits.iter().map(move |&m| (d, m)))
            .collect()
    }

    pub fn threads(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get).max(1)
    }
}
